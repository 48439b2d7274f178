// minigrad-core/src/ops/math_elem/sin.rs

use crate::autograd::function::expect_arity;
use crate::autograd::{apply, Context, Function, Operand, Saved};
use crate::error::MinigradError;
use crate::ops::{apply_unary_kernel, mul_kernel, reduce_to_shape};
use crate::tensor::Tensor;

/// Element-wise sine \( z = \sin(x) \).
///
/// Stores the input, as its value is needed to compute the gradient \( \cos(x) \).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sin;

impl Function for Sin {
    fn name(&self) -> &'static str {
        "Sin"
    }

    fn forward(&self, ctx: &mut Context, operands: &[Operand]) -> Result<Tensor, MinigradError> {
        expect_arity(operands, 1, "sin")?;
        let x = &operands[0];
        ctx.save_for_backward(x);
        match x {
            Operand::Tensor(t) => Ok(apply_unary_kernel(t, f32::sin, f64::sin)),
            Operand::Scalar(v) => Ok(Tensor::scalar(v.sin())),
        }
    }

    /// Chain rule through the derivative of sine:
    /// \\[ \frac{dL}{dx} = \frac{dL}{dz} \cdot \cos(x) \\]
    fn backward(&self, ctx: &Context, grad_output: &Tensor) -> Result<Vec<Tensor>, MinigradError> {
        let [x] = ctx.saved() else {
            return Err(MinigradError::ArityMismatch {
                operation: "sin_backward".to_string(),
                expected: 1,
                actual: ctx.len(),
            });
        };
        let cos_x = match x {
            Saved::Tensor(t) => apply_unary_kernel(t, f32::cos, f64::cos),
            Saved::Constant(v) => Tensor::scalar_of(v.cos(), grad_output.dtype()),
        };
        let grad_x = mul_kernel(grad_output, &cos_x, "sin_backward")?;
        Ok(vec![reduce_to_shape(grad_x, &x.shape(), "sin_backward")?])
    }
}

/// Computes the element-wise sine of a tensor (or of an `f64` constant).
///
/// This operation supports automatic differentiation.
pub fn sin_op(x: impl Into<Operand>) -> Result<Tensor, MinigradError> {
    apply(Sin, &[x.into()])
}

#[cfg(test)]
#[path = "sin_test.rs"]
mod tests;
