// minigrad-core/src/ops/arithmetic/mul.rs

use crate::autograd::function::{expect_arity, operand_dtype};
use crate::autograd::{apply, Context, Function, Operand};
use crate::error::MinigradError;
use crate::ops::{mul_kernel, reduce_to_shape};
use crate::tensor::Tensor;

/// Element-wise multiplication \( z = a \cdot b \).
#[derive(Debug, Clone, Copy, Default)]
pub struct Mul;

impl Function for Mul {
    fn name(&self) -> &'static str {
        "Mul"
    }

    fn forward(&self, ctx: &mut Context, operands: &[Operand]) -> Result<Tensor, MinigradError> {
        expect_arity(operands, 2, "mul")?;
        let dtype = operand_dtype(operands);
        let a = operands[0].to_tensor(dtype);
        let b = operands[1].to_tensor(dtype);
        ctx.save_for_backward(&operands[0]);
        ctx.save_for_backward(&operands[1]);
        mul_kernel(&a, &b, "mul")
    }

    /// Product rule: \( \frac{dL}{da} = \frac{dL}{dz} \cdot b \) and \( \frac{dL}{db} = \frac{dL}{dz} \cdot a \).
    fn backward(&self, ctx: &Context, grad_output: &Tensor) -> Result<Vec<Tensor>, MinigradError> {
        let [a, b] = ctx.saved() else {
            return Err(MinigradError::ArityMismatch {
                operation: "mul_backward".to_string(),
                expected: 2,
                actual: ctx.len(),
            });
        };
        let dtype = grad_output.dtype();

        let grad_a = mul_kernel(grad_output, &b.to_tensor(dtype), "mul_backward")?;
        let grad_a = reduce_to_shape(grad_a, &a.shape(), "mul_backward")?;

        let grad_b = mul_kernel(grad_output, &a.to_tensor(dtype), "mul_backward")?;
        let grad_b = reduce_to_shape(grad_b, &b.shape(), "mul_backward")?;

        Ok(vec![grad_a, grad_b])
    }
}

/// Multiplies two operands element-wise.
///
/// Either operand may be a `Tensor` or an `f64` constant. A 0-dimensional operand
/// is broadcast against the other one; otherwise the shapes must match.
///
/// This operation supports automatic differentiation.
///
/// # Errors
/// `ShapeMismatch` or `DataTypeMismatch` for incompatible operands.
pub fn mul_op(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Tensor, MinigradError> {
    apply(Mul, &[a.into(), b.into()])
}

#[cfg(test)]
#[path = "mul_test.rs"]
mod tests;
