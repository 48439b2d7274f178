// minigrad-core/src/ops/arithmetic/add.rs

use crate::autograd::function::{expect_arity, operand_dtype};
use crate::autograd::{apply, Context, Function, Operand};
use crate::error::MinigradError;
use crate::ops::{add_kernel, reduce_to_shape};
use crate::tensor::Tensor;

/// Element-wise addition \( z = a + b \).
#[derive(Debug, Clone, Copy, Default)]
pub struct Add;

impl Function for Add {
    fn name(&self) -> &'static str {
        "Add"
    }

    fn forward(&self, ctx: &mut Context, operands: &[Operand]) -> Result<Tensor, MinigradError> {
        expect_arity(operands, 2, "add")?;
        let dtype = operand_dtype(operands);
        let a = operands[0].to_tensor(dtype);
        let b = operands[1].to_tensor(dtype);
        ctx.save_for_backward(&operands[0]);
        ctx.save_for_backward(&operands[1]);
        add_kernel(&a, &b, "add")
    }

    /// The gradient of a sum passes through unchanged: \( \frac{dL}{da} = \frac{dL}{db} = \frac{dL}{dz} \).
    fn backward(&self, ctx: &Context, grad_output: &Tensor) -> Result<Vec<Tensor>, MinigradError> {
        ctx.saved()
            .iter()
            .map(|saved| reduce_to_shape(grad_output.clone(), &saved.shape(), "add_backward"))
            .collect()
    }
}

/// Adds two operands element-wise.
///
/// Either operand may be a `Tensor` or an `f64` constant. A 0-dimensional operand
/// is broadcast against the other one; otherwise the shapes must match.
///
/// This operation supports automatic differentiation.
///
/// # Errors
/// `ShapeMismatch` or `DataTypeMismatch` for incompatible operands.
pub fn add_op(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Tensor, MinigradError> {
    apply(Add, &[a.into(), b.into()])
}

#[cfg(test)]
#[path = "add_test.rs"]
mod tests;
