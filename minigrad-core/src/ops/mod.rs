//! # Tensor Operations Module (`ops`)
//!
//! Differentiable operations and the element-wise kernels they are built on.
//!
//! ## Structure:
//!
//! - **Operation structs:** each operation is a stateless unit struct (`Add`, `Mul`, `Sin`)
//!   implementing [`Function`](crate::autograd::Function). Its `forward` records what the
//!   backward rule needs in the invocation's [`Context`](crate::autograd::Context).
//! - **`_op` Functions:** `add_op`, `mul_op`, `sin_op` run the operation through
//!   [`apply`](crate::autograd::apply), which decides whether the output joins the graph.
//! - **Kernels:** the `pub(crate)` helpers below do the raw computation with DType
//!   dispatch. Backward rules call the kernels directly, so computing a gradient never
//!   records new graph nodes.
//!
//! ## Shapes
//!
//! Operands must have identical shapes, except that a 0-dimensional operand is
//! broadcast against any shape. General broadcasting is not supported.

use crate::buffer::Buffer;
use crate::error::MinigradError;
use crate::tensor::Tensor;
use num_traits::Zero;
use std::sync::Arc;

pub mod arithmetic;
pub mod math_elem;

pub use arithmetic::{add_op, mul_op, Add, Mul};
pub use math_elem::{sin_op, Sin};

/// Output shape of an element-wise binary operation.
///
/// # Errors
/// `ShapeMismatch` unless the shapes are equal or one of them is 0-dimensional.
pub(crate) fn broadcast_shape(
    a_shape: &[usize],
    b_shape: &[usize],
    op_name: &str,
) -> Result<Vec<usize>, MinigradError> {
    if a_shape == b_shape || b_shape.is_empty() {
        Ok(a_shape.to_vec())
    } else if a_shape.is_empty() {
        Ok(b_shape.to_vec())
    } else {
        Err(MinigradError::ShapeMismatch {
            expected: a_shape.to_vec(),
            actual: b_shape.to_vec(),
            operation: op_name.to_string(),
        })
    }
}

/// Applies a binary element-wise operation to two tensors.
///
/// Handles DType dispatch (F32, F64), shape resolution and output tensor creation.
/// The output is always a fresh detached tensor.
///
/// # Arguments
/// * `a`, `b`: The input tensors. They must share a DType.
/// * `op_f32`: Closure defining the operation for F32: `Fn(f32, f32) -> f32`.
/// * `op_f64`: Closure defining the operation for F64: `Fn(f64, f64) -> f64`.
/// * `op_name`: Name of the operation for error messages.
pub(crate) fn apply_binary_kernel<F32Op, F64Op>(
    a: &Tensor,
    b: &Tensor,
    op_f32: F32Op,
    op_f64: F64Op,
    op_name: &str,
) -> Result<Tensor, MinigradError>
where
    F32Op: Fn(f32, f32) -> f32,
    F64Op: Fn(f64, f64) -> f64,
{
    // Locks are taken one at a time: `a` and `b` may be the same node.
    let (a_buffer, a_shape) = a.payload();
    let (b_buffer, b_shape) = b.payload();
    let output_shape = broadcast_shape(&a_shape, &b_shape, op_name)?;
    let numel: usize = output_shape.iter().product();
    // A 0-d operand is read at index 0 for every output element.
    let a_stride = usize::from(!a_shape.is_empty());
    let b_stride = usize::from(!b_shape.is_empty());

    let buffer = match (a_buffer.as_ref(), b_buffer.as_ref()) {
        (Buffer::F32(a_data), Buffer::F32(b_data)) => Buffer::F32(Arc::new(
            (0..numel)
                .map(|i| op_f32(a_data[i * a_stride], b_data[i * b_stride]))
                .collect(),
        )),
        (Buffer::F64(a_data), Buffer::F64(b_data)) => Buffer::F64(Arc::new(
            (0..numel)
                .map(|i| op_f64(a_data[i * a_stride], b_data[i * b_stride]))
                .collect(),
        )),
        (a_buf, b_buf) => {
            return Err(MinigradError::DataTypeMismatch {
                expected: a_buf.dtype(),
                actual: b_buf.dtype(),
                operation: op_name.to_string(),
            })
        }
    };
    Ok(Tensor::from_shared_buffer(Arc::new(buffer), output_shape))
}

/// Applies a unary element-wise operation to a tensor, keeping its DType and shape.
pub(crate) fn apply_unary_kernel<F32Op, F64Op>(a: &Tensor, op_f32: F32Op, op_f64: F64Op) -> Tensor
where
    F32Op: Fn(f32) -> f32,
    F64Op: Fn(f64) -> f64,
{
    let (a_buffer, shape) = a.payload();
    let buffer = match a_buffer.as_ref() {
        Buffer::F32(data) => Buffer::F32(Arc::new(data.iter().map(|&x| op_f32(x)).collect())),
        Buffer::F64(data) => Buffer::F64(Arc::new(data.iter().map(|&x| op_f64(x)).collect())),
    };
    Tensor::from_shared_buffer(Arc::new(buffer), shape)
}

pub(crate) fn add_kernel(a: &Tensor, b: &Tensor, op_name: &str) -> Result<Tensor, MinigradError> {
    apply_binary_kernel(a, b, |x, y| x + y, |x, y| x + y, op_name)
}

pub(crate) fn mul_kernel(a: &Tensor, b: &Tensor, op_name: &str) -> Result<Tensor, MinigradError> {
    apply_binary_kernel(a, b, |x, y| x * y, |x, y| x * y, op_name)
}

/// Brings a gradient back to the shape of the operand it belongs to.
///
/// A gradient that already has `target_shape`, or is 0-dimensional, is returned as is
/// (accumulation spreads a 0-d gradient over every element). A gradient flowing into a
/// 0-dimensional operand that was broadcast in the forward pass is summed.
///
/// # Errors
/// `ShapeMismatch` for any other combination.
pub(crate) fn reduce_to_shape(
    grad: Tensor,
    target_shape: &[usize],
    op_name: &str,
) -> Result<Tensor, MinigradError> {
    let (buffer, grad_shape) = grad.payload();
    if grad_shape == target_shape || grad_shape.is_empty() {
        return Ok(grad);
    }
    if !target_shape.is_empty() {
        return Err(MinigradError::ShapeMismatch {
            expected: target_shape.to_vec(),
            actual: grad_shape,
            operation: op_name.to_string(),
        });
    }
    let summed = match buffer.as_ref() {
        Buffer::F32(data) => Buffer::F32(Arc::new(vec![sum_elements(data)])),
        Buffer::F64(data) => Buffer::F64(Arc::new(vec![sum_elements(data)])),
    };
    Ok(Tensor::from_shared_buffer(Arc::new(summed), Vec::new()))
}

fn sum_elements<T: Zero + Copy>(data: &[T]) -> T {
    data.iter().fold(T::zero(), |acc, &x| acc + x)
}

#[cfg(test)]
#[path = "kernels_test.rs"]
mod tests;
