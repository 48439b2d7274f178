// src/tensor/create.rs

use crate::buffer::Buffer;
use crate::error::MinigradError;
use crate::tensor::Tensor;
use crate::types::DType;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};
use std::sync::Arc;

/// Creates a new F32 Tensor from a Vec<f32> and shape.
pub fn from_vec_f32(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Tensor, MinigradError> {
    Tensor::new(data_vec, shape)
}

/// Creates a new F64 Tensor from a Vec<f64> and shape.
pub fn from_vec_f64(data_vec: Vec<f64>, shape: Vec<usize>) -> Result<Tensor, MinigradError> {
    Tensor::new_f64(data_vec, shape)
}

/// Creates a tensor filled with zeros, having the same shape and DType as the input.
///
/// Infallible in practice, since the buffer is sized from the input's own shape.
pub fn zeros_like(tensor: &Tensor) -> Tensor {
    let guard = tensor.read_data();
    let buffer = Buffer::filled(0.0, guard.numel(), guard.dtype);
    let shape = guard.shape.clone();
    drop(guard);
    Tensor::from_shared_buffer(Arc::new(buffer), shape)
}

/// Draws an F64 tensor from the standard normal distribution using the given RNG.
///
/// Passing a seeded RNG makes the result reproducible, which is what the
/// gradient-check tests rely on.
pub fn randn_with_rng<R: Rng + ?Sized>(
    shape: &[usize],
    rng: &mut R,
) -> Result<Tensor, MinigradError> {
    let numel = shape.iter().product();
    let data_vec: Vec<f64> = (0..numel).map(|_| StandardNormal.sample(rng)).collect();
    Tensor::new_f64(data_vec, shape.to_vec())
}

/// Numeric payload accepted by [`make_node`].
///
/// Scalars become 0-dimensional tensors, plain vectors become 1-dimensional
/// tensors, and `(data, shape)` pairs keep the given shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    F32(Vec<f32>, Vec<usize>),
    F64(Vec<f64>, Vec<usize>),
}

impl From<f64> for Payload {
    fn from(value: f64) -> Self {
        Payload::F64(vec![value], Vec::new())
    }
}

impl From<f32> for Payload {
    fn from(value: f32) -> Self {
        Payload::F32(vec![value], Vec::new())
    }
}

impl From<Vec<f64>> for Payload {
    fn from(data: Vec<f64>) -> Self {
        let len = data.len();
        Payload::F64(data, vec![len])
    }
}

impl From<Vec<f32>> for Payload {
    fn from(data: Vec<f32>) -> Self {
        let len = data.len();
        Payload::F32(data, vec![len])
    }
}

impl From<(Vec<f64>, Vec<usize>)> for Payload {
    fn from((data, shape): (Vec<f64>, Vec<usize>)) -> Self {
        Payload::F64(data, shape)
    }
}

impl From<(Vec<f32>, Vec<usize>)> for Payload {
    fn from((data, shape): (Vec<f32>, Vec<usize>)) -> Self {
        Payload::F32(data, shape)
    }
}

impl Payload {
    pub fn dtype(&self) -> DType {
        match self {
            Payload::F32(..) => DType::F32,
            Payload::F64(..) => DType::F64,
        }
    }
}

/// Creates a leaf tensor from any supported payload.
///
/// `requires_grad` defaults to `false` in every other constructor; this is the
/// one-call way to create a leaf that gradients should flow into.
///
/// # Errors
/// Returns `TensorCreationError` if a `(data, shape)` payload is inconsistent.
pub fn make_node(
    payload: impl Into<Payload>,
    requires_grad: bool,
) -> Result<Tensor, MinigradError> {
    let tensor = match payload.into() {
        Payload::F32(data, shape) => Tensor::new(data, shape)?,
        Payload::F64(data, shape) => Tensor::new_f64(data, shape)?,
    };
    tensor.write_data().requires_grad = requires_grad;
    Ok(tensor)
}

#[cfg(test)]
#[path = "create_test.rs"]
mod tests;
