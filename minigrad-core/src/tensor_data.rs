// src/tensor_data.rs
use std::sync::{Arc, PoisonError};

use crate::autograd::{Context, Function};
use crate::buffer::Buffer;
use crate::error::MinigradError;
use crate::tensor::Tensor;
use crate::types::DType;

/// Internal storage and metadata for a Tensor.
///
/// This struct holds the data buffer, its shape and data type, and the
/// autograd bookkeeping of the node. It is wrapped in `Arc<RwLock<TensorData>>`
/// by the `Tensor` struct to allow shared ownership and interior mutability.
#[derive(Debug)]
pub struct TensorData {
    /// The underlying typed buffer, always contiguous and row-major.
    pub(crate) buffer: Arc<Buffer>,
    /// The data type of the elements in the buffer.
    pub(crate) dtype: DType,
    /// The shape (dimensions) of the tensor. Empty for a 0-d scalar.
    pub(crate) shape: Vec<usize>,

    // --- Autograd Metadata ---
    /// Flag indicating if the tensor takes part in gradient computation.
    pub(crate) requires_grad: bool,
    /// The accumulated gradient, populated during the backward pass.
    pub(crate) grad: Option<Tensor>,
    /// The operation that produced this tensor. `None` for leaf tensors.
    pub(crate) grad_fn: Option<Arc<dyn Function>>,
    /// The operands recorded by `grad_fn` during the forward pass.
    /// Set together with `grad_fn` and never mutated afterwards.
    pub(crate) ctx: Option<Context>,
}

impl TensorData {
    /// Creates a new `TensorData` instance with the given f32 data and shape.
    ///
    /// # Errors
    /// Returns `MinigradError::TensorCreationError` if the length of `data_vec` does not match
    /// the total number of elements specified by `shape`.
    pub fn new(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Self, MinigradError> {
        Self::from_buffer(Buffer::F32(Arc::new(data_vec)), shape)
    }

    /// Creates a new `TensorData` instance with the given f64 data and shape.
    pub fn new_f64(data_vec: Vec<f64>, shape: Vec<usize>) -> Result<Self, MinigradError> {
        Self::from_buffer(Buffer::F64(Arc::new(data_vec)), shape)
    }

    /// Wraps an existing buffer, checking that its length matches `shape`.
    pub(crate) fn from_buffer(buffer: Buffer, shape: Vec<usize>) -> Result<Self, MinigradError> {
        let numel: usize = shape.iter().product();
        let data_len = buffer.len();
        if data_len != numel {
            return Err(MinigradError::TensorCreationError { data_len, shape });
        }
        Ok(Self::from_shared_buffer(Arc::new(buffer), shape))
    }

    /// Builds detached metadata around a buffer that is already known to match `shape`.
    pub(crate) fn from_shared_buffer(buffer: Arc<Buffer>, shape: Vec<usize>) -> Self {
        TensorData {
            dtype: buffer.dtype(),
            buffer,
            shape,
            requires_grad: false,
            grad: None,
            grad_fn: None,
            ctx: None,
        }
    }

    /// Provides immutable access to the underlying shared data buffer.
    pub fn buffer(&self) -> &Arc<Buffer> {
        &self.buffer
    }

    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }
}

/// Releases the graph behind a node without recursing once per ancestor.
///
/// Each context owns handles to its inputs, so the default drop glue would
/// nest one call per node of a chain. Instead, nodes whose last handle is
/// held here are unwrapped and their contexts pushed onto a work list.
/// A node still referenced elsewhere is left to its other owners.
impl Drop for TensorData {
    fn drop(&mut self) {
        let Some(ctx) = self.ctx.take() else {
            return;
        };
        let mut pending: Vec<Tensor> = ctx.into_tensors().collect();
        while let Some(tensor) = pending.pop() {
            if let Ok(lock) = Arc::try_unwrap(tensor.data) {
                let mut node = lock.into_inner().unwrap_or_else(PoisonError::into_inner);
                if let Some(ctx) = node.ctx.take() {
                    pending.extend(ctx.into_tensors());
                }
            }
        }
    }
}
