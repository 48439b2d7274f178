// src/tensor/mod.rs

use crate::buffer::Buffer;
use crate::error::MinigradError;
use crate::tensor_data::TensorData;
use crate::types::DType;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

mod arithmetic_methods;
mod autograd_methods;
pub mod create;
mod debug;
mod traits;

// Re-export creation functions to make them public
pub use create::{from_vec_f32, from_vec_f64, make_node, randn_with_rng, zeros_like, Payload};

/// Represents a multi-dimensional array (tensor) and a node of the computation graph.
///
/// `Tensor` uses `Arc<RwLock<TensorData>>` internally to allow for:
/// 1.  **Shared Ownership:** Cloning a `Tensor` is cheap and yields another handle
///     to the *same* node. The graph itself is made of these handles, pointing from
///     each output back to the operands recorded in its context.
/// 2.  **Interior Mutability:** Autograd metadata (`requires_grad`, `grad`) can be
///     modified through a shared reference, which is what gradient accumulation needs.
///
/// Node identity is the address of the shared `RwLock` (see [`Tensor::id_ptr`]):
/// two tensors holding equal values are still distinct nodes.
pub struct Tensor {
    /// Arc for shared ownership, RwLock for interior mutability of TensorData.
    pub(crate) data: Arc<RwLock<TensorData>>,
}

/// Identifier of a graph node: the address of its shared `RwLock<TensorData>`.
pub type NodeId = *const RwLock<TensorData>;

impl Tensor {
    /// Creates a new Tensor with the given f32 data and shape.
    ///
    /// # Errors
    /// Returns `TensorCreationError` if `data_vec.len()` does not match the shape.
    pub fn new(data_vec: Vec<f32>, shape: Vec<usize>) -> Result<Self, MinigradError> {
        let tensor_data = TensorData::new(data_vec, shape)?;
        Ok(Self::from_tensor_data(tensor_data))
    }

    /// Creates a new Tensor with the given f64 data and shape.
    pub fn new_f64(data_vec: Vec<f64>, shape: Vec<usize>) -> Result<Self, MinigradError> {
        let tensor_data = TensorData::new_f64(data_vec, shape)?;
        Ok(Self::from_tensor_data(tensor_data))
    }

    /// Creates a 0-dimensional f64 tensor holding `value`.
    pub fn scalar(value: f64) -> Self {
        Self::scalar_of(value, DType::F64)
    }

    /// Creates a 0-dimensional tensor holding `value` in the requested dtype.
    pub fn scalar_of(value: f64, dtype: DType) -> Self {
        Self::from_shared_buffer(Arc::new(Buffer::filled(value, 1, dtype)), Vec::new())
    }

    pub(crate) fn from_tensor_data(tensor_data: TensorData) -> Self {
        Tensor {
            data: Arc::new(RwLock::new(tensor_data)),
        }
    }

    /// Wraps a buffer whose length is already known to match `shape`.
    pub(crate) fn from_shared_buffer(buffer: Arc<Buffer>, shape: Vec<usize>) -> Self {
        Self::from_tensor_data(TensorData::from_shared_buffer(buffer, shape))
    }

    /// Returns the data type (`DType`) of the tensor elements.
    pub fn dtype(&self) -> DType {
        self.read_data().dtype
    }

    /// Returns a clone of the tensor's shape (`Vec<usize>`).
    pub fn shape(&self) -> Vec<usize> {
        self.read_data().shape.clone()
    }

    /// Returns the number of dimensions. `0` for a scalar.
    pub fn rank(&self) -> usize {
        self.read_data().shape.len()
    }

    /// Returns the number of elements in the tensor.
    pub fn numel(&self) -> usize {
        self.read_data().numel()
    }

    /// Returns the identifier of this node in the computation graph.
    pub fn id_ptr(&self) -> NodeId {
        Arc::as_ptr(&self.data)
    }

    /// Returns a handle to the shared buffer together with the shape, releasing the lock.
    pub(crate) fn payload(&self) -> (Arc<Buffer>, Vec<usize>) {
        let guard = self.read_data();
        (Arc::clone(&guard.buffer), guard.shape.clone())
    }

    /// Acquires a read lock on the tensor's data.
    ///
    /// A poisoned lock is recovered: the data behind it is plain metadata and
    /// remains consistent even if a panic happened while it was held.
    pub fn read_data(&self) -> RwLockReadGuard<'_, TensorData> {
        self.data.read().unwrap_or_else(|poisoned| {
            log::warn!("RwLock for tensor data was poisoned. Recovering reader guard.");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Acquires a write lock on the tensor's data.
    pub fn write_data(&self) -> RwLockWriteGuard<'_, TensorData> {
        self.data.write().unwrap_or_else(|poisoned| {
            log::warn!("RwLock for tensor data was poisoned. Recovering writer guard.");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Attempts to get the tensor data as a `Vec<f32>`.
    /// Returns `DataTypeMismatch` if the tensor is not F32.
    pub fn get_f32_data(&self) -> Result<Vec<f32>, MinigradError> {
        let guard = self.read_data();
        let buffer_arc = guard.buffer().try_get_f32()?;
        Ok(buffer_arc.as_ref().clone())
    }

    /// Attempts to get the tensor data as a `Vec<f64>`.
    /// Returns `DataTypeMismatch` if the tensor is not F64.
    pub fn get_f64_data(&self) -> Result<Vec<f64>, MinigradError> {
        let guard = self.read_data();
        let buffer_arc = guard.buffer().try_get_f64()?;
        Ok(buffer_arc.as_ref().clone())
    }

    /// Copies the data out as `f64` regardless of the tensor's dtype.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.read_data().buffer.to_f64_vec()
    }

    /// Reads the single element of a one-element tensor as `f64`.
    ///
    /// # Errors
    /// Returns `ShapeMismatch` if the tensor holds more or fewer than one element.
    pub fn item(&self) -> Result<f64, MinigradError> {
        let guard = self.read_data();
        if guard.numel() != 1 {
            return Err(MinigradError::ShapeMismatch {
                expected: Vec::new(),
                actual: guard.shape.clone(),
                operation: "item".to_string(),
            });
        }
        Ok(guard.buffer.to_f64_vec()[0])
    }
}
