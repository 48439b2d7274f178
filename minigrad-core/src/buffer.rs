use std::sync::Arc;

use crate::error::MinigradError;
use crate::types::DType;

/// Typed, contiguous CPU storage backing a tensor.
///
/// The data vectors sit behind an `Arc` so that detached tensors and
/// gradients that pass through an operation unchanged can share storage.
#[derive(Debug, Clone)]
pub enum Buffer {
    /// Buffer holding f32 data.
    F32(Arc<Vec<f32>>),
    /// Buffer holding f64 data.
    F64(Arc<Vec<f64>>),
}

impl Buffer {
    /// Returns the element type stored in this buffer.
    pub fn dtype(&self) -> DType {
        match self {
            Buffer::F32(_) => DType::F32,
            Buffer::F64(_) => DType::F64,
        }
    }

    /// Returns the number of elements in the buffer.
    pub fn len(&self) -> usize {
        match self {
            Buffer::F32(data) => data.len(),
            Buffer::F64(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attempts to get a reference to the underlying `Arc<Vec<f32>>`.
    ///
    /// Returns `DataTypeMismatch` if the buffer holds another type.
    pub fn try_get_f32(&self) -> Result<&Arc<Vec<f32>>, MinigradError> {
        match self {
            Buffer::F32(data_arc) => Ok(data_arc),
            other => Err(MinigradError::DataTypeMismatch {
                expected: DType::F32,
                actual: other.dtype(),
                operation: "try_get_f32".to_string(),
            }),
        }
    }

    /// Attempts to get a reference to the underlying `Arc<Vec<f64>>`.
    pub fn try_get_f64(&self) -> Result<&Arc<Vec<f64>>, MinigradError> {
        match self {
            Buffer::F64(data_arc) => Ok(data_arc),
            other => Err(MinigradError::DataTypeMismatch {
                expected: DType::F64,
                actual: other.dtype(),
                operation: "try_get_f64".to_string(),
            }),
        }
    }

    /// Copies the elements out as `f64`, widening f32 data.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            Buffer::F32(data) => data.iter().map(|&x| x as f64).collect(),
            Buffer::F64(data) => data.as_ref().clone(),
        }
    }

    /// Builds a buffer of `len` copies of `value` in the requested dtype.
    pub(crate) fn filled(value: f64, len: usize, dtype: DType) -> Self {
        match dtype {
            DType::F32 => Buffer::F32(Arc::new(vec![value as f32; len])),
            DType::F64 => Buffer::F64(Arc::new(vec![value; len])),
        }
    }
}
