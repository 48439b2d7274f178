use crate::types::DType;
use thiserror::Error;

/// Custom error type for the minigrad autograd engine.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum MinigradError {
    /// An operation was requested on a tensor whose state does not allow it,
    /// e.g. `backward()` on a tensor that does not require gradients.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Data type mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    DataTypeMismatch {
        expected: DType,
        actual: DType,
        operation: String,
    },

    #[error("Shape mismatch during gradient accumulation: expected {expected:?}, got {actual:?}")]
    GradientAccumulationShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Operation {operation} expects {expected} operand(s), got {actual}")]
    ArityMismatch {
        operation: String,
        expected: usize,
        actual: usize,
    },
}
