// src/tensor/traits.rs

use crate::tensor::Tensor;
use std::sync::Arc;

impl Clone for Tensor {
    /// Clones the handle, not the data: the clone is the same graph node, and
    /// gradients accumulated through one are visible through the other.
    /// Use [`Tensor::detach`] for a separate node.
    fn clone(&self) -> Self {
        Tensor {
            data: Arc::clone(&self.data),
        }
    }
}

impl PartialEq for Tensor {
    /// Compares values: dtype, shape and elements. Autograd state is ignored.
    /// Use [`Tensor::id_ptr`] to compare node identity.
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.data, &other.data) {
            return true;
        }
        let (self_buffer, self_shape) = self.payload();
        let (other_buffer, other_shape) = other.payload();
        if self_shape != other_shape || self_buffer.dtype() != other_buffer.dtype() {
            return false;
        }
        self_buffer.to_f64_vec() == other_buffer.to_f64_vec()
    }
}
