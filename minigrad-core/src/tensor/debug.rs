// src/tensor/debug.rs
use crate::tensor::Tensor;
use std::fmt;

// Manual implementation of Debug trait
impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let guard = self.read_data();
        write!(
            f,
            "Tensor(shape={:?}, dtype={:?}, requires_grad={}, has_grad={}, grad_fn={:?})",
            guard.shape,
            guard.dtype,
            guard.requires_grad,
            guard.grad.is_some(),
            guard.grad_fn.as_ref().map(|g| g.name())
        )
    }
}

/// `Tensor(data=6.0, grad_fn=Mul)`: a 0-d tensor prints its value, others print
/// their flattened elements, prefixed by the shape when the rank exceeds one.
impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = self.shape();
        let values = self.to_f64_vec();
        write!(f, "Tensor(data=")?;
        if shape.is_empty() {
            write!(f, "{:?}", values.first().copied().unwrap_or_default())?;
        } else {
            if shape.len() > 1 {
                write!(f, "{:?} ", shape)?;
            }
            write!(f, "{:?}", values)?;
        }
        match self.grad_fn_name() {
            Some(name) => write!(f, ", grad_fn={})", name),
            None => write!(f, ", grad_fn=None)"),
        }
    }
}
