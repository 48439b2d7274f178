// src/tensor/arithmetic_methods.rs

use crate::error::MinigradError;
use crate::ops::{add_op, mul_op, sin_op};
use crate::tensor::Tensor;
use std::ops::{Add, Mul};

impl Tensor {
    /// Element-wise sine. See [`sin_op`].
    pub fn sin(&self) -> Result<Tensor, MinigradError> {
        sin_op(self)
    }
}

// Operator overloads return `Result` so shape and dtype errors surface to the caller:
// `let z = (&x * &y)?;`

impl Add<&Tensor> for &Tensor {
    type Output = Result<Tensor, MinigradError>;

    fn add(self, rhs: &Tensor) -> Self::Output {
        add_op(self, rhs)
    }
}

impl Add<f64> for &Tensor {
    type Output = Result<Tensor, MinigradError>;

    fn add(self, rhs: f64) -> Self::Output {
        add_op(self, rhs)
    }
}

impl Mul<&Tensor> for &Tensor {
    type Output = Result<Tensor, MinigradError>;

    fn mul(self, rhs: &Tensor) -> Self::Output {
        mul_op(self, rhs)
    }
}

impl Mul<f64> for &Tensor {
    type Output = Result<Tensor, MinigradError>;

    fn mul(self, rhs: f64) -> Self::Output {
        mul_op(self, rhs)
    }
}

#[cfg(test)]
#[path = "arithmetic_methods_test.rs"]
mod tests;
