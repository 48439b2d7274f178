//! # minigrad-core
//!
//! A minimal reverse-mode automatic differentiation engine over small CPU tensors.
//!
//! ```
//! use minigrad_core::{make_node, mul};
//!
//! let x = make_node(2.0, true)?;
//! let y = make_node(3.0, true)?;
//! let z = mul(&x, &y)?;
//! assert_eq!(z.item()?, 6.0);
//!
//! z.backward(None)?;
//! assert_eq!(x.grad().unwrap().item()?, 3.0);
//! assert_eq!(y.grad().unwrap().item()?, 2.0);
//! # Ok::<(), minigrad_core::MinigradError>(())
//! ```

pub mod autograd;
pub mod buffer;
pub mod error;
pub mod ops;
pub mod tensor;
pub mod tensor_data;
pub mod types;
pub mod utils;

pub use autograd::{apply, Context, Function, Operand, Saved};
pub use error::MinigradError;
pub use tensor::{make_node, Payload, Tensor};
pub use types::DType;

// Operation entry points under their mathematical names.
pub use ops::{add_op as add, mul_op as mul, mul_op as multiply, sin_op as sin, sin_op as sine};
