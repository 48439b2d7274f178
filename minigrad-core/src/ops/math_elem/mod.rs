// Element-wise math functions
pub mod sin;

pub use sin::{sin_op, Sin};
