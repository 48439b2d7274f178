//! # Autograd
//!
//! Graph bookkeeping for reverse-mode differentiation:
//!
//! - [`function`]: the [`Function`] trait every differentiable operation implements,
//!   the per-invocation [`Context`] and the [`apply`] entry point that links an
//!   output into the graph.
//! - [`graph`]: topological ordering of the nodes reachable from a root.
//! - [`grad_check`]: finite-difference validation of backward rules.
//!
//! The backward driver itself lives on [`Tensor::backward`](crate::Tensor::backward).

pub mod function;
pub mod grad_check;
pub mod graph;

pub use function::{apply, Context, Function, Operand, Saved};
