use crate::error::MinigradError;
use crate::tensor::Tensor;
use crate::types::DType;
use std::fmt::Debug;
use std::sync::Arc;

/// Defines the interface of a differentiable operation.
///
/// Implementations are stateless (typically unit structs): everything a single
/// invocation needs for its backward pass is recorded in the [`Context`] passed
/// to [`Function::forward`]. After [`apply`] the function and its context are
/// stored on the output tensor and consulted again by `Tensor::backward`.
///
/// The trait requires `Debug + Send + Sync` because the `Arc<dyn Function>` is
/// shared through the tensor handles, which are themselves `Send + Sync`.
pub trait Function: Debug + Send + Sync {
    /// Short name of the operation, used by `Display` and in log lines.
    fn name(&self) -> &'static str;

    /// Computes the output of the operation.
    ///
    /// Every operand the backward rule needs must be recorded with
    /// [`Context::save_for_backward`], in the order the gradients will be returned.
    /// The returned tensor must be freshly created; [`apply`] refuses outputs
    /// that alias one of the operands.
    fn forward(&self, ctx: &mut Context, operands: &[Operand]) -> Result<Tensor, MinigradError>;

    /// Computes the gradient of each recorded entry given the gradient of the output.
    ///
    /// Returns one tensor per entry of `ctx.saved()`, in the same order. Each gradient
    /// must either have the shape of its entry or be 0-dimensional.
    fn backward(&self, ctx: &Context, grad_output: &Tensor) -> Result<Vec<Tensor>, MinigradError>;
}

/// An input to an operation: either a graph node or a raw numeric constant.
#[derive(Debug, Clone)]
pub enum Operand {
    Tensor(Tensor),
    Scalar(f64),
}

impl Operand {
    /// `true` only for a tensor operand that itself requires gradients.
    pub fn requires_grad(&self) -> bool {
        match self {
            Operand::Tensor(t) => t.requires_grad(),
            Operand::Scalar(_) => false,
        }
    }

    pub fn as_tensor(&self) -> Option<&Tensor> {
        match self {
            Operand::Tensor(t) => Some(t),
            Operand::Scalar(_) => None,
        }
    }

    /// Returns the operand as a tensor, materialising a scalar as a 0-d tensor of `dtype`.
    pub fn to_tensor(&self, dtype: DType) -> Tensor {
        match self {
            Operand::Tensor(t) => t.clone(),
            Operand::Scalar(v) => Tensor::scalar_of(*v, dtype),
        }
    }
}

impl From<Tensor> for Operand {
    fn from(tensor: Tensor) -> Self {
        Operand::Tensor(tensor)
    }
}

impl From<&Tensor> for Operand {
    fn from(tensor: &Tensor) -> Self {
        Operand::Tensor(tensor.clone())
    }
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Operand::Scalar(value)
    }
}

impl From<f32> for Operand {
    fn from(value: f32) -> Self {
        Operand::Scalar(value as f64)
    }
}

/// An entry recorded in a [`Context`].
#[derive(Debug, Clone)]
pub enum Saved {
    /// A graph node; the backward traversal recurses into it and accumulates its gradient.
    Tensor(Tensor),
    /// A raw constant; skipped by traversal and accumulation.
    Constant(f64),
}

impl Saved {
    pub fn as_tensor(&self) -> Option<&Tensor> {
        match self {
            Saved::Tensor(t) => Some(t),
            Saved::Constant(_) => None,
        }
    }

    /// Returns the recorded value as a tensor; constants become 0-d tensors of `dtype`.
    pub fn to_tensor(&self, dtype: DType) -> Tensor {
        match self {
            Saved::Tensor(t) => t.clone(),
            Saved::Constant(v) => Tensor::scalar_of(*v, dtype),
        }
    }

    /// Shape of the recorded value. Constants are 0-dimensional.
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Saved::Tensor(t) => t.shape(),
            Saved::Constant(_) => Vec::new(),
        }
    }
}

impl From<&Operand> for Saved {
    fn from(operand: &Operand) -> Self {
        match operand {
            Operand::Tensor(t) => Saved::Tensor(t.clone()),
            Operand::Scalar(v) => Saved::Constant(*v),
        }
    }
}

/// Record of the operands an operation needs for its backward pass.
///
/// Created fresh by [`apply`] for every invocation and owned by the output
/// tensor afterwards. The handles it holds are the edges of the graph.
#[derive(Debug, Clone, Default)]
pub struct Context {
    saved: Vec<Saved>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an operand for the backward pass.
    pub fn save_for_backward(&mut self, operand: &Operand) {
        self.saved.push(Saved::from(operand));
    }

    pub fn saved(&self) -> &[Saved] {
        &self.saved
    }

    /// Iterates over the recorded graph nodes, skipping constants.
    pub fn saved_tensors(&self) -> impl Iterator<Item = &Tensor> {
        self.saved.iter().filter_map(Saved::as_tensor)
    }

    /// Consumes the context, yielding the recorded graph nodes.
    pub(crate) fn into_tensors(self) -> impl Iterator<Item = Tensor> {
        self.saved.into_iter().filter_map(|saved| match saved {
            Saved::Tensor(t) => Some(t),
            Saved::Constant(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }
}

/// Runs `function` on `operands` and links the output into the graph.
///
/// The output gets `requires_grad = true`, a `grad_fn` and the recorded context
/// if and only if at least one operand is a tensor that requires gradients.
/// Otherwise it is returned as a plain detached tensor and the context is dropped.
///
/// # Errors
/// Propagates errors from `forward`. Returns `InvalidOperation` if `forward`
/// hands back one of its own tensor operands.
pub fn apply<F>(function: F, operands: &[Operand]) -> Result<Tensor, MinigradError>
where
    F: Function + 'static,
{
    let mut ctx = Context::new();
    let output = function.forward(&mut ctx, operands)?;

    let aliases_operand = operands
        .iter()
        .filter_map(Operand::as_tensor)
        .any(|t| t.id_ptr() == output.id_ptr());
    if aliases_operand {
        return Err(MinigradError::InvalidOperation(format!(
            "{} forward returned one of its operands instead of a new tensor",
            function.name()
        )));
    }

    if operands.iter().any(Operand::requires_grad) {
        let mut output_guard = output.write_data();
        output_guard.requires_grad = true;
        output_guard.grad_fn = Some(Arc::new(function));
        output_guard.ctx = Some(ctx);
    }
    Ok(output)
}

/// Checks the operand count of a built-in operation.
pub(crate) fn expect_arity(
    operands: &[Operand],
    expected: usize,
    operation: &str,
) -> Result<(), MinigradError> {
    if operands.len() != expected {
        return Err(MinigradError::ArityMismatch {
            operation: operation.to_string(),
            expected,
            actual: operands.len(),
        });
    }
    Ok(())
}

/// DType used to materialise scalar operands: that of the first tensor operand, F64 otherwise.
pub(crate) fn operand_dtype(operands: &[Operand]) -> DType {
    operands
        .iter()
        .find_map(Operand::as_tensor)
        .map(Tensor::dtype)
        .unwrap_or(DType::F64)
}

#[cfg(test)]
#[path = "function_test.rs"]
mod tests;
