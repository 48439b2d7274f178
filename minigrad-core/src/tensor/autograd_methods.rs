use crate::autograd::graph::topological_sort;
use crate::autograd::{Context, Function, Saved};
use crate::error::MinigradError;
use crate::ops::add_kernel;
use crate::tensor::create::zeros_like;
use crate::tensor::Tensor;
use crate::tensor_data::TensorData;
use log::{debug, trace, warn};
use std::sync::Arc;

impl Tensor {
    /// Checks if this tensor requires gradient computation.
    pub fn requires_grad(&self) -> bool {
        self.read_data().requires_grad
    }

    /// Sets the `requires_grad` flag of a leaf tensor.
    ///
    /// # Errors
    /// Returns `InvalidOperation` on a tensor produced by an operation: whether an
    /// internal node tracks gradients is decided when it is created.
    pub fn set_requires_grad(&self, requires_grad: bool) -> Result<(), MinigradError> {
        let mut guard = self.write_data();
        if guard.grad_fn.is_some() {
            return Err(MinigradError::InvalidOperation(
                "requires_grad can only be changed on leaf tensors".to_string(),
            ));
        }
        guard.requires_grad = requires_grad;
        Ok(())
    }

    /// Returns a clone of the gradient tensor, if one has been accumulated.
    pub fn grad(&self) -> Option<Tensor> {
        self.read_data().grad.clone()
    }

    /// Returns the operation that produced this tensor, if any.
    pub fn grad_fn(&self) -> Option<Arc<dyn Function>> {
        self.read_data().grad_fn.clone()
    }

    /// Returns the name of the producing operation, e.g. `"Mul"`.
    pub fn grad_fn_name(&self) -> Option<&'static str> {
        self.read_data().grad_fn.as_ref().map(|f| f.name())
    }

    /// A leaf is a tensor created directly rather than by an operation.
    pub fn is_leaf(&self) -> bool {
        self.read_data().grad_fn.is_none()
    }

    /// Returns a copy of the context recorded by the producing operation.
    pub fn context(&self) -> Option<Context> {
        self.read_data().ctx.clone()
    }

    /// Clones out the graph nodes recorded in this tensor's context, releasing the lock.
    pub(crate) fn saved_tensors(&self) -> Vec<Tensor> {
        match self.read_data().ctx.as_ref() {
            Some(ctx) => ctx.saved_tensors().cloned().collect(),
            None => Vec::new(),
        }
    }

    /// Creates a new tensor that shares the same data but is detached
    /// from the computation graph.
    pub fn detach(&self) -> Tensor {
        let (buffer, shape) = self.payload();
        Tensor::from_tensor_data(TensorData::from_shared_buffer(buffer, shape))
    }

    /// Drops the accumulated gradient.
    pub(crate) fn clear_grad(&self) {
        self.write_data().grad = None;
    }

    /// Accumulates `grad_to_add` into this tensor's `grad` field.
    ///
    /// An unset gradient starts from zeros of this tensor's shape. A 0-d
    /// gradient is added to every element. The sum is written as a new tensor,
    /// so gradient tensors handed out earlier by [`Tensor::grad`] are never mutated.
    pub(crate) fn accumulate_grad(&self, grad_to_add: &Tensor) -> Result<(), MinigradError> {
        let (dtype, shape, existing) = {
            let guard = self.read_data();
            (guard.dtype, guard.shape.clone(), guard.grad.clone())
        };

        if grad_to_add.dtype() != dtype {
            return Err(MinigradError::DataTypeMismatch {
                expected: dtype,
                actual: grad_to_add.dtype(),
                operation: "accumulate_grad".to_string(),
            });
        }
        let grad_shape = grad_to_add.shape();
        if grad_shape != shape && !grad_shape.is_empty() {
            return Err(MinigradError::GradientAccumulationShapeMismatch {
                expected: shape,
                actual: grad_shape,
            });
        }

        // A previous scalar seed may still sit in `grad`; the sum then takes the full shape.
        let base = existing.unwrap_or_else(|| zeros_like(self));
        let sum = add_kernel(&base, grad_to_add, "accumulate_grad")?;
        self.write_data().grad = Some(sum);
        Ok(())
    }

    /// Computes the gradient of this tensor with respect to every graph node it depends on.
    ///
    /// The seed becomes this tensor's gradient (overwriting any previous one), then
    /// the graph is walked in reverse topological order. For each internal node,
    /// its operation's backward rule is applied to the node's gradient and the results
    /// are accumulated into the recorded operands that require gradients.
    ///
    /// Gradients are never reset: calling `backward` again adds to the gradients of
    /// every node reached, intermediate nodes included.
    ///
    /// # Arguments
    /// * `seed`: Initial gradient. Defaults to a 0-d tensor holding `1` in this tensor's
    ///   dtype. An explicit seed must have this tensor's dtype and either its shape or none.
    ///
    /// # Errors
    /// * `InvalidOperation` if this tensor does not require gradients.
    /// * `DataTypeMismatch` / `ShapeMismatch` for an unsuitable seed.
    /// * Any error raised by a backward rule or during accumulation.
    pub fn backward(&self, seed: Option<Tensor>) -> Result<(), MinigradError> {
        if !self.requires_grad() {
            return Err(MinigradError::InvalidOperation(
                "backward called on a tensor that does not require grad".to_string(),
            ));
        }

        let seed = match seed {
            Some(g) => {
                if g.dtype() != self.dtype() {
                    return Err(MinigradError::DataTypeMismatch {
                        expected: self.dtype(),
                        actual: g.dtype(),
                        operation: "backward seed".to_string(),
                    });
                }
                let seed_shape = g.shape();
                if seed_shape != self.shape() && !seed_shape.is_empty() {
                    return Err(MinigradError::ShapeMismatch {
                        expected: self.shape(),
                        actual: seed_shape,
                        operation: "backward seed".to_string(),
                    });
                }
                g
            }
            None => Tensor::scalar_of(1.0, self.dtype()),
        };
        self.write_data().grad = Some(seed);

        let sorted_nodes = topological_sort(self);
        debug!(
            "backward: {} node(s) reachable from {:?}",
            sorted_nodes.len(),
            self.id_ptr()
        );

        for node in sorted_nodes.iter().rev() {
            let (grad_fn, ctx, grad_output) = {
                let guard = node.read_data();
                match (&guard.grad_fn, &guard.ctx) {
                    (Some(grad_fn), Some(ctx)) => {
                        (Arc::clone(grad_fn), ctx.clone(), guard.grad.clone())
                    }
                    _ => continue,
                }
            };
            let Some(grad_output) = grad_output else {
                trace!("backward: node {:?} received no gradient, skipping", node.id_ptr());
                continue;
            };

            let input_grads = grad_fn.backward(&ctx, &grad_output)?;
            if input_grads.len() != ctx.len() {
                warn!(
                    "backward: {} returned {} gradient(s) for {} recorded operand(s); extra entries are ignored",
                    grad_fn.name(),
                    input_grads.len(),
                    ctx.len()
                );
            }

            for (saved, grad) in ctx.saved().iter().zip(input_grads.iter()) {
                if let Saved::Tensor(input) = saved {
                    if input.requires_grad() {
                        trace!(
                            "backward: {} accumulating into {:?}",
                            grad_fn.name(),
                            input.id_ptr()
                        );
                        input.accumulate_grad(grad)?;
                    }
                }
            }
        }

        debug!("backward: done for {:?}", self.id_ptr());
        Ok(())
    }
}

#[cfg(test)]
#[path = "autograd_methods_test.rs"]
mod tests;
