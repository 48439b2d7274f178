use crate::error::MinigradError;
use crate::tensor::Tensor;
use crate::types::DType;
use thiserror::Error;

/// Step used for central differences when the caller has no better choice.
pub const DEFAULT_EPSILON: f64 = 1e-6;
/// Absolute/relative tolerance paired with [`DEFAULT_EPSILON`] for F64 inputs.
pub const DEFAULT_TOLERANCE: f64 = 1e-5;

/// Error type specifically for gradient checking failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("Gradient check failed for input tensor at index {input_index}, element index {element_index}: Analytical grad {analytical_grad:?} != Numerical grad {numerical_grad:?}. Difference: {difference:?}")]
    GradientMismatch {
        input_index: usize,
        element_index: usize,
        analytical_grad: f64,
        numerical_grad: f64,
        difference: f64,
    },
    #[error("Forward function execution failed during gradient check: {0}")]
    ForwardPassError(MinigradError),
    #[error("Backward pass execution failed during gradient check: {0}")]
    BackwardPassError(MinigradError),
    #[error("Tensor error during intermediate calculation: {0}")]
    TensorError(MinigradError),
    #[error("Input tensor {input_index} requires grad but has no gradient after backward pass.")]
    MissingAnalyticalGrad { input_index: usize },
    #[error("Numerical gradient is NaN or infinite for input {input_index}, element {element_index}. Details: Loss+: {loss_plus:?}, Loss-: {loss_minus:?}")]
    NumericalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        loss_plus: f64,
        loss_minus: f64,
    },
    #[error("Analytical gradient is NaN or infinite for input {input_index}, element {element_index}. Value: {value:?}")]
    AnalyticalGradNaNOrInfinite {
        input_index: usize,
        element_index: usize,
        value: f64,
    },
    #[error("Gradient check input tensor must be a leaf node (no grad_fn). Input index: {input_index}")]
    InputNotLeaf { input_index: usize },
    #[error("Function did not propagate requires_grad correctly.")]
    RequiresGradPropagationError,
}

impl From<MinigradError> for GradCheckError {
    fn from(err: MinigradError) -> Self {
        GradCheckError::TensorError(err)
    }
}

/// Checks analytical gradients against numerical gradients using central differences.
///
/// The scalar loss is \( L = \sum_i \text{out}_i \cdot \text{output\_grad}_i \), so the
/// analytical side is `func(inputs).backward(Some(output_grad))` and the numerical side is
/// \( (L(x + \epsilon) - L(x - \epsilon)) / 2\epsilon \) per element of every input that
/// requires grad. Inputs that do not require grad are held constant.
///
/// Existing gradients on the inputs are cleared first.
///
/// # Errors
/// The first element whose absolute *and* relative difference exceed `tolerance` is
/// reported as `GradientMismatch`; other variants report setup or evaluation failures.
pub fn check_grad<F>(
    func: F,
    inputs: &[Tensor],
    output_grad: &Tensor,
    epsilon: f64,
    tolerance: f64,
) -> Result<(), GradCheckError>
where
    F: Fn(&[Tensor]) -> Result<Tensor, MinigradError>,
{
    // --- Initial Checks ---
    for (i, input) in inputs.iter().enumerate() {
        if !input.is_leaf() {
            return Err(GradCheckError::InputNotLeaf { input_index: i });
        }
        if input.requires_grad() {
            input.clear_grad();
        }
    }

    // --- 1. Analytical gradients ---
    let output = func(inputs).map_err(GradCheckError::ForwardPassError)?;
    let any_input_requires_grad = inputs.iter().any(Tensor::requires_grad);
    if any_input_requires_grad && !output.requires_grad() {
        return Err(GradCheckError::RequiresGradPropagationError);
    }
    if !output.requires_grad() {
        return Ok(());
    }
    output
        .backward(Some(output_grad.clone()))
        .map_err(GradCheckError::BackwardPassError)?;

    // --- 2. Numerical gradients, element by element ---
    for (i, original_input) in inputs.iter().enumerate() {
        if !original_input.requires_grad() {
            continue;
        }
        let analytical_grad_tensor = original_input
            .grad()
            .ok_or(GradCheckError::MissingAnalyticalGrad { input_index: i })?;
        let analytical_grad_data = analytical_grad_tensor.to_f64_vec();
        let original_data = original_input.to_f64_vec();
        let shape = original_input.shape();
        let dtype = original_input.dtype();

        for elem_idx in 0..original_data.len() {
            let perturbed_loss = |delta: f64| -> Result<f64, GradCheckError> {
                let mut data = original_data.clone();
                data[elem_idx] += delta;
                let mut perturbed_inputs = inputs.to_vec();
                perturbed_inputs[i] = tensor_from_f64(data, shape.clone(), dtype)?;
                let perturbed_output =
                    func(&perturbed_inputs).map_err(GradCheckError::ForwardPassError)?;
                calculate_loss(&perturbed_output, output_grad)
            };
            let loss_plus = perturbed_loss(epsilon)?;
            let loss_minus = perturbed_loss(-epsilon)?;
            let numerical_grad = (loss_plus - loss_minus) / (2.0 * epsilon);

            // A 0-d gradient stands for the same value at every element.
            let analytical_grad = if analytical_grad_data.len() == 1 {
                analytical_grad_data[0]
            } else {
                analytical_grad_data[elem_idx]
            };

            if !numerical_grad.is_finite() {
                return Err(GradCheckError::NumericalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    loss_plus,
                    loss_minus,
                });
            }
            if !analytical_grad.is_finite() {
                return Err(GradCheckError::AnalyticalGradNaNOrInfinite {
                    input_index: i,
                    element_index: elem_idx,
                    value: analytical_grad,
                });
            }

            let close = approx::relative_eq!(
                analytical_grad,
                numerical_grad,
                epsilon = tolerance,
                max_relative = tolerance
            );
            if !close {
                let difference = (analytical_grad - numerical_grad).abs();
                return Err(GradCheckError::GradientMismatch {
                    input_index: i,
                    element_index: elem_idx,
                    analytical_grad,
                    numerical_grad,
                    difference,
                });
            }
        }
    }

    Ok(())
}

/// Weighted sum of the output by `output_grad`; a 0-d `output_grad` weighs every element.
fn calculate_loss(tensor: &Tensor, output_grad: &Tensor) -> Result<f64, GradCheckError> {
    let weights = output_grad.to_f64_vec();
    let values = tensor.to_f64_vec();
    if weights.len() != 1 && weights.len() != values.len() {
        return Err(GradCheckError::TensorError(MinigradError::ShapeMismatch {
            expected: tensor.shape(),
            actual: output_grad.shape(),
            operation: "calculate_loss (grad_check)".to_string(),
        }));
    }
    let loss = values
        .iter()
        .enumerate()
        .map(|(idx, v)| v * weights[if weights.len() == 1 { 0 } else { idx }])
        .sum();
    Ok(loss)
}

fn tensor_from_f64(data: Vec<f64>, shape: Vec<usize>, dtype: DType) -> Result<Tensor, MinigradError> {
    match dtype {
        DType::F32 => Tensor::new(data.into_iter().map(|x| x as f32).collect(), shape),
        DType::F64 => Tensor::new_f64(data, shape),
    }
}

#[cfg(test)]
#[path = "grad_check_test.rs"]
mod tests;
