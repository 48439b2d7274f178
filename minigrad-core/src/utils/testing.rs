use crate::tensor::Tensor;

/// Checks if a tensor is approximately equal to the expected shape and data.
/// Works for both dtypes; elements are compared as `f64`.
/// Panics if shapes differ or data differs by more than `tolerance`.
pub fn check_tensor_near(
    actual: &Tensor,
    expected_shape: &[usize],
    expected_data: &[f64],
    tolerance: f64,
) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");

    let actual_data_vec = actual.to_f64_vec();
    assert_eq!(
        actual_data_vec.len(),
        expected_data.len(),
        "Data length mismatch"
    );

    for (i, (a, e)) in actual_data_vec.iter().zip(expected_data.iter()).enumerate() {
        let diff = (a - e).abs();
        if diff > tolerance {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, diff={:?}, tolerance={:?}",
                i, a, e, diff, tolerance
            );
        }
    }
}

/// Checks the accumulated gradient of `tensor`, panicking if there is none.
pub fn check_grad_near(tensor: &Tensor, expected_shape: &[usize], expected: &[f64], tolerance: f64) {
    let grad = tensor
        .grad()
        .unwrap_or_else(|| panic!("Expected a gradient on {:?}", tensor));
    check_tensor_near(&grad, expected_shape, expected, tolerance);
}

/// Helper to create a simple f64 tensor for testing purposes.
pub fn create_test_tensor(data: Vec<f64>, shape: Vec<usize>) -> Tensor {
    Tensor::new_f64(data, shape).expect("Failed to create test tensor")
}

/// Helper to create a simple f64 tensor that requires gradient for testing.
pub fn create_test_tensor_with_grad(data: Vec<f64>, shape: Vec<usize>) -> Tensor {
    let tensor = create_test_tensor(data, shape);
    tensor
        .set_requires_grad(true)
        .expect("Failed to set requires_grad on a leaf");
    tensor
}
