use super::*;
use crate::types::DType;
use crate::utils::testing::{check_tensor_near, create_test_tensor};

#[test]
fn test_broadcast_shape_rules() {
    assert_eq!(broadcast_shape(&[2, 3], &[2, 3], "t").unwrap(), vec![2, 3]);
    assert_eq!(broadcast_shape(&[], &[4], "t").unwrap(), vec![4]);
    assert_eq!(broadcast_shape(&[4], &[], "t").unwrap(), vec![4]);
    assert_eq!(broadcast_shape(&[], &[], "t").unwrap(), Vec::<usize>::new());
    assert!(matches!(
        broadcast_shape(&[2], &[3], "t"),
        Err(MinigradError::ShapeMismatch { .. })
    ));
    // Only 0-d operands broadcast; [1] is an ordinary shape.
    assert!(broadcast_shape(&[1], &[3], "t").is_err());
}

#[test]
fn test_binary_kernel_same_shape() {
    let a = create_test_tensor(vec![1.0, 2.0, 3.0, 4.0], vec![2, 2]);
    let b = create_test_tensor(vec![10.0, 20.0, 30.0, 40.0], vec![2, 2]);
    let sum = add_kernel(&a, &b, "test").unwrap();
    check_tensor_near(&sum, &[2, 2], &[11.0, 22.0, 33.0, 44.0], 1e-12);
    assert!(!sum.requires_grad());
    assert!(sum.is_leaf());
}

#[test]
fn test_binary_kernel_scalar_broadcast() {
    let a = Tensor::scalar(2.0);
    let b = create_test_tensor(vec![1.0, 2.0, 3.0], vec![3]);
    check_tensor_near(&mul_kernel(&a, &b, "test").unwrap(), &[3], &[2.0, 4.0, 6.0], 1e-12);
    check_tensor_near(&mul_kernel(&b, &a, "test").unwrap(), &[3], &[2.0, 4.0, 6.0], 1e-12);
}

#[test]
fn test_binary_kernel_same_node_twice() {
    let a = create_test_tensor(vec![3.0, -1.0], vec![2]);
    let squared = mul_kernel(&a, &a, "test").unwrap();
    check_tensor_near(&squared, &[2], &[9.0, 1.0], 1e-12);
}

#[test]
fn test_binary_kernel_dtype_mismatch() {
    let a = Tensor::new(vec![1.0f32], vec![1]).unwrap();
    let b = create_test_tensor(vec![1.0], vec![1]);
    let result = add_kernel(&a, &b, "test");
    assert_eq!(
        result.err(),
        Some(MinigradError::DataTypeMismatch {
            expected: DType::F32,
            actual: DType::F64,
            operation: "test".to_string(),
        })
    );
}

#[test]
fn test_unary_kernel_keeps_dtype_and_shape() {
    let a = Tensor::new(vec![0.0f32, 1.0, 2.0, 3.0], vec![2, 2]).unwrap();
    let out = apply_unary_kernel(&a, |x| x * 2.0, |x| x * 2.0);
    assert_eq!(out.dtype(), DType::F32);
    assert_eq!(out.get_f32_data().unwrap(), vec![0.0, 2.0, 4.0, 6.0]);
    assert_eq!(out.shape(), vec![2, 2]);
}

#[test]
fn test_reduce_to_shape() {
    let grad = create_test_tensor(vec![1.0, 2.0, 3.0], vec![3]);
    let same = reduce_to_shape(grad.clone(), &[3], "test").unwrap();
    assert_eq!(same.id_ptr(), grad.id_ptr());

    let summed = reduce_to_shape(grad.clone(), &[], "test").unwrap();
    check_tensor_near(&summed, &[], &[6.0], 1e-12);

    let scalar = Tensor::scalar(1.0);
    let kept = reduce_to_shape(scalar.clone(), &[3], "test").unwrap();
    assert_eq!(kept.id_ptr(), scalar.id_ptr());

    assert!(matches!(
        reduce_to_shape(grad, &[2], "test"),
        Err(MinigradError::ShapeMismatch { .. })
    ));
}
