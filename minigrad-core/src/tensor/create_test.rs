use super::*;
use crate::tensor::Tensor;
use crate::types::DType;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_zeros_like() {
    let tensor = Tensor::new(vec![1.0f32, 2.0, 3.0], vec![1, 3]).unwrap();
    let zeros_t = zeros_like(&tensor);
    assert_eq!(zeros_t.shape(), tensor.shape());
    assert_eq!(zeros_t.numel(), tensor.numel());
    assert_eq!(zeros_t.dtype(), DType::F32);
    assert!(zeros_t.get_f32_data().unwrap().iter().all(|&x| x == 0.0));
}

#[test]
fn test_zeros_like_scalar() {
    let zeros_t = zeros_like(&Tensor::scalar(3.5));
    assert!(zeros_t.shape().is_empty());
    assert_eq!(zeros_t.item().unwrap(), 0.0);
}

#[test]
fn test_from_vec_keeps_dtype() {
    let a = from_vec_f32(vec![1.0, 2.0], vec![2]).unwrap();
    let b = from_vec_f64(vec![1.0, 2.0], vec![1, 2]).unwrap();
    assert_eq!(a.dtype(), DType::F32);
    assert_eq!(b.dtype(), DType::F64);
    assert_eq!(b.shape(), vec![1, 2]);
    assert!(from_vec_f64(vec![1.0], vec![2]).is_err());
}

#[test]
fn test_randn_with_rng_is_reproducible() {
    let a = randn_with_rng(&[6], &mut StdRng::seed_from_u64(7)).unwrap();
    let b = randn_with_rng(&[6], &mut StdRng::seed_from_u64(7)).unwrap();
    assert_eq!(a.dtype(), DType::F64);
    assert_eq!(a.get_f64_data().unwrap(), b.get_f64_data().unwrap());
}

#[test]
fn test_make_node_scalar() {
    let x = make_node(2.0, true).unwrap();
    assert!(x.shape().is_empty());
    assert!(x.requires_grad());
    assert!(x.is_leaf());
    assert_eq!(x.dtype(), DType::F64);
    assert_eq!(x.item().unwrap(), 2.0);
}

#[test]
fn test_make_node_defaults() {
    let v = make_node(vec![1.0f32, 2.0, 3.0], false).unwrap();
    assert_eq!(v.shape(), vec![3]);
    assert_eq!(v.dtype(), DType::F32);
    assert!(!v.requires_grad());
    assert!(v.grad().is_none());
}

#[test]
fn test_make_node_shape_mismatch() {
    let result = make_node((vec![1.0f64, 2.0, 3.0], vec![2, 2]), false);
    assert_eq!(
        result.err(),
        Some(MinigradError::TensorCreationError {
            data_len: 3,
            shape: vec![2, 2],
        })
    );
}

#[test]
fn test_payload_dtype() {
    assert_eq!(Payload::from(1.0f32).dtype(), DType::F32);
    assert_eq!(Payload::from((vec![0.0f64; 4], vec![2, 2])).dtype(), DType::F64);
}
