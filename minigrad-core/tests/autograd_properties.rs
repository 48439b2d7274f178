use approx::assert_relative_eq;
use minigrad_core::{add, make_node, multiply, mul, sin, sine, MinigradError, Tensor};

mod common;
use common::{grad_of, leaf, setup_logger};

#[test]
fn test_product_of_two_scalars() {
    setup_logger();
    let x = leaf(2.0);
    let y = leaf(3.0);
    let z = mul(&x, &y).unwrap();
    assert_relative_eq!(z.item().unwrap(), 6.0);

    z.backward(None).unwrap();
    assert_relative_eq!(grad_of(&x), 3.0);
    assert_relative_eq!(grad_of(&y), 2.0);
    assert_eq!(format!("{}", z), "Tensor(data=6.0, grad_fn=Mul)");
}

#[test]
fn test_sum_passes_gradient_through() {
    setup_logger();
    for (a, b) in [(1.0, 2.0), (-3.5, 0.25), (0.0, 0.0)] {
        let x = leaf(a);
        let y = leaf(b);
        add(&x, &y).unwrap().backward(None).unwrap();
        assert_relative_eq!(grad_of(&x), 1.0);
        assert_relative_eq!(grad_of(&y), 1.0);
    }
}

#[test]
fn test_sine_gradient_is_cosine() {
    setup_logger();
    for v in [-2.0, -0.3, 0.0, 1.0, 3.0] {
        let x = leaf(v);
        sin(&x).unwrap().backward(None).unwrap();
        assert_relative_eq!(grad_of(&x), f64::cos(v), epsilon = 1e-12);
    }
}

#[test]
fn test_gradient_flags_follow_operands() {
    setup_logger();
    let tracked = leaf(1.0);
    let plain = Tensor::scalar(2.0);

    let out = mul(&plain, &plain).unwrap();
    assert!(!out.requires_grad());
    assert!(out.grad_fn().is_none());

    let out = mul(&plain, &tracked).unwrap();
    assert!(out.requires_grad());
    assert!(out.grad_fn().is_some());

    let out = sin(&plain).unwrap();
    assert!(!out.requires_grad());
}

#[test]
fn test_shared_subexpression_accumulates() {
    setup_logger();
    // z = x*y + x  ->  dz/dx = y + 1, dz/dy = x
    let x = leaf(4.0);
    let y = leaf(-1.5);
    let z = add(&mul(&x, &y).unwrap(), &x).unwrap();
    z.backward(None).unwrap();
    assert_relative_eq!(grad_of(&x), -0.5);
    assert_relative_eq!(grad_of(&y), 4.0);
}

#[test]
fn test_repeated_backward_doubles_leaf_gradients() {
    setup_logger();
    let x = leaf(2.0);
    let y = leaf(3.0);
    let z = mul(&x, &y).unwrap();
    z.backward(None).unwrap();
    z.backward(None).unwrap();
    assert_relative_eq!(grad_of(&x), 6.0);
    assert_relative_eq!(grad_of(&y), 4.0);
}

#[test]
fn test_constant_operands() {
    setup_logger();
    let x = leaf(1.5);
    let z = add(&mul(&x, 4.0).unwrap(), 1.0).unwrap();
    assert_relative_eq!(z.item().unwrap(), 7.0);
    z.backward(None).unwrap();
    assert_relative_eq!(grad_of(&x), 4.0);
}

#[test]
fn test_non_grad_operand_receives_nothing() {
    setup_logger();
    let x = leaf(2.0);
    let c = Tensor::scalar(5.0);
    mul(&x, &c).unwrap().backward(None).unwrap();
    assert!(c.grad().is_none());
    assert_relative_eq!(grad_of(&x), 5.0);
}

#[test]
fn test_backward_on_untracked_output_fails() {
    setup_logger();
    let z = mul(&Tensor::scalar(1.0), &Tensor::scalar(2.0)).unwrap();
    assert!(matches!(z.backward(None), Err(MinigradError::InvalidOperation(_))));
}

#[test]
fn test_threads_can_share_leaves() {
    setup_logger();
    let x = leaf(0.5);
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let x = x.clone();
            std::thread::spawn(move || {
                let y = sin(&x).unwrap();
                y.item().unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert_relative_eq!(handle.join().unwrap(), 0.5f64.sin());
    }
}

#[test]
fn test_make_node_scenario() {
    setup_logger();
    let x = make_node(2.0, true).unwrap();
    let y = make_node(3.0, true).unwrap();
    let z = multiply(&x, &y).unwrap();
    assert_relative_eq!(z.item().unwrap(), 6.0);
    z.backward(None).unwrap();
    assert_relative_eq!(grad_of(&x), 3.0);
    assert_relative_eq!(grad_of(&y), 2.0);
}

#[test]
fn test_diamond_with_constant_node() {
    setup_logger();
    let x = make_node(0.9, true).unwrap();
    let x_const = make_node(2.5, false).unwrap();
    let y = add(&multiply(&x, &x_const).unwrap(), &sine(&x).unwrap()).unwrap();
    y.backward(None).unwrap();
    assert_relative_eq!(grad_of(&x), 2.5 + 0.9f64.cos(), epsilon = 1e-12);
    assert!(x_const.grad().is_none());
}

#[test]
fn test_vector_payloads() {
    setup_logger();
    let a = make_node(vec![1.0, 2.0, 3.0], true).unwrap();
    let b = make_node(vec![4.0, 5.0, 6.0], true).unwrap();
    let z = mul(&a, &b).unwrap();
    z.backward(None).unwrap();
    assert_eq!(a.grad().unwrap().get_f64_data().unwrap(), vec![4.0, 5.0, 6.0]);
    assert_eq!(b.grad().unwrap().get_f64_data().unwrap(), vec![1.0, 2.0, 3.0]);
}
