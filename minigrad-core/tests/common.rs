use minigrad_core::Tensor;
use std::sync::Once;

static INIT: Once = Once::new();

/// Routes `log` output through env_logger once per test binary (`RUST_LOG=debug`).
#[allow(dead_code)]
pub fn setup_logger() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

#[allow(dead_code)]
pub fn leaf(value: f64) -> Tensor {
    let t = Tensor::scalar(value);
    t.set_requires_grad(true).expect("scalar is a leaf");
    t
}

#[allow(dead_code)]
pub fn grad_of(t: &Tensor) -> f64 {
    t.grad()
        .expect("tensor has no gradient")
        .item()
        .expect("gradient is not a single element")
}
