//! Builds `z = x * y` for two scalars, runs the backward pass and checks the
//! gradients against their closed forms (`dz/dx = y`, `dz/dy = x`).
//!
//! Run with `RUST_LOG=debug cargo run --example autograd_demo` to see the traversal.

use minigrad_core::{make_node, mul, MinigradError};

fn main() -> Result<(), MinigradError> {
    env_logger::init();

    let x = make_node(2.0, true)?;
    let y = make_node(3.0, true)?;

    let z = mul(&x, &y)?;
    println!("z = {}", z);

    z.backward(None)?;

    let x_grad = x.grad().map(|g| g.item()).transpose()?.unwrap_or_default();
    let y_grad = y.grad().map(|g| g.item()).transpose()?.unwrap_or_default();
    println!("x.grad = {}", x_grad);
    println!("y.grad = {}", y_grad);

    println!("\n--- Verification ---");
    println!("Expected x.grad (y value): {}", y.item()?);
    println!("Expected y.grad (x value): {}", x.item()?);
    println!(
        "Gradients match: {}",
        x_grad == y.item()? && y_grad == x.item()?
    );

    Ok(())
}
