/*!
Deterministic models `y = f(theta, x)` fitted by the exact (chi-square) criterion.

The samplers only rely on the [`Model`] trait, so any pure function of the
parameters and the independent variable can be plugged in. A two-parameter
straight line is provided as [`Linear`], and closures of the form
`Fn(&[f64], &[f64]) -> Vec<f64>` implement the trait directly.

# Examples

```rust
use mh_fit::model::{Linear, Model};

let y = Linear.evaluate(&[2.0, 1.0], &[0.0, 1.0, 2.0]);
assert_eq!(y, vec![1.0, 3.0, 5.0]);

let quadratic = |theta: &[f64], x: &[f64]| -> Vec<f64> {
    x.iter().map(|xi| theta[0] * xi * xi).collect()
};
assert_eq!(quadratic.evaluate(&[3.0], &[2.0]), vec![12.0]);
```
*/

/// A pure, deterministic function of parameters `theta` and independent variable `x`.
pub trait Model {
    /// Evaluates the model at every point of `x`. The output has the same length as `x`.
    fn evaluate(&self, theta: &[f64], x: &[f64]) -> Vec<f64>;

    /// Number of parameters the model expects, if fixed.
    ///
    /// Samplers use this to reject mis-sized initial vectors before sampling.
    fn dim(&self) -> Option<usize> {
        None
    }
}

/// The affine model `y = theta[0] * x + theta[1]` (slope, intercept).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Linear;

impl Model for Linear {
    fn evaluate(&self, theta: &[f64], x: &[f64]) -> Vec<f64> {
        let (slope, intercept) = (theta[0], theta[1]);
        x.iter().map(|xi| slope * xi + intercept).collect()
    }

    fn dim(&self) -> Option<usize> {
        Some(2)
    }
}

impl<F> Model for F
where
    F: Fn(&[f64], &[f64]) -> Vec<f64>,
{
    fn evaluate(&self, theta: &[f64], x: &[f64]) -> Vec<f64> {
        self(theta, x)
    }
}
