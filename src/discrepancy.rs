/*!
Mismatch measures between parameters and observed data.

- [`chi_square`]: exact, deterministic sum of squared, error-weighted residuals.
- [`summary_distance`]: approximate, stochastic distance between summary statistics of a
  freshly simulated dataset and those of the observed data. Two calls with the same
  `theta` generally return different values; the likelihood-free criterion relies on this.
*/

use rand::Rng;

use crate::distributions::Simulator;
use crate::error::ObservationError;
use crate::model::Model;
use crate::observation::Observation;

/**
Computes `sum_i ((model(theta, x)[i] - y[i]) / yerr[i])^2`.

Positivity of the uncertainties is guaranteed by [`Observation::new`]. A model output
whose length differs from the number of data points gives `f64::INFINITY`.

# Examples

```rust
use mh_fit::discrepancy::chi_square;
use mh_fit::model::Linear;
use mh_fit::observation::Observation;

let obs = Observation::new(vec![0.0, 1.0], vec![1.0, 1.0], vec![1.0, 0.5]).unwrap();
// residuals for y = 0 * x + 0 are -1 and -1, weighted by 1 and 0.5
assert_eq!(chi_square(&Linear, &[0.0, 0.0], &obs), 5.0);
```
*/
pub fn chi_square<M: Model + ?Sized>(model: &M, theta: &[f64], observation: &Observation) -> f64 {
    let predicted = model.evaluate(theta, observation.x());
    if predicted.len() != observation.len() {
        return f64::INFINITY;
    }
    predicted
        .iter()
        .zip(observation.y())
        .zip(observation.yerr())
        .map(|((m, y), e)| ((m - y) / e).powi(2))
        .sum()
}

/// Mean and population standard deviation of a dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub mean: f64,
    pub std: f64,
}

impl Summary {
    /// Summarises `data`. Uses the population (`1 / n`) standard deviation.
    ///
    /// # Errors
    ///
    /// Returns [`ObservationError::EmptyDataset`] for empty input and
    /// [`ObservationError::NonFinite`] if any value is NaN or infinite.
    pub fn of(data: &[f64]) -> Result<Self, ObservationError> {
        if data.is_empty() {
            return Err(ObservationError::EmptyDataset);
        }
        if let Some(index) = data.iter().position(|d| !d.is_finite()) {
            return Err(ObservationError::NonFinite { index });
        }
        Ok(Self::of_unchecked(data))
    }

    fn of_unchecked(data: &[f64]) -> Self {
        let n = data.len() as f64;
        let mean = data.iter().sum::<f64>() / n;
        let var = data.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n;
        Self {
            mean,
            std: var.sqrt(),
        }
    }

    /// Euclidean distance in (mean, std) space.
    pub fn distance(&self, other: &Summary) -> f64 {
        (self.mean - other.mean).hypot(self.std - other.std)
    }
}

/**
Simulates `n_draws` points at `theta` and returns the distance between their
[`Summary`] and `reference`.

Parameters outside the simulator's support give `f64::INFINITY`, which no finite
tolerance accepts.
*/
pub fn summary_distance<S, R>(
    simulator: &S,
    theta: &[f64],
    reference: &Summary,
    n_draws: usize,
    rng: &mut R,
) -> f64
where
    S: Simulator + ?Sized,
    R: Rng + ?Sized,
{
    match simulator.simulate(theta, n_draws, rng) {
        Some(data) if !data.is_empty() => Summary::of_unchecked(&data).distance(reference),
        _ => f64::INFINITY,
    }
}
