/*!
# Acceptance Rules

One step of either sampler is *propose → evaluate → accept/reject*. The two
ways of evaluating and deciding are the variants of [`Criterion`], picked when the
sampler is configured:

- [`Criterion::Likelihood`]: the Metropolis–Hastings test on chi-square values. The
  candidate is accepted with probability `min(1, exp(-(chi2' - chi2) / 2))`.
- [`Criterion::LikelihoodFree`]: the Marjoram ABC test. A synthetic dataset is simulated
  at the candidate and the candidate is accepted iff the summary distance to the observed
  data is at most the tolerance `h`. The current state's distance plays no role.

The random draws of a step happen in a fixed order: the proposal first, then the
acceptance draw (one uniform for the exact test, one simulated dataset for the
likelihood-free test).
*/

use rand::Rng;

use crate::discrepancy::{chi_square, summary_distance, Summary};
use crate::distributions::{NormalSimulator, Proposal, Simulator};
use crate::error::{ConfigError, Result};
use crate::model::{Linear, Model};
use crate::observation::Observation;

/// Acceptance probability `min(1, exp(-(chi2_proposed - chi2_current) / 2))`.
///
/// Underflow to `0.0` and NaN (from non-finite chi-square values) both give `0.0`.
pub fn acceptance_probability(chi2_current: f64, chi2_proposed: f64) -> f64 {
    let relative_likelihood = (-0.5 * (chi2_proposed - chi2_current)).exp();
    if relative_likelihood.is_nan() {
        0.0
    } else {
        relative_likelihood.min(1.0)
    }
}

/// Metropolis–Hastings decision for a uniform draw `u` in `[0, 1)`: accept iff
/// `u <= alpha`. A zero acceptance probability always rejects, even for `u == 0`.
pub fn metropolis_accept(chi2_current: f64, chi2_proposed: f64, u: f64) -> bool {
    let alpha = acceptance_probability(chi2_current, chi2_proposed);
    alpha > 0.0 && u <= alpha
}

/// Likelihood-free decision: accept iff `rho <= tolerance`.
pub fn within_tolerance(rho: f64, tolerance: f64) -> bool {
    rho <= tolerance
}

/// How candidates are scored and accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion<M = Linear, S = NormalSimulator> {
    /// Exact likelihood through the chi-square of a deterministic model.
    Likelihood { model: M, observation: Observation },
    /// Approximate, simulation-based acceptance within a tolerance.
    LikelihoodFree {
        simulator: S,
        /// Summary statistics of the observed data.
        reference: Summary,
        /// Size of each simulated dataset.
        n_draws: usize,
        /// Tolerance `h`.
        tolerance: f64,
    },
}

impl<M: Model> Criterion<M> {
    /// Exact Metropolis–Hastings criterion for `model` against `observation`.
    pub fn likelihood(model: M, observation: Observation) -> Self {
        Criterion::Likelihood { model, observation }
    }
}

impl<S: Simulator> Criterion<Linear, S> {
    /**
    Likelihood-free criterion. Each simulated dataset has as many points as `observed`.

    # Errors

    Fails if `observed` is empty or non-finite, or if `tolerance` is negative or non-finite.

    # Examples

    ```rust
    use mh_fit::acceptance::Criterion;
    use mh_fit::distributions::NormalSimulator;

    let observed = [0.3, -1.2, 0.8, 1.9, -0.4];
    let criterion = Criterion::likelihood_free(NormalSimulator, &observed, 0.1).unwrap();
    assert!(matches!(criterion, Criterion::LikelihoodFree { n_draws: 5, .. }));
    ```
    */
    pub fn likelihood_free(simulator: S, observed: &[f64], tolerance: f64) -> Result<Self> {
        let criterion = Criterion::LikelihoodFree {
            simulator,
            reference: Summary::of(observed)?,
            n_draws: observed.len(),
            tolerance,
        };
        criterion.validate_settings()?;
        Ok(criterion)
    }
}

impl<M: Model, S: Simulator> Criterion<M, S> {
    fn validate_settings(&self) -> std::result::Result<(), ConfigError> {
        if let Criterion::LikelihoodFree {
            n_draws, tolerance, ..
        } = self
        {
            if !(tolerance.is_finite() && *tolerance >= 0.0) {
                return Err(ConfigError::InvalidTolerance(*tolerance));
            }
            if *n_draws == 0 {
                return Err(ConfigError::ZeroDraws);
            }
        }
        Ok(())
    }

    /// Checks the criterion's settings and that parameter vectors of length `dim`
    /// fit the model or simulator.
    pub fn validate(&self, dim: usize) -> std::result::Result<(), ConfigError> {
        self.validate_settings()?;
        if dim == 0 {
            return Err(ConfigError::EmptyParameters);
        }
        let expected = match self {
            Criterion::Likelihood { model, .. } => model.dim(),
            Criterion::LikelihoodFree { simulator, .. } => simulator.dim(),
        };
        match expected {
            Some(expected) if expected != dim => Err(ConfigError::DimensionMismatch {
                expected,
                found: dim,
            }),
            _ => Ok(()),
        }
    }

    /// Checks a starting vector: every entry finite and, for the exact criterion, a model
    /// output with one value per data point.
    pub fn validate_start(&self, theta: &[f64]) -> std::result::Result<(), ConfigError> {
        if let Some(index) = theta.iter().position(|t| !t.is_finite()) {
            return Err(ConfigError::NonFiniteParameter { index });
        }
        if let Criterion::Likelihood { model, observation } = self {
            let found = model.evaluate(theta, observation.x()).len();
            if found != observation.len() {
                return Err(ConfigError::ModelOutputLength {
                    expected: observation.len(),
                    found,
                });
            }
        }
        Ok(())
    }

    /**
    Performs one propose/evaluate/decide step from `theta`.

    Returns the next state and the updated acceptance count: the candidate and
    `n_accepted + 1` if it was accepted, otherwise a copy of `theta` and `n_accepted`.
    */
    pub fn advance<Q, R>(
        &self,
        theta: &[f64],
        proposal: &Q,
        rng: &mut R,
        n_accepted: usize,
    ) -> (Vec<f64>, usize)
    where
        Q: Proposal + ?Sized,
        R: Rng + ?Sized,
    {
        let proposed = proposal.propose(theta, rng);
        let accepted = match self {
            Criterion::Likelihood { model, observation } => {
                let chi2_current = chi_square(model, theta, observation);
                let chi2_proposed = chi_square(model, &proposed, observation);
                let u: f64 = rng.gen();
                metropolis_accept(chi2_current, chi2_proposed, u)
            }
            Criterion::LikelihoodFree {
                simulator,
                reference,
                n_draws,
                tolerance,
            } => {
                let rho = summary_distance(simulator, &proposed, reference, *n_draws, rng);
                within_tolerance(rho, *tolerance)
            }
        };
        if accepted {
            (proposed, n_accepted + 1)
        } else {
            (theta.to_vec(), n_accepted)
        }
    }
}
