/*!
Random building blocks of the samplers: proposal distributions that perturb the
current parameter vector, and simulators that draw synthetic datasets for the
likelihood-free criterion.

Neither type owns a random number generator. Every draw goes through the `rng`
argument, so one seeded stream can drive a whole run and be replayed exactly.

# Examples

```rust
use mh_fit::distributions::{IsotropicGaussian, NormalSimulator, Proposal, Simulator};
use rand::rngs::SmallRng;
use rand::SeedableRng;

let mut rng = SmallRng::seed_from_u64(42);

let proposal = IsotropicGaussian::new(0.5);
let candidate = proposal.propose(&[1.0, 2.0], &mut rng);
assert_eq!(candidate.len(), 2);

let data = NormalSimulator.simulate(&[0.0, 1.0], 100, &mut rng).unwrap();
assert_eq!(data.len(), 100);
```
*/

use rand::Rng;
use rand_distr::StandardNormal;

use crate::error::ConfigError;

/// A trait for generating candidate states from the current one.
pub trait Proposal {
    /// Draws a candidate `theta'` given the current `theta`.
    ///
    /// Must return a fresh vector of the same length and must not touch `theta`.
    fn propose<R: Rng + ?Sized>(&self, theta: &[f64], rng: &mut R) -> Vec<f64>;

    /// Checks the proposal's own parameters. Called once at sampler entry.
    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

/**
An isotropic Gaussian random-walk proposal: `theta' = theta + scale * z` with
`z` a vector of independent standard normal draws, one per dimension.

`scale` is the step size. The sampler does not tune it; as a rule of thumb aim for an
acceptance rate around 0.45 in one dimension and lower (down to roughly 0.23) as the
dimension grows. A scale of zero is allowed and makes every candidate equal to the
current state, although the normal draws are still consumed.
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsotropicGaussian {
    pub scale: f64,
}

impl IsotropicGaussian {
    /// Creates a new isotropic Gaussian proposal with the given step size.
    pub fn new(scale: f64) -> Self {
        Self { scale }
    }
}

impl Proposal for IsotropicGaussian {
    fn propose<R: Rng + ?Sized>(&self, theta: &[f64], rng: &mut R) -> Vec<f64> {
        theta
            .iter()
            .map(|t| {
                let z: f64 = rng.sample(StandardNormal);
                t + self.scale * z
            })
            .collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scale.is_finite() && self.scale >= 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidScale(self.scale))
        }
    }
}

/// A generative model for the likelihood-free criterion: draws a synthetic dataset
/// of `n` points given parameters `theta`.
pub trait Simulator {
    /// Returns `None` when `theta` lies outside the simulator's support. In that
    /// case no random draws are consumed.
    fn simulate<R: Rng + ?Sized>(&self, theta: &[f64], n: usize, rng: &mut R)
        -> Option<Vec<f64>>;

    /// Number of parameters the simulator expects, if fixed.
    fn dim(&self) -> Option<usize> {
        None
    }
}

/// Draws `n` samples from a normal distribution with mean `theta[0]` and standard
/// deviation `theta[1]`. A negative or non-finite standard deviation is outside the
/// support.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NormalSimulator;

impl Simulator for NormalSimulator {
    fn simulate<R: Rng + ?Sized>(
        &self,
        theta: &[f64],
        n: usize,
        rng: &mut R,
    ) -> Option<Vec<f64>> {
        let (mean, std) = (theta[0], theta[1]);
        if !(mean.is_finite() && std.is_finite() && std >= 0.0) {
            return None;
        }
        Some(
            (0..n)
                .map(|_| {
                    let z: f64 = rng.sample(StandardNormal);
                    mean + std * z
                })
                .collect(),
        )
    }

    fn dim(&self) -> Option<usize> {
        Some(2)
    }
}
