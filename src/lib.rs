/*!
# mh-fit

A compact library for Markov chain Monte Carlo parameter estimation with the
Metropolis–Hastings algorithm, in an exact (chi-square likelihood) and a
likelihood-free (approximate Bayesian computation) flavour.

- [`model`]: deterministic models `y = f(theta, x)`.
- [`observation`]: validated observed data.
- [`discrepancy`]: chi-square and summary-statistic distances.
- [`distributions`]: proposals and data simulators.
- [`acceptance`]: the two acceptance rules, as the [`Criterion`](acceptance::Criterion) enum.
- [`metropolis_hastings`]: single-chain and ensemble drivers.
- [`stats`]: autocorrelation, effective sample size and moments of the output.

## Example

```rust
use mh_fit::acceptance::Criterion;
use mh_fit::distributions::IsotropicGaussian;
use mh_fit::metropolis_hastings::MetropolisHastings;
use mh_fit::model::Linear;
use mh_fit::observation::Observation;

let x = vec![0.0, 1.0, 2.0, 3.0, 4.0];
let y = vec![0.9, 3.1, 4.9, 7.2, 8.8];
let obs = Observation::new(x, y, vec![0.2; 5]).unwrap();

let mut mh = MetropolisHastings::new(Criterion::likelihood(Linear, obs), IsotropicGaussian::new(0.05))
    .set_seed(42);
let run = mh.run(&[1.0, 0.0], 5_000).unwrap();

let kept = run.discard(1_000);
let slope = kept.column(0).mean().unwrap();
assert!((slope - 2.0).abs() < 0.2);
```
*/

pub mod acceptance;
pub mod core;
pub mod discrepancy;
pub mod distributions;
pub mod error;
#[cfg(feature = "csv")]
pub mod io;
pub mod metropolis_hastings;
pub mod model;
pub mod observation;
pub mod stats;

pub use error::{Result, SamplerError};
