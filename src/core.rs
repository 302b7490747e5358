//! Chain plumbing shared by the samplers: the [`MarkovChain`] trait, helpers that
//! drive a chain into a sample matrix, and walker initialisation.

use indicatif::ProgressBar;
use ndarray::Array2;
use rand::Rng;
use rand_distr::StandardNormal;
use std::time::{Duration, Instant};

const UPDATE_INTERVAL: Duration = Duration::from_millis(500);

pub trait MarkovChain {
    /// Does one iteration of the chain, drawing from `rng`, and returns the new current state.
    fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &[f64];

    /// Current state without stepping.
    fn current_state(&self) -> &[f64];

    /// Number of accepted proposals so far. Never decreases.
    fn n_accepted(&self) -> usize;
}

/// Records `n_steps` states of `chain`: row 0 is the current state, each further
/// row is the result of one call to [`MarkovChain::step`].
pub fn run_chain<M, R>(chain: &mut M, n_steps: usize, rng: &mut R) -> Array2<f64>
where
    M: MarkovChain,
    R: Rng + ?Sized,
{
    let dim = chain.current_state().len();
    let mut out = Array2::<f64>::zeros((n_steps, dim));
    if n_steps == 0 {
        return out;
    }
    out.row_mut(0)
        .iter_mut()
        .zip(chain.current_state())
        .for_each(|(o, s)| *o = *s);

    for i in 1..n_steps {
        let state = chain.step(rng);
        out.row_mut(i).iter_mut().zip(state).for_each(|(o, s)| *o = *s);
    }
    out
}

/// Like [`run_chain`], but advances `pb` and shows the running acceptance rate,
/// refreshing at most every 500 ms.
pub fn run_chain_progress<M, R>(
    chain: &mut M,
    n_steps: usize,
    rng: &mut R,
    pb: &ProgressBar,
) -> Array2<f64>
where
    M: MarkovChain,
    R: Rng + ?Sized,
{
    let dim = chain.current_state().len();
    let mut out = Array2::<f64>::zeros((n_steps, dim));
    if n_steps == 0 {
        return out;
    }
    out.row_mut(0)
        .iter_mut()
        .zip(chain.current_state())
        .for_each(|(o, s)| *o = *s);

    pb.set_length(n_steps as u64);
    let mut last_update = Instant::now();
    for i in 1..n_steps {
        let state = chain.step(rng);
        out.row_mut(i).iter_mut().zip(state).for_each(|(o, s)| *o = *s);

        if last_update.elapsed() >= UPDATE_INTERVAL || i + 1 == n_steps {
            let accept_rate = chain.n_accepted() as f64 / i as f64;
            pb.set_position(i as u64 + 1);
            pb.set_message(format!("AcceptRate={:.3}", accept_rate));
            last_update = Instant::now();
        }
    }
    out
}

/**
Spreads `n_walkers` starting points in a small Gaussian ball around `center`:
`center + spread * z`, one standard normal per coordinate.

# Examples

```rust
use mh_fit::core::init_ball;
use rand::rngs::SmallRng;
use rand::SeedableRng;

let mut rng = SmallRng::seed_from_u64(42);
let starts = init_ball(&[1.0, 0.0], 1e-4, 8, &mut rng);
assert_eq!(starts.len(), 8);
assert!(starts.iter().all(|s| (s[0] - 1.0).abs() < 1e-2));
```
*/
pub fn init_ball<R: Rng + ?Sized>(
    center: &[f64],
    spread: f64,
    n_walkers: usize,
    rng: &mut R,
) -> Vec<Vec<f64>> {
    (0..n_walkers)
        .map(|_| {
            center
                .iter()
                .map(|c| {
                    let z: f64 = rng.sample(StandardNormal);
                    c + spread * z
                })
                .collect()
        })
        .collect()
}
