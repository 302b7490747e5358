/*!
# Metropolis–Hastings Chain Driver

Runs the propose → evaluate → accept/reject loop of an [`Criterion`] either for a
single chain or for an ensemble of independent walkers, and records every state.

## Overview

- **Free functions** [`sample_chain`] and [`sample_ensemble`] take the random source
  explicitly. Given the same seeded `rng` they reproduce a run exactly.
- **[`MetropolisHastings`]** bundles a criterion, a proposal and a seeded [`SmallRng`],
  mirroring the other samplers of this crate. Besides the single-stream runners it offers
  [`MetropolisHastings::run_parallel`] and [`MetropolisHastings::run_progress`], which evolve
  walkers on separate threads with one random stream per walker.

Every chain has exactly `n_steps` rows and row 0 is the initial vector. Row `i > 0` is
either a copy of row `i - 1` (rejected) or the accepted candidate drawn from it.

## Acceptance rate convention

[`ChainRun::acceptance_rate`] divides the number of accepted proposals by `n_steps`,
although only `n_steps - 1` proposals are made. This keeps results comparable with
earlier analyses. [`ChainRun::proposal_acceptance_rate`] divides by the number of
proposals actually attempted.

## Example Usage

```rust
use mh_fit::acceptance::Criterion;
use mh_fit::distributions::IsotropicGaussian;
use mh_fit::metropolis_hastings::MetropolisHastings;
use mh_fit::model::Linear;
use mh_fit::observation::Observation;

let obs = Observation::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0], vec![1.0; 3]).unwrap();
let mut mh = MetropolisHastings::new(Criterion::likelihood(Linear, obs), IsotropicGaussian::new(0.0))
    .set_seed(42);

let run = mh.run(&[1.0, 0.0], 2).unwrap();
assert_eq!(run.samples, ndarray::arr2(&[[1.0, 0.0], [1.0, 0.0]]));
assert_eq!(run.proposal_acceptance_rate(), 1.0);
```
*/

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use ndarray::{aview1, s, Array2, Array3, ArrayView2, ArrayView3, Axis};
use rand::prelude::*;
use rayon::prelude::*;

use crate::acceptance::Criterion;
use crate::core::{run_chain, run_chain_progress, MarkovChain};
use crate::distributions::{IsotropicGaussian, NormalSimulator, Proposal, Simulator};
use crate::error::{ConfigError, Result};
use crate::model::{Linear, Model};

/// Acceptance rates outside this band usually mean `scale` needs re-tuning.
const TUNING_BAND: (f64, f64) = (0.1, 0.7);

/// A single Metropolis–Hastings walker borrowing its criterion and proposal.
#[derive(Debug, Clone)]
pub struct MHChain<'a, M, S, Q> {
    criterion: &'a Criterion<M, S>,
    proposal: &'a Q,
    current_state: Vec<f64>,
    n_accepted: usize,
}

impl<'a, M, S, Q> MHChain<'a, M, S, Q> {
    /// Creates a walker positioned at `initial_state` with a zero acceptance count.
    pub fn new(criterion: &'a Criterion<M, S>, proposal: &'a Q, initial_state: &[f64]) -> Self {
        Self {
            criterion,
            proposal,
            current_state: initial_state.to_vec(),
            n_accepted: 0,
        }
    }
}

impl<M, S, Q> MarkovChain for MHChain<'_, M, S, Q>
where
    M: Model,
    S: Simulator,
    Q: Proposal,
{
    fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &[f64] {
        let (next, n_accepted) = self.criterion.advance(
            &self.current_state,
            self.proposal,
            rng,
            self.n_accepted,
        );
        self.current_state = next;
        self.n_accepted = n_accepted;
        &self.current_state
    }

    fn current_state(&self) -> &[f64] {
        &self.current_state
    }

    fn n_accepted(&self) -> usize {
        self.n_accepted
    }
}

/// The output of a single-chain run.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainRun {
    /// `n_steps × dim` matrix of states; row 0 is the initial vector.
    pub samples: Array2<f64>,
    /// Number of accepted proposals.
    pub n_accepted: usize,
}

impl ChainRun {
    pub fn n_steps(&self) -> usize {
        self.samples.nrows()
    }

    /// Accepted proposals divided by `n_steps`.
    pub fn acceptance_rate(&self) -> f64 {
        self.n_accepted as f64 / self.n_steps() as f64
    }

    /// Accepted proposals divided by the `n_steps - 1` proposals attempted.
    /// Zero when no proposal was made.
    pub fn proposal_acceptance_rate(&self) -> f64 {
        match self.n_steps() {
            0 | 1 => 0.0,
            n => self.n_accepted as f64 / (n - 1) as f64,
        }
    }

    /// The chain without its first `burn_in` states.
    pub fn discard(&self, burn_in: usize) -> ArrayView2<'_, f64> {
        let start = burn_in.min(self.n_steps());
        self.samples.slice(s![start.., ..])
    }
}

/// The output of an ensemble run.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleRun {
    /// `n_walkers × n_steps × dim` array; `samples[[j, 0, ..]]` is walker `j`'s initial vector.
    pub samples: Array3<f64>,
    /// Accepted proposals per walker.
    pub walker_accepted: Vec<usize>,
}

impl EnsembleRun {
    pub fn n_walkers(&self) -> usize {
        self.samples.len_of(Axis(0))
    }

    pub fn n_steps(&self) -> usize {
        self.samples.len_of(Axis(1))
    }

    /// Total accepted proposals over all walkers.
    pub fn n_accepted(&self) -> usize {
        self.walker_accepted.iter().sum()
    }

    /// Accepted proposals divided by `n_steps * n_walkers`.
    pub fn acceptance_rate(&self) -> f64 {
        self.n_accepted() as f64 / (self.n_steps() * self.n_walkers()) as f64
    }

    /// Accepted proposals divided by the `(n_steps - 1) * n_walkers` proposals attempted.
    pub fn proposal_acceptance_rate(&self) -> f64 {
        match self.n_steps() {
            0 | 1 => 0.0,
            n => self.n_accepted() as f64 / ((n - 1) * self.n_walkers()) as f64,
        }
    }

    /// The chain of walker `j`.
    pub fn walker(&self, j: usize) -> ArrayView2<'_, f64> {
        self.samples.index_axis(Axis(0), j)
    }

    /// All walkers without their first `burn_in` states.
    pub fn discard(&self, burn_in: usize) -> ArrayView3<'_, f64> {
        let start = burn_in.min(self.n_steps());
        self.samples.slice(s![.., start.., ..])
    }

    /// Pools the post-burn-in states of all walkers into one `(n_walkers * kept) × dim` matrix,
    /// walker by walker.
    pub fn flat(&self, burn_in: usize) -> Array2<f64> {
        let kept = self.discard(burn_in);
        let (n_walkers, n_kept, dim) = kept.dim();
        let mut out = Array2::<f64>::zeros((n_walkers * n_kept, dim));
        for (j, walker) in kept.outer_iter().enumerate() {
            out.slice_mut(s![j * n_kept..(j + 1) * n_kept, ..])
                .assign(&walker);
        }
        out
    }
}

fn check_run<M, S, Q>(
    criterion: &Criterion<M, S>,
    proposal: &Q,
    n_steps: usize,
    dim: usize,
) -> Result<()>
where
    M: Model,
    S: Simulator,
    Q: Proposal,
{
    if n_steps == 0 {
        return Err(ConfigError::ZeroSteps.into());
    }
    proposal.validate()?;
    criterion.validate(dim)?;
    Ok(())
}

fn check_starts<M, S, T>(criterion: &Criterion<M, S>, init_thetas: &[T]) -> Result<()>
where
    M: Model,
    S: Simulator,
    T: AsRef<[f64]>,
{
    for theta in init_thetas {
        criterion.validate_start(theta.as_ref())?;
    }
    Ok(())
}

fn check_walkers<T: AsRef<[f64]>>(init_thetas: &[T]) -> Result<usize> {
    let first = init_thetas.first().ok_or(ConfigError::NoWalkers)?;
    let dim = first.as_ref().len();
    if let Some(bad) = init_thetas.iter().find(|t| t.as_ref().len() != dim) {
        return Err(ConfigError::DimensionMismatch {
            expected: dim,
            found: bad.as_ref().len(),
        }
        .into());
    }
    Ok(dim)
}

fn report(kind: &str, rate: f64) {
    log::info!("{kind} run finished: acceptance rate {rate:.3}");
    if !(TUNING_BAND.0..=TUNING_BAND.1).contains(&rate) {
        log::warn!(
            "{kind} acceptance rate {rate:.3} is outside [{}, {}]; consider re-tuning the proposal scale",
            TUNING_BAND.0,
            TUNING_BAND.1
        );
    }
}

/**
Runs a single chain of `n_steps` states starting at `init_theta`.

Draws come from `rng` in a fixed order: per step the proposal, then the acceptance draw.

# Errors

Fails before drawing anything if `n_steps` is zero, the proposal or criterion settings are
invalid, `init_theta` has a non-finite entry, or it does not fit the model/simulator
(wrong dimension, or a model output of the wrong length).
*/
pub fn sample_chain<M, S, Q, R>(
    criterion: &Criterion<M, S>,
    proposal: &Q,
    init_theta: &[f64],
    n_steps: usize,
    rng: &mut R,
) -> Result<ChainRun>
where
    M: Model,
    S: Simulator,
    Q: Proposal,
    R: Rng + ?Sized,
{
    check_run(criterion, proposal, n_steps, init_theta.len())?;
    check_starts(criterion, &[init_theta])?;
    log::debug!("sampling chain: n_steps={n_steps}, dim={}", init_theta.len());

    let mut chain = MHChain::new(criterion, proposal, init_theta);
    let samples = run_chain(&mut chain, n_steps, rng);
    let run = ChainRun {
        samples,
        n_accepted: chain.n_accepted(),
    };
    report("chain", run.acceptance_rate());
    Ok(run)
}

/**
Runs an ensemble of independent walkers from one random stream.

For each step `i` in `1..n_steps`, walkers are advanced in index order `0..n_walkers`, each
from its own previous state. Walkers never see each other's state, so the loop order only
matters for which draws of `rng` each walker consumes. With a single walker the result is
identical to [`sample_chain`] on the same stream.

# Errors

As [`sample_chain`], plus an error for an empty `init_thetas` or walkers of differing dimension.
*/
pub fn sample_ensemble<M, S, Q, R, T>(
    criterion: &Criterion<M, S>,
    proposal: &Q,
    init_thetas: &[T],
    n_steps: usize,
    rng: &mut R,
) -> Result<EnsembleRun>
where
    M: Model,
    S: Simulator,
    Q: Proposal,
    R: Rng + ?Sized,
    T: AsRef<[f64]>,
{
    let dim = check_walkers(init_thetas)?;
    check_run(criterion, proposal, n_steps, dim)?;
    check_starts(criterion, init_thetas)?;
    let n_walkers = init_thetas.len();
    log::debug!("sampling ensemble: n_walkers={n_walkers}, n_steps={n_steps}, dim={dim}");

    let mut walkers: Vec<_> = init_thetas
        .iter()
        .map(|theta| MHChain::new(criterion, proposal, theta.as_ref()))
        .collect();

    let mut samples = Array3::<f64>::zeros((n_walkers, n_steps, dim));
    for (j, walker) in walkers.iter().enumerate() {
        samples
            .slice_mut(s![j, 0, ..])
            .assign(&aview1(walker.current_state()));
    }
    for i in 1..n_steps {
        for (j, walker) in walkers.iter_mut().enumerate() {
            let state = walker.step(rng);
            samples.slice_mut(s![j, i, ..]).assign(&aview1(state));
        }
    }

    let run = EnsembleRun {
        samples,
        walker_accepted: walkers.iter().map(|w| w.n_accepted()).collect(),
    };
    report("ensemble", run.acceptance_rate());
    Ok(run)
}

fn stack_walkers(chains: Vec<(Array2<f64>, usize)>, n_steps: usize, dim: usize) -> EnsembleRun {
    let mut samples = Array3::<f64>::zeros((chains.len(), n_steps, dim));
    let mut walker_accepted = Vec::with_capacity(chains.len());
    for (j, (chain, accepted)) in chains.into_iter().enumerate() {
        samples.index_axis_mut(Axis(0), j).assign(&chain);
        walker_accepted.push(accepted);
    }
    EnsembleRun {
        samples,
        walker_accepted,
    }
}

/**
The Metropolis–Hastings sampler: a [`Criterion`], a [`Proposal`] and a seeded random stream.

# Type Parameters
- `M`: the model of the exact criterion. Must implement [`Model`].
- `S`: the simulator of the likelihood-free criterion. Must implement [`Simulator`].
- `Q`: the proposal distribution. Must implement [`Proposal`].

# Examples

```rust
use mh_fit::acceptance::Criterion;
use mh_fit::distributions::{IsotropicGaussian, NormalSimulator};
use mh_fit::metropolis_hastings::MetropolisHastings;

let observed = [4.8, 5.3, 5.1, 4.6, 5.2, 4.9, 5.0, 5.4];
let criterion = Criterion::likelihood_free(NormalSimulator, &observed, 0.3).unwrap();
let mut mh = MetropolisHastings::new(criterion, IsotropicGaussian::new(0.1)).set_seed(7);

let run = mh.run_ensemble(&[[5.0, 0.3], [5.0, 0.3]], 100).unwrap();
assert_eq!(run.n_walkers(), 2);
assert_eq!(run.n_steps(), 100);
assert!((0.0..=1.0).contains(&run.acceptance_rate()));
```
*/
#[derive(Debug, Clone)]
pub struct MetropolisHastings<M = Linear, S = NormalSimulator, Q = IsotropicGaussian> {
    /// How candidates are scored and accepted.
    pub criterion: Criterion<M, S>,
    /// The proposal distribution used to generate candidate states.
    pub proposal: Q,
    /// The global random seed.
    pub seed: u64,
    /// The random stream of the single-stream runners.
    pub rng: SmallRng,
}

impl<M, S, Q> MetropolisHastings<M, S, Q>
where
    M: Model,
    S: Simulator,
    Q: Proposal,
{
    /// Creates a sampler with a random seed. Use [`set_seed`](Self::set_seed) for
    /// reproducible runs.
    pub fn new(criterion: Criterion<M, S>, proposal: Q) -> Self {
        let seed = thread_rng().gen::<u64>();
        Self {
            criterion,
            proposal,
            seed,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /**
    Sets a new global seed and restarts the random stream from it.

    The parallel runners seed walker `j` with `seed + j`.

    # Examples

    ```rust
    use mh_fit::acceptance::Criterion;
    use mh_fit::distributions::IsotropicGaussian;
    use mh_fit::metropolis_hastings::MetropolisHastings;
    use mh_fit::model::Linear;
    use mh_fit::observation::Observation;

    let obs = Observation::new(vec![0.0, 1.0], vec![0.0, 1.0], vec![0.5, 0.5]).unwrap();
    let criterion = Criterion::likelihood(Linear, obs);
    let mut a = MetropolisHastings::new(criterion.clone(), IsotropicGaussian::new(0.2)).set_seed(42);
    let mut b = MetropolisHastings::new(criterion, IsotropicGaussian::new(0.2)).set_seed(42);
    assert_eq!(a.run(&[1.0, 0.0], 50).unwrap(), b.run(&[1.0, 0.0], 50).unwrap());
    ```
    */
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Runs a single chain from `init_theta` on the sampler's stream. See [`sample_chain`].
    pub fn run(&mut self, init_theta: &[f64], n_steps: usize) -> Result<ChainRun> {
        sample_chain(
            &self.criterion,
            &self.proposal,
            init_theta,
            n_steps,
            &mut self.rng,
        )
    }

    /// Runs an ensemble on the sampler's single stream. See [`sample_ensemble`].
    pub fn run_ensemble<T: AsRef<[f64]>>(
        &mut self,
        init_thetas: &[T],
        n_steps: usize,
    ) -> Result<EnsembleRun> {
        sample_ensemble(
            &self.criterion,
            &self.proposal,
            init_thetas,
            n_steps,
            &mut self.rng,
        )
    }
}

impl<M, S, Q> MetropolisHastings<M, S, Q>
where
    M: Model + Sync,
    S: Simulator + Sync,
    Q: Proposal + Sync,
{
    /**
    Runs every walker on its own thread with its own random stream, seeded `seed + j`
    for walker `j`.

    Walkers stay statistically independent, but the output is not bit-identical to
    [`run_ensemble`](Self::run_ensemble), which interleaves all walkers on one stream.
    The sampler's own stream is left untouched.
    */
    pub fn run_parallel<T>(&self, init_thetas: &[T], n_steps: usize) -> Result<EnsembleRun>
    where
        T: AsRef<[f64]> + Sync,
    {
        let dim = check_walkers(init_thetas)?;
        check_run(&self.criterion, &self.proposal, n_steps, dim)?;
        check_starts(&self.criterion, init_thetas)?;
        log::debug!(
            "sampling {} walkers in parallel: n_steps={n_steps}, dim={dim}",
            init_thetas.len()
        );

        let chains: Vec<(Array2<f64>, usize)> = init_thetas
            .par_iter()
            .enumerate()
            .map(|(j, theta)| {
                let mut rng = SmallRng::seed_from_u64(self.seed.wrapping_add(j as u64));
                let mut chain = MHChain::new(&self.criterion, &self.proposal, theta.as_ref());
                let samples = run_chain(&mut chain, n_steps, &mut rng);
                (samples, chain.n_accepted())
            })
            .collect();

        let run = stack_walkers(chains, n_steps, dim);
        report("parallel ensemble", run.acceptance_rate());
        Ok(run)
    }

    /// Same as [`run_parallel`](Self::run_parallel), with one progress bar per walker
    /// showing its running acceptance rate.
    pub fn run_progress<T>(&self, init_thetas: &[T], n_steps: usize) -> Result<EnsembleRun>
    where
        T: AsRef<[f64]> + Sync,
    {
        let dim = check_walkers(init_thetas)?;
        check_run(&self.criterion, &self.proposal, n_steps, dim)?;
        check_starts(&self.criterion, init_thetas)?;

        let multi = MultiProgress::new();
        let pb_style = ProgressStyle::default_bar()
            .template("{prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");

        let chains: Vec<(Array2<f64>, usize)> = init_thetas
            .par_iter()
            .enumerate()
            .map(|(j, theta)| {
                let pb = multi.add(ProgressBar::new(n_steps as u64));
                pb.set_prefix(format!("Walker {j}"));
                pb.set_style(pb_style.clone());

                let mut rng = SmallRng::seed_from_u64(self.seed.wrapping_add(j as u64));
                let mut chain = MHChain::new(&self.criterion, &self.proposal, theta.as_ref());
                let samples = run_chain_progress(&mut chain, n_steps, &mut rng, &pb);

                pb.finish_with_message("Done!");
                (samples, chain.n_accepted())
            })
            .collect();

        let run = stack_walkers(chains, n_steps, dim);
        report("parallel ensemble", run.acceptance_rate());
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ObservationError, SamplerError};
    use crate::observation::Observation;
    use ndarray::arr2;

    fn line_observation() -> Observation {
        Observation::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0], vec![1.0; 3]).unwrap()
    }

    fn exact(scale: f64) -> MetropolisHastings {
        MetropolisHastings::new(
            Criterion::likelihood(Linear, line_observation()),
            IsotropicGaussian::new(scale),
        )
        .set_seed(42)
    }

    #[test]
    fn two_step_zero_scale_scenario() {
        let run = exact(0.0).run(&[1.0, 0.0], 2).unwrap();
        assert_eq!(run.samples, arr2(&[[1.0, 0.0], [1.0, 0.0]]));
        assert_eq!(run.n_accepted, 1);
        assert_eq!(run.proposal_acceptance_rate(), 1.0);
        // accepted / n_steps convention
        assert_eq!(run.acceptance_rate(), 0.5);
    }

    #[test]
    fn zero_scale_exact_chain_accepts_everything() {
        let run = exact(0.0).run(&[0.3, -0.7], 500).unwrap();
        assert_eq!(run.n_accepted, 499);
        assert_eq!(run.proposal_acceptance_rate(), 1.0);
        for row in run.samples.outer_iter() {
            assert_eq!(row.to_vec(), vec![0.3, -0.7]);
        }
    }

    #[test]
    fn chain_has_n_steps_and_starts_at_init() {
        let run = exact(0.5).run(&[2.0, 1.0], 1_000).unwrap();
        assert_eq!(run.n_steps(), 1_000);
        assert_eq!(run.samples.row(0).to_vec(), vec![2.0, 1.0]);
        assert!((0.0..=1.0).contains(&run.acceptance_rate()));
        assert!(run.n_accepted < 1_000);
    }

    #[test]
    fn rows_change_only_on_acceptance() {
        let run = exact(0.5).run(&[2.0, 1.0], 2_000).unwrap();
        let moves = run
            .samples
            .outer_iter()
            .zip(run.samples.outer_iter().skip(1))
            .filter(|(prev, next)| prev != next)
            .count();
        assert_eq!(moves, run.n_accepted);
    }

    #[test]
    fn single_step_chain_makes_no_proposal() {
        let run = exact(0.5).run(&[2.0, 1.0], 1).unwrap();
        assert_eq!(run.samples, arr2(&[[2.0, 1.0]]));
        assert_eq!(run.n_accepted, 0);
        assert_eq!(run.acceptance_rate(), 0.0);
        assert_eq!(run.proposal_acceptance_rate(), 0.0);
    }

    #[test]
    fn acceptance_counter_is_monotone() {
        let criterion = Criterion::likelihood(Linear, line_observation());
        let proposal = IsotropicGaussian::new(0.8);
        let mut chain = MHChain::new(&criterion, &proposal, &[1.0, 0.0]);
        let mut rng = SmallRng::seed_from_u64(3);
        let mut previous = chain.n_accepted();
        for _ in 0..1_000 {
            chain.step(&mut rng);
            let count = chain.n_accepted();
            assert!(count == previous || count == previous + 1);
            previous = count;
        }
    }

    #[test]
    fn invalid_input_fails_before_sampling() {
        let mut mh = exact(0.5);
        assert_eq!(
            mh.run(&[1.0, 0.0], 0),
            Err(SamplerError::InvalidConfiguration(ConfigError::ZeroSteps))
        );
        assert_eq!(
            mh.run(&[1.0, 0.0, 0.0], 10),
            Err(SamplerError::InvalidConfiguration(
                ConfigError::DimensionMismatch {
                    expected: 2,
                    found: 3
                }
            ))
        );
        let mut negative = exact(-1.0);
        assert_eq!(
            negative.run(&[1.0, 0.0], 10),
            Err(SamplerError::InvalidConfiguration(ConfigError::InvalidScale(
                -1.0
            )))
        );
    }

    #[test]
    fn non_finite_or_mis_shaped_start_fails_before_sampling() {
        let mut mh = exact(0.5);
        assert_eq!(
            mh.run(&[f64::NAN, 0.0], 1_000),
            Err(SamplerError::InvalidConfiguration(
                ConfigError::NonFiniteParameter { index: 0 }
            ))
        );
        assert_eq!(
            mh.run_parallel(&[[1.0, 0.0], [1.0, f64::INFINITY]], 10),
            Err(SamplerError::InvalidConfiguration(
                ConfigError::NonFiniteParameter { index: 1 }
            ))
        );

        let obs =
            Observation::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 100.0], vec![1.0; 3]).unwrap();
        let first_only = |theta: &[f64], _x: &[f64]| -> Vec<f64> { vec![theta[0]] };
        let mut short = MetropolisHastings::new(
            Criterion::likelihood(first_only, obs),
            IsotropicGaussian::new(0.1),
        )
        .set_seed(42);
        assert_eq!(
            short.run(&[1.0], 10).map(|_| ()),
            Err(SamplerError::InvalidConfiguration(
                ConfigError::ModelOutputLength {
                    expected: 3,
                    found: 1
                }
            ))
        );
    }

    #[test]
    fn ensemble_rejects_bad_walkers() {
        let mut mh = exact(0.5);
        let empty: Vec<Vec<f64>> = vec![];
        assert_eq!(
            mh.run_ensemble(&empty, 10),
            Err(SamplerError::InvalidConfiguration(ConfigError::NoWalkers))
        );
        let ragged = vec![vec![1.0, 0.0], vec![1.0]];
        assert_eq!(
            mh.run_ensemble(&ragged, 10),
            Err(SamplerError::InvalidConfiguration(
                ConfigError::DimensionMismatch {
                    expected: 2,
                    found: 1
                }
            ))
        );
    }

    #[test]
    fn single_walker_ensemble_matches_single_chain() {
        let chain = exact(0.4).run(&[1.0, 0.0], 300).unwrap();
        let ensemble = exact(0.4).run_ensemble(&[[1.0, 0.0]], 300).unwrap();
        assert_eq!(ensemble.walker(0), chain.samples);
        assert_eq!(ensemble.n_accepted(), chain.n_accepted);
        assert_eq!(ensemble.acceptance_rate(), chain.acceptance_rate());
    }

    #[test]
    fn ensemble_walkers_start_at_their_inits() {
        let inits = [[1.0, 0.0], [0.5, 0.5], [2.0, -1.0]];
        let run = exact(0.3).run_ensemble(&inits, 50).unwrap();
        assert_eq!(run.samples.dim(), (3, 50, 2));
        for (j, init) in inits.iter().enumerate() {
            assert_eq!(run.walker(j).row(0).to_vec(), init.to_vec());
        }
        let expected = run.n_accepted() as f64 / (50.0 * 3.0);
        assert_eq!(run.acceptance_rate(), expected);
    }

    #[test]
    fn parallel_and_progress_runs_agree() {
        let mh = exact(0.3);
        let inits = vec![vec![1.0, 0.0]; 4];
        let parallel = mh.run_parallel(&inits, 200).unwrap();
        let progress = mh.run_progress(&inits, 200).unwrap();
        assert_eq!(parallel, progress);
        assert_eq!(parallel.walker_accepted.len(), 4);
    }

    #[test]
    fn parallel_walker_uses_offset_seed() {
        let mh = exact(0.3);
        let parallel = mh.run_parallel(&[[1.0, 0.0], [1.0, 0.0]], 100).unwrap();
        let mut second = exact(0.3).set_seed(43);
        let alone = second.run(&[1.0, 0.0], 100).unwrap();
        assert_eq!(parallel.walker(1), alone.samples);
    }

    #[test]
    fn likelihood_free_zero_scale_is_not_always_accepted() {
        let observed = [0.2, -1.1, 0.4, 1.7, -0.3, 0.9, -0.6, 0.1];
        let criterion = Criterion::likelihood_free(NormalSimulator, &observed, 0.2).unwrap();
        let mut mh = MetropolisHastings::new(criterion, IsotropicGaussian::new(0.0)).set_seed(1);
        let run = mh.run(&[0.1, 0.8], 2_000).unwrap();
        assert!(run.n_accepted > 0, "expected some simulations within tolerance");
        assert!(run.n_accepted < 1_999, "expected some simulations outside tolerance");
    }

    #[test]
    fn likelihood_free_zero_tolerance_stays_put() {
        let observed = [0.2, -1.1, 0.4, 1.7, -0.3, 0.9, -0.6, 0.1];
        let criterion = Criterion::likelihood_free(NormalSimulator, &observed, 0.0).unwrap();
        let mut mh = MetropolisHastings::new(criterion, IsotropicGaussian::new(0.1)).set_seed(1);
        let run = mh.run(&[0.1, 0.8], 1_000).unwrap();
        assert_eq!(run.n_accepted, 0);
        assert_eq!(run.acceptance_rate(), 0.0);
        assert!(run.samples.outer_iter().all(|r| r.to_vec() == vec![0.1, 0.8]));
    }

    #[test]
    fn likelihood_free_rejects_empty_dataset() {
        assert_eq!(
            Criterion::likelihood_free(NormalSimulator, &[], 0.1).map(|_| ()),
            Err(SamplerError::InvalidObservation(ObservationError::EmptyDataset))
        );
    }

    #[test]
    fn discard_and_flat_trim_burn_in() {
        let run = exact(0.3)
            .run_ensemble(&[[1.0, 0.0], [0.0, 1.0]], 10)
            .unwrap();
        assert_eq!(run.discard(4).dim(), (2, 6, 2));
        let flat = run.flat(4);
        assert_eq!(flat.dim(), (12, 2));
        assert_eq!(flat.row(6), run.walker(1).row(4));
        assert_eq!(run.discard(50).dim(), (2, 0, 2));

        let chain = exact(0.3).run(&[1.0, 0.0], 10).unwrap();
        assert_eq!(chain.discard(3).nrows(), 7);
    }
}
