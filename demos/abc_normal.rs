//! Estimates the mean and standard deviation of a normal sample with likelihood-free
//! (ABC) Metropolis–Hastings, shrinking the tolerance to show its effect.

use mh_fit::acceptance::Criterion;
use mh_fit::discrepancy::Summary;
use mh_fit::distributions::{IsotropicGaussian, NormalSimulator, Simulator};
use mh_fit::metropolis_hastings::MetropolisHastings;
use mh_fit::stats::effective_sample_size;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    const N_STEPS: usize = 20_000;
    const BURNIN: usize = 2_000;
    const SEED: u64 = 42;

    let mut rng = SmallRng::seed_from_u64(SEED);
    let observed = NormalSimulator
        .simulate(&[3.0, 1.5], 200, &mut rng)
        .ok_or("invalid simulator parameters")?;
    let summary = Summary::of(&observed)?;
    println!(
        "Observed summary: mean = {:.3}, std = {:.3}",
        summary.mean, summary.std
    );

    for tolerance in [0.5, 0.2, 0.1] {
        let criterion = Criterion::likelihood_free(NormalSimulator, &observed, tolerance)?;
        let mut mh = MetropolisHastings::new(criterion, IsotropicGaussian::new(0.05)).set_seed(SEED);
        let run = mh.run(&[summary.mean, summary.std], N_STEPS)?;

        let kept = run.discard(BURNIN);
        let mu = kept.column(0).to_vec();
        let sigma = kept.column(1).to_vec();
        println!(
            "h = {tolerance:<4} accept = {:.3}  mu = {:.3}  sigma = {:.3}  ESS(mu) ≈ {:.0}",
            run.proposal_acceptance_rate(),
            mu.iter().sum::<f64>() / mu.len() as f64,
            sigma.iter().sum::<f64>() / sigma.len() as f64,
            effective_sample_size(&mu)
        );
    }

    Ok(())
}
