//! Fits a straight line to noisy data with four parallel Metropolis–Hastings walkers and
//! reports posterior means, standard deviations and autocorrelation times.

use mh_fit::acceptance::Criterion;
use mh_fit::core::init_ball;
use mh_fit::distributions::IsotropicGaussian;
use mh_fit::metropolis_hastings::MetropolisHastings;
use mh_fit::model::Linear;
use mh_fit::observation::Observation;
use mh_fit::stats::{integrated_time_ensemble, mean_and_cov, DEFAULT_WINDOW_C};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::Normal;
use std::error::Error;

#[cfg(feature = "csv")]
use mh_fit::io::save_csv;

fn main() -> Result<(), Box<dyn Error>> {
    const N_WALKERS: usize = 4;
    const N_STEPS: usize = 50_000;
    const BURNIN: usize = 5_000;
    const SLOPE: f64 = 2.0;
    const INTERCEPT: f64 = 1.0;
    const YERR: f64 = 0.5;
    let seed: u64 = rand::thread_rng().gen();

    // Synthetic data around y = 2x + 1
    let mut rng = SmallRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, YERR)?;
    let x: Vec<f64> = (0..20).map(|i| i as f64 * 0.5).collect();
    let y = x
        .iter()
        .map(|xi| SLOPE * xi + INTERCEPT + rng.sample(noise))
        .collect();
    let obs = Observation::new(x, y, vec![YERR; 20])?;

    let mh = MetropolisHastings::new(
        Criterion::likelihood(Linear, obs),
        IsotropicGaussian::new(0.05),
    )
    .set_seed(seed);
    let starts = init_ball(&[1.0, 0.0], 1e-3, N_WALKERS, &mut rng);
    let run = mh.run_progress(&starts, N_STEPS)?;

    println!(
        "Acceptance rate: {:.3} (per proposal: {:.3})",
        run.acceptance_rate(),
        run.proposal_acceptance_rate()
    );

    let pooled = run.flat(BURNIN);
    let (mean, cov) = mean_and_cov(pooled.view()).ok_or("too few samples after burn-in")?;
    let kept = run.discard(BURNIN);
    for (i, name) in ["slope", "intercept"].iter().enumerate() {
        let tau = integrated_time_ensemble(kept, i, DEFAULT_WINDOW_C);
        println!(
            "{name:>9}: {:.3} ± {:.3}  (tau = {:.1}, ESS ≈ {:.0})",
            mean[i],
            cov[[i, i]].sqrt(),
            tau,
            pooled.nrows() as f64 / tau
        );
    }
    println!("True values: slope = {SLOPE}, intercept = {INTERCEPT}");

    #[cfg(feature = "csv")]
    {
        save_csv(run.samples.view(), "line_fit.csv")?;
        println!("Saved samples to line_fit.csv");
    }

    Ok(())
}
