//! Tests verifying that the exact Metropolis–Hastings sampler recovers the posterior of a
//! straight-line fit.
//!
//! With a flat prior and Gaussian errors the posterior of (slope, intercept) is Gaussian with
//! the weighted-least-squares estimate as mean and `(A^T W A)^-1` as covariance, so the chains
//! can be compared against closed-form values.

use mh_fit::acceptance::Criterion;
use mh_fit::distributions::IsotropicGaussian;
use mh_fit::metropolis_hastings::MetropolisHastings;
use mh_fit::model::Linear;
use mh_fit::observation::Observation;
use mh_fit::stats::mean_and_cov;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const YERR: f64 = 0.5;

    /// y = 2x + 1 plus a fixed, zero-mean wiggle.
    fn line_data() -> Observation {
        let x: Vec<f64> = (0..11).map(|i| i as f64).collect();
        let wiggle = [0.3, -0.4, 0.1, 0.5, -0.2, -0.6, 0.4, 0.0, -0.3, 0.2, 0.0];
        let y = x.iter().zip(wiggle).map(|(xi, w)| 2.0 * xi + 1.0 + w).collect();
        Observation::new(x, y, vec![YERR; 11]).unwrap()
    }

    /// Weighted least-squares mean and covariance of (slope, intercept).
    fn analytic_posterior(obs: &Observation) -> ([f64; 2], [[f64; 2]; 2]) {
        let w: Vec<f64> = obs.yerr().iter().map(|e| 1.0 / (e * e)).collect();
        let s: f64 = w.iter().sum();
        let sx: f64 = obs.x().iter().zip(&w).map(|(x, w)| w * x).sum();
        let sxx: f64 = obs.x().iter().zip(&w).map(|(x, w)| w * x * x).sum();
        let sy: f64 = obs.y().iter().zip(&w).map(|(y, w)| w * y).sum();
        let sxy: f64 = obs
            .x()
            .iter()
            .zip(obs.y())
            .zip(&w)
            .map(|((x, y), w)| w * x * y)
            .sum();
        let det = s * sxx - sx * sx;
        let slope = (s * sxy - sx * sy) / det;
        let intercept = (sxx * sy - sx * sxy) / det;
        let cov = [[s / det, -sx / det], [-sx / det, sxx / det]];
        ([slope, intercept], cov)
    }

    #[test]
    fn test_line_posterior_matches_least_squares() {
        const N_WALKERS: usize = 4;
        const N_STEPS: usize = 25_000;
        const BURNIN: usize = 5_000;
        const SEED: u64 = 42;

        let obs = line_data();
        let (mean_true, cov_true) = analytic_posterior(&obs);

        let mh = MetropolisHastings::new(
            Criterion::likelihood(Linear, obs),
            IsotropicGaussian::new(0.05),
        )
        .set_seed(SEED);
        let inits = vec![vec![1.0, 0.0]; N_WALKERS];
        let run = mh.run_parallel(&inits, N_STEPS).unwrap();

        let rate = run.proposal_acceptance_rate();
        assert!(rate > 0.1 && rate < 0.9, "unexpected acceptance rate {rate}");

        let pooled = run.flat(BURNIN);
        assert_eq!(pooled.nrows(), N_WALKERS * (N_STEPS - BURNIN));
        let (mean, cov) = mean_and_cov(pooled.view()).unwrap();

        assert_abs_diff_eq!(mean[0], mean_true[0], epsilon = 0.02);
        assert_abs_diff_eq!(mean[1], mean_true[1], epsilon = 0.1);

        let sd_slope = cov[[0, 0]].sqrt();
        let sd_intercept = cov[[1, 1]].sqrt();
        let sd_slope_true = cov_true[0][0].sqrt();
        let sd_intercept_true = cov_true[1][1].sqrt();
        assert!(
            (sd_slope / sd_slope_true - 1.0).abs() < 0.25,
            "slope sd {sd_slope} vs {sd_slope_true}"
        );
        assert!(
            (sd_intercept / sd_intercept_true - 1.0).abs() < 0.25,
            "intercept sd {sd_intercept} vs {sd_intercept_true}"
        );
        // strong negative slope/intercept correlation
        let corr = cov[[0, 1]] / (sd_slope * sd_intercept);
        assert!(corr < -0.6, "correlation {corr}");
    }

    /// A chain started far away forgets its starting point.
    #[test]
    fn test_single_chain_converges_from_far_start() {
        let obs = line_data();
        let (mean_true, _) = analytic_posterior(&obs);

        let mut mh = MetropolisHastings::new(
            Criterion::likelihood(Linear, obs),
            IsotropicGaussian::new(0.05),
        )
        .set_seed(7);
        let run = mh.run(&[-3.0, 10.0], 30_000).unwrap();

        assert_eq!(run.samples.row(0).to_vec(), vec![-3.0, 10.0]);
        let kept = run.discard(10_000);
        let slope = kept.column(0).mean().unwrap();
        assert_abs_diff_eq!(slope, mean_true[0], epsilon = 0.05);
    }

    /// The posterior from data with slope 2 must not put mass near a flat line.
    #[test]
    fn test_flat_line_is_excluded() {
        let obs = line_data();
        let mut mh = MetropolisHastings::new(
            Criterion::likelihood(Linear, obs),
            IsotropicGaussian::new(0.05),
        )
        .set_seed(11);
        let run = mh.run(&[2.0, 1.0], 5_000).unwrap();
        assert!(run.samples.column(0).iter().all(|&slope| slope > 1.0));
    }

    /// Any model implementing the trait can be fitted; here a line through the origin.
    #[test]
    fn test_custom_model_closure() {
        let x: Vec<f64> = (1..=8).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|xi| 0.5 * xi).collect();
        let obs = Observation::new(x, y, vec![0.1; 8]).unwrap();
        let through_origin =
            |theta: &[f64], x: &[f64]| -> Vec<f64> { x.iter().map(|xi| theta[0] * xi).collect() };

        let mut mh = MetropolisHastings::new(
            Criterion::likelihood(through_origin, obs),
            IsotropicGaussian::new(0.01),
        )
        .set_seed(3);
        let run = mh.run(&[0.2], 10_000).unwrap();
        let slope = run.discard(2_000).column(0).mean().unwrap();
        assert_abs_diff_eq!(slope, 0.5, epsilon = 0.01);
    }
}
