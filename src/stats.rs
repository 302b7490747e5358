//! Post-processing of sampled chains: autocorrelation, integrated autocorrelation
//! time, effective sample size and posterior moments.
//!
//! These functions only read the sample arrays. Burn-in is removed beforehand with
//! [`ChainRun::discard`](crate::metropolis_hastings::ChainRun::discard) or
//! [`EnsembleRun::discard`](crate::metropolis_hastings::EnsembleRun::discard).

use ndarray::{Array1, Array2, ArrayView2, ArrayView3, Axis};
use ndarray_stats::CorrelationExt;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Default window constant of [`integrated_time`].
pub const DEFAULT_WINDOW_C: f64 = 5.0;

/**
Normalised autocorrelation function of `series` for lags `0..series.len()`, computed
with an FFT of the zero-padded, mean-centred series.

A constant series is perfectly correlated with itself: every lag gets `1.0`.
An empty series gives an empty vector.
*/
pub fn autocorrelation(series: &[f64]) -> Vec<f64> {
    let n = series.len();
    if n == 0 {
        return Vec::new();
    }
    if series.iter().all(|x| *x == series[0]) {
        return vec![1.0; n];
    }
    let mean = series.iter().sum::<f64>() / n as f64;
    let size = (2 * n).next_power_of_two();

    let mut buf: Vec<Complex<f64>> = series
        .iter()
        .map(|x| Complex::new(x - mean, 0.0))
        .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
        .take(size)
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(size).process(&mut buf);
    buf.iter_mut()
        .for_each(|c| *c = Complex::new(c.norm_sqr(), 0.0));
    planner.plan_fft_inverse(size).process(&mut buf);

    let acf0 = buf[0].re;
    buf[..n].iter().map(|c| c.re / acf0).collect()
}

/// Sokal's automatic windowing: the smallest lag `m` with `m >= c * tau(m)`, where
/// `tau(m) = 1 + 2 * sum_{k=1..m} acf[k]`. Falls back to the full length.
fn windowed_time(acf: &[f64], c: f64) -> f64 {
    let mut tau = 1.0;
    for (m, rho) in acf.iter().enumerate().skip(1) {
        tau += 2.0 * rho;
        if m as f64 >= c * tau {
            return tau;
        }
    }
    tau
}

/**
Integrated autocorrelation time of a one-dimensional projection of a chain,
using Sokal's automatic window with constant `c` (5 is customary, see
[`DEFAULT_WINDOW_C`]).

# Examples

```rust
use mh_fit::stats::{integrated_time, DEFAULT_WINDOW_C};

// alternating series: negative correlations shrink tau below one
let series: Vec<f64> = (0..1000).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
assert!(integrated_time(&series, DEFAULT_WINDOW_C) < 1.0);
```
*/
pub fn integrated_time(series: &[f64], c: f64) -> f64 {
    windowed_time(&autocorrelation(series), c)
}

/// Averages the autocorrelation functions of one parameter over all walkers of a
/// `walkers × steps × dim` array before windowing, as is usual for ensembles.
///
/// Returns `NaN` for an empty array or a `param` outside `0..dim`.
pub fn integrated_time_ensemble(samples: ArrayView3<'_, f64>, param: usize, c: f64) -> f64 {
    let (n_walkers, n_steps, dim) = samples.dim();
    if n_walkers == 0 || n_steps == 0 || param >= dim {
        return f64::NAN;
    }
    let mut mean_acf = vec![0.0; n_steps];
    for walker in samples.outer_iter() {
        let series: Vec<f64> = walker.column(param).to_vec();
        for (m, rho) in mean_acf.iter_mut().zip(autocorrelation(&series)) {
            *m += rho / n_walkers as f64;
        }
    }
    windowed_time(&mean_acf, c)
}

/// `series.len() / tau`, the number of effectively independent draws in `series`.
pub fn effective_sample_size(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    series.len() as f64 / integrated_time(series, DEFAULT_WINDOW_C)
}

/// Sample mean and covariance (`ddof = 1`) of a `samples × dim` matrix.
///
/// Returns `None` for fewer than two samples.
pub fn mean_and_cov(samples: ArrayView2<'_, f64>) -> Option<(Array1<f64>, Array2<f64>)> {
    if samples.nrows() < 2 {
        return None;
    }
    let mean = samples.mean_axis(Axis(0))?;
    let cov = samples.t().cov(1.0).ok()?;
    Some((mean, cov))
}
