// src/analytics/lognormal.rs
//! Closed-form moments of GBM and a normality check for simulated log-returns
//!
//! Under `dS = μ S dt + σ S dW`:
//! ```text
//! ln(S_T / S_0) ~ N((μ - σ²/2) T, σ² T)
//! E[S_T] = S_0 e^{μT}
//! ```

use statrs::distribution::{ContinuousCDF, Normal};

pub fn expected_log_return(mu: f64, sigma: f64, t: f64) -> f64 {
    (mu - 0.5 * sigma * sigma) * t
}

pub fn log_return_variance(sigma: f64, t: f64) -> f64 {
    sigma * sigma * t
}

pub fn expected_terminal_price(s0: f64, mu: f64, t: f64) -> f64 {
    s0 * (mu * t).exp()
}

/// Kolmogorov-Smirnov distance between the empirical distribution of
/// `samples` and `N(mean, std_dev²)`.
///
/// Returns `None` for empty input or a non-positive `std_dev`.
pub fn ks_statistic_normal(samples: &[f64], mean: f64, std_dev: f64) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    let normal = Normal::new(mean, std_dev).ok()?;

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len() as f64;

    let d = sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let cdf = normal.cdf(x);
            let above = (i + 1) as f64 / n - cdf;
            let below = cdf - i as f64 / n;
            above.max(below)
        })
        .fold(0.0, f64::max);
    Some(d)
}
