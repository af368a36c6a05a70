// src/analytics/summary.rs
//! Distribution statistics over a simulated ensemble
//!
//! Quantiles use the `statrs` order-statistics estimator (approximately
//! median-unbiased), the standard deviation is the population one.

use crate::models::crash::{CRASH_WINDOW_STEPS, TRADING_DAYS_PER_YEAR};
use ndarray::{s, Array1, Array2, ArrayView1, Axis};
use statrs::statistics::{Data, OrderStatistics, Statistics};

/// Percentile boundaries splitting an ensemble into six bands
pub const BAND_PERCENTILES: [f64; 5] = [0.05, 0.25, 0.50, 0.75, 0.95];

fn below_pct(values: ArrayView1<f64>, threshold: f64) -> f64 {
    let below = values.iter().filter(|&&v| v < threshold).count();
    100.0 * below as f64 / values.len() as f64
}

#[derive(Debug, Clone, PartialEq)]
pub struct TerminalSummary {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p5: f64,
    pub p95: f64,
    /// Percentage of paths ending below the capital paid in
    pub below_principal_pct: f64,
}

impl TerminalSummary {
    /// `values` must be non-empty.
    pub fn from_values(values: ArrayView1<f64>, principal: f64) -> Self {
        let mut data = Data::new(values.to_vec());
        TerminalSummary {
            mean: values.iter().mean(),
            median: data.median(),
            std_dev: values.iter().population_std_dev(),
            min: Statistics::min(values.iter()),
            max: Statistics::max(values.iter()),
            p5: data.quantile(0.05),
            p95: data.quantile(0.95),
            below_principal_pct: below_pct(values, principal),
        }
    }

    pub fn to_rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("mean", format!("{:.6}", self.mean)),
            ("median", format!("{:.6}", self.median)),
            ("std_dev", format!("{:.6}", self.std_dev)),
            ("min", format!("{:.6}", self.min)),
            ("max", format!("{:.6}", self.max)),
            ("p5", format!("{:.6}", self.p5)),
            ("p95", format!("{:.6}", self.p95)),
            ("below_principal_pct", format!("{:.3}", self.below_principal_pct)),
        ]
    }
}

/// Statistics of the ensemble at one whole-year checkpoint
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointStats {
    pub year: usize,
    pub step: usize,
    pub principal: f64,
    pub mean: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
    pub below_principal_pct: f64,
}

/// Statistics every `every_years` years from year 0 through the horizon.
///
/// Checkpoint steps are `year * 252`, clipped to the last row of `paths`.
pub fn checkpoint_statistics(
    time: &Array1<f64>,
    paths: &Array2<f64>,
    principal: &Array1<f64>,
    every_years: usize,
) -> Vec<CheckpointStats> {
    let last_row = paths.nrows() - 1;
    // linspace end points can land a hair below a whole year
    let horizon_years = (time[time.len() - 1] + 1e-9).floor() as usize;
    let every = every_years.max(1);

    (0..=horizon_years)
        .step_by(every)
        .map(|year| {
            let step = ((year as f64 * TRADING_DAYS_PER_YEAR) as usize).min(last_row);
            let values = paths.row(step);
            let mut data = Data::new(values.to_vec());
            CheckpointStats {
                year,
                step,
                principal: principal[step],
                mean: values.iter().mean(),
                min: Statistics::min(values.iter()),
                p25: data.lower_quartile(),
                median: data.median(),
                p75: data.upper_quartile(),
                max: Statistics::max(values.iter()),
                below_principal_pct: below_pct(values, principal[step]),
            }
        })
        .collect()
}

/// Whether `path` lost more than `severity` inside any non-overlapping
/// window of [`CRASH_WINDOW_STEPS`] steps, relative to the window's first price.
fn experienced_crash(path: ArrayView1<f64>, severity: f64) -> bool {
    let len = path.len();
    (0..len.saturating_sub(CRASH_WINDOW_STEPS))
        .step_by(CRASH_WINDOW_STEPS)
        .any(|start| {
            let window_start = path[start];
            let window_min = path
                .slice(s![start..start + CRASH_WINDOW_STEPS])
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min);
            window_min < (1.0 - severity) * window_start
        })
}

/// Percentile of an ascending slice, interpolating linearly between the
/// closest ranks (`h = (n - 1) q`).
fn linear_percentile(sorted: &[f64], q: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

/// Share of paths (in percent) that experienced a crash-sized drawdown up to
/// `step`, per value band at `step`.
///
/// Bands are split at [`BAND_PERCENTILES`] and ordered lowest first:
/// `[0-5%, 5-25%, 25-50%, 50-75%, 75-95%, 95-100%]`. A value equal to a cut
/// point belongs to the lower band. Cut points interpolate linearly between
/// closest ranks, unlike the order-statistics estimator behind
/// [`TerminalSummary`]. Empty bands report 0.
pub fn crash_experience_by_band(paths: &Array2<f64>, step: usize, severity: f64) -> [f64; 6] {
    let values = paths.row(step);
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let cuts: Vec<f64> = BAND_PERCENTILES
        .iter()
        .map(|&q| linear_percentile(&sorted, q))
        .collect();

    let band_of = |v: f64| cuts.iter().take_while(|&&cut| v > cut).count();

    let mut members = [0usize; 6];
    let mut crashed = [0usize; 6];
    let history = paths.slice(s![..=step, ..]);
    for (path, column) in history.axis_iter(Axis(1)).enumerate() {
        let band = band_of(values[path]);
        members[band] += 1;
        if experienced_crash(column, severity) {
            crashed[band] += 1;
        }
    }

    let mut ratios = [0.0; 6];
    for band in 0..6 {
        if members[band] > 0 {
            ratios[band] = 100.0 * crashed[band] as f64 / members[band] as f64;
        }
    }
    ratios
}
