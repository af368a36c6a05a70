// src/models/crash.rs
//! Crash overlay: a marked point process on top of the diffusion
//!
//! # Model
//!
//! Arrivals are Bernoulli trials per (step, path) cell with daily probability
//! `λ / 252`. An arrival at step `k` opens a window of [`CRASH_WINDOW_STEPS`]
//! steps during which the price is scaled by
//! ```text
//! 1 - progress * s,   progress = (t - k) / 9,   t = k..k+9
//! ```
//! From step `k + 10` onward the path carries a permanent factor `(1 - s)`.
//!
//! Windows on the same path may overlap. Every window is tracked on its own:
//! transient factors of simultaneously-active windows multiply, and each
//! closed window contributes its own permanent factor.
//!
//! # Storage
//!
//! Windows live in one flat arena sorted by (path, start step), with per-path
//! offsets into it, so sampling allocates nothing per arrival.

use crate::error::{validation::*, SimError, SimResult};
use crate::rng;
use ndarray::parallel::prelude::*;
use ndarray::{Array2, ArrayView2, Axis};
use rand::Rng;

/// Steps covered by one crash's decay window
pub const CRASH_WINDOW_STEPS: usize = 10;

/// Trading days per year used to convert the annual arrival rate
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Crash arrival rate (per year) and fractional severity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrashParams {
    pub lambda: f64,
    pub severity: f64,
}

impl CrashParams {
    pub fn new(lambda: f64, severity: f64) -> Self {
        CrashParams { lambda, severity }
    }

    pub fn validate(&self) -> SimResult<()> {
        validate_non_negative("crash_lambda", self.lambda)?;
        if self.daily_probability() > 1.0 {
            return Err(SimError::InvalidConfiguration {
                field: "crash_lambda".to_string(),
                reason: format!(
                    "{} arrivals per year exceeds one per trading day ({})",
                    self.lambda, TRADING_DAYS_PER_YEAR
                ),
            });
        }
        validate_range("crash_size", self.severity, 0.0, 1.0)
    }

    /// Whether the overlay changes anything at all
    pub fn is_active(&self) -> bool {
        self.lambda > 0.0 && self.severity > 0.0
    }

    pub fn daily_probability(&self) -> f64 {
        self.lambda / TRADING_DAYS_PER_YEAR
    }
}

/// One crash occurrence on one path
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CrashWindow {
    pub start: usize,
}

impl CrashWindow {
    /// First step carrying the permanent factor
    pub fn closes_at(&self) -> usize {
        self.start + CRASH_WINDOW_STEPS
    }

    /// Linear progress in `[0, 1]` while `step` is inside the window
    pub fn progress_at(&self, step: usize) -> Option<f64> {
        if step < self.start || step >= self.closes_at() {
            None
        } else {
            Some((step - self.start) as f64 / (CRASH_WINDOW_STEPS - 1) as f64)
        }
    }
}

/// Crash book-keeping for one (path, step) cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrashState {
    /// At least one window is open at this step
    pub in_window: bool,
    /// Progress of the most recently opened active window (0 when none)
    pub progress: f64,
    /// Product of `(1 - s)` over every window closed by this step
    pub permanent: f64,
}

/// Sparse per-path set of crash windows
#[derive(Debug, Clone, PartialEq)]
pub struct CrashSchedule {
    windows: Vec<CrashWindow>,
    offsets: Vec<usize>,
}

impl CrashSchedule {
    /// Draws a `steps × paths` arrival matrix from `rng` and indexes it.
    pub fn sample<R: Rng + ?Sized>(
        params: &CrashParams,
        steps: usize,
        num_paths: usize,
        rng: &mut R,
    ) -> SimResult<Self> {
        params.validate()?;
        let arrivals = rng::bernoulli_matrix(rng, steps, num_paths, params.daily_probability())?;
        Ok(Self::from_arrival_matrix(arrivals.view()))
    }

    /// Indexes a `steps × paths` matrix whose `true` cells are crash arrivals.
    pub fn from_arrival_matrix(arrivals: ArrayView2<bool>) -> Self {
        let counts: Vec<usize> = arrivals
            .axis_iter(Axis(1))
            .map(|column| column.iter().filter(|&&hit| hit).count())
            .collect();

        let mut offsets = Vec::with_capacity(counts.len() + 1);
        offsets.push(0);
        for count in &counts {
            offsets.push(offsets[offsets.len() - 1] + count);
        }

        let mut windows = vec![CrashWindow { start: 0 }; offsets[counts.len()]];
        let mut cursor = offsets[..counts.len()].to_vec();
        // Row-major walk keeps each path's windows sorted by start step
        for ((step, path), &hit) in arrivals.indexed_iter() {
            if hit {
                windows[cursor[path]] = CrashWindow { start: step };
                cursor[path] += 1;
            }
        }

        CrashSchedule { windows, offsets }
    }

    /// Builds a schedule from explicit per-path arrival steps.
    pub fn from_arrivals(per_path: &[Vec<usize>]) -> Self {
        let mut offsets = Vec::with_capacity(per_path.len() + 1);
        let mut windows = Vec::new();
        offsets.push(0);
        for starts in per_path {
            let mut sorted = starts.clone();
            sorted.sort_unstable();
            windows.extend(sorted.into_iter().map(|start| CrashWindow { start }));
            offsets.push(windows.len());
        }
        CrashSchedule { windows, offsets }
    }

    pub fn num_paths(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn total_arrivals(&self) -> usize {
        self.windows.len()
    }

    /// Windows on `path`, sorted by start step
    pub fn windows(&self, path: usize) -> &[CrashWindow] {
        &self.windows[self.offsets[path]..self.offsets[path + 1]]
    }

    /// Number of windows on `path` whose permanent factor applies at `step`
    pub fn closed_before(&self, path: usize, step: usize) -> usize {
        self.windows(path).partition_point(|w| w.closes_at() <= step)
    }

    fn active(&self, path: usize, step: usize) -> &[CrashWindow] {
        let windows = self.windows(path);
        let closed = windows.partition_point(|w| w.closes_at() <= step);
        let opened = windows.partition_point(|w| w.start <= step);
        &windows[closed..opened]
    }

    pub fn state(&self, path: usize, step: usize, severity: f64) -> CrashState {
        let active = self.active(path, step);
        let progress = active
            .last()
            .and_then(|w| w.progress_at(step))
            .unwrap_or(0.0);
        CrashState {
            in_window: !active.is_empty(),
            progress,
            permanent: (1.0 - severity).powi(self.closed_before(path, step) as i32),
        }
    }

    /// Total factor applied to the diffusion price of `path` at `step`
    pub fn multiplier(&self, path: usize, step: usize, severity: f64) -> f64 {
        let transient: f64 = self
            .active(path, step)
            .iter()
            .filter_map(|w| w.progress_at(step))
            .map(|progress| 1.0 - progress * severity)
            .product();
        let permanent = (1.0 - severity).powi(self.closed_before(path, step) as i32);
        transient * permanent
    }
}

/// Rescales every cell of `paths` by its crash multiplier, column by column.
pub fn apply_crash_overlay(paths: &mut Array2<f64>, schedule: &CrashSchedule, severity: f64) {
    debug_assert_eq!(paths.ncols(), schedule.num_paths());
    if severity <= 0.0 || schedule.total_arrivals() == 0 {
        return;
    }

    paths
        .axis_iter_mut(Axis(1))
        .into_par_iter()
        .enumerate()
        .for_each(|(path, mut column)| {
            if schedule.windows(path).is_empty() {
                return;
            }
            for (step, price) in column.iter_mut().enumerate() {
                *price *= schedule.multiplier(path, step, severity);
            }
        });
}
