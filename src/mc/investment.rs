// src/mc/investment.rs
//! Periodic contribution overlay
//!
//! # Calendar
//!
//! - Monthly: every 21 steps starting at step 21
//! - Bonus: every 252 steps starting at step 126
//!
//! Both stop at the cutoff step `min(floor(years * 252) + 1, steps + 1)`
//! (exclusive), or run to the end of the grid when no cutoff is given.
//!
//! # Compounding
//!
//! A contribution `A` at step `idx` buys `A / P[idx]` units of the path it
//! joins, so from `idx` onward it is worth `A * P[t] / P[idx]`. With `u(t)` the
//! units bought up to and including `t`, the overlaid wealth is
//! ```text
//! W[t] = P[t] * (1 + u(t))
//! ```
//! which is additive over contributions and independent of their order.

use crate::error::{validation::*, SimResult};
use crate::models::crash::TRADING_DAYS_PER_YEAR;
use ndarray::parallel::prelude::*;
use ndarray::{Array1, Array2, Axis};

pub const MONTHLY_INTERVAL_STEPS: usize = 21;
pub const BONUS_FIRST_STEP: usize = 126;
pub const BONUS_INTERVAL_STEPS: usize = 252;

/// One capital injection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    pub step: usize,
    pub amount: f64,
}

/// Monthly and bonus contribution amounts with an optional cutoff in years
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContributionPlan {
    pub monthly: f64,
    pub bonus: f64,
    pub investment_years: Option<f64>,
}

impl ContributionPlan {
    pub fn new(monthly: f64, bonus: f64, investment_years: Option<f64>) -> Self {
        ContributionPlan {
            monthly,
            bonus,
            investment_years,
        }
    }

    pub fn validate(&self) -> SimResult<()> {
        validate_non_negative("monthly_investment", self.monthly)?;
        validate_non_negative("bonus_investment", self.bonus)?;
        if let Some(years) = self.investment_years {
            validate_non_negative("investment_years", years)?;
        }
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.monthly > 0.0 || self.bonus > 0.0
    }

    /// Exclusive upper bound on contribution steps for a grid of `steps` steps
    pub fn end_step(&self, steps: usize) -> usize {
        let grid_end = steps + 1;
        match self.investment_years {
            Some(years) => ((years * TRADING_DAYS_PER_YEAR) as usize)
                .saturating_add(1)
                .min(grid_end),
            None => grid_end,
        }
    }

    pub fn monthly_steps(&self, steps: usize) -> impl Iterator<Item = usize> {
        (MONTHLY_INTERVAL_STEPS..self.end_step(steps)).step_by(MONTHLY_INTERVAL_STEPS)
    }

    pub fn bonus_steps(&self, steps: usize) -> impl Iterator<Item = usize> {
        (BONUS_FIRST_STEP..self.end_step(steps)).step_by(BONUS_INTERVAL_STEPS)
    }

    /// All non-zero contributions, sorted by step
    pub fn contributions(&self, steps: usize) -> Vec<Contribution> {
        let mut all = Vec::new();
        if self.monthly > 0.0 {
            all.extend(self.monthly_steps(steps).map(|step| Contribution {
                step,
                amount: self.monthly,
            }));
        }
        if self.bonus > 0.0 {
            all.extend(self.bonus_steps(steps).map(|step| Contribution {
                step,
                amount: self.bonus,
            }));
        }
        all.sort_by_key(|c| c.step);
        all
    }

    /// Cumulative capital paid in at every step, starting from `s0`.
    pub fn principal_schedule(&self, s0: f64, steps: usize) -> Array1<f64> {
        let mut paid_in = Array1::<f64>::zeros(steps + 1);
        paid_in[0] = s0;
        for c in self.contributions(steps) {
            paid_in[c.step] += c.amount;
        }
        paid_in.accumulate_axis_inplace(Axis(0), |&prev, curr| *curr += prev);
        paid_in
    }
}

/// Compounds the plan's contributions into every path of `paths` in place.
///
/// Returns the number of contributions applied per path.
pub fn apply_investment_overlay(paths: &mut Array2<f64>, plan: &ContributionPlan) -> usize {
    if !plan.is_active() {
        return 0;
    }
    let steps = paths.nrows() - 1;
    let contributions = plan.contributions(steps);
    if contributions.is_empty() {
        return 0;
    }

    paths
        .axis_iter_mut(Axis(1))
        .into_par_iter()
        .for_each(|mut column| {
            let mut pending = contributions.iter().peekable();
            let mut units = 0.0;
            for (step, cell) in column.iter_mut().enumerate() {
                let price = *cell;
                while let Some(c) = pending.next_if(|c| c.step == step) {
                    units += c.amount / price;
                }
                *cell = price * (1.0 + units);
            }
        });

    contributions.len()
}
