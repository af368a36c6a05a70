// src/models/effective.rs
//! Jump-adjusted diffusion parameters
//!
//! A crash process with arrival rate λ (per year) and fixed severity s drags the
//! expected log-growth by `λ ln(1 - s)` per year and contributes roughly `λ s²`
//! of variance. The diffusion is driven by corrected parameters so that the
//! combined process reproduces the target (μ, σ):
//!
//! ```text
//! μ' = μ - ln((1 - s)^λ)
//! σ'² = σ² - λ s²
//! ```

use crate::error::{SimError, SimResult};

/// Corrected drift and volatility consumed by the diffusion generator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveParams {
    pub mu: f64,
    pub sigma: f64,
}

impl EffectiveParams {
    /// Corrects `(mu, sigma)` for a crash process of rate `crash_lambda` and
    /// severity `crash_size`.
    ///
    /// Returns the inputs unchanged when either crash parameter is non-positive.
    ///
    /// # Errors
    ///
    /// `SimError::InvalidParameterCombination` when `λ s² ≥ σ²`.
    pub fn correct(mu: f64, sigma: f64, crash_lambda: f64, crash_size: f64) -> SimResult<Self> {
        if crash_lambda <= 0.0 || crash_size <= 0.0 {
            return Ok(Self { mu, sigma });
        }

        let jump_variance = crash_lambda * crash_size * crash_size;
        let sigma_sq = sigma * sigma;
        if jump_variance >= sigma_sq {
            return Err(SimError::InvalidParameterCombination {
                sigma,
                crash_lambda,
                crash_size,
                jump_variance,
            });
        }

        let expected_crash_drag = (1.0 - crash_size).powf(crash_lambda);
        Ok(Self {
            mu: mu - expected_crash_drag.ln(),
            sigma: (sigma_sq - jump_variance).sqrt(),
        })
    }

    /// Log-increment drift per step: `(μ' - σ'²/2) dt`
    pub fn drift_per_step(&self, dt: f64) -> f64 {
        (self.mu - 0.5 * self.sigma * self.sigma) * dt
    }

    /// Diffusion scale per step: `σ' √dt`
    pub fn diffusion_per_step(&self, dt: f64) -> f64 {
        self.sigma * dt.sqrt()
    }
}
