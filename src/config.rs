// src/config.rs
//! TOML configuration files
//!
//! ```toml
//! initial_price = 1000000.0
//! expected_return = 0.05
//! volatility = 0.2
//! time_horizon = 20.0
//! num_paths = 1000
//! monthly_investment = 30000.0
//! bonus_investment = 100000.0
//! investment_years = 15.0
//! crash_lambda = 0.1
//! crash_size = 0.3
//! ```
//!
//! `initial_price`, `expected_return` and `volatility` are required.
//! `num_steps` defaults to 252 per year of horizon.

use crate::error::{validation::validate_positive, SimError, SimResult};
use crate::mc::engine::SimConfig;
use crate::models::crash::TRADING_DAYS_PER_YEAR;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub initial_price: f64,
    pub expected_return: f64,
    pub volatility: f64,
    #[serde(default = "default_time_horizon")]
    pub time_horizon: f64,
    #[serde(default)]
    pub num_steps: Option<usize>,
    #[serde(default = "default_num_paths")]
    pub num_paths: usize,
    #[serde(default)]
    pub monthly_investment: f64,
    #[serde(default)]
    pub bonus_investment: f64,
    #[serde(default)]
    pub investment_years: Option<f64>,
    #[serde(default)]
    pub crash_lambda: f64,
    #[serde(default)]
    pub crash_size: f64,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_time_horizon() -> f64 {
    1.0
}

fn default_num_paths() -> usize {
    1_000
}

impl FileConfig {
    /// Maps file keys onto a [`SimConfig`]; the horizon is checked first
    /// because the default step count is derived from it.
    pub fn into_sim_config(self) -> SimResult<SimConfig> {
        validate_positive("t", self.time_horizon)?;
        let steps = self.num_steps.unwrap_or_else(|| {
            ((self.time_horizon * TRADING_DAYS_PER_YEAR).round() as usize).max(1)
        });
        Ok(SimConfig {
            paths: self.num_paths,
            steps,
            s0: self.initial_price,
            mu: self.expected_return,
            sigma: self.volatility,
            t: self.time_horizon,
            monthly_investment: self.monthly_investment,
            bonus_investment: self.bonus_investment,
            investment_years: self.investment_years,
            crash_lambda: self.crash_lambda,
            crash_size: self.crash_size,
            seed: self.seed,
            ..Default::default()
        })
    }
}

/// Parses a TOML document into a validated [`SimConfig`].
///
/// `origin` names the source in error messages.
pub fn parse_config(contents: &str, origin: &str) -> SimResult<SimConfig> {
    let file: FileConfig = toml::from_str(contents).map_err(|e| SimError::ConfigFile {
        path: origin.to_string(),
        reason: e.to_string(),
    })?;
    let cfg = file.into_sim_config()?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn load_config<P: AsRef<Path>>(path: P) -> SimResult<SimConfig> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let contents = std::fs::read_to_string(path).map_err(|e| SimError::ConfigFile {
        path: origin.clone(),
        reason: e.to_string(),
    })?;
    parse_config(&contents, &origin)
}
