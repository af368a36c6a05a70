// src/mc/engine.rs
use crate::error::{validation::*, SimResult};
use crate::mc::investment::{apply_investment_overlay, ContributionPlan};
use crate::models::crash::{apply_crash_overlay, CrashParams, CrashSchedule};
use crate::models::effective::EffectiveParams;
use crate::models::gbm::{Gbm, TimeGrid};
use crate::rng;
use bitflags::bitflags;
use ndarray::{Array1, Array2};
use rand::Rng;
use tracing::{debug, info, warn};

bitflags! {
    /// Stages layered on top of the diffusion paths
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Overlays: u32 {
        const NONE       = 0;
        const CRASH      = 1 << 0;
        const INVESTMENT = 1 << 1;
    }
}

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub paths: usize,
    pub steps: usize,
    pub s0: f64,
    pub mu: f64,
    pub sigma: f64,
    pub t: f64,
    pub monthly_investment: f64,
    pub bonus_investment: f64,
    pub investment_years: Option<f64>,
    pub crash_lambda: f64,
    pub crash_size: f64,
    pub seed: Option<u64>,
    pub overlays: Overlays,
}

impl SimConfig {
    /// Validate the simulation configuration
    pub fn validate(&self) -> SimResult<()> {
        validate_paths(self.paths)?;
        validate_steps(self.steps)?;
        validate_positive("s0", self.s0)?;
        validate_finite("mu", self.mu)?;
        validate_non_negative("sigma", self.sigma)?;
        validate_positive("t", self.t)?;
        self.contribution_plan().validate()?;
        self.crash_params().validate()?;
        Ok(())
    }

    pub fn crash_params(&self) -> CrashParams {
        CrashParams::new(self.crash_lambda, self.crash_size)
    }

    pub fn contribution_plan(&self) -> ContributionPlan {
        ContributionPlan::new(
            self.monthly_investment,
            self.bonus_investment,
            self.investment_years,
        )
    }

    fn crash_enabled(&self) -> bool {
        self.overlays.contains(Overlays::CRASH) && self.crash_params().is_active()
    }

    fn investment_enabled(&self) -> bool {
        self.overlays.contains(Overlays::INVESTMENT) && self.contribution_plan().is_active()
    }

    /// Diffusion parameters after correcting for the crash process
    pub fn effective_params(&self) -> SimResult<EffectiveParams> {
        if self.crash_enabled() {
            EffectiveParams::correct(self.mu, self.sigma, self.crash_lambda, self.crash_size)
        } else {
            Ok(EffectiveParams {
                mu: self.mu,
                sigma: self.sigma,
            })
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            paths: 1_000,
            steps: 252,
            s0: 100.0,
            mu: 0.05,
            sigma: 0.2,
            t: 1.0,
            monthly_investment: 0.0,
            bonus_investment: 0.0,
            investment_years: None,
            crash_lambda: 0.0,
            crash_size: 0.0,
            seed: None,
            overlays: Overlays::all(),
        }
    }
}

/// Time grid and `(steps + 1) × paths` ensemble produced by one simulation
#[derive(Debug, Clone)]
pub struct Simulation {
    pub time: Array1<f64>,
    pub paths: Array2<f64>,
}

impl Simulation {
    /// Last row of the ensemble
    pub fn terminal_values(&self) -> Array1<f64> {
        self.paths.row(self.paths.nrows() - 1).to_owned()
    }
}

/// Generates the full path ensemble
///
/// # Pipeline
///
/// ```text
/// (μ, σ, λ, s) → (μ', σ') → GBM paths → crash overlay → contribution overlay
/// ```
///
/// Random draws come only from `rng`, in a fixed order: all diffusion normals
/// (steps × paths, row-major), then all crash arrival trials. A disabled
/// stage consumes nothing, so a zero crash rate yields exactly the same
/// ensemble as clearing [`Overlays::CRASH`].
///
/// # Errors
///
/// - `SimError::InvalidConfiguration` for out-of-domain inputs, before any allocation
/// - `SimError::InvalidParameterCombination` when `λ s² ≥ σ²`
pub fn generate_paths<R: Rng + ?Sized>(cfg: &SimConfig, rng: &mut R) -> SimResult<Simulation> {
    cfg.validate()?;
    let params = cfg.effective_params()?;
    debug!(
        mu = params.mu,
        sigma = params.sigma,
        "effective diffusion parameters"
    );

    info!(
        paths = cfg.paths,
        steps = cfg.steps,
        horizon = cfg.t,
        "simulating path ensemble"
    );

    let grid = TimeGrid::new(cfg.t, cfg.steps)?;
    let mut paths = Gbm::new(cfg.s0, params).sample_paths(&grid, cfg.paths, rng);

    if cfg.crash_enabled() {
        let crash = cfg.crash_params();
        let schedule = CrashSchedule::sample(&crash, cfg.steps, cfg.paths, rng)?;
        debug!(
            arrivals = schedule.total_arrivals(),
            daily_probability = crash.daily_probability(),
            "crash schedule sampled"
        );
        apply_crash_overlay(&mut paths, &schedule, crash.severity);
    }

    if cfg.investment_enabled() {
        let applied = apply_investment_overlay(&mut paths, &cfg.contribution_plan());
        debug!(contributions = applied, "contributions compounded per path");
    }

    let non_positive = paths
        .row(cfg.steps)
        .iter()
        .filter(|&&value| value <= 0.0)
        .count();
    if non_positive > 0 {
        warn!(non_positive, "terminal values at or below zero");
    }

    info!("path ensemble complete");
    Ok(Simulation {
        time: grid.into_inner(),
        paths,
    })
}

/// Runs [`generate_paths`] with a generator built from `cfg.seed`, or from
/// OS entropy when no seed is set.
pub fn simulate(cfg: &SimConfig) -> SimResult<Simulation> {
    match cfg.seed {
        Some(seed) => generate_paths(cfg, &mut rng::seed_rng_from_u64(seed)),
        None => generate_paths(cfg, &mut rng::entropy_rng()),
    }
}
