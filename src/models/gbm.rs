// src/models/gbm.rs
//! Diffusion path generation
//!
//! # Math Framework
//!
//! Each path follows the discretised GBM recurrence on a uniform grid:
//! ```text
//! ln S_{k+1} - ln S_k = (μ' - σ'²/2) Δt + σ' √Δt Z_k
//! ```
//! with `Z_k ~ N(0,1)` independent per (step, path) cell. Log-increments are
//! cumulated down each column and exponentiated, so every cell is
//! `S0 * exp(partial sum)` and row 0 is exactly `S0`.

use super::effective::EffectiveParams;
use crate::error::{validation::*, SimResult};
use crate::rng;
use ndarray::{s, Array1, Array2, ArrayView2, Axis};
use rand::Rng;

/// Uniform time points `0, Δt, ..., T` (`steps + 1` entries)
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    points: Array1<f64>,
    dt: f64,
}

impl TimeGrid {
    pub fn new(horizon: f64, steps: usize) -> SimResult<Self> {
        validate_positive("t", horizon)?;
        validate_steps(steps)?;
        Ok(Self {
            points: Array1::linspace(0.0, horizon, steps + 1),
            dt: horizon / steps as f64,
        })
    }

    pub fn points(&self) -> &Array1<f64> {
        &self.points
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn steps(&self) -> usize {
        self.points.len() - 1
    }

    pub fn horizon(&self) -> f64 {
        self.points[self.steps()]
    }

    pub fn into_inner(self) -> Array1<f64> {
        self.points
    }
}

/// Geometric Brownian motion driven by (already corrected) parameters
#[derive(Debug, Clone, Copy)]
pub struct Gbm {
    pub s0: f64,
    pub mu: f64,
    pub sigma: f64,
}

impl Gbm {
    pub fn new(s0: f64, params: EffectiveParams) -> Self {
        Gbm {
            s0,
            mu: params.mu,
            sigma: params.sigma,
        }
    }

    fn params(&self) -> EffectiveParams {
        EffectiveParams {
            mu: self.mu,
            sigma: self.sigma,
        }
    }

    pub fn exact_step(&self, s_t: f64, dt: f64, normal_draw: f64) -> f64 {
        let p = self.params();
        s_t * (p.drift_per_step(dt) + p.diffusion_per_step(dt) * normal_draw).exp()
    }

    /// Builds the `(steps + 1) × paths` ensemble from a `steps × paths`
    /// matrix of standard-normal draws.
    pub fn paths_from_normals(&self, grid: &TimeGrid, normals: ArrayView2<f64>) -> Array2<f64> {
        let (steps, num_paths) = normals.dim();
        debug_assert_eq!(steps, grid.steps());

        let p = self.params();
        let drift = p.drift_per_step(grid.dt());
        let diffusion = p.diffusion_per_step(grid.dt());

        let mut log_paths = Array2::<f64>::zeros((steps + 1, num_paths));
        log_paths
            .slice_mut(s![1.., ..])
            .assign(&normals.mapv(|z| drift + diffusion * z));
        log_paths.accumulate_axis_inplace(Axis(0), |&prev, curr| *curr += prev);

        let s0 = self.s0;
        log_paths.par_mapv_inplace(|x| s0 * x.exp());
        log_paths
    }

    /// Draws `steps × paths` normals from `rng` and builds the ensemble.
    pub fn sample_paths<R: Rng + ?Sized>(
        &self,
        grid: &TimeGrid,
        num_paths: usize,
        rng: &mut R,
    ) -> Array2<f64> {
        let normals = rng::standard_normal_matrix(rng, grid.steps(), num_paths);
        self.paths_from_normals(grid, normals.view())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_time_grid() {
        let grid = TimeGrid::new(2.0, 504).unwrap();
        assert_eq!(grid.points().len(), 505);
        assert_eq!(grid.steps(), 504);
        assert_eq!(grid.points()[0], 0.0);
        assert_relative_eq!(grid.horizon(), 2.0, epsilon = 1e-12);
        assert_relative_eq!(grid.dt(), 2.0 / 504.0, epsilon = 1e-15);
        let pts = grid.points();
        for k in 1..pts.len() {
            assert!(pts[k] > pts[k - 1]);
        }
    }

    #[test]
    fn test_time_grid_rejects_bad_input() {
        assert!(TimeGrid::new(0.0, 10).is_err());
        assert!(TimeGrid::new(1.0, 0).is_err());
    }

    #[test]
    fn test_paths_match_exact_steps() {
        let gbm = Gbm::new(
            100.0,
            EffectiveParams {
                mu: 0.05,
                sigma: 0.2,
            },
        );
        let grid = TimeGrid::new(1.0, 12).unwrap();
        let mut rng = rng::seed_rng_from_u64(11);
        let normals = rng::standard_normal_matrix(&mut rng, 12, 3);

        let paths = gbm.paths_from_normals(&grid, normals.view());
        assert_eq!(paths.dim(), (13, 3));

        for p in 0..3 {
            assert_eq!(paths[[0, p]], 100.0);
            let mut s = 100.0;
            for k in 0..12 {
                s = gbm.exact_step(s, grid.dt(), normals[[k, p]]);
                assert_relative_eq!(paths[[k + 1, p]], s, max_relative = 1e-10);
            }
        }
    }

    #[test]
    fn test_zero_volatility_is_deterministic() {
        let gbm = Gbm::new(
            100.0,
            EffectiveParams {
                mu: 0.05,
                sigma: 0.0,
            },
        );
        let grid = TimeGrid::new(1.0, 252).unwrap();
        let paths = gbm.sample_paths(&grid, 4, &mut rng::seed_rng_from_u64(3));

        for p in 0..4 {
            assert_relative_eq!(paths[[252, p]], 100.0 * 0.05f64.exp(), max_relative = 1e-10);
        }
    }

    #[test]
    fn test_all_cells_positive() {
        let gbm = Gbm::new(
            50.0,
            EffectiveParams {
                mu: -0.3,
                sigma: 0.9,
            },
        );
        let grid = TimeGrid::new(3.0, 756).unwrap();
        let paths = gbm.sample_paths(&grid, 64, &mut rng::seed_rng_from_u64(5));
        assert!(paths.iter().all(|&x| x > 0.0 && x.is_finite()));
    }
}
