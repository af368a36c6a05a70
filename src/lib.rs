//! # wealth-sde: Monte Carlo Wealth Trajectories with Crashes and Contributions
//!
//! Simulates an ensemble of asset-price paths under geometric Brownian motion,
//! overlays a compound crash process, and compounds periodic capital
//! contributions into each path.
//!
//! ## Key Features
//!
//! - **Jump-adjusted parameters**: Diffusion drift/volatility corrected so the
//!   combined diffusion + crash process keeps the target moments
//! - **Crash overlay**: Poisson-like arrivals, 10-step linear decay, permanent
//!   post-crash rescaling, overlapping crashes tracked independently
//! - **Contribution overlay**: Monthly and bonus injections compounding at the
//!   path's own realised return
//! - **Reproducible**: The random source is injected; seeded runs are
//!   identical regardless of thread count
//!
//! ## Quick Start
//!
//! ```rust
//! use wealth_sde::mc::engine::{simulate, SimConfig};
//!
//! let config = SimConfig {
//!     paths: 500,
//!     s0: 100.0,
//!     mu: 0.05,
//!     sigma: 0.2,
//!     t: 1.0,
//!     monthly_investment: 10.0,
//!     crash_lambda: 0.1,
//!     crash_size: 0.3,
//!     seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let sim = simulate(&config).expect("Valid configuration");
//! assert_eq!(sim.paths.dim(), (253, 500));
//! assert!(sim.paths.row(0).iter().all(|&s| s == 100.0));
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! EffectiveParams::correct → Gbm::sample_paths → apply_crash_overlay → apply_investment_overlay
//! ```

// Module declarations
pub mod analytics;
pub mod config;
pub mod error;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod output;
pub mod rng;

// Re-export commonly used types for convenience
pub use error::{SimError, SimResult};
pub use mc::engine::{generate_paths, simulate, Overlays, SimConfig, Simulation};
