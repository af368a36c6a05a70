// src/error.rs
use std::fmt;

/// Error types for the wealth-sde library
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Simulation input missing or out of domain
    InvalidConfiguration { field: String, reason: String },

    /// Jump variance leaves no room for the diffusion component
    InvalidParameterCombination {
        sigma: f64,
        crash_lambda: f64,
        crash_size: f64,
        jump_variance: f64,
    },

    /// Configuration file could not be read or parsed
    ConfigFile { path: String, reason: String },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidConfiguration { field, reason } => {
                write!(f, "Invalid configuration for '{}': {}", field, reason)
            }
            SimError::InvalidParameterCombination {
                sigma,
                crash_lambda,
                crash_size,
                jump_variance,
            } => {
                write!(
                    f,
                    "Invalid parameter combination: jump variance λs² = {:.6} ≥ σ² = {:.6} (σ={}, λ={}, s={}). No diffusive volatility remains.",
                    jump_variance,
                    sigma * sigma,
                    sigma,
                    crash_lambda,
                    crash_size
                )
            }
            SimError::ConfigFile { path, reason } => {
                write!(f, "Failed to load configuration '{}': {}", path, reason)
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Result type alias for wealth-sde operations
pub type SimResult<T> = Result<T, SimError>;

/// Validation utilities
pub mod validation {
    use super::{SimError, SimResult};

    fn invalid(name: &str, reason: String) -> SimError {
        SimError::InvalidConfiguration {
            field: name.to_string(),
            reason,
        }
    }

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> SimResult<()> {
        validate_finite(name, value)?;
        if value <= 0.0 {
            Err(invalid(name, format!("{} must be positive (> 0)", value)))
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> SimResult<()> {
        validate_finite(name, value)?;
        if value < 0.0 {
            Err(invalid(name, format!("{} must be non-negative (≥ 0)", value)))
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter lies in the half-open range `[min, max)`
    pub fn validate_range(name: &str, value: f64, min: f64, max: f64) -> SimResult<()> {
        validate_finite(name, value)?;
        if value < min || value >= max {
            Err(invalid(
                name,
                format!("{} must be in range [{}, {})", value, min, max),
            ))
        } else {
            Ok(())
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> SimResult<()> {
        if !value.is_finite() {
            Err(invalid(
                name,
                format!("{} must be finite (not NaN or infinite)", value),
            ))
        } else {
            Ok(())
        }
    }

    /// Validate paths count
    pub fn validate_paths(paths: usize) -> SimResult<()> {
        if paths == 0 {
            Err(invalid("paths", "must be greater than 0".to_string()))
        } else if paths > 10_000_000 {
            Err(invalid(
                "paths",
                "exceeds maximum allowed (10 million)".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    /// Validate steps count
    pub fn validate_steps(steps: usize) -> SimResult<()> {
        if steps == 0 {
            Err(invalid("steps", "must be greater than 0".to_string()))
        } else if steps > 100_000 {
            Err(invalid(
                "steps",
                "exceeds maximum allowed (100,000)".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}
