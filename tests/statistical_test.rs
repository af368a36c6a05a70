// tests/statistical_test.rs
use wealth_sde::analytics::lognormal;
use wealth_sde::mc::engine::{generate_paths, Overlays, SimConfig};
use wealth_sde::rng;

fn log_returns(cfg: &SimConfig, seed: u64) -> Vec<f64> {
    let sim = generate_paths(cfg, &mut rng::seed_rng_from_u64(seed)).expect("Valid configuration");
    sim.terminal_values()
        .iter()
        .map(|&s| (s / cfg.s0).ln())
        .collect()
}

fn mean_and_variance(samples: &[f64]) -> (f64, f64) {
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var)
}

#[test]
fn test_pure_gbm_log_returns_match_lognormal_law() {
    let cfg = SimConfig {
        paths: 10_000,
        steps: 252,
        s0: 100.0,
        mu: 0.05,
        sigma: 0.2,
        t: 1.0,
        overlays: Overlays::NONE,
        ..Default::default()
    };
    let samples = log_returns(&cfg, 314);
    let (mean, var) = mean_and_variance(&samples);

    let expected_mean = lognormal::expected_log_return(cfg.mu, cfg.sigma, cfg.t);
    let expected_var = lognormal::log_return_variance(cfg.sigma, cfg.t);
    println!(
        "Log-return mean {:.5} (expected {:.5}), variance {:.5} (expected {:.5})",
        mean, expected_mean, var, expected_var
    );
    assert!((mean - expected_mean).abs() < 0.008, "Mean {} vs {}", mean, expected_mean);
    assert!((var - expected_var).abs() < 0.003, "Variance {} vs {}", var, expected_var);

    let d = lognormal::ks_statistic_normal(&samples, expected_mean, expected_var.sqrt())
        .expect("Non-empty sample");
    let critical = 1.63 / (samples.len() as f64).sqrt();
    assert!(d < critical, "KS distance {} above {}", d, critical);
}

#[test]
fn test_crash_corrected_drift_preserves_log_mean() {
    // (μ - σ²/2 + λs²/2) T = (0.05 - 0.02 + 0.01) * 5
    let cfg = SimConfig {
        paths: 8_000,
        steps: 252 * 5,
        s0: 100.0,
        mu: 0.05,
        sigma: 0.2,
        t: 5.0,
        crash_lambda: 0.5,
        crash_size: 0.2,
        overlays: Overlays::CRASH,
        ..Default::default()
    };
    let samples = log_returns(&cfg, 2718);
    let (mean, _) = mean_and_variance(&samples);
    println!("Log-return mean with crashes: {:.5}", mean);
    assert!((mean - 0.2).abs() < 0.025, "Mean {} vs 0.2", mean);
}

#[test]
fn test_crashes_widen_the_log_return_distribution() {
    let base = SimConfig {
        paths: 5_000,
        steps: 252 * 2,
        mu: 0.05,
        sigma: 0.2,
        t: 2.0,
        crash_lambda: 1.0,
        crash_size: 0.15,
        ..Default::default()
    };
    let (_, var_with) = mean_and_variance(&log_returns(&base, 1));
    let (_, var_without) = mean_and_variance(&log_returns(
        &SimConfig {
            overlays: Overlays::NONE,
            ..base.clone()
        },
        1,
    ));

    // diffusion variance shrinks by λs² per year; crash jumps add λ ln(1-s)² per year
    let jump_var = base.crash_lambda * (1.0 - base.crash_size).ln().powi(2) * base.t;
    let diffusion_var = (base.sigma.powi(2) - base.crash_lambda * base.crash_size.powi(2)) * base.t;
    println!(
        "Variance with crashes {:.5} (approx {:.5}), without {:.5}",
        var_with,
        jump_var + diffusion_var,
        var_without
    );
    assert!(var_with > var_without);
    assert!((var_with - (jump_var + diffusion_var)).abs() < 0.01);
}
