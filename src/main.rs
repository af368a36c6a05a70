//! wealth-sde CLI - run a simulation from a TOML configuration file
//!
//! ```text
//! wealth-sde --config config.toml --output paths.csv --summary summary.csv
//! ```

use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wealth_sde::analytics::summary::{
    checkpoint_statistics, crash_experience_by_band, TerminalSummary,
};
use wealth_sde::config::load_config;
use wealth_sde::math_utils::Timer;
use wealth_sde::{output, simulate, SimResult};

/// Monte Carlo wealth simulation with crashes and periodic contributions
#[derive(Parser)]
#[command(name = "wealth-sde")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Write the time grid and ensemble to this CSV file
    #[arg(short, long)]
    output: Option<String>,

    /// Maximum number of paths written to the ensemble CSV
    #[arg(long, default_value = "100")]
    max_output_paths: usize,

    /// Write terminal statistics to this CSV file
    #[arg(short, long)]
    summary: Option<String>,

    /// Override the configured seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the configured number of paths
    #[arg(long)]
    paths: Option<usize>,

    /// Years between checkpoint rows
    #[arg(long, default_value = "5")]
    checkpoint_years: usize,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

fn run(cli: &Cli) -> SimResult<()> {
    let mut cfg = load_config(&cli.config)?;
    if let Some(seed) = cli.seed {
        cfg.seed = Some(seed);
    }
    if let Some(paths) = cli.paths {
        cfg.paths = paths;
    }
    info!(config = %cli.config, "configuration loaded");

    let timer = Timer::new();
    let sim = simulate(&cfg)?;
    info!(elapsed_ms = timer.elapsed_ms(), "simulation finished");

    let principal = cfg.contribution_plan().principal_schedule(cfg.s0, cfg.steps);
    let summary = TerminalSummary::from_values(sim.paths.row(cfg.steps), principal[cfg.steps]);

    println!("\nTerminal statistics ({} paths):", cfg.paths);
    println!("  Principal:        {:>16.0}", principal[cfg.steps]);
    println!("  Mean:             {:>16.0}", summary.mean);
    println!("  Median:           {:>16.0}", summary.median);
    println!("  Std dev:          {:>16.0}", summary.std_dev);
    println!("  Min:              {:>16.0}", summary.min);
    println!("  Max:              {:>16.0}", summary.max);
    println!("  5th percentile:   {:>16.0}", summary.p5);
    println!("  95th percentile:  {:>16.0}", summary.p95);
    println!("  Below principal:  {:>15.1}%", summary.below_principal_pct);

    let checkpoints = checkpoint_statistics(&sim.time, &sim.paths, &principal, cli.checkpoint_years);
    println!(
        "\n{:>5} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14} {:>8}",
        "Year", "Principal", "Mean", "Min", "25%", "Median", "75%", "Max", "Below%"
    );
    for c in &checkpoints {
        println!(
            "{:>5} {:>14.0} {:>14.0} {:>14.0} {:>14.0} {:>14.0} {:>14.0} {:>14.0} {:>7.1}%",
            c.year, c.principal, c.mean, c.min, c.p25, c.median, c.p75, c.max, c.below_principal_pct
        );
    }

    if cfg.crash_params().is_active() {
        let bands = crash_experience_by_band(&sim.paths, cfg.steps, cfg.crash_size);
        let labels = ["0-5%", "5-25%", "25-50%", "50-75%", "75-95%", "95-100%"];
        println!(
            "\nPaths with a >{:.0}% drawdown inside a 10-step window, by terminal band:",
            cfg.crash_size * 100.0
        );
        for (label, ratio) in labels.iter().zip(bands.iter()) {
            println!("  {:>8}: {:>5.1}%", label, ratio);
        }
    }

    if let Some(path) = &cli.output {
        match output::write_paths_to_csv(path, &sim.time, &sim.paths, cli.max_output_paths) {
            Ok(()) => info!(file = %path, "ensemble written"),
            Err(e) => error!(file = %path, error = %e, "failed to write ensemble"),
        }
    }
    if let Some(path) = &cli.summary {
        match output::write_summary_to_csv(path, &summary.to_rows()) {
            Ok(()) => info!(file = %path, "summary written"),
            Err(e) => error!(file = %path, error = %e, "failed to write summary"),
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
