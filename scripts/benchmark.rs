// scripts/benchmark.rs
use std::env;
use std::fs::File;
use std::io::{self, Write};
use wealth_sde::math_utils::Timer;
use wealth_sde::mc::engine::{generate_paths, Overlays, SimConfig};
use wealth_sde::rng;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_cores: usize,
    rustc_flags: String,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_cores: num_cpus::get(),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
            rayon_threads: rayon::current_num_threads(),
        }
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: String,
    paths: usize,
    steps: usize,
    time_ms: f64,
    cells_per_sec: f64,
    terminal_mean: f64,
}

fn run_case(name: &str, cfg: &SimConfig) -> BenchmarkResult {
    let mut rng = rng::seed_rng_from_u64(42);
    let mut timer = Timer::new();
    timer.start();
    let sim = generate_paths(cfg, &mut rng).expect("Valid configuration");
    let time_ms = timer.elapsed_ms();

    let cells = (cfg.steps + 1) * cfg.paths;
    BenchmarkResult {
        name: name.to_string(),
        paths: cfg.paths,
        steps: cfg.steps,
        time_ms,
        cells_per_sec: cells as f64 / (time_ms / 1000.0),
        terminal_mean: sim.terminal_values().mean().unwrap_or(f64::NAN),
    }
}

fn run_benchmarks() -> Vec<BenchmarkResult> {
    let mut results = Vec::new();

    for &paths in &[1_000, 10_000, 50_000] {
        println!("Running benchmarks with {} paths...", paths);
        let base = SimConfig {
            paths,
            steps: 252 * 10,
            t: 10.0,
            ..Default::default()
        };

        results.push(run_case(
            "Diffusion only",
            &SimConfig {
                overlays: Overlays::NONE,
                ..base.clone()
            },
        ));
        results.push(run_case(
            "Crash overlay",
            &SimConfig {
                crash_lambda: 0.5,
                crash_size: 0.2,
                ..base.clone()
            },
        ));
        results.push(run_case(
            "Crash + contributions",
            &SimConfig {
                crash_lambda: 0.5,
                crash_size: 0.2,
                monthly_investment: 10.0,
                bonus_investment: 50.0,
                ..base
            },
        ));
    }

    results
}

fn write_results_to_csv(
    results: &[BenchmarkResult],
    system_info: &SystemInfo,
    filename: &str,
) -> io::Result<()> {
    let mut file = File::create(filename)?;

    writeln!(file, "# OS: {}", system_info.os)?;
    writeln!(file, "# CPU Cores: {}", system_info.cpu_cores)?;
    writeln!(file, "# RUSTFLAGS: {}", system_info.rustc_flags)?;
    writeln!(file, "# Rayon Threads: {}", system_info.rayon_threads)?;
    writeln!(
        file,
        "# Benchmark Date: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(file, "Benchmark,Paths,Steps,Time_ms,Cells_per_sec,Terminal_mean")?;

    for r in results {
        writeln!(
            file,
            "{},{},{},{:.2},{:.0},{:.6}",
            r.name, r.paths, r.steps, r.time_ms, r.cells_per_sec, r.terminal_mean
        )?;
    }
    Ok(())
}

fn main() {
    println!("wealth-sde Benchmark");
    println!("====================\n");

    let system_info = SystemInfo::gather();
    println!("  OS: {}", system_info.os);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  RUSTFLAGS: {}", system_info.rustc_flags);
    println!("  Rayon Threads: {}\n", system_info.rayon_threads);

    let results = run_benchmarks();

    println!("\n{:=<84}", "");
    println!(
        "{:<24} {:>8} {:>8} {:>12} {:>16} {:>12}",
        "Benchmark", "Paths", "Steps", "Time (ms)", "Cells/sec", "Mean S_T"
    );
    println!("{:-<84}", "");
    for r in &results {
        println!(
            "{:<24} {:>8} {:>8} {:>12.2} {:>16.0} {:>12.4}",
            r.name, r.paths, r.steps, r.time_ms, r.cells_per_sec, r.terminal_mean
        );
    }
    println!("{:=<84}", "");

    let filename = format!(
        "benchmark_results_{}.csv",
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    );
    match write_results_to_csv(&results, &system_info, &filename) {
        Ok(()) => println!("Results written to {}", filename),
        Err(e) => eprintln!("Could not write {}: {}", filename, e),
    }
}
