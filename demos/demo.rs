// demos/demo.rs
use wealth_sde::analytics::lognormal;
use wealth_sde::analytics::summary::TerminalSummary;
use wealth_sde::math_utils::Timer;
use wealth_sde::mc::engine::{simulate, Overlays, SimConfig};

fn report(name: &str, cfg: &SimConfig) {
    let mut timer = Timer::new();
    timer.start();
    let sim = simulate(cfg).expect("Valid configuration");
    let elapsed = timer.elapsed_ms();

    let principal = cfg.contribution_plan().principal_schedule(cfg.s0, cfg.steps);
    let summary = TerminalSummary::from_values(sim.paths.row(cfg.steps), principal[cfg.steps]);

    println!("\n--- {} ---", name);
    println!("Paths: {}, Steps: {}, Time: {:.1} ms", cfg.paths, cfg.steps, elapsed);
    println!("Principal paid in: {:.2}", principal[cfg.steps]);
    println!(
        "Terminal mean: {:.2}  median: {:.2}  std: {:.2}",
        summary.mean, summary.median, summary.std_dev
    );
    println!(
        "5%-95% range: {:.2} - {:.2}  below principal: {:.1}%",
        summary.p5, summary.p95, summary.below_principal_pct
    );
}

fn main() {
    println!("wealth-sde Demo");
    println!("===============");

    let base = SimConfig {
        paths: 20_000,
        steps: 252 * 10,
        s0: 100.0,
        mu: 0.05,
        sigma: 0.2,
        t: 10.0,
        seed: Some(42),
        ..Default::default()
    };

    println!(
        "Analytic E[S_T] without crashes or contributions: {:.2}",
        lognormal::expected_terminal_price(base.s0, base.mu, base.t)
    );
    report(
        "Pure GBM",
        &SimConfig {
            overlays: Overlays::NONE,
            ..base.clone()
        },
    );

    let crashes = SimConfig {
        crash_lambda: 0.1,
        crash_size: 0.3,
        ..base.clone()
    };
    report("GBM with crashes (λ=0.1, s=30%)", &crashes);

    let dca = SimConfig {
        monthly_investment: 10.0,
        bonus_investment: 50.0,
        investment_years: Some(5.0),
        ..crashes.clone()
    };
    report("Crashes + contributions for 5 years", &dca);

    let uncorrected = SimConfig {
        overlays: Overlays::INVESTMENT,
        ..dca
    };
    report("Contributions only (crash stage disabled)", &uncorrected);
}
