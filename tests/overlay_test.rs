// tests/overlay_test.rs
use ndarray::Array2;
use wealth_sde::mc::investment::{apply_investment_overlay, ContributionPlan};
use wealth_sde::models::crash::{apply_crash_overlay, CrashParams, CrashSchedule};
use wealth_sde::models::effective::EffectiveParams;
use wealth_sde::models::gbm::{Gbm, TimeGrid};
use wealth_sde::rng;

fn diffusion_paths(steps: usize, paths: usize, seed: u64) -> Array2<f64> {
    let params = EffectiveParams {
        mu: 0.06,
        sigma: 0.25,
    };
    let gbm = Gbm::new(100.0, params);
    let grid = TimeGrid::new(steps as f64 / 252.0, steps).unwrap();
    gbm.sample_paths(&grid, paths, &mut rng::seed_rng_from_u64(seed))
}

#[test]
fn test_crash_permanence_relative_to_no_crash_path() {
    let steps = 504;
    let severity = 0.25;
    let base = diffusion_paths(steps, 300, 5);

    let params = CrashParams::new(3.0, severity);
    let schedule =
        CrashSchedule::sample(&params, steps, 300, &mut rng::seed_rng_from_u64(6)).unwrap();
    assert!(schedule.total_arrivals() > 0);

    let mut crashed = base.clone();
    apply_crash_overlay(&mut crashed, &schedule, severity);

    for path in 0..300 {
        let windows = schedule.windows(path);
        for step in 0..=steps {
            let ratio = crashed[[step, path]] / base[[step, path]];
            let expected = schedule.multiplier(path, step, severity);
            assert!(
                (ratio - expected).abs() < 1e-12,
                "path {} step {}: ratio {} vs multiplier {}",
                path,
                step,
                ratio,
                expected
            );
        }

        // after the first window closes, the (1 - s) factor never goes away
        if let Some(first) = windows.first() {
            for step in first.closes_at()..=steps {
                let ratio = crashed[[step, path]] / base[[step, path]];
                assert!(
                    ratio <= (1.0 - severity) + 1e-12,
                    "path {} step {} lost its permanent factor: {}",
                    path,
                    step,
                    ratio
                );
            }
        }
    }
}

#[test]
fn test_high_crash_rate_always_closes_a_window() {
    let steps = 252;
    let num_paths = 5_000;
    let params = CrashParams::new(50.0, 0.01);
    let schedule =
        CrashSchedule::sample(&params, steps, num_paths, &mut rng::seed_rng_from_u64(12)).unwrap();

    let with_permanent = (0..num_paths)
        .filter(|&p| schedule.closed_before(p, steps) >= 1)
        .count();
    let share = with_permanent as f64 / num_paths as f64;
    println!("Share of paths with a closed crash window: {}", share);
    assert!(share > 0.999, "Only {} of paths carried a permanent crash", share);

    // expected arrivals: 50 per year over one year
    let mean_arrivals = schedule.total_arrivals() as f64 / num_paths as f64;
    assert!((mean_arrivals - 50.0).abs() < 1.0, "Mean arrivals {}", mean_arrivals);
}

#[test]
fn test_overlapping_arrivals_all_contribute() {
    let mut paths = Array2::<f64>::from_elem((40, 1), 100.0);
    // three arrivals inside one window span
    let schedule = CrashSchedule::from_arrivals(&[vec![2, 5, 8]]);
    apply_crash_overlay(&mut paths, &schedule, 0.1);

    let terminal = paths[[39, 0]];
    let expected = 100.0 * 0.9f64.powi(3);
    assert!(
        (terminal - expected).abs() < 1e-9,
        "Terminal {} should carry all three permanent factors ({})",
        terminal,
        expected
    );

    // step 8: windows at 2, 5, 8 are all open
    let s8 = 100.0 * (1.0 - 0.1 * 6.0 / 9.0) * (1.0 - 0.1 * 3.0 / 9.0) * 1.0;
    assert!((paths[[8, 0]] - s8).abs() < 1e-9);
}

#[test]
fn test_contributions_are_additive() {
    let steps = 756;
    let base = diffusion_paths(steps, 50, 21);

    let monthly = ContributionPlan::new(10.0, 0.0, None);
    let bonus = ContributionPlan::new(0.0, 40.0, None);
    let both = ContributionPlan::new(10.0, 40.0, None);

    let mut with_monthly = base.clone();
    apply_investment_overlay(&mut with_monthly, &monthly);
    let mut with_bonus = base.clone();
    apply_investment_overlay(&mut with_bonus, &bonus);
    let mut with_both = base.clone();
    apply_investment_overlay(&mut with_both, &both);

    let combined = &with_monthly + &with_bonus - &base;
    for (a, b) in with_both.iter().zip(combined.iter()) {
        assert!((a - b).abs() < 1e-9 * a.abs().max(1.0), "{} vs {}", a, b);
    }
}

#[test]
fn test_contribution_tracks_forward_price_ratio() {
    let steps = 252;
    let base = diffusion_paths(steps, 20, 33);
    let plan = ContributionPlan::new(0.0, 1000.0, None);

    let mut wealth = base.clone();
    apply_investment_overlay(&mut wealth, &plan);

    for path in 0..20 {
        let entry = base[[126, path]];
        for step in 0..=steps {
            let added = wealth[[step, path]] - base[[step, path]];
            let expected = if step < 126 {
                0.0
            } else {
                1000.0 * base[[step, path]] / entry
            };
            assert!(
                (added - expected).abs() < 1e-8,
                "path {} step {}: added {} expected {}",
                path,
                step,
                added,
                expected
            );
        }
    }
}

#[test]
fn test_contribution_cutoff_respected() {
    let steps = 252 * 3;
    let base = Array2::<f64>::from_elem((steps + 1, 1), 1.0);
    let plan = ContributionPlan::new(1.0, 0.0, Some(1.0));

    let mut wealth = base.clone();
    apply_investment_overlay(&mut wealth, &plan);

    // 12 contributions in year one, none afterwards
    assert!((wealth[[252, 0]] - 13.0).abs() < 1e-12);
    assert!((wealth[[steps, 0]] - 13.0).abs() < 1e-12);
}
