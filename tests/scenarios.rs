// Allow our dollar.cents digit grouping convention (e.g., 100_00 = $100.00)
#![allow(clippy::inconsistent_digit_grouping)]

//! End-to-end scenarios with fully determined outcomes.

use tradesim::{
    GainMode, NoopObserver, Outcome, RecoveryStep, RiskProfile, SequenceSource, SimulationRequest,
    Simulator, SizingMode, SkipReason, TradeEdge, TradeMode, simulate, simulate_run,
};

fn edge(win_rate: f64, breakeven_rate: f64, reward_risk_ratio: f64) -> TradeEdge {
    TradeEdge {
        win_rate,
        reward_risk_ratio,
        breakeven_rate,
    }
}

fn request(profile: RiskProfile, runs: u32, months: u32) -> SimulationRequest {
    SimulationRequest {
        profile,
        simulation_count: runs,
        initial_balance_cents: 10_000_00,
        months_per_run: months,
        ruin_threshold_percent: 50.0,
    }
}

// ============================================================================
// Certain win, single target
// ============================================================================

#[test]
fn certain_win_one_trade_per_day() {
    let profile = RiskProfile {
        edge: edge(100.0, 0.0, 1.5),
        base_risk_cents: 123_45,
        commission_cents: 2_50,
        ..RiskProfile::default()
    };
    let req = request(profile, 10, 1);
    let mut src = rand::thread_rng();

    // round(12345 × 1.5) - 250 = 18518 - 250
    let expected_day = 185_18 - 2_50;
    let mut totals = Vec::new();
    for i in 0..10 {
        let run = simulate_run(&req, i, &mut src, &mut NoopObserver);
        assert_eq!(run.days.len(), 22);
        for day in &run.days {
            assert_eq!(day.trades.len(), 1);
            assert_eq!(day.trades[0].outcome, Outcome::Win);
            assert_eq!(day.pnl_cents, expected_day);
        }
        totals.push(run.total_pnl_cents);
    }
    assert!(totals.iter().all(|&t| t == 22 * expected_day));

    let result = simulate(&req);
    assert_eq!(result.statistics.best_case_pnl_cents, 22 * expected_day);
    assert_eq!(result.statistics.worst_case_pnl_cents, 22 * expected_day);
    assert_eq!(result.statistics.positive_run_percent, 100.0);
    assert_eq!(result.statistics.sharpe_ratio, 0.0);
    assert_eq!(result.statistics.profit_factor, 999.0);
}

// ============================================================================
// Certain loss, two-step recovery ladder
// ============================================================================

fn losing_ladder_profile() -> RiskProfile {
    let mut profile = RiskProfile {
        edge: edge(0.0, 0.0, 2.0),
        base_risk_cents: 100_00,
        commission_cents: 1_00,
        ..RiskProfile::default()
    };
    profile.recovery.steps = vec![RecoveryStep::Multiplier(0.5), RecoveryStep::Multiplier(0.25)];
    profile
}

#[test]
fn certain_loss_climbs_whole_ladder() {
    let req = request(losing_ladder_profile(), 1, 1);
    let mut src = rand::thread_rng();
    let run = simulate_run(&req, 0, &mut src, &mut NoopObserver);

    for day in &run.days {
        assert_eq!(day.trades.len(), 3);
        assert!(day.trades.iter().all(|t| t.outcome == Outcome::Loss));
        let risks: Vec<i64> = day.trades.iter().map(|t| t.risk_cents).collect();
        assert_eq!(risks, vec![100_00, 50_00, 25_00]);
        assert_eq!(day.pnl_cents, -(101_00 + 51_00 + 26_00));
        assert_eq!(day.trades[1].mode, TradeMode::LossRecovery);
    }
}

#[test]
fn ladder_capped_by_daily_limit() {
    let mut profile = losing_ladder_profile();
    profile.daily_loss_limit_cents = Some(150_00);
    let req = request(profile, 1, 1);
    let mut src = rand::thread_rng();
    let run = simulate_run(&req, 0, &mut src, &mut NoopObserver);

    for day in &run.days {
        // Base -101; budget 150 - 101 - 1 = 48 caps the first rung; the
        // second rung finds the limit already reached.
        assert_eq!(day.trades.len(), 2);
        assert_eq!(day.trades[1].risk_cents, 48_00);
        assert_eq!(day.pnl_cents, -150_00);
    }
}

// ============================================================================
// Certain breakeven
// ============================================================================

#[test]
fn breakeven_ends_every_day() {
    let mut profile = RiskProfile {
        edge: edge(50.0, 100.0, 2.0),
        commission_cents: 3_00,
        gain_mode: GainMode::Compounding {
            reinvest_percent: 75.0,
            stop_on_first_loss: false,
        },
        ..RiskProfile::default()
    };
    profile.recovery.steps = vec![RecoveryStep::Multiplier(1.0)];
    let req = request(profile, 5, 2);

    let result = Simulator::new().seed(8).run(&req).unwrap();
    let run = result.sample_run.unwrap();
    assert_eq!(run.days.len(), 44);
    for day in &run.days {
        assert_eq!(day.trades.len(), 1);
        assert_eq!(day.trades[0].outcome, Outcome::Breakeven);
        assert_eq!(day.pnl_cents, -3_00 * day.trades.len() as i64);
    }
    assert_eq!(result.statistics.observed_win_rate, 0.0);
    assert_eq!(result.statistics.averages.trades, 44.0);
}

// ============================================================================
// Monthly limit breached
// ============================================================================

#[test]
fn monthly_limit_skips_rest_of_month() {
    let profile = RiskProfile {
        edge: edge(0.0, 0.0, 2.0),
        base_risk_cents: 100_00,
        monthly_loss_limit_cents: Some(500_00),
        ..RiskProfile::default()
    };
    let req = request(profile, 1, 2);
    let mut src = SequenceSource::constant(0.5);
    let run = simulate_run(&req, 0, &mut src, &mut NoopObserver);

    for month in &run.months {
        assert!(month.monthly_limit_hit);
        assert_eq!(month.pnl_cents, -500_00);
    }
    for (i, day) in run.days.iter().enumerate() {
        let day_of_month = i % 22;
        if day_of_month < 5 {
            assert!(!day.is_skipped());
        } else {
            assert_eq!(day.skipped, Some(SkipReason::MonthlyLimit));
            assert_eq!(day.skipped.map(|r| r.to_string()).as_deref(), Some("monthlyLimit"));
            assert!(day.trades.is_empty());
        }
    }
    assert_eq!(run.tally.monthly_limit_hits, 2);
    assert_eq!(run.tally.skipped_monthly_limit, 34);
}

// ============================================================================
// Percent-of-balance sizing
// ============================================================================

#[test]
fn percent_sizing_first_day_risk_is_one_percent() {
    let profile = RiskProfile {
        sizing: SizingMode::PercentOfBalance { risk_percent: 1.0 },
        ..RiskProfile::default()
    };
    let mut req = request(profile, 1, 1);
    req.initial_balance_cents = 10_000_000;
    let mut src = SequenceSource::new(vec![0.3, 0.7]);
    let run = simulate_run(&req, 0, &mut src, &mut NoopObserver);
    assert_eq!(run.days[0].trades[0].risk_cents, 100_000);
}
