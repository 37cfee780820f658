// Allow our dollar.cents digit grouping convention (e.g., 100_00 = $100.00)
#![allow(clippy::inconsistent_digit_grouping)]

//! Throughput benchmarks for the simulation engine.
//!
//! Measures:
//! - Single-day simulation with a recovery ladder
//! - Full runs across profile shapes
//! - Batched simulation (sequential and, with `parallel`, rayon)
//! - Statistics aggregation over many runs

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tradesim::{
    AccountSnapshot, DrawdownTier, GainMode, NoopObserver, RecoveryStep, RiskProfile,
    SimulationRequest, SimulationRun, SimulationStatistics, Simulator, SizingMode, TierAction,
    resolve, simulate_day, simulate_run,
};

fn ladder_profile() -> RiskProfile {
    let mut p = RiskProfile {
        daily_loss_limit_cents: Some(400_00),
        ..RiskProfile::default()
    };
    p.recovery.steps = vec![
        RecoveryStep::Multiplier(1.0),
        RecoveryStep::Multiplier(1.5),
        RecoveryStep::Multiplier(2.0),
    ];
    p
}

fn compounding_profile() -> RiskProfile {
    RiskProfile {
        gain_mode: GainMode::Compounding {
            reinvest_percent: 50.0,
            stop_on_first_loss: false,
        },
        sizing: SizingMode::PercentOfBalance { risk_percent: 1.0 },
        ..ladder_profile()
    }
}

fn throttled_profile() -> RiskProfile {
    let mut p = compounding_profile();
    p.drawdown.tiers = vec![
        DrawdownTier {
            trigger_percent: 5.0,
            action: TierAction::ReduceRisk { percent: 50.0 },
        },
        DrawdownTier {
            trigger_percent: 20.0,
            action: TierAction::Pause,
        },
    ];
    p.weekly_loss_limit_cents = Some(1_000_00);
    p.monthly_loss_limit_cents = Some(2_500_00);
    p
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

/// Benchmark: one day with a three-rung ladder
fn bench_day(c: &mut Criterion) {
    let profile = ladder_profile();
    let risk = resolve(&profile, &AccountSnapshot::fresh(10_000_00));
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    c.bench_function("simulate_day", |b| {
        b.iter(|| black_box(simulate_day(&profile, &risk, 1, 0, 10_000_00, &mut rng)))
    });
}

/// Benchmark: a 12-month run per profile shape
fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate_run");
    let shapes = [
        ("ladder", ladder_profile()),
        ("compounding", compounding_profile()),
        ("throttled", throttled_profile()),
    ];

    for (name, profile) in shapes {
        let req = request(profile, 1, 12);
        group.throughput(Throughput::Elements(12 * 22));
        group.bench_with_input(BenchmarkId::from_parameter(name), &req, |b, req| {
            let mut rng = ChaCha8Rng::seed_from_u64(7);
            b.iter(|| black_box(simulate_run(req, 0, &mut rng, &mut NoopObserver)));
        });
    }

    group.finish();
}

/// Benchmark: whole batches through the builder
fn bench_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch");
    group.sample_size(10);

    for runs in [100u32, 1_000] {
        let req = request(compounding_profile(), runs, 12);
        group.throughput(Throughput::Elements(runs as u64));

        group.bench_with_input(BenchmarkId::new("sequential", runs), &req, |b, req| {
            b.iter(|| black_box(Simulator::new().seed(3).run(req)))
        });

        #[cfg(feature = "parallel")]
        group.bench_with_input(BenchmarkId::new("parallel", runs), &req, |b, req| {
            b.iter(|| black_box(Simulator::new().seed(3).run_parallel(req)))
        });
    }

    group.finish();
}

/// Benchmark: statistics over pre-computed runs
fn bench_statistics(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");

    for n in [100usize, 2_000] {
        let req = request(compounding_profile(), 1, 12);
        let runs: Vec<SimulationRun> = (0..n)
            .map(|i| {
                let mut rng = ChaCha8Rng::seed_from_u64(i as u64);
                simulate_run(&req, i, &mut rng, &mut NoopObserver)
            })
            .collect();

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &runs, |b, runs| {
            b.iter(|| black_box(SimulationStatistics::from_runs(runs)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_day, bench_run, bench_batch, bench_statistics);
criterion_main!(benches);
