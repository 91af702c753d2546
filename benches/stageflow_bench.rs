//! Criterion benchmarks for construction, evaluation and full GA runs.
//!
//! Uses synthetic shops with every workcenter populated, random
//! eligibility and random setup matrices.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use u_stageflow::construct::generate_optimized_population;
use u_stageflow::evaluate::evaluate_population;
use u_stageflow::ga::{ox_crossover, GaConfig, GaRunner};
use u_stageflow::model::{EligibilityRule, Job, JobId, ProductionData, StageKey, Workcenter};
use u_stageflow::random::create_rng;

// ===========================================================================
// Synthetic shop
// ===========================================================================

fn synthetic_shop(n_jobs: usize, seed: u64) -> (ProductionData, Vec<JobId>) {
    let mut rng = create_rng(seed);
    let mut data = ProductionData::new().with_assembly_buffer(0.5);
    let layout = [
        (Workcenter::Plastic, 4),
        (Workcenter::Smt, 3),
        (Workcenter::Pth, 2),
        (Workcenter::Assembly, 5),
    ];
    for (wc, count) in layout {
        for m in 0..count {
            let shifts = rng.random_range(1..=3);
            data.add_machine(wc, format!("{}-{m}", wc.name()), shifts)
                .expect("unique machine");
        }
    }

    for j in 0..n_jobs {
        let due = rng.random_range(1.0..(n_jobs as f64 / 2.0).max(2.0));
        let weight = rng.random_range(1.0..3.0);
        data.add_job(Job::new(j as u64, due).with_weight(weight))
            .expect("unique job");
    }
    let jobs = data.job_ids();

    for job in &jobs {
        for wc in Workcenter::PIPELINE {
            // ASSEMBLY always; upstream stages with some probability.
            if wc != Workcenter::Assembly && rng.random_bool(0.3) {
                continue;
            }
            let machines = data.machines(wc).to_vec();
            let rule = if rng.random_bool(0.2) {
                EligibilityRule::Mandatory(machines[rng.random_range(0..machines.len())].clone())
            } else {
                EligibilityRule::Preferential
            };
            data.apply_eligibility_rule(job, wc, &rule).expect("known job");
            for m in &machines {
                if data.is_eligible(job, m) {
                    let key = StageKey::new(wc, m.clone());
                    let hours = rng.random_range(2.0..20.0);
                    data.set_processing_hours(job, &key, hours).expect("valid time");
                }
            }
        }
    }

    for wc in Workcenter::PIPELINE {
        for m in data.machines(wc).to_vec() {
            let key = StageKey::new(wc, m);
            for from in &jobs {
                for to in &jobs {
                    if from != to {
                        let hours = rng.random_range(0.0..4.0);
                        data.set_setup_hours(&key, from, to, hours).expect("valid setup");
                    }
                }
            }
        }
    }

    data.validate().expect("synthetic shop is consistent");
    (data, jobs)
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");
    group.sample_size(10);

    for n in [20usize, 80, 200] {
        let (data, jobs) = synthetic_shop(n, 1);
        group.bench_with_input(BenchmarkId::from_parameter(n), &(data, jobs), |b, (d, j)| {
            b.iter(|| {
                let mut rng = create_rng(42);
                black_box(generate_optimized_population(j, d, 5, 20, &mut rng))
            })
        });
    }
    group.finish();
}

fn bench_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluation");
    group.sample_size(10);

    for n in [20usize, 80, 200] {
        let (data, jobs) = synthetic_shop(n, 2);
        let mut rng = create_rng(42);
        let population = generate_optimized_population(&jobs, &data, 5, 50, &mut rng);
        for parallel in [false, true] {
            group.bench_with_input(
                BenchmarkId::new(if parallel { "parallel" } else { "serial" }, n),
                &parallel,
                |b, &p| b.iter(|| black_box(evaluate_population(&population, &data, p))),
            );
        }
    }
    group.finish();
}

fn bench_ox_crossover(c: &mut Criterion) {
    let mut group = c.benchmark_group("ox_crossover");
    group.sample_size(10);

    for n in [20usize, 80] {
        let (data, jobs) = synthetic_shop(n, 3);
        let mut rng = create_rng(42);
        let pool = generate_optimized_population(&jobs, &data, 5, 30, &mut rng);
        group.bench_with_input(BenchmarkId::from_parameter(n), &pool, |b, pool| {
            b.iter(|| {
                let mut rng = create_rng(7);
                black_box(ox_crossover(pool, &jobs, &data, 30, &mut rng))
            })
        });
    }
    group.finish();
}

fn bench_ga_run(c: &mut Criterion) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::WARN)
        .try_init();

    let mut group = c.benchmark_group("ga_run");
    group.sample_size(10);

    for (n, pop, gen) in [(20usize, 30usize, 20usize), (80, 50, 10)] {
        let (data, jobs) = synthetic_shop(n, 4);
        let config = GaConfig {
            population_size: pop,
            max_generations: gen,
            seed: Some(42),
            ..GaConfig::default()
        };
        group.bench_with_input(
            BenchmarkId::new(format!("j{n}_p{pop}_g{gen}"), n),
            &(data, jobs, config),
            |b, (d, j, c)| {
                b.iter(|| black_box(GaRunner::run_with_cancel(d, j, c, None)))
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_construction,
    bench_evaluation,
    bench_ox_crossover,
    bench_ga_run
);
criterion_main!(benches);
