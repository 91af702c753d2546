//! Random shops for integration tests.

#![allow(dead_code)]

use rand::Rng;
use u_stageflow::model::{EligibilityRule, Job, JobId, ProductionData, StageKey, Workcenter};
use u_stageflow::random::create_rng;

/// A consistent shop with `n_jobs` jobs, 1-3 machines per workcenter,
/// partial eligibility and dense setup matrices, fully determined by `seed`.
pub fn random_shop(n_jobs: usize, seed: u64) -> (ProductionData, Vec<JobId>) {
    let mut rng = create_rng(seed);
    let buffer = rng.random_range(0.0..1.0);
    let mut data = ProductionData::new().with_assembly_buffer(buffer);

    for wc in Workcenter::PIPELINE {
        for m in 0..rng.random_range(1..=3) {
            data.add_machine(wc, format!("{}-{m}", wc.name()), rng.random_range(1..=3))
                .unwrap();
        }
    }

    for j in 0..n_jobs {
        let due = rng.random_range(0.0..(n_jobs as f64 + 1.0));
        let weight = rng.random_range(0.5..3.0);
        data.add_job(Job::new(j as u64, due).with_weight(weight)).unwrap();
    }
    let jobs = data.job_ids();

    for job in &jobs {
        for wc in Workcenter::PIPELINE {
            if wc != Workcenter::Assembly && rng.random_bool(0.4) {
                continue;
            }
            let machines = data.machines(wc).to_vec();
            let rule = match rng.random_range(0..3) {
                0 => EligibilityRule::Mandatory(machines[rng.random_range(0..machines.len())].clone()),
                1 => EligibilityRule::AllowList(vec![machines[0].clone()]),
                _ => EligibilityRule::Preferential,
            };
            data.apply_eligibility_rule(job, wc, &rule).unwrap();
            for m in &machines {
                if data.is_eligible(job, m) {
                    let key = StageKey::new(wc, m.clone());
                    data.set_processing_time(job, &key, rng.random_range(0.1..3.0))
                        .unwrap();
                }
            }
        }
    }

    for wc in Workcenter::PIPELINE {
        for m in data.machines(wc).to_vec() {
            let key = StageKey::new(wc, m);
            for from in &jobs {
                for to in &jobs {
                    // Sparse: some pairs stay without a setup entry.
                    if from != to && rng.random_bool(0.8) {
                        data.set_setup_time(&key, from, to, rng.random_range(0.0..0.5))
                            .unwrap();
                    }
                }
            }
        }
    }

    data.validate().unwrap();
    (data, jobs)
}
