//! Shared test shops.

use crate::model::{EligibilityRule, Job, JobId, MachineId, ProductionData, StageKey, Workcenter};

pub(crate) fn ids(names: &[&str]) -> Vec<JobId> {
    names.iter().map(|n| JobId::from(*n)).collect()
}

/// A six-job shop spanning all four workcenters, with partial eligibility,
/// distinct processing times and sequence-dependent setups.
pub(crate) fn small_shop() -> (ProductionData, Vec<JobId>) {
    let mut data = ProductionData::new().with_assembly_buffer(0.5);

    let layout: [(Workcenter, &[&str]); 4] = [
        (Workcenter::Plastic, &["INJ 1", "INJ 2"]),
        (Workcenter::Smt, &["SMT 1", "SMT 2"]),
        (Workcenter::Pth, &["PTH 1"]),
        (Workcenter::Assembly, &["L1", "L2", "L3"]),
    ];
    for (wc, machines) in layout {
        for m in machines {
            data.add_machine(wc, *m, 3).unwrap();
        }
    }

    let jobs = [
        Job::new("J1", 5.0),
        Job::new("J2", 3.0).with_weight(2.0),
        Job::new("J3", 8.0),
        Job::new("J4", 2.0).with_weight(1.5),
        Job::new("J5", 6.0),
        Job::new("J6", 4.0),
    ];
    for job in jobs {
        data.add_job(job).unwrap();
    }
    let all = data.job_ids();

    let pref = EligibilityRule::Preferential;
    for j in &all[..3] {
        data.apply_eligibility_rule(j, Workcenter::Plastic, &pref).unwrap();
    }
    data.apply_eligibility_rule(
        &all[3],
        Workcenter::Plastic,
        &EligibilityRule::Mandatory(MachineId::from("INJ 2")),
    )
    .unwrap();
    for (i, j) in all.iter().enumerate() {
        if i != 4 {
            data.apply_eligibility_rule(j, Workcenter::Smt, &pref).unwrap();
        }
        if [0, 1, 3, 5].contains(&i) {
            data.apply_eligibility_rule(j, Workcenter::Pth, &pref).unwrap();
        }
        let rule = match i {
            0 => EligibilityRule::AllowList(vec![MachineId::from("L1"), MachineId::from("L2")]),
            2 => EligibilityRule::Mandatory(MachineId::from("L3")),
            _ => pref.clone(),
        };
        data.apply_eligibility_rule(j, Workcenter::Assembly, &rule).unwrap();
    }

    for wc in Workcenter::PIPELINE {
        let machines = data.machines(wc).to_vec();
        for (mi, m) in machines.iter().enumerate() {
            let key = StageKey::new(wc, m.clone());
            for (ji, j) in all.iter().enumerate() {
                if data.is_eligible(j, m) {
                    let t = (ji as f64 + 1.0) * 0.5 + mi as f64 * 0.25;
                    data.set_processing_time(j, &key, t).unwrap();
                }
                for (ki, k) in all.iter().enumerate() {
                    if ji != ki {
                        let s = 0.1 * (((ji + ki) % 3) as f64 + 1.0);
                        data.set_setup_time(&key, j, k, s).unwrap();
                    }
                }
            }
        }
    }

    data.validate().unwrap();
    (data, all)
}

/// Two ASSEMBLY-only jobs on one machine: A (due 10, weight 1) and
/// B (due 5, weight 2), processing time 3 each, no setup.
pub(crate) fn assembly_pair() -> (ProductionData, Vec<JobId>) {
    let mut data = ProductionData::new();
    data.add_machine(Workcenter::Assembly, "M1", 1).unwrap();
    data.add_job(Job::new("A", 10.0)).unwrap();
    data.add_job(Job::new("B", 5.0).with_weight(2.0)).unwrap();
    let key = StageKey::new(Workcenter::Assembly, "M1");
    let m1 = MachineId::from("M1");
    for j in ["A", "B"] {
        let job = JobId::from(j);
        data.set_eligible(&job, &m1).unwrap();
        data.set_processing_time(&job, &key, 3.0).unwrap();
    }
    let jobs = data.job_ids();
    (data, jobs)
}
