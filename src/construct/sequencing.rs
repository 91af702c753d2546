//! Greedy setup-aware resequencing.

use crate::model::{JobId, ProductionData, Schedule, StageKey};

/// Reorders every machine queue to reduce setup time.
///
/// Per queue: the first job stays first. Then, repeatedly, among the next
/// `lookahead` unplaced jobs (in their current order) the one with the
/// smallest setup time after the last placed job is placed next. Missing
/// setup entries never win; if no candidate has one, the next job in order
/// is placed. Choices are never revisited.
///
/// A `lookahead` of 0 is treated as 1, which leaves every queue unchanged.
pub fn optimize_sequence_with_setup(
    schedule: &Schedule,
    data: &ProductionData,
    lookahead: usize,
) -> Schedule {
    schedule
        .iter()
        .map(|(key, seq)| (key.clone(), resequence(key, seq, data, lookahead.max(1))))
        .collect()
}

fn resequence(key: &StageKey, seq: &[JobId], data: &ProductionData, lookahead: usize) -> Vec<JobId> {
    let mut remaining: Vec<JobId> = seq.to_vec();
    let mut placed: Vec<JobId> = Vec::with_capacity(seq.len());
    if remaining.is_empty() {
        return placed;
    }
    placed.push(remaining.remove(0));

    while !remaining.is_empty() {
        let last = &placed[placed.len() - 1];
        let window = lookahead.min(remaining.len());

        let mut best: Option<(usize, f64)> = None;
        for (i, candidate) in remaining[..window].iter().enumerate() {
            if let Some(setup) = data.setup_time(key, last, candidate) {
                if best.is_none_or(|(_, s)| setup < s) {
                    best = Some((i, setup));
                }
            }
        }

        let idx = best.map_or(0, |(i, _)| i);
        placed.push(remaining.remove(idx));
    }

    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::ids;
    use crate::model::{Job, MachineId, Workcenter};

    fn setup_shop(pairs: &[(&str, &str, f64)], jobs: &[&str]) -> ProductionData {
        let mut data = ProductionData::new();
        data.add_machine(Workcenter::Smt, "M", 1).unwrap();
        let key = StageKey::new(Workcenter::Smt, "M");
        for j in jobs {
            data.add_job(Job::new(*j, 1.0)).unwrap();
            let id = JobId::from(*j);
            data.set_eligible(&id, &MachineId::from("M")).unwrap();
            data.set_processing_time(&id, &key, 1.0).unwrap();
        }
        for (a, b, s) in pairs {
            data.set_setup_time(&key, &JobId::from(*a), &JobId::from(*b), *s)
                .unwrap();
        }
        data
    }

    fn single(seq: &[&str]) -> Schedule {
        let mut s = Schedule::new();
        s.set_sequence(StageKey::new(Workcenter::Smt, "M"), ids(seq));
        s
    }

    #[test]
    fn test_single_successor_unchanged() {
        let data = setup_shop(&[("X", "Y", 2.0), ("Y", "X", 5.0)], &["X", "Y"]);
        let out = optimize_sequence_with_setup(&single(&["X", "Y"]), &data, 2);
        assert_eq!(out, single(&["X", "Y"]));
    }

    #[test]
    fn test_picks_cheapest_in_window() {
        let data = setup_shop(
            &[("A", "B", 5.0), ("A", "C", 1.0), ("C", "B", 1.0)],
            &["A", "B", "C"],
        );
        let out = optimize_sequence_with_setup(&single(&["A", "B", "C"]), &data, 2);
        assert_eq!(out, single(&["A", "C", "B"]));
    }

    #[test]
    fn test_window_limits_candidates() {
        let data = setup_shop(
            &[("A", "B", 5.0), ("A", "C", 1.0), ("B", "C", 1.0)],
            &["A", "B", "C"],
        );
        let out = optimize_sequence_with_setup(&single(&["A", "B", "C"]), &data, 1);
        assert_eq!(out, single(&["A", "B", "C"]));
    }

    #[test]
    fn test_missing_setup_never_preferred() {
        // A->B unknown, A->C known (even if large): C wins.
        let data = setup_shop(&[("A", "C", 9.0)], &["A", "B", "C"]);
        let out = optimize_sequence_with_setup(&single(&["A", "B", "C"]), &data, 3);
        assert_eq!(out, single(&["A", "C", "B"]));
    }

    #[test]
    fn test_no_known_setup_keeps_order() {
        let data = setup_shop(&[], &["A", "B", "C"]);
        let out = optimize_sequence_with_setup(&single(&["A", "B", "C"]), &data, 3);
        assert_eq!(out, single(&["A", "B", "C"]));
    }

    #[test]
    fn test_zero_lookahead_keeps_all_jobs() {
        let data = setup_shop(&[("A", "C", 1.0)], &["A", "B", "C"]);
        let out = optimize_sequence_with_setup(&single(&["A", "B", "C"]), &data, 0);
        assert_eq!(out, single(&["A", "B", "C"]));
    }
}
