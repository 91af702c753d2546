//! Static input tables.
//!
//! [`ProductionData`] holds everything a run reads but never writes: jobs
//! with due dates and weights, machines per workcenter with shift counts,
//! eligibility, processing times and setup times. It is built once, checked
//! with [`validate`](ProductionData::validate), and then shared read-only
//! (it is `Sync`) across all operators and worker threads.

use std::collections::{BTreeMap, HashMap};

use super::ids::{JobId, MachineId, StageKey, Workcenter};
use crate::error::{Result, ScheduleError};

/// Hours per shift used when none is configured.
pub const DEFAULT_SHIFT_HOURS: f64 = 7.5;

/// A production order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Job {
    pub id: JobId,

    /// Due date as an offset from the schedule start, in elapsed days.
    pub due_date: Option<f64>,

    /// Priority weight applied to tardiness. Defaults to 1.0.
    pub weight: f64,
}

impl Job {
    pub fn new(id: impl Into<JobId>, due_date: f64) -> Self {
        Self {
            id: id.into(),
            due_date: Some(due_date),
            weight: 1.0,
        }
    }

    /// A job without a due date. It can be evaluated (due date 0) but not
    /// constructed into an initial schedule.
    pub fn without_due_date(id: impl Into<JobId>) -> Self {
        Self {
            id: id.into(),
            due_date: None,
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

/// How a job's eligible machines within one workcenter are derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EligibilityRule {
    /// The job runs only on this machine.
    Mandatory(MachineId),
    /// The job may run on any machine of the workcenter.
    Preferential,
    /// The job may run only on the listed machines.
    AllowList(Vec<MachineId>),
}

#[derive(Debug, Clone, Copy)]
struct MachineInfo {
    workcenter: Workcenter,
    shifts: u32,
}

/// Read-only tables for a scheduling run.
#[derive(Debug, Clone)]
pub struct ProductionData {
    jobs: Vec<Job>,
    job_index: HashMap<JobId, usize>,
    machines: BTreeMap<Workcenter, Vec<MachineId>>,
    machine_info: HashMap<MachineId, MachineInfo>,
    shift_hours: f64,
    assembly_buffer: f64,
    eligibility: HashMap<JobId, Vec<MachineId>>,
    processing: HashMap<StageKey, HashMap<JobId, f64>>,
    setup: HashMap<StageKey, HashMap<JobId, HashMap<JobId, f64>>>,
}

impl Default for ProductionData {
    fn default() -> Self {
        Self {
            jobs: Vec::new(),
            job_index: HashMap::new(),
            machines: BTreeMap::new(),
            machine_info: HashMap::new(),
            shift_hours: DEFAULT_SHIFT_HOURS,
            assembly_buffer: 0.0,
            eligibility: HashMap::new(),
            processing: HashMap::new(),
            setup: HashMap::new(),
        }
    }
}

impl ProductionData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the working hours per shift.
    pub fn with_shift_hours(mut self, hours: f64) -> Self {
        self.shift_hours = hours;
        self
    }

    /// Sets the delay between a job's PTH completion and its earliest
    /// ASSEMBLY start, in elapsed days.
    pub fn with_assembly_buffer(mut self, buffer: f64) -> Self {
        self.assembly_buffer = buffer;
        self
    }

    // ---- Loading ----

    pub fn add_job(&mut self, job: Job) -> Result<()> {
        if self.job_index.contains_key(&job.id) {
            return Err(ScheduleError::MalformedTable(format!(
                "job {} registered twice",
                job.id
            )));
        }
        if !job.weight.is_finite() || job.weight < 0.0 {
            return Err(ScheduleError::MalformedTable(format!(
                "job {} has invalid weight {}",
                job.id, job.weight
            )));
        }
        if job.due_date.is_some_and(|d| !d.is_finite()) {
            return Err(ScheduleError::MalformedTable(format!(
                "job {} has a non-finite due date",
                job.id
            )));
        }
        self.job_index.insert(job.id.clone(), self.jobs.len());
        self.jobs.push(job);
        Ok(())
    }

    /// Registers a machine under a workcenter with its shift count.
    ///
    /// Machines keep their registration order; that order breaks ties in
    /// the constructor and in crossover repair.
    pub fn add_machine(
        &mut self,
        workcenter: Workcenter,
        machine: impl Into<MachineId>,
        shifts: u32,
    ) -> Result<()> {
        let machine = machine.into();
        if let Some(info) = self.machine_info.get(&machine) {
            return Err(ScheduleError::MalformedTable(format!(
                "machine {machine} already belongs to {}",
                info.workcenter
            )));
        }
        if shifts == 0 {
            return Err(ScheduleError::MalformedTable(format!(
                "machine {machine} has zero shifts"
            )));
        }
        self.machine_info
            .insert(machine.clone(), MachineInfo { workcenter, shifts });
        self.machines.entry(workcenter).or_default().push(machine);
        Ok(())
    }

    /// Marks `job` as eligible on `machine`.
    pub fn set_eligible(&mut self, job: &JobId, machine: &MachineId) -> Result<()> {
        self.require_job(job)?;
        self.require_machine(machine)?;
        let list = self.eligibility.entry(job.clone()).or_default();
        if !list.contains(machine) {
            list.push(machine.clone());
        }
        Ok(())
    }

    /// Replaces the job's eligibility within `workcenter` with the machines
    /// the rule selects.
    pub fn apply_eligibility_rule(
        &mut self,
        job: &JobId,
        workcenter: Workcenter,
        rule: &EligibilityRule,
    ) -> Result<()> {
        self.require_job(job)?;
        let wc_machines = self.machines(workcenter).to_vec();

        let selected: Vec<MachineId> = match rule {
            EligibilityRule::Mandatory(m) => {
                if !wc_machines.contains(m) {
                    return Err(ScheduleError::MalformedTable(format!(
                        "mandatory machine {m} for job {job} is not in {workcenter}"
                    )));
                }
                vec![m.clone()]
            }
            EligibilityRule::Preferential => wc_machines.clone(),
            EligibilityRule::AllowList(allowed) => wc_machines
                .iter()
                .filter(|m| allowed.contains(m))
                .cloned()
                .collect(),
        };

        let list = self.eligibility.entry(job.clone()).or_default();
        list.retain(|m| !wc_machines.contains(m));
        list.extend(selected);
        Ok(())
    }

    /// Sets a processing time in elapsed days.
    pub fn set_processing_time(
        &mut self,
        job: &JobId,
        key: &StageKey,
        days: f64,
    ) -> Result<()> {
        self.require_job(job)?;
        self.require_stage(key)?;
        require_duration(days, || format!("processing time of {job} on {key}"))?;
        self.processing
            .entry(key.clone())
            .or_default()
            .insert(job.clone(), days);
        Ok(())
    }

    /// Sets a processing time given in working hours, converted with the
    /// machine's shift count.
    pub fn set_processing_hours(
        &mut self,
        job: &JobId,
        key: &StageKey,
        hours: f64,
    ) -> Result<()> {
        self.require_stage(key)?;
        let days = self.working_days(&key.machine, hours);
        self.set_processing_time(job, key, days)
    }

    /// Sets the setup time in elapsed days when `to` follows `from` on the
    /// machine of `key`.
    pub fn set_setup_time(
        &mut self,
        key: &StageKey,
        from: &JobId,
        to: &JobId,
        days: f64,
    ) -> Result<()> {
        self.require_stage(key)?;
        require_duration(days, || format!("setup {from}->{to} on {key}"))?;
        self.setup
            .entry(key.clone())
            .or_default()
            .entry(from.clone())
            .or_default()
            .insert(to.clone(), days);
        Ok(())
    }

    /// Sets a setup time given in working hours.
    pub fn set_setup_hours(
        &mut self,
        key: &StageKey,
        from: &JobId,
        to: &JobId,
        hours: f64,
    ) -> Result<()> {
        self.require_stage(key)?;
        let days = self.working_days(&key.machine, hours);
        self.set_setup_time(key, from, to, days)
    }

    // ---- Queries ----

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// All job ids in registration order.
    pub fn job_ids(&self) -> Vec<JobId> {
        self.jobs.iter().map(|j| j.id.clone()).collect()
    }

    pub fn job(&self, id: &JobId) -> Option<&Job> {
        self.job_index.get(id).map(|&i| &self.jobs[i])
    }

    pub fn due_date(&self, id: &JobId) -> Option<f64> {
        self.job(id).and_then(|j| j.due_date)
    }

    /// Priority weight, 1.0 for unknown jobs.
    pub fn weight(&self, id: &JobId) -> f64 {
        self.job(id).map_or(1.0, |j| j.weight)
    }

    /// Workcenters that have at least one machine, in pipeline order.
    pub fn workcenters(&self) -> impl Iterator<Item = Workcenter> + '_ {
        self.machines.keys().copied()
    }

    /// Machines of a workcenter in registration order.
    pub fn machines(&self, workcenter: Workcenter) -> &[MachineId] {
        self.machines
            .get(&workcenter)
            .map_or(&[][..], |v| v.as_slice())
    }

    pub fn workcenter_of(&self, machine: &MachineId) -> Option<Workcenter> {
        self.machine_info.get(machine).map(|i| i.workcenter)
    }

    /// Shift count of a machine (1 if unknown).
    pub fn shifts(&self, machine: &MachineId) -> u32 {
        self.machine_info.get(machine).map_or(1, |i| i.shifts)
    }

    pub fn shift_hours(&self) -> f64 {
        self.shift_hours
    }

    pub fn assembly_buffer(&self) -> f64 {
        self.assembly_buffer
    }

    /// Converts working hours on a machine into elapsed days.
    pub fn working_days(&self, machine: &MachineId, hours: f64) -> f64 {
        hours / (self.shifts(machine) as f64 * self.shift_hours)
    }

    pub fn is_eligible(&self, job: &JobId, machine: &MachineId) -> bool {
        self.eligibility
            .get(job)
            .is_some_and(|list| list.contains(machine))
    }

    /// Eligible machines for `job` within `workcenter`, in registration order.
    pub fn eligible_machines<'a>(
        &'a self,
        job: &'a JobId,
        workcenter: Workcenter,
    ) -> impl Iterator<Item = &'a MachineId> + 'a {
        self.machines(workcenter)
            .iter()
            .filter(move |m| self.is_eligible(job, m))
    }

    /// Whether the job has an operation (any eligible machine) in `workcenter`.
    pub fn has_operation(&self, job: &JobId, workcenter: Workcenter) -> bool {
        self.eligible_machines(job, workcenter).next().is_some()
    }

    pub fn processing_time(&self, job: &JobId, key: &StageKey) -> Option<f64> {
        self.processing.get(key).and_then(|m| m.get(job)).copied()
    }

    pub fn setup_time(&self, key: &StageKey, from: &JobId, to: &JobId) -> Option<f64> {
        self.setup
            .get(key)
            .and_then(|m| m.get(from))
            .and_then(|m| m.get(to))
            .copied()
    }

    // ---- Validation ----

    /// Checks table consistency for the whole job list.
    pub fn validate(&self) -> Result<()> {
        if self.jobs.is_empty() {
            return Err(ScheduleError::MalformedTable("no jobs registered".into()));
        }
        if !self.shift_hours.is_finite() || self.shift_hours <= 0.0 {
            return Err(ScheduleError::MalformedTable(format!(
                "shift length must be positive, got {}",
                self.shift_hours
            )));
        }
        if !self.assembly_buffer.is_finite() || self.assembly_buffer < 0.0 {
            return Err(ScheduleError::MalformedTable(format!(
                "assembly buffer must be non-negative, got {}",
                self.assembly_buffer
            )));
        }
        let ids = self.job_ids();
        self.validate_jobs(&ids)
    }

    /// Checks that every job of a run subset is known, can be processed
    /// somewhere, and has a processing time wherever it is eligible.
    pub fn validate_jobs(&self, jobs: &[JobId]) -> Result<()> {
        for job in jobs {
            self.require_job(job)?;
            let mut any = false;
            for wc in self.workcenters() {
                for machine in self.eligible_machines(job, wc) {
                    any = true;
                    let key = StageKey::new(wc, machine.clone());
                    if self.processing_time(job, &key).is_none() {
                        return Err(ScheduleError::MalformedTable(format!(
                            "job {job} is eligible on {key} but has no processing time"
                        )));
                    }
                }
            }
            if !any {
                return Err(ScheduleError::NoEligibleMachine(job.clone()));
            }
        }
        Ok(())
    }

    fn require_job(&self, job: &JobId) -> Result<()> {
        if self.job_index.contains_key(job) {
            Ok(())
        } else {
            Err(ScheduleError::MalformedTable(format!("unknown job {job}")))
        }
    }

    fn require_machine(&self, machine: &MachineId) -> Result<()> {
        if self.machine_info.contains_key(machine) {
            Ok(())
        } else {
            Err(ScheduleError::UnknownMachine(machine.clone()))
        }
    }

    fn require_stage(&self, key: &StageKey) -> Result<()> {
        match self.workcenter_of(&key.machine) {
            Some(wc) if wc == key.workcenter => Ok(()),
            Some(wc) => Err(ScheduleError::MalformedTable(format!(
                "machine {} belongs to {wc}, not {}",
                key.machine, key.workcenter
            ))),
            None => Err(ScheduleError::UnknownMachine(key.machine.clone())),
        }
    }
}

fn require_duration(value: f64, what: impl FnOnce() -> String) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ScheduleError::MalformedTable(format!(
            "{} must be a non-negative number, got {value}",
            what()
        )))
    }
}
