//! Identifiers: jobs, machines, workcenters and the composite stage key.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ScheduleError;

/// Identifier of a production job (an order flowing through the pipeline).
///
/// Cheap to clone: schedules copy job ids on every crossover and mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JobId(Arc<str>);

impl JobId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl From<u64> for JobId {
    fn from(n: u64) -> Self {
        Self::new(n.to_string())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a machine. A machine belongs to exactly one workcenter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MachineId(Arc<str>);

impl MachineId {
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MachineId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for MachineId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A production stage.
///
/// Variants are declared in pipeline order, so the derived `Ord` is the
/// processing order used by the constructor and the simulator.
///
/// PLASTIC and SMT run in parallel; PTH waits for both; ASSEMBLY waits for
/// PTH plus the buffer delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Workcenter {
    Plastic,
    Smt,
    Pth,
    Assembly,
}

impl Workcenter {
    /// All workcenters in pipeline order.
    pub const PIPELINE: [Workcenter; 4] = [
        Workcenter::Plastic,
        Workcenter::Smt,
        Workcenter::Pth,
        Workcenter::Assembly,
    ];

    /// Position in the pipeline (0-based).
    pub fn index(self) -> usize {
        match self {
            Workcenter::Plastic => 0,
            Workcenter::Smt => 1,
            Workcenter::Pth => 2,
            Workcenter::Assembly => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Workcenter::Plastic => "PLASTIC",
            Workcenter::Smt => "SMT",
            Workcenter::Pth => "PTH",
            Workcenter::Assembly => "ASSEMBLY",
        }
    }
}

impl fmt::Display for Workcenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Workcenter {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PLASTIC" => Ok(Workcenter::Plastic),
            "SMT" => Ok(Workcenter::Smt),
            "PTH" => Ok(Workcenter::Pth),
            "ASSEMBLY" => Ok(Workcenter::Assembly),
            other => Err(ScheduleError::MalformedTable(format!(
                "unknown workcenter '{other}'"
            ))),
        }
    }
}

/// A (workcenter, machine) pair: one processing queue in a schedule.
///
/// Ordered by workcenter (pipeline order), then machine id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageKey {
    pub workcenter: Workcenter,
    pub machine: MachineId,
}

impl StageKey {
    pub fn new(workcenter: Workcenter, machine: impl Into<MachineId>) -> Self {
        Self {
            workcenter,
            machine: machine.into(),
        }
    }
}

impl fmt::Display for StageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.workcenter, self.machine)
    }
}
