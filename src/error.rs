//! Error taxonomy.
//!
//! Only input problems are errors. Jobs dropped during crossover repair and
//! population members that fail to build are reported through `tracing`
//! and never abort a run.

use thiserror::Error;

use crate::model::{JobId, MachineId};

/// Errors surfaced to the caller.
///
/// The first three variants are input errors: they mean the static tables
/// cannot support a run for the given job set and are terminal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("job {0} has no due date")]
    MissingDueDate(JobId),

    #[error("job {0} has no eligible machine in any workcenter")]
    NoEligibleMachine(JobId),

    #[error("malformed table: {0}")]
    MalformedTable(String),

    #[error("unknown machine {0}")]
    UnknownMachine(MachineId),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("population is empty")]
    EmptyPopulation,
}

impl ScheduleError {
    /// Whether this error is an input error (bad static tables or jobs).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ScheduleError::MissingDueDate(_)
                | ScheduleError::NoEligibleMachine(_)
                | ScheduleError::MalformedTable(_)
                | ScheduleError::UnknownMachine(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
