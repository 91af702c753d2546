//! Domain model: identifiers, static tables and the schedule genome.
//!
//! # Key Types
//!
//! - [`Workcenter`]: the four-stage pipeline PLASTIC → SMT → PTH → ASSEMBLY
//! - [`StageKey`]: a (workcenter, machine) queue identifier
//! - [`ProductionData`]: read-only input tables shared by every operator
//! - [`Schedule`]: the genome, one ordered job queue per [`StageKey`]

mod data;
mod ids;
mod schedule;

pub use data::{EligibilityRule, Job, ProductionData, DEFAULT_SHIFT_HOURS};
pub use ids::{JobId, MachineId, StageKey, Workcenter};
pub use schedule::{Population, Schedule, Violation};
