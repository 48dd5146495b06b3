//! Validation and execution of multi-step plans from untrusted
//! producers.

mod errors;
mod loader;
mod runner;
mod types;

pub use errors::PlanLoadError;
pub use loader::load_plan;
pub use runner::{PlanExecution, PlanRunner, StepOutcome};
pub use types::{ParamEntry, Plan, PlanStep, PlanValidation, StepValidation};
