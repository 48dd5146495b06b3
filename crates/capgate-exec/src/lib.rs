//! Structured child-process execution: the only crate in the workspace
//! that touches `std::process`.

mod errors;
mod executor;
mod types;

pub use errors::ExecError;
pub use executor::Executor;
pub use types::{ExecConfig, ExecResult};
