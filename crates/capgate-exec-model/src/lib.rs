//! Structured invocation model: parsed-argument types, the validator, and
//! the command builder that turns a validated invocation into argv.

mod builder;
mod types;
mod validator;

pub use builder::{BuildError, CommandBuilder};
pub use types::{Command, ParsedArgs, ParsedFlag};
pub use validator::{ValidationError, ValidationErrorKind, validate};
