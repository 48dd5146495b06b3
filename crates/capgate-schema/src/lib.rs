//! Typed CLI tool ontology: schema types, internal-consistency checks, and
//! the version-gated [`SchemaStore`].

mod errors;
mod store;
mod types;

pub use errors::SchemaError;
pub use store::SchemaStore;
pub use types::{
    ArgType, BinaryPath, FlagDef, FlagName, PositionalDef, RiskLevel, SchemaVersion, ToolId,
    ToolSchema,
};
