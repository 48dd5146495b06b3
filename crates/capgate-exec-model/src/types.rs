//! Producer-supplied argument structure and the structured command it
//! builds into.

use std::path::PathBuf;

use capgate_schema::{BinaryPath, ToolId};

/// One flag as supplied by an untrusted producer, in the order it was
/// given.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParsedFlag {
    /// Long-form flag name, without the leading `--`.
    pub name: String,
    /// Value text, or `None` for a bare toggle.
    pub value: Option<String>,
}

/// An invocation's arguments, prior to schema validation.
///
/// Order among `flags` is the order the producer supplied them; order of
/// `positionals` is significant for the resulting argv.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParsedArgs {
    /// Flags in producer-supplied order.
    pub flags: Vec<ParsedFlag>,
    /// Positional values in producer-supplied order.
    pub positionals: Vec<String>,
}

impl ParsedArgs {
    /// Build an empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count how many times `name` appears among `flags`.
    #[must_use]
    pub fn flag_occurrences(&self, name: &str) -> usize {
        self.flags.iter().filter(|flag| flag.name == name).count()
    }
}

/// A fully structured, validated invocation: every element of `args` is a
/// discrete argv element destined for the child process directly, never a
/// string that downstream code will re-split.
///
/// Produced by [`CommandBuilder`](crate::builder::CommandBuilder) from a
/// validated `(ToolSchema, ParsedArgs)` pair, consumed by the enforcer and
/// executor, and never mutated after construction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Command {
    /// Id of the schema this command was built from.
    pub tool_id: ToolId,
    /// Resolved executable path; becomes argv[0].
    pub binary: BinaryPath,
    /// Argv elements after the binary, each one discrete.
    pub args: Vec<String>,
    /// Working directory the child process should run in.
    pub cwd: PathBuf,
    /// Environment variables to apply on top of the executor's base
    /// environment, in the order they should be applied.
    pub env_delta: Vec<(String, String)>,
    /// Capabilities the underlying schema requested.
    pub requested_capabilities: Vec<String>,
}
