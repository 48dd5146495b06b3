//! Executor failure types.

use std::io;

use thiserror::Error;

/// Failure to execute a [`Command`](capgate_exec_model::Command).
#[derive(Debug, Error)]
pub enum ExecError {
    /// The executor's own re-check of authority denied the command.
    #[error("authority denied this command at execution time")]
    AuthorityDenied,
    /// The OS refused to spawn the child process.
    #[error("failed to spawn child process: {0}")]
    SpawnFailed(#[source] io::Error),
    /// Allocation failure while building the child-process specification.
    #[error("out of memory building the child process specification")]
    OutOfMemory,
}
