//! Structured child-process execution with no shell interpretation.

use std::process::Command as OsCommand;
use std::time::Duration;

use capgate_authority::{AuditSink, AuthorityToken, Decision, Enforcer};
use capgate_exec_model::Command;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

use crate::errors::ExecError;
use crate::types::{ExecConfig, ExecResult};

/// Runs structured [`Command`]s as child processes.
///
/// Never builds a shell command line: `argv[0]` is `command.binary`,
/// `argv[1..]` is `command.args`, each pushed onto
/// [`std::process::Command`] as a discrete element.
pub struct Executor<'sink> {
    audit_sink: &'sink dyn AuditSink,
}

impl<'sink> Executor<'sink> {
    /// Build an executor that reports re-check denials to `audit_sink`.
    #[must_use]
    pub fn new(audit_sink: &'sink dyn AuditSink) -> Self {
        Self { audit_sink }
    }

    /// Re-check authority, then spawn and wait for `command`, honouring
    /// `exec_config.timeout_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`ExecError::AuthorityDenied`] if the executor's own
    /// authority re-check denies the command (defense in depth, I4), or
    /// [`ExecError::SpawnFailed`] if the OS refuses to spawn the child.
    pub fn execute(
        &self,
        command: &Command,
        token: &AuthorityToken,
        exec_config: ExecConfig,
        now: i64,
    ) -> Result<ExecResult, ExecError> {
        let enforcer = Enforcer::new(self.audit_sink);
        if matches!(enforcer.check(token, command, now), Decision::Denied(_)) {
            return Err(ExecError::AuthorityDenied);
        }

        let mut os_command = OsCommand::new(command.binary.as_str());
        os_command.args(&command.args);
        os_command.current_dir(&command.cwd);
        os_command.env_clear();
        os_command.envs(command.env_delta.iter().map(|(key, value)| (key.as_str(), value.as_str())));

        debug!(tool_id = command.tool_id.as_str(), "spawning child process");
        let mut child = os_command.spawn().map_err(ExecError::SpawnFailed)?;

        if exec_config.timeout_ms == 0 {
            let status = child.wait().map_err(ExecError::SpawnFailed)?;
            return Ok(ExecResult {
                exit_code: map_exit_status(status),
                timed_out: false,
            });
        }

        match child.wait_timeout(Duration::from_millis(exec_config.timeout_ms)).map_err(ExecError::SpawnFailed)? {
            Some(status) => Ok(ExecResult {
                exit_code: map_exit_status(status),
                timed_out: false,
            }),
            None => {
                warn!(tool_id = command.tool_id.as_str(), timeout_ms = exec_config.timeout_ms, "killing child after timeout");
                child.kill().map_err(ExecError::SpawnFailed)?;
                let status = child.wait().map_err(ExecError::SpawnFailed)?;
                Ok(ExecResult {
                    exit_code: map_exit_status(status),
                    timed_out: true,
                })
            }
        }
    }
}

#[cfg(unix)]
fn map_exit_status(status: std::process::ExitStatus) -> u8 {
    use std::os::unix::process::ExitStatusExt;

    if let Some(code) = status.code() {
        return u8::try_from(code).unwrap_or_else(|_| u8::try_from(code.rem_euclid(256)).unwrap_or(1));
    }
    if status.signal().is_some() {
        return 128;
    }
    if status.stopped_signal().is_some() {
        return 127;
    }
    1
}

#[cfg(not(unix))]
fn map_exit_status(status: std::process::ExitStatus) -> u8 {
    status.code().and_then(|code| u8::try_from(code).ok()).unwrap_or(1)
}
