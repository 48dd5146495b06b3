//! Executor configuration and outcome types.

/// Parameters controlling one [`Executor::execute`](crate::executor::Executor::execute) call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExecConfig {
    /// Wall-clock budget in milliseconds before the child is killed.
    /// `0` means wait indefinitely.
    pub timeout_ms: u64,
}

impl ExecConfig {
    /// Build a config with no timeout.
    #[must_use]
    pub const fn no_timeout() -> Self {
        Self { timeout_ms: 0 }
    }
}

/// Outcome of a completed (or timed-out) child process.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExecResult {
    /// Mapped exit code in `[0, 255]`.
    pub exit_code: u8,
    /// Whether the child was killed after exceeding `timeout_ms`.
    pub timed_out: bool,
}
