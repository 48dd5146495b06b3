//! Authority token and decision-procedure value types.

use std::path::{Path, PathBuf};

use capgate_schema::{BinaryPath, ToolId};
use serde::{Deserialize, Serialize};

use crate::errors::AuthorityTagError;

/// Capability level granted to a project, each a distinct contract rather
/// than a superset of the ones below it.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum AuthorityLevel {
    /// No execute rights; the token may only be inspected.
    Observe,
    /// Tools may run, but never with any argv beyond the binary itself.
    ToolsOnly,
    /// Tools may run with parameters, subject to the allow-lists.
    ParameterizedTools,
    /// Full command execution within the allow-lists.
    ScopedCommands,
}

impl TryFrom<&str> for AuthorityLevel {
    type Error = AuthorityTagError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "observe" => Ok(Self::Observe),
            "tools_only" => Ok(Self::ToolsOnly),
            "parameterized_tools" => Ok(Self::ParameterizedTools),
            "scoped_commands" => Ok(Self::ScopedCommands),
            other => Err(AuthorityTagError::InvalidLevel { value: other.to_owned() }),
        }
    }
}

/// Network reachability policy carried by a token.
///
/// The enforcer's decision procedure does not currently gate on this
/// field — see [`DenialReason::NetworkPolicyViolation`] — but it travels
/// with the token so a network-aware executor extension has a typed
/// policy to consult without reshaping [`AuthorityToken`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NetworkPolicy {
    /// No network access permitted.
    Deny,
    /// Loopback-only access permitted.
    Localhost,
    /// Access permitted per an external allow-list.
    Allowlist,
}

impl TryFrom<&str> for NetworkPolicy {
    type Error = AuthorityTagError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "deny" => Ok(Self::Deny),
            "localhost" => Ok(Self::Localhost),
            "allowlist" => Ok(Self::Allowlist),
            other => Err(AuthorityTagError::InvalidNetworkPolicy { value: other.to_owned() }),
        }
    }
}

/// Capability envelope scoped to one project.
///
/// Produced by the configuration loader, consumed by the [`Enforcer`] and
/// [`Executor`](capgate_exec_model), treated as immutable for its
/// lifetime. Cheap to clone: it carries no resource, only owned strings
/// and paths.
///
/// [`Enforcer`]: crate::enforcer::Enforcer
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthorityToken {
    /// 32-byte hash of the project root path.
    pub project_id: [u8; 32],
    /// Capability level granted.
    pub level: AuthorityLevel,
    /// Unix timestamp after which the token is no longer valid; `0` means
    /// session-only (never expires by wall clock).
    pub expiration: i64,
    /// Tool ids this token permits.
    pub allowed_tools: Vec<ToolId>,
    /// Binaries this token permits, compared by string equality.
    pub allowed_bins: Vec<BinaryPath>,
    /// Canonicalised filesystem root a command's `cwd` must be under.
    pub fs_root: PathBuf,
    /// Network reachability policy.
    pub network: NetworkPolicy,
}

impl AuthorityToken {
    /// Whether `tool_id` is present in `allowed_tools`.
    #[must_use]
    pub fn permits_tool(&self, tool_id: &ToolId) -> bool {
        self.allowed_tools.iter().any(|allowed| allowed == tool_id)
    }

    /// Whether `binary` is present in `allowed_bins`.
    #[must_use]
    pub fn permits_binary(&self, binary: &BinaryPath) -> bool {
        self.allowed_bins.iter().any(|allowed| allowed == binary)
    }

    /// Whether `cwd` has `fs_root` as a path prefix.
    ///
    /// Operates on the exact byte sequence of both paths; the enforcer
    /// performs no canonicalisation of its own, so a caller that does not
    /// canonicalise before constructing the token or the command gets no
    /// jailing guarantee from this check alone.
    #[must_use]
    pub fn permits_cwd(&self, cwd: &Path) -> bool {
        cwd.starts_with(&self.fs_root)
    }

    /// Whether `now` (Unix seconds) is past `expiration`, when
    /// `expiration` is non-zero.
    #[must_use]
    pub fn is_expired(&self, now: i64) -> bool {
        self.expiration != 0 && now > self.expiration
    }
}

/// The tag attached to every refused command; the atom the audit log
/// records.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// No authority token was loaded for the project.
    NoAuthorityLoaded,
    /// `command.tool_id` is absent from `allowed_tools`.
    ToolNotInAllowList,
    /// `command.binary` is absent from `allowed_bins`.
    BinaryNotInAllowList,
    /// A parameter fell outside the bounds the schema or token permits.
    ParametersOutOfBounds,
    /// `command.cwd` is not under `fs_root`.
    CwdOutsideFsRoot,
    /// The token's `expiration` has passed.
    AuthorityExpired,
    /// The token's level does not permit this command.
    InsufficientLevel,
    /// The underlying schema validation failed.
    SchemaValidationFailed,
    /// The command violates the token's network policy.
    NetworkPolicyViolation,
}
