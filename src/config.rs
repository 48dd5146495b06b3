//! Authority configuration document loading.
//!
//! Produces the [`AuthorityToken`] the enforcer consumes; config file
//! loading itself is external-collaborator territory per the core's
//! scope, but the typed decode step lives here so callers never reach
//! into a generic value bag at runtime.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use capgate_authority::{AuthorityLevel, AuthorityTagError, AuthorityToken, NetworkPolicy};
use capgate_schema::{BinaryPath, SchemaError, ToolId};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{info, warn};

/// Typed shape of the authority configuration document.
///
/// Unknown fields are rejected: this document is authoritative, not a
/// producer-supplied artifact like a plan.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
struct AuthorityConfigDocument {
    authority_level: String,
    #[serde(default)]
    allowed_tools: Vec<String>,
    #[serde(default)]
    allowed_bins: Vec<String>,
    #[serde(default = "default_fs_root")]
    fs_root: String,
    #[serde(default = "default_network")]
    network: String,
    #[serde(default)]
    expiration_seconds: i64,
}

fn default_fs_root() -> String {
    ".".to_owned()
}

fn default_network() -> String {
    "deny".to_owned()
}

/// Failure to load or decode the authority configuration document.
#[derive(Debug, Error)]
pub enum AuthorityConfigError {
    /// The document could not be parsed as TOML.
    #[error("authority config is malformed TOML: {0}")]
    MalformedToml(#[source] toml::de::Error),
    /// The document could not be parsed as JSON.
    #[error("authority config is malformed JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),
    /// `authority_level` or `network` named an unrecognised tag.
    #[error(transparent)]
    InvalidTag(#[from] AuthorityTagError),
    /// A tool id or binary path entry was empty.
    #[error(transparent)]
    InvalidField(#[from] SchemaError),
    /// `fs_root` could not be resolved to a canonical path.
    #[error("fs_root `{path}` could not be canonicalised: {source}")]
    FsRootUnresolvable {
        /// The configured path that failed to resolve.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Load the authority configuration for `project_root`.
///
/// `config_path` is tried as TOML first; if it does not parse as TOML it
/// is retried as JSON, so both operator-edited and programmatically
/// produced config files are accepted. If `config_path` does not exist,
/// the default `observe`-level token bound to the canonicalised
/// `project_root` is returned, per the external-collaborator contract:
/// absence of configuration must fail closed, never open.
///
/// # Errors
///
/// Returns [`AuthorityConfigError`] if the file exists but cannot be
/// decoded, names an unrecognised level/network tag, contains an empty
/// tool id or binary path, or if `fs_root` cannot be canonicalised.
pub fn load_authority_config(config_path: &Path, project_root: &Path) -> Result<AuthorityToken, AuthorityConfigError> {
    let Ok(raw) = fs::read_to_string(config_path) else {
        warn!(path = %config_path.display(), "authority config absent, falling back to observe-level default");
        return default_token(project_root);
    };

    let document = decode_document(&raw)?;
    build_token(document, project_root)
}

fn decode_document(raw: &str) -> Result<AuthorityConfigDocument, AuthorityConfigError> {
    match toml::from_str::<AuthorityConfigDocument>(raw) {
        Ok(document) => Ok(document),
        Err(toml_error) => serde_json::from_str::<AuthorityConfigDocument>(raw).map_err(|json_error| {
            warn!(%toml_error, %json_error, "authority config did not parse as TOML or JSON");
            AuthorityConfigError::MalformedToml(toml_error)
        }),
    }
}

fn build_token(document: AuthorityConfigDocument, project_root: &Path) -> Result<AuthorityToken, AuthorityConfigError> {
    let level = AuthorityLevel::try_from(document.authority_level.as_str())?;
    let network = NetworkPolicy::try_from(document.network.as_str())?;

    let allowed_tools = document
        .allowed_tools
        .iter()
        .map(|raw| ToolId::try_from(raw.as_str()))
        .collect::<Result<Vec<_>, _>>()?;
    let allowed_bins = document
        .allowed_bins
        .iter()
        .map(|raw| BinaryPath::try_from(raw.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    let fs_root = resolve_fs_root(&document.fs_root, project_root)?;

    info!(?level, tool_count = allowed_tools.len(), "authority config loaded");
    Ok(AuthorityToken {
        project_id: project_id_hash(project_root),
        level,
        expiration: resolve_expiration(document.expiration_seconds),
        allowed_tools,
        allowed_bins,
        fs_root,
        network,
    })
}

fn resolve_fs_root(raw: &str, project_root: &Path) -> Result<PathBuf, AuthorityConfigError> {
    let candidate = if raw == "." { project_root.to_path_buf() } else { PathBuf::from(raw) };
    fs::canonicalize(&candidate).map_err(|source| AuthorityConfigError::FsRootUnresolvable {
        path: candidate.display().to_string(),
        source,
    })
}

fn resolve_expiration(expiration_seconds: i64) -> i64 {
    if expiration_seconds == 0 {
        return 0;
    }
    now_unix_seconds().saturating_add(expiration_seconds)
}

fn default_token(project_root: &Path) -> Result<AuthorityToken, AuthorityConfigError> {
    let fs_root = fs::canonicalize(project_root).map_err(|source| AuthorityConfigError::FsRootUnresolvable {
        path: project_root.display().to_string(),
        source,
    })?;
    Ok(AuthorityToken {
        project_id: project_id_hash(project_root),
        level: AuthorityLevel::Observe,
        expiration: 0,
        allowed_tools: Vec::new(),
        allowed_bins: Vec::new(),
        fs_root,
        network: NetworkPolicy::Deny,
    })
}

fn project_id_hash(project_root: &Path) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(project_root.to_string_lossy().as_bytes());
    hasher.finalize().into()
}

fn now_unix_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| i64::try_from(duration.as_secs()).unwrap_or(i64::MAX))
}
