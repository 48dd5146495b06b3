//! The trusted, version-checked store of activated tool schemas.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::errors::SchemaError;
use crate::types::{ToolId, ToolSchema};

/// Mapping from tool id to its currently activated [`ToolSchema`].
///
/// Schemas only ever move forward: [`load`](Self::load) rejects a
/// same-or-lower version for a `tool_id` that already has a stored
/// schema (INV-5/INV-8). Nothing in this crate mutates a stored schema in
/// place; replacement always goes through `load`'s version check.
#[derive(Clone, Debug, Default)]
pub struct SchemaStore {
    schemas: BTreeMap<ToolId, ToolSchema>,
}

impl SchemaStore {
    /// Build an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schemas: BTreeMap::new(),
        }
    }

    /// Parse and install a schema document from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Malformed`] if the bytes do not decode,
    /// [`SchemaError::InternallyInconsistent`] if the decoded schema
    /// violates its own invariants, or
    /// [`SchemaError::VersionDowngrade`] if a schema is already stored for
    /// this id at an equal or higher version.
    pub fn load(&mut self, raw_bytes: &[u8]) -> Result<(), SchemaError> {
        let schema: ToolSchema = serde_json::from_slice(raw_bytes).map_err(SchemaError::Malformed)?;
        schema.validate_internal_consistency()?;

        if let Some(existing) = self.schemas.get(&schema.id) {
            if schema.version <= existing.version {
                warn!(
                    tool_id = schema.id.as_str(),
                    stored = %existing.version,
                    incoming = %schema.version,
                    "rejected schema version downgrade"
                );
                return Err(SchemaError::VersionDowngrade {
                    tool_id: schema.id.as_str().to_owned(),
                    stored: existing.version,
                    incoming: schema.version,
                });
            }
        }

        debug!(tool_id = schema.id.as_str(), version = %schema.version, "loaded schema");
        self.schemas.insert(schema.id.clone(), schema);
        Ok(())
    }

    /// Load every `*.json` file in `dir`, in sorted file-name order, so
    /// store construction is deterministic regardless of directory
    /// iteration order on the host platform.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Malformed`] wrapping an I/O failure message
    /// if `dir` cannot be read, or any error [`load`](Self::load) returns
    /// for an individual file.
    pub fn load_dir(&mut self, dir: &Path) -> Result<(), SchemaError> {
        let mut entries: Vec<_> = fs::read_dir(dir)
            .map_err(|io_error| {
                SchemaError::Malformed(serde_json::Error::io(io_error))
            })?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        entries.sort();

        for path in entries {
            let bytes = fs::read(&path).map_err(|io_error| SchemaError::Malformed(serde_json::Error::io(io_error)))?;
            self.load(&bytes)?;
        }

        info!(count = self.count(), "schema store initialised");
        Ok(())
    }

    /// Look up the currently activated schema for a tool id.
    #[must_use]
    pub fn get(&self, tool_id: &ToolId) -> Option<&ToolSchema> {
        self.schemas.get(tool_id)
    }

    /// Number of distinct tool ids currently activated.
    #[must_use]
    pub fn count(&self) -> usize {
        self.schemas.len()
    }
}
