//! Core data types for the tool-schema ontology.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::SchemaError;

#[expect(
    clippy::expl_impl_clone_on_copy,
    reason = "newt-hype macro expansion emits explicit Clone for Copy wrappers"
)]
mod schema_newtypes {
    use newt_hype::{base_newtype, newtype};

    base_newtype!(ToolIdentifierNewtype);
    newtype!(ToolId, ToolIdentifierNewtype, String);
    base_newtype!(BinaryPathNewtype);
    newtype!(BinaryPath, BinaryPathNewtype, String);
    base_newtype!(FlagNameNewtype);
    newtype!(FlagName, FlagNameNewtype, String);
}

/// Dotted identifier naming a schema: `"tool"` or `"tool.sub"`.
pub type ToolId = schema_newtypes::ToolId;

impl TryFrom<&str> for ToolId {
    type Error = SchemaError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(SchemaError::EmptyField { field: "id" });
        }
        Ok(Self::new(value.to_owned()))
    }
}

impl ToolId {
    /// Return the subcommand token, the text after the last `.`.
    ///
    /// `"git.commit"` yields `Some("commit")`; `"git"` yields `None`.
    #[must_use]
    pub fn subcommand_token(&self) -> Option<&str> {
        self.as_str().rsplit_once('.').map(|(_, tail)| tail)
    }
}

// newt-hype's `newtype!` macro does not itself derive `Serialize`/
// `Deserialize`, so schema documents decode this field through a plain
// string and the same validation `TryFrom` runs.
impl Serialize for ToolId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ToolId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::try_from(raw.as_str()).map_err(D::Error::custom)
    }
}

/// Absolute or lookup-resolved path to an executable binary.
pub type BinaryPath = schema_newtypes::BinaryPath;

impl TryFrom<&str> for BinaryPath {
    type Error = SchemaError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(SchemaError::EmptyField { field: "binary" });
        }
        Ok(Self::new(value.to_owned()))
    }
}

impl Serialize for BinaryPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BinaryPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::try_from(raw.as_str()).map_err(D::Error::custom)
    }
}

/// Long-form flag name, without the leading `--`.
pub type FlagName = schema_newtypes::FlagName;

impl TryFrom<&str> for FlagName {
    type Error = SchemaError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(SchemaError::EmptyField { field: "flag name" });
        }
        Ok(Self::new(value.to_owned()))
    }
}

impl Serialize for FlagName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FlagName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::try_from(raw.as_str()).map_err(D::Error::custom)
    }
}

/// Schema contract version. Strictly increasing per [`ToolId`] in the
/// [`SchemaStore`](crate::store::SchemaStore).
#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct SchemaVersion(u32);

impl SchemaVersion {
    /// Build a schema version from a primitive value.
    #[must_use]
    pub const fn new(version: u32) -> Self {
        Self(version)
    }

    /// Return the wrapped primitive version.
    #[must_use]
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Declared type of a flag or positional value.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgType {
    /// Boolean toggle; absent value means `true`.
    Bool,
    /// Opaque string value.
    String,
    /// Decimal integer, parsed as `i64`.
    Int,
    /// Decimal floating point, parsed as `f64`.
    Float,
    /// Filesystem path; accepted as any string, no existence check.
    Path,
    /// One of a fixed, ordered set of string values.
    Enum,
}

/// Metadata-only ordering of how disruptive invoking a tool may be.
///
/// Carries no behaviour in the core; it is surfaced to callers (plan
/// producers, audit consumers) for risk-aware presentation.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Read-only, no side effects outside the process itself.
    Safe,
    /// Writes confined to the invoking project's local filesystem.
    LocalWrite,
    /// Writes visible to other users or systems (network, shared state).
    SharedWrite,
    /// Destructive or hard-to-reverse effects.
    Destructive,
}

/// Definition of one named flag accepted by a tool.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct FlagDef {
    /// Long-form flag name, without the leading `--`.
    pub name: FlagName,
    /// Optional single-byte short form (e.g. `b'm'` for `-m`).
    #[serde(default)]
    pub short: Option<u8>,
    /// Declared value type.
    pub arg_type: ArgType,
    /// Whether the flag must be present in a valid invocation.
    #[serde(default)]
    pub required: bool,
    /// Permitted values when `arg_type` is [`ArgType::Enum`]; must be
    /// non-empty in that case (enforced at schema-load time).
    #[serde(default)]
    pub enum_values: Vec<String>,
    /// Inclusive lower bound, applies only to `int`/`float`.
    #[serde(default)]
    pub range_min: Option<i64>,
    /// Inclusive upper bound, applies only to `int`/`float`.
    #[serde(default)]
    pub range_max: Option<i64>,
    /// Whether the flag may be supplied more than once.
    #[serde(default)]
    pub multiple: bool,
    /// Human-readable description surfaced in validation failures.
    #[serde(default)]
    pub description: String,
}

/// Definition of one positional argument slot.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PositionalDef {
    /// Positional slot name, used as validation-failure context.
    pub name: String,
    /// Declared value type.
    pub arg_type: ArgType,
    /// Whether this slot must be filled.
    #[serde(default)]
    pub required: bool,
    /// Permitted values when `arg_type` is [`ArgType::Enum`].
    #[serde(default)]
    pub enum_values: Vec<String>,
}

/// Typed contract for one CLI tool or subcommand.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ToolSchema {
    /// Dotted schema identifier: `"tool"` or `"tool.sub"`.
    pub id: ToolId,
    /// Display name, independent of `id`.
    pub name: String,
    /// Resolved path to the executable this schema describes.
    pub binary: BinaryPath,
    /// Schema contract version; replacement must strictly increase it.
    pub version: SchemaVersion,
    /// Metadata-only risk classification.
    pub risk: RiskLevel,
    /// Capabilities this tool requests from the authority model.
    #[serde(default)]
    pub capabilities: Vec<String>,
    /// Accepted flags, in declaration order.
    #[serde(default)]
    pub flags: Vec<FlagDef>,
    /// Accepted positionals, in declaration order.
    #[serde(default)]
    pub positionals: Vec<PositionalDef>,
    /// Groups of flag names of which at most one may be supplied together.
    #[serde(default)]
    pub exclusive_groups: Vec<Vec<String>>,
}

impl ToolSchema {
    /// Find a flag definition by long name.
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<&FlagDef> {
        self.flags.iter().find(|flag| flag.name.as_str() == name)
    }

    /// Count of required positional slots.
    #[must_use]
    pub fn required_positional_count(&self) -> usize {
        self.positionals.iter().filter(|p| p.required).count()
    }

    /// Validate the schema's own internal consistency.
    ///
    /// Checked independently of any particular invocation: exclusive
    /// groups must reference declared flags, and enum-typed flags must
    /// carry at least one permitted value.
    pub fn validate_internal_consistency(&self) -> Result<(), SchemaError> {
        for flag in &self.flags {
            if matches!(flag.arg_type, ArgType::Enum) && flag.enum_values.is_empty() {
                return Err(SchemaError::InternallyInconsistent {
                    reason: format!("flag `{}` has arg_type enum with no enum_values", flag.name),
                });
            }
        }
        for positional in &self.positionals {
            if matches!(positional.arg_type, ArgType::Enum) && positional.enum_values.is_empty() {
                return Err(SchemaError::InternallyInconsistent {
                    reason: format!(
                        "positional `{}` has arg_type enum with no enum_values",
                        positional.name
                    ),
                });
            }
        }
        for group in &self.exclusive_groups {
            for flag_name in group {
                if self.flag(flag_name).is_none() {
                    return Err(SchemaError::InternallyInconsistent {
                        reason: format!(
                            "exclusive group references undeclared flag `{flag_name}`"
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}
