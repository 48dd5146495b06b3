//! Pure validation of a `(ToolSchema, ParsedArgs)` pair.
//!
//! Every violation is collected and returned together (I6) so a producer —
//! especially an AI producer composing a plan — can correct every problem
//! in a single pass instead of iterating denial-by-denial.

use capgate_schema::{ArgType, ToolSchema};

use crate::types::ParsedArgs;

/// Discriminant for why one flag or positional failed validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationErrorKind {
    /// A parsed flag name is not declared on the schema.
    UnknownFlag,
    /// A flag's value does not parse as its declared type.
    TypeMismatch,
    /// An int value parsed but fell outside `range_min`/`range_max`.
    IntOutOfRange,
    /// An enum value did not byte-exact match a declared choice.
    EnumValueInvalid,
    /// A flag without `multiple = true` was supplied more than once.
    DuplicateFlagNotAllowed,
    /// A `required` flag was not supplied at all.
    MissingRequiredFlag,
    /// Fewer positionals were supplied than the schema requires.
    MissingRequiredPositional,
    /// More positionals were supplied than the schema has slots for.
    TooManyPositionals,
    /// More than one member of an exclusive group was supplied.
    MutualExclusionViolation,
}

/// One validation failure: a kind plus the flag/positional name it
/// concerns.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValidationError {
    /// Which rule was violated.
    pub kind: ValidationErrorKind,
    /// Name of the offending flag or positional.
    pub context: String,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, context: impl Into<String>) -> Self {
        Self {
            kind,
            context: context.into(),
        }
    }
}

/// Validate `parsed` against `schema`, returning every failure found.
///
/// An empty return value means `parsed` is valid for `schema`. Performs no
/// I/O and allocates only the returned failure list.
#[must_use]
pub fn validate(schema: &ToolSchema, parsed: &ParsedArgs) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for flag in &parsed.flags {
        if schema.flag(&flag.name).is_none() {
            errors.push(ValidationError::new(ValidationErrorKind::UnknownFlag, flag.name.clone()));
        }
    }

    for flag in &parsed.flags {
        let Some(def) = schema.flag(&flag.name) else {
            continue;
        };
        check_type_conformance(&mut errors, def.arg_type, &def.range_min, &def.range_max, &def.enum_values, &flag.name, &flag.value);
    }

    for def in &schema.flags {
        let count = parsed.flag_occurrences(def.name.as_str());
        if count > 1 && !def.multiple {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateFlagNotAllowed,
                def.name.as_str(),
            ));
        }
    }

    for def in &schema.flags {
        if def.required && parsed.flag_occurrences(def.name.as_str()) == 0 {
            errors.push(ValidationError::new(ValidationErrorKind::MissingRequiredFlag, def.name.as_str()));
        }
    }

    let required_positionals = schema.required_positional_count();
    if parsed.positionals.len() < required_positionals {
        let missing_name = schema
            .positionals
            .get(parsed.positionals.len())
            .map_or_else(String::new, |p| p.name.clone());
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingRequiredPositional,
            missing_name,
        ));
    }
    if parsed.positionals.len() > schema.positionals.len() {
        errors.push(ValidationError::new(ValidationErrorKind::TooManyPositionals, ""));
    }

    for group in &schema.exclusive_groups {
        let supplied = group
            .iter()
            .filter(|name| parsed.flag_occurrences(name) > 0)
            .count();
        if supplied > 1 {
            let context = group.first().cloned().unwrap_or_default();
            errors.push(ValidationError::new(ValidationErrorKind::MutualExclusionViolation, context));
        }
    }

    errors
}

#[expect(clippy::too_many_arguments, reason = "each parameter is an independent flag-definition field the type check depends on")]
fn check_type_conformance(
    errors: &mut Vec<ValidationError>,
    arg_type: ArgType,
    range_min: &Option<i64>,
    range_max: &Option<i64>,
    enum_values: &[String],
    flag_name: &str,
    value: &Option<String>,
) {
    match arg_type {
        ArgType::Int => match value {
            Some(raw) => match raw.parse::<i64>() {
                Ok(parsed) => {
                    let below_min = range_min.is_some_and(|min| parsed < min);
                    let above_max = range_max.is_some_and(|max| parsed > max);
                    if below_min || above_max {
                        errors.push(ValidationError::new(ValidationErrorKind::IntOutOfRange, flag_name));
                    }
                }
                Err(_) => errors.push(ValidationError::new(ValidationErrorKind::TypeMismatch, flag_name)),
            },
            None => errors.push(ValidationError::new(ValidationErrorKind::TypeMismatch, flag_name)),
        },
        ArgType::Float => match value {
            Some(raw) if raw.parse::<f64>().is_ok() => {}
            _ => errors.push(ValidationError::new(ValidationErrorKind::TypeMismatch, flag_name)),
        },
        ArgType::Enum => match value {
            Some(raw) if enum_values.iter().any(|candidate| candidate == raw) => {}
            Some(_) => errors.push(ValidationError::new(ValidationErrorKind::EnumValueInvalid, flag_name)),
            None => errors.push(ValidationError::new(ValidationErrorKind::TypeMismatch, flag_name)),
        },
        ArgType::Bool => match value.as_deref() {
            None | Some("true" | "false") => {}
            Some(_) => errors.push(ValidationError::new(ValidationErrorKind::TypeMismatch, flag_name)),
        },
        ArgType::String | ArgType::Path => {
            if value.is_none() {
                errors.push(ValidationError::new(ValidationErrorKind::TypeMismatch, flag_name));
            }
        }
    }
}
