//! Error types for field validation
//!
//! Two layers:
//!
//! - [`ValidationError`]: a value failed a field. Always carries the field and
//!   the offending value; aggregate kinds carry their child errors.
//! - [`SchemaError`]: everything else (bad field configuration, vocabulary
//!   lookups, read-only assignment) plus a transparent `Validation` variant so
//!   one `Result` type flows through the crate.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::field::Field;
use crate::schema::Invalid;
use crate::value::{Value, ValueType};
use crate::vocabulary::VocabularyError;

/// Result type for field operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Field and schema errors
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid field configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Vocabulary error: {0}")]
    Vocabulary(#[from] VocabularyError),

    #[error("Can't validate value without vocabulary: {0}")]
    VocabularyUnavailable(String),

    #[error("Can't set values on read-only field '{0}'")]
    ReadOnly(String),

    #[error("Attribute '{name}' not found on {target}")]
    AttributeMissing { name: String, target: String },

    #[error("Cannot access attribute '{name}' on a {type_name} value")]
    NotAnObject { name: String, type_name: &'static str },

    #[error("{0} fields do not parse text values")]
    NotParseable(&'static str),
}

impl SchemaError {
    /// The validation failure, if this is one
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            SchemaError::Validation(e) => Some(e),
            _ => None,
        }
    }

    pub fn into_validation(self) -> std::result::Result<ValidationError, SchemaError> {
        match self {
            SchemaError::Validation(e) => Ok(e),
            other => Err(other),
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        SchemaError::InvalidConfiguration(message.into())
    }
}

/// Literal shapes parsed or checked by leaf fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LiteralKind {
    Int,
    Float,
    Decimal,
    Uri,
    DottedName,
    Id,
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LiteralKind::Int => "int",
            LiteralKind::Float => "float",
            LiteralKind::Decimal => "decimal",
            LiteralKind::Uri => "URI",
            LiteralKind::DottedName => "dotted name",
            LiteralKind::Id => "id",
        };
        f.write_str(name)
    }
}

/// Where a contained error occurred inside a collection or mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Member index of a sequence or set
    Index(usize),
    /// Key of the mapping entry at this index
    Key(usize),
    /// Value of the mapping entry at this index
    Value(usize),
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Index(i) => write!(f, "{}", i),
            Position::Key(i) => write!(f, "key[{}]", i),
            Position::Value(i) => write!(f, "value[{}]", i),
        }
    }
}

/// A member failure inside a `WrongContainedType` aggregate
#[derive(Debug, Clone)]
pub struct ContainedError {
    pub position: Position,
    pub error: ValidationError,
}

/// What went wrong
#[derive(Debug, Clone)]
pub enum ValidationErrorKind {
    RequiredMissing,
    WrongType { expected: Vec<ValueType> },
    ConstraintNotSatisfied,
    TooSmall { min: Value },
    TooBig { max: Value },
    TooShort { min_length: usize },
    TooLong { max_length: usize },
    InvalidValue,
    InvalidLiteral { literal: LiteralKind, message: String },
    NotUnique { duplicate: Value },
    SchemaNotProvided { schema: String },
    SchemaNotCorrectlyImplemented {
        schema_errors: IndexMap<String, ValidationError>,
        invariant_errors: Vec<Invalid>,
    },
    SchemaNotFullyImplemented { attribute: String },
    WrongContainedType { errors: Vec<ContainedError> },
}

impl ValidationErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationErrorKind::RequiredMissing => "RequiredMissing",
            ValidationErrorKind::WrongType { .. } => "WrongType",
            ValidationErrorKind::ConstraintNotSatisfied => "ConstraintNotSatisfied",
            ValidationErrorKind::TooSmall { .. } => "TooSmall",
            ValidationErrorKind::TooBig { .. } => "TooBig",
            ValidationErrorKind::TooShort { .. } => "TooShort",
            ValidationErrorKind::TooLong { .. } => "TooLong",
            ValidationErrorKind::InvalidValue => "InvalidValue",
            ValidationErrorKind::InvalidLiteral { literal, .. } => match literal {
                LiteralKind::Int => "InvalidIntLiteral",
                LiteralKind::Float => "InvalidFloatLiteral",
                LiteralKind::Decimal => "InvalidDecimalLiteral",
                LiteralKind::Uri => "InvalidURI",
                LiteralKind::DottedName => "InvalidDottedName",
                LiteralKind::Id => "InvalidId",
            },
            ValidationErrorKind::NotUnique { .. } => "NotUnique",
            ValidationErrorKind::SchemaNotProvided { .. } => "SchemaNotProvided",
            ValidationErrorKind::SchemaNotCorrectlyImplemented { .. } => "SchemaNotCorrectlyImplemented",
            ValidationErrorKind::SchemaNotFullyImplemented { .. } => "SchemaNotFullyImplemented",
            ValidationErrorKind::WrongContainedType { .. } => "WrongContainedType",
        }
    }
}

/// A value failed validation against a field
#[derive(Debug, Clone)]
pub struct ValidationError {
    kind: ValidationErrorKind,
    field: Option<Arc<Field>>,
    value: Option<Value>,
}

impl ValidationError {
    /// Create an error already carrying the field and offending value
    pub fn new(kind: ValidationErrorKind, field: &Field, value: &Value) -> Self {
        Self {
            kind,
            field: Some(Arc::new(field.clone())),
            value: Some(value.clone()),
        }
    }

    /// Create an error for a field when there is no value to carry
    pub fn for_field(kind: ValidationErrorKind, field: &Field) -> Self {
        Self {
            kind,
            field: Some(Arc::new(field.clone())),
            value: None,
        }
    }

    /// Create an error with no field or value attached
    pub fn bare(kind: ValidationErrorKind) -> Self {
        Self {
            kind,
            field: None,
            value: None,
        }
    }

    pub fn kind(&self) -> &ValidationErrorKind {
        &self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn field(&self) -> Option<&Field> {
        self.field.as_deref()
    }

    /// Name of the offending field, empty for anonymous fields
    pub fn field_name(&self) -> &str {
        self.field.as_deref().map(|f| f.name()).unwrap_or("")
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Per-attribute errors of a `SchemaNotCorrectlyImplemented` error
    pub fn schema_errors(&self) -> Option<&IndexMap<String, ValidationError>> {
        match &self.kind {
            ValidationErrorKind::SchemaNotCorrectlyImplemented { schema_errors, .. } => Some(schema_errors),
            _ => None,
        }
    }

    /// Invariant errors of a `SchemaNotCorrectlyImplemented` error
    pub fn invariant_errors(&self) -> Option<&[Invalid]> {
        match &self.kind {
            ValidationErrorKind::SchemaNotCorrectlyImplemented { invariant_errors, .. } => {
                Some(invariant_errors)
            }
            _ => None,
        }
    }

    /// Member errors of a `WrongContainedType` error
    pub fn contained_errors(&self) -> Option<&[ContainedError]> {
        match &self.kind {
            ValidationErrorKind::WrongContainedType { errors } => Some(errors),
            _ => None,
        }
    }

    /// What the length of the offending value counts
    fn length_unit(&self) -> &'static str {
        match &self.value {
            Some(Value::Text(_)) => "characters",
            Some(Value::Bytes(_)) => "bytes",
            Some(Value::Dict(_)) => "entries",
            _ => "items",
        }
    }

    /// Human-readable description of this error (children summarized)
    pub fn message(&self) -> String {
        let value = self.value.as_ref().map(|v| v.to_string()).unwrap_or_default();
        let detail = match &self.kind {
            ValidationErrorKind::RequiredMissing => "Required input is missing".to_string(),
            ValidationErrorKind::WrongType { expected } => {
                let expected: Vec<_> = expected.iter().map(|t| t.name()).collect();
                let actual = self.value.as_ref().map(|v| v.type_name()).unwrap_or("missing");
                format!("Object is of wrong type: expected {}, got {} {}", expected.join(" or "), actual, value)
            }
            ValidationErrorKind::ConstraintNotSatisfied => format!("Constraint not satisfied: {}", value),
            ValidationErrorKind::TooSmall { min } => format!("Value is too small: {} < {}", value, min),
            ValidationErrorKind::TooBig { max } => format!("Value is too big: {} > {}", value, max),
            ValidationErrorKind::TooShort { min_length } => {
                format!("Value is too short: fewer than {} {}", min_length, self.length_unit())
            }
            ValidationErrorKind::TooLong { max_length } => {
                format!("Value is too long: more than {} {}", max_length, self.length_unit())
            }
            ValidationErrorKind::InvalidValue => format!("Invalid value: {}", value),
            ValidationErrorKind::InvalidLiteral { literal, message } => {
                format!("Invalid {}: {}", literal, message)
            }
            ValidationErrorKind::NotUnique { duplicate } => format!("One or more entries of sequence are not unique: {}", duplicate),
            ValidationErrorKind::SchemaNotProvided { schema } => {
                format!("Schema not provided: {} does not provide {}", value, schema)
            }
            ValidationErrorKind::SchemaNotCorrectlyImplemented {
                schema_errors,
                invariant_errors,
            } => format!(
                "Schema not correctly implemented: {} attribute error(s), {} invariant error(s)",
                schema_errors.len(),
                invariant_errors.len()
            ),
            ValidationErrorKind::SchemaNotFullyImplemented { attribute } => {
                format!("Schema not fully implemented: attribute '{}' is missing", attribute)
            }
            ValidationErrorKind::WrongContainedType { errors } => {
                format!("Wrong contained type: {} member error(s)", errors.len())
            }
        };
        match self.field_name() {
            "" => detail,
            name => format!("{}: {}", name, detail),
        }
    }

    /// Render this error and all its children as a serializable tree
    pub fn report(&self) -> ErrorReport {
        let mut children = IndexMap::new();
        let mut invariants = Vec::new();
        match &self.kind {
            ValidationErrorKind::WrongContainedType { errors } => {
                for contained in errors {
                    children.insert(contained.position.to_string(), contained.error.report());
                }
            }
            ValidationErrorKind::SchemaNotCorrectlyImplemented {
                schema_errors,
                invariant_errors,
            } => {
                for (name, error) in schema_errors {
                    children.insert(name.clone(), error.report());
                }
                invariants = invariant_errors.iter().map(|e| e.to_string()).collect();
            }
            _ => {}
        }
        ErrorReport {
            code: self.code(),
            message: self.message(),
            field: self.field.as_deref().map(|f| f.name().to_string()).filter(|n| !n.is_empty()),
            value: self.value.as_ref().map(|v| v.to_string()),
            children,
            invariants,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ValidationError {}

/// Serializable rendering of a [`ValidationError`] tree
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub children: IndexMap<String, ErrorReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invariants: Vec<String>,
}
