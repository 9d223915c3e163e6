//! Familiar Fields
//!
//! Typed field descriptors that attach to interface-like schemas and validate
//! runtime values against them, with structured errors.
//!
//! ## Features
//!
//! - **Leaf fields**: text, bytes, bool, numbers, the date/time family, URIs,
//!   dotted names and ids, with bounds, lengths and text parsing
//! - **Choice fields**: inline, registered or context-bound vocabularies
//! - **Collections and mappings**: fail-slow member validation and uniqueness
//! - **Object fields**: recursive schema validation with invariants, safe on
//!   cyclic object graphs
//!
//! ## Example
//!
//! ```
//! use familiar_fields::{Field, Instance, Interface};
//!
//! let point = Interface::builder("IPoint")
//!     .field("x", Field::int().build().unwrap())
//!     .field("y", Field::int().build().unwrap())
//!     .build();
//!
//! let field = Field::object(point.clone()).build().unwrap();
//! let value = Instance::new(vec![point]).with("x", 1).with("y", "two").into_value();
//!
//! let err = field.validate(&value).unwrap_err();
//! let err = err.as_validation().unwrap();
//! assert_eq!(err.code(), "SchemaNotCorrectlyImplemented");
//! assert_eq!(err.schema_errors().unwrap()["y"].code(), "WrongType");
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod field;
pub mod instance;
pub mod schema;
pub mod value;
pub mod vocabulary;

pub use config::FieldsConfig;
pub use error::{ErrorReport, Result, SchemaError, ValidationError, ValidationErrorKind};
pub use event::{BeforeObjectAssigned, EventChannel};
pub use field::{validate_fields, Field, FieldBuilder, FieldKind, Source, ValidationContext};
pub use instance::Instance;
pub use schema::{Declaration, Interface, Invalid, ObjectValue, Schema};
pub use value::{Value, ValueType};
pub use vocabulary::{SimpleTerm, SimpleVocabulary, Vocabulary, VocabularyError, VocabularyRegistry};
