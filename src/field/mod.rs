//! Field descriptors
//!
//! A [`Field`] describes one value slot: whether it is required, its default,
//! a constraint, and a [`FieldKind`] that decides which runtime values it
//! accepts. Fields are created through a [`FieldBuilder`], which checks the
//! settings (bounds, lengths, Choice sources, the default) before handing out
//! an immutable field:
//!
//! ```
//! use familiar_fields::{Field, Value};
//!
//! let age = Field::int().name("age").min(0).max(150).build().unwrap();
//! assert!(age.validate(&Value::Int(42)).is_ok());
//! assert!(age.validate(&Value::Int(-1)).is_err());
//! ```
//!
//! Validation runs in a fixed order: missing value, type, constraint,
//! length and bounds, then the checks particular to the kind (literal
//! shapes, vocabulary membership, members, schemas).

pub mod bounds;
pub mod choice;
pub mod collection;
pub mod object;
pub mod scalar;
pub mod text;

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, SchemaError, ValidationError, ValidationErrorKind};
use crate::event::{self, BeforeObjectAssigned, EventChannel};
use crate::schema::Schema;
use crate::value::{Value, ValueType};
use crate::vocabulary::VocabularyRegistry;

pub use bounds::{Bounds, LengthBounds};
pub use choice::{ChoiceField, Source};
pub use collection::{CollectionField, CollectionKind, MappingField, MappingKind};
pub use object::{validate_fields, validate_fields_in, ObjectField, ValidationContext};
pub use scalar::{ScalarField, ScalarKind};
pub use text::{BytesField, TextField, TextFlavor};

type ConstraintFn = dyn Fn(&Value) -> bool + Send + Sync;

/// A predicate every non-missing value must satisfy
#[derive(Clone)]
pub struct Constraint(Arc<ConstraintFn>);

impl Constraint {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(check))
    }

    pub fn check(&self, value: &Value) -> bool {
        (self.0)(value)
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Constraint(..)")
    }
}

/// What a field accepts beyond the common settings
#[derive(Debug, Clone)]
pub enum FieldKind {
    Text(TextField),
    Bytes(BytesField),
    Bool,
    Scalar(ScalarField),
    /// The value must itself be a schema
    Interface,
    Choice(ChoiceField),
    Collection(CollectionField),
    Mapping(MappingField),
    Object(ObjectField),
}

impl FieldKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldKind::Text(text) => text.flavor.kind_name(),
            FieldKind::Bytes(bytes) if bytes.line => "BytesLine",
            FieldKind::Bytes(_) => "Bytes",
            FieldKind::Bool => "Bool",
            FieldKind::Scalar(scalar) => scalar.kind.kind_name(),
            FieldKind::Interface => "InterfaceField",
            FieldKind::Choice(_) => "Choice",
            FieldKind::Collection(collection) => collection.kind.kind_name(),
            FieldKind::Mapping(mapping) => mapping.kind.kind_name(),
            FieldKind::Object(_) => "Object",
        }
    }

    /// Runtime types accepted; empty when any type is (Choice, Object)
    pub fn expected_types(&self) -> Vec<ValueType> {
        match self {
            FieldKind::Text(_) => vec![ValueType::Text],
            FieldKind::Bytes(_) => vec![ValueType::Bytes],
            FieldKind::Bool => vec![ValueType::Bool],
            FieldKind::Scalar(scalar) => vec![scalar.kind.value_type()],
            FieldKind::Interface => vec![ValueType::Schema],
            FieldKind::Collection(collection) => vec![collection.kind.value_type()],
            FieldKind::Mapping(mapping) => vec![mapping.kind.value_type()],
            FieldKind::Choice(_) | FieldKind::Object(_) => Vec::new(),
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            FieldKind::Scalar(scalar) => scalar.accepts(value),
            FieldKind::Choice(_) | FieldKind::Object(_) => true,
            other => other.expected_types().into_iter().any(|t| value.is_instance(t)),
        }
    }

    fn builtin_constraint(&self, value: &Value) -> bool {
        match self {
            FieldKind::Text(text) => text.builtin_constraint(value),
            FieldKind::Bytes(bytes) => bytes.builtin_constraint(value),
            _ => true,
        }
    }
}

/// A typed, constrained descriptor for one value slot
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    interface: Option<String>,
    title: String,
    description: String,
    required: bool,
    readonly: bool,
    default: Option<Value>,
    missing_value: Value,
    constraint: Option<Constraint>,
    context: Option<Value>,
    kind: FieldKind,
}

impl Field {
    pub fn text() -> FieldBuilder {
        FieldBuilder::new(Pending::Text(TextFlavor::Text))
    }

    pub fn source_text() -> FieldBuilder {
        FieldBuilder::new(Pending::Text(TextFlavor::SourceText))
    }

    pub fn password() -> FieldBuilder {
        FieldBuilder::new(Pending::Text(TextFlavor::Password))
    }

    pub fn text_line() -> FieldBuilder {
        FieldBuilder::new(Pending::Text(TextFlavor::TextLine))
    }

    pub fn ascii() -> FieldBuilder {
        FieldBuilder::new(Pending::Text(TextFlavor::Ascii))
    }

    pub fn ascii_line() -> FieldBuilder {
        FieldBuilder::new(Pending::Text(TextFlavor::AsciiLine))
    }

    pub fn uri() -> FieldBuilder {
        FieldBuilder::new(Pending::Text(TextFlavor::Uri))
    }

    pub fn dotted_name() -> FieldBuilder {
        FieldBuilder::new(Pending::Text(TextFlavor::DottedName {
            min_dots: 0,
            max_dots: None,
        }))
    }

    pub fn id() -> FieldBuilder {
        FieldBuilder::new(Pending::Text(TextFlavor::Id))
    }

    pub fn bytes() -> FieldBuilder {
        FieldBuilder::new(Pending::Bytes { line: false })
    }

    pub fn bytes_line() -> FieldBuilder {
        FieldBuilder::new(Pending::Bytes { line: true })
    }

    pub fn bool() -> FieldBuilder {
        FieldBuilder::new(Pending::Bool)
    }

    pub fn int() -> FieldBuilder {
        FieldBuilder::new(Pending::Scalar(ScalarKind::Int))
    }

    pub fn float() -> FieldBuilder {
        FieldBuilder::new(Pending::Scalar(ScalarKind::Float))
    }

    pub fn decimal() -> FieldBuilder {
        FieldBuilder::new(Pending::Scalar(ScalarKind::Decimal))
    }

    pub fn date() -> FieldBuilder {
        FieldBuilder::new(Pending::Scalar(ScalarKind::Date))
    }

    pub fn datetime() -> FieldBuilder {
        FieldBuilder::new(Pending::Scalar(ScalarKind::Datetime))
    }

    pub fn time() -> FieldBuilder {
        FieldBuilder::new(Pending::Scalar(ScalarKind::Time))
    }

    pub fn timedelta() -> FieldBuilder {
        FieldBuilder::new(Pending::Scalar(ScalarKind::Timedelta))
    }

    /// A field whose values are schemas
    pub fn interface_field() -> FieldBuilder {
        FieldBuilder::new(Pending::Interface)
    }

    /// A value from a vocabulary; give exactly one of `values`, `vocabulary`
    /// or `source` before building
    pub fn choice() -> FieldBuilder {
        FieldBuilder::new(Pending::Choice)
    }

    pub fn sequence() -> FieldBuilder {
        FieldBuilder::new(Pending::Collection(CollectionKind::Sequence))
    }

    pub fn mutable_sequence() -> FieldBuilder {
        FieldBuilder::new(Pending::Collection(CollectionKind::MutableSequence))
    }

    pub fn tuple() -> FieldBuilder {
        FieldBuilder::new(Pending::Collection(CollectionKind::Tuple))
    }

    pub fn list() -> FieldBuilder {
        FieldBuilder::new(Pending::Collection(CollectionKind::List))
    }

    /// A set field (`set` itself is attribute assignment)
    pub fn set_of() -> FieldBuilder {
        FieldBuilder::new(Pending::Collection(CollectionKind::Set))
    }

    pub fn frozenset() -> FieldBuilder {
        FieldBuilder::new(Pending::Collection(CollectionKind::FrozenSet))
    }

    pub fn mapping() -> FieldBuilder {
        FieldBuilder::new(Pending::Mapping(MappingKind::Mapping))
    }

    pub fn mutable_mapping() -> FieldBuilder {
        FieldBuilder::new(Pending::Mapping(MappingKind::MutableMapping))
    }

    pub fn dict() -> FieldBuilder {
        FieldBuilder::new(Pending::Mapping(MappingKind::Dict))
    }

    pub fn object(schema: Arc<dyn Schema>) -> FieldBuilder {
        FieldBuilder::new(Pending::Object(schema))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the interface declaring this field
    pub fn interface(&self) -> Option<&str> {
        self.interface.as_deref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn readonly(&self) -> bool {
        self.readonly
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn missing_value(&self) -> &Value {
        &self.missing_value
    }

    /// The object this field was bound to
    pub fn context(&self) -> Option<&Value> {
        self.context.as_ref()
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.kind_name()
    }

    pub(crate) fn declared_as(mut self, name: &str, interface: &str) -> Field {
        self.name = name.to_string();
        self.interface = Some(interface.to_string());
        self
    }

    pub(crate) fn error(&self, kind: ValidationErrorKind, value: &Value) -> ValidationError {
        ValidationError::new(kind, self, value)
    }

    /// Check `value` against this field
    pub fn validate(&self, value: &Value) -> Result<()> {
        self.validate_in(value, &mut ValidationContext::new())
    }

    /// Check `value` as part of an enclosing validation
    pub fn validate_in(&self, value: &Value, ctx: &mut ValidationContext) -> Result<()> {
        if *value == self.missing_value {
            if self.required {
                return Err(self.error(ValidationErrorKind::RequiredMissing, value).into());
            }
            return Ok(());
        }

        if !self.kind.accepts(value) {
            let expected = self.kind.expected_types();
            return Err(self.error(ValidationErrorKind::WrongType { expected }, value).into());
        }

        let satisfied = match &self.constraint {
            Some(constraint) => constraint.check(value),
            None => self.kind.builtin_constraint(value),
        };
        if !satisfied {
            return Err(self.error(ValidationErrorKind::ConstraintNotSatisfied, value).into());
        }

        match &self.kind {
            FieldKind::Text(text) => text.check(self, value)?,
            FieldKind::Bytes(bytes) => bytes.length.check(self, value)?,
            FieldKind::Scalar(scalar) => scalar.bounds.check(self, value)?,
            FieldKind::Bool | FieldKind::Interface => {}
            FieldKind::Choice(choice) => choice.check(self, value)?,
            FieldKind::Collection(collection) => collection.check(self, value, ctx)?,
            FieldKind::Mapping(mapping) => mapping.check(self, value, ctx)?,
            FieldKind::Object(object) => object.check(self, value, ctx)?,
        }
        Ok(())
    }

    /// A copy of this field specialized to `context`, the object owning the
    /// attribute. Choice vocabularies that depend on the owner are resolved
    /// here, for this field and any member fields.
    pub fn bind(&self, context: &Value) -> Result<Field> {
        debug!(field = %self.name, kind = self.kind_name(), "Binding field");
        let kind = match &self.kind {
            FieldKind::Choice(choice) => FieldKind::Choice(choice.bind(context)?),
            FieldKind::Collection(collection) => FieldKind::Collection(collection.bind(context)?),
            FieldKind::Mapping(mapping) => FieldKind::Mapping(mapping.bind(context)?),
            other => other.clone(),
        };
        Ok(Field {
            name: self.name.clone(),
            interface: self.interface.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            required: self.required,
            readonly: self.readonly,
            default: self.default.clone(),
            missing_value: self.missing_value.clone(),
            constraint: self.constraint.clone(),
            context: Some(context.clone()),
            kind,
        })
    }

    /// Read this field's attribute from `object`
    pub fn get(&self, object: &Value) -> Result<Value> {
        let target = object.as_object().ok_or_else(|| SchemaError::NotAnObject {
            name: self.name.clone(),
            type_name: object.type_name(),
        })?;
        target
            .attribute(&self.name)
            .ok_or_else(|| SchemaError::AttributeMissing {
                name: self.name.clone(),
                target: object.to_string(),
            })
    }

    /// Read this field's attribute from `object`, or `default` when absent
    pub fn query(&self, object: &Value, default: Value) -> Value {
        object.attribute(&self.name).unwrap_or(default)
    }

    /// Assign this field's attribute on `object`, announcing Object
    /// assignments on the process-wide event channel
    pub fn set(&self, object: &Value, value: Value) -> Result<()> {
        self.set_notifying(object, value, event::channel())
    }

    /// Assign this field's attribute on `object`. Object fields publish a
    /// [`BeforeObjectAssigned`] event on `channel` first and assign whatever
    /// value the subscribers leave in it.
    pub fn set_notifying(&self, object: &Value, value: Value, channel: &EventChannel) -> Result<()> {
        let value = match self.kind {
            FieldKind::Object(_) => {
                let mut event = BeforeObjectAssigned {
                    object: value,
                    name: self.name.clone(),
                    context: object.clone(),
                };
                channel.notify(&mut event);
                event.object
            }
            _ => value,
        };
        if self.readonly {
            return Err(SchemaError::ReadOnly(self.name.clone()));
        }
        object.set_attribute(&self.name, value)
    }

    /// Parse text into a value of this field and validate it
    pub fn from_unicode(&self, text: &str) -> Result<Value> {
        let value = match &self.kind {
            FieldKind::Text(field) => field.parse(self, text)?,
            FieldKind::Bytes(field) => field.parse(self, text)?,
            FieldKind::Bool => Value::Bool(!text.is_empty() && text.to_lowercase() != "false"),
            FieldKind::Scalar(field) => field.parse(self, text)?,
            FieldKind::Choice(_) => Value::from(text),
            other => return Err(SchemaError::NotParseable(other.kind_name())),
        };
        self.validate(&value)?;
        Ok(value)
    }
}

/// The kind a builder will produce, before its settings are checked
#[derive(Clone)]
enum Pending {
    Text(TextFlavor),
    Bytes { line: bool },
    Bool,
    Scalar(ScalarKind),
    Interface,
    Choice,
    Collection(CollectionKind),
    Mapping(MappingKind),
    Object(Arc<dyn Schema>),
}

impl Pending {
    fn kind_name(&self) -> &'static str {
        match self {
            Pending::Text(flavor) => flavor.kind_name(),
            Pending::Bytes { line: true } => "BytesLine",
            Pending::Bytes { line: false } => "Bytes",
            Pending::Bool => "Bool",
            Pending::Scalar(kind) => kind.kind_name(),
            Pending::Interface => "InterfaceField",
            Pending::Choice => "Choice",
            Pending::Collection(kind) => kind.kind_name(),
            Pending::Mapping(kind) => kind.kind_name(),
            Pending::Object(_) => "Object",
        }
    }
}

/// Collects field settings; `build` checks them and produces the [`Field`]
pub struct FieldBuilder {
    pending: Pending,
    name: String,
    title: String,
    description: String,
    required: bool,
    readonly: bool,
    default: Option<Value>,
    missing_value: Value,
    constraint: Option<Constraint>,
    min: Option<Value>,
    max: Option<Value>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    unique: Option<bool>,
    min_dots: Option<i64>,
    max_dots: Option<i64>,
    key_type: Option<Field>,
    value_type: Option<Field>,
    values: Option<Vec<Value>>,
    vocabulary: Option<Source>,
    source: Option<Source>,
    registry: Option<Arc<dyn VocabularyRegistry>>,
    validate_invariants: Option<bool>,
}

impl FieldBuilder {
    fn new(pending: Pending) -> Self {
        Self {
            pending,
            name: String::new(),
            title: String::new(),
            description: String::new(),
            required: true,
            readonly: false,
            default: None,
            missing_value: Value::Missing,
            constraint: None,
            min: None,
            max: None,
            min_length: None,
            max_length: None,
            unique: None,
            min_dots: None,
            max_dots: None,
            key_type: None,
            value_type: None,
            values: None,
            vocabulary: None,
            source: None,
            registry: None,
            validate_invariants: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    pub fn default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn missing_value(mut self, missing_value: impl Into<Value>) -> Self {
        self.missing_value = missing_value.into();
        self
    }

    /// Replace the kind's built-in constraint (the line rule of line fields)
    pub fn constraint<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.constraint = Some(Constraint::new(check));
        self
    }

    pub fn min(mut self, min: impl Into<Value>) -> Self {
        self.min = Some(min.into());
        self
    }

    pub fn max(mut self, max: impl Into<Value>) -> Self {
        self.max = Some(max.into());
        self
    }

    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = Some(unique);
        self
    }

    pub fn min_dots(mut self, min_dots: i64) -> Self {
        self.min_dots = Some(min_dots);
        self
    }

    pub fn max_dots(mut self, max_dots: i64) -> Self {
        self.max_dots = Some(max_dots);
        self
    }

    /// Field every member (or mapping value) must satisfy
    pub fn value_type(mut self, field: Field) -> Self {
        self.value_type = Some(field);
        self
    }

    pub fn key_type(mut self, field: Field) -> Self {
        self.key_type = Some(field);
        self
    }

    pub fn values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn vocabulary(mut self, vocabulary: impl Into<Source>) -> Self {
        self.vocabulary = Some(vocabulary.into());
        self
    }

    pub fn source(mut self, source: impl Into<Source>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Resolve named vocabularies here instead of the process-wide registry
    pub fn registry(mut self, registry: Arc<dyn VocabularyRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn validate_invariants(mut self, validate_invariants: bool) -> Self {
        self.validate_invariants = Some(validate_invariants);
        self
    }

    fn check_settings(&self) -> Result<()> {
        if let Pending::Collection(kind) = &self.pending {
            if kind.is_set() && self.unique.is_some() {
                return Err(SchemaError::config("unexpected keyword argument 'unique'"));
            }
        }

        let scalar = matches!(self.pending, Pending::Scalar(_));
        let sized = matches!(
            self.pending,
            Pending::Text(_) | Pending::Bytes { .. } | Pending::Collection(_) | Pending::Mapping(_)
        );
        let collection = matches!(self.pending, Pending::Collection(_));
        let mapping = matches!(self.pending, Pending::Mapping(_));
        let dotted = matches!(self.pending, Pending::Text(TextFlavor::DottedName { .. }));
        let choice = matches!(self.pending, Pending::Choice);
        let object = matches!(self.pending, Pending::Object(_));

        let settings = [
            ("min", self.min.is_some(), scalar),
            ("max", self.max.is_some(), scalar),
            ("min_length", self.min_length.is_some(), sized),
            ("max_length", self.max_length.is_some(), sized),
            ("unique", self.unique.is_some(), collection),
            ("min_dots", self.min_dots.is_some(), dotted),
            ("max_dots", self.max_dots.is_some(), dotted),
            ("value_type", self.value_type.is_some(), collection || mapping),
            ("key_type", self.key_type.is_some(), mapping),
            ("values", self.values.is_some(), choice),
            ("vocabulary", self.vocabulary.is_some(), choice),
            ("source", self.source.is_some(), choice),
            ("registry", self.registry.is_some(), choice),
            ("validate_invariants", self.validate_invariants.is_some(), object),
        ];
        for (setting, given, applies) in settings {
            if given && !applies {
                return Err(SchemaError::config(format!(
                    "'{}' does not apply to {} fields",
                    setting,
                    self.pending.kind_name()
                )));
            }
        }
        Ok(())
    }

    /// Check the settings and produce the field.
    ///
    /// `min` is validated first, then `max` against a field that already has
    /// its `min`, then the default against the finished field. Defaults equal
    /// to the missing value, and defaults of Choice fields whose vocabulary
    /// is named or context-bound, are not validated.
    pub fn build(self) -> Result<Field> {
        self.check_settings()?;
        let FieldBuilder {
            pending,
            name,
            title,
            description,
            required,
            readonly,
            default,
            missing_value,
            constraint,
            min,
            max,
            min_length,
            max_length,
            unique,
            min_dots,
            max_dots,
            key_type,
            value_type,
            values,
            vocabulary,
            source,
            registry,
            validate_invariants,
        } = self;

        let length = LengthBounds::new(min_length, max_length).map_err(SchemaError::InvalidConfiguration)?;
        let kind = match pending {
            Pending::Text(TextFlavor::DottedName { .. }) => FieldKind::Text(TextField {
                flavor: dotted_flavor(min_dots, max_dots)?,
                length,
            }),
            Pending::Text(flavor) => FieldKind::Text(TextField { flavor, length }),
            Pending::Bytes { line } => FieldKind::Bytes(BytesField { line, length }),
            Pending::Bool => FieldKind::Bool,
            Pending::Scalar(kind) => FieldKind::Scalar(ScalarField {
                kind,
                bounds: Bounds::default(),
            }),
            Pending::Interface => FieldKind::Interface,
            Pending::Choice => FieldKind::Choice(ChoiceField::from_sources(values, vocabulary, source, registry)?),
            Pending::Collection(kind) => FieldKind::Collection(CollectionField {
                kind,
                value_type: value_type.map(Box::new),
                unique: kind.is_set() || unique.unwrap_or(false),
                length,
            }),
            Pending::Mapping(kind) => FieldKind::Mapping(MappingField {
                kind,
                key_type: key_type.map(Box::new),
                value_type: value_type.map(Box::new),
                length,
            }),
            Pending::Object(schema) => FieldKind::Object(ObjectField {
                schema,
                validate_invariants: validate_invariants.unwrap_or(true),
            }),
        };

        let mut field = Field {
            name,
            interface: None,
            title,
            description,
            required,
            readonly,
            default: None,
            missing_value,
            constraint,
            context: None,
            kind,
        };

        if let Some(min) = min {
            field.validate(&min)?;
            if let FieldKind::Scalar(scalar) = &mut field.kind {
                scalar.bounds.min = Some(min);
            }
        }
        if let Some(max) = max {
            field.validate(&max)?;
            if let FieldKind::Scalar(scalar) = &mut field.kind {
                scalar.bounds.max = Some(max);
            }
        }
        if let Some(default) = default {
            let deferred = matches!(&field.kind, FieldKind::Choice(choice) if choice.is_deferred());
            if default != field.missing_value && !deferred {
                field.validate(&default)?;
            }
            field.default = Some(default);
        }
        Ok(field)
    }
}

fn dotted_flavor(min_dots: Option<i64>, max_dots: Option<i64>) -> Result<TextFlavor> {
    let min_dots = min_dots.unwrap_or(0);
    if min_dots < 0 {
        return Err(SchemaError::config("min_dots cannot be less than zero"));
    }
    if let Some(max) = max_dots {
        if max < min_dots {
            return Err(SchemaError::config("max_dots cannot be less than min_dots"));
        }
    }
    Ok(TextFlavor::DottedName {
        min_dots: min_dots as usize,
        max_dots: max_dots.map(|max| max as usize),
    })
}
