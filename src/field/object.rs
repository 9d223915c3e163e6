//! Object fields and recursive schema validation
//!
//! An `Object` field accepts a value that provides its schema and whose
//! declared fields all validate. Object graphs may be cyclic; the walk keeps
//! the objects it is currently inside in a [`ValidationContext`] and treats a
//! repeat visit as clean.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{Result, ValidationError, ValidationErrorKind};
use crate::field::{Field, FieldKind};
use crate::schema::{Declaration, Invalid, ObjectValue, Schema};
use crate::value::Value;

/// Objects currently being validated, innermost last
///
/// Holds strong references so an object cannot be dropped (and its address
/// reused) while it is on the stack.
#[derive(Default)]
pub struct ValidationContext {
    visiting: Vec<Arc<dyn ObjectValue>>,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.visiting.len()
    }

    pub fn is_visiting(&self, object: &Arc<dyn ObjectValue>) -> bool {
        let target = Arc::as_ptr(object) as *const ();
        self.visiting
            .iter()
            .any(|o| std::ptr::eq(Arc::as_ptr(o) as *const (), target))
    }

    /// Run `walk` with `object` marked as visiting. Returns `None` without
    /// running it when `object` is already being visited.
    fn visit<T>(&mut self, object: &Arc<dyn ObjectValue>, walk: impl FnOnce(&mut Self) -> T) -> Option<T> {
        if self.is_visiting(object) {
            trace!(depth = self.depth(), "Skipping object already under validation");
            return None;
        }
        self.visiting.push(object.clone());
        let result = walk(self);
        self.visiting.pop();
        Some(result)
    }
}

impl fmt::Debug for ValidationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationContext")
            .field("depth", &self.depth())
            .finish()
    }
}

#[derive(Clone)]
pub struct ObjectField {
    pub schema: Arc<dyn Schema>,
    pub validate_invariants: bool,
}

impl ObjectField {
    pub(crate) fn check(&self, field: &Field, value: &Value, ctx: &mut ValidationContext) -> Result<()> {
        if !self.schema.provided_by(value) {
            return Err(field
                .error(
                    ValidationErrorKind::SchemaNotProvided {
                        schema: self.schema.name().to_string(),
                    },
                    value,
                )
                .into());
        }

        let schema_errors = validate_fields_in(self.schema.as_ref(), value, ctx)?;
        let mut invariant_errors: Vec<Invalid> = Vec::new();
        if self.validate_invariants {
            // The aggregate duplicates what was appended to the list.
            let _ = self.schema.validate_invariants(value, &mut invariant_errors);
        }

        if schema_errors.is_empty() && invariant_errors.is_empty() {
            return Ok(());
        }
        debug!(
            schema = %self.schema.name(),
            attribute_errors = schema_errors.len(),
            invariant_errors = invariant_errors.len(),
            "Schema not correctly implemented"
        );
        Err(field
            .error(
                ValidationErrorKind::SchemaNotCorrectlyImplemented {
                    schema_errors,
                    invariant_errors,
                },
                value,
            )
            .into())
    }
}

impl fmt::Debug for ObjectField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectField")
            .field("schema", &self.schema.name())
            .field("validate_invariants", &self.validate_invariants)
            .finish()
    }
}

/// Validate every field `schema` declares against the attributes of `value`.
///
/// Returns the failures keyed by attribute name, in declaration order.
/// Choice fields are bound to `value` first. Errors that are not validation
/// failures (an unresolvable vocabulary, say) are returned as `Err`.
pub fn validate_fields(schema: &dyn Schema, value: &Value) -> Result<IndexMap<String, ValidationError>> {
    validate_fields_in(schema, value, &mut ValidationContext::new())
}

pub fn validate_fields_in(
    schema: &dyn Schema,
    value: &Value,
    ctx: &mut ValidationContext,
) -> Result<IndexMap<String, ValidationError>> {
    if schema.is_universal() {
        return Ok(IndexMap::new());
    }
    match value.as_object() {
        Some(object) => {
            let object = object.clone();
            ctx.visit(&object, |ctx| walk(schema, value, ctx))
                .unwrap_or_else(|| Ok(IndexMap::new()))
        }
        None => walk(schema, value, ctx),
    }
}

fn walk(schema: &dyn Schema, value: &Value, ctx: &mut ValidationContext) -> Result<IndexMap<String, ValidationError>> {
    debug!(schema = %schema.name(), depth = ctx.depth(), "Validating schema fields");
    let mut errors = IndexMap::new();
    for name in schema.names() {
        let Some(Declaration::Field(declared)) = schema.get(&name) else {
            continue;
        };
        let field = match declared.kind() {
            FieldKind::Choice(_) => declared.bind(value)?,
            _ => declared,
        };

        let Some(attribute) = value.attribute(&name) else {
            let missing = ValidationError::for_field(
                ValidationErrorKind::SchemaNotFullyImplemented {
                    attribute: name.clone(),
                },
                &field,
            );
            errors.entry(name).or_insert(missing);
            continue;
        };
        if let Err(e) = field.validate_in(&attribute, ctx) {
            let e = e.into_validation()?;
            errors.entry(name).or_insert(e);
        }
    }
    Ok(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;
    use crate::instance::Instance;
    use crate::schema::Interface;

    fn point() -> Arc<Interface> {
        Interface::builder("IPoint")
            .field("x", Field::int().build().unwrap())
            .method("norm", "Length of the vector")
            .build()
    }

    #[test]
    fn test_missing_and_wrong_attributes() {
        let schema = point();
        let field = Field::object(schema.clone()).build().unwrap();

        let empty = Instance::new(vec![schema.clone()]).into_value();
        let err = field.validate(&empty).unwrap_err();
        let err = err.as_validation().unwrap();
        assert_eq!(err.code(), "SchemaNotCorrectlyImplemented");
        assert_eq!(err.schema_errors().unwrap()["x"].code(), "SchemaNotFullyImplemented");
        assert!(err.invariant_errors().unwrap().is_empty());

        let wrong = Instance::new(vec![schema.clone()]).with("x", "not an int").into_value();
        let err = field.validate(&wrong).unwrap_err();
        let x = &err.as_validation().unwrap().schema_errors().unwrap()["x"];
        assert_eq!(x.code(), "WrongType");
        assert_eq!(x.field_name(), "x");

        let good = Instance::new(vec![schema]).with("x", 3).into_value();
        assert!(field.validate(&good).is_ok());
    }

    #[test]
    fn test_schema_not_provided() {
        let field = Field::object(point()).build().unwrap();
        let stranger = Instance::new(Vec::new()).with("x", 1).into_value();
        let err = field.validate(&stranger).unwrap_err();
        assert_eq!(err.as_validation().unwrap().code(), "SchemaNotProvided");
        assert!(field.validate(&Value::Int(1)).is_err());
    }

    #[test]
    fn test_any_schema_accepts_every_object() {
        let field = Field::object(Interface::any()).build().unwrap();
        assert!(field.validate(&Instance::new(Vec::new()).into_value()).is_ok());
    }

    #[test]
    fn test_invariants_are_reported_separately() {
        let schema = Interface::builder("IRange")
            .field("low", Field::int().build().unwrap())
            .field("high", Field::int().build().unwrap())
            .invariant("ordered", |v| {
                match (v.attribute("low"), v.attribute("high")) {
                    (Some(low), Some(high)) if low.compare(&high) == Some(std::cmp::Ordering::Greater) => {
                        Err(Invalid::new("low must not exceed high"))
                    }
                    _ => Ok(()),
                }
            })
            .build();
        let range = Instance::new(vec![schema.clone()]).with("low", 5).with("high", 1).into_value();

        let err = Field::object(schema.clone()).build().unwrap().validate(&range).unwrap_err();
        let err = err.as_validation().unwrap();
        assert!(err.schema_errors().unwrap().is_empty());
        assert_eq!(err.invariant_errors().unwrap()[0].message, "low must not exceed high");

        let lenient = Field::object(schema).validate_invariants(false).build().unwrap();
        assert!(lenient.validate(&range).is_ok());
    }

    #[test]
    fn test_cycle_terminates() {
        let node = Interface::builder("INode").build();
        node.declare_field("next", Field::object(node.clone()).build().unwrap());

        let a = Arc::new(Instance::new(vec![node.clone()]));
        let b = Arc::new(Instance::new(vec![node.clone()]));
        a.set_attribute("next", Value::object(b.clone())).unwrap();
        b.set_attribute("next", Value::object(a.clone())).unwrap();

        let field = Field::object(node.clone()).build().unwrap();
        assert!(field.validate(&Value::object(a.clone())).is_ok());

        let mut ctx = ValidationContext::new();
        assert!(validate_fields_in(node.as_ref(), &Value::object(a), &mut ctx).unwrap().is_empty());
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_unresolvable_vocabulary_propagates() {
        let schema = Interface::builder("IColored")
            .field(
                "color",
                Field::choice()
                    .vocabulary("colors")
                    .registry(Arc::new(crate::vocabulary::Registry::new()))
                    .build()
                    .unwrap(),
            )
            .build();
        let value = Instance::new(vec![schema.clone()]).with("color", "red").into_value();
        assert!(matches!(
            validate_fields(schema.as_ref(), &value),
            Err(SchemaError::Vocabulary(_))
        ));
    }

    #[test]
    fn test_context_released_after_failed_walk() {
        let colored = Interface::builder("IColored")
            .field(
                "color",
                Field::choice()
                    .vocabulary("colors")
                    .registry(Arc::new(crate::vocabulary::Registry::new()))
                    .build()
                    .unwrap(),
            )
            .build();
        let holder = Interface::builder("IHolder")
            .field("item", Field::object(colored.clone()).build().unwrap())
            .build();
        let item = Instance::new(vec![colored]).with("color", "red").into_value();
        let value = Instance::new(vec![holder.clone()]).with("item", item).into_value();

        let mut ctx = ValidationContext::new();
        assert!(validate_fields_in(holder.as_ref(), &value, &mut ctx).is_err());
        assert_eq!(ctx.depth(), 0);

        // The same context is still usable for the next walk
        let schema = point();
        let fine = Instance::new(vec![schema.clone()]).with("x", 1).into_value();
        assert!(validate_fields_in(schema.as_ref(), &fine, &mut ctx).unwrap().is_empty());
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_same_name_schema_is_not_provided() {
        let field = Field::object(point()).build().unwrap();
        let other_point = Instance::new(vec![point()]).with("x", 1).into_value();
        let err = field.validate(&other_point).unwrap_err();
        assert_eq!(err.as_validation().unwrap().code(), "SchemaNotProvided");
    }

    #[test]
    fn test_schema_named_like_any_still_checks_fields() {
        let schema = Interface::builder(crate::schema::ANY_SCHEMA)
            .field("x", Field::int().build().unwrap())
            .build();
        let value = Instance::new(vec![schema.clone()]).with("x", "not an int").into_value();

        let errors = validate_fields(schema.as_ref(), &value).unwrap();
        assert_eq!(errors["x"].code(), "WrongType");
        let err = Field::object(schema).build().unwrap().validate(&value).unwrap_err();
        assert_eq!(err.as_validation().unwrap().code(), "SchemaNotCorrectlyImplemented");
    }
}
