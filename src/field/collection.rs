//! Collection and mapping fields
//!
//! Member checks are fail-slow: every member is validated and all failures
//! are reported together in one `WrongContainedType`. Uniqueness is only
//! checked once every member is valid.

use crate::error::{ContainedError, Position, Result, ValidationErrorKind};
use crate::field::bounds::LengthBounds;
use crate::field::object::ValidationContext;
use crate::field::Field;
use crate::value::{Value, ValueType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    /// Tuples or lists
    Sequence,
    MutableSequence,
    Tuple,
    List,
    Set,
    FrozenSet,
}

impl CollectionKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            CollectionKind::Sequence => "Sequence",
            CollectionKind::MutableSequence => "MutableSequence",
            CollectionKind::Tuple => "Tuple",
            CollectionKind::List => "List",
            CollectionKind::Set => "Set",
            CollectionKind::FrozenSet => "FrozenSet",
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            CollectionKind::Sequence => ValueType::Sequence,
            CollectionKind::MutableSequence => ValueType::MutableSequence,
            CollectionKind::Tuple => ValueType::Tuple,
            CollectionKind::List => ValueType::List,
            CollectionKind::Set => ValueType::Set,
            CollectionKind::FrozenSet => ValueType::FrozenSet,
        }
    }

    /// Sets are unique by nature and take no `unique` setting
    pub fn is_set(&self) -> bool {
        matches!(self, CollectionKind::Set | CollectionKind::FrozenSet)
    }
}

#[derive(Debug, Clone)]
pub struct CollectionField {
    pub kind: CollectionKind,
    pub value_type: Option<Box<Field>>,
    pub unique: bool,
    pub length: LengthBounds,
}

impl CollectionField {
    pub(crate) fn check(&self, field: &Field, value: &Value, ctx: &mut ValidationContext) -> Result<()> {
        self.length.check(field, value)?;
        let members = value.members().unwrap_or(&[]);

        let mut errors = Vec::new();
        if let Some(value_type) = &self.value_type {
            for (i, member) in members.iter().enumerate() {
                if let Err(e) = value_type.validate_in(member, ctx) {
                    errors.push(ContainedError {
                        position: Position::Index(i),
                        error: e.into_validation()?,
                    });
                }
            }
        }
        if !errors.is_empty() {
            return Err(field
                .error(ValidationErrorKind::WrongContainedType { errors }, value)
                .into());
        }

        if self.unique {
            for (i, member) in members.iter().enumerate() {
                if members[..i].contains(member) {
                    return Err(field
                        .error(
                            ValidationErrorKind::NotUnique {
                                duplicate: member.clone(),
                            },
                            value,
                        )
                        .into());
                }
            }
        }
        Ok(())
    }

    pub(crate) fn bind(&self, context: &Value) -> Result<Self> {
        let value_type = match &self.value_type {
            Some(field) => Some(Box::new(field.bind(context)?)),
            None => None,
        };
        Ok(Self {
            value_type,
            ..self.clone()
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingKind {
    Mapping,
    MutableMapping,
    Dict,
}

impl MappingKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            MappingKind::Mapping => "Mapping",
            MappingKind::MutableMapping => "MutableMapping",
            MappingKind::Dict => "Dict",
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            MappingKind::Mapping => ValueType::Mapping,
            MappingKind::MutableMapping => ValueType::MutableMapping,
            MappingKind::Dict => ValueType::Dict,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MappingField {
    pub kind: MappingKind,
    pub key_type: Option<Box<Field>>,
    pub value_type: Option<Box<Field>>,
    pub length: LengthBounds,
}

impl MappingField {
    /// Values are checked before keys, and errors are reported in that order.
    pub(crate) fn check(&self, field: &Field, value: &Value, ctx: &mut ValidationContext) -> Result<()> {
        self.length.check(field, value)?;
        let entries = value.entries().unwrap_or(&[]);

        let mut errors = Vec::new();
        if let Some(value_type) = &self.value_type {
            for (i, (_, v)) in entries.iter().enumerate() {
                if let Err(e) = value_type.validate_in(v, ctx) {
                    errors.push(ContainedError {
                        position: Position::Value(i),
                        error: e.into_validation()?,
                    });
                }
            }
        }
        if let Some(key_type) = &self.key_type {
            for (i, (k, _)) in entries.iter().enumerate() {
                if let Err(e) = key_type.validate_in(k, ctx) {
                    errors.push(ContainedError {
                        position: Position::Key(i),
                        error: e.into_validation()?,
                    });
                }
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(field
                .error(ValidationErrorKind::WrongContainedType { errors }, value)
                .into())
        }
    }

    pub(crate) fn bind(&self, context: &Value) -> Result<Self> {
        let bind = |slot: &Option<Box<Field>>| -> Result<Option<Box<Field>>> {
            match slot {
                Some(field) => Ok(Some(Box::new(field.bind(context)?))),
                None => Ok(None),
            }
        };
        Ok(Self {
            kind: self.kind,
            key_type: bind(&self.key_type)?,
            value_type: bind(&self.value_type)?,
            length: self.length,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaError;

    fn contained(err: &SchemaError) -> Vec<(Position, &'static str)> {
        err.as_validation()
            .and_then(|e| e.contained_errors())
            .unwrap_or(&[])
            .iter()
            .map(|c| (c.position, c.error.code()))
            .collect()
    }

    #[test]
    fn test_all_member_errors_are_collected() {
        let field = Field::tuple()
            .value_type(Field::text_line().build().unwrap())
            .build()
            .unwrap();
        let value = Value::tuple([Value::from(b"foo"), Value::from("bar"), Value::Int(1)]);

        let err = field.validate(&value).unwrap_err();
        assert_eq!(err.as_validation().unwrap().code(), "WrongContainedType");
        assert_eq!(
            contained(&err),
            vec![(Position::Index(0), "WrongType"), (Position::Index(2), "WrongType")]
        );
    }

    #[test]
    fn test_sequence_accepts_tuples_and_lists() {
        let field = Field::sequence().build().unwrap();
        assert!(field.validate(&Value::tuple([1])).is_ok());
        assert!(field.validate(&Value::list([1])).is_ok());
        assert!(field.validate(&Value::set([1])).is_err());

        let mutable = Field::mutable_sequence().build().unwrap();
        assert!(mutable.validate(&Value::tuple([1])).is_err());
        assert!(mutable.validate(&Value::list([1])).is_ok());
    }

    #[test]
    fn test_unique_checked_after_members() {
        let field = Field::list()
            .value_type(Field::int().build().unwrap())
            .unique(true)
            .build()
            .unwrap();
        assert!(field.validate(&Value::list([1, 2, 3])).is_ok());

        let err = field.validate(&Value::list([1, 2, 1])).unwrap_err();
        let err = err.as_validation().unwrap();
        match err.kind() {
            ValidationErrorKind::NotUnique { duplicate } => assert_eq!(duplicate, &Value::Int(1)),
            other => panic!("Expected NotUnique, got {:?}", other),
        }
        assert_eq!(err.value(), Some(&Value::list([1, 2, 1])));

        // A member failure wins over a duplicate
        let err = field
            .validate(&Value::list([Value::Int(1), Value::Int(1), Value::from("x")]))
            .unwrap_err();
        assert_eq!(err.as_validation().unwrap().code(), "WrongContainedType");
    }

    #[test]
    fn test_unique_compares_numbers_by_value() {
        let field = Field::list().unique(true).build().unwrap();
        let err = field
            .validate(&Value::list([Value::Int(1), Value::Float(1.0)]))
            .unwrap_err();
        match err.as_validation().unwrap().kind() {
            ValidationErrorKind::NotUnique { duplicate } => assert_eq!(duplicate, &Value::Float(1.0)),
            other => panic!("Expected NotUnique, got {:?}", other),
        }
        assert!(field.validate(&Value::list([Value::Int(1), Value::Float(1.5)])).is_ok());
    }

    #[test]
    fn test_sets_are_always_unique() {
        let field = Field::set_of().build().unwrap();
        let err = field.validate(&Value::set([1, 1])).unwrap_err();
        assert_eq!(err.as_validation().unwrap().code(), "NotUnique");

        let frozen = Field::frozenset().build().unwrap();
        assert!(frozen.validate(&Value::frozenset([1, 2])).is_ok());
        assert!(frozen.validate(&Value::set([1, 2])).is_err());

        for builder in [Field::set_of(), Field::frozenset()] {
            match builder.unique(true).build() {
                Err(SchemaError::InvalidConfiguration(message)) => {
                    assert_eq!(message, "unexpected keyword argument 'unique'")
                }
                other => panic!("Expected InvalidConfiguration, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_mapping_values_then_keys() {
        let field = Field::dict()
            .key_type(Field::text_line().build().unwrap())
            .value_type(Field::int().build().unwrap())
            .build()
            .unwrap();
        assert!(field.validate(&Value::dict([("a", 1), ("b", 2)])).is_ok());

        let value = Value::dict([(Value::Int(1), Value::Int(1)), (Value::from("b"), Value::from("two"))]);
        let err = field.validate(&value).unwrap_err();
        assert_eq!(
            contained(&err),
            vec![(Position::Value(1), "WrongType"), (Position::Key(0), "WrongType")]
        );
    }

    #[test]
    fn test_mapping_length() {
        let field = Field::mapping().max_length(1).build().unwrap();
        let err = field.validate(&Value::dict([("a", 1), ("b", 2)])).unwrap_err();
        assert_eq!(err.as_validation().unwrap().code(), "TooLong");
        assert!(Field::mutable_mapping().build().unwrap().validate(&Value::dict([("a", 1)])).is_ok());
    }
}
