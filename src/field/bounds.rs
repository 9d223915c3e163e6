//! Range and size limits shared by several field kinds

use std::cmp::Ordering;

use crate::error::{ValidationError, ValidationErrorKind};
use crate::field::Field;
use crate::value::Value;

/// Inclusive `min`/`max` limits for orderable values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bounds {
    pub min: Option<Value>,
    pub max: Option<Value>,
}

impl Bounds {
    /// Values that do not compare with a bound (NaN, mismatched types) pass it.
    pub(crate) fn check(&self, field: &Field, value: &Value) -> Result<(), ValidationError> {
        if let Some(min) = &self.min {
            if value.compare(min) == Some(Ordering::Less) {
                return Err(field.error(ValidationErrorKind::TooSmall { min: min.clone() }, value));
            }
        }
        if let Some(max) = &self.max {
            if value.compare(max) == Some(Ordering::Greater) {
                return Err(field.error(ValidationErrorKind::TooBig { max: max.clone() }, value));
            }
        }
        Ok(())
    }
}

/// Size limits: characters, bytes, members or entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LengthBounds {
    pub min_length: usize,
    pub max_length: Option<usize>,
}

impl LengthBounds {
    pub(crate) fn new(min_length: Option<usize>, max_length: Option<usize>) -> Result<Self, String> {
        let min_length = min_length.unwrap_or(0);
        if let Some(max) = max_length {
            if max < min_length {
                return Err("max_length cannot be less than min_length".to_string());
            }
        }
        Ok(Self {
            min_length,
            max_length,
        })
    }

    pub(crate) fn check(&self, field: &Field, value: &Value) -> Result<(), ValidationError> {
        let Some(len) = value.len() else {
            return Ok(());
        };
        if len < self.min_length {
            return Err(field.error(
                ValidationErrorKind::TooShort {
                    min_length: self.min_length,
                },
                value,
            ));
        }
        match self.max_length {
            Some(max_length) if len > max_length => {
                Err(field.error(ValidationErrorKind::TooLong { max_length }, value))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_are_inclusive() {
        let field = Field::int().min(1).max(3).build().unwrap();
        assert!(field.validate(&Value::Int(1)).is_ok());
        assert!(field.validate(&Value::Int(3)).is_ok());

        let err = field.validate(&Value::Int(0)).unwrap_err();
        assert_eq!(err.as_validation().unwrap().code(), "TooSmall");
        let err = field.validate(&Value::Int(4)).unwrap_err();
        assert_eq!(err.as_validation().unwrap().code(), "TooBig");
    }

    #[test]
    fn test_nan_is_not_out_of_range() {
        let field = Field::float().min(0.0).max(1.0).build().unwrap();
        assert!(field.validate(&Value::Float(f64::NAN)).is_ok());
    }

    #[test]
    fn test_length_bounds() {
        let field = Field::text().min_length(2).max_length(4).build().unwrap();
        assert!(field.validate(&Value::from("abc")).is_ok());
        let short = field.validate(&Value::from("a")).unwrap_err();
        assert_eq!(short.as_validation().unwrap().code(), "TooShort");
        let long = field.validate(&Value::from("abcde")).unwrap_err();
        assert_eq!(long.as_validation().unwrap().code(), "TooLong");
    }

    #[test]
    fn test_inverted_length_bounds_rejected() {
        assert!(LengthBounds::new(Some(3), Some(2)).is_err());
        assert_eq!(LengthBounds::new(None, None).unwrap().min_length, 0);
    }
}
