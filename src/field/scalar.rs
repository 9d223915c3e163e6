//! Orderable scalar fields: numbers and the date/time family

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{LiteralKind, Result, SchemaError, ValidationErrorKind};
use crate::field::bounds::Bounds;
use crate::field::Field;
use crate::value::{Value, ValueType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Int,
    Float,
    Decimal,
    Date,
    Datetime,
    Time,
    Timedelta,
}

impl ScalarKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ScalarKind::Int => "Int",
            ScalarKind::Float => "Float",
            ScalarKind::Decimal => "Decimal",
            ScalarKind::Date => "Date",
            ScalarKind::Datetime => "Datetime",
            ScalarKind::Time => "Time",
            ScalarKind::Timedelta => "Timedelta",
        }
    }

    pub fn value_type(&self) -> ValueType {
        match self {
            ScalarKind::Int => ValueType::Int,
            ScalarKind::Float => ValueType::Float,
            ScalarKind::Decimal => ValueType::Decimal,
            ScalarKind::Date => ValueType::Date,
            ScalarKind::Datetime => ValueType::Datetime,
            ScalarKind::Time => ValueType::Time,
            ScalarKind::Timedelta => ValueType::Timedelta,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalarField {
    pub kind: ScalarKind,
    pub bounds: Bounds,
}

impl ScalarField {
    /// Dates are narrower than their runtime type: a datetime is a date but
    /// a `Date` field does not accept one.
    pub(crate) fn accepts(&self, value: &Value) -> bool {
        match self.kind {
            ScalarKind::Date => matches!(value, Value::Date(_)),
            kind => value.is_instance(kind.value_type()),
        }
    }

    pub(crate) fn parse(&self, field: &Field, text: &str) -> Result<Value> {
        let trimmed = text.trim();
        let literal_error = |literal: LiteralKind, message: String| -> SchemaError {
            field
                .error(ValidationErrorKind::InvalidLiteral { literal, message }, &Value::from(text))
                .into()
        };
        match self.kind {
            ScalarKind::Int => trimmed.parse::<i64>().map(Value::Int).map_err(|_| {
                literal_error(
                    LiteralKind::Int,
                    format!("invalid literal for int() with base 10: '{}'", text),
                )
            }),
            ScalarKind::Float => trimmed.parse::<f64>().map(Value::Float).map_err(|_| {
                literal_error(
                    LiteralKind::Float,
                    format!("could not convert string to float: '{}'", text),
                )
            }),
            ScalarKind::Decimal => Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .map(Value::Decimal)
                .map_err(|_| {
                    literal_error(
                        LiteralKind::Decimal,
                        format!("invalid literal for Decimal(): {}", text),
                    )
                }),
            kind => Err(SchemaError::NotParseable(kind.kind_name())),
        }
    }
}
