//! Runtime values checked by fields
//!
//! A [`Value`] is the dynamic representation of whatever is being validated:
//! scalars, the date/time family, collections, mappings, objects that provide
//! schemas, and schemas themselves. [`ValueType`] names the runtime types a
//! field accepts, including the abstract ones (`Sequence`, `Mapping`) that
//! several concrete collection types satisfy.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::error::{Result, SchemaError};
use crate::schema::{ObjectValue, Schema};

/// A dynamically typed value
#[derive(Clone, Default)]
pub enum Value {
    /// No value at all (the default `missing_value` of every field)
    #[default]
    Missing,
    Text(String),
    Bytes(Vec<u8>),
    Bool(bool),
    Int(i64),
    Float(f64),
    Decimal(Decimal),
    Date(NaiveDate),
    Datetime(NaiveDateTime),
    Time(NaiveTime),
    Timedelta(Duration),
    Tuple(Vec<Value>),
    List(Vec<Value>),
    Set(Vec<Value>),
    FrozenSet(Vec<Value>),
    /// Entries in insertion order
    Dict(Vec<(Value, Value)>),
    /// An object exposing named attributes, compared by identity
    Object(Arc<dyn ObjectValue>),
    /// A schema used as a value (see `Field::interface`), compared by identity
    Schema(Arc<dyn Schema>),
}

/// Runtime types a field can require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Text,
    Bytes,
    Bool,
    Int,
    Float,
    Decimal,
    Date,
    Datetime,
    Time,
    Timedelta,
    /// Tuples and lists
    Sequence,
    /// Lists
    MutableSequence,
    Tuple,
    List,
    Set,
    FrozenSet,
    /// Dicts
    Mapping,
    /// Dicts
    MutableMapping,
    Dict,
    Object,
    Schema,
}

impl ValueType {
    pub fn name(&self) -> &'static str {
        match self {
            ValueType::Text => "text",
            ValueType::Bytes => "bytes",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Decimal => "decimal",
            ValueType::Date => "date",
            ValueType::Datetime => "datetime",
            ValueType::Time => "time",
            ValueType::Timedelta => "timedelta",
            ValueType::Sequence => "sequence",
            ValueType::MutableSequence => "mutable sequence",
            ValueType::Tuple => "tuple",
            ValueType::List => "list",
            ValueType::Set => "set",
            ValueType::FrozenSet => "frozenset",
            ValueType::Mapping => "mapping",
            ValueType::MutableMapping => "mutable mapping",
            ValueType::Dict => "dict",
            ValueType::Object => "object",
            ValueType::Schema => "schema",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Value {
    pub fn tuple<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a set. Members are kept as given; duplicates are a concern of
    /// the field validating the set, not of the value.
    pub fn set<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::Set(items.into_iter().map(Into::into).collect())
    }

    pub fn frozenset<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::FrozenSet(items.into_iter().map(Into::into).collect())
    }

    pub fn dict<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Value::Dict(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn object<O: ObjectValue + 'static>(object: Arc<O>) -> Self {
        Value::Object(object)
    }

    pub fn schema<S: Schema + 'static>(schema: Arc<S>) -> Self {
        Value::Schema(schema)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// The concrete runtime type, `None` for the missing sentinel
    pub fn value_type(&self) -> Option<ValueType> {
        Some(match self {
            Value::Missing => return None,
            Value::Text(_) => ValueType::Text,
            Value::Bytes(_) => ValueType::Bytes,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::Float(_) => ValueType::Float,
            Value::Decimal(_) => ValueType::Decimal,
            Value::Date(_) => ValueType::Date,
            Value::Datetime(_) => ValueType::Datetime,
            Value::Time(_) => ValueType::Time,
            Value::Timedelta(_) => ValueType::Timedelta,
            Value::Tuple(_) => ValueType::Tuple,
            Value::List(_) => ValueType::List,
            Value::Set(_) => ValueType::Set,
            Value::FrozenSet(_) => ValueType::FrozenSet,
            Value::Dict(_) => ValueType::Dict,
            Value::Object(_) => ValueType::Object,
            Value::Schema(_) => ValueType::Schema,
        })
    }

    pub fn type_name(&self) -> &'static str {
        self.value_type().map(|t| t.name()).unwrap_or("missing")
    }

    /// Whether this value is an instance of `ty`.
    ///
    /// A datetime is also a date, a tuple or list is a sequence, a list is a
    /// mutable sequence, and a dict is a (mutable) mapping.
    pub fn is_instance(&self, ty: ValueType) -> bool {
        let Some(own) = self.value_type() else {
            return false;
        };
        if own == ty {
            return true;
        }
        matches!(
            (own, ty),
            (ValueType::Datetime, ValueType::Date)
                | (ValueType::Tuple, ValueType::Sequence)
                | (ValueType::List, ValueType::Sequence)
                | (ValueType::List, ValueType::MutableSequence)
                | (ValueType::Dict, ValueType::Mapping)
                | (ValueType::Dict, ValueType::MutableMapping)
        )
    }

    /// Size of the value: characters for text, bytes, members or entries
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Text(s) => Some(s.chars().count()),
            Value::Bytes(b) => Some(b.len()),
            Value::Tuple(items) | Value::List(items) | Value::Set(items) | Value::FrozenSet(items) => {
                Some(items.len())
            }
            Value::Dict(entries) => Some(entries.len()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// Members of a tuple, list, set or frozenset
    pub fn members(&self) -> Option<&[Value]> {
        match self {
            Value::Tuple(items) | Value::List(items) | Value::Set(items) | Value::FrozenSet(items) => {
                Some(items)
            }
            _ => None,
        }
    }

    pub fn entries(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Dict(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Arc<dyn ObjectValue>> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Read an attribute off an object value. Anything that is not an object
    /// has no attributes.
    pub fn attribute(&self, name: &str) -> Option<Value> {
        self.as_object().and_then(|object| object.attribute(name))
    }

    pub fn set_attribute(&self, name: &str, value: Value) -> Result<()> {
        match self {
            Value::Object(object) => object.set_attribute(name, value),
            other => Err(SchemaError::NotAnObject {
                name: name.to_string(),
                type_name: other.type_name(),
            }),
        }
    }

    /// Order two values of compatible types; `None` when they do not compare.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
            (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Value::Decimal(a), Value::Decimal(b)) => Some(a.cmp(b)),
            (Value::Int(a), Value::Decimal(b)) => Some(Decimal::from(*a).cmp(b)),
            (Value::Decimal(a), Value::Int(b)) => Some(a.cmp(&Decimal::from(*b))),
            (Value::Float(a), Value::Decimal(b)) => Decimal::from_f64_retain(*a).map(|a| a.cmp(b)),
            (Value::Decimal(a), Value::Float(b)) => Decimal::from_f64_retain(*b).map(|b| a.cmp(&b)),
            (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
            (Value::Datetime(a), Value::Datetime(b)) => Some(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
            (Value::Timedelta(a), Value::Timedelta(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (Value::Bytes(a), Value::Bytes(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Token used for this value in a simple vocabulary
    pub fn token(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

fn same_identity<T: ?Sized>(a: &Arc<T>, b: &Arc<T>) -> bool {
    std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Missing, Value::Missing) => true,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Decimal(a), Value::Decimal(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Datetime(a), Value::Datetime(b)) => a == b,
            (Value::Time(a), Value::Time(b)) => a == b,
            (Value::Timedelta(a), Value::Timedelta(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) | (Value::FrozenSet(a), Value::FrozenSet(b)) => {
                a.len() == b.len() && a.iter().all(|item| b.contains(item))
            }
            (Value::Dict(a), Value::Dict(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| b.iter().any(|(bk, bv)| k == bk && v == bv))
            }
            (Value::Object(a), Value::Object(b)) => same_identity(a, b),
            (Value::Schema(a), Value::Schema(b)) => same_identity(a, b),
            // Numbers of different types are equal when they order as equal
            (
                Value::Int(_) | Value::Float(_) | Value::Decimal(_),
                Value::Int(_) | Value::Float(_) | Value::Decimal(_),
            ) => self.compare(other) == Some(Ordering::Equal),
            _ => false,
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => f.write_str("<missing>"),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::Bytes(b) => write!(f, "b\"{}\"", b.escape_ascii()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Date(d) => write!(f, "{}", d),
            Value::Datetime(d) => write!(f, "{}", d),
            Value::Time(t) => write!(f, "{}", t),
            Value::Timedelta(d) => write!(f, "{}", d),
            Value::Tuple(items) => {
                f.write_str("(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Value::List(items) => {
                f.write_str("[")?;
                write_items(f, items)?;
                f.write_str("]")
            }
            Value::Set(items) => {
                f.write_str("{")?;
                write_items(f, items)?;
                f.write_str("}")
            }
            Value::FrozenSet(items) => {
                f.write_str("frozenset({")?;
                write_items(f, items)?;
                f.write_str("})")
            }
            Value::Dict(entries) => {
                f.write_str("{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                f.write_str("}")
            }
            Value::Object(object) => write!(f, "<object at {:p}>", Arc::as_ptr(object) as *const ()),
            Value::Schema(schema) => write!(f, "<schema {}>", schema.name()),
        }
    }
}

// Objects may reference themselves, so Debug never descends into them.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl<const N: usize> From<&[u8; N]> for Value {
    fn from(b: &[u8; N]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(d: NaiveDateTime) -> Self {
        Value::Datetime(d)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::Time(t)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Value::Timedelta(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// JSON documents map onto values the obvious way: `null` is missing,
/// arrays are lists and objects are dicts keyed by text.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Missing,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(map) => Value::Dict(
                map.into_iter()
                    .map(|(k, v)| (Value::Text(k), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_datetime_is_a_date() {
        let dt = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let value = Value::from(dt);
        assert!(value.is_instance(ValueType::Date));
        assert!(value.is_instance(ValueType::Datetime));
        assert!(!Value::from(dt.date()).is_instance(ValueType::Datetime));
    }

    #[test]
    fn test_abstract_collection_types() {
        assert!(Value::tuple([1, 2]).is_instance(ValueType::Sequence));
        assert!(!Value::tuple([1, 2]).is_instance(ValueType::MutableSequence));
        assert!(Value::list([1, 2]).is_instance(ValueType::MutableSequence));
        assert!(Value::dict([("a", 1)]).is_instance(ValueType::Mapping));
        assert!(!Value::set([1]).is_instance(ValueType::Sequence));
        assert!(!Value::Missing.is_instance(ValueType::Text));
    }

    #[test]
    fn test_len_counts_characters() {
        assert_eq!(Value::from("héllo").len(), Some(5));
        assert_eq!(Value::from(b"abc").len(), Some(3));
        assert_eq!(Value::Int(3).len(), None);
    }

    #[test]
    fn test_compare_mixed_numbers() {
        assert_eq!(Value::Int(1).compare(&Value::Float(1.5)), Some(Ordering::Less));
        assert_eq!(Value::Float(f64::NAN).compare(&Value::Float(1.0)), None);
        assert_eq!(Value::from("a").compare(&Value::Int(1)), None);
    }

    #[test]
    fn test_numbers_equal_across_types() {
        assert_eq!(Value::Int(1), Value::Float(1.0));
        assert_eq!(Value::Decimal(Decimal::from(2)), Value::Int(2));
        assert_eq!(Value::Float(0.5), Value::Decimal(Decimal::new(5, 1)));
        assert_ne!(Value::Int(1), Value::Float(1.5));
        assert_ne!(Value::Int(1), Value::from("1"));
        assert_ne!(Value::Bool(true), Value::Int(1));
    }

    #[test]
    fn test_set_equality_ignores_order() {
        assert_eq!(Value::set([1, 2]), Value::set([2, 1]));
        assert_ne!(Value::set([1, 2]), Value::frozenset([1, 2]));
    }

    #[test]
    fn test_from_json() {
        let value = Value::from(json!({"name": "ada", "tags": ["x"], "age": 36, "ratio": 0.5, "gone": null}));
        let entries = value.entries().unwrap();
        let get = |key: &str| {
            entries
                .iter()
                .find(|(k, _)| k.as_text() == Some(key))
                .map(|(_, v)| v.clone())
                .unwrap()
        };
        assert_eq!(entries.len(), 5);
        assert_eq!(get("name"), Value::from("ada"));
        assert_eq!(get("tags"), Value::list(["x"]));
        assert_eq!(get("age"), Value::Int(36));
        assert_eq!(get("ratio"), Value::Float(0.5));
        assert!(get("gone").is_missing());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::tuple([Value::from(b"foo"), Value::from("bar"), Value::Int(1)]).to_string(), "(b\"foo\", \"bar\", 1)");
        assert_eq!(Value::tuple([1]).to_string(), "(1,)");
    }
}
