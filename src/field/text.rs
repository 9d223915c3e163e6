//! Text and byte-string fields
//!
//! All text kinds accept `Value::Text`. They differ in their built-in line
//! restriction and in the literal shape checked after the common checks.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{LiteralKind, Result, ValidationError, ValidationErrorKind};
use crate::field::bounds::LengthBounds;
use crate::field::Field;
use crate::value::Value;

fn uri_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-z0-9+.-]+:\S*$").expect("valid URI pattern"))
}

fn dotted_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^([a-zA-Z][a-zA-Z0-9_]*)([.][a-zA-Z][a-zA-Z0-9_]*)*$")
            .expect("valid dotted name pattern")
    })
}

pub(crate) fn is_uri(text: &str) -> bool {
    uri_pattern().is_match(text)
}

pub(crate) fn is_dotted_name(text: &str) -> bool {
    dotted_pattern().is_match(text)
}

/// Which text field this is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFlavor {
    Text,
    /// Program source; no extra rules
    SourceText,
    /// Single line; rendered masked by UIs
    Password,
    TextLine,
    Ascii,
    AsciiLine,
    Uri,
    DottedName {
        min_dots: usize,
        max_dots: Option<usize>,
    },
    /// A URI or a dotted name with at least one dot
    Id,
}

impl TextFlavor {
    pub fn kind_name(&self) -> &'static str {
        match self {
            TextFlavor::Text => "Text",
            TextFlavor::SourceText => "SourceText",
            TextFlavor::Password => "Password",
            TextFlavor::TextLine => "TextLine",
            TextFlavor::Ascii => "ASCII",
            TextFlavor::AsciiLine => "ASCIILine",
            TextFlavor::Uri => "URI",
            TextFlavor::DottedName { .. } => "DottedName",
            TextFlavor::Id => "Id",
        }
    }

    /// Characters the built-in constraint forbids
    fn forbidden(&self) -> &'static [char] {
        match self {
            TextFlavor::Text | TextFlavor::SourceText | TextFlavor::Ascii => &[],
            TextFlavor::AsciiLine => &['\n'],
            TextFlavor::Password
            | TextFlavor::TextLine
            | TextFlavor::Uri
            | TextFlavor::DottedName { .. }
            | TextFlavor::Id => &['\n', '\r'],
        }
    }

    fn literal(&self) -> Option<LiteralKind> {
        match self {
            TextFlavor::Uri => Some(LiteralKind::Uri),
            TextFlavor::DottedName { .. } => Some(LiteralKind::DottedName),
            TextFlavor::Id => Some(LiteralKind::Id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextField {
    pub flavor: TextFlavor,
    pub length: LengthBounds,
}

impl TextField {
    pub(crate) fn builtin_constraint(&self, value: &Value) -> bool {
        let forbidden = self.flavor.forbidden();
        match value.as_text() {
            Some(text) if !forbidden.is_empty() => !text.contains(forbidden),
            _ => true,
        }
    }

    pub(crate) fn check(&self, field: &Field, value: &Value) -> std::result::Result<(), ValidationError> {
        self.length.check(field, value)?;
        let Some(text) = value.as_text() else {
            return Ok(());
        };
        match self.flavor {
            TextFlavor::Ascii | TextFlavor::AsciiLine if !text.is_ascii() => {
                Err(field.error(ValidationErrorKind::InvalidValue, value))
            }
            TextFlavor::Uri if !is_uri(text) => Err(invalid(field, LiteralKind::Uri, text, value)),
            TextFlavor::DottedName { min_dots, max_dots } => {
                if !is_dotted_name(text) {
                    return Err(invalid(field, LiteralKind::DottedName, text, value));
                }
                let dots = text.matches('.').count();
                if dots < min_dots {
                    let message = format!("too few dots; {} required", min_dots);
                    return Err(invalid(field, LiteralKind::DottedName, &message, value));
                }
                match max_dots {
                    Some(max) if dots > max => {
                        let message = format!("too many dots; no more than {} allowed", max);
                        Err(invalid(field, LiteralKind::DottedName, &message, value))
                    }
                    _ => Ok(()),
                }
            }
            TextFlavor::Id if !(is_uri(text) || (is_dotted_name(text) && text.contains('.'))) => {
                Err(invalid(field, LiteralKind::Id, text, value))
            }
            _ => Ok(()),
        }
    }

    /// Turn raw text into a candidate value. URIs, dotted names and ids are
    /// trimmed; dotted names and ids must be ASCII.
    pub(crate) fn parse(&self, field: &Field, text: &str) -> Result<Value> {
        match self.flavor {
            TextFlavor::Uri => Ok(Value::from(text.trim())),
            TextFlavor::DottedName { .. } | TextFlavor::Id => {
                let trimmed = text.trim();
                if !trimmed.is_ascii() {
                    let literal = self.flavor.literal().unwrap_or(LiteralKind::Id);
                    return Err(invalid(field, literal, text, &Value::from(text)).into());
                }
                Ok(Value::from(trimmed))
            }
            _ => Ok(Value::from(text)),
        }
    }
}

fn invalid(field: &Field, literal: LiteralKind, message: &str, value: &Value) -> ValidationError {
    field.error(
        ValidationErrorKind::InvalidLiteral {
            literal,
            message: message.to_string(),
        },
        value,
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct BytesField {
    /// Reject the newline byte
    pub line: bool,
    pub length: LengthBounds,
}

impl BytesField {
    pub(crate) fn builtin_constraint(&self, value: &Value) -> bool {
        match value.as_bytes() {
            Some(bytes) if self.line => !bytes.contains(&b'\n'),
            _ => true,
        }
    }

    pub(crate) fn parse(&self, field: &Field, text: &str) -> Result<Value> {
        if !text.is_ascii() {
            return Err(field.error(ValidationErrorKind::InvalidValue, &Value::from(text)).into());
        }
        Ok(Value::Bytes(text.as_bytes().to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(field: &Field, value: impl Into<Value>) -> Option<&'static str> {
        field
            .validate(&value.into())
            .err()
            .and_then(|e| e.as_validation().map(|v| v.code()))
    }

    #[test]
    fn test_line_restrictions() {
        let line = Field::text_line().build().unwrap();
        assert_eq!(code(&line, "one"), None);
        assert_eq!(code(&line, "one\ntwo"), Some("ConstraintNotSatisfied"));
        assert_eq!(code(&line, "one\rtwo"), Some("ConstraintNotSatisfied"));

        let ascii_line = Field::ascii_line().build().unwrap();
        assert_eq!(code(&ascii_line, "a\rb"), None);
        assert_eq!(code(&ascii_line, "a\nb"), Some("ConstraintNotSatisfied"));

        let bytes_line = Field::bytes_line().build().unwrap();
        assert_eq!(code(&bytes_line, b"a\nb"), Some("ConstraintNotSatisfied"));
        assert_eq!(code(&bytes_line, "text"), Some("WrongType"));

        let password = Field::password().build().unwrap();
        assert_eq!(code(&password, "se\ncret"), Some("ConstraintNotSatisfied"));
        assert_eq!(code(&Field::source_text().build().unwrap(), "a\nb"), None);
    }

    #[test]
    fn test_custom_constraint_replaces_line_rule() {
        let field = Field::text_line()
            .constraint(|v| v.as_text().map_or(false, |s| s.starts_with('#')))
            .build()
            .unwrap();
        assert_eq!(code(&field, "#multi\nline"), None);
        assert_eq!(code(&field, "plain"), Some("ConstraintNotSatisfied"));
    }

    #[test]
    fn test_ascii() {
        let field = Field::ascii().build().unwrap();
        assert_eq!(code(&field, "plain"), None);
        assert_eq!(code(&field, "caf\u{e9}"), Some("InvalidValue"));
    }

    #[test]
    fn test_uri() {
        let field = Field::uri().build().unwrap();
        assert_eq!(code(&field, "http://example.com/a"), None);
        assert_eq!(code(&field, "mailto:a@b"), None);
        assert_eq!(code(&field, "no scheme"), Some("InvalidURI"));
        // Scheme characters run from 'A' to 'z', underscore included
        assert_eq!(code(&field, "my_scheme:foo"), None);
        assert_eq!(field.from_unicode("  http://x.org  ").unwrap(), Value::from("http://x.org"));
    }

    #[test]
    fn test_dotted_name_dots() {
        let field = Field::dotted_name().min_dots(1).max_dots(2).build().unwrap();
        assert_eq!(code(&field, "has.dots"), None);
        assert_eq!(code(&field, "a.b.c"), None);

        let err = field.validate(&Value::from("nodots")).unwrap_err();
        let err = err.as_validation().unwrap();
        assert_eq!(err.code(), "InvalidDottedName");
        assert!(err.message().contains("too few dots; 1 required"));

        let err = field.validate(&Value::from("a.b.c.d")).unwrap_err();
        assert!(err.to_string().contains("too many dots; no more than 2 allowed"));

        assert_eq!(code(&field, "1bad.name"), Some("InvalidDottedName"));
    }

    #[test]
    fn test_dotted_name_construction() {
        assert!(Field::dotted_name().min_dots(-1).build().is_err());
        assert!(Field::dotted_name().min_dots(2).max_dots(1).build().is_err());
    }

    #[test]
    fn test_id() {
        let field = Field::id().build().unwrap();
        assert_eq!(code(&field, "http://example.com"), None);
        assert_eq!(code(&field, "familiar.fields"), None);
        assert_eq!(code(&field, "nodots"), Some("InvalidId"));
    }

    #[test]
    fn test_non_ascii_dotted_text_is_an_invalid_literal() {
        let field = Field::dotted_name().build().unwrap();
        let err = field.from_unicode(" caf\u{e9}.menu ").unwrap_err();
        assert_eq!(err.as_validation().unwrap().code(), "InvalidDottedName");
        assert_eq!(field.from_unicode(" a.b ").unwrap(), Value::from("a.b"));

        let id = Field::id().build().unwrap();
        assert_eq!(id.from_unicode("\u{e9}.x").unwrap_err().as_validation().unwrap().code(), "InvalidId");
    }

    #[test]
    fn test_bytes_from_unicode() {
        let field = Field::bytes().build().unwrap();
        assert_eq!(field.from_unicode("abc").unwrap(), Value::from(b"abc"));
        let err = field.from_unicode("\u{e9}").unwrap_err();
        assert_eq!(err.as_validation().unwrap().code(), "InvalidValue");
    }
}
