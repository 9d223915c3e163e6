//! Choice fields: values restricted to a vocabulary
//!
//! The vocabulary comes from one of four places, and the field moves between
//! them only through [`Field::bind`]:
//!
//! | state      | where it came from                 | after `bind`            |
//! |------------|------------------------------------|-------------------------|
//! | `Inline`   | fixed values or a vocabulary       | unchanged               |
//! | `Named`    | a registry name, looked up lazily  | `Bound` (registry hit)  |
//! | `Binder`   | a context source binder            | `Bound` (binder result) |
//! | `Bound`    | one of the above, resolved         | unchanged               |

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, SchemaError, ValidationErrorKind};
use crate::field::Field;
use crate::value::Value;
use crate::vocabulary::{self, ContextSourceBinder, SimpleVocabulary, Vocabulary, VocabularyError, VocabularyRegistry};

/// A vocabulary source handed to the Choice builder
#[derive(Clone)]
pub enum Source {
    /// Registered vocabulary name, resolved through a registry
    Name(String),
    Vocabulary(Arc<dyn Vocabulary>),
    Binder(Arc<dyn ContextSourceBinder>),
}

impl Source {
    pub fn binder<F>(binder: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<Arc<dyn Vocabulary>, VocabularyError> + Send + Sync + 'static,
    {
        Source::Binder(Arc::new(binder))
    }
}

impl From<&str> for Source {
    fn from(name: &str) -> Self {
        Source::Name(name.to_string())
    }
}

impl From<String> for Source {
    fn from(name: String) -> Self {
        Source::Name(name)
    }
}

impl From<SimpleVocabulary> for Source {
    fn from(vocabulary: SimpleVocabulary) -> Self {
        Source::Vocabulary(Arc::new(vocabulary))
    }
}

impl From<Arc<dyn Vocabulary>> for Source {
    fn from(vocabulary: Arc<dyn Vocabulary>) -> Self {
        Source::Vocabulary(vocabulary)
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Name(name) => f.debug_tuple("Name").field(name).finish(),
            Source::Vocabulary(vocabulary) => f.debug_tuple("Vocabulary").field(vocabulary).finish(),
            Source::Binder(_) => f.write_str("Binder"),
        }
    }
}

#[derive(Clone)]
enum ChoiceState {
    Inline(Arc<dyn Vocabulary>),
    Named(String),
    Binder(Arc<dyn ContextSourceBinder>),
    Bound {
        vocabulary: Arc<dyn Vocabulary>,
        name: Option<String>,
    },
}

#[derive(Clone)]
pub struct ChoiceField {
    state: ChoiceState,
    registry: Option<Arc<dyn VocabularyRegistry>>,
}

impl ChoiceField {
    /// Resolve the builder's `values`/`vocabulary`/`source` arguments.
    pub(crate) fn from_sources(
        values: Option<Vec<Value>>,
        vocabulary: Option<Source>,
        source: Option<Source>,
        registry: Option<Arc<dyn VocabularyRegistry>>,
    ) -> Result<Self> {
        let vocabulary = match (vocabulary, source) {
            (Some(Source::Binder(_)), _) => {
                return Err(SchemaError::config("vocabulary must be a name or a vocabulary"))
            }
            (Some(_), Some(_)) => {
                return Err(SchemaError::config("You cannot specify both source and vocabulary."))
            }
            (Some(vocabulary), None) => Some(vocabulary),
            (None, source) => source,
        };
        let state = match (values, vocabulary) {
            (None, None) => return Err(SchemaError::config("You must specify either values or vocabulary.")),
            (Some(_), Some(_)) => {
                return Err(SchemaError::config("You cannot specify both values and vocabulary."))
            }
            (Some(values), None) => ChoiceState::Inline(Arc::new(SimpleVocabulary::from_values(values)?)),
            (None, Some(Source::Vocabulary(vocabulary))) => ChoiceState::Inline(vocabulary),
            (None, Some(Source::Name(name))) => ChoiceState::Named(name),
            (None, Some(Source::Binder(binder))) => ChoiceState::Binder(binder),
        };
        Ok(Self { state, registry })
    }

    /// Whether the vocabulary is only known once the field is bound or the
    /// registry is populated; such fields skip default validation when built.
    pub(crate) fn is_deferred(&self) -> bool {
        matches!(self.state, ChoiceState::Named(_) | ChoiceState::Binder(_))
    }

    pub fn vocabulary_name(&self) -> Option<&str> {
        match &self.state {
            ChoiceState::Named(name) => Some(name),
            ChoiceState::Bound { name, .. } => name.as_deref(),
            _ => None,
        }
    }

    /// The vocabulary in hand, without consulting a registry
    pub fn vocabulary(&self) -> Option<Arc<dyn Vocabulary>> {
        match &self.state {
            ChoiceState::Inline(vocabulary) | ChoiceState::Bound { vocabulary, .. } => Some(vocabulary.clone()),
            _ => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.state, ChoiceState::Bound { .. })
    }

    fn registry(&self) -> Arc<dyn VocabularyRegistry> {
        self.registry.clone().unwrap_or_else(vocabulary::registry)
    }

    /// The vocabulary to validate against. Named vocabularies are looked up
    /// with no context; an unbound binder has nothing to offer.
    pub fn resolve(&self) -> Result<Arc<dyn Vocabulary>> {
        match &self.state {
            ChoiceState::Inline(vocabulary) | ChoiceState::Bound { vocabulary, .. } => Ok(vocabulary.clone()),
            ChoiceState::Named(name) => self.registry().get(None, name).map_err(|e| {
                debug!(vocabulary = %name, error = %e, "Named vocabulary lookup failed");
                SchemaError::VocabularyUnavailable(e.to_string())
            }),
            ChoiceState::Binder(_) => Err(SchemaError::VocabularyUnavailable(
                "context source binder is not bound".to_string(),
            )),
        }
    }

    pub(crate) fn bind(&self, context: &Value) -> Result<Self> {
        let state = match &self.state {
            ChoiceState::Binder(binder) => ChoiceState::Bound {
                vocabulary: binder.bind(context)?,
                name: None,
            },
            ChoiceState::Named(name) => {
                debug!(vocabulary = %name, "Resolving named vocabulary for bound choice");
                ChoiceState::Bound {
                    vocabulary: self.registry().get(Some(context), name)?,
                    name: Some(name.clone()),
                }
            }
            resolved => resolved.clone(),
        };
        Ok(Self {
            state,
            registry: self.registry.clone(),
        })
    }

    pub(crate) fn check(&self, field: &Field, value: &Value) -> Result<()> {
        if self.resolve()?.contains(value) {
            Ok(())
        } else {
            Err(field.error(ValidationErrorKind::ConstraintNotSatisfied, value).into())
        }
    }
}

impl fmt::Debug for ChoiceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &self.state {
            ChoiceState::Inline(_) => "inline",
            ChoiceState::Named(_) => "named",
            ChoiceState::Binder(_) => "binder",
            ChoiceState::Bound { .. } => "bound",
        };
        f.debug_struct("ChoiceField")
            .field("state", &state)
            .field("vocabulary_name", &self.vocabulary_name())
            .finish()
    }
}
