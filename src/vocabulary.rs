//! Vocabularies for `Choice` fields
//!
//! A vocabulary is anything that can answer "is this value allowed?".
//! Choice fields get theirs inline, by name through a [`VocabularyRegistry`],
//! or from a [`ContextSourceBinder`] invoked with the owning object at bind
//! time.
//!
//! A process-wide registry is consulted by Choice fields that were not given
//! one explicitly; it starts empty and can be replaced with [`set_registry`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::config::FieldsConfig;
use crate::value::Value;

/// Vocabulary and registry errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VocabularyError {
    #[error("unknown vocabulary: '{name}'{}", suggestion_suffix(.suggestion))]
    NotRegistered {
        name: String,
        suggestion: Option<String>,
    },

    #[error("term tokens must be unique: '{0}'")]
    DuplicateToken(String),

    #[error("invalid vocabulary: {0}")]
    Invalid(String),
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    suggestion
        .as_ref()
        .map(|s| format!(" (did you mean '{}'?)", s))
        .unwrap_or_default()
}

/// A set of legal values
pub trait Vocabulary: Send + Sync + fmt::Debug {
    fn contains(&self, value: &Value) -> bool;

    /// Number of terms, when the vocabulary is finite and known
    fn len(&self) -> Option<usize> {
        None
    }
}

/// One value of a [`SimpleVocabulary`]
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleTerm {
    pub value: Value,
    pub token: String,
    pub title: Option<String>,
}

impl SimpleTerm {
    /// A term whose token is derived from the value
    pub fn new(value: impl Into<Value>) -> Self {
        let value = value.into();
        Self {
            token: value.token(),
            value,
            title: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// A finite, ordered vocabulary of terms with unique tokens
#[derive(Debug, Clone, Default)]
pub struct SimpleVocabulary {
    terms: Vec<SimpleTerm>,
    by_token: HashMap<String, usize>,
}

impl SimpleVocabulary {
    pub fn from_terms(terms: Vec<SimpleTerm>) -> Result<Self, VocabularyError> {
        let mut by_token = HashMap::with_capacity(terms.len());
        for (i, term) in terms.iter().enumerate() {
            if by_token.insert(term.token.clone(), i).is_some() {
                return Err(VocabularyError::DuplicateToken(term.token.clone()));
            }
        }
        Ok(Self { terms, by_token })
    }

    pub fn from_values<I, V>(values: I) -> Result<Self, VocabularyError>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::from_terms(values.into_iter().map(SimpleTerm::new).collect())
    }

    pub fn terms(&self) -> &[SimpleTerm] {
        &self.terms
    }

    pub fn get_term(&self, value: &Value) -> Option<&SimpleTerm> {
        self.terms.iter().find(|t| &t.value == value)
    }

    pub fn get_term_by_token(&self, token: &str) -> Option<&SimpleTerm> {
        self.by_token.get(token).map(|&i| &self.terms[i])
    }
}

impl Vocabulary for SimpleVocabulary {
    fn contains(&self, value: &Value) -> bool {
        self.get_term(value).is_some()
    }

    fn len(&self) -> Option<usize> {
        Some(self.terms.len())
    }
}

/// Produces a vocabulary for a particular owning object
pub trait ContextSourceBinder: Send + Sync {
    fn bind(&self, context: &Value) -> Result<Arc<dyn Vocabulary>, VocabularyError>;
}

impl<F> ContextSourceBinder for F
where
    F: Fn(&Value) -> Result<Arc<dyn Vocabulary>, VocabularyError> + Send + Sync,
{
    fn bind(&self, context: &Value) -> Result<Arc<dyn Vocabulary>, VocabularyError> {
        self(context)
    }
}

/// Looks vocabularies up by name
pub trait VocabularyRegistry: Send + Sync {
    /// `context` is the owning object when resolving at bind time, `None`
    /// when a Choice validates without having been bound
    fn get(&self, context: Option<&Value>, name: &str) -> Result<Arc<dyn Vocabulary>, VocabularyError>;
}

type Factory = Arc<dyn Fn(Option<&Value>) -> Result<Arc<dyn Vocabulary>, VocabularyError> + Send + Sync>;

/// The default registry: vocabulary factories keyed by name
pub struct Registry {
    factories: RwLock<IndexMap<String, Factory>>,
    suggest_threshold: i64,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            factories: RwLock::new(IndexMap::new()),
            suggest_threshold: 50,
        }
    }

    /// Minimum fuzzy score for a "did you mean" suggestion on a miss
    pub fn with_suggest_threshold(mut self, threshold: i64) -> Self {
        self.suggest_threshold = threshold;
        self
    }

    /// Build a registry holding the simple vocabularies declared in configuration
    pub fn from_config(config: &FieldsConfig) -> Result<Self, VocabularyError> {
        let registry = Self::new().with_suggest_threshold(config.registry.suggest_threshold);
        for (name, values) in &config.vocabularies.entries {
            let vocabulary = SimpleVocabulary::from_values(values.iter().map(Value::from))?;
            debug!(vocabulary = %name, terms = values.len(), "Registering configured vocabulary");
            registry.register_vocabulary(name.clone(), Arc::new(vocabulary));
        }
        Ok(registry)
    }

    /// Register a factory invoked with the lookup context on every `get`
    pub fn register<F>(&self, name: impl Into<String>, factory: F)
    where
        F: Fn(Option<&Value>) -> Result<Arc<dyn Vocabulary>, VocabularyError> + Send + Sync + 'static,
    {
        self.factories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), Arc::new(factory));
    }

    /// Register a fixed vocabulary
    pub fn register_vocabulary(&self, name: impl Into<String>, vocabulary: Arc<dyn Vocabulary>) {
        self.register(name, move |_| Ok(vocabulary.clone()));
    }

    pub fn names(&self) -> Vec<String> {
        self.factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    fn suggest(&self, name: &str) -> Option<String> {
        let matcher = SkimMatcherV2::default();
        self.names()
            .into_iter()
            .filter_map(|candidate| {
                matcher
                    .fuzzy_match(&candidate, name)
                    .filter(|score| *score >= self.suggest_threshold)
                    .map(|score| (score, candidate))
            })
            .max_by_key(|(score, _)| *score)
            .map(|(_, candidate)| candidate)
    }
}

impl VocabularyRegistry for Registry {
    fn get(&self, context: Option<&Value>, name: &str) -> Result<Arc<dyn Vocabulary>, VocabularyError> {
        let factory = self
            .factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned();
        match factory {
            Some(factory) => factory(context),
            None => Err(VocabularyError::NotRegistered {
                name: name.to_string(),
                suggestion: self.suggest(name),
            }),
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("names", &self.names())
            .field("suggest_threshold", &self.suggest_threshold)
            .finish()
    }
}

fn global() -> &'static RwLock<Arc<dyn VocabularyRegistry>> {
    static REGISTRY: OnceLock<RwLock<Arc<dyn VocabularyRegistry>>> = OnceLock::new();
    REGISTRY.get_or_init(|| RwLock::new(Arc::new(Registry::new())))
}

/// The process-wide registry
pub fn registry() -> Arc<dyn VocabularyRegistry> {
    global().read().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Replace the process-wide registry, returning the previous one
pub fn set_registry(registry: Arc<dyn VocabularyRegistry>) -> Arc<dyn VocabularyRegistry> {
    let mut slot = global().write().unwrap_or_else(PoisonError::into_inner);
    std::mem::replace(&mut *slot, registry)
}
