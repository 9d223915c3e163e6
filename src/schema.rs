//! Schema contracts
//!
//! A schema is an ordered set of named declarations (fields, methods, plain
//! attributes) plus cross-field invariants. Objects declare which schemas they
//! provide; `Object` fields check both that declaration and every declared
//! field.
//!
//! [`Interface`] is the shipped [`Schema`] implementation. Interfaces may extend
//! other interfaces, and declarations can be added after construction so a
//! schema can refer to itself (a linked-list node whose `next` is another node).

use std::fmt;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use indexmap::IndexMap;
use thiserror::Error;

use crate::error::Result;
use crate::field::Field;
use crate::value::Value;

/// Name of the universal schema every object provides
pub const ANY_SCHEMA: &str = "Interface";

/// A cross-field rule failed
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct Invalid {
    pub message: String,
    /// Collected errors when this is the aggregate raised by `validate_invariants`
    pub errors: Vec<Invalid>,
}

impl Invalid {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    pub fn aggregate(errors: Vec<Invalid>) -> Self {
        Self {
            message: format!("{} invariant(s) violated", errors.len()),
            errors,
        }
    }
}

/// What a schema declares under a name
#[derive(Debug, Clone)]
pub enum Declaration {
    Field(Field),
    /// Behaviour, never validated
    Method { doc: String },
    /// A plain attribute with no field semantics
    Attribute { doc: String },
}

impl Declaration {
    pub fn as_field(&self) -> Option<&Field> {
        match self {
            Declaration::Field(field) => Some(field),
            _ => None,
        }
    }
}

/// An interface-like contract
pub trait Schema: Send + Sync {
    fn name(&self) -> &str;

    /// All declared names including inherited ones, own names first
    fn names(&self) -> Vec<String>;

    /// The declaration for a name, searching bases when not declared here
    fn get(&self, name: &str) -> Option<Declaration>;

    /// Whether `value` provides this schema as a whole
    fn provided_by(&self, value: &Value) -> bool;

    /// Run every invariant against `value`, appending failures to `errors`.
    /// Returns an aggregate `Invalid` when `errors` is non-empty afterwards.
    fn validate_invariants(&self, value: &Value, errors: &mut Vec<Invalid>) -> std::result::Result<(), Invalid>;

    /// The universal contract that declares nothing
    fn is_universal(&self) -> bool {
        false
    }
}

/// An object that exposes named attributes and declares the schemas it provides
pub trait ObjectValue: Send + Sync {
    fn provides(&self, schema: &dyn Schema) -> bool;

    /// Current value of an attribute, `None` when the object has no such attribute
    fn attribute(&self, name: &str) -> Option<Value>;

    fn set_attribute(&self, name: &str, value: Value) -> Result<()>;
}

type InvariantFn = dyn Fn(&Value) -> std::result::Result<(), Invalid> + Send + Sync;

/// A named cross-field rule
#[derive(Clone)]
pub struct Invariant {
    name: String,
    check: Arc<InvariantFn>,
}

impl Invariant {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<(), Invalid> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check(&self, value: &Value) -> std::result::Result<(), Invalid> {
        (self.check)(value)
    }
}

impl fmt::Debug for Invariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Invariant").field("name", &self.name).finish()
    }
}

/// A named schema with optional base interfaces
pub struct Interface {
    name: String,
    doc: String,
    bases: Vec<Arc<Interface>>,
    declarations: RwLock<IndexMap<String, Declaration>>,
    invariants: RwLock<Vec<Invariant>>,
    universal: bool,
}

impl Interface {
    pub fn builder(name: impl Into<String>) -> InterfaceBuilder {
        InterfaceBuilder {
            name: name.into(),
            doc: String::new(),
            bases: Vec::new(),
            declarations: IndexMap::new(),
            invariants: Vec::new(),
        }
    }

    /// The universal schema: declares nothing, provided by every object
    pub fn any() -> Arc<Interface> {
        static ANY: OnceLock<Arc<Interface>> = OnceLock::new();
        ANY.get_or_init(|| {
            let mut any = Interface::builder(ANY_SCHEMA).into_interface();
            any.universal = true;
            Arc::new(any)
        })
        .clone()
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    pub fn bases(&self) -> &[Arc<Interface>] {
        &self.bases
    }

    /// Whether this interface is `schema` itself or extends it, directly or
    /// not. Interfaces are compared by identity; names may repeat.
    pub fn is_or_extends(&self, schema: &dyn Schema) -> bool {
        let this = self as *const Interface as *const ();
        let other = schema as *const dyn Schema as *const ();
        schema.is_universal() || std::ptr::eq(this, other) || self.bases.iter().any(|b| b.is_or_extends(schema))
    }

    /// Names declared directly on this interface
    pub fn direct_names(&self) -> Vec<String> {
        self.declarations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Add or replace a declaration. Fields take the declared name and record
    /// this interface as their owner.
    pub fn declare(&self, name: impl Into<String>, declaration: Declaration) {
        let name = name.into();
        let declaration = match declaration {
            Declaration::Field(field) => Declaration::Field(field.declared_as(&name, &self.name)),
            other => other,
        };
        self.declarations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, declaration);
    }

    pub fn declare_field(&self, name: impl Into<String>, field: Field) {
        self.declare(name, Declaration::Field(field));
    }

    pub fn add_invariant(&self, invariant: Invariant) {
        self.invariants
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(invariant);
    }

    fn collect_invariant_errors(&self, value: &Value, errors: &mut Vec<Invalid>) {
        let invariants = self
            .invariants
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for invariant in &invariants {
            if let Err(invalid) = invariant.check(value) {
                errors.push(invalid);
            }
        }
        for base in &self.bases {
            base.collect_invariant_errors(value, errors);
        }
    }
}

impl Schema for Interface {
    fn name(&self) -> &str {
        &self.name
    }

    fn names(&self) -> Vec<String> {
        let mut names = self.direct_names();
        for base in &self.bases {
            for name in base.names() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    fn get(&self, name: &str) -> Option<Declaration> {
        let own = self
            .declarations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned();
        own.or_else(|| self.bases.iter().find_map(|b| b.get(name)))
    }

    fn provided_by(&self, value: &Value) -> bool {
        match value {
            Value::Object(object) => object.provides(self),
            _ => false,
        }
    }

    fn validate_invariants(&self, value: &Value, errors: &mut Vec<Invalid>) -> std::result::Result<(), Invalid> {
        self.collect_invariant_errors(value, errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Invalid::aggregate(errors.clone()))
        }
    }

    fn is_universal(&self) -> bool {
        self.universal
    }
}

// Declarations may refer back to this interface, so only names are printed.
impl fmt::Debug for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interface")
            .field("name", &self.name)
            .field("bases", &self.bases.iter().map(|b| b.name.as_str()).collect::<Vec<_>>())
            .field("names", &self.direct_names())
            .finish()
    }
}

/// Builder for [`Interface`]
pub struct InterfaceBuilder {
    name: String,
    doc: String,
    bases: Vec<Arc<Interface>>,
    declarations: IndexMap<String, Declaration>,
    invariants: Vec<Invariant>,
}

impl InterfaceBuilder {
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = doc.into();
        self
    }

    pub fn extends(mut self, base: Arc<Interface>) -> Self {
        self.bases.push(base);
        self
    }

    pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
        let name = name.into();
        let field = field.declared_as(&name, &self.name);
        self.declarations.insert(name, Declaration::Field(field));
        self
    }

    pub fn method(mut self, name: impl Into<String>, doc: impl Into<String>) -> Self {
        self.declarations
            .insert(name.into(), Declaration::Method { doc: doc.into() });
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, doc: impl Into<String>) -> Self {
        self.declarations
            .insert(name.into(), Declaration::Attribute { doc: doc.into() });
        self
    }

    pub fn invariant<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<(), Invalid> + Send + Sync + 'static,
    {
        self.invariants.push(Invariant::new(name, check));
        self
    }

    pub fn build(self) -> Arc<Interface> {
        Arc::new(self.into_interface())
    }

    fn into_interface(self) -> Interface {
        Interface {
            name: self.name,
            doc: self.doc,
            bases: self.bases,
            declarations: RwLock::new(self.declarations),
            invariants: RwLock::new(self.invariants),
            universal: false,
        }
    }
}
