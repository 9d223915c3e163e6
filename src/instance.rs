//! Plain attribute-bag objects
//!
//! [`Instance`] is the simplest [`ObjectValue`]: a list of provided
//! interfaces and an ordered attribute map behind a lock, so attributes can
//! be assigned through a shared handle (including references back to the
//! instance itself).

use std::sync::{Arc, PoisonError, RwLock};

use indexmap::IndexMap;

use crate::error::Result;
use crate::schema::{Interface, ObjectValue, Schema};
use crate::value::Value;

pub struct Instance {
    interfaces: Vec<Arc<Interface>>,
    attributes: RwLock<IndexMap<String, Value>>,
}

impl Instance {
    pub fn new(interfaces: Vec<Arc<Interface>>) -> Self {
        Self {
            interfaces,
            attributes: RwLock::new(IndexMap::new()),
        }
    }

    /// Set an attribute while building the instance
    pub fn with(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), value.into());
        self
    }

    pub fn interfaces(&self) -> &[Arc<Interface>] {
        &self.interfaces
    }

    pub fn remove(&self, name: &str) -> Option<Value> {
        self.attributes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .shift_remove(name)
    }

    pub fn into_value(self) -> Value {
        Value::object(Arc::new(self))
    }
}

impl ObjectValue for Instance {
    fn provides(&self, schema: &dyn Schema) -> bool {
        schema.is_universal() || self.interfaces.iter().any(|i| i.is_or_extends(schema))
    }

    fn attribute(&self, name: &str) -> Option<Value> {
        self.attributes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn set_attribute(&self, name: &str, value: Value) -> Result<()> {
        self.attributes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), value);
        Ok(())
    }
}
