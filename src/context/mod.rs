//! Execution contexts and the user data they are built from
//!
//! A render starts from a [`Context`] (or any [`Store`]) supplied by the
//! caller. [`ExecutionContext::new`] wraps it into a root context, and every
//! nested construct (loop body, block, include, macro call) derives a child
//! with [`ExecutionContext::child`].

pub mod config;
pub mod execution;

pub use config::ScopeConfig;
pub use execution::{ExecutionContext, META_NAMESPACE};

use crate::error::{Error, ErrorCause, Result};
use crate::model::Value;
use crate::store::{FlatStore, Store};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

/// Constants, variables, instances or functions provided to a template
///
/// ```text
/// {{ myconstant }}
/// {{ myfunc("test", 42) }}
/// {{ user.name }}
/// {{ stencil.version }}
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context(IndexMap<String, Value>);

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from any value serializing to a map
    pub fn from_serialize<T: Serialize + ?Sized>(data: &T) -> Result<Self> {
        let json = serde_json::to_value(data)
            .map_err(|e| Error::validation(ErrorCause::Other(e.into())))?;
        match Value::from(json) {
            Value::Map(entries) => Ok(Self(Arc::unwrap_or_clone(entries))),
            other => Err(Error::validation(ErrorCause::NotAMap(other.type_name()))),
        }
    }

    /// Insert or overwrite an entry
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Look up an entry
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Merge entries from `other`, overwriting on conflict
    pub fn update(&mut self, other: Context) -> &mut Self {
        self.0.extend(other.0);
        self
    }

    /// Entry names in insertion order
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the context has no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Move the entries into a flat store
    pub fn into_store(self) -> Store {
        Store::from(self.0.into_iter().collect::<FlatStore>())
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Context {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
