//! Name-to-value stores backing template scopes
//!
//! There are exactly two kinds of store:
//!
//! - [`FlatStore`] owns a single mapping.
//! - [`ScopeView`] layers an `overlay` over a `base`. Reads try the overlay
//!   first and fall back to the base; writes always go to the overlay, so the
//!   base is never mutated through a view.
//!
//! Both are reached through the cheaply clonable [`Store`] handle. Cloning a
//! handle shares the underlying storage, which is how one Public or Shared
//! store is visible from every scope of a render. A view holds strong
//! handles to its constituents and therefore never outlives them.
//!
//! Stores are single-threaded (`Rc`/`RefCell`), so a render tree cannot be
//! moved across threads.

pub mod identifier;

pub use identifier::{check_identifiers, is_valid_identifier};

use crate::model::Value;
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::RefCell;
use std::rc::Rc;

/// A store directly backed by one mapping
#[derive(Debug, Clone, Default)]
pub struct FlatStore {
    entries: FxHashMap<String, Value>,
}

impl FlatStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a value
    pub fn get_value(&self, name: &str) -> Option<Value> {
        self.entries.get(name).cloned()
    }

    /// Insert or overwrite a value
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(name.into(), value.into());
    }

    /// All names in this store, in no particular order
    pub fn identifiers(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for FlatStore {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Read-through composition of two stores
#[derive(Debug, Clone)]
pub struct ScopeView {
    base: Store,
    overlay: Store,
}

impl ScopeView {
    /// Compose `overlay` over `base`
    pub fn new(base: Store, overlay: Store) -> Self {
        Self { base, overlay }
    }

    /// The store reads fall back to
    pub fn base(&self) -> &Store {
        &self.base
    }

    /// The store reads prefer and writes land in
    pub fn overlay(&self) -> &Store {
        &self.overlay
    }

    /// Look up a value, preferring the overlay
    pub fn get_value(&self, name: &str) -> Option<Value> {
        self.overlay
            .get_value(name)
            .or_else(|| self.base.get_value(name))
    }

    /// Write into the overlay
    pub fn set_value(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.overlay.set_value(name, value);
    }

    /// Base identifiers followed by overlay identifiers
    ///
    /// A name present on both sides is listed twice.
    pub fn identifiers(&self) -> Vec<String> {
        let mut identifiers = self.base.identifiers();
        identifiers.extend(self.overlay.identifiers());
        identifiers
    }
}

/// Shared handle to a store
#[derive(Debug, Clone)]
pub enum Store {
    /// A flat mapping
    Flat(Rc<RefCell<FlatStore>>),
    /// A layered view over two stores
    View(Rc<ScopeView>),
}

impl Default for Store {
    fn default() -> Self {
        Self::flat()
    }
}

impl Store {
    /// Create a fresh, empty flat store
    pub fn flat() -> Self {
        Self::from(FlatStore::new())
    }

    /// Layer a fresh, empty overlay over `base`
    pub fn layered(base: &Store) -> Self {
        Self::View(Rc::new(ScopeView::new(base.clone(), Self::flat())))
    }

    /// Look up a value; `None` means the name is not resolvable here
    pub fn get_value(&self, name: &str) -> Option<Value> {
        match self {
            Self::Flat(flat) => flat.borrow().get_value(name),
            Self::View(view) => view.get_value(name),
        }
    }

    /// Insert or overwrite a value
    pub fn set_value(&self, name: impl Into<String>, value: impl Into<Value>) {
        match self {
            Self::Flat(flat) => flat.borrow_mut().set_value(name, value),
            Self::View(view) => view.set_value(name, value),
        }
    }

    /// Check if a name is resolvable through this store
    pub fn contains(&self, name: &str) -> bool {
        self.get_value(name).is_some()
    }

    /// Every resolvable name, duplicates included for layered stores
    pub fn identifiers(&self) -> Vec<String> {
        match self {
            Self::Flat(flat) => flat.borrow().identifiers(),
            Self::View(view) => view.identifiers(),
        }
    }

    /// Every resolvable name exactly once, in first-seen order
    pub fn unique_identifiers(&self) -> Vec<String> {
        let mut seen = FxHashSet::default();
        self.identifiers()
            .into_iter()
            .filter(|name| seen.insert(name.clone()))
            .collect()
    }

    /// Number of views stacked along the base chain
    pub fn depth(&self) -> usize {
        match self {
            Self::Flat(_) => 0,
            Self::View(view) => 1 + view.base.depth(),
        }
    }

    /// Check whether both handles point at the same storage
    pub fn ptr_eq(&self, other: &Store) -> bool {
        match (self, other) {
            (Self::Flat(a), Self::Flat(b)) => Rc::ptr_eq(a, b),
            (Self::View(a), Self::View(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<FlatStore> for Store {
    fn from(store: FlatStore) -> Self {
        Self::Flat(Rc::new(RefCell::new(store)))
    }
}

impl From<ScopeView> for Store {
    fn from(view: ScopeView) -> Self {
        Self::View(Rc::new(view))
    }
}
