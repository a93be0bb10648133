use crate::Model;

use nexus_core::stmt::Value;

use indexmap::IndexMap;
use std::{any::Any, collections::HashMap, fmt, sync::Arc};

pub(crate) type Shared = Arc<dyn Any + Send + Sync>;

/// Mapping state embedded in every record.
///
/// Tracks whether the record has been persisted and holds the results of
/// resolved relationships, keyed by relationship name.
#[derive(Clone)]
pub struct Base {
    fresh: bool,

    /// Resolved has-one relationships. `None` when no related record matched.
    ones: HashMap<String, Option<Shared>>,

    /// Resolved has-many relationships, each an `IndexMap<Value, Arc<T>>`
    /// keyed by the related primary key.
    manys: HashMap<String, Shared>,

    /// Values produced by custom relationship handlers
    customs: HashMap<String, Value>,
}

impl Base {
    /// `true` until the record is first persisted, and again after it is
    /// deleted.
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    pub(crate) fn set_fresh(&mut self, fresh: bool) {
        self.fresh = fresh;
    }

    /// Returns `true` if the relationship `name` has been resolved.
    pub fn is_loaded(&self, name: &str) -> bool {
        self.ones.contains_key(name)
            || self.manys.contains_key(name)
            || self.customs.contains_key(name)
    }

    /// The resolved has-one record. `None` if the relationship is not loaded
    /// or is not a has-one of `T`; `Some(None)` if no related record matched.
    pub fn one<T: Model>(&self, name: &str) -> Option<Option<Arc<T>>> {
        match self.ones.get(name)? {
            Some(related) => related.clone().downcast::<T>().ok().map(Some),
            None => Some(None),
        }
    }

    pub fn many<T: Model>(&self, name: &str) -> Option<&IndexMap<Value, Arc<T>>> {
        self.manys.get(name)?.downcast_ref()
    }

    pub fn custom(&self, name: &str) -> Option<&Value> {
        self.customs.get(name)
    }

    pub(crate) fn bind_one(&mut self, name: &str, related: Option<Shared>) {
        self.ones.insert(name.to_string(), related);
    }

    pub(crate) fn bind_many(&mut self, name: &str, related: Shared) {
        self.manys.insert(name.to_string(), related);
    }

    pub(crate) fn bind_custom(&mut self, name: &str, value: Value) {
        self.customs.insert(name.to_string(), value);
    }
}

impl Default for Base {
    fn default() -> Base {
        Base {
            fresh: true,
            ones: HashMap::new(),
            manys: HashMap::new(),
            customs: HashMap::new(),
        }
    }
}

impl fmt::Debug for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Base")
            .field("fresh", &self.fresh)
            .field("ones", &self.ones.keys().collect::<Vec<_>>())
            .field("manys", &self.manys.keys().collect::<Vec<_>>())
            .field("customs", &self.customs)
            .finish()
    }
}
