//! Typed extension map for host-provided runtime objects.
//!
//! `EvalExtensions` lets a host hand objects that are not graph values (an
//! output console, a library of callable graphs, engine handles) to node
//! bodies. Node bodies reach them through [`EvalContext::extensions`].
//!
//! [`EvalContext::extensions`]: crate::context::EvalContext::extensions
//!
//! # Example
//!
//! ```ignore
//! let mut ext = EvalExtensions::new();
//! ext.set(extension_keys::GRAPH_LIBRARY, Arc::new(library));
//!
//! // In a node body:
//! let library = ctx.extensions().get::<Arc<GraphLibrary>>(extension_keys::GRAPH_LIBRARY);
//! ```

use std::any::Any;
use std::collections::HashMap;

/// Typed extension map keyed by name
///
/// Holds arbitrary `Send + Sync` values via `Box<dyn Any>`; lookups with the
/// wrong type behave like missing keys.
#[derive(Default)]
pub struct EvalExtensions {
    inner: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl EvalExtensions {
    /// Create an empty extension map.
    pub fn new() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }

    /// Insert a typed value under the given key, replacing any previous one.
    pub fn set<T: Send + Sync + 'static>(&mut self, key: &str, value: T) {
        self.inner.insert(key.to_string(), Box::new(value));
    }

    /// Get a reference to a typed value by key.
    pub fn get<T: Send + Sync + 'static>(&self, key: &str) -> Option<&T> {
        self.inner.get(key).and_then(|v| v.downcast_ref())
    }

    pub fn has(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }
}

/// Well-known extension keys for standard host objects.
pub mod extension_keys {
    /// Key for `Arc<GraphLibrary>`, the graphs callable as sub-graphs.
    pub const GRAPH_LIBRARY: &str = "graph_library";
    /// Key for the console that `print` nodes write to.
    pub const CONSOLE: &str = "console";
}
