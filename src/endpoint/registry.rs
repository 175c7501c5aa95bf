//! Endpoint lookup.
//!
//! # Design Decisions
//! - Immutable after construction (shared without locks)
//! - O(1) lookup by path template via HashMap
//! - Explicit `None` for unknown paths rather than a silent default

use std::collections::HashMap;
use std::sync::Arc;

use crate::endpoint::descriptor::Endpoint;

/// Source of endpoint descriptors, keyed by path template.
pub trait EndpointRegistry: Send + Sync {
    /// All registered path templates, in registration order.
    fn paths(&self) -> Vec<&'static str>;

    /// Descriptor for `path`, if registered.
    fn endpoint(&self, path: &str) -> Option<Arc<Endpoint>>;
}

/// Registry backed by a fixed table.
#[derive(Debug, Default)]
pub struct StaticRegistry {
    order: Vec<&'static str>,
    endpoints: HashMap<&'static str, Arc<Endpoint>>,
}

impl StaticRegistry {
    /// Build a registry; a later descriptor for the same path replaces
    /// the earlier one.
    pub fn new(endpoints: impl IntoIterator<Item = Endpoint>) -> Self {
        let mut registry = Self::default();
        for endpoint in endpoints {
            let path = endpoint.path;
            if registry.endpoints.insert(path, Arc::new(endpoint)).is_some() {
                tracing::warn!(path = %path, "Duplicate endpoint registration, keeping the last one");
            } else {
                registry.order.push(path);
            }
        }
        registry
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl EndpointRegistry for StaticRegistry {
    fn paths(&self) -> Vec<&'static str> {
        self.order.clone()
    }

    fn endpoint(&self, path: &str) -> Option<Arc<Endpoint>> {
        self.endpoints.get(path).cloned()
    }
}
