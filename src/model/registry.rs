use super::ModelHandle;
use crate::core::{ModelSchema, Result};
use lazy_static::lazy_static;
use log::warn;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

lazy_static! {
    static ref GLOBAL_REGISTRY: RwLock<ModelRegistry> = RwLock::new(ModelRegistry::new());
}

/// Looks up model handles by `(app_label, model_name)`.
pub trait ModelResolver {
    fn resolve(&self, app_label: &str, model_name: &str) -> Option<ModelHandle>;
}

impl<F> ModelResolver for F
where
    F: Fn(&str, &str) -> Option<ModelHandle>,
{
    fn resolve(&self, app_label: &str, model_name: &str) -> Option<ModelHandle> {
        self(app_label, model_name)
    }
}

/// Registry of model schemas.
///
/// Immutable once built: `with_model` returns a new registry and leaves the
/// old one untouched, so clones are cheap and need no locking.
#[derive(Clone, Default)]
pub struct ModelRegistry {
    models: Arc<HashMap<(String, String), ModelHandle>>,
}

fn registry_key(app_label: &str, model_name: &str) -> (String, String) {
    (app_label.to_string(), model_name.to_lowercase())
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared process-wide registry.
    pub fn global() -> &'static RwLock<ModelRegistry> {
        &GLOBAL_REGISTRY
    }

    /// Register `schema` in the global registry.
    pub fn register_global(schema: ModelSchema) -> Result<ModelHandle> {
        let mut registry = GLOBAL_REGISTRY.write()?;
        Ok(registry.register(schema))
    }

    /// Cheap copy of the global registry, usable as a resolver.
    pub fn global_snapshot() -> Result<ModelRegistry> {
        Ok(GLOBAL_REGISTRY.read()?.clone())
    }

    /// Add a model, returning a NEW registry.
    pub fn with_model(mut self, schema: ModelSchema) -> Self {
        self.register(schema);
        self
    }

    /// Add a model in place and return its handle. A model registered twice
    /// under the same label replaces the earlier one.
    pub fn register(&mut self, schema: ModelSchema) -> ModelHandle {
        let key = registry_key(schema.app_label(), schema.name());
        let handle = ModelHandle::new(schema);

        let mut models = (*self.models).clone();
        if models.insert(key, handle.clone()).is_some() {
            warn!("model '{}' registered twice; keeping the latest", handle.label());
        }
        self.models = Arc::new(models);
        handle
    }

    pub fn get(&self, app_label: &str, model_name: &str) -> Option<&ModelHandle> {
        self.models.get(&registry_key(app_label, model_name))
    }

    pub fn contains(&self, app_label: &str, model_name: &str) -> bool {
        self.get(app_label, model_name).is_some()
    }

    /// Registered labels, sorted.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.models.values().map(ModelHandle::label).collect();
        labels.sort();
        labels
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

impl ModelResolver for ModelRegistry {
    fn resolve(&self, app_label: &str, model_name: &str) -> Option<ModelHandle> {
        self.get(app_label, model_name).cloned()
    }
}
