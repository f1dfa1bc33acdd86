//! Blueprints: named default-attribute producers bound to one model type.

use crate::core::{Attributes, FactoryError, Result};
use crate::factory::Factory;
use crate::model::{DEFAULT_SEPARATOR, ModelHandle, ModelIdent, ModelResolver};
use log::debug;
use std::fmt;
use std::sync::Arc;

/// Prefix added to every blueprint's documentation.
pub const BLUEPRINT_DOC_PREFIX: &str = "Blueprint: ";

/// Producer of a blueprint's default attributes. Receives the owning factory
/// so it can start from another blueprint's defaults.
pub type DefaultsFn = Arc<dyn Fn(&Factory) -> Result<Attributes> + Send + Sync>;

#[derive(Clone)]
pub struct Blueprint {
    name: String,
    model: ModelHandle,
    doc: String,
    defaults: DefaultsFn,
}

impl Blueprint {
    /// Declare a blueprint for `model` (`"app_label.ModelName"`).
    ///
    /// The model is resolved here, once; a malformed identifier or an
    /// unknown model means the blueprint never exists.
    ///
    /// # Examples
    ///
    /// ```
    /// use model_factories::{attrs, Blueprint, Column, DataType, ModelRegistry, ModelSchema};
    ///
    /// let registry = ModelRegistry::new().with_model(ModelSchema::new(
    ///     "auth",
    ///     "User",
    ///     vec![Column::new("first_name", DataType::Text)],
    /// ));
    ///
    /// let basic_user = Blueprint::new("basic_user", "auth.User", &registry, "Create a minimal User.", |_| {
    ///     Ok(attrs! { "first_name" => "John" })
    /// })
    /// .unwrap();
    /// assert_eq!(basic_user.doc(), "Blueprint: Create a minimal User.");
    ///
    /// assert!(Blueprint::new("bad", "noapp", &registry, "", |_| Ok(attrs! {})).is_err());
    /// ```
    pub fn new<F>(
        name: impl Into<String>,
        model: &str,
        resolver: &dyn ModelResolver,
        doc: &str,
        defaults: F,
    ) -> Result<Self>
    where
        F: Fn(&Factory) -> Result<Attributes> + Send + Sync + 'static,
    {
        Self::with_separator(name, model, DEFAULT_SEPARATOR, resolver, doc, defaults)
    }

    pub fn with_separator<F>(
        name: impl Into<String>,
        model: &str,
        separator: char,
        resolver: &dyn ModelResolver,
        doc: &str,
        defaults: F,
    ) -> Result<Self>
    where
        F: Fn(&Factory) -> Result<Attributes> + Send + Sync + 'static,
    {
        let name = name.into();
        let model = resolve_model(model, separator, resolver)?;
        debug!("blueprint '{}' bound to {}", name, model.label());

        Ok(Self {
            name,
            model,
            doc: format!("{}{}", BLUEPRINT_DOC_PREFIX, doc),
            defaults: Arc::new(defaults),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// Run the producer. Every call returns a fresh mapping.
    pub fn defaults(&self, factory: &Factory) -> Result<Attributes> {
        (self.defaults)(factory)
    }
}

impl fmt::Debug for Blueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blueprint")
            .field("name", &self.name)
            .field("model", &self.model)
            .field("doc", &self.doc)
            .finish_non_exhaustive()
    }
}

/// Parse `model` and look it up through `resolver`.
pub fn resolve_model(model: &str, separator: char, resolver: &dyn ModelResolver) -> Result<ModelHandle> {
    let ident = ModelIdent::parse_with(model, separator)?;
    resolver
        .resolve(&ident.app_label, &ident.model_name)
        .ok_or(FactoryError::ModelResolution {
            app_label: ident.app_label,
            model_name: ident.model_name,
        })
}
