//! Factory definitions and their derived `build_*` / `create_*` operations.

use crate::blueprint::Blueprint;
use crate::config::FactoryConfig;
use crate::core::{Attributes, FactoryError, Result};
use crate::interpolate::interpolate;
use crate::model::{ModelInstance, ModelResolver};
use crate::storage::{InMemoryStore, ModelStore};
use log::warn;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{Level, event, info_span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Construct without saving.
    Build,
    /// Construct and save.
    Create,
}

impl OperationKind {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Build => "build_",
            Self::Create => "create_",
        }
    }

    pub fn persists(self) -> bool {
        matches!(self, Self::Create)
    }
}

/// An operation synthesized from a blueprint when its factory is built.
#[derive(Debug, Clone)]
pub struct DerivedOperation {
    name: String,
    blueprint: String,
    kind: OperationKind,
    doc: String,
}

impl DerivedOperation {
    fn derive(blueprint: &Blueprint, kind: OperationKind) -> Self {
        let doc = match kind {
            OperationKind::Build => format!(
                "Create but do not save an instance of the '{}' model based on the '{}' blueprint.",
                blueprint.model().name(),
                blueprint.name()
            ),
            OperationKind::Create => format!(
                "Create and save an instance of the '{}' model based on the '{}' blueprint.",
                blueprint.model().name(),
                blueprint.name()
            ),
        };
        Self {
            name: format!("{}{}", kind.prefix(), blueprint.name()),
            blueprint: blueprint.name().to_string(),
            kind,
            doc,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn blueprint(&self) -> &str {
        &self.blueprint
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }
}

/// Collects blueprints for a factory. Each blueprint's model is resolved as
/// soon as it is declared.
pub struct FactoryBuilder<'a> {
    name: String,
    resolver: &'a dyn ModelResolver,
    config: FactoryConfig,
    store: Option<Arc<dyn ModelStore>>,
    blueprints: Vec<Blueprint>,
}

impl<'a> FactoryBuilder<'a> {
    /// Replace the configuration. Applies to blueprints declared after this call.
    pub fn config(mut self, config: FactoryConfig) -> Self {
        self.config = config;
        self
    }

    /// Store used by `create_*` operations. Defaults to a fresh [`InMemoryStore`].
    pub fn store(mut self, store: Arc<dyn ModelStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Declare a blueprint.
    pub fn blueprint<F>(self, name: &str, model: &str, doc: &str, defaults: F) -> Result<Self>
    where
        F: Fn(&Factory) -> Result<Attributes> + Send + Sync + 'static,
    {
        let blueprint = Blueprint::with_separator(
            name,
            model,
            self.config.model_separator,
            self.resolver,
            doc,
            defaults,
        )?;
        Ok(self.add(blueprint))
    }

    /// Add an already declared blueprint. A blueprint with the same name
    /// replaces the earlier one.
    pub fn add(mut self, blueprint: Blueprint) -> Self {
        match self
            .blueprints
            .iter()
            .position(|existing| existing.name() == blueprint.name())
        {
            Some(idx) => {
                warn!(
                    "factory '{}': blueprint '{}' declared twice; the later declaration wins",
                    self.name,
                    blueprint.name()
                );
                self.blueprints[idx] = blueprint;
            }
            None => self.blueprints.push(blueprint),
        }
        self
    }

    /// Finish the definition, synthesizing two operations per blueprint.
    pub fn build(self) -> Factory {
        let mut operations = BTreeMap::new();
        for blueprint in &self.blueprints {
            for kind in [OperationKind::Build, OperationKind::Create] {
                let operation = DerivedOperation::derive(blueprint, kind);
                operations.insert(operation.name.clone(), operation);
            }
        }

        event!(
            Level::DEBUG,
            factory = %self.name,
            blueprints = self.blueprints.len(),
            operations = operations.len(),
            "factory defined"
        );

        Factory {
            name: self.name,
            config: self.config,
            store: self
                .store
                .unwrap_or_else(|| Arc::new(InMemoryStore::new()) as Arc<dyn ModelStore>),
            blueprints: self.blueprints,
            operations,
        }
    }
}

/// A finished factory definition.
///
/// # Examples
///
/// ```
/// use model_factories::{attrs, Column, DataType, Factory, ModelRegistry, ModelSchema};
///
/// # fn main() -> model_factories::Result<()> {
/// let registry = ModelRegistry::new().with_model(ModelSchema::new(
///     "auth",
///     "User",
///     vec![
///         Column::new("first_name", DataType::Text),
///         Column::new("last_name", DataType::Text),
///     ],
/// ));
///
/// let factory = Factory::define("UserFactory", &registry)
///     .blueprint("basic_user", "auth.User", "Create a minimal User.", |_| {
///         Ok(attrs! { "first_name" => "John", "last_name" => "Doe" })
///     })?
///     .build();
///
/// let user = factory.call("build_basic_user", attrs! { "first_name" => "Jane" })?;
/// assert_eq!(user.text("first_name"), Some("Jane"));
/// assert!(!user.is_saved());
///
/// let saved = factory.create("basic_user", attrs! {})?;
/// assert!(saved.is_saved());
/// # Ok(())
/// # }
/// ```
pub struct Factory {
    name: String,
    config: FactoryConfig,
    store: Arc<dyn ModelStore>,
    blueprints: Vec<Blueprint>,
    operations: BTreeMap<String, DerivedOperation>,
}

impl Factory {
    /// Start a factory definition that resolves models through `resolver`.
    pub fn define(name: impl Into<String>, resolver: &dyn ModelResolver) -> FactoryBuilder<'_> {
        FactoryBuilder {
            name: name.into(),
            resolver,
            config: FactoryConfig::default(),
            store: None,
            blueprints: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn ModelStore> {
        &self.store
    }

    pub fn blueprint(&self, name: &str) -> Option<&Blueprint> {
        self.blueprints.iter().find(|b| b.name() == name)
    }

    pub fn blueprints(&self) -> impl Iterator<Item = &Blueprint> {
        self.blueprints.iter()
    }

    /// Derived operations, ordered by name.
    pub fn operations(&self) -> impl Iterator<Item = &DerivedOperation> {
        self.operations.values()
    }

    pub fn operation(&self, name: &str) -> Option<&DerivedOperation> {
        self.operations.get(name)
    }

    fn require(&self, name: &str) -> Result<&Blueprint> {
        self.blueprint(name)
            .ok_or_else(|| FactoryError::UnknownBlueprint(name.to_string()))
    }

    /// The blueprint's own defaults, before overrides.
    pub fn defaults(&self, blueprint: &str) -> Result<Attributes> {
        self.require(blueprint)?.defaults(self)
    }

    /// Defaults overlaid with `overrides`, then interpolated.
    pub fn properties(&self, blueprint: &str, overrides: Attributes) -> Result<Attributes> {
        let mut properties = self.defaults(blueprint)?;
        properties.merge(overrides);
        if self.config.interpolate {
            interpolate(&mut properties)?;
        }
        Ok(properties)
    }

    /// Construct an unsaved instance from `blueprint`.
    pub fn build(&self, blueprint: &str, overrides: Attributes) -> Result<ModelInstance> {
        let model = self.require(blueprint)?.model().clone();
        let properties = self.properties(blueprint, overrides)?;
        let instance = model.instantiate(properties)?;

        event!(
            Level::DEBUG,
            factory = %self.name,
            blueprint,
            model = %model.label(),
            "built instance"
        );
        Ok(instance)
    }

    /// Construct an instance from `blueprint` and save it to the factory's store.
    pub fn create(&self, blueprint: &str, overrides: Attributes) -> Result<ModelInstance> {
        let span = info_span!("factory_create", factory = %self.name, blueprint);
        let _guard = span.enter();

        let mut instance = self.build(blueprint, overrides)?;
        instance.save(self.store.as_ref())?;

        event!(
            Level::DEBUG,
            model = %instance.model().label(),
            pk = ?instance.pk(),
            "created instance"
        );
        Ok(instance)
    }

    /// Invoke a derived operation by name, e.g. `"create_flat_page"`.
    pub fn call(&self, operation: &str, overrides: Attributes) -> Result<ModelInstance> {
        let operation = self
            .operations
            .get(operation)
            .ok_or_else(|| FactoryError::UnknownOperation(operation.to_string()))?;
        match operation.kind {
            OperationKind::Build => self.build(&operation.blueprint, overrides),
            OperationKind::Create => self.create(&operation.blueprint, overrides),
        }
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("name", &self.name)
            .field("config", &self.config)
            .field("blueprints", &self.blueprints)
            .field("operations", &self.operations.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
