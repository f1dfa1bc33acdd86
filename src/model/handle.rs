use super::ModelInstance;
use crate::core::{Attributes, FactoryError, ModelSchema, Result};
use std::fmt;
use std::sync::Arc;

/// Shared handle to a registered model type.
///
/// Cloning is cheap; every blueprint keeps the handle it resolved at
/// definition time.
#[derive(Clone)]
pub struct ModelHandle {
    schema: Arc<ModelSchema>,
}

impl ModelHandle {
    pub fn new(schema: ModelSchema) -> Self {
        Self {
            schema: Arc::new(schema),
        }
    }

    pub fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    pub fn name(&self) -> &str {
        self.schema.name()
    }

    pub fn app_label(&self) -> &str {
        self.schema.app_label()
    }

    pub fn label(&self) -> String {
        self.schema.label()
    }

    /// Construct an unsaved instance from `attributes`.
    ///
    /// Unknown attribute names are rejected; columns not mentioned take
    /// their default (or NULL).
    pub fn instantiate(&self, attributes: Attributes) -> Result<ModelInstance> {
        if let Some(unknown) = attributes
            .keys()
            .find(|key| self.schema.find_column_index(key).is_none())
        {
            return Err(FactoryError::UnexpectedField(
                unknown.to_string(),
                self.label(),
            ));
        }

        let mut supplied = attributes;
        let mut fields = Attributes::with_capacity(self.schema.column_count());
        for column in self.schema.columns() {
            let value = supplied
                .remove(&column.name)
                .unwrap_or_else(|| column.initial_value());
            fields.insert(column.name.clone(), value);
        }

        Ok(ModelInstance::new(self.clone(), fields))
    }
}

impl PartialEq for ModelHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.schema, &other.schema)
            || (self.app_label() == other.app_label() && self.name() == other.name())
    }
}

impl fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModelHandle").field(&self.label()).finish()
    }
}
