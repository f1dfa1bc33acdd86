use super::ModelHandle;
use crate::core::{Attributes, FactoryError, Result, Value};
use crate::storage::ModelStore;

/// An instance of a model type, saved or not.
#[derive(Debug, Clone)]
pub struct ModelInstance {
    model: ModelHandle,
    pk: Option<i64>,
    fields: Attributes,
}

impl ModelInstance {
    pub(crate) fn new(model: ModelHandle, fields: Attributes) -> Self {
        Self {
            model,
            pk: None,
            fields,
        }
    }

    pub fn model(&self) -> &ModelHandle {
        &self.model
    }

    /// Primary key, unset until the instance has been saved.
    pub fn pk(&self) -> Option<i64> {
        self.pk
    }

    pub fn is_saved(&self) -> bool {
        self.pk.is_some()
    }

    pub fn fields(&self) -> &Attributes {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn set(&mut self, field: &str, value: impl Into<Value>) -> Result<()> {
        match self.fields.get_mut(field) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(FactoryError::UnexpectedField(
                field.to_string(),
                self.model.label(),
            )),
        }
    }

    /// Insert the instance into `store`, or update it if it already has a primary key.
    pub fn save(&mut self, store: &dyn ModelStore) -> Result<()> {
        match self.pk {
            None => {
                let pk = store.insert(self.model.schema(), &self.fields)?;
                self.pk = Some(pk);
            }
            Some(pk) => store.update(self.model.schema(), pk, &self.fields)?,
        }
        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "model": self.model.label(),
            "pk": self.pk,
            "fields": self.fields,
        })
    }
}
