use crate::core::{Attributes, ModelSchema, Result};

/// Persistence backend used by [`ModelInstance::save`](crate::ModelInstance::save).
///
/// Implementations own primary-key assignment and constraint checks; their
/// errors reach the caller unchanged.
pub trait ModelStore: Send + Sync {
    /// Insert a new row and return its primary key.
    fn insert(&self, schema: &ModelSchema, fields: &Attributes) -> Result<i64>;

    /// Replace the row stored under `pk`.
    fn update(&self, schema: &ModelSchema, pk: i64, fields: &Attributes) -> Result<()>;

    /// Fetch the stored fields of one row.
    fn fetch(&self, label: &str, pk: i64) -> Result<Option<Attributes>>;

    /// Number of rows stored for a model label.
    fn count(&self, label: &str) -> Result<usize>;
}
