use super::fixture::{FixtureFile, FixtureRecord};
use super::{ModelStore, Table};
use crate::core::{Attributes, FactoryError, ModelSchema, Result};
use crate::model::{ModelIdent, ModelResolver};
use log::debug;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

/// Process-local [`ModelStore`]; tables are created on first insert.
pub struct InMemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }

    pub fn table_exists(&self, label: &str) -> Result<bool> {
        Ok(self.tables.read()?.contains_key(label))
    }

    /// Table labels, sorted.
    pub fn list_tables(&self) -> Result<Vec<String>> {
        let mut labels: Vec<String> = self.tables.read()?.keys().cloned().collect();
        labels.sort();
        Ok(labels)
    }

    /// All rows of one model, ordered by primary key.
    pub fn rows(&self, label: &str) -> Result<Vec<(i64, Attributes)>> {
        let tables = self.tables.read()?;
        let table = tables
            .get(label)
            .ok_or_else(|| FactoryError::NotFound(format!("table '{}'", label)))?;
        Ok(table
            .rows()
            .map(|(pk, row)| (pk, table.fields_of(row)))
            .collect())
    }

    pub fn clear(&self) -> Result<()> {
        self.tables.write()?.clear();
        Ok(())
    }

    /// Every stored row as fixture records, ordered by label then primary key.
    pub fn dump(&self) -> Result<Vec<FixtureRecord>> {
        let tables = self.tables.read()?;
        let mut labels: Vec<&String> = tables.keys().collect();
        labels.sort();

        let mut records = Vec::new();
        for label in labels {
            let table = &tables[label];
            for (pk, row) in table.rows() {
                records.push(FixtureRecord {
                    model: label.clone(),
                    pk,
                    fields: table.fields_of(row),
                });
            }
        }
        Ok(records)
    }

    /// Insert fixture records, resolving each record's model through `resolver`.
    ///
    /// All or nothing: if any record fails, the store is left as it was.
    pub fn load(&self, records: Vec<FixtureRecord>, resolver: &dyn ModelResolver) -> Result<usize> {
        let mut live = self.tables.write()?;
        let mut tables = live.clone();
        let mut loaded = 0;
        for record in records {
            let ident = ModelIdent::parse(&record.model)?;
            let handle = resolver
                .resolve(&ident.app_label, &ident.model_name)
                .ok_or_else(|| FactoryError::ModelResolution {
                    app_label: ident.app_label.clone(),
                    model_name: ident.model_name.clone(),
                })?;

            let table = tables
                .entry(handle.label())
                .or_insert_with(|| Table::new(handle.schema().clone()));
            let row = table.row_from(&record.fields)?;
            table.insert_with_pk(record.pk, row)?;
            loaded += 1;
        }
        *live = tables;
        debug!("loaded {} fixture records", loaded);
        Ok(loaded)
    }

    pub fn save_fixture<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let records = self.dump()?;
        FixtureFile::new(path).save(&records)
    }

    pub fn load_fixture<P: AsRef<Path>>(&self, path: P, resolver: &dyn ModelResolver) -> Result<usize> {
        let records = FixtureFile::new(path).load()?;
        self.load(records, resolver)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelStore for InMemoryStore {
    fn insert(&self, schema: &ModelSchema, fields: &Attributes) -> Result<i64> {
        let label = schema.label();
        let mut tables = self.tables.write()?;
        let table = tables
            .entry(label.clone())
            .or_insert_with(|| Table::new(schema.clone()));
        let row = table.row_from(fields)?;
        let pk = table.insert(row)?;
        debug!("inserted {} pk={}", label, pk);
        Ok(pk)
    }

    fn update(&self, schema: &ModelSchema, pk: i64, fields: &Attributes) -> Result<()> {
        let label = schema.label();
        let mut tables = self.tables.write()?;
        let table = tables
            .get_mut(&label)
            .ok_or_else(|| FactoryError::NotFound(format!("{} with primary key {}", label, pk)))?;
        let row = table.row_from(fields)?;
        table.update(pk, row)?;
        debug!("updated {} pk={}", label, pk);
        Ok(())
    }

    fn fetch(&self, label: &str, pk: i64) -> Result<Option<Attributes>> {
        let tables = self.tables.read()?;
        Ok(tables
            .get(label)
            .and_then(|table| table.get(pk).map(|row| table.fields_of(row))))
    }

    fn count(&self, label: &str) -> Result<usize> {
        let tables = self.tables.read()?;
        Ok(tables.get(label).map_or(0, Table::row_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Column, DataType, Value};
    use crate::model::ModelRegistry;
    use tempfile::TempDir;

    fn page_schema() -> ModelSchema {
        ModelSchema::new(
            "flatpages",
            "FlatPage",
            vec![
                Column::new("url", DataType::Text).not_null().unique(),
                Column::new("title", DataType::Text),
            ],
        )
    }

    #[test]
    fn test_insert_fetch_and_count() {
        let store = InMemoryStore::new();
        assert!(!store.table_exists("flatpages.FlatPage").unwrap());

        let pk = store
            .insert(&page_schema(), &Attributes::new().with("url", "/a/"))
            .unwrap();
        let fetched = store.fetch("flatpages.FlatPage", pk).unwrap().unwrap();
        assert_eq!(fetched.get("title"), Some(&Value::Null));
        assert_eq!(store.count("flatpages.FlatPage").unwrap(), 1);
        assert_eq!(store.count("auth.User").unwrap(), 0);
        assert!(store.table_exists("flatpages.FlatPage").unwrap());
        assert_eq!(store.list_tables().unwrap(), vec!["flatpages.FlatPage".to_string()]);
    }

    #[test]
    fn test_update_unknown_table() {
        let store = InMemoryStore::new();
        let err = store
            .update(&page_schema(), 1, &Attributes::new().with("url", "/a/"))
            .unwrap_err();
        assert!(matches!(err, FactoryError::NotFound(_)));
    }

    #[test]
    fn test_fixture_round_trip_through_file() {
        let registry = ModelRegistry::new().with_model(page_schema());
        let store = InMemoryStore::new();
        store
            .insert(&page_schema(), &Attributes::new().with("url", "/a/").with("title", "A"))
            .unwrap();
        store
            .insert(&page_schema(), &Attributes::new().with("url", "/b/"))
            .unwrap();

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pages.json");
        store.save_fixture(&path).unwrap();

        let restored = InMemoryStore::new();
        assert_eq!(restored.load_fixture(&path, &registry).unwrap(), 2);
        assert_eq!(restored.dump().unwrap(), store.dump().unwrap());
    }

    #[test]
    fn test_load_unknown_model_fails() {
        let store = InMemoryStore::new();
        let records = vec![FixtureRecord {
            model: "missingapp.Thing".to_string(),
            pk: 1,
            fields: Attributes::new(),
        }];
        let err = store.load(records, &ModelRegistry::new()).unwrap_err();
        assert!(matches!(err, FactoryError::ModelResolution { .. }));
    }

    #[test]
    fn test_failed_load_leaves_store_unchanged() {
        let registry = ModelRegistry::new().with_model(page_schema());
        let store = InMemoryStore::new();
        let records = vec![
            FixtureRecord {
                model: "flatpages.FlatPage".to_string(),
                pk: 1,
                fields: Attributes::new().with("url", "/a/"),
            },
            FixtureRecord {
                model: "flatpages.FlatPage".to_string(),
                pk: 2,
                fields: Attributes::new().with("url", "/a/"),
            },
        ];

        let err = store.load(records, &registry).unwrap_err();
        assert!(matches!(err, FactoryError::ConstraintViolation(_)));
        assert_eq!(store.count("flatpages.FlatPage").unwrap(), 0);
        assert!(!store.table_exists("flatpages.FlatPage").unwrap());
    }

    #[test]
    fn test_load_rejects_exhausted_primary_key() {
        let registry = ModelRegistry::new().with_model(page_schema());
        let store = InMemoryStore::new();
        let records = vec![FixtureRecord {
            model: "flatpages.FlatPage".to_string(),
            pk: i64::MAX,
            fields: Attributes::new().with("url", "/a/"),
        }];

        let err = store.load(records, &registry).unwrap_err();
        assert!(matches!(err, FactoryError::ConstraintViolation(_)));
        assert_eq!(store.count("flatpages.FlatPage").unwrap(), 0);
    }
}
