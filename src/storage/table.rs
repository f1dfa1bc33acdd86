use crate::core::{Attributes, FactoryError, ModelSchema, Result, Row, Value};
use std::collections::BTreeMap;

/// Rows of one model type, keyed by primary key.
#[derive(Debug, Clone)]
pub struct Table {
    schema: ModelSchema,
    rows: BTreeMap<i64, Row>,
    next_pk: i64,
}

impl Table {
    pub fn new(schema: ModelSchema) -> Self {
        Self {
            schema,
            rows: BTreeMap::new(),
            next_pk: 1,
        }
    }

    pub fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    pub fn insert(&mut self, row: Row) -> Result<i64> {
        let pk = self.next_pk;
        self.insert_with_pk(pk, row)?;
        Ok(pk)
    }

    /// Insert under an explicit primary key (fixture loading).
    pub fn insert_with_pk(&mut self, pk: i64, row: Row) -> Result<()> {
        if self.rows.contains_key(&pk) {
            return Err(FactoryError::ConstraintViolation(format!(
                "Unique constraint violation: primary key {} already exists in '{}'",
                pk,
                self.schema.label()
            )));
        }
        let next_pk = pk.checked_add(1).ok_or_else(|| {
            FactoryError::ConstraintViolation(format!(
                "primary key {} leaves no room in the sequence of '{}'",
                pk,
                self.schema.label()
            ))
        })?;
        self.validate_row(&row)?;
        self.check_uniqueness(&row, None)?;

        self.rows.insert(pk, row);
        self.next_pk = self.next_pk.max(next_pk);
        Ok(())
    }

    pub fn update(&mut self, pk: i64, row: Row) -> Result<()> {
        if !self.rows.contains_key(&pk) {
            return Err(FactoryError::NotFound(format!(
                "{} with primary key {}",
                self.schema.label(),
                pk
            )));
        }
        self.validate_row(&row)?;
        self.check_uniqueness(&row, Some(pk))?;
        self.rows.insert(pk, row);
        Ok(())
    }

    pub fn get(&self, pk: i64) -> Option<&Row> {
        self.rows.get(&pk)
    }

    pub fn rows(&self) -> impl Iterator<Item = (i64, &Row)> {
        self.rows.iter().map(|(pk, row)| (*pk, row))
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Lay `fields` out in column order.
    pub fn row_from(&self, fields: &Attributes) -> Result<Row> {
        if let Some(unknown) = fields
            .keys()
            .find(|key| self.schema.find_column_index(key).is_none())
        {
            return Err(FactoryError::UnexpectedField(
                unknown.to_string(),
                self.schema.label(),
            ));
        }

        Ok(self
            .schema
            .columns()
            .iter()
            .map(|column| {
                fields
                    .get(&column.name)
                    .cloned()
                    .unwrap_or_else(|| column.initial_value())
            })
            .collect())
    }

    pub fn fields_of(&self, row: &Row) -> Attributes {
        self.schema
            .columns()
            .iter()
            .zip(row.iter())
            .map(|(column, value)| (column.name.clone(), value.clone()))
            .collect()
    }

    fn validate_row(&self, row: &Row) -> Result<()> {
        let columns = self.schema.columns();
        if row.len() != columns.len() {
            return Err(FactoryError::TypeMismatch(format!(
                "Expected {} columns, got {}",
                columns.len(),
                row.len()
            )));
        }
        for (column, value) in columns.iter().zip(row.iter()) {
            column.validate(value)?;
        }
        Ok(())
    }

    fn check_uniqueness(&self, row: &Row, ignore_pk: Option<i64>) -> Result<()> {
        for (col_idx, column) in self.schema.columns().iter().enumerate() {
            if !column.unique {
                continue;
            }
            let value = &row[col_idx];
            if matches!(value, Value::Null) {
                continue;
            }

            let clash = self
                .rows
                .iter()
                .filter(|(pk, _)| Some(**pk) != ignore_pk)
                .any(|(_, existing)| &existing[col_idx] == value);
            if clash {
                return Err(FactoryError::ConstraintViolation(format!(
                    "Unique constraint violation: Column '{}' already contains value {}",
                    column.name, value
                )));
            }
        }
        Ok(())
    }
}
