use super::{DataType, FactoryError, Result, Value};
use serde::{Deserialize, Serialize};

pub type Row = Vec<Value>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
    pub unique: bool,
    pub default: Option<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            unique: false,
            default: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Value used when an instance is constructed without this column.
    pub fn initial_value(&self) -> Value {
        self.default.clone().unwrap_or(Value::Null)
    }

    pub fn validate(&self, value: &Value) -> Result<()> {
        if matches!(value, Value::Null) {
            if !self.nullable {
                return Err(FactoryError::ConstraintViolation(format!(
                    "Column '{}' cannot be NULL",
                    self.name
                )));
            }
            return Ok(());
        }

        if !self.data_type.is_compatible(value) {
            return Err(FactoryError::TypeMismatch(format!(
                "Column '{}' expects type {}, got {}",
                self.name,
                self.data_type,
                value.type_name()
            )));
        }

        Ok(())
    }
}

/// Column layout of one model type, identified by `app_label.ModelName`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSchema {
    app_label: String,
    name: String,
    columns: Vec<Column>,
}

impl ModelSchema {
    pub fn new(app_label: impl Into<String>, name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            app_label: app_label.into(),
            name: name.into(),
            columns,
        }
    }

    pub fn app_label(&self) -> &str {
        &self.app_label
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn label(&self) -> String {
        format!("{}.{}", self.app_label, self.name)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn find_column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col.name == name)
    }

    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.find_column_index(name).map(|idx| &self.columns[idx])
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_null_column_rejects_null() {
        let column = Column::new("url", DataType::Text).not_null();
        assert!(matches!(
            column.validate(&Value::Null),
            Err(FactoryError::ConstraintViolation(_))
        ));
        assert!(column.validate(&Value::from("/a/")).is_ok());
    }

    #[test]
    fn test_type_mismatch_is_reported() {
        let column = Column::new("enable_comments", DataType::Boolean);
        let err = column.validate(&Value::from("yes")).unwrap_err();
        assert!(err.to_string().contains("expects type BOOLEAN"));
    }

    #[test]
    fn test_schema_label() {
        let schema = ModelSchema::new("flatpages", "FlatPage", vec![Column::new("url", DataType::Text)]);
        assert_eq!(schema.label(), "flatpages.FlatPage");
        assert_eq!(schema.find_column_index("url"), Some(0));
        assert!(schema.get_column("title").is_none());
    }
}
