use crate::core::{FactoryError, Result};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_SEPARATOR: char = '.';

/// A parsed `app_label.ModelName` model identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelIdent {
    pub app_label: String,
    pub model_name: String,
}

impl ModelIdent {
    pub fn parse(model: &str) -> Result<Self> {
        Self::parse_with(model, DEFAULT_SEPARATOR)
    }

    /// Split `model` into exactly two non-empty segments on `separator`.
    pub fn parse_with(model: &str, separator: char) -> Result<Self> {
        let mut parts = model.split(separator);
        match (parts.next(), parts.next(), parts.next()) {
            (Some(app_label), Some(model_name), None)
                if !app_label.is_empty() && !model_name.is_empty() =>
            {
                Ok(Self {
                    app_label: app_label.to_string(),
                    model_name: model_name.to_string(),
                })
            }
            _ => Err(FactoryError::BadModelFormat(model.to_string())),
        }
    }
}

impl FromStr for ModelIdent {
    type Err = FactoryError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ModelIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.app_label, self.model_name)
    }
}
