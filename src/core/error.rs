use thiserror::Error;

#[derive(Error, Debug)]
pub enum FactoryError {
    #[error(
        "Value for model argument to blueprint is malformed ('{0}'). Expected format is 'app_label.ModelName'."
    )]
    BadModelFormat(String),

    #[error(
        "Could not import model '{model_name}': Perhaps '{app_label}' is not in your installed apps or there is a typo?"
    )]
    ModelResolution {
        app_label: String,
        model_name: String,
    },

    #[error("Missing interpolation key: '{0}'")]
    MissingKey(String),

    #[error("Format error: {0}")]
    Format(String),

    #[error("'{0}' is an invalid field for model '{1}'")]
    UnexpectedField(String, String),

    #[error("Blueprint '{0}' not found")]
    UnknownBlueprint(String),

    #[error("Operation '{0}' not found")]
    UnknownOperation(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Lock error: {0}")]
    LockError(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, FactoryError>;

impl<T> From<std::sync::PoisonError<T>> for FactoryError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}

impl From<std::io::Error> for FactoryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FactoryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
