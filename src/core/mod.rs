pub mod attributes;
pub mod error;
pub mod types;
pub mod value;

pub use attributes::Attributes;
pub use error::{FactoryError, Result};
pub use types::{Column, ModelSchema, Row};
pub use value::{DataType, Value};
