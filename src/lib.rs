// ============================================================================
// Model Factories Library
// ============================================================================

//! Blueprint-based model factories for test fixtures.
//!
//! A *blueprint* is a named producer of default attributes bound to one model
//! type. A factory turns every blueprint into two operations:
//! `build_<name>` constructs an unsaved instance and `create_<name>` also
//! saves it. Both accept overrides, and text attributes may refer to sibling
//! attributes with `%(key)s` placeholders.
//!
//! ```
//! use model_factories::{attrs, factory, Column, DataType, ModelRegistry, ModelSchema};
//!
//! factory! {
//!     pub struct FlatPageFactory {
//!         /// A basic FlatPage--public, no comments.
//!         flat_page: "flatpages.FlatPage" => |_| Ok(attrs! {
//!             "url" => "/test/page/",
//!             "title" => "Test Page",
//!             "content" => "<h1>%(title)s</h1>",
//!         }),
//!     }
//! }
//!
//! let registry = ModelRegistry::new().with_model(ModelSchema::new(
//!     "flatpages",
//!     "FlatPage",
//!     vec![
//!         Column::new("url", DataType::Text),
//!         Column::new("title", DataType::Text),
//!         Column::new("content", DataType::Text),
//!     ],
//! ));
//!
//! let factory = FlatPageFactory::new(&registry).unwrap();
//! let page = factory.build_flat_page(attrs! { "title" => "My Title" }).unwrap();
//! assert_eq!(page.text("content"), Some("<h1>My Title</h1>"));
//! assert!(!page.is_saved());
//! ```

pub mod core;
pub mod model;
pub mod storage;
pub mod interpolate;
pub mod blueprint;
pub mod factory;
pub mod config;
pub mod flat_pages;
mod macros;

// Re-export main types for convenience
pub use crate::core::{Attributes, Column, DataType, FactoryError, ModelSchema, Result, Value};
pub use blueprint::{BLUEPRINT_DOC_PREFIX, Blueprint, DefaultsFn};
pub use config::FactoryConfig;
pub use factory::{DerivedOperation, Factory, FactoryBuilder, OperationKind};
pub use model::{ModelHandle, ModelIdent, ModelInstance, ModelRegistry, ModelResolver};
pub use storage::{FixtureFile, FixtureRecord, InMemoryStore, ModelStore};

#[doc(hidden)]
pub use paste;
