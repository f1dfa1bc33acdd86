//! Factory for the flatpages app.
//!
//! ```
//! use model_factories::attrs;
//! use model_factories::flat_pages::{self, FlatPageFactory};
//!
//! let factory = FlatPageFactory::new(&flat_pages::registry()).unwrap();
//! let page = factory.create_protected_flat_page(attrs! { "title" => "Members" }).unwrap();
//! assert_eq!(page.text("content"), Some("<h1>Members</h1>"));
//! assert!(page.is_saved());
//! ```

use crate::core::{Column, DataType, ModelSchema};
use crate::model::ModelRegistry;

pub const APP_LABEL: &str = "flatpages";
pub const MODEL_NAME: &str = "FlatPage";

/// Columns of the flatpages `FlatPage` model.
pub fn schema() -> ModelSchema {
    ModelSchema::new(
        APP_LABEL,
        MODEL_NAME,
        vec![
            Column::new("url", DataType::Text).not_null(),
            Column::new("title", DataType::Text).not_null(),
            Column::new("content", DataType::Text).default_value(""),
            Column::new("enable_comments", DataType::Boolean).default_value(false),
            Column::new("template_name", DataType::Text).default_value(""),
            Column::new("registration_required", DataType::Boolean).default_value(false),
        ],
    )
}

/// A registry holding only the `FlatPage` model.
pub fn registry() -> ModelRegistry {
    ModelRegistry::new().with_model(schema())
}

crate::factory! {
    /// A model factory for the flatpages app.
    pub struct FlatPageFactory {
        /// A basic FlatPage--public, no comments.
        flat_page: "flatpages.FlatPage" => |_| Ok(crate::attrs! {
            "url" => "/test/page/",
            "title" => "Test Page",
            "content" => "<h1>%(title)s</h1>",
            "enable_comments" => false,
            "registration_required" => false,
        }),

        /// A FlatPage that is only accessible by registered users.
        protected_flat_page: "flatpages.FlatPage" => |factory| {
            let mut flat_page = factory.defaults("flat_page")?;
            flat_page.insert("registration_required", true);
            Ok(flat_page)
        },
    }
}
