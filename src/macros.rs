//! `factory!`: declare a named factory type with one `build_*` / `create_*`
//! method pair per blueprint.

/// Declare a factory type.
///
/// Each entry is `name: "app_label.ModelName" => defaults`, where `defaults`
/// is a closure taking the underlying [`Factory`](crate::Factory). Doc
/// comments on an entry become the blueprint's documentation.
///
/// ```
/// use model_factories::{attrs, factory, Column, DataType, ModelRegistry, ModelSchema};
///
/// factory! {
///     /// A model factory for the `auth` app.
///     pub struct UserFactory {
///         /// Create a minimal User.
///         basic_user: "auth.User" => |_| Ok(attrs! { "first_name" => "John" }),
///     }
/// }
///
/// let registry = ModelRegistry::new().with_model(ModelSchema::new(
///     "auth",
///     "User",
///     vec![Column::new("first_name", DataType::Text)],
/// ));
/// let factory = UserFactory::new(&registry).unwrap();
/// let user = factory.build_basic_user(attrs! {}).unwrap();
/// assert_eq!(user.text("first_name"), Some("John"));
/// ```
#[macro_export]
macro_rules! factory {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[doc = $doc:literal])*
                $blueprint:ident : $model:literal => $defaults:expr
            ),* $(,)?
        }
    ) => {
        $crate::paste::paste! {
            $(#[$meta])*
            $vis struct $name {
                factory: $crate::Factory,
            }

            impl $name {
                /// Define the factory, resolving every blueprint's model through `resolver`.
                pub fn new(resolver: &dyn $crate::ModelResolver) -> $crate::Result<Self> {
                    Self::with_store(resolver, ::std::sync::Arc::new($crate::InMemoryStore::new()))
                }

                /// Define the factory with the store used by `create_*` methods.
                pub fn with_store(
                    resolver: &dyn $crate::ModelResolver,
                    store: ::std::sync::Arc<dyn $crate::ModelStore>,
                ) -> $crate::Result<Self> {
                    #[allow(unused_mut)]
                    let mut builder = $crate::Factory::define(stringify!($name), resolver).store(store);
                    $(
                        let docs: &[&str] = &[$($doc.trim()),*];
                        builder = builder.blueprint(
                            stringify!($blueprint),
                            $model,
                            &docs.join("\n"),
                            $defaults,
                        )?;
                    )*
                    Ok(Self { factory: builder.build() })
                }

                pub fn factory(&self) -> &$crate::Factory {
                    &self.factory
                }

                $(
                    /// Default attributes of this blueprint, before overrides.
                    pub fn $blueprint(&self) -> $crate::Result<$crate::Attributes> {
                        self.factory.defaults(stringify!($blueprint))
                    }

                    /// Build an unsaved instance from this blueprint.
                    pub fn [<build_ $blueprint>](
                        &self,
                        overrides: $crate::Attributes,
                    ) -> $crate::Result<$crate::ModelInstance> {
                        self.factory.build(stringify!($blueprint), overrides)
                    }

                    /// Build an instance from this blueprint and save it.
                    pub fn [<create_ $blueprint>](
                        &self,
                        overrides: $crate::Attributes,
                    ) -> $crate::Result<$crate::ModelInstance> {
                        self.factory.create(stringify!($blueprint), overrides)
                    }
                )*
            }

            impl ::std::ops::Deref for $name {
                type Target = $crate::Factory;

                fn deref(&self) -> &Self::Target {
                    &self.factory
                }
            }
        }
    };
}
