pub mod handle;
pub mod ident;
pub mod instance;
pub mod registry;

pub use handle::ModelHandle;
pub use ident::{DEFAULT_SEPARATOR, ModelIdent};
pub use instance::ModelInstance;
pub use registry::{ModelRegistry, ModelResolver};
