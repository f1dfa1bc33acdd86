pub mod engine;
pub mod fixture;
pub mod memory;
pub mod table;

pub use engine::ModelStore;
pub use fixture::{FixtureFile, FixtureRecord};
pub use memory::InMemoryStore;
pub use table::Table;
