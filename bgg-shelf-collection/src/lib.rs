pub mod error;
pub mod loader;

pub use error::LoadError;
pub use loader::{Collection, load_collection, parse_collection};
