pub mod cli;
pub mod error;
pub mod loader;
pub mod model;

pub use error::ConfigError;
pub use loader::{ConfigLoader, ConfigLoaderProvider};
pub use model::Config;
