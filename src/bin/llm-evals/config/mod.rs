mod error;
mod load;
mod paths;
mod types;

pub use load::load_config;
pub use paths::ConfigPaths;
pub use types::{AppConfig, LoggingConfig, ProviderConfig};
