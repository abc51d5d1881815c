pub mod config;
pub mod paths;

pub use config::{Config, LoggingConfig, StatsConfig, StorageBackend, StorageConfig, StorageFormat};
pub use paths::{PathManager, container_base_path};
