pub mod app_config;
pub mod error;
pub mod probe_config;

pub use app_config::{AppConfig, load_config};
pub use error::ConfigError;
pub use probe_config::{DurationConfig, ProbeSettings, ProbeTarget};
