use std::env;
use std::path::{Path, PathBuf};

use super::error::ConfigError;
use super::probe_config::ProbeSettings;

const DEFAULT_CONFIG_FILE: &str = "config.yml";
const DEFAULT_LOG_FILE: &str = "web_check_results.log";

pub struct AppConfig {
    pub settings: ProbeSettings,
    pub config_file: PathBuf,
    pub log_file: PathBuf,
}

/// Load the application configuration from a YAML (or JSON) file and environment variables.
/// The file is named by the `CONFIG_FILE` environment variable and the log destination by `LOG_FILE`.
/// A `.env` file in the working directory is honoured when present.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let _ = dotenvy::dotenv();

    let config_file =
        env::var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());

    load_config_from(Path::new(&config_file), Path::new(&log_file))
}

pub fn load_config_from(config_file: &Path, log_file: &Path) -> Result<AppConfig, ConfigError> {
    let config_str = std::fs::read_to_string(config_file).map_err(|source| ConfigError::Read {
        path: config_file.to_path_buf(),
        source,
    })?;

    let settings = ProbeSettings::from_yaml(&config_str)?;

    Ok(AppConfig {
        settings,
        config_file: config_file.to_path_buf(),
        log_file: log_file.to_path_buf(),
    })
}
