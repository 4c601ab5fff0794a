use std::path::PathBuf;

use thiserror::Error;

/// Configuration problems. Every variant aborts the run before probing starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("no option `{0}` in config")]
    MissingOption(String),

    #[error("invalid value for `{key}`: {reason}")]
    InvalidOption { key: String, reason: String },

    #[error("invalid target url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
