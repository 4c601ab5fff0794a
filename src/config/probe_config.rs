use std::time::Duration;

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use super::error::ConfigError;

/// Fallback, in seconds, for any `timeout_*` option that is absent-valued or falsy.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

const TARGET_LIST_OPTION: &str = "target_list";

/// A single endpoint to probe.
/// Identified by its URL, with the response body size it is expected to return.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProbeTarget {
    /// The URL that receives a GET on every batch.
    pub url: String,

    /// Body length in bytes; any difference is reported as drift.
    pub expected_content_size: u64,
}

/// The three durations that drive a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationConfig {
    global: Duration,
    request: Duration,
    interval: Duration,
}

impl DurationConfig {
    /// A zero interval with a non-zero budget would never exhaust the budget, so it is refused.
    pub fn new(global: Duration, request: Duration, interval: Duration) -> Result<Self, ConfigError> {
        if interval.is_zero() && !global.is_zero() {
            return Err(ConfigError::InvalidOption {
                key: "timeout_interval".to_string(),
                reason: "interval must be greater than zero".to_string(),
            });
        }
        Ok(Self {
            global,
            request,
            interval,
        })
    }

    /// Total run budget.
    pub fn global(&self) -> Duration {
        self.global
    }

    /// Upper bound for one fetch, body included.
    pub fn request(&self) -> Duration {
        self.request
    }

    /// Pause between batches, and the amount the budget shrinks by per batch.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Everything the probing loop needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub targets: Vec<ProbeTarget>,
    pub durations: DurationConfig,
}

impl ProbeSettings {
    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        let options: Mapping = serde_yaml::from_str(source)?;

        let targets = target_list(&options)?;
        let durations = DurationConfig::new(
            timeout_option(&options, "global")?,
            timeout_option(&options, "request")?,
            timeout_option(&options, "interval")?,
        )?;

        Ok(Self { targets, durations })
    }
}

fn get_option<'a>(options: &'a Mapping, key: &str) -> Result<&'a Value, ConfigError> {
    options
        .get(key)
        .ok_or_else(|| ConfigError::MissingOption(key.to_string()))
}

fn target_list(options: &Mapping) -> Result<Vec<ProbeTarget>, ConfigError> {
    let value = get_option(options, TARGET_LIST_OPTION)?;
    let targets: Vec<ProbeTarget> =
        serde_yaml::from_value(value.clone()).map_err(|e| ConfigError::InvalidOption {
            key: TARGET_LIST_OPTION.to_string(),
            reason: e.to_string(),
        })?;

    for target in &targets {
        url::Url::parse(&target.url).map_err(|source| ConfigError::InvalidUrl {
            url: target.url.clone(),
            source,
        })?;
    }

    Ok(targets)
}

fn timeout_option(options: &Mapping, kind: &str) -> Result<Duration, ConfigError> {
    let key = format!("timeout_{kind}");
    let invalid = |reason: String| ConfigError::InvalidOption {
        key: key.clone(),
        reason,
    };

    let seconds = match get_option(options, &key)? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::Number(n) => {
            let secs = n
                .as_f64()
                .ok_or_else(|| invalid(format!("{n} is not a number of seconds")))?;
            (secs != 0.0).then_some(secs)
        }
        other => return Err(invalid(format!("expected seconds, found {other:?}"))),
    };

    match seconds {
        None => Ok(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        Some(secs) => Duration::try_from_secs_f64(secs).map_err(|e| invalid(e.to_string())),
    }
}
