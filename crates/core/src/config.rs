use std::{str::FromStr, time::Duration};

use tracing::warn;

use crate::{controls::RELAX_DELAY, debounce::DEBOUNCE_DELAY};

pub const BACKEND_URL_ENV: &str = "YTKNOW_BACKEND_URL";
pub const TIMEOUT_ENV: &str = "YTKNOW_TIMEOUT_SECS";
pub const DEBOUNCE_ENV: &str = "YTKNOW_DEBOUNCE_MS";
pub const RELAX_ENV: &str = "YTKNOW_RELAX_MS";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5002";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the extraction service (`/extract`, `/health`).
    pub backend_url: String,
    pub request_timeout: Duration,
    /// Quiet period before live input is previewed.
    pub debounce_delay: Duration,
    /// How long a transient player control stays active.
    pub relax_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            debounce_delay: DEBOUNCE_DELAY,
            relax_delay: RELAX_DELAY,
        }
    }
}

impl Config {
    /// Read configuration from the environment, keeping defaults for unset
    /// or unparsable values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            backend_url: lookup(BACKEND_URL_ENV)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.backend_url),
            request_timeout: parse_var(&lookup, TIMEOUT_ENV)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            debounce_delay: parse_var(&lookup, DEBOUNCE_ENV)
                .map(Duration::from_millis)
                .unwrap_or(defaults.debounce_delay),
            relax_delay: parse_var(&lookup, RELAX_ENV)
                .map(Duration::from_millis)
                .unwrap_or(defaults.relax_delay),
        }
    }

    pub fn with_backend_url(self, backend_url: impl Into<String>) -> Self {
        Self {
            backend_url: backend_url.into(),
            ..self
        }
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable config value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.debounce_delay, Duration::from_millis(500));
        assert_eq!(config.relax_delay, Duration::from_millis(1000));
    }

    #[test]
    fn reads_overrides_and_skips_garbage() {
        let config = Config::from_lookup(lookup(&[
            (BACKEND_URL_ENV, " http://extract.local:8080 "),
            (TIMEOUT_ENV, "5"),
            (DEBOUNCE_ENV, "soon"),
            (RELAX_ENV, "250"),
        ]));
        assert_eq!(config.backend_url, "http://extract.local:8080");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.debounce_delay, DEBOUNCE_DELAY);
        assert_eq!(config.relax_delay, Duration::from_millis(250));
    }
}
