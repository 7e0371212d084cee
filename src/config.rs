//! Environment-driven configuration.
//!
//! Every variable is optional. `EXA_API_KEY` has no default: without it the
//! search wrapper reports itself unavailable.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::exa::client::{API_BASE, DEFAULT_TIMEOUT};

const DEFAULT_STORE_DIR: &str = "reports";

#[derive(Debug, Clone)]
pub struct Config {
    pub exa: ExaConfig,
    pub report: ReportConfig,
}

#[derive(Clone)]
pub struct ExaConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for ExaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExaConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Root directory for the file-backed report store.
    pub store_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let api_key = env::var("EXA_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());
        let base_url = env::var("EXA_BASE_URL")
            .ok()
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| API_BASE.to_string());
        let timeout = timeout_or_default(parse_env_or(
            "EXA_TIMEOUT_SECS",
            DEFAULT_TIMEOUT.as_secs(),
        ));
        let store_dir = env::var("REPORT_STORE_DIR")
            .ok()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STORE_DIR.to_string());

        Self {
            exa: ExaConfig {
                api_key,
                base_url,
                timeout,
            },
            report: ReportConfig {
                store_dir: PathBuf::from(store_dir),
            },
        }
    }
}

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => parse_or(var, &val, default),
        Err(_) => default,
    }
}

/// A zero timeout would fail every request immediately.
fn timeout_or_default(secs: u64) -> Duration {
    if secs == 0 {
        tracing::warn!("EXA_TIMEOUT_SECS must be positive. Using default.");
        return DEFAULT_TIMEOUT;
    }
    Duration::from_secs(secs)
}

fn parse_or<T: std::str::FromStr>(var: &str, val: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match val.trim().parse() {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_accepts_valid_number() {
        assert_eq!(parse_or("EXA_TIMEOUT_SECS", " 45 ", 30u64), 45);
    }

    #[test]
    fn parse_or_falls_back_on_garbage() {
        assert_eq!(parse_or("EXA_TIMEOUT_SECS", "soon", 30u64), 30);
    }

    #[test]
    fn zero_timeout_uses_default() {
        assert_eq!(timeout_or_default(0), DEFAULT_TIMEOUT);
        assert_eq!(timeout_or_default(5), Duration::from_secs(5));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = ExaConfig {
            api_key: Some("super-secret".into()),
            base_url: API_BASE.into(),
            timeout: DEFAULT_TIMEOUT,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
