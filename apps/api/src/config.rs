use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::{DEFAULT_API_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_MIN_TEXT_CHARS: usize = 50;

/// Which remote-backed strategy to run when an API key is configured.
/// Without a key the heuristic scorer is always used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringMode {
    /// Heuristic score as the base, nudged by remote insights.
    Hybrid,
    /// Score delegated entirely to the remote model.
    Remote,
}

impl FromStr for ScoringMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hybrid" => Ok(ScoringMode::Hybrid),
            "remote" => Ok(ScoringMode::Remote),
            other => bail!("unknown SCORING_MODE '{other}' (expected 'hybrid' or 'remote')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Nothing is required: a missing `GROQ_API_KEY` selects the offline scorer.
#[derive(Debug, Clone)]
pub struct Config {
    pub groq_api_key: Option<String>,
    pub llm_api_url: String,
    pub llm_model: String,
    pub llm_timeout: Duration,
    pub scoring_mode: ScoringMode,
    pub max_upload_bytes: usize,
    pub min_text_chars: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so parsing can be tested
    /// without touching the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Config {
            groq_api_key: non_empty("GROQ_API_KEY"),
            llm_api_url: non_empty("LLM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            llm_model: non_empty("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            llm_timeout: Duration::from_secs(parse_or(
                non_empty("LLM_TIMEOUT_SECS"),
                "LLM_TIMEOUT_SECS",
                DEFAULT_TIMEOUT_SECS,
            )?),
            scoring_mode: parse_or(non_empty("SCORING_MODE"), "SCORING_MODE", ScoringMode::Hybrid)?,
            max_upload_bytes: parse_or(
                non_empty("MAX_UPLOAD_BYTES"),
                "MAX_UPLOAD_BYTES",
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            min_text_chars: parse_or(
                non_empty("MIN_TEXT_CHARS"),
                "MIN_TEXT_CHARS",
                DEFAULT_MIN_TEXT_CHARS,
            )?,
            port: parse_or(non_empty("PORT"), "PORT", 8000)?,
            rust_log: non_empty("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn remote_enabled(&self) -> bool {
        self.groq_api_key.is_some()
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{e}"))
            .with_context(|| format!("{key} has an invalid value '{value}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_any_variables() {
        let config = config_from(&[]).unwrap();
        assert!(config.groq_api_key.is_none());
        assert!(!config.remote_enabled());
        assert_eq!(config.llm_api_url, DEFAULT_API_URL);
        assert_eq!(config.llm_model, DEFAULT_MODEL);
        assert_eq!(config.llm_timeout, Duration::from_secs(45));
        assert_eq!(config.scoring_mode, ScoringMode::Hybrid);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.min_text_chars, 50);
        assert_eq!(config.port, 8000);
        assert_eq!(config.rust_log, "info");
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let config = config_from(&[("GROQ_API_KEY", "   ")]).unwrap();
        assert!(!config.remote_enabled());
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = config_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("SCORING_MODE", "Remote"),
            ("LLM_TIMEOUT_SECS", "30"),
            ("MAX_UPLOAD_BYTES", "2048"),
            ("PORT", "9090"),
        ])
        .unwrap();
        assert!(config.remote_enabled());
        assert_eq!(config.scoring_mode, ScoringMode::Remote);
        assert_eq!(config.llm_timeout, Duration::from_secs(30));
        assert_eq!(config.max_upload_bytes, 2048);
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = config_from(&[("PORT", "not-a-port")]).unwrap_err();
        assert!(format!("{err:#}").contains("PORT"));
    }

    #[test]
    fn test_unknown_scoring_mode_is_rejected() {
        assert!(config_from(&[("SCORING_MODE", "magic")]).is_err());
    }
}
