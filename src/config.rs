use crate::error::{Error, Result};
use crate::models::score::ScoreWeights;
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub database_max_connections: u32,
    pub api_rps: u32,
    /// Weights applied to jobs that carry no weights of their own.
    pub default_weights: ScoreWeights,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ai_weight: f64 = get_parse_or(&lookup, "RANKING_AI_WEIGHT", 0.5)?;
        let manual_weight: f64 = get_parse_or(&lookup, "RANKING_MANUAL_WEIGHT", 1.0 - ai_weight)?;

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            None | Some("") | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(Error::Config(format!(
                    "Invalid value for LOG_FORMAT: {}",
                    other
                )))
            }
        };

        Ok(Self {
            server_address: get_required(&lookup, "SERVER_ADDRESS")?,
            database_url: get_required(&lookup, "DATABASE_URL")?,
            database_max_connections: get_parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 20)?,
            api_rps: get_parse_or(&lookup, "API_RPS", 100)?,
            default_weights: ScoreWeights::new(ai_weight, manual_weight),
            log_format,
        })
    }
}

fn get_required<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).ok_or_else(|| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_optional_values_missing() {
        let config = Config::from_lookup(lookup_from(&[
            ("SERVER_ADDRESS", "127.0.0.1:8080"),
            ("DATABASE_URL", "postgres://localhost/hiring"),
        ]))
        .unwrap();

        assert_eq!(config.api_rps, 100);
        assert_eq!(config.database_max_connections, 20);
        assert_eq!(config.default_weights, ScoreWeights::default());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn ai_weight_alone_implies_manual_complement() {
        let config = Config::from_lookup(lookup_from(&[
            ("SERVER_ADDRESS", "127.0.0.1:8080"),
            ("DATABASE_URL", "postgres://localhost/hiring"),
            ("RANKING_AI_WEIGHT", "0.7"),
        ]))
        .unwrap();

        assert!((config.default_weights.ai() - 0.7).abs() < 1e-9);
        assert!((config.default_weights.manual() - 0.3).abs() < 1e-9);
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = Config::from_lookup(lookup_from(&[("SERVER_ADDRESS", "127.0.0.1:8080")]))
            .unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn rejects_unparseable_numbers() {
        let err = Config::from_lookup(lookup_from(&[
            ("SERVER_ADDRESS", "127.0.0.1:8080"),
            ("DATABASE_URL", "postgres://localhost/hiring"),
            ("API_RPS", "fast"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn json_log_format_is_recognised() {
        let config = Config::from_lookup(lookup_from(&[
            ("SERVER_ADDRESS", "127.0.0.1:8080"),
            ("DATABASE_URL", "postgres://localhost/hiring"),
            ("LOG_FORMAT", "json"),
        ]))
        .unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
    }
}
