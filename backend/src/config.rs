use axum::http::HeaderValue;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::ConfigError;

pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_DATABASE: &str = ":memory:";
pub const DEFAULT_STATIC_DIR: &str = "frontend/dist";
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://127.0.0.1:5500", "http://localhost:5500"];
pub const DEFAULT_LOG_FILTER: &str = "taskboard_backend=info,taskboard=info,tower_http=info";

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    /// SQLite path, or `:memory:` for a throwaway database.
    pub database: String,
    pub allowed_origins: Vec<HeaderValue>,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from `TASKBOARD_*` keys, falling back to defaults for unset ones.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr_raw = lookup("TASKBOARD_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_raw
            .parse()
            .map_err(|source| ConfigError::InvalidAddr {
                value: addr_raw.clone(),
                source,
            })?;

        let allowed_origins = match lookup("TASKBOARD_ALLOWED_ORIGINS") {
            Some(list) => parse_origins(&list)?,
            None => parse_origins(&DEFAULT_ALLOWED_ORIGINS.join(","))?,
        };

        Ok(Self {
            addr,
            database: lookup("TASKBOARD_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            allowed_origins,
            static_dir: lookup("TASKBOARD_STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            database: DEFAULT_DATABASE.to_string(),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .into_iter()
                .map(HeaderValue::from_static)
                .collect(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

fn parse_origins(list: &str) -> Result<Vec<HeaderValue>, ConfigError> {
    list.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidOrigin(origin.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.database, ":memory:");
        assert_eq!(config.allowed_origins, Config::default().allowed_origins);
        assert_eq!(config.static_dir, PathBuf::from("frontend/dist"));
    }

    #[test]
    fn origins_are_trimmed_and_blank_entries_skipped() {
        let config = Config::from_lookup(lookup(&[(
            "TASKBOARD_ALLOWED_ORIGINS",
            " http://a.test , ,http://b.test:8080,",
        )]))
        .unwrap();
        assert_eq!(
            config.allowed_origins,
            vec![
                HeaderValue::from_static("http://a.test"),
                HeaderValue::from_static("http://b.test:8080"),
            ]
        );
    }

    #[test]
    fn bad_address_is_reported() {
        let err = Config::from_lookup(lookup(&[("TASKBOARD_ADDR", "not-an-addr")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddr { ref value, .. } if value == "not-an-addr"));
    }

    #[test]
    fn origin_with_control_characters_is_rejected() {
        let err = Config::from_lookup(lookup(&[("TASKBOARD_ALLOWED_ORIGINS", "http://a\n.test")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOrigin(_)));
    }
}
