use std::path::PathBuf;

use crate::db::session_repository::DEFAULT_MAX_SESSIONS;

/// 10 MiB, the same ceiling the browser widget enforces.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Server settings, read from the environment (a `.env` file is loaded first
/// by `main`).
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Chat sessions kept in memory before the idlest is dropped.
    pub max_sessions: usize,
    /// `None` allows any origin.
    pub allowed_origins: Option<Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            upload_dir: PathBuf::from("./uploads"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_sessions: DEFAULT_MAX_SESSIONS,
            allowed_origins: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            port: get("PORT").and_then(|p| p.parse().ok()).unwrap_or(defaults.port),
            upload_dir: get("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.upload_dir),
            max_upload_bytes: get("MAX_UPLOAD_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_upload_bytes),
            max_sessions: get("MAX_SESSIONS")
                .and_then(|v| v.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(defaults.max_sessions),
            allowed_origins: get("ALLOWED_ORIGINS").and_then(|v| parse_origins(&v)),
        }
    }
}

fn parse_origins(raw: &str) -> Option<Vec<String>> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        None
    } else {
        Some(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = Config::from_lookup(lookup(&[]));
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.max_upload_bytes, 10_485_760);
        assert_eq!(cfg.upload_dir, PathBuf::from("./uploads"));
        assert_eq!(cfg.max_sessions, 1000);
        assert!(cfg.allowed_origins.is_none());
    }

    #[test]
    fn reads_overrides_and_ignores_garbage() {
        let cfg = Config::from_lookup(lookup(&[
            ("PORT", "not-a-port"),
            ("UPLOAD_DIR", "/tmp/docs"),
            ("MAX_UPLOAD_BYTES", "2048"),
            ("MAX_SESSIONS", "0"),
            ("ALLOWED_ORIGINS", "http://localhost:8080, http://127.0.0.1:8080"),
        ]));
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.upload_dir, PathBuf::from("/tmp/docs"));
        assert_eq!(cfg.max_upload_bytes, 2048);
        assert_eq!(cfg.max_sessions, 1000);
        assert_eq!(
            cfg.allowed_origins,
            Some(vec!["http://localhost:8080".to_string(), "http://127.0.0.1:8080".to_string()])
        );
    }

    #[test]
    fn wildcard_origin_allows_any() {
        let cfg = Config::from_lookup(lookup(&[("ALLOWED_ORIGINS", "*")]));
        assert!(cfg.allowed_origins.is_none());
    }
}
