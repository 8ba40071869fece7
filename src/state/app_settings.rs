use football_api::client::FOOTBALL_DATA_V4;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CONCURRENCY: usize = 4;
const DEFAULT_LOG_FILTER: &str = "info";

/// Process configuration, read from the environment (and `.env`, loaded by
/// `main` before this runs).
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub api_key: Option<String>,
    pub api_url: String,
    pub request_timeout: Duration,
    pub detail_concurrency: usize,
    pub log_filter: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: FOOTBALL_DATA_V4.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            detail_concurrency: DEFAULT_CONCURRENCY,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Invalid or blank values fall back to defaults rather than failing
    /// startup; a missing API key is reported per request.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            api_key: get("FOOTBALL_DATA_API_KEY"),
            api_url: get("FOOTBOT_API_URL").unwrap_or(defaults.api_url),
            request_timeout: get("FOOTBOT_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            detail_concurrency: get("FOOTBOT_CONCURRENCY")
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.detail_concurrency),
            log_filter: get("RUST_LOG").unwrap_or(defaults.log_filter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> AppSettings {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppSettings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let s = settings(&[]);
        assert_eq!(s.api_key, None);
        assert_eq!(s.api_url, FOOTBALL_DATA_V4);
        assert_eq!(s.request_timeout, Duration::from_secs(10));
        assert_eq!(s.detail_concurrency, 4);
        assert_eq!(s.log_filter, "info");
    }

    #[test]
    fn values_are_read_and_trimmed() {
        let s = settings(&[
            ("FOOTBALL_DATA_API_KEY", " abc123 "),
            ("FOOTBOT_API_URL", "http://localhost:8080/v4"),
            ("FOOTBOT_TIMEOUT_SECS", "3"),
            ("FOOTBOT_CONCURRENCY", "8"),
            ("RUST_LOG", "footbot=debug"),
        ]);
        assert_eq!(s.api_key.as_deref(), Some("abc123"));
        assert_eq!(s.api_url, "http://localhost:8080/v4");
        assert_eq!(s.request_timeout, Duration::from_secs(3));
        assert_eq!(s.detail_concurrency, 8);
        assert_eq!(s.log_filter, "footbot=debug");
    }

    #[test]
    fn invalid_numbers_and_blank_key_fall_back() {
        let s = settings(&[
            ("FOOTBALL_DATA_API_KEY", "   "),
            ("FOOTBOT_TIMEOUT_SECS", "0"),
            ("FOOTBOT_CONCURRENCY", "lots"),
        ]);
        assert_eq!(s.api_key, None);
        assert_eq!(s.request_timeout, Duration::from_secs(10));
        assert_eq!(s.detail_concurrency, 4);
    }
}
