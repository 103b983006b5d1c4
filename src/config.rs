use shuttle_runtime::SecretStore;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_DEBOUNCE_MS: u64 = 200;
pub const DEFAULT_SERVER_NAME: &str = "Toolbox MCP Server";

/// Runtime settings read from `Secrets.toml`
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_name: String,
    pub search_debounce: Duration,
    pub recommendations_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_name: DEFAULT_SERVER_NAME.to_string(),
            search_debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            recommendations_url: None,
        }
    }
}

impl AppConfig {
    pub fn from_secrets(secrets: &SecretStore) -> Self {
        Self::from_lookup(|key| secrets.get(key))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let search_debounce = match lookup("SEARCH_DEBOUNCE_MS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(_) => {
                    warn!(
                        "Ignoring invalid SEARCH_DEBOUNCE_MS value {:?}, using {}ms",
                        raw, DEFAULT_DEBOUNCE_MS
                    );
                    defaults.search_debounce
                }
            },
            None => defaults.search_debounce,
        };

        Self {
            server_name: lookup("SERVER_NAME")
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(defaults.server_name),
            search_debounce,
            recommendations_url: lookup("RECOMMENDATIONS_URL")
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config_from(&[]);
        assert_eq!(config.server_name, DEFAULT_SERVER_NAME);
        assert_eq!(config.search_debounce, Duration::from_millis(200));
        assert!(config.recommendations_url.is_none());
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("SERVER_NAME", "Utilities"),
            ("SEARCH_DEBOUNCE_MS", "350"),
            ("RECOMMENDATIONS_URL", " https://example.com/recs "),
        ]);
        assert_eq!(config.server_name, "Utilities");
        assert_eq!(config.search_debounce, Duration::from_millis(350));
        assert_eq!(
            config.recommendations_url.as_deref(),
            Some("https://example.com/recs")
        );
    }

    #[test]
    fn invalid_debounce_falls_back() {
        let config = config_from(&[("SEARCH_DEBOUNCE_MS", "soon"), ("RECOMMENDATIONS_URL", "")]);
        assert_eq!(config.search_debounce, Duration::from_millis(200));
        assert!(config.recommendations_url.is_none());
    }
}
