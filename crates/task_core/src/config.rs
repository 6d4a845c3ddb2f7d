use serde::{Deserialize, Serialize};

const DEFAULT_API_BASE: &str = "http://localhost:5000/api/v1";
const CONFIG_FILE_PATH: &str = "config.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub http_proxy: String,
    #[serde(default)]
    pub https_proxy: String,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        let mut config = Config {
            api_base: default_api_base(),
            http_proxy: String::new(),
            https_proxy: String::new(),
        };

        // Try to read from config.toml first
        if std::path::Path::new(CONFIG_FILE_PATH).exists() {
            if let Ok(content) = std::fs::read_to_string(CONFIG_FILE_PATH) {
                if let Ok(file_config) = toml::from_str::<Config>(&content) {
                    config = file_config;
                }
            }
        }

        // Override with environment variables if they exist
        if let Ok(api_base) = std::env::var("TASKDECK_API_BASE") {
            config.api_base = api_base;
        }
        if let Ok(http_proxy) = std::env::var("HTTP_PROXY") {
            config.http_proxy = http_proxy;
        }
        if let Ok(https_proxy) = std::env::var("HTTPS_PROXY") {
            config.https_proxy = https_proxy;
        }
        config
    }

    /// Config pointing at an explicit API base, proxies untouched.
    /// Mostly useful in tests against a local mock server.
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Config {
            api_base: api_base.into(),
            http_proxy: String::new(),
            https_proxy: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_config_fills_missing_fields_with_defaults() {
        let config: Config = toml::from_str("").expect("empty config");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert!(config.http_proxy.is_empty());
        assert!(config.https_proxy.is_empty());
    }

    #[test]
    fn file_config_overrides_api_base() {
        let config: Config =
            toml::from_str(r#"api_base = "https://tasks.example.com/api/v1""#).expect("config");
        assert_eq!(config.api_base, "https://tasks.example.com/api/v1");
    }

    #[test]
    fn with_api_base_leaves_proxies_empty() {
        let config = Config::with_api_base("http://127.0.0.1:9000");
        assert_eq!(config.api_base, "http://127.0.0.1:9000");
        assert!(config.http_proxy.is_empty());
    }
}
