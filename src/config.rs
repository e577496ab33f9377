use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::SearchResetPolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Compressed dataset archive read once at startup
    #[serde(default = "default_archive_path")]
    pub archive_path: PathBuf,

    /// Name of the JSON resource inside the archive
    #[serde(default = "default_dataset_entry")]
    pub dataset_entry: String,

    /// Stylesheet served to the presentation layer
    #[serde(default = "default_stylesheet_path")]
    pub stylesheet_path: PathBuf,

    /// Image CDN base URL, without the size segment
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,

    /// Number of recommendations shown per searched film
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,

    /// Clear details/pinned selection when a session searches a new film
    #[serde(default)]
    pub reset_selection_on_search: bool,

    /// Idle time in seconds after which a session is dropped
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_archive_path() -> PathBuf {
    PathBuf::from("data/data_ml_final.zip")
}

fn default_dataset_entry() -> String {
    "data_ml_final.json".to_string()
}

fn default_stylesheet_path() -> PathBuf {
    PathBuf::from("css/style.css")
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_recommendation_limit() -> usize {
    5
}

fn default_session_ttl_secs() -> u64 {
    1800
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            archive_path: default_archive_path(),
            dataset_entry: default_dataset_entry(),
            stylesheet_path: default_stylesheet_path(),
            image_base_url: default_image_base_url(),
            recommendation_limit: default_recommendation_limit(),
            reset_selection_on_search: false,
            session_ttl_secs: default_session_ttl_secs(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn search_reset_policy(&self) -> SearchResetPolicy {
        SearchResetPolicy::from_reset_flag(self.reset_selection_on_search)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_environment() {
        let vars: Vec<(String, String)> = Vec::new();
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.archive_path, PathBuf::from("data/data_ml_final.zip"));
        assert_eq!(config.dataset_entry, "data_ml_final.json");
        assert_eq!(config.image_base_url, "https://image.tmdb.org/t/p");
        assert_eq!(config.recommendation_limit, 5);
        assert!(!config.reset_selection_on_search);
        assert_eq!(config.session_ttl(), Duration::from_secs(1800));
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_overrides_from_environment() {
        let vars = vec![
            ("ARCHIVE_PATH".to_string(), "/srv/films.zip".to_string()),
            ("RECOMMENDATION_LIMIT".to_string(), "3".to_string()),
            ("RESET_SELECTION_ON_SEARCH".to_string(), "true".to_string()),
            ("PORT".to_string(), "8080".to_string()),
            ("SESSION_TTL_SECS".to_string(), "60".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();

        assert_eq!(config.archive_path, PathBuf::from("/srv/films.zip"));
        assert_eq!(config.recommendation_limit, 3);
        assert_eq!(config.search_reset_policy(), SearchResetPolicy::Reset);
        assert_eq!(config.port, 8080);
        assert_eq!(config.session_ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_default_matches_empty_environment() {
        let vars: Vec<(String, String)> = Vec::new();
        let from_env: Config = envy::from_iter(vars).unwrap();
        let default = Config::default();

        assert_eq!(from_env.archive_path, default.archive_path);
        assert_eq!(from_env.stylesheet_path, default.stylesheet_path);
        assert_eq!(default.search_reset_policy(), SearchResetPolicy::Keep);
    }
}
