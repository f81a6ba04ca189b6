use serde::Deserialize;

use crate::services::EngineConfig;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// SQLite database connection URL
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Redis connection URL; the catalog is read straight from SQLite when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Suggestions returned when the client does not ask for a count
    #[serde(default = "default_recommendation_count")]
    pub default_recommendation_count: usize,

    /// How long the cached exercise catalog stays valid
    #[serde(default = "default_catalog_cache_ttl_secs")]
    pub catalog_cache_ttl_secs: u64,

    /// JSON file of catalog entries imported when the catalog is empty
    #[serde(default)]
    pub catalog_seed_path: Option<String>,

    /// Medium-tier progress (percent) needed before promotion is considered
    #[serde(default = "default_promotion_progress_threshold")]
    pub promotion_progress_threshold: f64,

    #[serde(default = "default_promotion_high_energy_ratio")]
    pub promotion_high_energy_ratio: f64,

    #[serde(default = "default_promotion_window_days")]
    pub promotion_window_days: i64,

    /// Complex exercises leading a promotion list
    #[serde(default = "default_promotion_complex_slots")]
    pub promotion_complex_slots: usize,
}

fn default_database_url() -> String {
    "sqlite://fitness_app.db".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_recommendation_count() -> usize {
    5
}

fn default_catalog_cache_ttl_secs() -> u64 {
    3600
}

fn default_promotion_progress_threshold() -> f64 {
    EngineConfig::default().promotion_progress_threshold
}

fn default_promotion_high_energy_ratio() -> f64 {
    EngineConfig::default().promotion_high_energy_ratio
}

fn default_promotion_window_days() -> i64 {
    EngineConfig::default().promotion_window_days
}

fn default_promotion_complex_slots() -> usize {
    EngineConfig::default().promotion_complex_slots
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Recommendation tunables
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            promotion_progress_threshold: self.promotion_progress_threshold,
            promotion_high_energy_ratio: self.promotion_high_energy_ratio,
            promotion_window_days: self.promotion_window_days,
            promotion_complex_slots: self.promotion_complex_slots,
        }
    }
}
