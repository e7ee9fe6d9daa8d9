use std::time::Duration;

use chrono_tz::Tz;
use serde::Deserialize;

use crate::averages::MalformedPolicy;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub averages: AveragesConfig,
    #[serde(default)]
    pub time: TimeConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub max_pool_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AveragesConfig {
    /// Maximum snapshot age before the next resolve recomputes it.
    #[serde(default = "default_refresh_threshold_secs")]
    pub refresh_threshold_secs: u64,
    /// How often the scheduler calls resolve. Normally far shorter than the threshold.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default)]
    pub on_malformed: MalformedPolicy,
}

fn default_refresh_threshold_secs() -> u64 {
    3600
}

fn default_poll_interval_secs() -> u64 {
    60
}

impl Default for AveragesConfig {
    fn default() -> Self {
        Self {
            refresh_threshold_secs: default_refresh_threshold_secs(),
            poll_interval_secs: default_poll_interval_secs(),
            on_malformed: MalformedPolicy::default(),
        }
    }
}

impl AveragesConfig {
    pub fn refresh_threshold(&self) -> Duration {
        Duration::from_secs(self.refresh_threshold_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeConfig {
    /// IANA zone used to parse reading timestamps and format bucket labels.
    #[serde(default = "default_zone")]
    pub zone: String,
}

fn default_zone() -> String {
    "Europe/Paris".into()
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            zone: default_zone(),
        }
    }
}

impl TimeConfig {
    pub fn tz(&self) -> anyhow::Result<Tz> {
        self.zone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("time.zone {:?} is not a known IANA zone: {}", self.zone, e))
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.database.path.is_empty(),
            "database.path must be non-empty"
        );
        anyhow::ensure!(
            self.database.max_pool_size > 0,
            "database.max_pool_size must be > 0, got {}",
            self.database.max_pool_size
        );
        anyhow::ensure!(
            self.averages.refresh_threshold_secs > 0,
            "averages.refresh_threshold_secs must be > 0, got {}",
            self.averages.refresh_threshold_secs
        );
        anyhow::ensure!(
            self.averages.poll_interval_secs > 0,
            "averages.poll_interval_secs must be > 0, got {}",
            self.averages.poll_interval_secs
        );
        self.time.tz()?;
        Ok(())
    }
}
