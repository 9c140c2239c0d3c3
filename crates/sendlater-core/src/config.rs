use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BIND: &str = "127.0.0.1";
/// Polling cadence of the scheduler loop. Due jobs are delivered at most
/// one interval late.
pub const DEFAULT_TICK_SECS: u64 = 60;

/// Top-level config (sendlater.toml + SENDLATER_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SendlaterConfig {
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_tick_secs")]
    pub tick_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_secs: DEFAULT_TICK_SECS,
        }
    }
}

impl SendlaterConfig {
    /// Load config from `config_path` (or the default location) merged with
    /// `SENDLATER_*` environment overrides, e.g. `SENDLATER_GATEWAY_PORT`.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);

        let config: SendlaterConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("SENDLATER_").split("_"))
            .extract()
            .map_err(|e| crate::error::SendlaterError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_tick_secs() -> u64 {
    DEFAULT_TICK_SECS
}

fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.sendlater/sendlater.db", home)
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.sendlater/sendlater.toml", home)
}
