//! Configuration for minipost services

use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Environment variable naming an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "MINIPOST_CONFIG";

/// Service configuration, shared by both binaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Bind address for the HTTP API
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub peers: PeerConfig,

    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub policy: PolicyConfig,

    /// Maximum inbound request body, in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,

    /// Logging level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}
fn default_body_limit() -> usize {
    64 * 1024
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            store: StoreConfig::default(),
            peers: PeerConfig::default(),
            client: ClientConfig::default(),
            policy: PolicyConfig::default(),
            body_limit: default_body_limit(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load from the optional TOML file named by `MINIPOST_CONFIG`, then
    /// `MINIPOST__*` environment variables (`MINIPOST__STORE__BACKEND=sled`).
    pub fn load() -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            builder = builder.add_source(config::File::with_name(&path).required(false));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix("MINIPOST")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Load from a TOML string. Used by tests and embedders.
    pub fn from_toml(source: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn port(&self) -> u16 {
        self.bind_addr.port()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Sled,
}

/// Document store settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Connection string; the data directory for the sled backend
    pub connection: Option<String>,

    /// Database name; prefixes every collection
    pub database: Option<String>,
}

/// Logical names of the sibling services, resolved per call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeerConfig {
    /// Posts service host (`posts`, `posts:5000` or `http://posts:5000`)
    pub posts: Option<String>,

    /// Comments service host
    pub comments: Option<String>,

    /// Port used when a peer name carries none; defaults to our own port
    pub port: Option<u16>,
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Timeout for every sibling service call
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum concurrent comment lookups per aggregation
    #[serde(default = "default_fan_out_limit")]
    pub fan_out_limit: usize,
}

fn default_timeout_ms() -> u64 {
    5_000
}
fn default_fan_out_limit() -> usize {
    16
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            fan_out_limit: default_fan_out_limit(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn build_http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout())
            .build()
            .map_err(|e| Error::InvalidConfig(format!("http client: {}", e)))
    }
}

/// What the posts listing does when one comment lookup fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationPolicy {
    /// The whole listing fails
    #[default]
    FailFast,
    /// The post is returned with `comments: null`
    Degrade,
}

/// What comment creation does when the posts service cannot be reached
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnreachablePolicy {
    /// Treat as "post not found" (400)
    #[default]
    NotFound,
    /// Surface the upstream failure (500)
    UpstreamError,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default)]
    pub aggregation: AggregationPolicy,

    #[serde(default)]
    pub unreachable_posts: UnreachablePolicy,
}
