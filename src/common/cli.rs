//! Command-line overrides shared by both binaries
//!
//! Each flag also reads the plain environment variable the services have
//! always been deployed with.

use crate::common::config::{Config, StoreBackend};
use clap::Args;
use std::net::{IpAddr, SocketAddr};

#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Listening port
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Listening address
    #[arg(long)]
    pub bind: Option<IpAddr>,

    /// Store backend (implied `sled` when --db is given)
    #[arg(long, value_enum)]
    pub backend: Option<StoreBackend>,

    /// Database connection string (sled data directory)
    #[arg(long, env = "DBCONNECTIONSTRING")]
    pub db: Option<String>,

    /// Database name
    #[arg(long = "db-name", env = "DBNAME")]
    pub db_name: Option<String>,

    /// Port of the sibling service when its name carries none
    #[arg(long, env = "PEER_PORT")]
    pub peer_port: Option<u16>,

    /// Timeout for sibling service calls, in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}

impl ServeArgs {
    /// Apply the flags that were given on top of `config`.
    pub fn apply(self, config: &mut Config) {
        let ip = self.bind.unwrap_or(config.bind_addr.ip());
        let port = self.port.unwrap_or(config.bind_addr.port());
        config.bind_addr = SocketAddr::new(ip, port);

        if self.db.is_some() {
            config.store.connection = self.db;
            config.store.backend = StoreBackend::Sled;
        }
        if let Some(backend) = self.backend {
            config.store.backend = backend;
        }
        if self.db_name.is_some() {
            config.store.database = self.db_name;
        }
        if self.peer_port.is_some() {
            config.peers.port = self.peer_port;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.client.timeout_ms = timeout_ms;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
    }
}
