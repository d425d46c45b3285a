//! Service locator: logical sibling name to base URL

use crate::common::config::PeerConfig;
use crate::common::{Error, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Posts,
    Comments,
}

impl Service {
    pub fn name(&self) -> &'static str {
        match self {
            Service::Posts => "posts",
            Service::Comments => "comments",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolves a sibling to a base URL without a trailing slash. Called once per
/// outbound request, so implementations may change their answer over time.
pub trait ServiceLocator: Send + Sync {
    fn resolve(&self, service: Service) -> Result<String>;
}

/// Locator backed by the configured peer names
#[derive(Debug, Clone)]
pub struct StaticLocator {
    peers: PeerConfig,
    default_port: u16,
}

impl StaticLocator {
    pub fn new(peers: PeerConfig, own_port: u16) -> Self {
        let default_port = peers.port.unwrap_or(own_port);
        Self {
            peers,
            default_port,
        }
    }
}

impl ServiceLocator for StaticLocator {
    fn resolve(&self, service: Service) -> Result<String> {
        let name = match service {
            Service::Posts => self.peers.posts.as_deref(),
            Service::Comments => self.peers.comments.as_deref(),
        }
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            Error::PeerNotConfigured(format!(
                "Environment variable for {} service name not set!",
                service
            ))
        })?;

        let base = if name.contains("://") {
            name.to_string()
        } else if name.contains(':') {
            format!("http://{}", name)
        } else {
            format!("http://{}:{}", name, self.default_port)
        };
        Ok(base.trim_end_matches('/').to_string())
    }
}
