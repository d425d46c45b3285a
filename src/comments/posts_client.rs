//! Existence checks against the posts service

use crate::common::utils::segment_url;
use crate::common::{Error, Post, Result, Service, ServiceLocator};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;

/// Remote existence check for a post.
///
/// `Ok(false)` means the posts service answered and has no such post.
/// `Err(Error::Upstream)` means it could not be asked; callers decide what
/// that means for them. `Err(Error::PeerNotConfigured)` means there is no
/// address to ask.
#[async_trait]
pub trait PostLookup: Send + Sync {
    async fn exists(&self, post_id: &str) -> Result<bool>;
}

/// `PostLookup` over the posts service's `GET /:id`
pub struct PostsClient {
    http: reqwest::Client,
    locator: Arc<dyn ServiceLocator>,
}

impl PostsClient {
    pub fn new(http: reqwest::Client, locator: Arc<dyn ServiceLocator>) -> Self {
        Self { http, locator }
    }
}

#[async_trait]
impl PostLookup for PostsClient {
    async fn exists(&self, post_id: &str) -> Result<bool> {
        // URL parsing collapses dot segments onto another route.
        if post_id == "." || post_id == ".." {
            return Ok(false);
        }
        let service = Service::Posts.name();
        let url = segment_url(&self.locator.resolve(Service::Posts)?, post_id);
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::upstream(service, e))?;

        match response.status() {
            status if status.is_success() => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| Error::upstream(service, e))?;
                if body.is_empty() {
                    return Ok(false);
                }
                let reply: serde_json::Value =
                    serde_json::from_slice(&body).map_err(|e| Error::upstream(service, e))?;
                // Anything but this post came from another route.
                Ok(serde_json::from_value::<Post>(reply)
                    .map(|post| post.id == post_id)
                    .unwrap_or(false))
            }
            // A malformed id cannot name a post.
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => Ok(false),
            status => Err(Error::upstream(
                service,
                format!("GET {} returned {}", url, status),
            )),
        }
    }
}
