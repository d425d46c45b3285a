//! Comment lookups against the comments service

use crate::common::utils::segment_url;
use crate::common::{Comment, Error, Result, Service, ServiceLocator};
use crate::posts::aggregate::CommentSource;
use async_trait::async_trait;
use std::sync::Arc;

/// HTTP client for the comments service's list-by-post endpoint
pub struct CommentsClient {
    http: reqwest::Client,
    locator: Arc<dyn ServiceLocator>,
}

impl CommentsClient {
    pub fn new(http: reqwest::Client, locator: Arc<dyn ServiceLocator>) -> Self {
        Self { http, locator }
    }
}

#[async_trait]
impl CommentSource for CommentsClient {
    async fn comments_for_post(&self, post_id: &str) -> Result<Vec<Comment>> {
        let service = Service::Comments.name();
        let url = segment_url(&self.locator.resolve(Service::Comments)?, post_id);
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::upstream(service, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::upstream(
                service,
                format!("GET {} returned {}", url, status),
            ));
        }

        response
            .json::<Vec<Comment>>()
            .await
            .map_err(|e| Error::upstream(service, e))
    }
}
