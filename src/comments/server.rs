//! Comments server

use crate::comments::http::{create_router, CommentsState};
use crate::comments::posts_client::PostsClient;
use crate::comments::store::{CommentStore, COMMENTS_COLLECTION};
use crate::comments::validate::CommentService;
use crate::common::http::run;
use crate::common::{Config, Database, Result, StaticLocator};
use axum::Router;
use std::sync::Arc;

/// Assemble the comments router over `database`, validating against the
/// posts service named in `config.peers`.
pub fn build_router(config: &Config, database: &Database) -> Result<Router> {
    let store = CommentStore::new(database.collection(COMMENTS_COLLECTION)?);
    let locator = Arc::new(StaticLocator::new(config.peers.clone(), config.port()));
    let posts = PostsClient::new(config.client.build_http_client()?, locator);
    let service = CommentService::new(store, Arc::new(posts), config.policy.unreachable_posts);

    let state = CommentsState {
        comments: Arc::new(service),
    };
    Ok(create_router(state, config.body_limit))
}

pub struct CommentsServer {
    config: Config,
}

impl CommentsServer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn serve(self) -> Result<()> {
        tracing::info!("Starting comments service");
        tracing::info!("  HTTP API: {}", self.config.bind_addr);
        tracing::info!("  Store: {:?}", self.config.store.backend);
        match &self.config.peers.posts {
            Some(name) => tracing::info!("  Posts service: {}", name),
            None => tracing::warn!("  Posts service name not set, comment creation will fail"),
        }
        tracing::info!(
            "  Unreachable posts service: {:?}",
            self.config.policy.unreachable_posts
        );

        let database = Database::open(&self.config.store)?;
        let router = build_router(&self.config, &database)?;

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!("✓ Comments service ready");
        run(listener, router).await
    }
}
