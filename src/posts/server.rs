//! Posts server

use crate::common::http::run;
use crate::common::{Config, Database, Result, StaticLocator};
use crate::posts::aggregate::Aggregator;
use crate::posts::comments_client::CommentsClient;
use crate::posts::http::{create_router, PostsState};
use crate::posts::store::{PostStore, POSTS_COLLECTION};
use axum::Router;
use std::sync::Arc;

/// Assemble the posts router over `database`, talking to the comments
/// service named in `config.peers`.
pub fn build_router(config: &Config, database: &Database) -> Result<Router> {
    let store = PostStore::new(database.collection(POSTS_COLLECTION)?);
    let locator = Arc::new(StaticLocator::new(config.peers.clone(), config.port()));
    let comments = CommentsClient::new(config.client.build_http_client()?, locator);
    let aggregator = Aggregator::new(
        Arc::new(comments),
        config.client.fan_out_limit,
        config.policy.aggregation,
    );

    let state = PostsState {
        store,
        aggregator: Arc::new(aggregator),
    };
    Ok(create_router(state, config.body_limit))
}

pub struct PostsServer {
    config: Config,
}

impl PostsServer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn serve(self) -> Result<()> {
        tracing::info!("Starting posts service");
        tracing::info!("  HTTP API: {}", self.config.bind_addr);
        tracing::info!("  Store: {:?}", self.config.store.backend);
        match &self.config.peers.comments {
            Some(name) => tracing::info!("  Comments service: {}", name),
            None => tracing::warn!("  Comments service name not set, listing will fail"),
        }

        let database = Database::open(&self.config.store)?;
        let router = build_router(&self.config, &database)?;

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!("✓ Posts service ready");
        run(listener, router).await
    }
}
