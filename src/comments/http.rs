//! HTTP API for the comments service
//!
//! - `GET /`     all comments
//! - `GET /:id`  comments whose `postId` equals `id`
//! - `POST /`    create a comment from `{postId, message}` after checking the post exists

use crate::comments::validate::CommentService;
use crate::common::http::{health_body, with_service_layers};
use crate::common::{Comment, NewComment, Result, Service};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

/// Shared comments state for HTTP handlers.
#[derive(Clone)]
pub struct CommentsState {
    pub comments: Arc<CommentService>,
}

/// Creates the HTTP router with all public endpoints.
pub fn create_router(state: CommentsState, body_limit: usize) -> Router {
    let router = Router::new()
        .route("/", get(list_comments).post(create_comment))
        .route("/health", get(|| async { health_body(Service::Comments) }))
        .route("/:id", get(list_comments_for_post))
        .with_state(state);
    with_service_layers(router, body_limit)
}

async fn list_comments(State(state): State<CommentsState>) -> Result<Json<Vec<Comment>>> {
    Ok(Json(state.comments.list()?))
}

async fn list_comments_for_post(
    State(state): State<CommentsState>,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<Comment>>> {
    Ok(Json(state.comments.list_for_post(&post_id)?))
}

async fn create_comment(
    State(state): State<CommentsState>,
    payload: std::result::Result<Json<NewComment>, JsonRejection>,
) -> Result<(StatusCode, Json<Comment>)> {
    let Json(req) = payload?;
    let comment = state.comments.create(req).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}
