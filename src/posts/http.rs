//! HTTP API for the posts service
//!
//! - `GET /`     all posts, each with its comments
//! - `GET /:id`  one post, no comments; `404` with a `null` body when absent
//! - `POST /`    create a post from `{title, description}`

use crate::common::http::{health_body, with_service_layers};
use crate::common::{NewPost, Post, PostWithComments, Result, Service};
use crate::posts::aggregate::Aggregator;
use crate::posts::store::PostStore;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;

/// Shared posts state for HTTP handlers.
#[derive(Clone)]
pub struct PostsState {
    pub store: PostStore,
    pub aggregator: Arc<Aggregator>,
}

/// Creates the HTTP router with all public endpoints.
pub fn create_router(state: PostsState, body_limit: usize) -> Router {
    let router = Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/health", get(|| async { health_body(Service::Posts) }))
        .route("/:id", get(get_post))
        .with_state(state);
    with_service_layers(router, body_limit)
}

async fn list_posts(State(state): State<PostsState>) -> Result<Json<Vec<PostWithComments>>> {
    let posts = state.store.list()?;
    Ok(Json(state.aggregator.enrich(posts).await?))
}

async fn get_post(State(state): State<PostsState>, Path(id): Path<String>) -> Result<Response> {
    tracing::info!("Incoming request to find post with ID #{}", id);
    Ok(match state.store.get(&id)? {
        Some(post) => Json(post).into_response(),
        None => (StatusCode::NOT_FOUND, Json(Value::Null)).into_response(),
    })
}

async fn create_post(
    State(state): State<PostsState>,
    payload: std::result::Result<Json<NewPost>, JsonRejection>,
) -> Result<(StatusCode, Json<Post>)> {
    let Json(req) = payload?;
    let post = state.store.create(req)?;
    tracing::info!(post_id = %post.id, "Post created");
    Ok((StatusCode::CREATED, Json(post)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::AggregationPolicy;
    use crate::common::{Comment, MemCollection};
    use crate::posts::aggregate::CommentSource;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;

    struct NoComments;

    #[async_trait]
    impl CommentSource for NoComments {
        async fn comments_for_post(&self, _post_id: &str) -> Result<Vec<Comment>> {
            Ok(vec![])
        }
    }

    fn app() -> Router {
        let state = PostsState {
            store: PostStore::new(Arc::new(MemCollection::new())),
            aggregator: Arc::new(Aggregator::new(
                Arc::new(NoComments),
                4,
                AggregationPolicy::FailFast,
            )),
        };
        create_router(state, 64 * 1024)
    }

    async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(body: Value) -> Request<Body> {
        Request::post("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_create_get_and_list() {
        let app = app();
        let (status, created) = call(&app, post_json(json!({ "title": "A", "description": "B" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        let id = created["id"].as_str().unwrap().to_string();

        let (status, fetched) = call(&app, get_req(&format!("/{}", id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);
        assert!(fetched.get("comments").is_none());

        let (status, listed) = call(&app, get_req("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            listed,
            json!([{ "id": id, "title": "A", "description": "B", "comments": [] }])
        );
    }

    #[tokio::test]
    async fn test_get_absent_and_malformed() {
        let app = app();
        let absent = crate::common::DocumentId::generate().to_hex();
        let (status, body) = call(&app, get_req(&format!("/{}", absent))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, Value::Null);

        let (status, body) = call(&app, get_req("/not-an-id")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("not-an-id"));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_payload() {
        let app = app();
        let (status, body) = call(&app, post_json(json!({ "title": "A" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Incorrect payload" }));

        let request = Request::post("/")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, _) = call(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, listed) = call(&app, get_req("/")).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn test_extra_fields_round_trip() {
        let app = app();
        let (_, created) = call(
            &app,
            post_json(json!({ "title": "A", "description": "B", "tags": ["x"] })),
        )
        .await;
        assert_eq!(created["tags"], json!(["x"]));

        let id = created["id"].as_str().unwrap();
        let (_, fetched) = call(&app, get_req(&format!("/{}", id))).await;
        assert_eq!(fetched["tags"], json!(["x"]));
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(&app(), get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "posts");
    }
}
