//! Router layers and endpoints shared by both services

use crate::common::locator::Service;
use crate::common::Result;
use crate::common::tracing_middleware::request_tracing_middleware;
use axum::{middleware, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};

/// Wrap a service router with tracing, permissive CORS and a body size limit.
/// Tracing is outermost, so rejected requests are logged too.
pub fn with_service_layers(router: Router, body_limit: usize) -> Router {
    router
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(request_tracing_middleware))
}

/// Body of `GET /health`
pub fn health_body(service: Service) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": service.name(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Serve `router` on `listener` until Ctrl-C.
pub async fn run(listener: TcpListener, router: Router) -> Result<()> {
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::tracing_middleware::REQUEST_ID_HEADER;
    use axum::body::Body;
    use axum::extract::rejection::JsonRejection;
    use axum::http::{header, Request, StatusCode};
    use axum::routing::post;
    use tower::ServiceExt;

    async fn echo(payload: std::result::Result<Json<Value>, JsonRejection>) -> Result<Json<Value>> {
        let Json(value) = payload?;
        Ok(Json(value))
    }

    fn app() -> Router {
        with_service_layers(Router::new().route("/", post(echo)), 16)
    }

    fn oversized() -> String {
        json!({ "message": "x".repeat(64) }).to_string()
    }

    #[tokio::test]
    async fn test_small_body_passes() {
        let response = app()
            .oneshot(
                Request::post("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected_with_413() {
        let body = oversized();
        let declared = app()
            .oneshot(
                Request::post("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::CONTENT_LENGTH, body.len())
                    .body(Body::from(body.clone()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(declared.status(), StatusCode::PAYLOAD_TOO_LARGE);

        // No Content-Length: the limit trips while the extractor buffers.
        let chunks = futures_util::stream::iter(vec![Ok::<_, std::io::Error>(body)]);
        let streamed = app()
            .oneshot(
                Request::post("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from_stream(chunks))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(streamed.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_cross_origin_requests_allowed() {
        let response = app()
            .oneshot(
                Request::post("/")
                    .header(header::ORIGIN, "http://example.com")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }
}
