//! API routes.
//!
//! It loads all the API routes and adds the authentication middleware to
//! them.
//!
//! All the API routes have the `/api` prefix. They are mounted a second time
//! under `/api/key/:key` so clients can pass the API key in the path.
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::response::Response;
use axum::routing::get;
use axum::{middleware, Router};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::propagate_header::PropagateHeaderLayer;
use tower_http::request_id::{MakeRequestId, RequestId, SetRequestIdLayer};
use tower_http::trace::{DefaultMakeSpan, TraceLayer};
use tracing::{Level, Span};
use uuid::Uuid;

use super::v1;
use super::v1::context::health_check::handlers::health_check_handler;
use crate::core::auth::Gate;
use crate::core::Engine;

/// The prefix of every API route.
pub const API_URL_PREFIX: &str = "/api";

/// Add all API routes to the router.
#[allow(clippy::needless_pass_by_value)]
pub fn router(engine: Arc<Engine>, gate: Arc<Gate>) -> Router {
    let router = Router::new();

    let router = v1::routes::add(API_URL_PREFIX, router, engine.clone());
    let router = v1::routes::add(&format!("{API_URL_PREFIX}/key/:key"), router, engine);

    router
        .layer(middleware::from_fn_with_state(gate, v1::middlewares::auth::auth))
        .route(&format!("{API_URL_PREFIX}/health_check"), get(health_check_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::DELETE])
                .allow_headers(Any),
        )
        .layer(CompressionLayer::new())
        .layer(SetRequestIdLayer::x_request_id(RequestIdGenerator))
        .layer(PropagateHeaderLayer::new(HeaderName::from_static("x-request-id")))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(|request: &Request, _span: &Span| {
                    let method = request.method().to_string();
                    let uri = request.uri().path().to_string();
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .map(|v| v.to_str().unwrap_or_default())
                        .unwrap_or_default();

                    tracing::info!(target: "API", method = %method, uri = %uri, request_id = %request_id, "request");
                })
                .on_response(|response: &Response, latency: Duration, _span: &Span| {
                    let status_code = response.status();
                    let request_id = response
                        .headers()
                        .get("x-request-id")
                        .map(|v| v.to_str().unwrap_or_default())
                        .unwrap_or_default();
                    let latency_ms = latency.as_millis();

                    tracing::info!(target: "API", latency = %latency_ms, status = %status_code, request_id = %request_id, "response");
                }),
        )
        .layer(SetRequestIdLayer::x_request_id(RequestIdGenerator))
}

#[derive(Clone, Default)]
struct RequestIdGenerator;

impl MakeRequestId for RequestIdGenerator {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string()).ok().map(RequestId::new)
    }
}
