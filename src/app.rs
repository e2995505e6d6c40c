use crate::{handlers::*, services::ContractService};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

pub const API_PREFIX: &str = "/api-v1";

/// Inline base64 documents can reach 4.5 MB; leave room for the rest.
pub const BODY_LIMIT_BYTES: usize = 20 * 1024 * 1024;

pub fn build_router(contracts: Arc<dyn ContractService>, cors_origin: Option<&str>) -> Router {
    let api = Router::new()
        .route("/contracts/create", post(create_contract))
        .route("/contracts/:id", get(find_contract))
        .with_state(ContractsState { contracts });

    let health = Router::new()
        .route("/health", get(health_check))
        .with_state(HealthState {
            started_at: Instant::now(),
        });

    Router::new()
        .nest(API_PREFIX, api)
        .merge(health)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::default().include_headers(false)),
                )
                .layer(SetResponseHeaderLayer::overriding(
                    HeaderName::from_static("x-robots-tag"),
                    HeaderValue::from_static("noindex, nofollow"),
                ))
                .layer(cors_layer(cors_origin)),
        )
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    match origin.map(str::trim) {
        Some("*") => {
            tracing::warn!("Ignoring wildcard CORS origin, credentials are allowed");
            return layer;
        }
        _ => {}
    }

    match origin.map(HeaderValue::from_str) {
        Some(Ok(origin)) => layer.allow_origin(origin),
        Some(Err(_)) => {
            tracing::warn!("Ignoring CORS origin that is not a valid header value");
            layer
        }
        None => layer,
    }
}
