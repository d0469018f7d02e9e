pub mod auth;
pub mod config;
pub mod error;
pub mod proxy;
pub mod request;
pub mod response;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::{HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::{routing::any, Router};
use tower_http::trace::TraceLayer;

pub use crate::config::{Config, GatewayConfig};
use crate::proxy::{proxy, Client};
use crate::request::HttpRequest;

#[derive(Clone)]
pub struct AppState {
    config: Arc<GatewayConfig>,
    client: Client,
}

pub fn app(config: &Config) -> Result<Router> {
    let gateway = GatewayConfig::from_config(config)?;
    tracing::debug!("{:?}", &gateway);

    let client = proxy::client().context("Error building backend client")?;
    let state = AppState {
        config: Arc::new(gateway),
        client,
    };

    let router = Router::new()
        .route("/", any(handler))
        .route("/*path", any(handler))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}

#[tracing::instrument(level = "trace", "gateway", skip_all)]
async fn handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let r = HttpRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body: (!body.is_empty()).then_some(body),
    };

    tracing::trace!("{:?}", &r);

    proxy(&state.config, &state.client, r).await.into_response()
}
