use anyhow::Result;
use axum::body::Bytes;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::routing::{any, get};
use axum::Router;
use tokio::time::{sleep, Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Backend for trying the gateway by hand:
//   cargo run --example origin
//   cargo run -- --config-path gateway.toml
//   curl -u admin:supersecretpassword localhost:3000/status
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "origin=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let origin = Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/echo", any(echo_handler))
        .route("/api/failure", any(failure_handler))
        .route("/api/timeout", any(timeout_handler));

    let addr = "0.0.0.0:8000";
    tracing::info!("origin listening on {}", addr);
    axum::Server::bind(&addr.parse()?)
        .serve(origin.into_make_service())
        .await?;

    Ok(())
}

async fn status_handler() -> impl axum::response::IntoResponse {
    ([(CONTENT_TYPE, "application/json")], r#"{"ok":true}"#)
}

async fn echo_handler(method: Method, headers: HeaderMap, body: Bytes) -> Bytes {
    tracing::debug!("{} with headers {:?}", method, headers);
    body
}

async fn failure_handler() -> impl axum::response::IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "unexpected error".to_string(),
    )
}

async fn timeout_handler() -> impl axum::response::IntoResponse {
    sleep(Duration::from_secs(60)).await;
    "We shouldn't see this"
}
