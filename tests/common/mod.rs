use std::collections::HashMap;
use std::net::{SocketAddr, TcpListener};
use std::sync::Once;

use axum::Router;
use http_auth_basic::Credentials;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gatehouse::Config;

static TRACING_INITIALIZED: Once = Once::new();

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "supersecretpassword";

// Help function to add tracing to tests
// Note: This is safe to use for multiple tests, but since tests are run concurrently the
// output may be interleaved
#[allow(dead_code)]
pub fn enable_tracing() {
    TRACING_INITIALIZED.call_once(|| {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "gatehouse=trace".into()),
            )
            .with(tracing_subscriber::fmt::layer())
            .init();
    });
}

pub fn config(backend: SocketAddr) -> Config {
    Config {
        backend_base_url: format!("http://{}/api", backend),
        timeout_ms: 2_000,
        credentials: HashMap::from([(USERNAME.to_string(), PASSWORD.to_string())]),
        ..Default::default()
    }
}

pub fn basic(username: &str, password: &str) -> String {
    Credentials::new(username, password).as_http_header()
}

pub fn authorization() -> String {
    basic(USERNAME, PASSWORD)
}

// Serve `app` on an ephemeral port for the lifetime of the test runtime.
pub fn spawn_backend(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service())
            .await
            .unwrap();
    });

    addr
}

// An address nothing is listening on.
#[allow(dead_code)]
pub fn unreachable_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}
