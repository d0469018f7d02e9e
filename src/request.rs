use std::fmt;

use axum::body::Bytes;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, Method};
use axum::response::{IntoResponse, Response as AxumResponse};

use crate::error::GatewayError;
use crate::response::BackendResponse;

pub struct HttpRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

struct RedactedHeaders<'a>(&'a HeaderMap);

impl fmt::Debug for RedactedHeaders<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, value) in self.0.iter() {
            if *name == AUTHORIZATION {
                map.entry(name, &"<redacted>");
            } else {
                map.entry(name, value);
            }
        }
        map.finish()
    }
}

// Authorization carries reversible credentials and must never reach the logs.
impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("headers", &RedactedHeaders(&self.headers))
            .field("body", &self.body)
            .finish()
    }
}

#[derive(Debug)]
pub enum State {
    // request has been received
    Start(HttpRequest),
    // credentials are being checked
    Authenticating(HttpRequest),
    // request to the backend is in progress
    Forwarding(HttpRequest),
    // backend answered and the answer is being copied to the caller
    Relaying(BackendResponse),
}

pub enum Outcome {
    Unauthorized(GatewayError),
    UpstreamError(GatewayError),
    Done(AxumResponse),
}

pub enum Step {
    Continue(State),
    Halt(Outcome),
}

impl IntoResponse for Outcome {
    fn into_response(self) -> AxumResponse {
        match self {
            Outcome::Unauthorized(error) | Outcome::UpstreamError(error) => error.into_response(),
            Outcome::Done(response) => response,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn debug_redacts_authorization() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_static("Basic YWRtaW46c3VwZXJzZWNyZXRwYXNzd29yZA=="),
        );
        headers.insert("accept", HeaderValue::from_static("application/json"));
        let req = HttpRequest {
            method: Method::POST,
            path: "/users".to_string(),
            query: None,
            headers,
            body: Some(Bytes::from_static(b"{}")),
        };

        let debug = format!("{:?}", req);

        assert!(!debug.contains("YWRtaW46c3VwZXJzZWNyZXRwYXNzd29yZA=="));
        assert!(debug.contains("<redacted>"));
        assert!(debug.contains("application/json"));
        assert!(debug.contains("/users"));
    }
}
