use axum::body::{boxed, Bytes, Full};
use axum::http::header::{CONTENT_ENCODING, TRANSFER_ENCODING};
use axum::http::{HeaderName, Response};
use axum::response::Response as AxumResponse;

/// Status, headers and fully-read body of one backend exchange.
pub type BackendResponse = Response<Bytes>;

pub async fn transform_response(response: reqwest::Response) -> reqwest::Result<BackendResponse> {
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await?;

    let mut backend = Response::new(body);
    *backend.status_mut() = status;
    *backend.headers_mut() = headers;
    Ok(backend)
}

// The body was decoded while reading it, so encoding headers would lie.
fn is_relayed(name: &HeaderName) -> bool {
    *name != CONTENT_ENCODING && *name != TRANSFER_ENCODING
}

pub fn relay(backend: BackendResponse) -> AxumResponse {
    let (parts, body) = backend.into_parts();

    let mut response = Response::new(boxed(Full::from(body)));
    *response.status_mut() = parts.status;

    let headers = response.headers_mut();
    for (name, value) in parts.headers.iter() {
        if is_relayed(name) {
            headers.append(name.clone(), value.clone());
        }
    }

    response
}
