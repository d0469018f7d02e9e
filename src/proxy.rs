use axum::http::header::{AUTHORIZATION, CONTENT_LENGTH, TRANSFER_ENCODING};
use axum::http::{HeaderMap, Method};
use tokio::time::timeout;

use crate::auth;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::request::{HttpRequest, Outcome, State, Step};
use crate::response::{relay, transform_response, BackendResponse};

pub type Client = reqwest::Client;

pub fn client() -> reqwest::Result<Client> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
}

pub async fn proxy(config: &GatewayConfig, client: &Client, req: HttpRequest) -> Outcome {
    let p = Proxy { config, client };

    let mut state = State::Start(req);
    loop {
        match p.next(state).await {
            Step::Continue(next_state) => {
                state = next_state;
            }
            Step::Halt(outcome) => {
                return outcome;
            }
        }
    }
}

pub struct Proxy<'a> {
    pub config: &'a GatewayConfig,
    pub client: &'a Client,
}

impl<'a> Proxy<'a> {
    pub async fn next(&self, state: State) -> Step {
        match state {
            State::Start(req) => {
                tracing::trace!("{} {} received", req.method, req.path);
                Step::Continue(State::Authenticating(req))
            }
            State::Authenticating(req) => {
                match auth::check(self.config.credentials.as_ref(), &req.headers) {
                    Ok(creds) => {
                        tracing::trace!("authenticated {}", creds.username);
                        Step::Continue(State::Forwarding(req))
                    }
                    Err(error) => {
                        tracing::debug!("rejecting {} {}: {}", req.method, req.path, error);
                        Step::Halt(Outcome::Unauthorized(error))
                    }
                }
            }
            State::Forwarding(req) => match send_request(self.config, self.client, req).await {
                Ok(response) => Step::Continue(State::Relaying(response)),
                Err(error) => {
                    tracing::warn!("Error proxying to backend: {}", error);
                    Step::Halt(Outcome::UpstreamError(error))
                }
            },
            State::Relaying(response) => Step::Halt(Outcome::Done(relay(response))),
        }
    }
}

fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

// The query string is intentionally not appended.
pub fn outbound_url(backend_base_url: &str, req: &HttpRequest) -> String {
    format!("{}{}", backend_base_url, req.path)
}

/// Inbound headers minus credentials and framing; the client frames the buffered body itself.
pub fn outbound_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut headers = inbound.clone();
    headers.remove(AUTHORIZATION);
    headers.remove(CONTENT_LENGTH);
    headers.remove(TRANSFER_ENCODING);
    headers
}

pub async fn send_request(
    config: &GatewayConfig,
    client: &Client,
    req: HttpRequest,
) -> Result<BackendResponse, GatewayError> {
    let url = outbound_url(&config.backend_base_url, &req);

    let mut builder = client
        .request(req.method.clone(), &url)
        .headers(outbound_headers(&req.headers));

    if carries_body(&req.method) {
        builder = builder.body(req.body.unwrap_or_default());
    }

    // send and body read are one exchange under one deadline
    let exchange = async move {
        let response = builder.send().await?;
        transform_response(response).await
    };

    let response = match timeout(config.timeout, exchange).await {
        Ok(Ok(response)) => response,
        Ok(Err(error)) => return Err(GatewayError::UpstreamUnreachable(error.to_string())),
        Err(_) => {
            tracing::debug!("Timeout for {} {}", req.method, url);
            return Err(GatewayError::UpstreamUnreachable(format!(
                "request to {} timed out after {}ms",
                url,
                config.timeout.as_millis()
            )));
        }
    };

    tracing::debug!(
        "Proxy {} {} --> {} with {} response",
        req.method,
        req.path,
        url,
        response.status()
    );

    Ok(response)
}
