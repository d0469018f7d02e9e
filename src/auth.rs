use std::collections::HashMap;

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::GatewayError;

const BASIC_PREFIX: &str = "Basic ";

/// Source of truth for which username/password pairs may use the gateway.
pub trait CredentialStore: Send + Sync {
    fn lookup(&self, username: &str) -> Option<&str>;
}

/// Credential table loaded once from configuration.
#[derive(Debug, Default)]
pub struct StaticCredentials(HashMap<String, String>);

impl StaticCredentials {
    pub fn new(table: HashMap<String, String>) -> Self {
        Self(table)
    }
}

impl CredentialStore for StaticCredentials {
    fn lookup(&self, username: &str) -> Option<&str> {
        self.0.get(username).map(String::as_str)
    }
}

#[derive(PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Parse a `Basic` Authorization header value.
///
/// The decoded text is split at the first `:` so passwords may contain colons.
pub fn extract_credentials(header: Option<&str>) -> Result<Credentials, GatewayError> {
    let header = header.ok_or(GatewayError::AuthMissing)?;

    let encoded = header
        .strip_prefix(BASIC_PREFIX)
        .ok_or(GatewayError::AuthMalformed)?;

    let decoded = STANDARD
        .decode(encoded)
        .map_err(|_| GatewayError::AuthMalformed)?;
    let decoded = String::from_utf8(decoded).map_err(|_| GatewayError::AuthMalformed)?;

    let (username, password) = decoded
        .split_once(':')
        .ok_or(GatewayError::AuthMalformed)?;

    Ok(Credentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

pub fn authenticate(store: &dyn CredentialStore, creds: &Credentials) -> bool {
    // TODO compare in constant time once the store can hold hashed passwords
    store
        .lookup(&creds.username)
        .is_some_and(|password| password == creds.password)
}

/// Run extraction and authentication against the inbound headers.
pub fn check(store: &dyn CredentialStore, headers: &HeaderMap) -> Result<Credentials, GatewayError> {
    let header = match headers.get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| GatewayError::AuthMalformed)?),
        None => None,
    };

    let creds = extract_credentials(header)?;

    if authenticate(store, &creds) {
        Ok(creds)
    } else {
        Err(GatewayError::AuthInvalid)
    }
}
