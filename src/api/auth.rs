//! Client wrappers for the auth endpoints. These carry credentials, so the
//! payloads are never logged.

use serde::{Deserialize, Serialize};

use crate::api::Envelope;
use crate::error::Error;
use crate::session::Identity;
use crate::transport::Transport;

/// Token issued by a successful login or registration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenGrant {
    pub token: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
}

/// Exchanges credentials for a bearer token.
///
/// # Errors
/// Propagates transport failures; a rejected login arrives as a non-zero
/// envelope code.
pub async fn login(
    transport: &Transport,
    username: &str,
    password: &str,
) -> Result<Envelope<TokenGrant>, Error> {
    transport
        .post("/api/v1/auth/login", &LoginRequest { username, password })
        .await
}

/// Creates an account and returns its first bearer token.
///
/// # Errors
/// Propagates transport failures; a rejected registration arrives as a
/// non-zero envelope code.
pub async fn register(
    transport: &Transport,
    request: &RegisterRequest,
) -> Result<Envelope<TokenGrant>, Error> {
    transport.post("/api/v1/auth/register", request).await
}

/// Fetches the identity of the current credential.
///
/// # Errors
/// Propagates transport failures, including the 401 interception.
pub async fn me(transport: &Transport) -> Result<Envelope<Identity>, Error> {
    transport.get("/api/v1/auth/me").await
}
