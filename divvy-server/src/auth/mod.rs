//! Diner JWT authentication
//!
//! Token issuance (login/registration) lives outside this service; every
//! endpoint here only *verifies* a bearer token and resolves the acting
//! diner's identity from it.

pub mod permissions;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::{AppError, ReturnCode};

use crate::state::AppState;

/// JWT claims for diner authentication.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// User email
    pub email: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated diner identity extracted from a verified token.
#[derive(Debug, Clone)]
pub struct Diner {
    pub user_id: i64,
    pub email: String,
}

const JWT_EXPIRY_HOURS: i64 = 24;

/// Create a JWT token for a user (exposed for tests and tooling; the
/// production issuer is the external credential service).
pub fn create_token(
    user_id: i64,
    email: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Middleware that extracts and verifies the diner JWT from the
/// Authorization header, inserting a [`Diner`] into request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::new(ReturnCode::Unauthorized).into_response())?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::new(ReturnCode::Unauthorized).into_response())?;

    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        AppError::new(ReturnCode::TokenExpired).into_response()
    })?;

    let user_id = token_data
        .claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::new(ReturnCode::TokenExpired).into_response())?;

    request.extensions_mut().insert(Diner {
        user_id,
        email: token_data.claims.email,
    });

    Ok(next.run(request).await)
}
