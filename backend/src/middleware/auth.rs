//! Authentication middleware
//!
//! Every protected request carries a bearer token and an `X-Device-ID` header.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::auth::decode_token;
use crate::AppState;
use dripmate_shared::validation::validate_device_id;

pub const DEVICE_ID_HEADER: &str = "x-device-id";

/// Authenticated account information extracted from the JWT
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub device_id: String,
}

/// Validates the bearer token and device header, then stores an `AuthUser`
/// in the request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_user = authenticate(request.headers(), &state.config.jwt.secret)?;
    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

pub fn authenticate(headers: &HeaderMap, secret: &str) -> AppResult<AuthUser> {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::InvalidToken("Missing or invalid Authorization header".into()))?;

    let claims = decode_token(token.trim(), secret)?;
    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::InvalidToken("Invalid user ID in token".into()))?;

    let device_id = headers
        .get(DEVICE_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .unwrap_or_default();
    validate_device_id(device_id).map_err(|_| AppError::MissingDeviceId)?;

    Ok(AuthUser {
        user_id,
        username: claims.username,
        device_id: device_id.to_string(),
    })
}
