//! Authentication handlers

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::services::auth::AuthenticatedUser;
use crate::services::{AuthService, DeviceService};
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    #[validate(length(min = 1, max = 256))]
    pub password: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct UserSummary {
    pub id: Uuid,
    pub username: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserSummary,
}

impl From<AuthenticatedUser> for AuthResponse {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            success: true,
            token: user.tokens.access_token,
            token_type: user.tokens.token_type,
            expires_in: user.tokens.expires_in,
            user: UserSummary {
                id: user.id,
                username: user.username,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub user: UserSummary,
}

/// Register endpoint handler
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    body.validate()?;

    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let user = auth_service.register(&body.username, &body.password).await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> AppResult<Json<AuthResponse>> {
    body.validate()?;

    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let user = auth_service.login(&body.username, &body.password).await?;

    Ok(Json(user.into()))
}

/// Token validation; binds the calling device to the account
pub async fn validate(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<ValidateResponse>> {
    let device_service = DeviceService::new(state.db.clone(), state.config.sync.max_devices_per_user);
    device_service.bind(user.user_id, &user.device_id).await?;

    Ok(Json(ValidateResponse {
        valid: true,
        user: UserSummary {
            id: user.user_id,
            username: user.username,
        },
    }))
}
