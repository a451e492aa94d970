//! Grinder and water hardness preference handlers

use axum::{extract::State, Extension, Json};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::services::PreferenceService;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct GrinderResponse {
    pub success: bool,
    pub grinder: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SetGrinderRequest {
    #[validate(length(min = 1, max = 64))]
    pub grinder: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterHardnessResponse {
    pub success: bool,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub water_hardness: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetWaterHardnessRequest {
    #[serde(with = "rust_decimal::serde::float")]
    pub water_hardness: Decimal,
}

pub async fn get_grinder(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<GrinderResponse>> {
    let grinder = PreferenceService::new(state.db.clone())
        .grinder(user.user_id)
        .await?;

    Ok(Json(GrinderResponse {
        success: true,
        grinder,
    }))
}

pub async fn set_grinder(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<SetGrinderRequest>,
) -> AppResult<Json<GrinderResponse>> {
    body.validate()?;

    let grinder = PreferenceService::new(state.db.clone())
        .set_grinder(user.user_id, &body.grinder)
        .await?;

    Ok(Json(GrinderResponse {
        success: true,
        grinder: Some(grinder),
    }))
}

pub async fn get_water_hardness(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<WaterHardnessResponse>> {
    let water_hardness = PreferenceService::new(state.db.clone())
        .water_hardness(user.user_id)
        .await?;

    Ok(Json(WaterHardnessResponse {
        success: true,
        water_hardness,
    }))
}

pub async fn set_water_hardness(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<SetWaterHardnessRequest>,
) -> AppResult<Json<WaterHardnessResponse>> {
    let value = PreferenceService::new(state.db.clone())
        .set_water_hardness(user.user_id, body.water_hardness.round_dp(1))
        .await?;

    Ok(Json(WaterHardnessResponse {
        success: true,
        water_hardness: Some(value),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_water_hardness_wire_format() {
        let body: SetWaterHardnessRequest = serde_json::from_str(r#"{"waterHardness": 14.5}"#).unwrap();
        assert_eq!(body.water_hardness, Decimal::new(145, 1));

        let response = serde_json::to_value(WaterHardnessResponse {
            success: true,
            water_hardness: None,
        })
        .unwrap();
        assert!(response["waterHardness"].is_null());
    }
}
