//! Coffee list sync handlers

use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::services::CoffeeService;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct CoffeeListResponse {
    pub success: bool,
    pub coffees: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub struct SaveCoffeesRequest {
    pub coffees: Vec<Value>,
}

#[derive(Debug, Serialize)]
pub struct SaveCoffeesResponse {
    pub success: bool,
    pub saved: usize,
}

/// Download the stored coffee list
pub async fn get_coffees(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<CoffeeListResponse>> {
    let service = CoffeeService::new(state.db.clone(), state.config.sync.max_coffees);
    let coffees = service.load(user.user_id).await?;

    Ok(Json(CoffeeListResponse {
        success: true,
        coffees,
    }))
}

/// Replace the stored coffee list
pub async fn save_coffees(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(body): Json<SaveCoffeesRequest>,
) -> AppResult<Json<SaveCoffeesResponse>> {
    let service = CoffeeService::new(state.db.clone(), state.config.sync.max_coffees);
    let saved = service
        .save(user.user_id, &user.device_id, body.coffees)
        .await?;

    Ok(Json(SaveCoffeesResponse {
        success: true,
        saved,
    }))
}
