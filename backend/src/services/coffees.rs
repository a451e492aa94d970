//! Coffee list storage
//!
//! Each account owns one list, stored as a JSONB array. Uploads replace the
//! list wholesale after deduplication through the shared sync rules.

use chrono::Utc;
use serde_json::Value;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use dripmate_shared::sync::dedupe_coffees;
use dripmate_shared::Coffee;

#[derive(Clone)]
pub struct CoffeeService {
    db: PgPool,
    max_coffees: usize,
}

impl CoffeeService {
    pub fn new(db: PgPool, max_coffees: usize) -> Self {
        Self { db, max_coffees }
    }

    /// Stored list, empty when nothing was uploaded yet
    pub async fn load(&self, user_id: Uuid) -> AppResult<Vec<Value>> {
        let stored = sqlx::query_scalar::<_, Json<Vec<Value>>>(
            "SELECT coffees FROM coffee_lists WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(stored.map(|Json(coffees)| coffees).unwrap_or_default())
    }

    /// Replace the stored list. Returns the number of coffees saved.
    pub async fn save(&self, user_id: Uuid, device_id: &str, raw: Vec<Value>) -> AppResult<usize> {
        let coffees = prepare_upload(raw, self.max_coffees)?;
        let saved = coffees.len();

        sqlx::query(
            r#"
            INSERT INTO coffee_lists (user_id, coffees, updated_by_device, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (user_id) DO UPDATE
            SET coffees = EXCLUDED.coffees,
                updated_by_device = EXCLUDED.updated_by_device,
                updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(Json(&coffees))
        .bind(device_id)
        .execute(&self.db)
        .await?;

        tracing::info!(%user_id, saved, "coffee list stored");
        Ok(saved)
    }
}

/// Size check and deduplication for an uploaded list
pub fn prepare_upload(raw: Vec<Value>, max_coffees: usize) -> AppResult<Vec<Coffee>> {
    if raw.len() > max_coffees {
        return Err(AppError::PayloadTooLarge(format!(
            "At most {} coffees can be synced, got {}",
            max_coffees,
            raw.len()
        )));
    }
    Ok(dedupe_coffees(raw, "api-upload", Utc::now()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upload_is_deduplicated() {
        let raw = vec![
            json!({"id": "coffee-1", "name": "Kochere", "feedbackHistory": []}),
            json!({"id": "coffee-1", "name": "Kochere again"}),
            json!({"name": "Huila", "roaster": "R", "origin": "Colombia"}),
        ];
        let coffees = prepare_upload(raw, 10).unwrap();
        assert_eq!(coffees.len(), 2);
        assert_eq!(coffees[0].name, "Kochere");
        assert!(coffees[1].id.as_deref().unwrap().starts_with("coffee-huila|r|colombia|"));
    }

    #[test]
    fn test_upload_keeps_records_with_null_fields() {
        let raw = vec![
            json!({"id": "coffee-a", "name": "Scanned", "roaster": null, "favorite": null}),
            json!({"id": "coffee-b", "name": "Manual", "roaster": "R"}),
        ];
        let coffees = prepare_upload(raw, 10).unwrap();
        assert_eq!(coffees.len(), 2);
    }

    #[test]
    fn test_upload_limit() {
        let raw = vec![json!({"name": "A"}); 4];
        assert!(matches!(prepare_upload(raw, 3), Err(AppError::PayloadTooLarge(_))));
    }
}
