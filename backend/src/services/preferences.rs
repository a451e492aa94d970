//! Per-account grinder and water hardness preferences

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use dripmate_shared::validation::validate_water_hardness;
use dripmate_shared::Grinder;

#[derive(Clone)]
pub struct PreferenceService {
    db: PgPool,
}

impl PreferenceService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Stored grinder, migrated to the current catalogue key
    pub async fn grinder(&self, user_id: Uuid) -> AppResult<Option<String>> {
        let stored = sqlx::query_scalar::<_, Option<String>>(
            "SELECT grinder FROM user_preferences WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .flatten();

        Ok(stored.map(|key| Grinder::migrate(&key).key().to_string()))
    }

    pub async fn set_grinder(&self, user_id: Uuid, key: &str) -> AppResult<String> {
        let grinder = parse_grinder(key)?;

        sqlx::query(
            r#"
            INSERT INTO user_preferences (user_id, grinder, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id) DO UPDATE
            SET grinder = EXCLUDED.grinder, updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(grinder.key())
        .execute(&self.db)
        .await?;

        Ok(grinder.key().to_string())
    }

    pub async fn water_hardness(&self, user_id: Uuid) -> AppResult<Option<Decimal>> {
        let stored = sqlx::query_scalar::<_, Option<Decimal>>(
            "SELECT water_hardness FROM user_preferences WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .flatten();

        Ok(stored)
    }

    pub async fn set_water_hardness(&self, user_id: Uuid, value: Decimal) -> AppResult<Decimal> {
        validate_water_hardness(value).map_err(|msg| AppError::validation("waterHardness", msg))?;

        sqlx::query(
            r#"
            INSERT INTO user_preferences (user_id, water_hardness, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id) DO UPDATE
            SET water_hardness = EXCLUDED.water_hardness, updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(value)
        .execute(&self.db)
        .await?;

        Ok(value)
    }
}

/// Accept current and legacy catalogue keys; reject everything else
pub fn parse_grinder(key: &str) -> AppResult<Grinder> {
    Grinder::resolve(key.trim())
        .ok_or_else(|| AppError::validation("grinder", format!("Unknown grinder: {}", key)))
}
