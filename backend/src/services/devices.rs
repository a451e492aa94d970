//! Device binding
//!
//! Every app install sends a random `X-Device-ID`. An account may be bound
//! to a limited number of devices; known devices just refresh `last_seen_at`.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct DeviceService {
    db: PgPool,
    max_devices: i64,
}

impl DeviceService {
    pub fn new(db: PgPool, max_devices: i64) -> Self {
        Self { db, max_devices }
    }

    /// Bind `device_id` to the account, rejecting new devices over the limit
    pub async fn bind(&self, user_id: Uuid, device_id: &str) -> AppResult<()> {
        let known = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM devices WHERE user_id = $1 AND device_id = $2)",
        )
        .bind(user_id)
        .bind(device_id)
        .fetch_one(&self.db)
        .await?;

        if known {
            sqlx::query("UPDATE devices SET last_seen_at = NOW() WHERE user_id = $1 AND device_id = $2")
                .bind(user_id)
                .bind(device_id)
                .execute(&self.db)
                .await?;
            return Ok(());
        }

        let bound = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM devices WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.db)
            .await?;

        check_device_limit(bound, self.max_devices)?;

        sqlx::query(
            r#"
            INSERT INTO devices (user_id, device_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, device_id) DO UPDATE SET last_seen_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(device_id)
        .execute(&self.db)
        .await?;

        tracing::info!(%user_id, bound = bound + 1, "device bound");
        Ok(())
    }
}

/// A new device is allowed while fewer than `limit` are bound
pub fn check_device_limit(bound: i64, limit: i64) -> AppResult<()> {
    if bound >= limit {
        tracing::warn!(bound, limit, "device limit reached");
        return Err(AppError::DeviceLimitReached { limit });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_limit() {
        assert!(check_device_limit(0, 3).is_ok());
        assert!(check_device_limit(2, 3).is_ok());
        assert!(matches!(
            check_device_limit(3, 3),
            Err(AppError::DeviceLimitReached { limit: 3 })
        ));
    }
}
