//! Settings repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::settings::{Settings, UpdateSettings},
};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: Pool<Postgres>,
}

impl SettingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get the settings singleton row
    pub async fn get(&self) -> AppResult<Settings> {
        sqlx::query_as::<_, Settings>("SELECT * FROM settings ORDER BY id LIMIT 1")
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Settings not found".to_string()))
    }

    /// Partial update of the singleton row
    pub async fn update(&self, update: &UpdateSettings) -> AppResult<Settings> {
        let current = self.get().await?;

        let updated = sqlx::query_as::<_, Settings>(
            r#"
            UPDATE settings SET
                borrow_day_limit = COALESCE($2, borrow_day_limit),
                borrow_extend_limit = COALESCE($3, borrow_extend_limit),
                max_borrow_count = COALESCE($4, max_borrow_count)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(update.borrow_day_limit)
        .bind(update.borrow_extend_limit)
        .bind(update.max_borrow_count)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }
}
