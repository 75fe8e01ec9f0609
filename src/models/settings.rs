//! Global settings model (singleton row)

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Global borrow settings. A single row, seeded by migration and
/// mutated only by administrators.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Settings {
    pub id: i32,
    /// Maximum borrow duration in days
    pub borrow_day_limit: i32,
    /// Maximum extension in days
    pub borrow_extend_limit: i32,
    /// Maximum concurrent borrows per user
    pub max_borrow_count: i32,
}

/// Partial settings update request (admin)
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSettings {
    pub borrow_day_limit: Option<i32>,
    pub borrow_extend_limit: Option<i32>,
    pub max_borrow_count: Option<i32>,
}
