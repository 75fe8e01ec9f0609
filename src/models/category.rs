//! Category model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Category model
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Category {
    pub id: i32,
    pub title: String,
}

/// Create category request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
}

/// Partial update request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCategory {
    pub title: Option<String>,
}
