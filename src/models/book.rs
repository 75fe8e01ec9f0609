//! Book (catalog entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Full book model (DB + API)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub category_id: i32,
    /// Derived aggregate: mean of all user ratings, rounded to one decimal
    pub rating: f64,
    pub availability: bool,
    pub copies: i32,
    pub photo_url: Option<String>,
    pub pdf_url: Option<String>,
    pub audio_url: Option<String>,
    pub details: Option<String>,
    pub featured: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// Short book representation for public lists
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub author: String,
    pub rating: f64,
    pub availability: bool,
    pub photo_url: Option<String>,
}

/// Create book request. File assets arrive as separate multipart parts
/// and are uploaded to object storage before this struct is persisted.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "Author must not be empty"))]
    pub author: String,
    pub category_id: i32,
    pub details: Option<String>,
    #[validate(range(min = 1, message = "Copy count must be at least 1"))]
    pub copies: Option<i32>,
    pub featured: Option<bool>,
    pub photo_url: Option<String>,
    pub pdf_url: Option<String>,
    pub audio_url: Option<String>,
}

/// Partial update request. Only supplied fields mutate; the identifier
/// is immutable and rejected if present.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateBook {
    /// Rejected with a validation error when supplied
    pub id: Option<i32>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub category_id: Option<i32>,
    pub details: Option<String>,
    pub copies: Option<i32>,
    pub availability: Option<bool>,
    pub featured: Option<bool>,
    pub photo_url: Option<String>,
    pub pdf_url: Option<String>,
    pub audio_url: Option<String>,
}

/// Book list query parameters
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BookQuery {
    /// Case-insensitive substring search over title, author and details
    pub q: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl BookQuery {
    /// Normalized search term: None when empty or whitespace-only
    pub fn search_term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn limit(&self) -> i64 {
        self.per_page.unwrap_or(20).clamp(1, 100)
    }

    pub fn offset(&self) -> i64 {
        (self.page.unwrap_or(1).max(1) - 1) * self.limit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_term_normalization() {
        let q = BookQuery {
            q: Some("  ".to_string()),
            page: None,
            per_page: None,
        };
        assert_eq!(q.search_term(), None);

        let q = BookQuery {
            q: Some(" tolkien ".to_string()),
            page: None,
            per_page: None,
        };
        assert_eq!(q.search_term(), Some("tolkien"));
    }

    #[test]
    fn test_pagination_bounds() {
        let q = BookQuery {
            q: None,
            page: Some(3),
            per_page: Some(500),
        };
        assert_eq!(q.limit(), 100);
        assert_eq!(q.offset(), 200);

        let q = BookQuery {
            q: None,
            page: Some(0),
            per_page: None,
        };
        assert_eq!(q.offset(), 0);
    }
}
