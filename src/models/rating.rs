//! Rating and review models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A single user rating for a book; immutable once created.
/// At most one rating per (user, book) pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserRating {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub rating: f64,
    pub created_at: Option<DateTime<Utc>>,
}

/// Rate book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RateBook {
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub rating: f64,
}

/// A free-text review for a book
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Review {
    pub id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub book_id: i32,
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Create review request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReview {
    #[validate(length(min = 1, max = 4000, message = "Review must be 1-4000 characters"))]
    pub content: String,
}

/// Aggregate book rating: arithmetic mean rounded to one decimal place.
/// Returns 0.0 for an empty set.
pub fn aggregate_rating(ratings: &[f64]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_empty() {
        assert_eq!(aggregate_rating(&[]), 0.0);
    }

    #[test]
    fn test_aggregate_mean_rounded() {
        assert_eq!(aggregate_rating(&[5.0]), 5.0);
        assert_eq!(aggregate_rating(&[4.0, 5.0]), 4.5);
        // 11/3 = 3.666... -> 3.7
        assert_eq!(aggregate_rating(&[3.0, 4.0, 4.0]), 3.7);
        // 10/3 = 3.333... -> 3.3
        assert_eq!(aggregate_rating(&[3.0, 3.0, 4.0]), 3.3);
    }

    #[test]
    fn test_aggregate_stays_in_range() {
        let all_max = vec![5.0; 50];
        assert_eq!(aggregate_rating(&all_max), 5.0);
        let all_min = vec![0.0; 50];
        assert_eq!(aggregate_rating(&all_min), 0.0);
    }
}
