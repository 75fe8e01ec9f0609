//! Rating and review service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::rating::{CreateReview, RateBook, Review, UserRating},
    repository::Repository,
};

#[derive(Clone)]
pub struct RatingsService {
    repository: Repository,
}

impl RatingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Rate a book; at most one rating per (user, book)
    pub async fn rate_book(
        &self,
        user_id: i32,
        book_id: i32,
        request: RateBook,
    ) -> AppResult<UserRating> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository
            .ratings
            .rate(user_id, book_id, request.rating)
            .await
    }

    /// Post a review for a book
    pub async fn review_book(
        &self,
        user_id: i32,
        book_id: i32,
        request: CreateReview,
    ) -> AppResult<Review> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository
            .ratings
            .create_review(user_id, book_id, &request.content)
            .await
    }

    /// List reviews for a book
    pub async fn list_reviews(&self, book_id: i32) -> AppResult<Vec<Review>> {
        self.repository.ratings.list_reviews(book_id).await
    }
}
