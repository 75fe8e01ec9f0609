//! Ratings and reviews repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::rating::{aggregate_rating, Review, UserRating},
};

#[derive(Clone)]
pub struct RatingsRepository {
    pool: Pool<Postgres>,
}

impl RatingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a rating and recompute the book's aggregate.
    /// Insert, aggregate read and book update commit as one atomic unit.
    pub async fn rate(&self, user_id: i32, book_id: i32, rating: f64) -> AppResult<UserRating> {
        let mut tx = self.pool.begin().await?;

        let book_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
                .bind(book_id)
                .fetch_one(&mut *tx)
                .await?;
        if !book_exists {
            return Err(AppError::NotFound(format!(
                "Book with id {} not found",
                book_id
            )));
        }

        let already_rated: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM ratings WHERE user_id = $1 AND book_id = $2)",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_rated {
            return Err(AppError::Conflict(
                "ALREADY_RATED",
                "User has already rated this book".to_string(),
            ));
        }

        // A concurrent insert can slip past the EXISTS check; the unique
        // constraint on (user_id, book_id) catches it and must surface as
        // the same conflict, not a server error.
        let created = sqlx::query_as::<_, UserRating>(
            r#"
            INSERT INTO ratings (user_id, book_id, rating)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(rating)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                AppError::Conflict(
                    "ALREADY_RATED",
                    "User has already rated this book".to_string(),
                )
            }
            _ => AppError::Database(e),
        })?;

        let ratings: Vec<f64> =
            sqlx::query_scalar("SELECT rating FROM ratings WHERE book_id = $1")
                .bind(book_id)
                .fetch_all(&mut *tx)
                .await?;

        sqlx::query("UPDATE books SET rating = $2 WHERE id = $1")
            .bind(book_id)
            .bind(aggregate_rating(&ratings))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    /// Create a review for a book
    pub async fn create_review(
        &self,
        user_id: i32,
        book_id: i32,
        content: &str,
    ) -> AppResult<Review> {
        let book_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1)")
                .bind(book_id)
                .fetch_one(&self.pool)
                .await?;
        if !book_exists {
            return Err(AppError::NotFound(format!(
                "Book with id {} not found",
                book_id
            )));
        }

        let review = sqlx::query_as::<_, Review>(
            r#"
            WITH inserted AS (
                INSERT INTO reviews (user_id, book_id, content)
                VALUES ($1, $2, $3)
                RETURNING *
            )
            SELECT i.id, i.user_id, u.name AS user_name, i.book_id, i.content, i.created_at
            FROM inserted i
            JOIN users u ON i.user_id = u.id
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }

    /// List reviews for a book, newest first
    pub async fn list_reviews(&self, book_id: i32) -> AppResult<Vec<Review>> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT r.id, r.user_id, u.name AS user_name, r.book_id, r.content, r.created_at
            FROM reviews r
            JOIN users u ON r.user_id = u.id
            WHERE r.book_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }
}
