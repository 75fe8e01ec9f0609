//! Borrows repository for database operations.
//!
//! The create/update sequences run inside a single transaction with the
//! book row locked (`SELECT ... FOR UPDATE`), so two concurrent borrow
//! requests for the same book cannot both succeed.

use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::borrow::{
        BorrowDetails, BorrowRecord, BorrowStatus, CreateBorrow, RequestStatus, UpdateBorrowStatus,
    },
};

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrow record by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<BorrowRecord> {
        sqlx::query_as::<_, BorrowRecord>("SELECT * FROM borrow_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow record with id {} not found", id)))
    }

    /// Create a new borrow record and flip the book's availability.
    /// Both writes commit as one atomic unit.
    ///
    /// `max_borrow_count` caps the caller's concurrent active borrows.
    pub async fn create(
        &self,
        user_id: i32,
        borrow: &CreateBorrow,
        max_borrow_count: i32,
    ) -> AppResult<BorrowRecord> {
        let mut tx = self.pool.begin().await?;

        // Lock the book row for the duration of the transaction
        let book_row = sqlx::query("SELECT id, availability FROM books WHERE id = $1 FOR UPDATE")
            .bind(borrow.book_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Book with id {} not found", borrow.book_id))
            })?;

        let available: bool = book_row.get("availability");
        if !available {
            return Err(AppError::Conflict(
                "BOOK_UNAVAILABLE",
                "Book is not available for borrowing".to_string(),
            ));
        }

        let active_borrows: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM borrow_records WHERE user_id = $1 AND borrow_status = 'borrowed'",
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        if active_borrows >= max_borrow_count as i64 {
            return Err(AppError::Conflict(
                "BORROW_LIMIT_REACHED",
                format!(
                    "Maximum concurrent borrows reached ({}/{})",
                    active_borrows, max_borrow_count
                ),
            ));
        }

        let record = sqlx::query_as::<_, BorrowRecord>(
            r#"
            INSERT INTO borrow_records (user_id, book_id, borrow_date, return_date,
                                        borrow_status, request_status)
            VALUES ($1, $2, $3, $4, 'borrowed', 'pending')
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(borrow.book_id)
        .bind(borrow.borrow_date)
        .bind(borrow.return_date)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE books SET availability = false WHERE id = $1")
            .bind(borrow.book_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    /// Apply status transitions; moving to `returned` frees the book.
    /// All writes commit as one atomic unit.
    pub async fn update_status(
        &self,
        borrow_id: i32,
        update: &UpdateBorrowStatus,
    ) -> AppResult<BorrowRecord> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, BorrowRecord>(
            "SELECT * FROM borrow_records WHERE id = $1 FOR UPDATE",
        )
        .bind(borrow_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Borrow record with id {} not found", borrow_id))
        })?;

        let new_borrow_status = update.borrow_status.unwrap_or(record.borrow_status);
        let new_request_status = update.request_status.unwrap_or(record.request_status);

        if !record.borrow_status.can_transition_to(new_borrow_status) {
            return Err(AppError::Validation(format!(
                "Invalid borrow status transition: {} -> {}",
                record.borrow_status, new_borrow_status
            )));
        }
        if !record.request_status.can_transition_to(new_request_status) {
            return Err(AppError::Validation(format!(
                "Invalid request status transition: {} -> {}",
                record.request_status, new_request_status
            )));
        }

        let updated = sqlx::query_as::<_, BorrowRecord>(
            r#"
            UPDATE borrow_records SET borrow_status = $2, request_status = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(borrow_id)
        .bind(new_borrow_status)
        .bind(new_request_status)
        .fetch_one(&mut *tx)
        .await?;

        if record.borrow_status != BorrowStatus::Returned
            && new_borrow_status == BorrowStatus::Returned
        {
            sqlx::query("UPDATE books SET availability = true WHERE id = $1")
                .bind(record.book_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(updated)
    }

    /// Get borrow records for a user, joined with the book title
    pub async fn get_user_borrows(&self, user_id: i32) -> AppResult<Vec<BorrowDetails>> {
        let records = sqlx::query_as::<_, BorrowDetails>(
            r#"
            SELECT br.id, br.user_id, u.name AS user_name, br.book_id,
                   b.title AS book_title, br.borrow_date, br.return_date,
                   br.borrow_status, br.request_status
            FROM borrow_records br
            JOIN users u ON br.user_id = u.id
            JOIN books b ON br.book_id = b.id
            WHERE br.user_id = $1
            ORDER BY br.borrow_date DESC, br.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Count records by borrow status
    pub async fn count_by_borrow_status(&self, status: BorrowStatus) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM borrow_records WHERE borrow_status = $1")
                .bind(status)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// List records by borrow status
    pub async fn list_by_borrow_status(&self, status: BorrowStatus) -> AppResult<Vec<BorrowDetails>> {
        self.list_details("br.borrow_status = $1", status.as_str())
            .await
    }

    /// Count records by request status
    pub async fn count_by_request_status(&self, status: RequestStatus) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM borrow_records WHERE request_status = $1")
                .bind(status)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    /// List records by request status
    pub async fn list_by_request_status(
        &self,
        status: RequestStatus,
    ) -> AppResult<Vec<BorrowDetails>> {
        self.list_details("br.request_status = $1", status.as_str())
            .await
    }

    async fn list_details(&self, filter: &str, value: &str) -> AppResult<Vec<BorrowDetails>> {
        let query = format!(
            r#"
            SELECT br.id, br.user_id, u.name AS user_name, br.book_id,
                   b.title AS book_title, br.borrow_date, br.return_date,
                   br.borrow_status, br.request_status
            FROM borrow_records br
            JOIN users u ON br.user_id = u.id
            JOIN books b ON br.book_id = b.id
            WHERE {}
            ORDER BY br.borrow_date DESC, br.id DESC
            "#,
            filter
        );

        let records = sqlx::query_as::<_, BorrowDetails>(&query)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    /// Delete a borrow record; deleting an active borrow frees the book.
    pub async fn delete(&self, borrow_id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, BorrowRecord>(
            "SELECT * FROM borrow_records WHERE id = $1 FOR UPDATE",
        )
        .bind(borrow_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Borrow record with id {} not found", borrow_id))
        })?;

        if record.borrow_status == BorrowStatus::Borrowed {
            sqlx::query("UPDATE books SET availability = true WHERE id = $1")
                .bind(record.book_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM borrow_records WHERE id = $1")
            .bind(borrow_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
