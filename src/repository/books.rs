//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookQuery, BookSummary, CreateBook, UpdateBook},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Paginated list with optional case-insensitive substring search
    /// over title, author and details
    pub async fn search(&self, query: &BookQuery) -> AppResult<(Vec<BookSummary>, i64)> {
        let pattern = query.search_term().map(|s| format!("%{}%", s));

        let (books, total) = if let Some(ref pattern) = pattern {
            let books = sqlx::query_as::<_, BookSummary>(
                r#"
                SELECT id, title, author, rating, availability, photo_url
                FROM books
                WHERE title ILIKE $1 OR author ILIKE $1 OR details ILIKE $1
                ORDER BY id
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(pattern)
            .bind(query.limit())
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await?;

            let total: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM books WHERE title ILIKE $1 OR author ILIKE $1 OR details ILIKE $1",
            )
            .bind(pattern)
            .fetch_one(&self.pool)
            .await?;

            (books, total)
        } else {
            let books = sqlx::query_as::<_, BookSummary>(
                r#"
                SELECT id, title, author, rating, availability, photo_url
                FROM books
                ORDER BY id
                LIMIT $1 OFFSET $2
                "#,
            )
            .bind(query.limit())
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await?;

            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
                .fetch_one(&self.pool)
                .await?;

            (books, total)
        };

        Ok((books, total))
    }

    /// Create a new book; the referenced category must exist
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let category_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                .bind(book.category_id)
                .fetch_one(&self.pool)
                .await?;

        if !category_exists {
            return Err(AppError::NotFound(format!(
                "Category with id {} not found",
                book.category_id
            )));
        }

        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, category_id, details, copies, featured,
                               photo_url, pdf_url, audio_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.category_id)
        .bind(&book.details)
        .bind(book.copies.unwrap_or(1))
        .bind(book.featured.unwrap_or(false))
        .bind(&book.photo_url)
        .bind(&book.pdf_url)
        .bind(&book.audio_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Partial update: only supplied fields mutate
    pub async fn update(&self, id: i32, update: &UpdateBook) -> AppResult<Book> {
        if let Some(category_id) = update.category_id {
            let category_exists: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
                    .bind(category_id)
                    .fetch_one(&self.pool)
                    .await?;
            if !category_exists {
                return Err(AppError::NotFound(format!(
                    "Category with id {} not found",
                    category_id
                )));
            }
        }

        sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title = COALESCE($2, title),
                author = COALESCE($3, author),
                category_id = COALESCE($4, category_id),
                details = COALESCE($5, details),
                copies = COALESCE($6, copies),
                availability = COALESCE($7, availability),
                featured = COALESCE($8, featured),
                photo_url = COALESCE($9, photo_url),
                pdf_url = COALESCE($10, pdf_url),
                audio_url = COALESCE($11, audio_url)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.title)
        .bind(&update.author)
        .bind(update.category_id)
        .bind(&update.details)
        .bind(update.copies)
        .bind(update.availability)
        .bind(update.featured)
        .bind(&update.photo_url)
        .bind(&update.pdf_url)
        .bind(&update.audio_url)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Delete a book; blocked while a borrow is in progress
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let borrowed: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM borrow_records WHERE book_id = $1 AND borrow_status = 'borrowed')",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if borrowed {
            return Err(AppError::Conflict(
                "BOOK_BORROWED",
                "Book cannot be deleted while borrowed".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }

        Ok(())
    }
}
