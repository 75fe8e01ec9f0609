//! Categories repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::category::{Category, CreateCategory, UpdateCategory},
};

#[derive(Clone)]
pub struct CategoriesRepository {
    pool: Pool<Postgres>,
}

impl CategoriesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get category by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Category> {
        sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))
    }

    /// List all categories
    pub async fn list(&self) -> AppResult<Vec<Category>> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY title")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    /// Create a new category
    pub async fn create(&self, category: &CreateCategory) -> AppResult<Category> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE title = $1)")
                .bind(&category.title)
                .fetch_one(&self.pool)
                .await?;
        if exists {
            return Err(AppError::Conflict(
                "DUPLICATE",
                format!("Category '{}' already exists", category.title),
            ));
        }

        let created = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (title) VALUES ($1) RETURNING *",
        )
        .bind(&category.title)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Partial update
    pub async fn update(&self, id: i32, update: &UpdateCategory) -> AppResult<Category> {
        sqlx::query_as::<_, Category>(
            "UPDATE categories SET title = COALESCE($2, title) WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&update.title)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category with id {} not found", id)))
    }

    /// Delete a category; blocked while any available book references it
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let in_use: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM books WHERE category_id = $1 AND availability = true)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        if in_use {
            return Err(AppError::Conflict(
                "CATEGORY_IN_USE",
                "Category has available books attached".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Category with id {} not found",
                id
            )));
        }

        Ok(())
    }
}
