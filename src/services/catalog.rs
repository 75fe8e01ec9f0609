//! Catalog service for books and categories

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookQuery, BookSummary, CreateBook, UpdateBook},
        category::{Category, CreateCategory, UpdateCategory},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // =========================================================================
    // Books
    // =========================================================================

    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn search_books(&self, query: &BookQuery) -> AppResult<(Vec<BookSummary>, i64)> {
        self.repository.books.search(query).await
    }

    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.books.create(&book).await
    }

    /// Partial update; the identifier is immutable
    pub async fn update_book(&self, id: i32, update: UpdateBook) -> AppResult<Book> {
        if update.id.is_some() {
            return Err(AppError::Validation(
                "Field 'id' is immutable".to_string(),
            ));
        }
        self.repository.books.update(id, &update).await
    }

    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    // =========================================================================
    // Categories
    // =========================================================================

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.repository.categories.list().await
    }

    pub async fn get_category(&self, id: i32) -> AppResult<Category> {
        self.repository.categories.get_by_id(id).await
    }

    pub async fn create_category(&self, category: CreateCategory) -> AppResult<Category> {
        category
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.categories.create(&category).await
    }

    pub async fn update_category(&self, id: i32, update: UpdateCategory) -> AppResult<Category> {
        self.repository.categories.update(id, &update).await
    }

    pub async fn delete_category(&self, id: i32) -> AppResult<()> {
        self.repository.categories.delete(id).await
    }
}
