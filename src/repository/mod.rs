//! Repository layer for database operations

pub mod books;
pub mod borrows;
pub mod categories;
pub mod ratings;
pub mod settings;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub borrows: borrows::BorrowsRepository,
    pub categories: categories::CategoriesRepository,
    pub ratings: ratings::RatingsRepository,
    pub settings: settings::SettingsRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            borrows: borrows::BorrowsRepository::new(pool.clone()),
            categories: categories::CategoriesRepository::new(pool.clone()),
            ratings: ratings::RatingsRepository::new(pool.clone()),
            settings: settings::SettingsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }
}
