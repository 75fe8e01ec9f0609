//! Borrow workflow service

use crate::{
    error::AppResult,
    models::borrow::{
        BorrowDetails, BorrowRecord, BorrowStatus, CreateBorrow, RequestStatus, UpdateBorrowStatus,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
}

impl BorrowsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a new borrow record (user borrows a book).
    /// The per-user concurrent borrow cap comes from the settings singleton.
    pub async fn create_borrow(
        &self,
        user_id: i32,
        borrow: CreateBorrow,
    ) -> AppResult<BorrowRecord> {
        borrow.validate_dates()?;

        let settings = self.repository.settings.get().await?;
        self.repository
            .borrows
            .create(user_id, &borrow, settings.max_borrow_count)
            .await
    }

    /// Update borrow and/or request status (admin)
    pub async fn update_status(
        &self,
        borrow_id: i32,
        update: UpdateBorrowStatus,
    ) -> AppResult<BorrowRecord> {
        self.repository.borrows.update_status(borrow_id, &update).await
    }

    /// Get borrow records for a user
    pub async fn get_user_borrows(&self, user_id: i32) -> AppResult<Vec<BorrowDetails>> {
        self.repository.borrows.get_user_borrows(user_id).await
    }

    /// Count records by borrow status (admin)
    pub async fn count_by_borrow_status(&self, status: BorrowStatus) -> AppResult<i64> {
        self.repository.borrows.count_by_borrow_status(status).await
    }

    /// List records by borrow status (admin)
    pub async fn list_by_borrow_status(
        &self,
        status: BorrowStatus,
    ) -> AppResult<Vec<BorrowDetails>> {
        self.repository.borrows.list_by_borrow_status(status).await
    }

    /// Count records by request status (admin)
    pub async fn count_by_request_status(&self, status: RequestStatus) -> AppResult<i64> {
        self.repository.borrows.count_by_request_status(status).await
    }

    /// List records by request status (admin)
    pub async fn list_by_request_status(
        &self,
        status: RequestStatus,
    ) -> AppResult<Vec<BorrowDetails>> {
        self.repository.borrows.list_by_request_status(status).await
    }

    /// Delete a borrow record (admin)
    pub async fn delete_borrow(&self, borrow_id: i32) -> AppResult<()> {
        self.repository.borrows.delete(borrow_id).await
    }
}
