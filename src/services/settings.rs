//! Settings service
//!
//! The settings row is read per request; no in-process cache, so an admin
//! update is visible to the next request without invalidation machinery.

use crate::{
    error::AppResult,
    models::settings::{Settings, UpdateSettings},
    repository::Repository,
};

#[derive(Clone)]
pub struct SettingsService {
    repository: Repository,
}

impl SettingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Get current settings
    pub async fn get_settings(&self) -> AppResult<Settings> {
        self.repository.settings.get().await
    }

    /// Update settings (admin)
    pub async fn update_settings(&self, update: UpdateSettings) -> AppResult<Settings> {
        self.repository.settings.update(&update).await
    }
}
