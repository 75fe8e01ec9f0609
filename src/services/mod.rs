//! Business logic services

pub mod auth;
pub mod borrows;
pub mod catalog;
pub mod ratings;
pub mod settings;
pub mod storage;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub borrows: borrows::BorrowsService,
    pub catalog: catalog::CatalogService,
    pub ratings: ratings::RatingsService,
    pub settings: settings::SettingsService,
    pub storage: storage::StorageService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: AuthConfig,
        storage: storage::StorageService,
    ) -> Self {
        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            borrows: borrows::BorrowsService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            ratings: ratings::RatingsService::new(repository.clone()),
            settings: settings::SettingsService::new(repository),
            storage,
        }
    }
}
