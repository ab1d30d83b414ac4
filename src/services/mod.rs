//! Business logic services

pub mod auth;
pub mod claims;
pub mod items;
pub mod sessions;
pub mod staff;
pub mod stats;
pub mod uploads;

use std::sync::Arc;

use crate::{config::UploadsConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub items: items::ItemsService,
    pub claims: claims::ClaimsService,
    pub staff: staff::StaffService,
    pub stats: stats::StatsService,
    pub uploads: uploads::UploadService,
    pub sessions: Arc<dyn sessions::SessionStore>,
}

impl Services {
    /// Create all services with the given repository and session backend
    pub fn new(
        repository: Repository,
        uploads_config: &UploadsConfig,
        sessions: Arc<dyn sessions::SessionStore>,
    ) -> Self {
        let uploads = uploads::UploadService::new(uploads_config);
        let items = items::ItemsService::new(repository.clone(), uploads.clone());

        Self {
            auth: auth::AuthService::new(repository.clone()),
            claims: claims::ClaimsService::new(repository.clone(), items.clone()),
            items,
            staff: staff::StaffService::new(repository.clone()),
            stats: stats::StatsService::new(repository),
            uploads,
            sessions,
        }
    }
}
