//! Student-ID identification against the read-only user directory

use crate::{error::AppResult, models::User, repository::Repository};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
}

impl AuthService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Find the user registered under `student_id`.
    ///
    /// This is an identification lookup only; no credential is checked.
    pub async fn identify(&self, student_id: &str) -> AppResult<Option<User>> {
        if student_id.trim().is_empty() {
            return Ok(None);
        }

        let users = self.repository.users.all().await?;
        let user = users.into_iter().find(|u| u.matches_student_id(student_id));

        match &user {
            Some(user) => tracing::info!("User {} identified with role {}", user.id, user.role),
            None => tracing::info!("Login attempt with unknown student id"),
        }
        Ok(user)
    }
}
