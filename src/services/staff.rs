//! Staff roster service

use chrono::Local;

use crate::{
    error::AppResult,
    models::staff::{CreateStaff, Staff},
    repository::Repository,
};

#[derive(Clone)]
pub struct StaffService {
    repository: Repository,
}

impl StaffService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List staff, optionally restricted to one role (case-insensitive exact match)
    pub async fn list(&self, role: Option<&str>) -> AppResult<Vec<Staff>> {
        let staff = self.repository.staff.all().await?;
        Ok(filter_by_role(staff, role))
    }

    pub async fn create(&self, data: CreateStaff) -> AppResult<Staff> {
        let now = Local::now().naive_local();
        let staff = self
            .repository
            .staff
            .modify(move |staff| {
                let member = Staff {
                    id: staff.allocate_id(),
                    name: data.name.trim().to_string(),
                    role: data.role.trim().to_string(),
                    date_added: now,
                };
                staff.records.push(member.clone());
                Ok(member)
            })
            .await?;

        tracing::info!("Staff {} added: {} ({})", staff.id, staff.name, staff.role);
        Ok(staff)
    }
}

pub fn filter_by_role(staff: Vec<Staff>, role: Option<&str>) -> Vec<Staff> {
    match role.map(str::trim).filter(|r| !r.is_empty()) {
        Some(role) => {
            let role = role.to_lowercase();
            staff
                .into_iter()
                .filter(|s| s.role.to_lowercase() == role)
                .collect()
        }
        None => staff,
    }
}
