//! Admin dashboard statistics

use indexmap::IndexMap;

use crate::{
    api::admin::{AdminPanelContext, AdminStats},
    error::AppResult,
    models::Item,
    repository::Repository,
};

/// Label used for items without a category
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
}

impl StatsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Load every store and compute the dashboard figures
    pub async fn admin_panel(&self) -> AppResult<AdminPanelContext> {
        let items = self.repository.items.all().await?;
        let staff = self.repository.staff.all().await?;
        let users = self.repository.users.all().await?;

        let stats = compute_stats(&items, staff.len(), users.len());

        Ok(AdminPanelContext {
            stats,
            items,
            staff,
            users,
        })
    }
}

/// Counts over the item collection, categories in first-seen order
pub fn compute_stats(items: &[Item], total_staff: usize, total_users: usize) -> AdminStats {
    let claimed_items = items.iter().filter(|i| i.is_claimed()).count();

    let mut items_by_category: IndexMap<String, usize> = IndexMap::new();
    for item in items {
        let category = item.category.as_deref().unwrap_or(UNCATEGORIZED);
        *items_by_category.entry(category.to_string()).or_insert(0) += 1;
    }

    AdminStats {
        total_items: items.len(),
        claimed_items,
        unclaimed_items: items.len() - claimed_items,
        total_staff,
        total_users,
        items_by_category,
    }
}
