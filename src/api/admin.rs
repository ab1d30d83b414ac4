//! Admin dashboard and the raw item listing

use axum::{extract::State, Json};
use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{Item, Staff, User},
    AppState,
};

use super::{
    views::{render, View},
    AdminUser, CurrentUser,
};

/// Dashboard figures
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminStats {
    pub total_items: usize,
    pub claimed_items: usize,
    pub unclaimed_items: usize,
    pub total_staff: usize,
    pub total_users: usize,
    /// Item count per category, in order of first appearance
    #[schema(value_type = Object)]
    pub items_by_category: IndexMap<String, usize>,
}

/// Context of the `admin_panel` view
#[derive(Serialize, ToSchema)]
pub struct AdminPanelContext {
    pub stats: AdminStats,
    pub items: Vec<Item>,
    pub staff: Vec<Staff>,
    pub users: Vec<User>,
}

/// Context of the `items` view
#[derive(Serialize, ToSchema)]
pub struct ItemsContext {
    pub items: Vec<Item>,
}

/// Admin dashboard
#[utoipa::path(
    get,
    path = "/admin",
    tag = "admin",
    responses(
        (status = 200, description = "View envelope `{view: \"admin_panel\", flashes, context}`; the schema shown is `context`", body = AdminPanelContext),
        (status = 303, description = "Not logged in or not an admin")
    )
)]
pub async fn admin_panel(
    State(state): State<AppState>,
    AdminUser(user): AdminUser,
) -> AppResult<Json<View<AdminPanelContext>>> {
    let context = state.services.stats.admin_panel().await?;
    Ok(render(&user.session, "admin_panel", context))
}

/// Every stored item, unfiltered
#[utoipa::path(
    get,
    path = "/admin/items",
    tag = "admin",
    responses(
        (status = 200, description = "View envelope `{view: \"items\", flashes, context}`; the schema shown is `context`", body = ItemsContext),
        (status = 303, description = "Not logged in, redirect to /login")
    )
)]
pub async fn view_items(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<View<ItemsContext>>> {
    let items = state.services.items.all().await?;
    Ok(render(&user.session, "items", ItemsContext { items }))
}
