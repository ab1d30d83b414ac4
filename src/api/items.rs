//! Found item pages: list, add, edit, delete

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Json,
};
use axum_extra::extract::Multipart;
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::item::{non_empty, Item, ItemForm, ItemQuery, ItemView},
    AppState,
};

use super::{
    forms::FormData,
    views::{render, NoContext, View},
    CurrentUser,
};

/// Context of the `index` view
#[derive(Serialize, ToSchema)]
pub struct IndexContext {
    pub items: Vec<ItemView>,
    /// Search text as submitted
    pub query: String,
    /// Distinct categories for the filter dropdown
    pub categories: Vec<String>,
    pub selected_category: String,
    /// Whether to show the admin panel link
    pub is_admin: bool,
}

/// Context of the `update_item` view
#[derive(Serialize, ToSchema)]
pub struct UpdateItemContext {
    pub item: Item,
}

/// List items with optional search and category filter
#[utoipa::path(
    get,
    path = "/",
    tag = "items",
    params(ItemQuery),
    responses(
        (status = 200, description = "View envelope `{view: \"index\", flashes, context}`; the schema shown is `context`", body = IndexContext),
        (status = 303, description = "Not logged in, redirect to /login")
    )
)]
pub async fn index(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ItemQuery>,
) -> AppResult<Json<View<IndexContext>>> {
    let listing = state.services.items.browse(&query).await?;

    let context = IndexContext {
        items: listing.items,
        query: query.q.unwrap_or_default(),
        categories: listing.categories,
        selected_category: query.category.unwrap_or_default(),
        is_admin: user.session.is_admin(),
    };
    Ok(render(&user.session, "index", context))
}

/// Show the add-item form
#[utoipa::path(
    get,
    path = "/add",
    tag = "items",
    responses((status = 200, description = "View envelope `{view: \"add_item\", flashes, context}`; the schema shown is `context`", body = NoContext))
)]
pub async fn add_item_page(user: CurrentUser) -> Json<View<NoContext>> {
    render(&user.session, "add_item", NoContext::default())
}

/// Log a found item (multipart: name, description, category, image)
#[utoipa::path(
    post,
    path = "/add",
    tag = "items",
    request_body(content = ItemForm, content_type = "multipart/form-data"),
    responses(
        (status = 303, description = "Item stored, redirect to /"),
        (status = 400, description = "Missing or invalid field")
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    _user: CurrentUser,
    multipart: Multipart,
) -> AppResult<Redirect> {
    let mut form = FormData::from_multipart(multipart).await?;
    let data = item_form(&form)?;
    let image = form.take_file("image");

    state.services.items.create_item(data, image).await?;
    Ok(Redirect::to("/"))
}

/// Show the edit form for an item
#[utoipa::path(
    get,
    path = "/update/{id}",
    tag = "items",
    params(("id" = i64, Path, description = "Item ID")),
    responses(
        (status = 200, description = "View envelope `{view: \"update_item\", flashes, context}`; the schema shown is `context`", body = UpdateItemContext),
        (status = 404, description = "Item not found")
    )
)]
pub async fn edit_item_page(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<View<UpdateItemContext>>> {
    let item = state.services.items.get_item(id).await?;
    Ok(render(&user.session, "update_item", UpdateItemContext { item }))
}

/// Save edits to an item (multipart: name, description, category, image)
#[utoipa::path(
    post,
    path = "/update/{id}",
    tag = "items",
    params(("id" = i64, Path, description = "Item ID")),
    request_body(content = ItemForm, content_type = "multipart/form-data"),
    responses(
        (status = 303, description = "Item updated, redirect to /"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> AppResult<Redirect> {
    let mut form = FormData::from_multipart(multipart).await?;
    let data = item_form(&form)?;
    let image = form.take_file("image");

    state.services.items.update_item(id, data, image).await?;
    user.session.flash("success", "Item updated successfully!");
    Ok(Redirect::to("/"))
}

/// Delete an item
#[utoipa::path(
    get,
    path = "/delete/{id}",
    tag = "items",
    params(("id" = i64, Path, description = "Item ID")),
    responses((status = 303, description = "Redirect to /"))
)]
pub async fn delete_item(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Redirect> {
    state.services.items.delete_item(id).await?;
    Ok(Redirect::to("/"))
}

fn item_form(form: &FormData) -> AppResult<ItemForm> {
    let data = ItemForm {
        name: form.require("name")?.trim().to_string(),
        description: form.require("description")?,
        category: non_empty(form.optional("category")),
    };
    data.validate()?;
    Ok(data)
}
