//! Claim pages

use axum::{
    extract::{Path, State},
    response::Redirect,
    Json,
};
use axum_extra::extract::Multipart;
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        item::{ClaimForm, Item},
        Staff,
    },
    AppState,
};

use super::{
    forms::FormData,
    views::{render, View},
    CurrentUser,
};

/// Context of the `claim_item` view
#[derive(Serialize, ToSchema)]
pub struct ClaimItemContext {
    pub item: Item,
    /// Choices for the assisting staff dropdown
    pub staff_list: Vec<Staff>,
}

/// Show the claim form for an item
#[utoipa::path(
    get,
    path = "/claim/{id}",
    tag = "claims",
    params(("id" = i64, Path, description = "Item ID")),
    responses(
        (status = 200, description = "View envelope `{view: \"claim_item\", flashes, context}`; the schema shown is `context`", body = ClaimItemContext),
        (status = 404, description = "Item not found")
    )
)]
pub async fn claim_page(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<View<ClaimItemContext>>> {
    let (item, staff_list) = state.services.claims.claim_context(id).await?;
    Ok(render(&user.session, "claim_item", ClaimItemContext { item, staff_list }))
}

/// Record a claim (multipart: staff, claimer_name, college, course, year_section, proof)
#[utoipa::path(
    post,
    path = "/claim/{id}",
    tag = "claims",
    params(("id" = i64, Path, description = "Item ID")),
    request_body(content = ClaimForm, content_type = "multipart/form-data"),
    responses(
        (status = 303, description = "Item claimed, redirect to /"),
        (status = 400, description = "Missing or invalid field"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn claim_item(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> AppResult<Redirect> {
    let mut form = FormData::from_multipart(multipart).await?;
    let data = claim_form(&form)?;
    let proof = form.take_file("proof");

    state.services.claims.claim_item(id, data, proof).await?;
    Ok(Redirect::to("/"))
}

fn claim_form(form: &FormData) -> AppResult<ClaimForm> {
    let data = ClaimForm {
        staff: form.require("staff")?.trim().to_string(),
        claimer_name: form.require("claimer_name")?.trim().to_string(),
        college: form.require("college")?.trim().to_string(),
        course: form.require("course")?.trim().to_string(),
        year_section: form.require("year_section")?.trim().to_string(),
    };
    data.validate()?;
    Ok(data)
}
