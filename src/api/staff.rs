//! Staff roster pages

use axum::{
    extract::{Query, State},
    response::Redirect,
    Form, Json,
};
use axum_extra::extract::WithRejection;
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::staff::{CreateStaff, Staff, StaffQuery},
    AppState,
};

use super::{
    views::{render, NoContext, View},
    CurrentUser,
};

/// Context of the `staff` view
#[derive(Serialize, ToSchema)]
pub struct StaffContext {
    pub staff: Vec<Staff>,
    pub selected_role: String,
}

/// List staff, optionally filtered by role
#[utoipa::path(
    get,
    path = "/staff",
    tag = "staff",
    params(StaffQuery),
    responses((status = 200, description = "View envelope `{view: \"staff\", flashes, context}`; the schema shown is `context`", body = StaffContext))
)]
pub async fn list_staff(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<StaffQuery>,
) -> AppResult<Json<View<StaffContext>>> {
    let staff = state.services.staff.list(query.role.as_deref()).await?;
    let context = StaffContext {
        staff,
        selected_role: query.role.unwrap_or_default(),
    };
    Ok(render(&user.session, "staff", context))
}

/// Show the add-staff form
#[utoipa::path(
    get,
    path = "/staff/add",
    tag = "staff",
    responses((status = 200, description = "View envelope `{view: \"add_staff\", flashes, context}`; the schema shown is `context`", body = NoContext))
)]
pub async fn add_staff_page(user: CurrentUser) -> Json<View<NoContext>> {
    render(&user.session, "add_staff", NoContext::default())
}

/// Add a staff member
#[utoipa::path(
    post,
    path = "/staff/add",
    tag = "staff",
    request_body(content = CreateStaff, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Staff added, redirect to /staff"),
        (status = 400, description = "Missing or blank name or role")
    )
)]
pub async fn create_staff(
    State(state): State<AppState>,
    _user: CurrentUser,
    WithRejection(Form(data), _): WithRejection<Form<CreateStaff>, AppError>,
) -> AppResult<Redirect> {
    let data = CreateStaff {
        name: data.name.trim().to_string(),
        role: data.role.trim().to_string(),
    };
    data.validate()?;
    state.services.staff.create(data).await?;
    Ok(Redirect::to("/staff"))
}
