//! Login, logout and the disabled registration endpoint

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::WithRejection;

use crate::{
    error::{AppError, AppResult},
    models::user::LoginRequest,
    AppState,
};

use super::{
    views::{render, NoContext, View},
    Session,
};

pub const REGISTRATION_DISABLED: &str =
    "Registration is disabled. Please contact admin to add users.";

/// Show the login form
#[utoipa::path(
    get,
    path = "/login",
    tag = "auth",
    responses((status = 200, description = "View envelope `{view: \"login\", flashes, context}`; the schema shown is `context`", body = NoContext))
)]
pub async fn login_page(session: Session) -> Json<View<NoContext>> {
    render(&session, "login", NoContext::default())
}

/// Identify with a student id
#[utoipa::path(
    post,
    path = "/login",
    tag = "auth",
    request_body(content = LoginRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Identified, redirect to /"),
        (status = 200, description = "Unknown student id: view envelope `{view: \"login\", flashes, context}` carrying the flash; the schema shown is `context`", body = NoContext),
        (status = 400, description = "Missing student_id field")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    WithRejection(Form(request), _): WithRejection<Form<LoginRequest>, AppError>,
) -> AppResult<Response> {
    match state.services.auth.identify(&request.student_id).await? {
        Some(user) => {
            session.login(&user);
            session.flash("success", "Login successful!");
            Ok(Redirect::to("/").into_response())
        }
        None => {
            session.flash("danger", "Student not found!");
            Ok(render(&session, "login", NoContext::default()).into_response())
        }
    }
}

/// Registration is closed; users are provisioned by an administrator
#[utoipa::path(
    get,
    path = "/register",
    tag = "auth",
    responses((status = 403, description = "Registration is disabled", body = String))
)]
pub async fn register() -> AppResult<()> {
    Err(AppError::Forbidden(REGISTRATION_DISABLED.to_string()))
}

/// Clear the session
#[utoipa::path(
    get,
    path = "/logout",
    tag = "auth",
    responses((status = 303, description = "Redirect to /login"))
)]
pub async fn logout(session: Session) -> Redirect {
    session.clear();
    session.flash("info", "You have been logged out.");
    Redirect::to("/login")
}
