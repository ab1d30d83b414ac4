//! HTTP handlers for the Lost & Found routes

pub mod admin;
pub mod auth;
pub mod claims;
pub mod forms;
pub mod health;
pub mod items;
pub mod openapi;
pub mod session;
pub mod staff;
pub mod views;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;

pub use session::Session;

/// Extractor for a visitor who has identified with a student id.
///
/// Without a session user the request is redirected to `/login`.
pub struct CurrentUser {
    pub user_id: i64,
    pub session: Session,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;

        let user_id = session.user_id().ok_or(AppError::LoginRequired)?;

        Ok(CurrentUser { user_id, session })
    }
}

/// Extractor for an identified user whose session role is "Admin".
///
/// Other users get a flash message and are sent back to the item list.
pub struct AdminUser(pub CurrentUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;

        if !user.session.is_admin() {
            tracing::warn!("User {} denied admin access", user.user_id);
            user.session.flash("error", "Admin access required.");
            return Err(AppError::AdminRequired);
        }

        Ok(AdminUser(user))
    }
}
