//! View documents: a named view plus its data context.
//!
//! Markup is produced by the front-end; the server only decides which view to show
//! and with what data.

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use super::Session;
use crate::services::sessions::Flash;

/// Rendered view handed to the front-end
#[derive(Debug, Serialize)]
pub struct View<T: Serialize> {
    /// View name, e.g. "index" or "claim_item"
    pub view: &'static str,
    /// Flash messages queued since the last rendered view
    pub flashes: Vec<Flash>,
    pub context: T,
}

/// Context for views that need no data
#[derive(Debug, Default, Serialize, ToSchema)]
pub struct NoContext {}

/// Render `view`, draining the session's pending flashes into it
pub fn render<T: Serialize>(session: &Session, view: &'static str, context: T) -> Json<View<T>> {
    Json(View {
        view,
        flashes: session.take_flashes(),
        context,
    })
}
