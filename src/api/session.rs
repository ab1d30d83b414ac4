//! Cookie-bound session context threaded through each request

use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::user::{User, ADMIN_ROLE},
    services::sessions::{Flash, SessionData},
    AppState,
};

#[derive(Debug, Default)]
struct SessionState {
    data: SessionData,
    dirty: bool,
}

/// Session state for the current request.
///
/// Loaded by [`session_layer`] before the handler runs and written back afterwards
/// if anything changed.
#[derive(Clone, Debug, Default)]
pub struct Session {
    inner: Arc<Mutex<SessionState>>,
}

impl Session {
    fn new(data: SessionData) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState { data, dirty: false })),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        // A poisoned lock still holds usable session data
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn user_id(&self) -> Option<i64> {
        self.state().data.user_id
    }

    pub fn is_admin(&self) -> bool {
        self.state().data.user_role.as_deref() == Some(ADMIN_ROLE)
    }

    /// Bind an identified user to the session
    pub fn login(&self, user: &User) {
        let mut state = self.state();
        state.data.user_id = Some(user.id);
        state.data.user_role = Some(user.role.clone());
        state.dirty = true;
    }

    /// Drop everything, flashes included
    pub fn clear(&self) {
        let mut state = self.state();
        state.data = SessionData::default();
        state.dirty = true;
    }

    pub fn flash(&self, category: &str, message: impl Into<String>) {
        let mut state = self.state();
        state.data.flashes.push(Flash {
            category: category.to_string(),
            message: message.into(),
        });
        state.dirty = true;
    }

    /// Pop all pending flash messages
    pub fn take_flashes(&self) -> Vec<Flash> {
        let mut state = self.state();
        if state.data.flashes.is_empty() {
            return Vec::new();
        }
        state.dirty = true;
        std::mem::take(&mut state.data.flashes)
    }

    fn changes(&self) -> Option<SessionData> {
        let state = self.state();
        state.dirty.then(|| state.data.clone())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("Session layer is not installed".to_string()))
    }
}

/// Middleware loading the session named by the cookie and persisting changes
pub async fn session_layer(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let cookie_name = state.config.session.cookie_name.clone();
    let store = state.services.sessions.clone();

    let session_id = jar.get(&cookie_name).map(|c| c.value().to_string());
    let data = match &session_id {
        Some(id) => store.load(id).await?.unwrap_or_default(),
        None => SessionData::default(),
    };

    let session = Session::new(data);
    request.extensions_mut().insert(session.clone());

    let response = next.run(request).await;

    let Some(data) = session.changes() else {
        return Ok(response);
    };

    if data.is_empty() {
        let Some(id) = session_id else {
            return Ok(response);
        };
        store.remove(&id).await?;
        let jar = jar.remove(Cookie::build(cookie_name).path("/"));
        return Ok((jar, response).into_response());
    }

    match session_id {
        Some(id) => {
            store.store(&id, &data).await?;
            Ok(response)
        }
        None => {
            let id = Uuid::new_v4().to_string();
            store.store(&id, &data).await?;
            let cookie = Cookie::build((cookie_name, id))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax);
            Ok((jar.add(cookie), response).into_response())
        }
    }
}
