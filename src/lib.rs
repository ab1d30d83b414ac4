//! Lost & Found Server
//!
//! Campus lost-and-found tracker: found items are logged with an optional
//! photo, browsed and filtered, and handed back to their owners through a
//! claim record with proof of identity.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use config::SessionBackend;
use repository::Repository;
use services::{
    sessions::{MemorySessionStore, RedisSessionStore, SessionStore},
    Services,
};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Wire the JSON stores, the upload directory and the session backend
pub async fn build_state(config: AppConfig) -> AppResult<AppState> {
    let sessions: Arc<dyn SessionStore> = match config.session.backend {
        SessionBackend::Memory => Arc::new(MemorySessionStore::new(config.session.ttl_seconds)),
        SessionBackend::Redis => {
            let store = RedisSessionStore::new(&config.redis.url, config.session.ttl_seconds).await?;
            tracing::info!("Connected to Redis session store");
            Arc::new(store)
        }
    };

    let repository = Repository::new(&config.storage);
    let services = Services::new(repository, &config.uploads, sessions);
    services.uploads.ensure_dir().await?;

    tracing::info!(
        "Data files under {}, uploads in {}",
        config.storage.data_dir.display(),
        services.uploads.dir().display()
    );

    Ok(AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    })
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let pages = Router::new()
        // Items
        .route("/", get(api::items::index))
        .route("/add", get(api::items::add_item_page).post(api::items::create_item))
        .route(
            "/update/:id",
            get(api::items::edit_item_page).post(api::items::update_item),
        )
        .route("/delete/:id", get(api::items::delete_item))
        // Claims
        .route(
            "/claim/:id",
            get(api::claims::claim_page).post(api::claims::claim_item),
        )
        // Staff
        .route("/staff", get(api::staff::list_staff))
        .route(
            "/staff/add",
            get(api::staff::add_staff_page).post(api::staff::create_staff),
        )
        // Auth
        .route("/login", get(api::auth::login_page).post(api::auth::login))
        .route("/register", get(api::auth::register).post(api::auth::register))
        .route("/logout", get(api::auth::logout))
        // Admin
        .route("/admin", get(api::admin::admin_panel))
        .route("/admin/items", get(api::admin::view_items))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::session::session_layer,
        ))
        // Health
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        .nest_service("/uploads", ServeDir::new(state.services.uploads.dir()))
        .layer(DefaultBodyLimit::max(state.config.uploads.max_body_bytes))
        .with_state(state);

    Router::new()
        .merge(pages)
        .merge(api::openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
