//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{admin, auth, claims, health, items, staff, views};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Lost & Found API",
        version = "1.0.0",
        description = "Campus lost-and-found item tracker. Page routes answer with a view envelope `{view, flashes, context}`; each response documents its `context` schema.",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login_page,
        auth::login,
        auth::register,
        auth::logout,
        // Items
        items::index,
        items::add_item_page,
        items::create_item,
        items::edit_item_page,
        items::update_item,
        items::delete_item,
        // Claims
        claims::claim_page,
        claims::claim_item,
        // Staff
        staff::list_staff,
        staff::add_staff_page,
        staff::create_staff,
        // Admin
        admin::admin_panel,
        admin::view_items,
    ),
    components(
        schemas(
            views::NoContext,
            crate::services::sessions::Flash,
            // Auth
            crate::models::user::LoginRequest,
            crate::models::user::User,
            // Items
            crate::models::item::Item,
            crate::models::item::ItemStatus,
            crate::models::item::ItemView,
            crate::models::item::ItemForm,
            items::IndexContext,
            items::UpdateItemContext,
            // Claims
            crate::models::item::ClaimForm,
            claims::ClaimItemContext,
            // Staff
            crate::models::staff::Staff,
            crate::models::staff::CreateStaff,
            staff::StaffContext,
            // Admin
            admin::AdminStats,
            admin::AdminPanelContext,
            admin::ItemsContext,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Student ID login"),
        (name = "items", description = "Found item management"),
        (name = "claims", description = "Item claims"),
        (name = "staff", description = "Staff roster"),
        (name = "admin", description = "Admin dashboard")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in ["/", "/add", "/update/{id}", "/claim/{id}", "/staff", "/login", "/admin"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_page_responses_describe_view_envelope() {
        use utoipa::openapi::{PathItemType, RefOr};

        let doc = ApiDoc::openapi();
        let index = &doc.paths.paths["/"].operations[&PathItemType::Get];
        match &index.responses.responses["200"] {
            RefOr::T(response) => {
                assert!(response.description.contains(r#"{view: "index", flashes, context}"#))
            }
            RefOr::Ref(_) => panic!("index response should be inline"),
        }
    }
}
