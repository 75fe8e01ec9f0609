//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, borrows, categories, health, settings, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "1.0.0",
        description = "Library Catalog Management REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::rate_book,
        books::review_book,
        books::list_reviews,
        // Categories
        categories::list_categories,
        categories::get_category,
        categories::create_category,
        categories::update_category,
        categories::delete_category,
        // Borrow
        borrows::create_borrow,
        borrows::my_borrows,
        borrows::update_borrow_status,
        borrows::update_request_status,
        borrows::delete_borrow,
        borrows::count_by_borrow_status,
        borrows::list_by_borrow_status,
        borrows::count_by_request_status,
        borrows::list_by_request_status,
        // Users
        users::create_user,
        // Settings
        settings::get_settings,
        settings::update_settings,
        settings::get_public_settings,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            auth::UserInfo,
            // Books
            books::PaginatedBooks,
            crate::models::book::Book,
            crate::models::book::BookSummary,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            crate::models::book::BookQuery,
            // Categories
            crate::models::category::Category,
            crate::models::category::CreateCategory,
            crate::models::category::UpdateCategory,
            // Borrow
            crate::models::borrow::BorrowRecord,
            crate::models::borrow::BorrowDetails,
            crate::models::borrow::BorrowStatus,
            crate::models::borrow::RequestStatus,
            crate::models::borrow::CreateBorrow,
            crate::models::borrow::UpdateBorrowStatus,
            borrows::UpdateRequestStatus,
            borrows::BorrowCountResponse,
            // Ratings & reviews
            crate::models::rating::UserRating,
            crate::models::rating::RateBook,
            crate::models::rating::Review,
            crate::models::rating::CreateReview,
            // Users
            crate::models::user::CreateUser,
            crate::models::user::Role,
            // Settings
            crate::models::settings::Settings,
            crate::models::settings::UpdateSettings,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "books", description = "Catalog book management"),
        (name = "categories", description = "Category management"),
        (name = "borrow", description = "Borrow workflow"),
        (name = "users", description = "User management"),
        (name = "settings", description = "Global settings")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
