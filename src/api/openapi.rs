//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, copies, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "0.1.0",
        description = "Library Catalog Manager REST API"
    ),
    servers(
        (url = "/api", description = "API root")
    ),
    paths(
        // Health
        health::health_check,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Copies & circulation
        copies::add_copy,
        copies::update_copy,
        copies::remove_copy,
        copies::borrow_copy,
        copies::return_copy,
        copies::archive_copy,
    ),
    components(
        schemas(
            crate::models::Book,
            crate::models::BookStatus,
            crate::models::BookCopy,
            crate::models::CopyStatus,
            crate::models::BorrowRecord,
            crate::models::book::CreateBookRequest,
            crate::models::book::UpdateBookRequest,
            crate::models::copy::CreateCopyRequest,
            crate::models::copy::UpdateCopyRequest,
            crate::models::copy::BorrowRecordPayload,
            crate::models::copy::BorrowRequest,
            crate::models::copy::ReturnRequest,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog management"),
        (name = "copies", description = "Physical copy management"),
        (name = "circulation", description = "Borrow and return lifecycle")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
