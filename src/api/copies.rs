//! Copy and circulation endpoints
//!
//! Every mutating endpoint answers with the full owning book so the client
//! can refresh its view from a single response.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        copy::{BorrowRequest, CreateCopyRequest, ReturnRequest, UpdateCopyRequest},
        Book,
    },
};

/// Add a copy to a book
#[utoipa::path(
    post,
    path = "/books/{id}/copies",
    tag = "copies",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    request_body = CreateCopyRequest,
    responses(
        (status = 201, description = "Copy added, owning book returned", body = Book),
        (status = 400, description = "Invalid input or duplicate copy id"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn add_copy(
    State(state): State<crate::AppState>,
    Path(book_id): Path<String>,
    payload: Result<Json<CreateCopyRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let payload = super::optional_payload(payload)?;
    let book = state.services.catalog.add_copy(&book_id, payload).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update a copy (partial update)
#[utoipa::path(
    put,
    path = "/books/{bookId}/copies/{copyId}",
    tag = "copies",
    params(
        ("bookId" = String, Path, description = "Book ID"),
        ("copyId" = String, Path, description = "Copy ID")
    ),
    request_body = UpdateCopyRequest,
    responses(
        (status = 200, description = "Copy updated, owning book returned", body = Book),
        (status = 400, description = "Invalid input or duplicate copy id"),
        (status = 404, description = "Book or copy not found")
    )
)]
pub async fn update_copy(
    State(state): State<crate::AppState>,
    Path((book_id, copy_id)): Path<(String, String)>,
    payload: Result<Json<UpdateCopyRequest>, JsonRejection>,
) -> AppResult<Json<Book>> {
    let payload = super::optional_payload(payload)?;
    let book = state
        .services
        .catalog
        .update_copy(&book_id, &copy_id, payload)
        .await?;
    Ok(Json(book))
}

/// Remove a copy from a book
#[utoipa::path(
    delete,
    path = "/books/{bookId}/copies/{copyId}",
    tag = "copies",
    params(
        ("bookId" = String, Path, description = "Book ID"),
        ("copyId" = String, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Copy removed, owning book returned", body = Book),
        (status = 404, description = "Book or copy not found")
    )
)]
pub async fn remove_copy(
    State(state): State<crate::AppState>,
    Path((book_id, copy_id)): Path<(String, String)>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.remove_copy(&book_id, &copy_id).await?;
    Ok(Json(book))
}

/// Borrow a copy
#[utoipa::path(
    post,
    path = "/books/{bookId}/copies/{copyId}/borrow",
    tag = "circulation",
    params(
        ("bookId" = String, Path, description = "Book ID"),
        ("copyId" = String, Path, description = "Copy ID")
    ),
    request_body = BorrowRequest,
    responses(
        (status = 200, description = "Copy borrowed, owning book returned", body = Book),
        (status = 400, description = "Copy already borrowed or borrower missing"),
        (status = 404, description = "Book or copy not found")
    )
)]
pub async fn borrow_copy(
    State(state): State<crate::AppState>,
    Path((book_id, copy_id)): Path<(String, String)>,
    payload: Result<Json<BorrowRequest>, JsonRejection>,
) -> AppResult<Json<Book>> {
    let payload = super::optional_payload(payload)?;
    let book = state
        .services
        .circulation
        .borrow_copy(&book_id, &copy_id, payload)
        .await?;
    Ok(Json(book))
}

/// Return a borrowed copy
#[utoipa::path(
    post,
    path = "/books/{bookId}/copies/{copyId}/return",
    tag = "circulation",
    params(
        ("bookId" = String, Path, description = "Book ID"),
        ("copyId" = String, Path, description = "Copy ID")
    ),
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Copy returned, owning book returned", body = Book),
        (status = 400, description = "Copy is not currently borrowed"),
        (status = 404, description = "Book or copy not found")
    )
)]
pub async fn return_copy(
    State(state): State<crate::AppState>,
    Path((book_id, copy_id)): Path<(String, String)>,
    payload: Result<Json<ReturnRequest>, JsonRejection>,
) -> AppResult<Json<Book>> {
    let payload = super::optional_payload(payload)?;
    let book = state
        .services
        .circulation
        .return_copy(&book_id, &copy_id, payload)
        .await?;
    Ok(Json(book))
}

/// Move a copy into circulation
#[utoipa::path(
    post,
    path = "/books/{bookId}/copies/{copyId}/archive",
    tag = "circulation",
    params(
        ("bookId" = String, Path, description = "Book ID"),
        ("copyId" = String, Path, description = "Copy ID")
    ),
    responses(
        (status = 200, description = "Copy made available, owning book returned", body = Book),
        (status = 404, description = "Book or copy not found")
    )
)]
pub async fn archive_copy(
    State(state): State<crate::AppState>,
    Path((book_id, copy_id)): Path<(String, String)>,
) -> AppResult<Json<Book>> {
    let book = state
        .services
        .circulation
        .archive_copy(&book_id, &copy_id)
        .await?;
    Ok(Json(book))
}
