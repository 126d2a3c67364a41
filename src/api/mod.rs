//! API handlers for the Bookshelf REST endpoints

pub mod books;
pub mod copies;
pub mod health;
pub mod openapi;

use axum::{extract::rejection::JsonRejection, Json};

use crate::error::{AppError, AppResult};

/// Unwrap an optional JSON body. A request that carries no JSON body at all
/// acts like an empty payload; a body that is present but malformed or
/// ill-typed is a validation error, never silently ignored.
pub(crate) fn optional_payload<T: Default>(
    payload: Result<Json<T>, JsonRejection>,
) -> AppResult<T> {
    match payload {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(T::default()),
        Err(rejection) => Err(AppError::Validation(rejection.body_text())),
    }
}
