//! Success response helpers. Contacts are returned bare, without an envelope.

use axum::{http::StatusCode, Json};
use serde::Serialize;

pub fn success_created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn success_ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}
