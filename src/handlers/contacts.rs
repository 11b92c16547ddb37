//! Contact handlers: create, list, read, replace, patch, delete.

use crate::error::{AppError, ErrorBody};
use crate::extractors::ValidJson;
use crate::model::{Contact, ContactPatch, NewContact};
use crate::response::{success_created, success_ok};
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use std::collections::HashMap;

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id: {}", id_str)))
}

/// Read a non-negative integer query parameter; absent means default.
fn page_param(params: &HashMap<String, String>, key: &str) -> Result<Option<u32>, AppError> {
    match params.get(key) {
        None => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("{} must be a non-negative integer", key))),
    }
}

fn not_found(id_str: String) -> AppError {
    AppError::NotFound(format!("contact {}", id_str))
}

#[utoipa::path(
    get,
    path = "/contacts/",
    tag = "contacts",
    params(
        ("skip" = Option<u32>, Query, description = "Rows to skip (default 0)"),
        ("limit" = Option<u32>, Query, description = "Maximum rows (default 100, max 1000)"),
    ),
    responses(
        (status = 200, description = "Contacts in insertion order", body = [Contact]),
        (status = 400, description = "Bad skip or limit", body = ErrorBody),
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let skip = page_param(&params, "skip")?;
    let limit = page_param(&params, "limit")?;
    let rows = state.service.get_contacts(skip, limit).await?;
    Ok(success_ok(rows))
}

#[utoipa::path(
    post,
    path = "/contacts/",
    tag = "contacts",
    request_body = NewContact,
    responses(
        (status = 201, description = "Contact created", body = Contact),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 422, description = "Invalid fields", body = ErrorBody),
    )
)]
pub async fn create(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<NewContact>,
) -> Result<impl IntoResponse, AppError> {
    let row = state.service.create_contact(body).await?;
    Ok(success_created(row))
}

#[utoipa::path(
    get,
    path = "/contacts/{id}",
    tag = "contacts",
    params(("id" = i64, Path, description = "Contact id")),
    responses(
        (status = 200, description = "The contact", body = Contact),
        (status = 404, description = "No such contact", body = ErrorBody),
    )
)]
pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = state
        .service
        .get_contact(id)
        .await?
        .ok_or_else(|| not_found(id_str))?;
    Ok(success_ok(row))
}

#[utoipa::path(
    put,
    path = "/contacts/{id}",
    tag = "contacts",
    params(("id" = i64, Path, description = "Contact id")),
    request_body = NewContact,
    responses(
        (status = 200, description = "Contact replaced; omitted address becomes null", body = Contact),
        (status = 404, description = "No such contact", body = ErrorBody),
        (status = 409, description = "Email already registered to another contact", body = ErrorBody),
        (status = 422, description = "Invalid fields", body = ErrorBody),
    )
)]
pub async fn replace(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    ValidJson(body): ValidJson<NewContact>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = state
        .service
        .update_contact(id, body)
        .await?
        .ok_or_else(|| not_found(id_str))?;
    Ok(success_ok(row))
}

#[utoipa::path(
    patch,
    path = "/contacts/{id}",
    tag = "contacts",
    params(("id" = i64, Path, description = "Contact id")),
    request_body = ContactPatch,
    responses(
        (status = 200, description = "Contact updated", body = Contact),
        (status = 404, description = "No such contact", body = ErrorBody),
        (status = 409, description = "Email already registered to another contact", body = ErrorBody),
        (status = 422, description = "Invalid fields", body = ErrorBody),
    )
)]
pub async fn patch(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    ValidJson(body): ValidJson<ContactPatch>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = state
        .service
        .patch_contact(id, body)
        .await?
        .ok_or_else(|| not_found(id_str))?;
    Ok(success_ok(row))
}

#[utoipa::path(
    delete,
    path = "/contacts/{id}",
    tag = "contacts",
    params(("id" = i64, Path, description = "Contact id")),
    responses(
        (status = 200, description = "The deleted contact", body = Contact),
        (status = 404, description = "No such contact", body = ErrorBody),
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let row = state
        .service
        .delete_contact(id)
        .await?
        .ok_or_else(|| not_found(id_str))?;
    Ok(success_ok(row))
}
