//! Contact CRUD routes. The collection answers with and without a trailing slash.

use crate::handlers::contacts::{create, delete, list, patch, read, replace};
use crate::openapi::api_doc;
use crate::state::AppState;
use axum::{routing::get, Json, Router};

pub fn contact_routes(state: AppState) -> Router {
    let doc = api_doc(&state.settings);
    Router::new()
        .route("/contacts", get(list).post(create))
        .route("/contacts/", get(list).post(create))
        .route(
            "/contacts/:id",
            get(read).put(replace).patch(patch).delete(delete),
        )
        .route("/openapi.json", get(move || async move { Json(doc) }))
        .with_state(state)
}
