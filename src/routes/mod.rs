//! Router assembly: operational routes at the root, contact routes under the API prefix.

mod common;
mod contacts;

pub use common::common_routes;
pub use contacts::contact_routes;

use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::Router;

/// Largest accepted request body. Enforced by the body extractors, so an oversized
/// body is rejected through `ValidJson` with 413 in the error envelope.
pub const BODY_LIMIT_BYTES: usize = 64 * 1024;

/// The full application router for `state`.
pub fn app(state: AppState) -> Router {
    let prefix = state.settings.api_prefix.clone();
    let api = contact_routes(state.clone());
    let api = if prefix.is_empty() {
        api
    } else {
        Router::new().nest(&prefix, api)
    };
    Router::new()
        .merge(common_routes(state))
        .merge(api)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}
