//! Contacts API: CRUD over contact records backed by PostgreSQL.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;

pub use bootstrap::{connect, wait_for_database, wait_until_ready};
pub use config::Settings;
pub use error::{AppError, ConfigError};
pub use model::{Contact, ContactPatch, NewContact};
pub use routes::{app, common_routes, contact_routes};
pub use service::ContactService;
pub use state::AppState;
pub use store::{ContactStore, MemoryContactStore, PgContactStore};
