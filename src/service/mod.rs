//! ContactService: the contact operations over an injected store.

mod contacts;
mod validation;
pub use contacts::{ContactService, DEFAULT_LIMIT, MAX_LIMIT};
pub use validation::{ContactValidator, FieldViolation, ValidationErrors};
