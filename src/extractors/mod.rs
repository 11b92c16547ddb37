//! Request extractors that reject with the API's error envelope.

pub mod json;
pub use json::ValidJson;
