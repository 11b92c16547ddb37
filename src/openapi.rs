//! OpenAPI document for the contact routes.

use crate::error::{ErrorBody, ErrorDetail};
use crate::handlers::contacts;
use crate::model::{Contact, ContactPatch, NewContact};
use crate::config::Settings;
use utoipa::openapi::server::Server;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        contacts::list,
        contacts::create,
        contacts::read,
        contacts::replace,
        contacts::patch,
        contacts::delete,
    ),
    components(schemas(Contact, NewContact, ContactPatch, ErrorBody, ErrorDetail)),
    tags((name = "contacts", description = "Contact records"))
)]
pub struct ApiDoc;

/// The document with the configured title and route prefix filled in.
pub fn api_doc(settings: &Settings) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = settings.project_name.clone();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();
    if !settings.api_prefix.is_empty() {
        doc.servers = Some(vec![Server::new(settings.api_prefix.clone())]);
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_contact_route() {
        let doc = api_doc(&Settings::default());
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        assert!(paths.contains(&"/contacts/"));
        assert!(paths.contains(&"/contacts/{id}"));
        assert_eq!(doc.info.title, "contacts-api");
        let servers = doc.servers.unwrap_or_default();
        assert_eq!(servers[0].url, "/api/v1");
    }
}
