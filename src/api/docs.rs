//! OpenAPI document derived from the route annotations, plus the routes that
//! serve it.

use axum::http::header;
use axum::routing::get;
use axum::Router;
use utoipa::openapi::server::ServerBuilder;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::{routes, MessageResponse};
use crate::entity::{Entry, EntryPatch, NewEntry};
use crate::error::Result;

pub const UI_PATH: &str = "/api-docs";
pub const JSON_PATH: &str = "/api-docs/openapi.json";
pub const YAML_PATH: &str = "/api-docs/openapi.yaml";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Daily Journal API",
        version = "1.0.0",
        description = "API for Records Management"
    ),
    paths(
        routes::list_entries,
        routes::find_entries_by_title,
        routes::get_entry,
        routes::create_entry,
        routes::update_entry,
        routes::delete_entry,
    ),
    components(schemas(Entry, NewEntry, EntryPatch, MessageResponse)),
    tags((name = "Entry", description = "Journal entries"))
)]
pub struct ApiDoc;

/// The OpenAPI document, pointing at a local server on `port`.
pub fn openapi(port: u16) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.servers = Some(vec![ServerBuilder::new()
        .url(format!("http://localhost:{}", port))
        .description(Some("Local server"))
        .build()]);
    doc
}

pub fn to_yaml(doc: &utoipa::openapi::OpenApi) -> Result<String> {
    Ok(serde_yaml::to_string(doc)?)
}

/// Swagger UI at [`UI_PATH`] and the raw document as JSON and YAML.
pub fn router(port: u16) -> Result<Router> {
    let doc = openapi(port);
    let yaml = to_yaml(&doc)?;

    let router = Router::new()
        .route(
            YAML_PATH,
            get(move || {
                let yaml = yaml.clone();
                async move { ([(header::CONTENT_TYPE, "application/yaml")], yaml) }
            }),
        )
        .merge(SwaggerUi::new(UI_PATH).url(JSON_PATH, doc));

    Ok(router)
}
