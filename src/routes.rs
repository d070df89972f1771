use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::attachments;
use crate::locale::LocaleCatalog;
use crate::pdf::PdfFetcher;

/// Collaborators shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn LocaleCatalog>,
    pub fetcher: Arc<dyn PdfFetcher>,
}

impl AppState {
    pub fn new(catalog: Arc<dyn LocaleCatalog>, fetcher: Arc<dyn PdfFetcher>) -> Self {
        Self { catalog, fetcher }
    }
}

async fn root() -> &'static str {
    "Emailer API"
}

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route(
            "/api/attachments/:document",
            post(attachments::api::build_attachment),
        )
        .layer(Extension(state))
}
