use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Deserialize;

use super::{Attachment, AttachmentBuilder, Context, DocumentKind, Params, Tenant};
use crate::error::{AppError, AppResult};
use crate::extractor::Caller;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentPayload {
    pub locale: String,
    pub record_id: String,
    pub params: Params,
    pub tenant: Tenant,
}

pub async fn build_attachment(
    Extension(state): Extension<AppState>,
    Caller {
        authorization,
        organization_id,
    }: Caller,
    Path(document): Path<String>,
    Json(payload): Json<AttachmentPayload>,
) -> AppResult<Json<Attachment>> {
    let kind = DocumentKind::from_tag(&document).ok_or(AppError::NotFound)?;
    if payload.record_id.trim().is_empty() {
        return Err(AppError::BadRequest("recordId must not be empty".into()));
    }

    let builder = AttachmentBuilder::new(kind, state.catalog.clone(), state.fetcher.clone());
    let context = Context {
        tenant: payload.tenant,
    };
    let attachment = builder
        .get(
            &authorization,
            &payload.locale,
            &organization_id,
            &payload.record_id,
            &payload.params,
            &context,
        )
        .await?;
    Ok(Json(attachment))
}
