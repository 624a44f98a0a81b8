//! `POST /api/analyze` — screening result for an uploaded image.

use axum::extract::{Multipart, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::form::collect_image;
use crate::api::types::AppContext;
use crate::models::DiagnosisResult;

pub async fn analyze(
    State(ctx): State<AppContext>,
    multipart: Multipart,
) -> Result<Json<DiagnosisResult>, ApiError> {
    let image = collect_image(multipart)
        .await?
        .ok_or_else(|| ApiError::BadRequest("No se recibió ninguna imagen.".into()))?;

    let result = ctx.classifier.classify(&image);
    tracing::info!(
        size = image.len(),
        priority = %result.priority,
        "Image analyzed"
    );

    Ok(Json(result))
}
