//! `POST /api/report` — compose the PDF and return it as a download.

use axum::extract::{Multipart, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::form::collect_report_fields;
use crate::api::types::AppContext;
use crate::config::REPORT_FILENAME;
use crate::report::compose_report;

pub async fn export(
    State(ctx): State<AppContext>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let today = chrono::Local::now().date_naive();
    let fields = collect_report_fields(multipart, today).await?;

    let report_id = Uuid::new_v4();
    let classifier = ctx.classifier.clone();
    let config = ctx.report.clone();

    // printpdf and image decoding are CPU-bound
    let composed = tokio::task::spawn_blocking(move || {
        let span = tracing::info_span!("report", id = %report_id);
        span.in_scope(|| {
            let image = fields.source_image.as_deref().unwrap_or_default();
            let diagnosis = classifier.classify(image);
            compose_report(&fields, &diagnosis, &config)
        })
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Report task failed: {e}")))??;

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{REPORT_FILENAME}\""),
            ),
        ],
        composed.bytes,
    )
        .into_response())
}
