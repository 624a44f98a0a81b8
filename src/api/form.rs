//! Form collector — multipart fields to `ReportFields`.
//!
//! No validation beyond what the composer needs: text is taken as sent,
//! the date must parse, and the image must be JPEG or PNG by magic bytes.

use axum::extract::multipart::Field;
use axum::extract::Multipart;
use chrono::NaiveDate;

use crate::api::error::ApiError;
use crate::models::ReportFields;

pub const IMAGE_FIELD: &str = "image";

/// Detect an accepted image type from magic bytes (not extension or
/// Content-Type header).
pub fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    // JPEG: FF D8 FF
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some("image/jpeg");
    }
    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
        return Some("image/png");
    }
    None
}

/// `YYYY-MM-DD` from an HTML date input. Empty means today.
pub fn parse_study_date(raw: &str, today: NaiveDate) -> Result<NaiveDate, ApiError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(today);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("Fecha del estudio inválida: {raw}")))
}

/// Read the upload part. An empty part (no file chosen) counts as absent.
async fn read_image(field: Field<'_>) -> Result<Option<Vec<u8>>, ApiError> {
    let bytes = field.bytes().await?;
    if bytes.is_empty() {
        return Ok(None);
    }
    match detect_image_mime(&bytes) {
        Some(mime) => {
            tracing::debug!(mime, size = bytes.len(), "Image upload received");
            Ok(Some(bytes.to_vec()))
        }
        None => {
            tracing::warn!(size = bytes.len(), "Rejected upload with unsupported type");
            Err(ApiError::UnsupportedMedia)
        }
    }
}

/// Collect only the image part.
pub async fn collect_image(mut multipart: Multipart) -> Result<Option<Vec<u8>>, ApiError> {
    let mut image = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(IMAGE_FIELD) {
            image = read_image(field).await?;
        }
    }
    Ok(image)
}

/// Collect every report field. Missing text fields stay empty; a missing
/// date is `today`.
pub async fn collect_report_fields(
    mut multipart: Multipart,
    today: NaiveDate,
) -> Result<ReportFields, ApiError> {
    let mut fields = ReportFields {
        date: today,
        ..Default::default()
    };

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            IMAGE_FIELD => fields.source_image = read_image(field).await?,
            "study_date" => fields.date = parse_study_date(&field.text().await?, today)?,
            "patient_name" => fields.patient_name = field.text().await?,
            "age" => fields.age = field.text().await?,
            "reason_for_visit" => fields.reason_for_visit = field.text().await?,
            "technique" => fields.technique = field.text().await?,
            "findings" => fields.findings = field.text().await?,
            "impression" => fields.impression = field.text().await?,
            "recommendations" => fields.recommendations = field.text().await?,
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }

    Ok(fields)
}
