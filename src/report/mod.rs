//! Colposcopy report composer.
//!
//! `ReportFields` + `DiagnosisResult` → one A4 PDF. Two steps:
//! 1. `layout::build_blocks` — fixed block order, image staging, fallbacks
//! 2. `render::render` — pagination and serialization via `printpdf`
//!
//! Image problems degrade to fallback text. Only document assembly errors
//! fail the call.

pub mod layout;
pub mod metrics;
pub mod render;
pub mod staging;

use thiserror::Error;

use crate::config::ReportConfig;
use crate::models::{DiagnosisResult, ReportFields};

pub use layout::{Block, ImageRole, IMAGE_UNAVAILABLE, REPORT_TITLE};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("PDF font error: {0}")]
    Font(String),

    #[error("PDF serialization error: {0}")]
    Serialize(String),
}

/// A composed report ready for download.
#[derive(Debug)]
pub struct ComposedReport {
    pub bytes: Vec<u8>,
    pub pages: usize,
    pub image_embedded: bool,
    pub signature_embedded: bool,
}

/// Compose the report PDF.
///
/// The image staging file, if any, is gone by the time this returns.
pub fn compose_report(
    fields: &ReportFields,
    diagnosis: &DiagnosisResult,
    config: &ReportConfig,
) -> Result<ComposedReport, ReportError> {
    let blocks = layout::build_blocks(fields, diagnosis, config);
    let rendered = render::render(&blocks, REPORT_TITLE)?;
    // releases the staged image
    drop(blocks);

    let report = ComposedReport {
        image_embedded: rendered.embedded.contains(&ImageRole::Source),
        signature_embedded: rendered.embedded.contains(&ImageRole::Signature),
        pages: rendered.pages,
        bytes: rendered.bytes,
    };

    tracing::info!(
        size = report.bytes.len(),
        pages = report.pages,
        image = report.image_embedded,
        signature = report.signature_embedded,
        "Report composed"
    );

    Ok(report)
}
