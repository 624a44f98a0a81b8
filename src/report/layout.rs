//! Report layout — the ordered block list, before any PDF work.

use std::path::PathBuf;

use crate::config::{Clinician, ReportConfig};
use crate::models::{DiagnosisResult, ReportFields};

use super::staging::{print_pixels, stage_image, StagedImage};

pub const REPORT_TITLE: &str = "Informe Colposcópico - ColpoVision";
pub const IMAGE_UNAVAILABLE: &str = "Imagen no disponible para impresión";
pub const SIGNATURE_LABEL: &str = "Firma digital:";

/// Embedded source image size (12 cm × 9 cm).
pub const SOURCE_IMAGE_MM: (f32, f32) = (120.0, 90.0);
/// Embedded signature size (5 cm × 2 cm).
pub const SIGNATURE_MM: (f32, f32) = (50.0, 20.0);
/// Resolution images are sized for; anything finer is discarded.
pub const PRINT_DPI: f32 = 300.0;

/// Vertical gaps, in points.
const GAP: f32 = 12.0;
const GAP_BEFORE_IMAGE: f32 = 24.0;

/// One unit of report content, in print order.
#[derive(Debug)]
pub enum Block {
    Title(String),
    Text(String),
    Heading(String),
    /// Vertical space in points.
    Spacer(f32),
    Image(ImageBlock),
}

impl Block {
    /// Printed text of text-bearing blocks.
    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Title(s) | Block::Text(s) | Block::Heading(s) => Some(s),
            Block::Spacer(_) | Block::Image(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    Source,
    Signature,
}

#[derive(Debug)]
pub enum ImageSource {
    Staged(StagedImage),
    Asset(PathBuf),
}

/// An image placed at a fixed size, with the lines printed if it cannot be
/// read back at render time.
#[derive(Debug)]
pub struct ImageBlock {
    pub role: ImageRole,
    pub source: ImageSource,
    pub width_mm: f32,
    pub height_mm: f32,
    pub fallback: Vec<String>,
}

/// Build the report blocks in their fixed order.
///
/// Staging the source image happens here; the staged file lives inside the
/// returned blocks and is removed when they are dropped.
pub fn build_blocks(
    fields: &ReportFields,
    diagnosis: &DiagnosisResult,
    config: &ReportConfig,
) -> Vec<Block> {
    let clinician = &config.clinician;

    let mut blocks = vec![
        Block::Title(REPORT_TITLE.into()),
        Block::Spacer(GAP),
        Block::Text(format!("{} - {}", clinician.name, clinician.specialty)),
        Block::Text(clinician.credentials.clone()),
        Block::Spacer(GAP),
        Block::Text(format!("Fecha: {}", fields.formatted_date())),
        Block::Text(format!("Paciente: {}", fields.patient_name)),
        Block::Text(format!("Edad: {}", fields.age)),
        Block::Text(format!("Motivo: {}", fields.reason_for_visit)),
        Block::Spacer(GAP),
        Block::Text(format!("Diagnóstico IA: {}", diagnosis.summary())),
        Block::Text(format!("Prioridad: {}", diagnosis.priority)),
        Block::Text(format!(
            "Recomendación: {}",
            effective_recommendation(fields, diagnosis)
        )),
    ];

    let sections = [
        ("Técnica utilizada:", &fields.technique),
        ("Hallazgos colposcópicos:", &fields.findings),
        ("Impresión diagnóstica:", &fields.impression),
    ];
    for (heading, body) in sections {
        blocks.push(Block::Spacer(GAP));
        blocks.push(Block::Heading(heading.into()));
        blocks.push(Block::Text(body.clone()));
    }

    blocks.push(Block::Spacer(GAP_BEFORE_IMAGE));
    blocks.push(source_image_block(fields, config));

    blocks.push(Block::Spacer(GAP));
    blocks.push(Block::Text(SIGNATURE_LABEL.into()));
    blocks.extend(signature_blocks(config));

    blocks
}

/// The operator's text wins; an empty field falls back to the screening
/// recommendation it was pre-filled with.
pub fn effective_recommendation<'a>(
    fields: &'a ReportFields,
    diagnosis: &'a DiagnosisResult,
) -> &'a str {
    if fields.recommendations.trim().is_empty() {
        &diagnosis.recommendation
    } else {
        &fields.recommendations
    }
}

/// Signature fallback: name, specialty, credential numbers.
pub fn clinician_lines(clinician: &Clinician) -> Vec<String> {
    vec![
        clinician.name.clone(),
        clinician.specialty.clone(),
        clinician.credentials.clone(),
    ]
}

fn source_image_block(fields: &ReportFields, config: &ReportConfig) -> Block {
    let Some(bytes) = fields.source_image.as_deref() else {
        tracing::info!("No source image uploaded, printing placeholder");
        return Block::Text(IMAGE_UNAVAILABLE.into());
    };

    let max_px = print_pixels(SOURCE_IMAGE_MM, PRINT_DPI);
    match stage_image(bytes, &config.staging_dir, max_px) {
        Ok(staged) => Block::Image(ImageBlock {
            role: ImageRole::Source,
            source: ImageSource::Staged(staged),
            width_mm: SOURCE_IMAGE_MM.0,
            height_mm: SOURCE_IMAGE_MM.1,
            fallback: vec![IMAGE_UNAVAILABLE.into()],
        }),
        Err(e) => {
            tracing::warn!(error = %e, size = bytes.len(), "Source image unusable, printing placeholder");
            Block::Text(IMAGE_UNAVAILABLE.into())
        }
    }
}

fn signature_blocks(config: &ReportConfig) -> Vec<Block> {
    let fallback = clinician_lines(&config.clinician);

    match config.signature_path() {
        Some(path) => vec![Block::Image(ImageBlock {
            role: ImageRole::Signature,
            source: ImageSource::Asset(path),
            width_mm: SIGNATURE_MM.0,
            height_mm: SIGNATURE_MM.1,
            fallback,
        })],
        None => {
            tracing::warn!(
                candidates = ?config.signature_candidates,
                "Signature asset not found, printing clinician block"
            );
            fallback.into_iter().map(Block::Text).collect()
        }
    }
}
