//! Screening capability — image in, `DiagnosisResult` out.
//!
//! The composer and the HTTP layer only see `dyn Classifier`. The shipped
//! implementation is a fixed placeholder; a trained model plugs in here.

use crate::models::DiagnosisResult;

/// Produces a screening result for one uploaded image.
pub trait Classifier: Send + Sync {
    /// `image`: raw upload bytes (JPEG or PNG).
    fn classify(&self, image: &[u8]) -> DiagnosisResult;
}

/// Returns the same result for every image. Not an inference.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderClassifier;

impl Classifier for PlaceholderClassifier {
    fn classify(&self, image: &[u8]) -> DiagnosisResult {
        tracing::debug!(size = image.len(), "Placeholder classifier invoked");
        placeholder_result()
    }
}

/// The fixed placeholder result.
pub fn placeholder_result() -> DiagnosisResult {
    DiagnosisResult {
        label: "Sospechosa de lesión de alto grado (NIC 2-3)".into(),
        confidence: "91%".into(),
        priority: "Urgente".into(),
        recommendation: "Biopsia dirigida inmediata + derivación según protocolo".into(),
    }
}
