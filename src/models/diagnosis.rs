use serde::{Deserialize, Serialize};

/// Output of the screening step, consumed by the report composer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisResult {
    pub label: String,
    pub confidence: String,
    pub priority: String,
    pub recommendation: String,
}

impl DiagnosisResult {
    /// `<label> - <confidence>`, as printed on the summary line.
    pub fn summary(&self) -> String {
        format!("{} - {}", self.label, self.confidence)
    }
}
