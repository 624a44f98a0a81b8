//! Shared handler state.

use std::sync::Arc;

use crate::classifier::{Classifier, PlaceholderClassifier};
use crate::config::ReportConfig;

/// Cloned into every handler via `State<AppContext>`.
#[derive(Clone)]
pub struct AppContext {
    pub classifier: Arc<dyn Classifier>,
    pub report: Arc<ReportConfig>,
}

impl AppContext {
    pub fn new(classifier: Arc<dyn Classifier>, report: ReportConfig) -> Self {
        Self {
            classifier,
            report: Arc::new(report),
        }
    }

    /// Placeholder classifier with the given report settings.
    pub fn with_placeholder(report: ReportConfig) -> Self {
        Self::new(Arc::new(PlaceholderClassifier), report)
    }
}
