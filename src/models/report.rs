use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Operator-entered values for one report. Lives for a single request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportFields {
    pub patient_name: String,
    pub age: String,
    pub date: NaiveDate,
    pub reason_for_visit: String,
    pub technique: String,
    pub findings: String,
    pub impression: String,
    pub recommendations: String,
    /// Raw upload bytes; never serialized back to the client.
    #[serde(skip)]
    pub source_image: Option<Vec<u8>>,
}

impl ReportFields {
    /// Study date in day/month/year order.
    pub fn formatted_date(&self) -> String {
        self.date.format("%d/%m/%Y").to_string()
    }
}
