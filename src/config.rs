use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Application-level constants
pub const APP_NAME: &str = "ColpoVision";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Download name of the exported report.
pub const REPORT_FILENAME: &str = "informe_colposcopico.pdf";

/// Signature image looked up at generation time.
pub const SIGNATURE_FILENAME: &str = "firma_yesid.png";

/// Default listen port for the local form server.
pub const DEFAULT_PORT: u16 = 8501;

/// 20 MB covers a phone photo plus multipart overhead.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "colpovision=info,colpovision_lib=info,tower_http=info"
}

/// Get the application data directory
/// ~/ColpoVision/ on all platforms. Falls back to the working directory
/// when no home directory can be determined.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Candidate locations for the signature asset, in lookup order.
pub fn signature_candidates() -> Vec<PathBuf> {
    vec![
        PathBuf::from(SIGNATURE_FILENAME),
        app_data_dir().join(SIGNATURE_FILENAME),
    ]
}

/// First existing file among `candidates`, if any.
pub fn locate_signature(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.is_file()).cloned()
}

/// Clinician identity printed under the report title and used as the
/// signature fallback block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clinician {
    pub name: String,
    pub specialty: String,
    pub credentials: String,
}

impl Default for Clinician {
    fn default() -> Self {
        Self {
            name: "Dr. Yesid Acosta Peinado".into(),
            specialty: "Ginecólogo y Obstetra".into(),
            credentials: "M.P. 33210 - M.E. 16665".into(),
        }
    }
}

/// Report composition settings.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub clinician: Clinician,
    /// Signature locations, checked in order each time a report is composed.
    /// Empty or all missing: the fallback block is printed.
    pub signature_candidates: Vec<PathBuf>,
    /// Directory for the per-request image staging file.
    pub staging_dir: PathBuf,
}

impl ReportConfig {
    /// The signature asset present right now, if any.
    pub fn signature_path(&self) -> Option<PathBuf> {
        locate_signature(&self.signature_candidates)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            clinician: Clinician::default(),
            signature_candidates: signature_candidates(),
            staging_dir: std::env::temp_dir(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::new(Ipv4Addr::LOCALHOST.into(), DEFAULT_PORT),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}
