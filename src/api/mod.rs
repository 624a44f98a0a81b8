//! Local report form server.
//!
//! Serves the form page, the screening result for an uploaded image, and the
//! composed PDF. `app_router()` returns a `Router` that can be mounted on any
//! axum server instance; `start_server_on()` runs it on its own listener.

pub mod endpoints;
pub mod error;
pub mod form;
pub mod router;
pub mod server;
pub mod types;

pub use router::app_router;
pub use server::{start_server_on, ReportServer, ServerError, ServerSession};
pub use types::AppContext;
