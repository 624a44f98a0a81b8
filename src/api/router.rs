//! Report form router.
//!
//! Returns a composable `Router`. Layers (outermost → innermost):
//! 1. Trace → 2. `Cache-Control: no-store` → 3. Body limit → Handler

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::AppContext;
use crate::config::ServerConfig;

/// Build the form router.
pub fn app_router(ctx: AppContext, config: &ServerConfig) -> Router {
    Router::new()
        .route("/", get(endpoints::page::index))
        .route("/health", get(endpoints::health::check))
        .route("/api/analyze", post(endpoints::analyze::analyze))
        .route("/api/report", post(endpoints::report::export))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // Responses carry patient data
                .layer(SetResponseHeaderLayer::overriding(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-store"),
                )),
        )
        .with_state(ctx)
}
