//! HTTP transport around the processing pipeline.
//!
//! Routes:
//! - `GET /` upload form
//! - `POST /process` multipart request, JSON result
//! - `GET /download/:filename` stored document as an attachment

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::AppContainer;

pub mod error;
pub mod handlers;

pub use error::ApiError;
pub use handlers::HttpState;

/// Build the router for `container`.
pub fn router(container: &dyn AppContainer) -> Router {
    let config = container.config();
    let state = Arc::new(HttpState {
        process: container.process_interactor(),
        retrieve: container.retrieve_interactor(),
        default_interval: config.default_interval,
        max_upload_bytes: config.max_upload_bytes,
    });

    Router::new()
        .route("/", get(handlers::index))
        .route("/process", post(handlers::process))
        .route("/download/:filename", get(handlers::download))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until the process is stopped.
pub async fn serve(container: &dyn AppContainer, bind: &str) -> anyhow::Result<()> {
    let app = router(container);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
