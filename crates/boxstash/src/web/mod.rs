//! HTTP server: router, shared state, and error-to-response mapping.

pub mod handlers;
pub mod pages;

use std::sync::Arc;

use anyhow::Context as _;
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::Error;
use crate::store::{BoxStore, PhotoStore};

/// Shared state for all handlers.
#[derive(Debug)]
pub struct AppState {
    /// The box record store.
    pub boxes: BoxStore,
    /// The photo store.
    pub photos: PhotoStore,
    /// Configured public base URL for QR codes, if any.
    pub public: Option<String>,
}

impl AppState {
    /// Open both stores under the configured data root.
    ///
    /// # Errors
    ///
    /// Returns an error if the store directories cannot be created.
    pub fn from_config(config: &Config) -> crate::error::Result<Self> {
        let root = config.data_root();
        Ok(Self {
            boxes: BoxStore::open(&root)?,
            photos: PhotoStore::open(&root)?,
            public: config.server.public.clone(),
        })
    }

    /// Base URL for links encoded into QR codes.
    ///
    /// Uses the configured public URL when set (trailing slash trimmed),
    /// otherwise falls back to `http://<host>` from the request.
    #[must_use]
    pub fn base_url(&self, host: &str) -> String {
        match &self.public {
            Some(public) => public.trim_end_matches('/').to_string(),
            None => format!("http://{host}"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if self.is_invalid_input() {
            warn!("rejected request input: {self}");
            (StatusCode::BAD_REQUEST, self.to_string()).into_response()
        } else {
            error!("request failed: {self}");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response()
        }
    }
}

/// Build the application router.
#[must_use]
pub fn router(state: Arc<AppState>, upload_limit: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/new", get(handlers::new_box))
        .route("/search", get(handlers::search))
        .route("/box/:id", get(handlers::view_box))
        .route(
            "/box/:id/edit",
            get(handlers::edit_form).post(handlers::edit_submit),
        )
        .route("/box/:id/qr", get(handlers::download_qr))
        .route("/box/:id/delete", post(handlers::delete_box))
        .route("/box/:id/photos", post(handlers::upload_photo))
        .route("/box/:id/photos/:filename", get(handlers::serve_photo))
        .route(
            "/box/:id/photos/:filename/delete",
            post(handlers::delete_photo),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

/// Run the HTTP server until the process is stopped.
///
/// # Errors
///
/// Returns an error if the stores cannot be opened, the bind address is
/// invalid or in use, or the server fails while running.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let state = Arc::new(AppState::from_config(config)?);
    let app = router(state, config.upload.limit);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("Listening on http://{addr}");
    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
