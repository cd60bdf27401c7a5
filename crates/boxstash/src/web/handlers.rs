//! HTTP route handlers.
//!
//! Each handler is a thin adapter: parse identifiers from the path, call
//! the stores, and render a page or redirect. Filesystem work happens
//! synchronously inside the handler; the files involved are small.

use std::sync::Arc;

use axum::{
    extract::{Host, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::debug;

use crate::error::Result;
use crate::qr;
use crate::store::photos;
use crate::web::{pages, AppState};

/// Form body for edit submissions.
#[derive(Debug, Deserialize)]
pub struct EditForm {
    /// The full replacement markdown content.
    #[serde(default)]
    pub content: String,
}

/// Query string for the search page.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// The search query.
    #[serde(default)]
    pub q: String,
}

/// `GET /` — list all boxes.
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>> {
    let boxes = state.boxes.list()?;
    Ok(Html(pages::index(&boxes)))
}

/// `GET /box/{id}` — box detail page, created from the template if absent.
pub async fn view_box(
    State(state): State<Arc<AppState>>,
    Host(host): Host,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let content = state.boxes.get_or_create(&id)?;
    let photos = state.photos.list(&id)?;

    let qr_url = format!("{}/box/{id}", state.base_url(&host));
    let qr_base64 = qr::generate_base64(&qr_url)?;

    Ok(Html(pages::view_box(
        &id, &content, &qr_base64, &qr_url, &photos,
    )))
}

/// `GET /box/{id}/edit` — edit form; shows the template for a box that
/// does not exist yet, without persisting it.
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Html<String>> {
    let content = state
        .boxes
        .read(&id)?
        .unwrap_or_else(|| crate::store::BoxStore::template(&id));
    Ok(Html(pages::edit_box(&id, &content)))
}

/// `POST /box/{id}/edit` — persist the submitted content verbatim.
pub async fn edit_submit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<EditForm>,
) -> Result<Redirect> {
    state.boxes.write(&id, &form.content)?;
    Ok(Redirect::to(&format!("/box/{id}")))
}

/// `GET /box/{id}/qr` — QR code PNG as a download attachment.
pub async fn download_qr(
    State(state): State<Arc<AppState>>,
    Host(host): Host,
    Path(id): Path<String>,
) -> Result<Response> {
    let qr_url = format!("{}/box/{id}", state.base_url(&host));
    let png = qr::generate(&qr_url)?;

    let headers = [
        (header::CONTENT_TYPE, "image/png".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", qr::download_filename(&id)),
        ),
    ];
    Ok((headers, png).into_response())
}

/// `GET /new` — allocate a fresh id and redirect to its edit page.
pub async fn new_box(State(state): State<Arc<AppState>>) -> Result<Redirect> {
    let id = state.boxes.generate_id()?;
    Ok(Redirect::to(&format!("/box/{id}/edit")))
}

/// `GET /search?q=...` — search results page.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Html<String>> {
    let hits = state.boxes.search(&query.q)?;
    Ok(Html(pages::search(&query.q, &hits)))
}

/// `POST /box/{id}/photos` — multipart photo upload.
///
/// A missing `photo` part, an empty filename, a disallowed extension, or a
/// malformed body all redirect back with no effect.
pub async fn upload_photo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Redirect> {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("photo") {
            continue;
        }
        let original = field.file_name().unwrap_or_default().to_string();
        if original.is_empty() {
            debug!("Upload for box {id} had an empty filename, ignoring");
            break;
        }
        let Ok(bytes) = field.bytes().await else {
            debug!("Upload for box {id} had a malformed body, ignoring");
            break;
        };
        state.photos.add(&id, &original, &bytes)?;
        break;
    }

    Ok(Redirect::to(&format!("/box/{id}")))
}

/// `GET /box/{id}/photos/{filename}` — raw image bytes or 404.
pub async fn serve_photo(
    State(state): State<Arc<AppState>>,
    Path((id, filename)): Path<(String, String)>,
) -> Result<Response> {
    match state.photos.read(&id, &filename)? {
        Some(bytes) => {
            let headers = [(header::CONTENT_TYPE, photos::content_type(&filename))];
            Ok((headers, bytes).into_response())
        }
        None => Ok((StatusCode::NOT_FOUND, "Not found").into_response()),
    }
}

/// `POST /box/{id}/photos/{filename}/delete` — delete one photo.
pub async fn delete_photo(
    State(state): State<Arc<AppState>>,
    Path((id, filename)): Path<(String, String)>,
) -> Result<Redirect> {
    state.photos.delete(&id, &filename)?;
    Ok(Redirect::to(&format!("/box/{id}")))
}

/// `POST /box/{id}/delete` — delete a box and all its photos.
pub async fn delete_box(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Redirect> {
    state.boxes.delete(&id)?;
    state.photos.delete_all(&id)?;
    Ok(Redirect::to("/"))
}
