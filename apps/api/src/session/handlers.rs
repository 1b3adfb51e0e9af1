//! Axum route handlers for the form session API.
//!
//! Each handler performs exactly one user action against one session.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use uuid::Uuid;

use crate::entries::{Category, Entry, EntryId};
use crate::errors::AppError;
use crate::export::content_disposition;
use crate::models::form::FormData;
use crate::session::form_view::render_form_html;
use crate::session::{DisplayedPreview, FormApplied, SessionSnapshot};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct EntryAddedResponse {
    pub category: Category,
    pub entry: Entry,
}

#[derive(Debug, Serialize)]
pub struct FormAppliedResponse {
    #[serde(flatten)]
    pub outcome: FormApplied,
    pub snapshot: SessionSnapshot,
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

fn parse_category(raw: &str) -> Result<Category, AppError> {
    raw.parse::<Category>()
        .map_err(|e| AppError::Validation(e.to_string()))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionSnapshot>) {
    let snapshot = state.sessions.create(|s| s.snapshot()).await;
    (StatusCode::CREATED, Json(snapshot))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    state
        .sessions
        .read(id, |s| s.snapshot())
        .await
        .map(Json)
        .ok_or_else(|| session_not_found(id))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(id))
    }
}

/// GET /api/v1/sessions/:id/form
pub async fn handle_get_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    state
        .sessions
        .read(id, render_form_html)
        .await
        .map(Html)
        .ok_or_else(|| session_not_found(id))
}

/// PUT /api/v1/sessions/:id/form
///
/// Applies a flat form submission. Keys for removed entries are ignored and
/// reported back, never rejected.
pub async fn handle_apply_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<FormData>,
) -> Result<Json<FormAppliedResponse>, AppError> {
    state
        .sessions
        .update(id, |s| FormAppliedResponse {
            outcome: s.apply_form(&form),
            snapshot: s.snapshot(),
        })
        .await
        .map(Json)
        .ok_or_else(|| session_not_found(id))
}

/// POST /api/v1/sessions/:id/entries/:category
pub async fn handle_add_entry(
    State(state): State<AppState>,
    Path((id, category)): Path<(Uuid, String)>,
) -> Result<(StatusCode, Json<EntryAddedResponse>), AppError> {
    let category = parse_category(&category)?;
    let entry = state
        .sessions
        .update(id, |s| {
            s.add_entry(category)
                .and_then(|entry_id| s.entries().get(category, entry_id).cloned())
        })
        .await
        .ok_or_else(|| session_not_found(id))?
        .ok_or_else(|| AppError::Conflict(format!("No more {category} entries can be added")))?;

    Ok((StatusCode::CREATED, Json(EntryAddedResponse { category, entry })))
}

/// DELETE /api/v1/sessions/:id/entries/:category/:entry_id
///
/// Idempotent: removing an entry that is already gone still answers 204.
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Path((id, category, entry_id)): Path<(Uuid, String, u32)>,
) -> Result<StatusCode, AppError> {
    let category = parse_category(&category)?;
    state
        .sessions
        .update(id, |s| s.remove_entry(category, EntryId(entry_id)))
        .await
        .ok_or_else(|| session_not_found(id))?;
    Ok(StatusCode::NO_CONTENT)
}

/// An empty body means "no form". Anything else must be a valid form object.
fn optional_form(body: &Bytes) -> Result<Option<FormData>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Json::<FormData>::from_bytes(body)
        .map(|Json(form)| Some(form))
        .map_err(|e| AppError::Validation(e.body_text()))
}

/// POST /api/v1/sessions/:id/preview
///
/// Submit: optionally applies a form body, then composes and displays the
/// preview from the session as it stands at this moment. A malformed body is
/// rejected and leaves the displayed preview untouched.
pub async fn handle_submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<DisplayedPreview>, AppError> {
    let form = optional_form(&body)?;
    state
        .sessions
        .update(id, |s| s.submit(form.as_ref()).clone())
        .await
        .map(Json)
        .ok_or_else(|| session_not_found(id))
}

/// GET /api/v1/sessions/:id/preview
pub async fn handle_get_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DisplayedPreview>, AppError> {
    state
        .sessions
        .read(id, |s| s.displayed().cloned())
        .await
        .ok_or_else(|| session_not_found(id))?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Session {id} has no preview yet")))
}

/// POST /api/v1/sessions/:id/export
///
/// Exports the currently displayed preview as a PDF attachment.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    // Copy what export needs out of the lock; the export call itself is slow.
    let (displayed, name) = state
        .sessions
        .read(id, |s| (s.displayed().cloned(), s.export_name().to_string()))
        .await
        .ok_or_else(|| session_not_found(id))?;

    let displayed = displayed
        .ok_or_else(|| AppError::Conflict("Submit the form before exporting".to_string()))?;

    let document = state.exporter.export(&displayed.preview, &name).await?;

    let disposition = content_disposition(&document.file_name);
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response())
}
