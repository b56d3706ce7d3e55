//! Handlers for the `/entry` routes.
//!
//! Each handler runs exactly one store operation on tokio's blocking pool. The
//! operation opens and closes its own store connection.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::error::ApiError;
use super::{AppState, MessageResponse};
use crate::entity::{Entry, EntryPatch, NewEntry};
use crate::error::{JournalError, Result};

pub const ENTRY_DELETED: &str = "Entry deleted";

async fn run_blocking<T, F>(op: F) -> std::result::Result<T, ApiError>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let outcome = tokio::task::spawn_blocking(op)
        .await
        .map_err(|e| JournalError::Task(e.to_string()))?;
    Ok(outcome?)
}

/// Get all entries
#[utoipa::path(get, path = "/entry", tag = "Entry",
    responses(
        (status = 200, description = "List of all entries", body = Vec<Entry>),
        (status = 500, description = "Server error", body = MessageResponse)
    ))]
pub async fn list_entries(
    State(state): State<AppState>,
) -> std::result::Result<Json<Vec<Entry>>, ApiError> {
    let store = state.store.clone();
    let entries = run_blocking(move || store.list()).await?;
    Ok(Json(entries))
}

/// Get entries by title
#[utoipa::path(get, path = "/entry/title/{title}", tag = "Entry",
    params(("title" = String, Path, description = "Entry title, matched exactly")),
    responses(
        (status = 200, description = "Entries with the given title", body = Vec<Entry>),
        (status = 500, description = "Server error", body = MessageResponse)
    ))]
pub async fn find_entries_by_title(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> std::result::Result<Json<Vec<Entry>>, ApiError> {
    let store = state.store.clone();
    let entries = run_blocking(move || store.find_by_title(&title)).await?;
    Ok(Json(entries))
}

/// Get an entry by id
#[utoipa::path(get, path = "/entry/{id}", tag = "Entry",
    params(("id" = String, Path, description = "Entry id")),
    responses(
        (status = 200, description = "Entry found", body = Entry),
        (status = 404, description = "Entry not found", body = MessageResponse),
        (status = 500, description = "Server error", body = MessageResponse)
    ))]
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> std::result::Result<Json<Entry>, ApiError> {
    let store = state.store.clone();
    let entry = run_blocking(move || store.find_by_id(&id)).await?;
    Ok(Json(entry))
}

/// Create a new entry
#[utoipa::path(post, path = "/entry", tag = "Entry",
    request_body = NewEntry,
    responses(
        (status = 201, description = "Entry created", body = Entry),
        (status = 400, description = "Validation error", body = MessageResponse),
        (status = 500, description = "Server error", body = MessageResponse)
    ))]
pub async fn create_entry(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewEntry>, JsonRejection>,
) -> std::result::Result<(StatusCode, Json<Entry>), ApiError> {
    let Json(new) = payload?;
    let store = state.store.clone();
    let entry = run_blocking(move || store.create(new)).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Update an entry
#[utoipa::path(put, path = "/entry/{id}", tag = "Entry",
    params(("id" = String, Path, description = "Entry id")),
    request_body = EntryPatch,
    responses(
        (status = 200, description = "Entry updated", body = Entry),
        (status = 400, description = "Malformed request body", body = MessageResponse),
        (status = 404, description = "Entry not found", body = MessageResponse),
        (status = 500, description = "Server error or invalid field", body = MessageResponse)
    ))]
pub async fn update_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<EntryPatch>, JsonRejection>,
) -> std::result::Result<Json<Entry>, ApiError> {
    let patch = patch_or_default(payload)?;
    let store = state.store.clone();
    let entry = run_blocking(move || store.update(&id, patch)).await?;
    Ok(Json(entry))
}

/// A request without a JSON body patches nothing; it only refreshes
/// `updatedAt`.
fn patch_or_default(
    payload: std::result::Result<Json<EntryPatch>, JsonRejection>,
) -> std::result::Result<EntryPatch, ApiError> {
    match payload {
        Ok(Json(patch)) => Ok(patch),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(EntryPatch::default()),
        Err(rejection) => Err(rejection.into()),
    }
}

/// Delete an entry
#[utoipa::path(delete, path = "/entry/{id}", tag = "Entry",
    params(("id" = String, Path, description = "Entry id")),
    responses(
        (status = 200, description = "Entry deleted", body = MessageResponse),
        (status = 404, description = "Entry not found", body = MessageResponse),
        (status = 500, description = "Server error", body = MessageResponse)
    ))]
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> std::result::Result<Json<MessageResponse>, ApiError> {
    let store = state.store.clone();
    run_blocking(move || store.delete(&id)).await?;
    Ok(Json(MessageResponse {
        message: ENTRY_DELETED.to_string(),
    }))
}
