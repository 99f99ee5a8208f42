//! Contact handlers

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::{AppState, error::ApiError};
use crate::dto::contact::*;
use crate::handlers::run_to_completion;

/// Creates a contact unless one with the same email exists
pub async fn create_contact(
    State(state): State<AppState>,
    Json(request): Json<CreateContactRequest>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    request.validate()?;

    let crm = state.crm.clone();
    let outcome = run_to_completion(async move {
        crm.create_contact_idempotent(request.into()).await
    })
    .await?;

    Ok((StatusCode::CREATED, Json(outcome.into())))
}

/// Adds a note to a contact identified by email or id
pub async fn add_note(
    State(state): State<AppState>,
    Json(request): Json<AddNoteRequest>,
) -> Result<Json<NoteResponse>, ApiError> {
    let crm = state.crm.clone();
    let outcome = run_to_completion(async move {
        crm.add_note_to_contact(request.into()).await
    })
    .await?;

    Ok(Json(outcome.into()))
}

/// Updates the fields of a contact that carry real values
pub async fn update_contact(
    State(state): State<AppState>,
    Json(request): Json<UpdateContactRequest>,
) -> Result<Json<ContactUpdateResponse>, ApiError> {
    let crm = state.crm.clone();
    let outcome = run_to_completion(async move {
        crm.update_contact_fields(request.into()).await
    })
    .await?;

    Ok(Json(outcome.into()))
}
