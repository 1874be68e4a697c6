//! Person CRUD handlers: list, read, create, update, delete.
//! Writes check content-type first, then the path id, then decode and validate the body,
//! and only then call the store.

use crate::error::AppError;
use crate::model::{Person, PersonId, PersonInput};
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

fn parse_id(id_str: &str) -> Result<PersonId, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid id '{}'", id_str)))
}

/// Surfaces a content-type rejection ahead of any other validation.
fn check_media_type(body: &Result<Json<PersonInput>, JsonRejection>) -> Result<(), AppError> {
    match body {
        Err(JsonRejection::MissingJsonContentType(e)) => Err(AppError::UnsupportedMediaType(e.body_text())),
        _ => Ok(()),
    }
}

fn parse_body(body: Result<Json<PersonInput>, JsonRejection>) -> Result<String, AppError> {
    let Json(input) = body?;
    input.validated_name().map_err(AppError::BadRequest)
}

pub async fn root() -> &'static str {
    "Hello World"
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Person>>, AppError> {
    let people = state.store.list().await?;
    Ok(Json(people))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<Json<Person>, AppError> {
    let id = parse_id(&id_str)?;
    let person = state
        .store
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("pessoa {}", id)))?;
    Ok(Json(person))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<PersonInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Person>), AppError> {
    let name = parse_body(body)?;
    let person = state.store.create(&name).await?;
    tracing::info!(id = %person.id, "pessoa created");
    Ok((StatusCode::CREATED, Json(person)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    body: Result<Json<PersonInput>, JsonRejection>,
) -> Result<Json<Person>, AppError> {
    check_media_type(&body)?;
    let id = parse_id(&id_str)?;
    let name = parse_body(body)?;
    let person = state
        .store
        .update(id, &name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("pessoa {}", id)))?;
    tracing::info!(id = %id, "pessoa updated");
    Ok(Json(person))
}

/// Idempotent: 204 whether or not the record existed.
pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id_str)?;
    let removed = state.store.delete(id).await?;
    tracing::info!(id = %id, removed, "pessoa delete");
    Ok(StatusCode::NO_CONTENT)
}
