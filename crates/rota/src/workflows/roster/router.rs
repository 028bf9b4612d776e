use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch},
    Router,
};
use serde_json::json;

use super::domain::{NewPerson, PersonId, PersonPatch};
use super::repository::RosterRepository;
use super::service::{RosterError, RosterService};
use crate::workflows::repository::RepositoryError;

/// Router builder exposing roster maintenance endpoints.
pub fn roster_router<R>(service: Arc<RosterService<R>>) -> Router
where
    R: RosterRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/people",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route(
            "/api/v1/people/:person_id",
            patch(update_handler::<R>).delete(delete_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn list_handler<R>(State(service): State<Arc<RosterService<R>>>) -> Response
where
    R: RosterRepository + 'static,
{
    match service.list() {
        Ok(people) => (StatusCode::OK, axum::Json(people)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<RosterService<R>>>,
    axum::Json(person): axum::Json<NewPerson>,
) -> Response
where
    R: RosterRepository + 'static,
{
    match service.add(person) {
        Ok(person) => (StatusCode::CREATED, axum::Json(person)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<RosterService<R>>>,
    Path(person_id): Path<String>,
    axum::Json(patch): axum::Json<PersonPatch>,
) -> Response
where
    R: RosterRepository + 'static,
{
    match service.update(&PersonId(person_id), patch) {
        Ok(person) => (StatusCode::OK, axum::Json(person)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<RosterService<R>>>,
    Path(person_id): Path<String>,
) -> Response
where
    R: RosterRepository + 'static,
{
    match service.delete(&PersonId(person_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: RosterError) -> Response {
    let status = match &error {
        RosterError::NameRequired => StatusCode::UNPROCESSABLE_ENTITY,
        RosterError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        RosterError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        RosterError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
