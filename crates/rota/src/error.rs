use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::repository::RepositoryError;
use crate::workflows::roster::RosterError;
use crate::workflows::rota::{EditError, RevisionError, RotaError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Rota(RotaError),
    Edit(EditError),
    Revision(RevisionError),
    Roster(RosterError),
    Export(csv::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Rota(err) => write!(f, "rota generation failed: {}", err),
            AppError::Edit(err) => write!(f, "manual edit failed: {}", err),
            AppError::Revision(err) => write!(f, "revision error: {}", err),
            AppError::Roster(err) => write!(f, "roster error: {}", err),
            AppError::Export(err) => write!(f, "export failed: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Rota(err) => Some(err),
            AppError::Edit(err) => Some(err),
            AppError::Revision(err) => Some(err),
            AppError::Roster(err) => Some(err),
            AppError::Export(err) => Some(err),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Rota(_) | AppError::Edit(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Revision(RevisionError::Repository(err))
            | AppError::Roster(RosterError::Repository(err)) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict => StatusCode::CONFLICT,
                RepositoryError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Revision(_) => StatusCode::BAD_REQUEST,
            AppError::Roster(RosterError::NameRequired) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<RotaError> for AppError {
    fn from(value: RotaError) -> Self {
        Self::Rota(value)
    }
}

impl From<EditError> for AppError {
    fn from(value: EditError) -> Self {
        Self::Edit(value)
    }
}

impl From<RevisionError> for AppError {
    fn from(value: RevisionError) -> Self {
        Self::Revision(value)
    }
}

impl From<RosterError> for AppError {
    fn from(value: RosterError) -> Self {
        Self::Roster(value)
    }
}

impl From<csv::Error> for AppError {
    fn from(value: csv::Error) -> Self {
        Self::Export(value)
    }
}
