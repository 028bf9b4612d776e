use crate::infra::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{NaiveDate, Utc};
use rota::error::AppError;
use rota::workflows::roster::{roster_router, RosterRepository, RosterService};
use rota::workflows::rota::export::{export_file_stem, to_csv_string};
use rota::workflows::rota::revision::revision_file_name;
use rota::workflows::rota::{
    shift_counts, ManualEdit, RevisionRepository, RevisionService, RevisionSettings, RotaPlan,
    RotaPlanner, RotaRequest, ShiftCount, StoredRevision, WeekRecord,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Everything the rota endpoints need, shared behind one `Arc`.
pub(crate) struct RotaState<P, V> {
    pub(crate) planner: RotaPlanner,
    pub(crate) roster: Arc<RosterService<P>>,
    pub(crate) revisions: RevisionService<V>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GenerateRequest {
    /// Falls back to the active roster when omitted.
    #[serde(default)]
    pub(crate) names: Option<Vec<String>>,
    pub(crate) start_date: NaiveDate,
    pub(crate) weeks: i64,
    #[serde(default)]
    pub(crate) smooth: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EditRequest {
    pub(crate) rows: Vec<WeekRecord>,
    pub(crate) edit: ManualEdit,
}

#[derive(Debug, Serialize)]
pub(crate) struct EditResponse {
    pub(crate) description: String,
    pub(crate) changed: usize,
    pub(crate) rows: Vec<WeekRecord>,
    pub(crate) shift_counts: Vec<ShiftCount>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExportRequest {
    #[serde(default)]
    pub(crate) start_date: Option<NaiveDate>,
    pub(crate) weeks: i64,
    pub(crate) rows: Vec<WeekRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SaveRevisionRequest {
    pub(crate) settings: RevisionSettings,
    pub(crate) rows: Vec<WeekRecord>,
    #[serde(default)]
    pub(crate) owner: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SaveRevisionResponse {
    pub(crate) file_name: String,
    #[serde(flatten)]
    pub(crate) stored: StoredRevision,
}

pub(crate) fn with_rota_routes<P, V>(state: Arc<RotaState<P, V>>) -> Router
where
    P: RosterRepository + 'static,
    V: RevisionRepository + 'static,
{
    roster_router(state.roster.clone())
        .merge(rota_router(state))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

fn rota_router<P, V>(state: Arc<RotaState<P, V>>) -> Router
where
    P: RosterRepository + 'static,
    V: RevisionRepository + 'static,
{
    Router::new()
        .route("/api/v1/rota/generate", post(generate_endpoint::<P, V>))
        .route("/api/v1/rota/edit", post(edit_endpoint))
        .route("/api/v1/rota/export/csv", post(export_csv_endpoint))
        .route("/api/v1/rota/revisions", post(save_revision_endpoint::<P, V>))
        .route(
            "/api/v1/rota/revisions/:rota_key",
            get(list_revisions_endpoint::<P, V>),
        )
        .with_state(state)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn generate_endpoint<P, V>(
    State(state): State<Arc<RotaState<P, V>>>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<RotaPlan>, AppError>
where
    P: RosterRepository + 'static,
    V: RevisionRepository + 'static,
{
    let names = match payload.names {
        Some(names) => names,
        None => state.roster.active_names()?,
    };
    let request = RotaRequest {
        names,
        start_date: payload.start_date,
        weeks: payload.weeks,
        smooth: payload.smooth,
    };
    Ok(Json(state.planner.plan(&request)?))
}

pub(crate) async fn edit_endpoint(
    Json(payload): Json<EditRequest>,
) -> Result<Json<EditResponse>, AppError> {
    let EditRequest { mut rows, edit } = payload;
    let changed = edit.apply(&mut rows)?;
    let description = edit.describe();
    info!(changed, edit = %description, "manual edit applied");

    Ok(Json(EditResponse {
        description,
        changed,
        shift_counts: shift_counts(&rows),
        rows,
    }))
}

pub(crate) async fn export_csv_endpoint(
    Json(payload): Json<ExportRequest>,
) -> Result<Response, AppError> {
    let csv = to_csv_string(&payload.rows)?;
    let start = payload
        .start_date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let disposition = format!(
        "attachment; filename=\"{}.csv\"",
        export_file_stem(&start, payload.weeks)
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

pub(crate) async fn save_revision_endpoint<P, V>(
    State(state): State<Arc<RotaState<P, V>>>,
    Json(payload): Json<SaveRevisionRequest>,
) -> Result<(StatusCode, Json<SaveRevisionResponse>), AppError>
where
    P: RosterRepository + 'static,
    V: RevisionRepository + 'static,
{
    let stored = state
        .revisions
        .save(payload.settings, &payload.rows, payload.owner, Utc::now())?;
    let file_name = revision_file_name(stored.revision, stored.created_at);
    Ok((
        StatusCode::CREATED,
        Json(SaveRevisionResponse { file_name, stored }),
    ))
}

pub(crate) async fn list_revisions_endpoint<P, V>(
    State(state): State<Arc<RotaState<P, V>>>,
    Path(rota_key): Path<String>,
) -> Result<Json<Vec<StoredRevision>>, AppError>
where
    P: RosterRepository + 'static,
    V: RevisionRepository + 'static,
{
    Ok(Json(state.revisions.list(&rota_key)?))
}
