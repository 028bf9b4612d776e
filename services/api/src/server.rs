use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryRevisionRepository, InMemoryRosterRepository};
use crate::routes::{with_rota_routes, RotaState};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use rota::config::AppConfig;
use rota::error::AppError;
use rota::telemetry;
use rota::workflows::roster::RosterService;
use rota::workflows::rota::{RevisionService, RotaPlanner};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let roster = Arc::new(RosterService::new(Arc::new(
        InMemoryRosterRepository::default(),
    )));
    let revisions = RevisionService::new(Arc::new(InMemoryRevisionRepository::default()));
    let rota_state = Arc::new(RotaState {
        planner: RotaPlanner::new(config.rota.clone()),
        roster,
        revisions,
    });

    let app = with_rota_routes(rota_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        max_weeks = config.rota.max_weeks,
        smooth_spacing = config.rota.smooth_spacing,
        "rota service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
