use crate::cli::ServeArgs;
use crate::infra::{build_engine, live_dispatcher, AppState, DocumentService};
use crate::routes::{document_router, with_service_routes};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use docintel::config::AppConfig;
use docintel::telemetry;
use docintel::AppError;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = build_engine(&config)?;
    let service = Arc::new(DocumentService::new(engine, live_dispatcher(&config)));

    let app = with_service_routes(document_router(service))
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        automation_log = %config.automation.log_file.display(),
        "document intelligence service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
