use crate::cli::ServeArgs;
use crate::infra::{open_history, AppState};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use supplier_rank::config::AppConfig;
use supplier_rank::error::AppError;
use supplier_rank::telemetry;
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

    let history = open_history(&config.history, args.history.take());
    let snapshot = history.snapshot();
    info!(
        records = snapshot.store().len(),
        parts = snapshot.store().parts().len(),
        available = snapshot.status().is_available(),
        "purchase-order history ready"
    );

    let app = with_service_routes(history)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(environment = %config.environment, %addr, "supplier recommendation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
