use crate::cli::ServeArgs;
use crate::infra::{
    AppState, InMemoryAdminDirectory, InMemoryInstallerRepository, InMemoryLeadRepository,
};
use crate::routes::{with_service_routes, Services};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};
use ugrant::config::AppConfig;
use ugrant::error::AppError;
use ugrant::telemetry;
use ugrant::workflows::epc::EpcClient;
use ugrant::workflows::installers::InstallerService;
use ugrant::workflows::leads::LeadService;

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

    let directory = InMemoryAdminDirectory::from_config(&config.admin);
    if directory.is_empty() {
        warn!("ADMIN_BOOTSTRAP_TOKEN not set; admin routes will reject every request");
    }
    let epc = EpcClient::new(&config.epc);
    if !epc.is_configured() {
        warn!("EPC credentials not set; postcode lookup will report the service unavailable");
    }

    let services = Services {
        leads: Arc::new(LeadService::new(Arc::new(InMemoryLeadRepository::default()))),
        installers: Arc::new(InstallerService::new(Arc::new(
            InMemoryInstallerRepository::default(),
        ))),
        directory: Arc::new(directory),
        epc: Arc::new(epc),
    };

    let app = with_service_routes(services)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "grant checker service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
