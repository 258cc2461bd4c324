use crate::cli::ServeArgs;
use crate::infra::{
    seed_submission, AppState, FsContractStore, HtmlDocumentRenderer, InMemoryNotificationSink,
    InMemoryPlacementRepository, InMemoryWalletRepository, TracingEmailGateway,
};
use crate::routes::with_workflow_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use worklink::config::AppConfig;
use worklink::error::AppError;
use worklink::telemetry;
use worklink::workflows::placement::PlacementService;
use worklink::workflows::wallet::WalletLedger;

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

    let repository = Arc::new(InMemoryPlacementRepository::default());
    let notifications = Arc::new(InMemoryNotificationSink::default());
    let placements = Arc::new(PlacementService::new(
        repository,
        notifications,
        Box::new(HtmlDocumentRenderer),
        Box::new(FsContractStore::new(&config.platform.storage_dir)),
        Box::new(TracingEmailGateway::default()),
        config.platform.base_url.clone(),
    ));

    let seeded = placements.submit(seed_submission())?;
    info!(application = %seeded.id.0, job = %seeded.job.title, "seeded starter application");

    let wallet_repository = Arc::new(InMemoryWalletRepository::default());
    let wallets = Arc::new(WalletLedger::new(
        wallet_repository,
        config.platform.wallet_currency.clone(),
    ));

    let app = with_workflow_routes(placements, wallets)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "placement service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
