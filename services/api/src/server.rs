use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use jobdesk::config::AppConfig;
use jobdesk::error::AppError;
use jobdesk::portal::applications::JobApplicationService;
use jobdesk::portal::resume::MockResumeParser;
use jobdesk::telemetry;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{AppState, ChatRoom, InMemoryPortalStore, LoggingMailer};
use crate::routes::with_portal_routes;

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

    let store = Arc::new(InMemoryPortalStore::default());
    let mailer = Arc::new(LoggingMailer::new(config.mail.from_address.clone()));
    let parser = Arc::new(MockResumeParser);
    let chat = Arc::new(ChatRoom::default());
    let application_service = Arc::new(JobApplicationService::new(store.clone(), mailer.clone()));

    let app = with_portal_routes(application_service, store, mailer, parser, chat)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "job portal api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
