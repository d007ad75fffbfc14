use crate::cli::ServeArgs;
use crate::infra::{AppState, GazetteerGeocoder, InMemoryOfferCatalog, InMemoryProfileRepository};
use crate::routes::app_router;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use locum_match::config::AppConfig;
use locum_match::error::AppError;
use locum_match::profiles::{ProfileApi, ProfileValidationService, SharedTokenAuthorizer};
use locum_match::search::{JobSearch, SearchApi};
use locum_match::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

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

    let authorizer = SharedTokenAuthorizer::new(config.admin.token.clone());
    if !authorizer.is_enabled() {
        warn!("APP_ADMIN_TOKEN is not set; admin review routes will refuse every request");
    }

    let repository = Arc::new(InMemoryProfileRepository::default());
    let profile_service = Arc::new(ProfileValidationService::new(repository));
    let job_search = Arc::new(JobSearch::new(
        Arc::new(GazetteerGeocoder::france()),
        Arc::new(InMemoryOfferCatalog::demo()),
        config.search.clone(),
    ));

    let app = app_router(
        ProfileApi {
            service: profile_service.clone(),
            authorizer: Arc::new(authorizer),
        },
        SearchApi {
            search: job_search,
            profiles: profile_service,
        },
    )
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        default_radius_km = config.search.default_radius_km,
        max_radius_km = config.search.max_radius_km,
        "marketplace service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
