//! PathGuard service — binary entrypoint.
//! Boots the Axum HTTP server: route scoring/explanation plus `/metrics`.

use pathguard::{api, config::AppConfig, metrics::Metrics, telemetry};
use shuttle_axum::ShuttleAxum;
use tracing::{info, warn};

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    telemetry::init();

    let config = AppConfig::from_env();
    info!(
        use_alternate_backend = config.use_alternate_backend,
        summarizer_config = %config.summarizer_config_path.display(),
        "starting PathGuard API"
    );

    let state = api::AppState::from_config(config);
    let mut router = api::router(state);

    match Metrics::init() {
        Ok(metrics) => router = router.merge(metrics.router()),
        Err(e) => warn!(error = ?e, "metrics disabled"),
    }

    Ok(router.into())
}
