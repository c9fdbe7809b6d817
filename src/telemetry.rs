//! Tracing setup shared by the service and the ETL binary.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_LOG_FORMAT: &str = "PATHGUARD_LOG_FORMAT";
const DEFAULT_FILTER: &str = "pathguard=info,warn";

/// Install a global subscriber: compact by default, JSON when
/// `PATHGUARD_LOG_FORMAT=json`. `RUST_LOG` overrides the filter.
///
/// No-op if a subscriber is already installed (the Shuttle runtime sets one up).
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let json = std::env::var(ENV_LOG_FORMAT)
        .ok()
        .is_some_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    let res = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };
    if res.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
