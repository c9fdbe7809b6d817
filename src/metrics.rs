use anyhow::Context;
use axum::{routing::get, Router};
use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Call once per process.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;
        describe();
        Ok(Self { handle })
    }

    /// Wrap an existing handle (e.g. from a recorder built without installing it).
    pub fn from_handle(handle: PrometheusHandle) -> Self {
        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

fn describe() {
    describe_counter!("segments_scored_total", "Segments passed through the scorer.");
    describe_counter!("explain_requests_total", "Route explanations requested.");
    describe_counter!(
        "explain_summarizer_used_total",
        "Explanations written by the alternate summarizer backend."
    );
    describe_counter!(
        "explain_summarizer_fallback_total",
        "Summarizer failures or timeouts answered with the rule-based explanation."
    );
}
