// src/lib.rs
// Public library surface for the service binary, the ETL binary and integration tests.

pub mod api;
pub mod config;
pub mod etl;
pub mod explain;
pub mod metrics;
pub mod routing;
pub mod scoring;
pub mod segment;
pub mod summarizer;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::explain::{explain, RouteExplainer, RouteResult};
pub use crate::scoring::score_segment;
pub use crate::segment::{Lighting, ScoredSegment, SegmentAttributes, Sidewalk};

/// Rule-based or summarized explanation of an already scored route.
///
/// With `use_alternate_backend == false` this never touches `explainer`'s
/// backend and is equivalent to [`explain`].
pub async fn explain_route(
    explainer: &RouteExplainer,
    segments: &[ScoredSegment],
    use_alternate_backend: bool,
) -> RouteResult {
    explainer
        .explain_route(segments, use_alternate_backend)
        .await
}
