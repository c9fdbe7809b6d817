// tests/metrics.rs
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use metrics_exporter_prometheus::PrometheusBuilder;
use pathguard::metrics::Metrics;
use tower::ServiceExt;

#[tokio::test]
async fn metrics_route_renders_exposition() {
    // Recorder is built but not installed globally, so tests don't fight over it.
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    metrics::with_local_recorder(&recorder, || {
        metrics::counter!("explain_requests_total").increment(3);
    });

    let app = Metrics::from_handle(handle).router();
    let resp = app
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap(); // 1 MiB
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(
        text.contains("explain_requests_total 3"),
        "metrics exposition missing counter\n{text}"
    );
}

#[test]
fn scoring_increments_segment_counter() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();

    metrics::with_local_recorder(&recorder, || {
        pathguard::score_segment(pathguard::SegmentAttributes::new("a", "A"));
    });

    let text = handle.render();
    assert!(
        text.contains("segments_scored_total 1"),
        "scorer counter not recorded\n{text}"
    );
}
