// tests/explain_route.rs
//
// Route-level aggregation: mean score, ranking and rendering of reason tags.

use pathguard::explain::{explain, top_reasons, NO_RISK_FACTORS};
use pathguard::scoring::score_route;
use pathguard::{Lighting, ScoredSegment, SegmentAttributes, Sidewalk};

fn seg(id: &str, name: &str, safety: f64, reasons: &[&str]) -> ScoredSegment {
    ScoredSegment {
        id: id.into(),
        name: name.into(),
        safety,
        reasons: reasons.iter().map(|r| r.to_string()).collect(),
    }
}

#[test]
fn demo_route_ranks_dim_lighting_first_and_averages() {
    let route = vec![
        seg("s1", "Main Street", 0.72, &["dim lighting"]),
        seg("s2", "Park Lane", 0.85, &["good visibility"]),
        seg("s3", "River Road", 0.65, &["narrow sidewalk", "dim lighting"]),
    ];

    let r = explain(&route);
    assert_eq!(r.safety_score, 0.740);
    assert_eq!(
        r.explanation,
        "This route's score is influenced by: dim lighting (x2), good visibility (x1), narrow sidewalk (x1)."
    );

    let top = top_reasons(&route, 3);
    assert_eq!(top[0], ("dim lighting", 2));
}

#[test]
fn empty_route_is_zero_and_fixed_message() {
    let r = explain(&[]);
    assert_eq!(r.safety_score, 0.0);
    assert_eq!(r.explanation, NO_RISK_FACTORS);
    assert_eq!(
        r.explanation,
        "No specific risk factors detected on this toy route."
    );
}

#[test]
fn route_without_reasons_gets_fixed_message() {
    let r = explain(&[seg("a", "A", 0.8, &[]), seg("b", "B", 0.8, &[])]);
    assert_eq!(r.safety_score, 0.8);
    assert_eq!(r.explanation, NO_RISK_FACTORS);
}

#[test]
fn ties_keep_first_encounter_order_across_runs() {
    let route = vec![seg("1", "x", 0.5, &["A"]), seg("2", "y", 0.5, &["B"])];
    for _ in 0..100 {
        assert_eq!(
            explain(&route).explanation,
            "This route's score is influenced by: A (x1), B (x1)."
        );
    }

    let reversed = vec![seg("1", "x", 0.5, &["B"]), seg("2", "y", 0.5, &["A"])];
    assert_eq!(
        explain(&reversed).explanation,
        "This route's score is influenced by: B (x1), A (x1)."
    );
}

#[test]
fn frequency_beats_encounter_order() {
    let route = vec![
        seg("1", "x", 0.5, &["first", "second"]),
        seg("2", "y", 0.5, &["second", "third"]),
        seg("3", "z", 0.5, &["third", "fourth"]),
    ];
    // second(2) and third(2) outrank first(1); first beats fourth on encounter order
    assert_eq!(
        explain(&route).explanation,
        "This route's score is influenced by: second (x2), third (x2), first (x1)."
    );
}

#[test]
fn scored_route_flows_into_explanation() {
    let scored = score_route(vec![
        SegmentAttributes::new("s1", "Main Street").lighting(Lighting::Dim),
        SegmentAttributes::new("s2", "Park Lane")
            .lighting(Lighting::Normal)
            .sidewalk(Sidewalk::Normal),
        SegmentAttributes::new("s3", "River Road")
            .lighting(Lighting::Dim)
            .sidewalk(Sidewalk::Narrow),
    ]);

    let r = explain(&scored);
    // (0.70 + 0.80 + 0.55) / 3 = 0.6833…
    assert_eq!(r.safety_score, 0.683);
    assert_eq!(
        r.explanation,
        "This route's score is influenced by: dim lighting (x2), narrow sidewalk (x1)."
    );
}
