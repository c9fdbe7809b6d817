//! # Segment Scorer
//! Pure, testable mapping from raw segment attributes to a safety score in
//! `[0.0, 1.0]` plus the reason tags that lowered it. No I/O.
//!
//! Policy: start at [`BASE_SAFETY`] and subtract each applicable penalty
//! additively, in a fixed order (lighting, sidewalk, speed). Unknown enum
//! values carry no penalty. The result is clamped, then rounded to three
//! decimals so `0.8 - 0.1` reports as `0.7` everywhere it is displayed.

use metrics::counter;

use crate::segment::{
    clamp01, round3, Lighting, ScoredSegment, SegmentAttributes, Sidewalk, DEFAULT_SPEED_LIMIT,
};

/// Safety of a segment with no known risk factors.
pub const BASE_SAFETY: f64 = 0.8;

pub const DIM_LIGHTING_PENALTY: f64 = 0.10;
pub const NARROW_SIDEWALK_PENALTY: f64 = 0.15;
pub const HIGH_SPEED_PENALTY: f64 = 0.05;

/// Speed limits strictly above this are penalized.
pub const HIGH_SPEED_THRESHOLD: u32 = DEFAULT_SPEED_LIMIT;

pub const REASON_DIM_LIGHTING: &str = "dim lighting";
pub const REASON_NARROW_SIDEWALK: &str = "narrow sidewalk";
pub const REASON_HIGH_SPEED_LIMIT: &str = "high speed limit";

/// Score a single segment. Total over every input, never fails.
pub fn score_segment(attrs: SegmentAttributes) -> ScoredSegment {
    let mut safety = BASE_SAFETY;
    let mut reasons = Vec::new();

    if attrs.lighting == Lighting::Dim {
        safety -= DIM_LIGHTING_PENALTY;
        reasons.push(REASON_DIM_LIGHTING.to_string());
    }
    if attrs.sidewalk == Sidewalk::Narrow {
        safety -= NARROW_SIDEWALK_PENALTY;
        reasons.push(REASON_NARROW_SIDEWALK.to_string());
    }
    if attrs.effective_speed_limit() > HIGH_SPEED_THRESHOLD {
        safety -= HIGH_SPEED_PENALTY;
        reasons.push(REASON_HIGH_SPEED_LIMIT.to_string());
    }

    counter!("segments_scored_total").increment(1);

    ScoredSegment {
        id: attrs.id,
        name: attrs.name,
        safety: round3(clamp01(safety)),
        reasons,
    }
}

/// Score a whole route, preserving order.
pub fn score_route<I>(segments: I) -> Vec<ScoredSegment>
where
    I: IntoIterator<Item = SegmentAttributes>,
{
    segments.into_iter().map(score_segment).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg() -> SegmentAttributes {
        SegmentAttributes::new("s1", "Test Street")
    }

    #[test]
    fn unknown_everything_scores_base() {
        let s = score_segment(seg());
        assert_eq!(s.safety, BASE_SAFETY);
        assert!(s.reasons.is_empty());
    }

    #[test]
    fn normal_attributes_score_base() {
        let s = score_segment(
            seg()
                .lighting(Lighting::Normal)
                .sidewalk(Sidewalk::Normal)
                .speed_limit(30),
        );
        assert_eq!(s.safety, 0.8);
        assert!(s.reasons.is_empty());
    }

    #[test]
    fn single_penalties_match_table() {
        assert_eq!(score_segment(seg().lighting(Lighting::Dim)).safety, 0.7);
        assert_eq!(score_segment(seg().sidewalk(Sidewalk::Narrow)).safety, 0.65);
        assert_eq!(score_segment(seg().speed_limit(60)).safety, 0.75);
    }

    #[test]
    fn all_penalties_stack_once_in_fixed_order() {
        let s = score_segment(
            seg()
                .lighting(Lighting::Dim)
                .sidewalk(Sidewalk::Narrow)
                .speed_limit(80),
        );
        assert_eq!(s.safety, 0.5);
        assert_eq!(
            s.reasons,
            vec![
                REASON_DIM_LIGHTING.to_string(),
                REASON_NARROW_SIDEWALK.to_string(),
                REASON_HIGH_SPEED_LIMIT.to_string(),
            ]
        );
    }

    #[test]
    fn speed_threshold_is_strict() {
        assert!(score_segment(seg().speed_limit(50)).reasons.is_empty());
        assert_eq!(
            score_segment(seg().speed_limit(51)).reasons,
            vec![REASON_HIGH_SPEED_LIMIT.to_string()]
        );
        assert!(score_segment(seg().speed_limit(0)).reasons.is_empty());
    }

    #[test]
    fn identity_fields_pass_through() {
        let s = score_segment(SegmentAttributes::new("x-42", "Harbour Walk"));
        assert_eq!(s.id, "x-42");
        assert_eq!(s.name, "Harbour Walk");
    }

    #[test]
    fn score_route_preserves_order() {
        let out = score_route(vec![
            SegmentAttributes::new("a", "A"),
            SegmentAttributes::new("b", "B").lighting(Lighting::Dim),
        ]);
        let ids: Vec<_> = out.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(out[1].safety, 0.7);
    }
}
