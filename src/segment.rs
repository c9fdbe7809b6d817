//! segment.rs — street segment attributes (input) and scored segments (output).
//!
//! Everything here is plain data, constructed fresh per request or batch run
//! and passed by value. Unknown enum strings deserialize to `Unknown` so the
//! scorer stays total over whatever upstream data hands us.

use serde::{Deserialize, Serialize};

/// Speed limit assumed when a segment carries none. Unit is caller-defined.
pub const DEFAULT_SPEED_LIMIT: u32 = 50;

/// Street lighting quality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lighting {
    Normal,
    Dim,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Sidewalk width class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sidewalk {
    Normal,
    Narrow,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Raw attributes of one street segment as delivered by ingestion or routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentAttributes {
    /// Unique within a route.
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lighting: Lighting,
    #[serde(default)]
    pub sidewalk: Sidewalk,
    /// `None` (absent or null) means [`DEFAULT_SPEED_LIMIT`].
    #[serde(default)]
    pub speed_limit: Option<u32>,
}

impl SegmentAttributes {
    /// Segment with unknown lighting/sidewalk and no speed limit.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lighting: Lighting::Unknown,
            sidewalk: Sidewalk::Unknown,
            speed_limit: None,
        }
    }

    pub fn lighting(mut self, lighting: Lighting) -> Self {
        self.lighting = lighting;
        self
    }

    pub fn sidewalk(mut self, sidewalk: Sidewalk) -> Self {
        self.sidewalk = sidewalk;
        self
    }

    pub fn speed_limit(mut self, limit: u32) -> Self {
        self.speed_limit = Some(limit);
        self
    }

    /// Speed limit with the default applied.
    pub fn effective_speed_limit(&self) -> u32 {
        self.speed_limit.unwrap_or(DEFAULT_SPEED_LIMIT)
    }
}

/// A segment after scoring. `safety` is always within `[0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSegment {
    pub id: String,
    pub name: String,
    pub safety: f64,
    /// Reason tags in the order they were attached.
    #[serde(default)]
    pub reasons: Vec<String>,
}

impl ScoredSegment {
    /// Build a scored segment directly, e.g. from upstream data that already
    /// carries a score. `safety` is clamped into `[0.0, 1.0]`.
    pub fn new(id: impl Into<String>, name: impl Into<String>, safety: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            safety: clamp01(safety),
            reasons: Vec::new(),
        }
    }

    /// Append one reason tag (builder style).
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reasons.push(reason.into());
        self
    }
}

/// Clamp into `[0.0, 1.0]`; NaN maps to 0.0.
pub(crate) fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Round half away from zero to three decimals.
pub(crate) fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
