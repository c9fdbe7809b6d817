//! Batch scoring: GeoJSON feature collection in, one CSV row per segment out.
//!
//! Only property values are read; geometry is ignored. Anything malformed in
//! a property degrades to the scorer's safe default instead of failing the batch.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, GeoJson};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::explain::{explain, RouteResult};
use crate::scoring::score_segment;
use crate::segment::{Lighting, ScoredSegment, SegmentAttributes, Sidewalk};

pub const DEFAULT_INPUT: &str = "data/segments.geojson";
pub const DEFAULT_OUTPUT: &str = "data/segments_scored.csv";

/// One output row: the raw attributes next to their score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredRecord {
    pub id: String,
    pub name: String,
    pub lighting: Lighting,
    pub sidewalk: Sidewalk,
    pub speed_limit: u32,
    pub safety_score: f64,
    /// Reason tags joined with "; ".
    pub reasons: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub rows: usize,
    pub output: PathBuf,
    pub summary: RouteResult,
}

/// Read segment attributes from a GeoJSON feature collection file.
pub fn ingest_geojson(path: &Path) -> Result<Vec<SegmentAttributes>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading GeoJSON from {}", path.display()))?;
    parse_feature_collection(&text)
}

pub fn parse_feature_collection(text: &str) -> Result<Vec<SegmentAttributes>> {
    let gj: GeoJson = text.parse().context("parsing GeoJSON")?;
    let fc = FeatureCollection::try_from(gj).context("expected a FeatureCollection")?;
    Ok(fc
        .features
        .iter()
        .enumerate()
        .map(|(idx, f)| attributes_from_feature(idx, f))
        .collect())
}

fn attributes_from_feature(idx: usize, feature: &Feature) -> SegmentAttributes {
    let prop = |key: &str| feature.property(key).filter(|v| !v.is_null());

    let id = prop("id")
        .and_then(value_to_string)
        .or_else(|| {
            let id = serde_json::to_value(feature.id.as_ref()?).ok()?;
            value_to_string(&id)
        })
        .unwrap_or_else(|| format!("segment-{idx}"));
    let name = prop("name").and_then(value_to_string).unwrap_or_default();

    let lighting = prop("lighting")
        .and_then(|v| serde_json::from_value::<Lighting>(v.clone()).ok())
        .unwrap_or_default();
    let sidewalk = prop("sidewalk")
        .and_then(|v| serde_json::from_value::<Sidewalk>(v.clone()).ok())
        .unwrap_or_default();
    let speed_limit = prop("speed_limit").and_then(value_to_speed);

    SegmentAttributes {
        id,
        name,
        lighting,
        sidewalk,
        speed_limit,
    }
}

fn value_to_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Non-negative numbers only; fractional values are rounded.
fn value_to_speed(v: &Value) -> Option<u32> {
    if let Some(n) = v.as_u64() {
        return Some(u32::try_from(n).unwrap_or(u32::MAX));
    }
    let f = v.as_f64().or_else(|| v.as_str()?.trim().parse().ok())?;
    if f.is_finite() && f >= 0.0 {
        Some(f.round().min(u32::MAX as f64) as u32)
    } else {
        None
    }
}

/// Score every segment, keeping input order.
pub fn score_all(attrs: Vec<SegmentAttributes>) -> (Vec<ScoredRecord>, Vec<ScoredSegment>) {
    attrs
        .into_iter()
        .map(|a| {
            let (lighting, sidewalk, speed_limit) =
                (a.lighting, a.sidewalk, a.effective_speed_limit());
            let scored = score_segment(a);
            let record = ScoredRecord {
                id: scored.id.clone(),
                name: scored.name.clone(),
                lighting,
                sidewalk,
                speed_limit,
                safety_score: scored.safety,
                reasons: scored.reasons.join("; "),
            };
            (record, scored)
        })
        .unzip()
}

/// Write records as CSV (with header), creating the parent directory.
pub fn write_csv(path: &Path, records: &[ScoredRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output dir {}", parent.display()))?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("opening {} for writing", path.display()))?;
    for r in records {
        writer.serialize(r)?;
    }
    writer.flush()?;
    debug!(path = %path.display(), rows = records.len(), "CSV written");
    Ok(())
}

/// Ingest, score, write, and summarize one batch.
pub fn run(input: &Path, output: &Path) -> Result<BatchSummary> {
    let attrs = ingest_geojson(input)?;
    let (records, scored) = score_all(attrs);
    write_csv(output, &records)?;

    let summary = explain(&scored);
    info!(
        output = %output.display(),
        rows = records.len(),
        mean_safety = summary.safety_score,
        "Wrote scored segments"
    );
    info!("{}", summary.explanation);

    Ok(BatchSummary {
        rows: records.len(),
        output: output.to_path_buf(),
        summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fc(features: Value) -> String {
        json!({ "type": "FeatureCollection", "features": features }).to_string()
    }

    fn feature(props: Value) -> Value {
        json!({ "type": "Feature", "geometry": null, "properties": props })
    }

    #[test]
    fn missing_properties_take_defaults() {
        let text = fc(json!([feature(json!({ "id": "a" }))]));
        let attrs = parse_feature_collection(&text).unwrap();
        assert_eq!(attrs, vec![SegmentAttributes::new("a", "")]);
    }

    #[test]
    fn id_falls_back_to_feature_id_then_index() {
        let text = fc(json!([
            { "type": "Feature", "id": 7, "geometry": null, "properties": {} },
            { "type": "Feature", "geometry": null, "properties": null }
        ]));
        let attrs = parse_feature_collection(&text).unwrap();
        assert_eq!(attrs[0].id, "7");
        assert_eq!(attrs[1].id, "segment-1");
    }

    #[test]
    fn speed_values_are_coerced() {
        assert_eq!(value_to_speed(&json!(60)), Some(60));
        assert_eq!(value_to_speed(&json!(49.6)), Some(50));
        assert_eq!(value_to_speed(&json!("70")), Some(70));
        assert_eq!(value_to_speed(&json!(-5)), None);
        assert_eq!(value_to_speed(&json!(true)), None);
    }

    #[test]
    fn not_a_feature_collection_is_an_error() {
        let text = json!({ "type": "Point", "coordinates": [8.6, 50.1] }).to_string();
        assert!(parse_feature_collection(&text).is_err());
    }

    #[test]
    fn score_all_joins_reasons() {
        let (records, scored) = score_all(vec![SegmentAttributes::new("r", "River Road")
            .lighting(Lighting::Dim)
            .sidewalk(Sidewalk::Narrow)]);
        assert_eq!(records[0].reasons, "dim lighting; narrow sidewalk");
        assert_eq!(records[0].speed_limit, 50);
        assert_eq!(records[0].safety_score, 0.55);
        assert_eq!(scored[0].safety, 0.55);
    }
}
