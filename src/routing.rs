//! Demonstration routing: a fixed three-segment route between any two points.
//!
//! No graph search happens here. `start`/`end` are validated so the HTTP
//! surface already has its final shape.

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context};
use serde::Serialize;

use crate::segment::{Lighting, SegmentAttributes, Sidewalk};

/// WGS84 point parsed from `"lat,lon"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl FromStr for Coordinate {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("expected 'lat,lon', got '{s}'"))?;
        let lat: f64 = lat
            .trim()
            .parse()
            .with_context(|| format!("invalid latitude in '{s}'"))?;
        let lon: f64 = lon
            .trim()
            .parse()
            .with_context(|| format!("invalid longitude in '{s}'"))?;
        if !(-90.0..=90.0).contains(&lat) {
            bail!("latitude out of range: {lat}");
        }
        if !(-180.0..=180.0).contains(&lon) {
            bail!("longitude out of range: {lon}");
        }
        Ok(Self { lat, lon })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

/// The fixed demonstration route. Endpoints do not influence the segments.
pub fn toy_route(_start: Coordinate, _end: Coordinate) -> Vec<SegmentAttributes> {
    vec![
        SegmentAttributes::new("s1", "Main Street")
            .lighting(Lighting::Dim)
            .sidewalk(Sidewalk::Normal)
            .speed_limit(50),
        SegmentAttributes::new("s2", "Park Lane")
            .lighting(Lighting::Normal)
            .sidewalk(Sidewalk::Normal)
            .speed_limit(30),
        SegmentAttributes::new("s3", "River Road")
            .lighting(Lighting::Dim)
            .sidewalk(Sidewalk::Narrow)
            .speed_limit(50),
    ]
}
