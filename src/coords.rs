use serde::Serialize;
use std::collections::HashMap;

use crate::error::LookupError;
use crate::process::UnifiedTable;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Region → representative point used to center the map.
///
/// Each region takes the first row (table order) that has both coordinates.
/// A region with no located rows at all falls back to (0, 0), so every
/// region in the selector resolves.
#[derive(Debug, Clone, Default)]
pub struct CoordinateIndex {
    points: HashMap<String, Coordinate>,
}

impl CoordinateIndex {
    pub fn build(table: &UnifiedTable) -> Self {
        let mut points: HashMap<String, Coordinate> = HashMap::with_capacity(table.regions().len());
        for rec in table.records() {
            if points.contains_key(&rec.region) {
                continue;
            }
            if let Some((lat, lon)) = rec.coordinates() {
                points.insert(rec.region.clone(), Coordinate { lat, lon });
            }
        }
        for region in table.regions() {
            points
                .entry(region.clone())
                .or_insert(Coordinate { lat: 0.0, lon: 0.0 });
        }
        Self { points }
    }

    pub fn lookup(&self, region: &str) -> Result<Coordinate, LookupError> {
        self.points
            .get(region)
            .copied()
            .ok_or_else(|| LookupError::UnknownRegion(region.to_string()))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
