use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use crate::config::MapboxSettings;
use crate::coords::{Coordinate, CoordinateIndex};
use crate::error::LookupError;
use crate::process::{Metric, Totals, UnifiedTable};
use crate::view::format;

pub const MAP_ZOOM: f64 = 3.0;
pub const MAP_BEARING: f64 = 0.0;

/// What the map shows: one region, one metric, one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapSelection {
    pub region: String,
    pub metric: Metric,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub sub_region: String,
    pub lat: f64,
    pub lon: f64,
    /// Summed metric value for the (sub-region, lat, long) group.
    pub value: i64,
    pub size: f64,
    pub hovertext: String,
}

/// Renderer-neutral map layer.
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub selection: MapSelection,
    pub color: &'static str,
    pub center: Coordinate,
    pub zoom: f64,
    pub bearing: f64,
    pub markers: Vec<MapMarker>,
}

struct Group<'a> {
    sub_region: &'a str,
    lat: f64,
    lon: f64,
    totals: Totals,
}

/// Sum the selected region's rows for one date per (sub-region, lat, long),
/// one marker each. A date with no rows gives an empty marker list.
pub fn map_view(
    table: &UnifiedTable,
    coords: &CoordinateIndex,
    selection: &MapSelection,
) -> Result<MapView, LookupError> {
    let center = coords.lookup(&selection.region)?;

    let mut groups: Vec<Group<'_>> = Vec::new();
    let mut slot: HashMap<(&str, u64, u64), usize> = HashMap::new();
    for rec in table.region_records(&selection.region)? {
        if rec.date != selection.date {
            continue;
        }
        // unlocated rows cannot be drawn
        let Some((lat, lon)) = rec.coordinates() else {
            continue;
        };
        let key = (rec.sub_region.as_str(), lat.to_bits(), lon.to_bits());
        let i = *slot.entry(key).or_insert_with(|| {
            groups.push(Group {
                sub_region: &rec.sub_region,
                lat,
                lon,
                totals: Totals::default(),
            });
            groups.len() - 1
        });
        groups[i].totals.add(rec);
    }

    groups.sort_by(|a, b| {
        a.sub_region
            .cmp(b.sub_region)
            .then_with(|| a.lat.total_cmp(&b.lat))
            .then_with(|| a.lon.total_cmp(&b.lon))
    });

    let metric = selection.metric;
    let markers = groups
        .into_iter()
        .map(|g| {
            let value = g.totals.get(metric);
            MapMarker {
                sub_region: g.sub_region.to_string(),
                lat: g.lat,
                lon: g.lon,
                value,
                size: value as f64 / metric.marker_divisor(),
                hovertext: format!(
                    "<b>Country</b>: {}<br><b>Province/State</b>: {}<br><b>Date</b>: {}<br>\
                     <b>Lat</b>: {:.4}<br><b>Long</b>: {:.4}<br><b>{}</b>: {}<br>",
                    selection.region,
                    g.sub_region,
                    selection.date,
                    g.lat,
                    g.lon,
                    metric.label(),
                    format::thousands(value),
                ),
            }
        })
        .collect();

    Ok(MapView {
        selection: selection.clone(),
        color: metric.marker_color(),
        center,
        zoom: MAP_ZOOM,
        bearing: MAP_BEARING,
        markers,
    })
}

// ── Plotly figure ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFigure {
    pub data: Vec<ScatterMapbox>,
    pub layout: MapLayout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterMapbox {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub lon: Vec<f64>,
    pub lat: Vec<f64>,
    pub mode: &'static str,
    pub marker: MarkerStyle,
    pub hoverinfo: &'static str,
    pub hovertext: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub size: Vec<f64>,
    pub color: &'static str,
    pub sizemode: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayout {
    pub margin: Margin,
    pub hovermode: &'static str,
    pub mapbox: Mapbox,
    pub autosize: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Margin {
    pub r: u32,
    pub t: u32,
    pub l: u32,
    pub b: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mapbox {
    pub accesstoken: String,
    pub center: Coordinate,
    pub style: String,
    pub zoom: f64,
    pub bearing: f64,
}

impl MapView {
    pub fn to_figure(&self, mapbox: &MapboxSettings) -> MapFigure {
        let trace = ScatterMapbox {
            kind: "scattermapbox",
            lon: self.markers.iter().map(|m| m.lon).collect(),
            lat: self.markers.iter().map(|m| m.lat).collect(),
            mode: "markers",
            marker: MarkerStyle {
                size: self.markers.iter().map(|m| m.size).collect(),
                color: self.color,
                sizemode: "area",
            },
            hoverinfo: "text",
            hovertext: self.markers.iter().map(|m| m.hovertext.clone()).collect(),
        };
        MapFigure {
            data: vec![trace],
            layout: MapLayout {
                margin: Margin {
                    r: 0,
                    t: 0,
                    l: 0,
                    b: 0,
                },
                hovermode: "closest",
                mapbox: Mapbox {
                    accesstoken: mapbox.access_token.clone(),
                    center: self.center,
                    style: mapbox.style.clone(),
                    zoom: self.zoom,
                    bearing: self.bearing,
                },
                autosize: true,
            },
        }
    }
}
