// src/process/types.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::SelectionError;

/// Sub-region label used when the source leaves `Province/State` blank.
pub const NO_DATA: &str = "No Data";

/// One of the four case counts a view can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Confirmed,
    Deaths,
    Recovered,
    Active,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Confirmed,
        Metric::Deaths,
        Metric::Recovered,
        Metric::Active,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Confirmed => "confirmed",
            Metric::Deaths => "deaths",
            Metric::Recovered => "recovered",
            Metric::Active => "active",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Confirmed => "Confirmed",
            Metric::Deaths => "Deaths",
            Metric::Recovered => "Recovered",
            Metric::Active => "Active",
        }
    }

    /// Visual calibration of map marker area. Not a unit conversion.
    pub fn marker_divisor(&self) -> f64 {
        match self {
            Metric::Confirmed => 400.0,
            Metric::Deaths | Metric::Recovered | Metric::Active => 300.0,
        }
    }

    pub fn marker_color(&self) -> &'static str {
        match self {
            Metric::Confirmed => "orange",
            Metric::Deaths => "#dd1e35",
            Metric::Recovered => "green",
            Metric::Active => "#e55467",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = SelectionError;

    /// Accepts the plain names and `confirmed1`-style radio values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        match lowered.strip_suffix('1').unwrap_or(lowered.as_str()) {
            "confirmed" => Ok(Metric::Confirmed),
            "deaths" | "death" => Ok(Metric::Deaths),
            "recovered" => Ok(Metric::Recovered),
            "active" => Ok(Metric::Active),
            _ => Err(SelectionError::UnknownMetric(s.to_string())),
        }
    }
}

/// Summed counts for one aggregation group. Missing deaths/active count as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub confirmed: i64,
    pub deaths: i64,
    pub recovered: i64,
    pub active: i64,
}

impl Totals {
    pub fn add(&mut self, rec: &UnifiedRecord) {
        self.confirmed = self.confirmed.saturating_add(rec.confirmed);
        self.deaths = self.deaths.saturating_add(rec.deaths.unwrap_or(0));
        self.recovered = self.recovered.saturating_add(rec.recovered);
        self.active = self.active.saturating_add(rec.active.unwrap_or(0));
    }

    pub fn get(&self, metric: Metric) -> i64 {
        match metric {
            Metric::Confirmed => self.confirmed,
            Metric::Deaths => self.deaths,
            Metric::Recovered => self.recovered,
            Metric::Active => self.active,
        }
    }
}

/// One (row, date) cell of a source table after reshaping.
#[derive(Debug, Clone, PartialEq)]
pub struct LongSeriesRow {
    pub sub_region: Option<String>,
    pub region: String,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub date: NaiveDate,
    pub value: i64,
}

/// A reshaped source table, tagged with the metric it carries.
#[derive(Debug, Clone)]
pub struct LongSeries {
    pub metric: Metric,
    pub rows: Vec<LongSeriesRow>,
}

/// A row of the merged table.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedRecord {
    pub region: String,
    pub sub_region: String,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub date: NaiveDate,
    pub confirmed: i64,
    /// `None` when the deaths table had no matching row.
    pub deaths: Option<i64>,
    pub recovered: i64,
    /// `confirmed - deaths - recovered`, unclamped. `None` when deaths is.
    pub active: Option<i64>,
}

impl UnifiedRecord {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.long?))
    }
}
