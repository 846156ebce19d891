//! Control definitions for the page and validation of posted selector values.
//!
//! The browser renders these controls; every change posts the current values
//! back, and they are checked here before any view is computed.

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::ControlSettings;
use crate::error::SelectionError;
use crate::process::{date_parser, Metric, UnifiedTable};
use crate::view::map::MapSelection;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionItem {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dropdown {
    pub id: &'static str,
    pub multi: bool,
    pub clearable: bool,
    pub placeholder: &'static str,
    pub options: Vec<OptionItem>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RadioItems {
    pub id: &'static str,
    pub options: Vec<OptionItem>,
    pub value: Metric,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatePicker {
    pub id: &'static str,
    pub min_date_allowed: NaiveDate,
    pub max_date_allowed: NaiveDate,
    pub initial_visible_month: NaiveDate,
    pub date: NaiveDate,
    pub display_format: &'static str,
}

/// Everything the page needs to draw its left pane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlsSpec {
    pub title: &'static str,
    pub region: Dropdown,
    pub metric: RadioItems,
    pub date: DatePicker,
    pub last_updated: Option<String>,
}

pub fn controls_spec(table: &UnifiedTable, settings: &ControlSettings) -> ControlsSpec {
    let regions = table
        .regions()
        .iter()
        .map(|r| OptionItem {
            label: r.clone(),
            value: r.clone(),
        })
        .collect();
    let metrics = Metric::ALL
        .iter()
        .map(|m| OptionItem {
            label: m.label().to_string(),
            value: m.as_str().to_string(),
        })
        .collect();

    ControlsSpec {
        title: "Covid - 19 Dashboard",
        region: Dropdown {
            id: "select_country",
            multi: false,
            clearable: true,
            placeholder: "Select state",
            options: regions,
            value: settings.default_region.clone(),
        },
        metric: RadioItems {
            id: "radio_items",
            options: metrics,
            value: settings.default_metric,
        },
        date: DatePicker {
            id: "date_picker",
            min_date_allowed: settings.min_date,
            max_date_allowed: settings.max_date,
            initial_visible_month: settings.default_date,
            date: settings.default_date,
            display_format: "MMMM D, YYYY",
        },
        last_updated: last_updated(table),
    }
}

/// `"Last Updated: January 20, 2021  00:01 (UTC)"` from the latest date.
pub fn last_updated(table: &UnifiedTable) -> Option<String> {
    let (_, latest) = table.date_range()?;
    Some(format!(
        "Last Updated: {}  00:01 (UTC)",
        latest.format("%B %d, %Y")
    ))
}

/// Reject dates the picker would not allow.
pub fn check_date(
    date: NaiveDate,
    settings: &ControlSettings,
) -> Result<NaiveDate, SelectionError> {
    if (settings.min_date..=settings.max_date).contains(&date) {
        Ok(date)
    } else {
        Err(SelectionError::DateOutOfRange {
            date,
            min: settings.min_date,
            max: settings.max_date,
        })
    }
}

/// Build a map selection from raw posted values, filling gaps with defaults.
pub fn map_selection(
    region: Option<&str>,
    metric: Option<&str>,
    date: Option<&str>,
    settings: &ControlSettings,
) -> Result<MapSelection, SelectionError> {
    let metric = match metric {
        Some(m) => m.parse()?,
        None => settings.default_metric,
    };
    let date = match date {
        Some(d) => date_parser::parse_iso_date(d)
            .ok_or_else(|| SelectionError::BadDate(d.to_string()))?,
        None => settings.default_date,
    };
    Ok(MapSelection {
        region: trend_region(region, settings),
        metric,
        date: check_date(date, settings)?,
    })
}

/// The region for the trend chart, defaulting when absent or blank.
pub fn trend_region(region: Option<&str>, settings: &ControlSettings) -> String {
    region
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(settings.default_region.as_str())
        .to_string()
}
