use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::error::LookupError;
use crate::process::{Totals, UnifiedTable};
use crate::view::format;

/// Number of most recent dates shown.
pub const TREND_DAYS: usize = 30;
/// Trailing window of the rolling mean.
pub const ROLLING_WINDOW: usize = 7;

const BAR_COLOR: &str = "orange";
const LINE_COLOR: &str = "#FF00FF";
const BACKGROUND: &str = "#192444";

/// Full per-date history of one region, summed over its sub-regions.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionSeries {
    pub region: String,
    pub dates: Vec<NaiveDate>,
    pub confirmed: Vec<i64>,
    /// `confirmed[i] - confirmed[i - 1]`; the first entry is `None`.
    pub daily: Vec<Option<i64>>,
    /// Trailing mean of `daily`; `None` until a full window of defined values.
    pub rolling: Vec<Option<f64>>,
}

pub fn region_series(table: &UnifiedTable, region: &str) -> Result<RegionSeries, LookupError> {
    let mut by_date: BTreeMap<NaiveDate, Totals> = BTreeMap::new();
    for rec in table.region_records(region)? {
        by_date.entry(rec.date).or_default().add(rec);
    }

    let dates: Vec<NaiveDate> = by_date.keys().copied().collect();
    let confirmed: Vec<i64> = by_date.values().map(|t| t.confirmed).collect();
    let daily = daily_differences(&confirmed);
    let rolling = rolling_mean(&daily, ROLLING_WINDOW);

    Ok(RegionSeries {
        region: region.to_string(),
        dates,
        confirmed,
        daily,
        rolling,
    })
}

fn daily_differences(cumulative: &[i64]) -> Vec<Option<i64>> {
    let mut out = Vec::with_capacity(cumulative.len());
    if !cumulative.is_empty() {
        out.push(None);
    }
    out.extend(cumulative.windows(2).map(|w| w[1].checked_sub(w[0])));
    out
}

/// A window containing any undefined value is undefined.
fn rolling_mean(values: &[Option<i64>], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            let sum = slice
                .iter()
                .try_fold(0i64, |acc, v| acc.checked_add((*v)?))?;
            Some(sum as f64 / window as f64)
        })
        .collect()
}

/// The last [`TREND_DAYS`] points of a region's series, ready to plot.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendView {
    pub region: String,
    pub dates: Vec<NaiveDate>,
    pub daily: Vec<Option<i64>>,
    pub rolling: Vec<Option<f64>>,
    pub bar_hovertext: Vec<String>,
    pub line_hovertext: Vec<String>,
}

pub fn trend_view(table: &UnifiedTable, region: &str) -> Result<TrendView, LookupError> {
    let series = region_series(table, region)?;
    let start = series.dates.len().saturating_sub(TREND_DAYS);

    let dates = series.dates[start..].to_vec();
    let daily = series.daily[start..].to_vec();
    let rolling = series.rolling[start..].to_vec();

    let bar_hovertext = dates
        .iter()
        .zip(&daily)
        .map(|(d, v)| {
            format!(
                "<b>Date</b>: {}<br><b>Daily confirmed</b>: {}<br><b>Country</b>: {}<br>",
                d,
                format::opt_thousands(*v),
                region
            )
        })
        .collect();
    let line_hovertext = dates
        .iter()
        .zip(&rolling)
        .map(|(d, v)| {
            format!(
                "<b>Date</b>: {}<br><b>Rolling Ave.(last 7 days)</b>: {}<br>",
                d,
                format::opt_thousands_f64(*v)
            )
        })
        .collect();

    Ok(TrendView {
        region: series.region,
        dates,
        daily,
        rolling,
        bar_hovertext,
        line_hovertext,
    })
}

// ── Plotly figure ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendFigure {
    pub data: (BarTrace, LineTrace),
    pub layout: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub x: Vec<NaiveDate>,
    pub y: Vec<Option<i64>>,
    pub name: &'static str,
    pub marker: Value,
    pub hoverinfo: &'static str,
    pub hovertext: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub x: Vec<NaiveDate>,
    pub y: Vec<Option<f64>>,
    pub mode: &'static str,
    pub name: &'static str,
    pub line: Value,
    pub hoverinfo: &'static str,
    pub hovertext: Vec<String>,
}

impl TrendView {
    pub fn to_figure(&self) -> TrendFigure {
        let bar = BarTrace {
            kind: "bar",
            x: self.dates.clone(),
            y: self.daily.clone(),
            name: "Daily confirmed",
            marker: json!({ "color": BAR_COLOR }),
            hoverinfo: "text",
            hovertext: self.bar_hovertext.clone(),
        };
        let line = LineTrace {
            kind: "scatter",
            x: self.dates.clone(),
            y: self.rolling.clone(),
            mode: "lines",
            name: "Rolling average of the last seven days - daily confirmed cases",
            line: json!({ "width": 3, "color": LINE_COLOR }),
            hoverinfo: "text",
            hovertext: self.line_hovertext.clone(),
        };
        TrendFigure {
            data: (bar, line),
            layout: trend_layout(&self.region),
        }
    }
}

fn trend_layout(region: &str) -> Value {
    json!({
        "plot_bgcolor": BACKGROUND,
        "paper_bgcolor": BACKGROUND,
        "title": {
            "text": format!("Last 30 Days Confirmed Cases : {region}"),
            "y": 0.93,
            "x": 0.5,
            "xanchor": "center",
            "yanchor": "top"
        },
        "titlefont": { "color": "white", "size": 15 },
        "hovermode": "x",
        "xaxis": {
            "title": "<b></b>",
            "color": "white",
            "showline": true,
            "showgrid": false,
            "linecolor": "white",
            "linewidth": 1,
            "showticklabels": true,
            "ticks": "outside",
            "tickfont": { "family": "Arial", "size": 12, "color": "white" }
        },
        "yaxis": {
            "title": "<b></b>",
            "color": "white",
            "showline": false,
            "showgrid": false,
            "showticklabels": false,
            "linecolor": "white"
        },
        "legend": {
            "orientation": "h",
            "bgcolor": BACKGROUND,
            "x": 0.5,
            "y": 1.1,
            "xanchor": "center",
            "yanchor": "top"
        },
        "font": { "family": "sans-serif", "size": 15, "color": "white" }
    })
}
