use tracing::debug;

use crate::process::{LongSeries, LongSeriesRow, Metric, RawSeriesTable};

/// Unpivot a wide table: one output row per (input row, date column),
/// row-major then date order.
pub fn melt(table: &RawSeriesTable, metric: Metric) -> LongSeries {
    let mut rows = Vec::with_capacity(table.rows.len() * table.dates.len());
    for raw in &table.rows {
        for (date, value) in table.dates.iter().zip(&raw.counts) {
            rows.push(LongSeriesRow {
                sub_region: raw.sub_region.clone(),
                region: raw.region.clone(),
                lat: raw.lat,
                long: raw.long,
                date: *date,
                value: *value,
            });
        }
    }
    debug!(%metric, location = %table.location, rows = rows.len(), "melted");
    LongSeries { metric, rows }
}
