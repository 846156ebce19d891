use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::{info, instrument, warn};

use crate::process::{LongSeries, LongSeriesRow, UnifiedRecord, UnifiedTable, NO_DATA};

/// (sub-region, region, date, lat bits, long bits). Blank parts match blank parts.
type JoinKey<'a> = (Option<&'a str>, &'a str, NaiveDate, Option<u64>, Option<u64>);

fn coord_bits(v: Option<f64>) -> Option<u64> {
    // fold -0.0 into 0.0 so both spellings join
    v.map(|x| if x == 0.0 { 0.0f64.to_bits() } else { x.to_bits() })
}

fn join_key(row: &LongSeriesRow) -> JoinKey<'_> {
    (
        row.sub_region.as_deref(),
        row.region.as_str(),
        row.date,
        coord_bits(row.lat),
        coord_bits(row.long),
    )
}

/// First occurrence wins, so each left row matches at most one right row.
fn index(series: &LongSeries) -> HashMap<JoinKey<'_>, i64> {
    let mut map = HashMap::with_capacity(series.rows.len());
    let mut duplicates = 0usize;
    for row in &series.rows {
        match map.entry(join_key(row)) {
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(row.value);
            }
            std::collections::hash_map::Entry::Occupied(_) => duplicates += 1,
        }
    }
    if duplicates > 0 {
        warn!(metric = %series.metric, duplicates, "duplicate join keys; keeping first");
    }
    map
}

/// Left-join deaths and recovered onto confirmed and derive `active`.
///
/// Every confirmed row yields exactly one record. Unmatched recovered
/// becomes 0; unmatched deaths stays `None` (and so does `active`).
#[instrument(level = "info", skip_all, fields(rows = confirmed.rows.len()))]
pub fn merge(confirmed: &LongSeries, deaths: &LongSeries, recovered: &LongSeries) -> UnifiedTable {
    let deaths_by_key = index(deaths);
    let recovered_by_key = index(recovered);

    let mut missing_deaths = 0usize;
    let mut missing_recovered = 0usize;
    let mut negative_active = 0usize;
    let mut overflowed = 0usize;

    let records: Vec<UnifiedRecord> = confirmed
        .rows
        .iter()
        .map(|row| {
            let key = join_key(row);
            let deaths = deaths_by_key.get(&key).copied();
            let recovered = recovered_by_key.get(&key).copied().unwrap_or_else(|| {
                missing_recovered += 1;
                0
            });
            if deaths.is_none() {
                missing_deaths += 1;
            }
            let active = deaths.and_then(|d| {
                let a = row
                    .value
                    .checked_sub(d)
                    .and_then(|v| v.checked_sub(recovered));
                if a.is_none() {
                    overflowed += 1;
                }
                a
            });
            if active.is_some_and(|a| a < 0) {
                negative_active += 1;
            }
            UnifiedRecord {
                region: row.region.clone(),
                sub_region: row
                    .sub_region
                    .clone()
                    .unwrap_or_else(|| NO_DATA.to_string()),
                lat: row.lat,
                long: row.long,
                date: row.date,
                confirmed: row.value,
                deaths,
                recovered,
                active,
            }
        })
        .collect();

    if missing_deaths > 0 {
        warn!(
            missing_deaths,
            "confirmed rows without a deaths value; deaths and active left empty"
        );
    }
    if negative_active > 0 {
        warn!(negative_active, "rows where deaths + recovered exceed confirmed");
    }
    if overflowed > 0 {
        warn!(overflowed, "active out of range; left empty");
    }
    info!(missing_recovered, "recovered filled with 0");

    UnifiedTable::new(records)
}
