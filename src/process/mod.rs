// src/process/mod.rs
//! Wide CSV → long rows → unified table.

pub mod date_parser;
pub mod merge;
pub mod raw_table;
pub mod reshape;
pub mod table;
pub mod types;
pub mod utils;

pub use raw_table::{RawSeriesRow, RawSeriesTable};
pub use table::UnifiedTable;
pub use types::{LongSeries, LongSeriesRow, Metric, Totals, UnifiedRecord, NO_DATA};

use tracing::{info, instrument};

/// The three parsed source tables, before reshaping.
#[derive(Debug, Clone)]
pub struct SourceTables {
    pub confirmed: RawSeriesTable,
    pub deaths: RawSeriesTable,
    pub recovered: RawSeriesTable,
}

/// Reshape all three tables and merge them.
#[instrument(level = "info", skip(sources))]
pub fn build_unified(sources: &SourceTables) -> UnifiedTable {
    let confirmed = reshape::melt(&sources.confirmed, Metric::Confirmed);
    let deaths = reshape::melt(&sources.deaths, Metric::Deaths);
    let recovered = reshape::melt(&sources.recovered, Metric::Recovered);
    let table = merge::merge(&confirmed, &deaths, &recovered);
    info!(
        records = table.records().len(),
        regions = table.regions().len(),
        "unified table built"
    );
    table
}
