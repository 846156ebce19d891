// src/dashboard.rs

use reqwest::Client;
use tracing::{info, instrument};

use crate::config::{ControlSettings, DashboardConfig, MapboxSettings};
use crate::coords::CoordinateIndex;
use crate::error::{LookupError, RetrievalError};
use crate::fetch;
use crate::process::{self, SourceTables, UnifiedTable};
use crate::view::{self, ControlsSpec, MapFigure, MapSelection, TrendFigure};

/// Process-wide reference data. Built once at startup, read-only afterwards;
/// share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Dashboard {
    table: UnifiedTable,
    coords: CoordinateIndex,
    mapbox: MapboxSettings,
    controls: ControlSettings,
}

impl Dashboard {
    /// Fetch the three sources and build the table. Any failure is fatal.
    #[instrument(level = "info", skip_all)]
    pub async fn load(client: &Client, config: &DashboardConfig) -> Result<Self, RetrievalError> {
        let sources = fetch::load_sources(client, &config.sources).await?;
        Ok(Self::from_sources(&sources, config))
    }

    pub fn from_sources(sources: &SourceTables, config: &DashboardConfig) -> Self {
        let table = process::build_unified(sources);
        let coords = CoordinateIndex::build(&table);
        if !table.contains_region(&config.controls.default_region) {
            tracing::warn!(
                region = %config.controls.default_region,
                "default region not present in data"
            );
        }
        info!(regions = coords.len(), "coordinate index built");
        Self {
            table,
            coords,
            mapbox: config.mapbox.clone(),
            controls: config.controls.clone(),
        }
    }

    pub fn table(&self) -> &UnifiedTable {
        &self.table
    }

    pub fn control_settings(&self) -> &ControlSettings {
        &self.controls
    }

    pub fn controls(&self) -> ControlsSpec {
        view::controls_spec(&self.table, &self.controls)
    }

    pub fn map_figure(&self, selection: &MapSelection) -> Result<MapFigure, LookupError> {
        let map = view::map_view(&self.table, &self.coords, selection)?;
        Ok(map.to_figure(&self.mapbox))
    }

    pub fn trend_figure(&self, region: &str) -> Result<TrendFigure, LookupError> {
        Ok(view::trend_view(&self.table, region)?.to_figure())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::process::{Metric, RawSeriesTable};
    use crate::testdata;

    pub(crate) fn fixture_dashboard() -> Dashboard {
        let sources = SourceTables {
            confirmed: RawSeriesTable::parse("confirmed.csv", &testdata::confirmed_csv()).unwrap(),
            deaths: RawSeriesTable::parse("deaths.csv", &testdata::deaths_csv()).unwrap(),
            recovered: RawSeriesTable::parse("recovered.csv", &testdata::recovered_csv()).unwrap(),
        };
        Dashboard::from_sources(&sources, &DashboardConfig::default())
    }

    #[test]
    fn test_views_from_dashboard() {
        let dash = fixture_dashboard();
        assert_eq!(dash.table().regions().len(), 4);

        let sel = MapSelection {
            region: "Brazil".into(),
            metric: Metric::Confirmed,
            date: testdata::date(15),
        };
        let fig = dash.map_figure(&sel).unwrap();
        assert_eq!(fig.data[0].lat.len(), 2);
        assert_eq!(fig.layout.mapbox.style, "dark");

        let trend = dash.trend_figure("Brazil").unwrap();
        assert_eq!(trend.data.0.x.len(), 30);

        assert!(dash.trend_figure("Narnia").is_err());
        assert_eq!(dash.controls().region.options.len(), 4);
    }

    #[tokio::test]
    async fn test_load_from_files() {
        use std::io::Write;
        let write = |text: String| {
            let mut f = tempfile::NamedTempFile::new().unwrap();
            f.write_all(text.as_bytes()).unwrap();
            f
        };
        let (c, d, r) = (
            write(testdata::confirmed_csv()),
            write(testdata::deaths_csv()),
            write(testdata::recovered_csv()),
        );
        let mut config = DashboardConfig::default();
        config.sources.confirmed = c.path().display().to_string();
        config.sources.deaths = d.path().display().to_string();
        config.sources.recovered = r.path().display().to_string();

        let dash = Dashboard::load(&Client::new(), &config).await.unwrap();
        assert_eq!(
            dash.table().records().len(),
            testdata::CONFIRMED_ROWS * testdata::DATE_COLUMNS
        );
    }
}
