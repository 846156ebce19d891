// src/config.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::fetch::urls;
use crate::process::Metric;

/// Env var naming an optional YAML config file.
pub const CONFIG_ENV: &str = "COVIDDASH_CONFIG";

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceUrls {
    pub confirmed: String,
    pub deaths: String,
    pub recovered: String,
}

impl Default for SourceUrls {
    fn default() -> Self {
        Self {
            confirmed: urls::CONFIRMED_URL.to_string(),
            deaths: urls::DEATHS_URL.to_string(),
            recovered: urls::RECOVERED_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8050,
        }
    }
}

/// Passed through to the browser; the basemap itself is rendered client-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapboxSettings {
    pub access_token: String,
    pub style: String,
}

impl Default for MapboxSettings {
    fn default() -> Self {
        Self {
            access_token: String::new(),
            style: "dark".to_string(),
        }
    }
}

/// Control defaults and the date picker's allowed range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    pub default_region: String,
    pub default_metric: Metric,
    pub default_date: NaiveDate,
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            default_region: "Brazil".to_string(),
            default_metric: Metric::Confirmed,
            default_date: ymd(2021, 1, 4),
            min_date: ymd(2020, 1, 1),
            max_date: ymd(2021, 12, 31),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub sources: SourceUrls,
    pub server: ServerSettings,
    pub mapbox: MapboxSettings,
    pub controls: ControlSettings,
}

impl DashboardConfig {
    /// Defaults, then the YAML file named by `COVIDDASH_CONFIG` (if set),
    /// then environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut cfg = match env::var(CONFIG_ENV) {
            Ok(path) => Self::from_yaml_file(&path)?,
            Err(_) => Self::default(),
        };
        cfg.apply_env(|key| env::var(key).ok())?;
        cfg.validate()?;
        info!(
            host = %cfg.server.host,
            port = cfg.server.port,
            mapbox_token = !cfg.mapbox.access_token.is_empty(),
            "configuration loaded"
        );
        Ok(cfg)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: shown.clone(),
            source,
        })?;
        debug!(path = %shown, "reading config file");
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: shown,
            source,
        })
    }

    /// Apply `HOST`, `PORT`, `MAPBOX_ACCESS_TOKEN` and the
    /// `COVID_{CONFIRMED,DEATHS,RECOVERED}_URL` overrides.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::BadValue {
                key: "PORT".to_string(),
                value: port.clone(),
            })?;
        }
        if let Some(token) = lookup("MAPBOX_ACCESS_TOKEN") {
            self.mapbox.access_token = token;
        }
        for (key, slot) in [
            ("COVID_CONFIRMED_URL", &mut self.sources.confirmed),
            ("COVID_DEATHS_URL", &mut self.sources.deaths),
            ("COVID_RECOVERED_URL", &mut self.sources.recovered),
        ] {
            if let Some(url) = lookup(key) {
                *slot = url;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.controls;
        if c.min_date > c.max_date {
            return Err(ConfigError::InvertedBounds {
                min: c.min_date,
                max: c.max_date,
            });
        }
        if !(c.min_date..=c.max_date).contains(&c.default_date) {
            return Err(ConfigError::BadValue {
                key: "controls.default_date".to_string(),
                value: c.default_date.to_string(),
            });
        }
        if c.default_region.trim().is_empty() {
            return Err(ConfigError::BadValue {
                key: "controls.default_region".to_string(),
                value: c.default_region.clone(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.controls.default_region, "Brazil");
        assert_eq!(cfg.controls.default_metric, Metric::Confirmed);
        assert_eq!(cfg.controls.default_date, ymd(2021, 1, 4));
        assert_eq!(cfg.controls.min_date, ymd(2020, 1, 1));
        assert_eq!(cfg.controls.max_date, ymd(2021, 12, 31));
        assert_eq!(cfg.mapbox.style, "dark");
        assert!(cfg.sources.confirmed.ends_with("time_series_covid19_confirmed_global.csv"));
        cfg.validate().unwrap();
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "server:\n  port: 9000\ncontrols:\n  default_region: Chad\n  default_metric: deaths\n  default_date: 2020-06-01\n"
        )
        .unwrap();

        let cfg = DashboardConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.controls.default_region, "Chad");
        assert_eq!(cfg.controls.default_metric, Metric::Deaths);
        assert_eq!(cfg.controls.default_date, ymd(2020, 6, 1));
        assert_eq!(cfg.controls.max_date, ymd(2021, 12, 31));
        assert_eq!(cfg.sources, SourceUrls::default());
    }

    #[test]
    fn test_bad_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "server: [not, a, map]").unwrap();
        let err = DashboardConfig::from_yaml_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let err = DashboardConfig::from_yaml_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PORT", "8123"),
            ("MAPBOX_ACCESS_TOKEN", "pk.test"),
            ("COVID_DEATHS_URL", "/tmp/deaths.csv"),
        ]
        .into_iter()
        .collect();

        let mut cfg = DashboardConfig::default();
        cfg.apply_env(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.server.port, 8123);
        assert_eq!(cfg.mapbox.access_token, "pk.test");
        assert_eq!(cfg.sources.deaths, "/tmp/deaths.csv");
        assert_eq!(cfg.sources.confirmed, urls::CONFIRMED_URL);
    }

    #[test]
    fn test_bad_port() {
        let mut cfg = DashboardConfig::default();
        let err = cfg
            .apply_env(|k| (k == "PORT").then(|| "eighty".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::BadValue { ref key, .. } if key == "PORT"));
    }

    #[test]
    fn test_validate_bounds() {
        let mut cfg = DashboardConfig::default();
        cfg.controls.min_date = ymd(2022, 1, 1);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvertedBounds { .. })
        ));

        let mut cfg = DashboardConfig::default();
        cfg.controls.default_date = ymd(2019, 12, 31);
        assert!(matches!(cfg.validate(), Err(ConfigError::BadValue { .. })));
    }
}
