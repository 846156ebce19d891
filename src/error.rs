// src/error.rs

use chrono::NaiveDate;
use thiserror::Error;

/// Failure to fetch or parse one of the source CSVs. Always fatal at startup.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("invalid source location `{location}`")]
    BadLocation { location: String },

    #[error("GET {location} failed")]
    Http {
        location: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("reading {location} failed")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error in {location}")]
    Csv {
        location: String,
        #[source]
        source: csv::Error,
    },

    #[error("{location}: expected columns Province/State, Country/Region, Lat, Long; found {found:?}")]
    MissingColumns { location: String, found: Vec<String> },

    #[error("{location}: column header `{header}` is not a date")]
    BadDateHeader { location: String, header: String },

    #[error("{location}: record {record}, column `{column}`: cannot parse `{value}`")]
    BadCell {
        location: String,
        record: usize,
        column: String,
        value: String,
    },
}

/// A selector referenced something the loaded table does not contain.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("unknown region `{0}`")]
    UnknownRegion(String),
}

/// Control-layer rejection of a selector value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("date {date} is outside the allowed range {min}..={max}")]
    DateOutOfRange {
        date: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },

    #[error("`{0}` is not a date (expected YYYY-MM-DD)")]
    BadDate(String),

    #[error("unknown metric `{0}`")]
    UnknownMetric(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config file {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid value for {key}: `{value}`")]
    BadValue { key: String, value: String },

    #[error("date bounds are inverted: {min} > {max}")]
    InvertedBounds { min: NaiveDate, max: NaiveDate },
}
