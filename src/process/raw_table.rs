use chrono::NaiveDate;
use csv::ReaderBuilder;
use tracing::debug;

use crate::error::RetrievalError;
use crate::process::{date_parser, utils};

/// Headers of the four leading id columns, in order.
pub const ID_COLUMNS: [&str; 4] = ["Province/State", "Country/Region", "Lat", "Long"];

/// One line of a wide time-series file.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSeriesRow {
    pub sub_region: Option<String>,
    pub region: String,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    /// One cumulative count per entry of [`RawSeriesTable::dates`].
    pub counts: Vec<i64>,
}

/// A wide time-series file: id columns plus one count column per date.
#[derive(Debug, Clone)]
pub struct RawSeriesTable {
    /// Where this table was loaded from; used in error messages and logs.
    pub location: String,
    /// Parsed from the column headers after the id columns, in file order.
    pub dates: Vec<NaiveDate>,
    pub rows: Vec<RawSeriesRow>,
}

impl RawSeriesTable {
    /// Parse CSV text with the fixed `Province/State, Country/Region, Lat,
    /// Long, <date>...` layout.
    pub fn parse(location: &str, text: &str) -> Result<Self, RetrievalError> {
        let csv_err = |source| RetrievalError::Csv {
            location: location.to_string(),
            source,
        };

        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = rdr
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| utils::clean_str(h).to_string())
            .collect();

        let ids_ok = headers.len() >= ID_COLUMNS.len()
            && headers
                .iter()
                .zip(ID_COLUMNS)
                .all(|(found, expected)| found.eq_ignore_ascii_case(expected));
        if !ids_ok {
            return Err(RetrievalError::MissingColumns {
                location: location.to_string(),
                found: headers,
            });
        }

        let dates = headers[ID_COLUMNS.len()..]
            .iter()
            .map(|h| {
                date_parser::parse_header_date(h).ok_or_else(|| RetrievalError::BadDateHeader {
                    location: location.to_string(),
                    header: h.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut rows = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            let record = result.map_err(csv_err)?;
            let bad_cell = |column: &str, value: &str| RetrievalError::BadCell {
                location: location.to_string(),
                record: idx + 1,
                column: column.to_string(),
                value: value.to_string(),
            };

            let field = |i: usize| record.get(i).unwrap_or_default();
            let region = utils::non_empty(field(1))
                .ok_or_else(|| bad_cell(ID_COLUMNS[1], field(1)))?
                .to_string();
            let lat = utils::parse_coordinate(field(2))
                .map_err(|_| bad_cell(ID_COLUMNS[2], field(2)))?;
            let long = utils::parse_coordinate(field(3))
                .map_err(|_| bad_cell(ID_COLUMNS[3], field(3)))?;

            let counts = record
                .iter()
                .skip(ID_COLUMNS.len())
                .zip(&headers[ID_COLUMNS.len()..])
                .map(|(raw, header)| {
                    utils::parse_count(raw).ok_or_else(|| bad_cell(header.as_str(), raw))
                })
                .collect::<Result<Vec<_>, _>>()?;

            rows.push(RawSeriesRow {
                sub_region: utils::non_empty(field(0)).map(str::to_string),
                region,
                lat,
                long,
                counts,
            });
        }

        debug!(
            location,
            rows = rows.len(),
            dates = dates.len(),
            "parsed wide table"
        );
        Ok(Self {
            location: location.to_string(),
            dates,
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdata;

    #[test]
    fn test_parse_wide_table() {
        let table = RawSeriesTable::parse("confirmed.csv", &testdata::confirmed_csv()).unwrap();
        assert_eq!(table.dates.len(), testdata::DATE_COLUMNS);
        assert_eq!(table.dates[0], NaiveDate::from_ymd_opt(2020, 12, 20).unwrap());
        assert_eq!(table.rows.len(), testdata::CONFIRMED_ROWS);

        let brazil = &table.rows[0];
        assert_eq!(brazil.sub_region, None);
        assert_eq!(brazil.region, "Brazil");
        assert_eq!(brazil.lat, Some(-14.235));
        assert_eq!(brazil.counts.len(), testdata::DATE_COLUMNS);

        let acre = table
            .rows
            .iter()
            .find(|r| r.sub_region.as_deref() == Some("Acre"))
            .unwrap();
        assert_eq!(acre.region, "Brazil");
    }

    #[test]
    fn test_quoted_sub_region_with_comma() {
        let text = "Province/State,Country/Region,Lat,Long,1/22/20\n\"Bonaire, Sint Eustatius and Saba\",Netherlands,12.1784,-68.2385,0\n";
        let table = RawSeriesTable::parse("x.csv", text).unwrap();
        assert_eq!(
            table.rows[0].sub_region.as_deref(),
            Some("Bonaire, Sint Eustatius and Saba")
        );
    }

    #[test]
    fn test_blank_coordinates_are_optional() {
        let text = "Province/State,Country/Region,Lat,Long,1/22/20\nRepatriated Travellers,Canada,,,0\n";
        let table = RawSeriesTable::parse("x.csv", text).unwrap();
        assert_eq!(table.rows[0].lat, None);
        assert_eq!(table.rows[0].long, None);
    }

    #[test]
    fn test_missing_id_columns() {
        let text = "Country/Region,Lat,Long,1/22/20\nBrazil,-14.2,-51.9,0\n";
        let err = RawSeriesTable::parse("x.csv", text).unwrap_err();
        assert!(matches!(err, RetrievalError::MissingColumns { .. }));
    }

    #[test]
    fn test_bad_date_header() {
        let text = "Province/State,Country/Region,Lat,Long,yesterday\n,Brazil,-14.2,-51.9,0\n";
        let err = RawSeriesTable::parse("x.csv", text).unwrap_err();
        match err {
            RetrievalError::BadDateHeader { header, .. } => assert_eq!(header, "yesterday"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_count_cell() {
        let text = "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20\n,Brazil,-14.2,-51.9,0,\n";
        let err = RawSeriesTable::parse("x.csv", text).unwrap_err();
        match err {
            RetrievalError::BadCell { record, column, .. } => {
                assert_eq!(record, 1);
                assert_eq!(column, "1/23/20");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_and_oversized_counts_are_malformed() {
        let header = "Province/State,Country/Region,Lat,Long,1/22/20\n";
        for cell in ["-1", "9223372036854775807"] {
            let text = format!("{header},Brazil,-14.2,-51.9,{cell}\n");
            match RawSeriesTable::parse("x.csv", &text).unwrap_err() {
                RetrievalError::BadCell { column, value, .. } => {
                    assert_eq!(column, "1/22/20");
                    assert_eq!(value, cell);
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn test_ragged_row_is_malformed() {
        let text = "Province/State,Country/Region,Lat,Long,1/22/20,1/23/20\n,Brazil,-14.2,-51.9,0\n";
        let err = RawSeriesTable::parse("x.csv", text).unwrap_err();
        assert!(matches!(err, RetrievalError::Csv { .. }));
    }
}
