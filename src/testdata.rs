//! Small CSV fixtures shaped like the JHU global time-series files.
//!
//! 32 date columns (2020-12-20 ..= 2021-01-20). Quirks covered:
//! - Brazil has a country-level row and an `Acre` sub-region row.
//! - Canada has a coordinate-less row; its recovered data is a single
//!   country-level row that matches nothing in confirmed.
//! - Chad has no recovered row; Iceland has no deaths row.

use chrono::{Days, NaiveDate};

use crate::process::{merge, reshape, Metric, RawSeriesTable, UnifiedTable};

pub const DATE_COLUMNS: usize = 32;
pub const CONFIRMED_ROWS: usize = 6;

type Row = (&'static str, &'static str, &'static str, &'static str, fn(i64) -> i64);

const CONFIRMED: &[Row] = &[
    ("", "Brazil", "-14.235", "-51.9253", |d| 7_000_000 + 40_000 * d + 1_000 * (d % 7)),
    ("Acre", "Brazil", "-9.0238", "-70.812", |d| 40_000 + 300 * d),
    ("Repatriated Travellers", "Canada", "", "", |_| 13),
    ("Ontario", "Canada", "51.2538", "-85.3232", |d| 160_000 + 3_000 * d),
    ("", "Chad", "15.4542", "18.7322", |d| 2_000 + 10 * d),
    ("", "Iceland", "64.9631", "-19.0208", |d| 5_500 + 20 * d),
];

const DEATHS: &[Row] = &[
    ("", "Brazil", "-14.235", "-51.9253", |d| 180_000 + 800 * d),
    ("Acre", "Brazil", "-9.0238", "-70.812", |d| 800 + 5 * d),
    ("Repatriated Travellers", "Canada", "", "", |_| 0),
    ("Ontario", "Canada", "51.2538", "-85.3232", |d| 4_000 + 40 * d),
    ("", "Chad", "15.4542", "18.7322", |d| 100 + d),
];

const RECOVERED: &[Row] = &[
    ("", "Brazil", "-14.235", "-51.9253", |d| 6_000_000 + 30_000 * d),
    ("Acre", "Brazil", "-9.0238", "-70.812", |d| 35_000 + 250 * d),
    ("", "Canada", "56.1304", "-106.3468", |d| 150_000 + 2_500 * d),
    ("", "Iceland", "64.9631", "-19.0208", |d| 5_000 + 25 * d),
];

pub fn first_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 12, 20).unwrap()
}

pub fn date(offset: u64) -> NaiveDate {
    first_date().checked_add_days(Days::new(offset)).unwrap()
}

/// Day offset of a date within the fixture range.
pub fn offset_of(d: NaiveDate) -> i64 {
    (d - first_date()).num_days()
}

pub fn brazil_confirmed(d: i64) -> i64 {
    (CONFIRMED[0].4)(d)
}

fn render(rows: &[Row]) -> String {
    let mut out = String::from("Province/State,Country/Region,Lat,Long");
    for i in 0..DATE_COLUMNS as u64 {
        out.push_str(&format!(",{}", date(i).format("%-m/%-d/%y")));
    }
    out.push('\n');
    for (sub, region, lat, long, f) in rows {
        out.push_str(&format!("{sub},{region},{lat},{long}"));
        for d in 0..DATE_COLUMNS as i64 {
            out.push_str(&format!(",{}", f(d)));
        }
        out.push('\n');
    }
    out
}

pub fn confirmed_csv() -> String {
    render(CONFIRMED)
}

pub fn deaths_csv() -> String {
    render(DEATHS)
}

pub fn recovered_csv() -> String {
    render(RECOVERED)
}

/// Run the fixtures through the whole load pipeline.
pub fn unified() -> UnifiedTable {
    let parse = |name: &str, text: String, metric: Metric| {
        let table = RawSeriesTable::parse(name, &text).unwrap();
        reshape::melt(&table, metric)
    };
    merge::merge(
        &parse("confirmed.csv", confirmed_csv(), Metric::Confirmed),
        &parse("deaths.csv", deaths_csv(), Metric::Deaths),
        &parse("recovered.csv", recovered_csv(), Metric::Recovered),
    )
}
