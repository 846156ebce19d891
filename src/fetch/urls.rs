// src/fetch/urls.rs

/// JHU CSSE global time series, one wide CSV per metric.
pub const CONFIRMED_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_confirmed_global.csv";
pub const DEATHS_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_deaths_global.csv";
pub const RECOVERED_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_recovered_global.csv";

/// How a source location is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Http(url::Url),
    File(std::path::PathBuf),
}

/// `http(s)://` goes over the network, `file://` and anything that does not
/// parse as a URL is read from disk. Other schemes are rejected.
pub fn classify(location: &str) -> Option<SourceKind> {
    match url::Url::parse(location) {
        Ok(u) if matches!(u.scheme(), "http" | "https") => Some(SourceKind::Http(u)),
        Ok(u) if u.scheme() == "file" => u.to_file_path().ok().map(SourceKind::File),
        Ok(_) => None,
        Err(_) => Some(SourceKind::File(location.into())),
    }
}
