// src/fetch/mod.rs
//! Retrieve the three source CSVs.

pub mod urls;

use reqwest::Client;
use tracing::{debug, info, instrument};

use crate::config::SourceUrls;
use crate::error::RetrievalError;
use crate::process::{RawSeriesTable, SourceTables};
use urls::SourceKind;

/// Client for the startup load. No request timeout: a slow source blocks
/// startup until it completes.
pub fn build_client() -> Result<Client, reqwest::Error> {
    Client::builder().build()
}

/// Read one resource as text. No retries: a failure here is fatal at startup.
#[instrument(level = "info", skip(client))]
pub async fn fetch_text(client: &Client, location: &str) -> Result<String, RetrievalError> {
    let kind = urls::classify(location).ok_or_else(|| RetrievalError::BadLocation {
        location: location.to_string(),
    })?;
    let http_err = |source| RetrievalError::Http {
        location: location.to_string(),
        source,
    };

    let text = match kind {
        SourceKind::Http(url) => client
            .get(url)
            .send()
            .await
            .map_err(http_err)?
            .error_for_status()
            .map_err(http_err)?
            .text()
            .await
            .map_err(http_err)?,
        SourceKind::File(path) => {
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| RetrievalError::Io {
                    location: location.to_string(),
                    source,
                })?
        }
    };
    debug!(bytes = text.len(), "fetched");
    Ok(text)
}

/// Fetch and parse one wide table.
pub async fn load_table(
    client: &Client,
    location: &str,
) -> Result<RawSeriesTable, RetrievalError> {
    let text = fetch_text(client, location).await?;
    RawSeriesTable::parse(location, &text)
}

/// Fetch all three tables concurrently; the first failure aborts the rest.
#[instrument(level = "info", skip_all)]
pub async fn load_sources(
    client: &Client,
    sources: &SourceUrls,
) -> Result<SourceTables, RetrievalError> {
    let (confirmed, deaths, recovered) = futures::try_join!(
        load_table(client, &sources.confirmed),
        load_table(client, &sources.deaths),
        load_table(client, &sources.recovered),
    )?;
    info!(
        confirmed = confirmed.rows.len(),
        deaths = deaths.rows.len(),
        recovered = recovered.rows.len(),
        dates = confirmed.dates.len(),
        "source tables loaded"
    );
    Ok(SourceTables {
        confirmed,
        deaths,
        recovered,
    })
}
