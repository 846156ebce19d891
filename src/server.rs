// src/server.rs

use serde::{Deserialize, Serialize};
use std::{convert::Infallible, net::SocketAddr, sync::Arc};
use tracing::{info, warn};
use warp::{
    http::StatusCode,
    reject::Rejection,
    reply::{self, Json, Reply, WithStatus},
    Filter,
};

use crate::dashboard::Dashboard;
use crate::view::controls;

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Debug, Default, Deserialize)]
struct MapQuery {
    region: Option<String>,
    metric: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TrendQuery {
    region: Option<String>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: Option<String>,
}

fn error_reply(status: StatusCode, error: &str, details: impl ToString) -> WithStatus<Json> {
    let details = details.to_string();
    warn!(status = status.as_u16(), %details, "{}", error);
    reply::with_status(
        reply::json(&ErrorResponse {
            error: error.to_string(),
            details: Some(details),
        }),
        status,
    )
}

async fn health_check() -> Result<impl Reply, Rejection> {
    Ok(reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "coviddash"
    })))
}

async fn get_controls(dash: Arc<Dashboard>) -> Result<impl Reply, Rejection> {
    Ok(reply::json(&dash.controls()))
}

async fn get_map(query: MapQuery, dash: Arc<Dashboard>) -> Result<impl Reply, Rejection> {
    let selection = match controls::map_selection(
        query.region.as_deref(),
        query.metric.as_deref(),
        query.date.as_deref(),
        dash.control_settings(),
    ) {
        Ok(s) => s,
        Err(e) => return Ok(error_reply(StatusCode::BAD_REQUEST, "Invalid selection", e)),
    };

    match dash.map_figure(&selection) {
        Ok(fig) => Ok(reply::with_status(reply::json(&fig), StatusCode::OK)),
        Err(e) => Ok(error_reply(StatusCode::NOT_FOUND, "Lookup failed", e)),
    }
}

async fn get_trend(query: TrendQuery, dash: Arc<Dashboard>) -> Result<impl Reply, Rejection> {
    let region = controls::trend_region(query.region.as_deref(), dash.control_settings());
    match dash.trend_figure(&region) {
        Ok(fig) => Ok(reply::with_status(reply::json(&fig), StatusCode::OK)),
        Err(e) => Ok(error_reply(StatusCode::NOT_FOUND, "Lookup failed", e)),
    }
}

fn with_dashboard(
    dash: Arc<Dashboard>,
) -> impl Filter<Extract = (Arc<Dashboard>,), Error = Infallible> + Clone {
    warp::any().map(move || dash.clone())
}

/// `/`, `/health` and the three `/api` endpoints.
pub fn routes(
    dash: Arc<Dashboard>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let index = warp::path::end()
        .and(warp::get())
        .map(|| reply::html(INDEX_HTML));

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(health_check);

    let controls = warp::path!("api" / "controls")
        .and(warp::get())
        .and(with_dashboard(dash.clone()))
        .and_then(get_controls);

    let map = warp::path!("api" / "map")
        .and(warp::get())
        .and(warp::query::<MapQuery>())
        .and(with_dashboard(dash.clone()))
        .and_then(get_map);

    let trend = warp::path!("api" / "trend")
        .and(warp::get())
        .and(warp::query::<TrendQuery>())
        .and(with_dashboard(dash))
        .and_then(get_trend);

    index
        .or(health)
        .or(controls)
        .or(map)
        .or(trend)
        .with(warp::trace::request())
}

/// Bind and serve until the process is stopped.
pub async fn serve(dash: Arc<Dashboard>, addr: SocketAddr) -> Result<(), warp::Error> {
    let (bound, server) = warp::serve(routes(dash)).try_bind_ephemeral(addr)?;
    info!("Server listening on http://{}", bound);
    info!("Health check: http://{}/health", bound);
    server.await;
    Ok(())
}
