//! Retrieves NWS forecast periods for a coordinate.
//!
//! The upstream API uses a two-step discovery pattern: a "points" resource
//! keyed by coordinate returns the forecast-resource URL for that location's
//! grid, and fetching that URL yields the period list (typically 14 half-day
//! periods). Both requests carry a descriptive client identifier; the NWS
//! may reject anonymous traffic.

use crate::forecast::error::ForecastError;
use crate::types::forecast::ForecastPeriod;
use bon::bon;
use chrono::{DateTime, Utc};
use log::warn;
use reqwest::header;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://api.weather.gov";
const DEFAULT_USER_AGENT: &str = concat!(
    "frostcast/",
    env!("CARGO_PKG_VERSION"),
    " (https://crates.io/crates/frostcast)"
);

/// The outcome of a forecast fetch.
#[derive(Debug, Clone)]
pub struct Forecast {
    /// Periods whose end time lies in the future (or the unfiltered list,
    /// when filtering would have removed everything; see
    /// [`ForecastClient::get_forecast`]).
    pub periods: Vec<ForecastPeriod>,
    /// How many periods the upstream returned before filtering.
    pub raw_count: usize,
    /// The unfiltered period list, present only when `include_raw` was set.
    pub raw_periods: Option<Vec<ForecastPeriod>>,
}

/// Client for the NWS points/forecast API pair.
pub struct ForecastClient {
    http: Client,
    base_url: String,
    user_agent: String,
}

#[bon]
impl ForecastClient {
    /// Creates a forecast client.
    ///
    /// # Arguments
    ///
    /// * `.base_url(String)`: Optional. Override the upstream base URL
    ///   (used by tests and proxies).
    /// * `.user_agent(String)`: Optional. Replace the default client
    ///   identifier sent with every request.
    #[builder]
    pub fn new(base_url: Option<String>, user_agent: Option<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            user_agent: user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        }
    }

    /// Fetches upcoming forecast periods for a coordinate.
    ///
    /// Periods already over (`end_time` not strictly after now) are dropped.
    /// If that would drop every period of a non-empty response, the
    /// unfiltered list is returned instead: some data beats none, at the
    /// cost of possibly surfacing expired periods. That fallback is logged.
    ///
    /// # Arguments
    ///
    /// * `.lat(f64)` / `.lon(f64)`: **Required.** Coordinate to resolve.
    /// * `.include_raw(bool)`: Optional, default `false`. Also return the
    ///   unfiltered period list for diagnostics.
    ///
    /// # Errors
    ///
    /// A non-2xx response at either step returns
    /// [`ForecastError::HttpStatus`]; callers should treat this as
    /// "forecast unavailable" rather than retrying here.
    #[builder]
    pub async fn get_forecast(
        &self,
        lat: f64,
        lon: f64,
        include_raw: Option<bool>,
    ) -> Result<Forecast, ForecastError> {
        let include_raw = include_raw.unwrap_or(false);

        let points_url = format!("{}/points/{:.4},{:.4}", self.base_url, lat, lon);
        let points: PointsResponse = self.get_json(&points_url).await?;

        let forecast_url = points.properties.forecast;
        let forecast: ForecastResponse = self.get_json(&forecast_url).await?;

        let raw = forecast.properties.periods;
        let raw_count = raw.len();
        let raw_periods = include_raw.then(|| raw.clone());

        let (periods, fell_back) = filter_future_periods(raw, Utc::now());
        if fell_back {
            warn!(
                "All {raw_count} forecast periods for {lat:.4},{lon:.4} have expired; \
                 serving the unfiltered list"
            );
        }

        Ok(Forecast {
            periods,
            raw_count,
            raw_periods,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ForecastError> {
        let response = self
            .http
            .get(url)
            .header(header::USER_AGENT, &self.user_agent)
            .header(header::ACCEPT, "application/geo+json")
            .send()
            .await
            .map_err(|e| ForecastError::NetworkRequest(url.to_string(), e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("NWS request to {url} failed with status {status}");
            return Err(ForecastError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }

        response.json::<T>().await.map_err(|source| ForecastError::JsonParse {
            url: url.to_string(),
            source,
        })
    }
}

/// Drops periods whose end time is not strictly after `now`. When filtering
/// would empty a non-empty list, returns the original list and `true`.
pub(crate) fn filter_future_periods(
    raw: Vec<ForecastPeriod>,
    now: DateTime<Utc>,
) -> (Vec<ForecastPeriod>, bool) {
    let filtered: Vec<ForecastPeriod> = raw
        .iter()
        .filter(|p| p.end_time.with_timezone(&Utc) > now)
        .cloned()
        .collect();

    if filtered.is_empty() && !raw.is_empty() {
        (raw, true)
    } else {
        (filtered, false)
    }
}

#[derive(Debug, Deserialize)]
struct PointsResponse {
    properties: PointsProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointsProperties {
    forecast: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    properties: ForecastProperties,
}

#[derive(Debug, Deserialize)]
struct ForecastProperties {
    periods: Vec<ForecastPeriod>,
}
