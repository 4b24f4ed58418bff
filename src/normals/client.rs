//! Client for the NOAA Climate Data Online annual-normals dataset.
//!
//! One upstream request covers all stations of interest at once; the parsed
//! summary is cached per station set for the lifetime of the client. Normals
//! change yearly at most, so the cache carries no TTL; a forced refresh
//! supersedes the cached entry.

use crate::normals::error::NormalsError;
use crate::types::climate::ClimateSummary;
use bon::bon;
use chrono::Utc;
use log::{info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::Mutex;

const DEFAULT_BASE_URL: &str = "https://www.ncdc.noaa.gov/cdo-web/api/v2";

/// Env vars checked in order for the NOAA token; first non-empty wins.
pub const TOKEN_ENV_VARS: &[&str] = &["FROSTCAST_NOAA_TOKEN", "NOAA_CDO_TOKEN", "NCDC_CDO_TOKEN"];

const DATASET_ID: &str = "NORMAL_ANN";
// Annual normals are keyed to a nominal date inside the normals period; any
// single day in range selects the full annual record.
const NORMALS_ANCHOR_DATE: &str = "2010-01-01";
const RESULT_LIMIT: &str = "1000";

/// Day-of-year of the last spring frost (28°F threshold, 30% probability).
const DT_SPRING_FROST: &str = "ANN-TMIN-PRBLST-T28FP30";
/// Day-of-year of the first fall frost (28°F threshold, 30% probability).
const DT_FALL_FROST: &str = "ANN-TMIN-PRBFST-T28FP30";
/// Dec-Feb mean minimum temperature, reported in tenths of °F.
const DT_WINTER_TMIN: &str = "DJF-TMIN-NORMAL";

/// Client for fetching and caching 30-year climate normals per station set.
///
/// The cache is owned by the instance, so its lifecycle is tied to whoever
/// constructed the client; there is no process-global state.
pub struct NormalsClient {
    http: Client,
    token: String,
    base_url: String,
    cache: Mutex<HashMap<String, ClimateSummary>>,
}

/// Cache key for a station set: IDs sorted ascending and comma-joined, so two
/// lists with the same members always resolve to the same entry regardless of
/// input order.
fn cache_key(stations: &[String]) -> String {
    let mut ids: Vec<&str> = stations.iter().map(String::as_str).collect();
    ids.sort_unstable();
    ids.join(",")
}

fn token_from_env() -> Option<String> {
    TOKEN_ENV_VARS
        .iter()
        .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()))
}

#[bon]
impl NormalsClient {
    /// Creates a client with an explicit token.
    ///
    /// # Arguments
    ///
    /// * `.token(String)`: **Required.** NOAA CDO API token.
    /// * `.base_url(String)`: Optional. Override the upstream base URL
    ///   (used by tests and proxies).
    #[builder]
    pub fn new(token: String, base_url: Option<String>) -> Self {
        Self {
            http: Client::new(),
            token,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a client with the token resolved from the environment.
    ///
    /// Checks [`TOKEN_ENV_VARS`] in order and uses the first non-empty value.
    ///
    /// # Errors
    ///
    /// Returns [`NormalsError::MissingToken`] when none of the variables is
    /// set. This is a fatal configuration error: it is raised immediately and
    /// never cached.
    pub fn from_env() -> Result<Self, NormalsError> {
        let token = token_from_env().ok_or(NormalsError::MissingToken {
            tried: TOKEN_ENV_VARS,
        })?;
        Ok(Self::builder().token(token).build())
    }

    /// Fetches the aggregated 30-year normals for a station set.
    ///
    /// On a cache hit the stored summary is returned without touching the
    /// network. `force_refresh` bypasses the cache read (the fresh result
    /// still supersedes the cached entry on success).
    ///
    /// # Arguments
    ///
    /// * `.stations(&[String])`: **Required.** Station IDs to query; all are
    ///   requested in a single upstream call.
    /// * `.force_refresh(bool)`: Optional. Defaults to `false`.
    ///
    /// # Errors
    ///
    /// Upstream non-2xx responses return [`NormalsError::HttpStatus`] with
    /// the status and response body attached. No retry is performed here and
    /// errors are never cached, so the next call re-attempts the fetch.
    #[builder]
    pub async fn get_normals(
        &self,
        stations: &[String],
        force_refresh: Option<bool>,
    ) -> Result<ClimateSummary, NormalsError> {
        let force_refresh = force_refresh.unwrap_or(false);
        let key = cache_key(stations);

        if !force_refresh {
            let cache = self.cache.lock().await;
            if let Some(cached) = cache.get(&key) {
                info!("Normals cache hit for station set [{key}]");
                return Ok(cached.clone());
            }
        }

        info!(
            "Fetching NOAA normals for {} station(s) [{key}]",
            stations.len()
        );
        let summary = self.fetch_normals(stations).await?;

        // Idempotent overwrite: a concurrent miss for the same key may have
        // raced us here, and either result is equally valid.
        let mut cache = self.cache.lock().await;
        cache.insert(key, summary.clone());
        Ok(summary)
    }

    /// Drops every cached summary. Subsequent calls re-fetch.
    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    async fn fetch_normals(&self, stations: &[String]) -> Result<ClimateSummary, NormalsError> {
        let url = format!("{}/data", self.base_url);

        let mut query: Vec<(&str, String)> = vec![
            ("datasetid", DATASET_ID.to_string()),
            ("startdate", NORMALS_ANCHOR_DATE.to_string()),
            ("enddate", NORMALS_ANCHOR_DATE.to_string()),
            ("limit", RESULT_LIMIT.to_string()),
        ];
        for datatype in [DT_SPRING_FROST, DT_FALL_FROST, DT_WINTER_TMIN] {
            query.push(("datatypeid", datatype.to_string()));
        }
        for station in stations {
            query.push(("stationid", station.clone()));
        }

        let response = self
            .http
            .get(&url)
            .header("token", &self.token)
            .query(&query)
            .send()
            .await
            .map_err(|e| NormalsError::NetworkRequest(url.clone(), e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("NOAA normals request to {url} failed with status {status}");
            return Err(NormalsError::HttpStatus { url, status, body });
        }

        let body = response
            .text()
            .await
            .map_err(|e| NormalsError::BodyRead(url.clone(), e))?;
        let parsed: NormalsResponse =
            serde_json::from_str(&body).map_err(|source| NormalsError::JsonParse { url, source })?;

        Ok(summarize(&parsed.results, stations))
    }
}

#[derive(Debug, Deserialize)]
struct NormalsResponse {
    // NOAA omits `results` entirely when nothing matched.
    #[serde(default)]
    results: Vec<NormalsRecord>,
}

#[derive(Debug, Deserialize)]
struct NormalsRecord {
    datatype: String,
    value: f64,
}

/// Mean of every reported value for one data type, across all stations that
/// reported it. `None` when nothing qualified; absence stays explicit.
fn average_for(results: &[NormalsRecord], datatype: &str) -> Option<f64> {
    let values: Vec<f64> = results
        .iter()
        .filter(|r| r.datatype == datatype)
        .map(|r| r.value)
        .collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn summarize(results: &[NormalsRecord], stations: &[String]) -> ClimateSummary {
    let spring = average_for(results, DT_SPRING_FROST);
    let fall = average_for(results, DT_FALL_FROST);
    let winter = average_for(results, DT_WINTER_TMIN);

    ClimateSummary {
        spring_frost_day: spring.map(|v| v.round() as u16),
        fall_frost_day: fall.map(|v| v.round() as u16),
        // Source units are tenths of °F; keep one decimal.
        avg_winter_temp_f: winter.map(|v| (v / 10.0 * 10.0).round() / 10.0),
        used_stations: stations.to_vec(),
        fetched_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(datatype: &str, value: f64) -> NormalsRecord {
        NormalsRecord {
            datatype: datatype.to_string(),
            value,
        }
    }

    #[test]
    fn cache_key_is_order_independent() {
        let forward = cache_key(&["A".to_string(), "B".to_string()]);
        let reversed = cache_key(&["B".to_string(), "A".to_string()]);
        assert_eq!(forward, reversed);
        assert_eq!(forward, "A,B");
    }

    #[test]
    fn summarize_averages_across_stations() {
        let results = vec![
            record(DT_SPRING_FROST, 105.0),
            record(DT_SPRING_FROST, 116.0),
            record(DT_FALL_FROST, 290.0),
            record(DT_WINTER_TMIN, 412.0),
            record(DT_WINTER_TMIN, 398.0),
        ];
        let stations = vec!["GHCND:A".to_string(), "GHCND:B".to_string()];

        let summary = summarize(&results, &stations);
        // (105 + 116) / 2 = 110.5, rounded to nearest day
        assert_eq!(summary.spring_frost_day, Some(111));
        assert_eq!(summary.fall_frost_day, Some(290));
        // (412 + 398) / 2 = 405 tenths -> 40.5 °F
        assert_eq!(summary.avg_winter_temp_f, Some(40.5));
        assert_eq!(summary.used_stations, stations);
    }

    #[test]
    fn summarize_keeps_absence_explicit() {
        // No DJF-TMIN-NORMAL rows at all: the field must be None, not 0/NaN.
        let results = vec![record(DT_SPRING_FROST, 120.0)];
        let summary = summarize(&results, &["GHCND:A".to_string()]);

        assert_eq!(summary.spring_frost_day, Some(120));
        assert_eq!(summary.fall_frost_day, None);
        assert_eq!(summary.avg_winter_temp_f, None);
    }

    #[test]
    fn summarize_handles_empty_results() {
        let summary = summarize(&[], &["GHCND:A".to_string()]);
        assert_eq!(summary.spring_frost_day, None);
        assert_eq!(summary.fall_frost_day, None);
        assert_eq!(summary.avg_winter_temp_f, None);
    }

    #[test]
    fn response_without_results_field_parses() {
        let parsed: NormalsResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_empty());
    }

    #[tokio::test]
    async fn cached_summary_is_shared_across_input_orders() {
        // Base URL points nowhere routable: if the cache were missed, the
        // fetch would fail instead of returning the primed summary.
        let client = NormalsClient::builder()
            .token("test-token".to_string())
            .base_url("http://127.0.0.1:9".to_string())
            .build();

        let primed = ClimateSummary {
            spring_frost_day: Some(110),
            fall_frost_day: Some(295),
            avg_winter_temp_f: Some(28.4),
            used_stations: vec!["GHCND:A".to_string(), "GHCND:B".to_string()],
            fetched_at: Utc::now(),
        };
        let key = cache_key(&["GHCND:A".to_string(), "GHCND:B".to_string()]);
        client.cache.lock().await.insert(key, primed.clone());

        let got = client
            .get_normals()
            .stations(&["GHCND:B".to_string(), "GHCND:A".to_string()])
            .call()
            .await
            .expect("reversed station order must hit the cache");
        assert_eq!(got, primed);
    }

    #[tokio::test]
    async fn force_refresh_bypasses_cache_read() {
        let client = NormalsClient::builder()
            .token("test-token".to_string())
            .base_url("http://127.0.0.1:9".to_string())
            .build();

        let primed = ClimateSummary {
            spring_frost_day: Some(100),
            fall_frost_day: None,
            avg_winter_temp_f: None,
            used_stations: vec!["GHCND:A".to_string()],
            fetched_at: Utc::now(),
        };
        client
            .cache
            .lock()
            .await
            .insert(cache_key(&["GHCND:A".to_string()]), primed);

        // With force_refresh the client must attempt the network and fail
        // here; the error must not replace the cached entry.
        let refreshed = client
            .get_normals()
            .stations(&["GHCND:A".to_string()])
            .force_refresh(true)
            .call()
            .await;
        assert!(refreshed.is_err());

        let cached = client
            .get_normals()
            .stations(&["GHCND:A".to_string()])
            .call()
            .await
            .expect("cached entry must survive a failed refresh");
        assert_eq!(cached.spring_frost_day, Some(100));
    }
}
