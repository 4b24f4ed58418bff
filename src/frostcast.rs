//! This module provides the main entry point for the frostcast advisory
//! engine. It composes the station index, the NOAA normals client, and the
//! NWS forecast client into a single ZIP-code-to-advisory pipeline.

use crate::error::FrostcastError;
use crate::forecast::client::ForecastClient;
use crate::forecast::day_bucket::group_by_day;
use crate::forecast::freeze::{freeze_risk, FreezeRisk};
use crate::normals::client::NormalsClient;
use crate::stations::station_index::StationIndex;
use crate::types::climate::ClimateSummary;
use crate::types::forecast::DayForecast;
use crate::types::station::StationRecord;
use bon::bon;
use chrono::Utc;
use log::info;

/// The combined advisory handed to the presentation layer.
#[derive(Debug, Clone)]
pub struct Advisory {
    /// The station record the ZIP resolved to, `None` for unknown ZIPs.
    pub station: Option<StationRecord>,
    /// Aggregated 30-year normals, `None` for unknown ZIPs.
    pub climate: Option<ClimateSummary>,
    /// Up to 7 calendar-day summaries, ascending by date.
    pub days: Vec<DayForecast>,
    /// Freeze-risk outcome over the same period list that produced `days`.
    pub freeze: FreezeRisk,
}

impl Advisory {
    /// The all-null advisory returned for ZIPs outside the station index.
    /// Unknown locations are expected input, not an error.
    pub(crate) fn unavailable() -> Self {
        Self {
            station: None,
            climate: None,
            days: Vec::new(),
            freeze: FreezeRisk::Unavailable,
        }
    }

    /// Warning banner text, `None` unless a freeze is expected.
    ///
    /// Note that `None` also covers the no-forecast case; check
    /// [`Advisory::freeze`] to distinguish "no risk" from "no data".
    pub fn freeze_warning(&self) -> Option<String> {
        self.freeze.period().map(|period| {
            format!(
                "Freeze risk soon: {} {}°{}",
                period.name, period.temperature, period.temperature_unit
            )
        })
    }
}

/// The main client for producing garden advisories.
///
/// Owns all per-process state (station index, normals cache, HTTP clients);
/// nothing in the engine is process-global, so multiple instances with
/// separate caches can coexist in one process.
pub struct Frostcast {
    station_index: StationIndex,
    normals: NormalsClient,
    forecast: ForecastClient,
}

#[bon]
impl Frostcast {
    /// Creates a client from explicit parts.
    ///
    /// Use this to inject a custom station dataset, a normals client with an
    /// explicit token, or clients pointed at test endpoints.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use frostcast::{ForecastClient, Frostcast, NormalsClient, StationIndex};
    ///
    /// # fn run() -> Result<(), frostcast::FrostcastError> {
    /// let client = Frostcast::builder()
    ///     .station_index(StationIndex::bundled()?)
    ///     .normals(NormalsClient::builder().token("my-token".into()).build())
    ///     .forecast(ForecastClient::builder().build())
    ///     .build();
    /// # let _ = client;
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn new(
        station_index: StationIndex,
        normals: NormalsClient,
        forecast: ForecastClient,
    ) -> Self {
        Self {
            station_index,
            normals,
            forecast,
        }
    }

    /// Creates a client with the bundled station dataset, the NOAA token
    /// from the environment, and the public NOAA/NWS endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`crate::NormalsError::MissingToken`] (wrapped) when no token
    /// env var is set; see [`crate::TOKEN_ENV_VARS`].
    pub fn from_env() -> Result<Self, FrostcastError> {
        Ok(Self {
            station_index: StationIndex::bundled()?,
            normals: NormalsClient::from_env()?,
            forecast: ForecastClient::builder().build(),
        })
    }

    pub fn station_index(&self) -> &StationIndex {
        &self.station_index
    }

    pub fn normals(&self) -> &NormalsClient {
        &self.normals
    }

    pub fn forecast(&self) -> &ForecastClient {
        &self.forecast
    }

    /// Produces the combined advisory for a ZIP code.
    ///
    /// A ZIP outside the station index yields [`Advisory::unavailable`]
    /// without touching the network. Otherwise the normals and forecast
    /// fetches run concurrently (neither depends on the other), and the day
    /// summaries and freeze scan are derived from the same filtered period
    /// list so the 7-day grid can never disagree with the freeze banner.
    ///
    /// # Arguments
    ///
    /// * `.zip(&str)`: **Required.** 5-digit or loosely formatted ZIP code.
    /// * `.force_refresh(bool)`: Optional, default `false`. Bypass the
    ///   normals cache. The forecast is never cached, so this only affects
    ///   climate data.
    ///
    /// # Errors
    ///
    /// Upstream failures from either fetch propagate as
    /// [`FrostcastError`]; callers should present them as "unavailable due
    /// to error", distinct from both "loading" and "no risk detected".
    #[builder]
    pub async fn get_advisory(
        &self,
        zip: &str,
        force_refresh: Option<bool>,
    ) -> Result<Advisory, FrostcastError> {
        let force_refresh = force_refresh.unwrap_or(false);

        let Some(record) = self.station_index.lookup(zip) else {
            info!("ZIP {zip} not found in the station index");
            return Ok(Advisory::unavailable());
        };

        let station_ids = record.station_ids();
        let (climate, forecast) = tokio::join!(
            self.normals
                .get_normals()
                .stations(&station_ids)
                .force_refresh(force_refresh)
                .call(),
            self.forecast
                .get_forecast()
                .lat(record.latitude)
                .lon(record.longitude)
                .call(),
        );
        let climate = climate?;
        let forecast = forecast?;

        let days = group_by_day(&forecast.periods);
        let freeze = freeze_risk(&forecast.periods, Utc::now());

        Ok(Advisory {
            station: Some(record.clone()),
            climate: Some(climate),
            days,
            freeze,
        })
    }
}
