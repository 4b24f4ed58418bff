//! Forecast data structures: the half-day periods returned by the NWS
//! forecast endpoint and the calendar-day summaries folded from them.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Temperature unit as reported by the upstream forecast service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[serde(rename = "F")]
    Fahrenheit,
    #[serde(rename = "C")]
    Celsius,
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureUnit::Fahrenheit => write!(f, "F"),
            TemperatureUnit::Celsius => write!(f, "C"),
        }
    }
}

/// A temperature value tagged with its unit.
///
/// Carried as a pair instead of a bare number so threshold comparisons can
/// never accidentally mix units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Temperature {
    pub value: i32,
    pub unit: TemperatureUnit,
}

impl Temperature {
    pub fn as_fahrenheit(&self) -> f64 {
        match self.unit {
            TemperatureUnit::Fahrenheit => self.value as f64,
            TemperatureUnit::Celsius => self.value as f64 * 9.0 / 5.0 + 32.0,
        }
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°{}", self.value, self.unit)
    }
}

/// One half-day forecast period as returned by the NWS forecast resource.
///
/// Transient data: held in memory for the current advisory only, never
/// persisted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    /// Period label (e.g., "Tuesday Night").
    pub name: String,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub is_daytime: bool,
    pub temperature: i32,
    pub temperature_unit: TemperatureUnit,
    #[serde(default)]
    pub wind_speed: Option<String>,
    #[serde(default)]
    pub wind_direction: Option<String>,
    pub short_forecast: String,
    #[serde(default)]
    pub detailed_forecast: Option<String>,
}

impl ForecastPeriod {
    /// The period's temperature tagged with its unit.
    pub fn temp(&self) -> Temperature {
        Temperature {
            value: self.temperature,
            unit: self.temperature_unit,
        }
    }
}

/// A calendar-day summary folded from the half-day periods sharing a date.
///
/// `high` is the maximum daytime temperature and `low` the minimum nighttime
/// temperature; either stays `None` when the day had no periods of that kind
/// (common at the edges of the forecast window).
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayForecast {
    /// Display name for the day, taken from the daytime period when present.
    pub day_name: String,
    pub date: NaiveDate,
    pub high: Option<i32>,
    pub low: Option<i32>,
    /// Symbol derived from the forecast text (see the day bucketer's icon table).
    pub icon: String,
    pub unit: TemperatureUnit,
}
