//! The 30-year climate normals summary derived for a station set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Aggregated 30-year climate normals for a set of stations.
///
/// Produced once per station set by the normals client and cached; a forced
/// refresh supersedes the cached value rather than mutating it. Fields are
/// `None` when the upstream dataset reported no qualifying values for the
/// corresponding data type; absence is deliberately explicit and never
/// collapsed into `0` or `NaN`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClimateSummary {
    /// Day-of-year (1..365) of the statistically last spring frost.
    pub spring_frost_day: Option<u16>,
    /// Day-of-year (1..365) of the statistically first fall frost.
    pub fall_frost_day: Option<u16>,
    /// Mean winter (Dec-Feb) minimum temperature in °F, one decimal.
    pub avg_winter_temp_f: Option<f64>,
    /// The station IDs the upstream query covered, in request order.
    pub used_stations: Vec<String>,
    /// When this summary was fetched.
    pub fetched_at: DateTime<Utc>,
}
