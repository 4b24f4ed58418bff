mod error;
mod forecast;
mod frostcast;
mod normals;
mod stations;
mod types;
mod watch;

pub use error::FrostcastError;
pub use frostcast::*;
pub use watch::*;

pub use forecast::client::{Forecast, ForecastClient};
pub use forecast::day_bucket::group_by_day;
pub use forecast::freeze::{freeze_risk, FreezeRisk, FREEZE_THRESHOLD_F, NIGHT_LOOKAHEAD};
pub use normals::client::{NormalsClient, TOKEN_ENV_VARS};
pub use stations::station_index::{normalize_zip, StationIndex};

pub use types::climate::ClimateSummary;
pub use types::forecast::{DayForecast, ForecastPeriod, Temperature, TemperatureUnit};
pub use types::station::{StationRecord, StationRef};

pub use forecast::error::ForecastError;
pub use normals::error::NormalsError;
pub use stations::error::StationIndexError;
