//! Freeze-risk scan over upcoming night periods.

use crate::types::forecast::ForecastPeriod;
use chrono::{DateTime, Utc};

/// Nighttime temperature at or below this (°F) triggers a freeze warning.
pub const FREEZE_THRESHOLD_F: f64 = 36.0;

/// How many upcoming nights the scan examines.
pub const NIGHT_LOOKAHEAD: usize = 5;

/// Outcome of a freeze-risk scan.
///
/// `Unavailable` (no forecast data) is kept distinct from `Clear` (nights
/// examined, none cold) so the presentation layer can render "forecast
/// unavailable" instead of a false "no freeze risk".
#[derive(Debug, Clone, PartialEq)]
pub enum FreezeRisk {
    /// No forecast periods to evaluate.
    Unavailable,
    /// Nights in the lookahead window were examined and all stayed above the
    /// threshold.
    Clear,
    /// The first night at or below the threshold.
    Risky(ForecastPeriod),
}

impl FreezeRisk {
    pub fn is_risky(&self) -> bool {
        matches!(self, FreezeRisk::Risky(_))
    }

    /// The triggering night period, when one exists.
    pub fn period(&self) -> Option<&ForecastPeriod> {
        match self {
            FreezeRisk::Risky(period) => Some(period),
            _ => None,
        }
    }
}

/// Scans the next [`NIGHT_LOOKAHEAD`] future night periods, in original
/// order, and reports the first one at or below [`FREEZE_THRESHOLD_F`].
///
/// This is a first-exceedance rule: the scan stops at the first qualifying
/// night, which is not necessarily the coldest one in the window.
pub fn freeze_risk(periods: &[ForecastPeriod], now: DateTime<Utc>) -> FreezeRisk {
    if periods.is_empty() {
        return FreezeRisk::Unavailable;
    }

    for period in periods
        .iter()
        .filter(|p| !p.is_daytime && p.end_time.with_timezone(&Utc) > now)
        .take(NIGHT_LOOKAHEAD)
    {
        if period.temp().as_fahrenheit() <= FREEZE_THRESHOLD_F {
            return FreezeRisk::Risky(period.clone());
        }
    }
    FreezeRisk::Clear
}
