//! Folds half-day forecast periods into calendar-day summaries.
//!
//! Pure and stateless: grouping is keyed on the calendar date of each
//! period's start time, and the output is capped at a 7-day view.

use crate::types::forecast::{DayForecast, ForecastPeriod};
use chrono::NaiveDate;
use std::collections::BTreeMap;

const MAX_DAYS: usize = 7;

/// Keyword-to-symbol table, checked in order against the lower-cased
/// forecast text. More specific phrases come first so "thunderstorm" wins
/// over plain "rain" and "partly cloudy" over plain "cloudy".
const ICON_TABLE: &[(&str, &str)] = &[
    ("thunderstorm", "⛈️"),
    ("blizzard", "🌨️"),
    ("snow", "🌨️"),
    ("flurr", "🌨️"),
    ("sleet", "🌨️"),
    ("freezing rain", "🌨️"),
    ("rain", "🌧️"),
    ("shower", "🌧️"),
    ("drizzle", "🌧️"),
    ("fog", "🌫️"),
    ("haze", "🌫️"),
    ("partly cloudy", "⛅"),
    ("partly sunny", "⛅"),
    ("mostly cloudy", "🌥️"),
    ("cloudy", "☁️"),
    ("overcast", "☁️"),
    ("windy", "🌬️"),
    ("breezy", "🌬️"),
    ("sunny", "☀️"),
    ("clear", "🌙"),
];
const DEFAULT_ICON: &str = "🌡️";

pub(crate) fn icon_for(short_forecast: &str) -> &'static str {
    let text = short_forecast.to_lowercase();
    ICON_TABLE
        .iter()
        .find(|(keyword, _)| text.contains(keyword))
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}

struct DayBucket<'a> {
    first: &'a ForecastPeriod,
    daytime: Option<&'a ForecastPeriod>,
    high: Option<i32>,
    low: Option<i32>,
}

/// Groups forecast periods by the calendar date of their start time.
///
/// Per day: `high` is the maximum temperature over daytime periods, `low`
/// the minimum over nighttime periods; either stays `None` when the day has
/// no periods of that kind. The icon comes from the daytime period's text
/// when available, otherwise from the first period seen for the day.
///
/// The result is sorted ascending by date and truncated to 7 entries.
pub fn group_by_day(periods: &[ForecastPeriod]) -> Vec<DayForecast> {
    let mut buckets: BTreeMap<NaiveDate, DayBucket<'_>> = BTreeMap::new();

    for period in periods {
        let date = period.start_time.date_naive();
        let bucket = buckets.entry(date).or_insert_with(|| DayBucket {
            first: period,
            daytime: None,
            high: None,
            low: None,
        });

        if period.is_daytime {
            bucket.high = Some(
                bucket
                    .high
                    .map_or(period.temperature, |h| h.max(period.temperature)),
            );
            if bucket.daytime.is_none() {
                bucket.daytime = Some(period);
            }
        } else {
            bucket.low = Some(
                bucket
                    .low
                    .map_or(period.temperature, |l| l.min(period.temperature)),
            );
        }
    }

    buckets
        .into_iter()
        .take(MAX_DAYS)
        .map(|(date, bucket)| {
            let icon_source = bucket.daytime.unwrap_or(bucket.first);
            let day_name = bucket
                .daytime
                .map(|p| p.name.clone())
                .unwrap_or_else(|| date.format("%A").to_string());
            DayForecast {
                day_name,
                date,
                high: bucket.high,
                low: bucket.low,
                icon: icon_for(&icon_source.short_forecast).to_string(),
                unit: icon_source.temperature_unit,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::forecast::TemperatureUnit;
    use chrono::{DateTime, Duration, FixedOffset};

    fn period(
        name: &str,
        start: &str,
        is_daytime: bool,
        temperature: i32,
        short_forecast: &str,
    ) -> ForecastPeriod {
        let start_time: DateTime<FixedOffset> = start.parse().unwrap();
        ForecastPeriod {
            name: name.to_string(),
            start_time,
            end_time: start_time + Duration::hours(12),
            is_daytime,
            temperature,
            temperature_unit: TemperatureUnit::Fahrenheit,
            wind_speed: None,
            wind_direction: None,
            short_forecast: short_forecast.to_string(),
            detailed_forecast: None,
        }
    }

    #[test]
    fn buckets_day_and_night_into_one_entry() {
        let periods = vec![
            period("Tuesday", "2026-03-10T06:00:00-04:00", true, 52, "Sunny"),
            period(
                "Tuesday Night",
                "2026-03-10T18:00:00-04:00",
                false,
                34,
                "Mostly Clear",
            ),
        ];

        let days = group_by_day(&periods);
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].day_name, "Tuesday");
        assert_eq!(days[0].high, Some(52));
        assert_eq!(days[0].low, Some(34));
        assert_eq!(days[0].icon, "☀️");
    }

    #[test]
    fn night_only_day_has_no_high() {
        // Forecasts fetched in the evening start with a night period.
        let periods = vec![period(
            "Tonight",
            "2026-03-10T18:00:00-04:00",
            false,
            36,
            "Partly Cloudy",
        )];

        let days = group_by_day(&periods);
        assert_eq!(days[0].high, None);
        assert_eq!(days[0].low, Some(36));
        // No daytime period: icon and name fall back to the first period seen.
        assert_eq!(days[0].icon, "⛅");
        assert_eq!(days[0].day_name, "Tuesday");
    }

    #[test]
    fn output_is_sorted_and_capped_at_seven_days() {
        let mut periods = Vec::new();
        // 10 calendar days, inserted newest first to prove sorting.
        for day in (10..20).rev() {
            periods.push(period(
                "Day",
                &format!("2026-03-{day:02}T06:00:00-04:00"),
                true,
                50 + day,
                "Sunny",
            ));
            periods.push(period(
                "Night",
                &format!("2026-03-{day:02}T18:00:00-04:00"),
                false,
                30 + day,
                "Clear",
            ));
        }

        let days = group_by_day(&periods);
        assert_eq!(days.len(), 7);
        for pair in days.windows(2) {
            assert!(pair[0].date < pair[1].date);
        }
        assert_eq!(days[0].date.to_string(), "2026-03-10");
    }

    #[test]
    fn icon_priority_prefers_specific_phrases() {
        assert_eq!(icon_for("Scattered Rain And Thunderstorms"), "⛈️");
        assert_eq!(icon_for("Light Rain"), "🌧️");
        assert_eq!(icon_for("Partly Cloudy"), "⛅");
        assert_eq!(icon_for("Cloudy"), "☁️");
        assert_eq!(icon_for("Patchy Fog"), "🌫️");
        assert_eq!(icon_for("Isolated Snow Showers"), "🌨️");
        assert_eq!(icon_for("Something Unrecognized"), "🌡️");
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(group_by_day(&[]).is_empty());
    }
}
