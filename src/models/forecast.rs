use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single hourly forecast point.
///
/// Rain probability and wind speed are optional because upstream providers
/// omit them for some hours; accessors default missing values to 0 so a
/// gap in the data never reads as a hazard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyObservation {
    pub time: DateTime<Utc>,
    pub temp_c: Option<f64>,
    pub rain_prob_percent: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
}

impl HourlyObservation {
    pub fn rain_prob(&self) -> f64 {
        self.rain_prob_percent.unwrap_or(0.0)
    }

    pub fn wind_speed(&self) -> f64 {
        self.wind_speed_kmh.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Hourly weather forecast for the configured farm location.
///
/// The hourly sequence is chronological as delivered by the provider and is
/// kept that way; consumers rely on the ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherForecast {
    pub fetched_at: DateTime<Utc>,
    pub location: ForecastLocation,
    pub hourly: Vec<HourlyObservation>,
}

impl WeatherForecast {
    /// Forecast points within the next `hours` hours of `now`.
    pub fn next_hours(&self, now: DateTime<Utc>, hours: u32) -> Vec<HourlyObservation> {
        let cutoff = now + chrono::Duration::hours(hours as i64);
        self.hourly
            .iter()
            .filter(|h| h.time >= now && h.time < cutoff)
            .cloned()
            .collect()
    }

    pub fn is_stale(&self, now: DateTime<Utc>, max_age_hours: i64) -> bool {
        now - self.fetched_at > chrono::Duration::hours(max_age_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hour_at(hour: u32) -> HourlyObservation {
        HourlyObservation {
            time: Utc.with_ymd_and_hms(2025, 6, 10, hour, 0, 0).unwrap(),
            temp_c: Some(20.0),
            rain_prob_percent: Some(10.0),
            wind_speed_kmh: Some(5.0),
        }
    }

    fn forecast(hours: Vec<HourlyObservation>) -> WeatherForecast {
        WeatherForecast {
            fetched_at: Utc.with_ymd_and_hms(2025, 6, 10, 0, 0, 0).unwrap(),
            location: ForecastLocation {
                name: "Testville".into(),
                latitude: 48.1,
                longitude: 11.5,
            },
            hourly: hours,
        }
    }

    #[test]
    fn missing_fields_read_as_zero() {
        let obs = HourlyObservation {
            time: Utc.with_ymd_and_hms(2025, 6, 10, 0, 0, 0).unwrap(),
            temp_c: None,
            rain_prob_percent: None,
            wind_speed_kmh: None,
        };
        assert_eq!(obs.rain_prob(), 0.0);
        assert_eq!(obs.wind_speed(), 0.0);
    }

    #[test]
    fn next_hours_respects_horizon() {
        let fc = forecast((0..24).map(hour_at).collect());
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 6, 0, 0).unwrap();

        let window = fc.next_hours(now, 12);
        assert_eq!(window.len(), 12);
        assert_eq!(window[0].time, now);
        assert_eq!(
            window.last().unwrap().time,
            Utc.with_ymd_and_hms(2025, 6, 10, 17, 0, 0).unwrap()
        );
    }

    #[test]
    fn next_hours_excludes_past_points() {
        let fc = forecast((0..6).map(hour_at).collect());
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 4, 0, 0).unwrap();

        let window = fc.next_hours(now, 12);
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn staleness() {
        let fc = forecast(vec![]);
        let fresh = Utc.with_ymd_and_hms(2025, 6, 10, 2, 0, 0).unwrap();
        let old = Utc.with_ymd_and_hms(2025, 6, 11, 0, 0, 0).unwrap();
        assert!(!fc.is_stale(fresh, 6));
        assert!(fc.is_stale(old, 6));
    }
}
