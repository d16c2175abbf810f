use crate::config::FarmConfig;
use crate::error::{AgriOpsError, Result};
use crate::models::{ForecastLocation, HourlyObservation, WeatherForecast};
use chrono::{DateTime, Utc};
use serde::Deserialize;

const API_BASE_URL: &str = "https://api.open-meteo.com/v1";

/// Open-Meteo forecast client. No API key required; rain probability comes
/// back as a percentage and wind speed in km/h.
pub struct OpenMeteoClient {
    client: reqwest::Client,
    latitude: f64,
    longitude: f64,
    location_name: String,
}

// Open-Meteo API response structures
#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    hourly: OmHourly,
}

/// Parallel arrays, one entry per hour. Individual values may be null.
#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Vec<i64>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    precipitation_probability: Vec<Option<f64>>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
}

impl OpenMeteoClient {
    pub fn new(farm: &FarmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            latitude: farm.latitude,
            longitude: farm.longitude,
            location_name: farm.location_name.clone(),
        }
    }

    /// Fetch the hourly forecast for the configured coordinates.
    pub async fn fetch_forecast(&self) -> Result<WeatherForecast> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}\
             &hourly=temperature_2m,precipitation_probability,wind_speed_10m\
             &forecast_days=2&timeformat=unixtime&timezone=UTC",
            API_BASE_URL, self.latitude, self.longitude
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AgriOpsError::DataSourceUnavailable(format!("Open-Meteo: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AgriOpsError::DataSourceUnavailable(format!(
                "Open-Meteo returned {}: {}",
                status, body
            )));
        }

        let om_response: OmForecastResponse = response.json().await.map_err(|e| {
            AgriOpsError::DataSourceUnavailable(format!(
                "Failed to parse Open-Meteo response: {}",
                e
            ))
        })?;

        Ok(self.convert_response(om_response))
    }

    /// Cheap reachability probe for the `check` command.
    pub async fn test_connection(&self) -> Result<bool> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&hourly=temperature_2m&forecast_days=1",
            API_BASE_URL, self.latitude, self.longitude
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AgriOpsError::DataSourceUnavailable(format!("Open-Meteo: {}", e)))?;

        Ok(response.status().is_success())
    }

    fn convert_response(&self, response: OmForecastResponse) -> WeatherForecast {
        WeatherForecast {
            fetched_at: Utc::now(),
            location: ForecastLocation {
                name: self.location_name.clone(),
                latitude: self.latitude,
                longitude: self.longitude,
            },
            hourly: convert_hourly(&response.hourly),
        }
    }
}

fn convert_hourly(hourly: &OmHourly) -> Vec<HourlyObservation> {
    hourly
        .time
        .iter()
        .enumerate()
        .filter_map(|(i, &ts)| {
            let time = DateTime::<Utc>::from_timestamp(ts, 0)?;
            Some(HourlyObservation {
                time,
                temp_c: value_at(&hourly.temperature_2m, i),
                rain_prob_percent: value_at(&hourly.precipitation_probability, i),
                wind_speed_kmh: value_at(&hourly.wind_speed_10m, i),
            })
        })
        .collect()
}

fn value_at(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"{
        "latitude": 48.14,
        "longitude": 11.58,
        "hourly_units": {
            "time": "unixtime",
            "temperature_2m": "°C",
            "precipitation_probability": "%",
            "wind_speed_10m": "km/h"
        },
        "hourly": {
            "time": [1749513600, 1749517200, 1749520800],
            "temperature_2m": [17.4, 18.1, null],
            "precipitation_probability": [10, null, 55],
            "wind_speed_10m": [8.2, 13.0, 20.5]
        }
    }"#;

    #[test]
    fn parses_and_zips_parallel_arrays() {
        let response: OmForecastResponse = serde_json::from_str(SAMPLE_RESPONSE).unwrap();
        let hours = convert_hourly(&response.hourly);

        assert_eq!(hours.len(), 3);
        assert_eq!(hours[0].rain_prob_percent, Some(10.0));
        assert_eq!(hours[0].wind_speed_kmh, Some(8.2));
        assert_eq!(hours[1].rain_prob_percent, None);
        assert_eq!(hours[2].temp_c, None);
        assert_eq!(hours[2].wind_speed_kmh, Some(20.5));
        assert!(hours[0].time < hours[1].time && hours[1].time < hours[2].time);
    }

    #[test]
    fn null_probability_reads_as_zero_risk() {
        let response: OmForecastResponse = serde_json::from_str(SAMPLE_RESPONSE).unwrap();
        let hours = convert_hourly(&response.hourly);
        assert_eq!(hours[1].rain_prob(), 0.0);
    }

    #[test]
    fn tolerates_missing_series() {
        let json = r#"{"hourly": {"time": [1749513600]}}"#;
        let response: OmForecastResponse = serde_json::from_str(json).unwrap();
        let hours = convert_hourly(&response.hourly);
        assert_eq!(hours.len(), 1);
        assert_eq!(hours[0].rain_prob_percent, None);
        assert_eq!(hours[0].wind_speed_kmh, None);
    }
}
