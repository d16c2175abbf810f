use crate::error::{AgriOpsError, Result};
use serde::Deserialize;

const API_BASE_URL: &str = "https://geocoding-api.open-meteo.com/v1";

/// Open-Meteo geocoding client, used by `agriops locate` to resolve a place
/// name to coordinates for the config file.
pub struct GeocodingClient {
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct GeoSearchResponse {
    #[serde(default)]
    results: Vec<GeoResult>,
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    name: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    admin1: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeoMatch {
    pub name: String,
    pub region: Option<String>,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoMatch {
    pub fn describe(&self) -> String {
        let mut parts = vec![self.name.clone()];
        if let Some(ref region) = self.region {
            parts.push(region.clone());
        }
        if let Some(ref country) = self.country {
            parts.push(country.clone());
        }
        format!(
            "{} ({:.4}, {:.4})",
            parts.join(", "),
            self.latitude,
            self.longitude
        )
    }
}

impl GeocodingClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Search for a place by name, returning up to `count` candidates.
    pub async fn search(&self, query: &str, count: u8) -> Result<Vec<GeoMatch>> {
        let url = format!(
            "{}/search?name={}&count={}&language=en&format=json",
            API_BASE_URL,
            urlencode(query),
            count
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AgriOpsError::DataSourceUnavailable(format!("Geocoding: {}", e)))?;

        if !response.status().is_success() {
            return Err(AgriOpsError::DataSourceUnavailable(format!(
                "Geocoding returned {}",
                response.status()
            )));
        }

        let search: GeoSearchResponse = response.json().await.map_err(|e| {
            AgriOpsError::DataSourceUnavailable(format!("Failed to parse geocoding response: {}", e))
        })?;

        Ok(search
            .results
            .into_iter()
            .map(|r| GeoMatch {
                name: r.name,
                region: r.admin1,
                country: r.country,
                latitude: r.latitude,
                longitude: r.longitude,
            })
            .collect())
    }
}

impl Default for GeocodingClient {
    fn default() -> Self {
        Self::new()
    }
}

fn urlencode(s: &str) -> String {
    s.chars()
        .flat_map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~') {
                vec![c.to_string()]
            } else {
                c.to_string()
                    .bytes()
                    .map(|b| format!("%{:02X}", b))
                    .collect()
            }
        })
        .collect()
}
