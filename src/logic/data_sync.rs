use crate::config::Config;
use crate::datasources::{OpenMeteoClient, PriceClient};
use crate::db::Database;
use crate::error::Result;
use crate::models::{CommodityPrice, WeatherForecast};
use chrono::{DateTime, Utc};

/// Age at which a cache-served forecast gets a warning attached.
const STALE_FORECAST_HOURS: i64 = 6;

/// Everything the app needs after a refresh cycle. Forecast may be `None`
/// when the provider is down and nothing is cached yet.
#[derive(Debug, Clone, Default)]
pub struct AdvisorySummary {
    pub forecast: Option<WeatherForecast>,
    pub prices: Vec<CommodityPrice>,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy)]
pub struct ConnectionStatus {
    pub weather: bool,
    /// `None` when no price feed is configured.
    pub prices: Option<bool>,
}

/// Owns the datasource clients and the cache policy: every successful fetch
/// is cached, and every failed fetch falls back to the cache with a warning.
pub struct DataSyncService {
    db: Database,
    weather_client: OpenMeteoClient,
    price_client: Option<PriceClient>,
}

impl DataSyncService {
    pub fn new(config: &Config, db: Database) -> Self {
        let weather_client = OpenMeteoClient::new(&config.farm);

        let price_client = if config.prices.enabled && !config.prices.url.is_empty() {
            Some(PriceClient::new(config.prices.clone()))
        } else {
            tracing::info!("Price feed not configured - price data will come from cache only");
            None
        };

        Self {
            db,
            weather_client,
            price_client,
        }
    }

    pub async fn refresh(&self) -> Result<AdvisorySummary> {
        let forecast = match self.weather_client.fetch_forecast().await {
            Ok(forecast) => {
                self.db.cache_forecast(&forecast)?;
                tracing::debug!(hours = forecast.hourly.len(), "Weather forecast updated");
                Some(forecast)
            }
            Err(e) => {
                tracing::warn!("Failed to fetch weather forecast: {}", e);
                let cached = self.db.cached_forecast()?;
                if let Some(ref f) = cached {
                    if f.is_stale(Utc::now(), STALE_FORECAST_HOURS) {
                        tracing::warn!(
                            fetched_at = %f.fetched_at,
                            "Serving stale cached forecast"
                        );
                    }
                }
                cached
            }
        };

        let prices = match self.price_client {
            Some(ref client) => match client.fetch_prices().await {
                Ok(prices) => {
                    self.db.cache_prices(&prices)?;
                    prices
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch commodity prices: {}", e);
                    self.db.cached_prices()?
                }
            },
            None => self.db.cached_prices()?,
        };

        Ok(AdvisorySummary {
            forecast,
            prices,
            last_updated: Some(Utc::now()),
        })
    }

    pub async fn check_connections(&self) -> ConnectionStatus {
        let weather = self
            .weather_client
            .test_connection()
            .await
            .unwrap_or(false);

        let prices = match self.price_client {
            Some(ref client) => Some(client.test_connection().await.unwrap_or(false)),
            None => None,
        };

        ConnectionStatus { weather, prices }
    }
}
