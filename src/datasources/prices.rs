use crate::config::PricesConfig;
use crate::error::{AgriOpsError, Result};
use crate::models::CommodityPrice;
use chrono::Utc;
use serde::Deserialize;

/// Client for the commodity price endpoint. The endpoint is a plain JSON
/// feed configured per deployment; quotes are cached locally so the price
/// screen keeps working when the feed is down.
pub struct PriceClient {
    client: reqwest::Client,
    config: PricesConfig,
}

#[derive(Debug, Deserialize)]
struct PriceQuote {
    commodity: String,
    price: f64,
    currency: String,
    #[serde(default)]
    change_percent: Option<f64>,
}

impl PriceClient {
    pub fn new(config: PricesConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub async fn fetch_prices(&self) -> Result<Vec<CommodityPrice>> {
        let response = self
            .client
            .get(&self.config.url)
            .send()
            .await
            .map_err(|e| AgriOpsError::DataSourceUnavailable(format!("Price feed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AgriOpsError::DataSourceUnavailable(format!(
                "Price feed returned {}",
                response.status()
            )));
        }

        let quotes: Vec<PriceQuote> = response.json().await.map_err(|e| {
            AgriOpsError::DataSourceUnavailable(format!("Failed to parse price feed: {}", e))
        })?;

        let now = Utc::now();
        Ok(quotes
            .into_iter()
            .map(|q| CommodityPrice {
                commodity: q.commodity,
                price_per_tonne: q.price,
                currency: q.currency,
                change_percent: q.change_percent,
                updated_at: now,
            })
            .collect())
    }

    pub async fn test_connection(&self) -> Result<bool> {
        let response = self
            .client
            .get(&self.config.url)
            .send()
            .await
            .map_err(|e| AgriOpsError::DataSourceUnavailable(format!("Price feed: {}", e)))?;

        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_quote_feed() {
        let json = r#"[
            {"commodity": "Wheat", "price": 214.25, "currency": "EUR", "change_percent": -0.8},
            {"commodity": "Rapeseed", "price": 472.0, "currency": "EUR"}
        ]"#;
        let quotes: Vec<PriceQuote> = serde_json::from_str(json).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].change_percent, Some(-0.8));
        assert_eq!(quotes[1].change_percent, None);
        assert_eq!(quotes[1].price, 472.0);
    }
}
