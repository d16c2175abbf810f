use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current market quote for a commodity, as delivered by the price endpoint
/// or restored from the local cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommodityPrice {
    pub commodity: String,
    pub price_per_tonne: f64,
    pub currency: String,
    pub change_percent: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl CommodityPrice {
    pub fn trend(&self) -> PriceTrend {
        match self.change_percent {
            Some(c) if c > 0.0 => PriceTrend::Up,
            Some(c) if c < 0.0 => PriceTrend::Down,
            Some(_) => PriceTrend::Flat,
            None => PriceTrend::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceTrend {
    Up,
    Down,
    Flat,
    Unknown,
}

impl PriceTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceTrend::Up => "↑",
            PriceTrend::Down => "↓",
            PriceTrend::Flat => "→",
            PriceTrend::Unknown => "?",
        }
    }

    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            PriceTrend::Up => Color::Green,
            PriceTrend::Down => Color::Red,
            PriceTrend::Flat => Color::Gray,
            PriceTrend::Unknown => Color::DarkGray,
        }
    }
}
