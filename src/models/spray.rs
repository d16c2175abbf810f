use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SprayState {
    Good,
    Caution,
    Dont,
}

impl SprayState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SprayState::Good => "Good to spray",
            SprayState::Caution => "Spray with caution",
            SprayState::Dont => "Do not spray",
        }
    }

    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            SprayState::Good => Color::Green,
            SprayState::Caution => Color::Yellow,
            SprayState::Dont => Color::Red,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            SprayState::Good => "✓",
            SprayState::Caution => "!",
            SprayState::Dont => "✗",
        }
    }
}

impl std::fmt::Display for SprayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why the advisory landed where it did. `Rain` and `Wind` distinguish which
/// hazard forced a `Dont`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SprayReason {
    Good,
    Caution,
    Rain,
    Wind,
}

/// First contiguous run of spray-safe hours in the forecast horizon.
/// Start and end are the times of the run's first and last hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SprayWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Advisory computed over a forecast horizon. Plain value, recomputed on
/// every refresh; the caller owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprayRecommendation {
    pub state: SprayState,
    pub reason: SprayReason,
    pub max_rain_prob: f64,
    pub max_wind_kmh: f64,
    pub next_window: Option<SprayWindow>,
}

impl SprayRecommendation {
    /// One-line explanation for display next to the badge.
    pub fn reason_text(&self) -> String {
        match self.reason {
            SprayReason::Good => "Low rain risk and calm winds over the horizon".to_string(),
            SprayReason::Caution => format!(
                "Marginal conditions: rain up to {:.0}%, wind up to {:.0} km/h",
                self.max_rain_prob, self.max_wind_kmh
            ),
            SprayReason::Rain => format!(
                "Rain probability reaches {:.0}% within the horizon",
                self.max_rain_prob
            ),
            SprayReason::Wind => format!(
                "Wind reaches {:.0} km/h, drift risk too high",
                self.max_wind_kmh
            ),
        }
    }
}
