use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CropType {
    Wheat,
    Barley,
    Maize,
    Rapeseed,
    Soybean,
    Sunflower,
    Potato,
    SugarBeet,
    Other,
}

impl CropType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CropType::Wheat => "Wheat",
            CropType::Barley => "Barley",
            CropType::Maize => "Maize",
            CropType::Rapeseed => "Rapeseed",
            CropType::Soybean => "Soybean",
            CropType::Sunflower => "Sunflower",
            CropType::Potato => "Potato",
            CropType::SugarBeet => "Sugar Beet",
            CropType::Other => "Other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace([' ', '-'], "").as_str() {
            "wheat" => Some(CropType::Wheat),
            "barley" => Some(CropType::Barley),
            "maize" | "corn" => Some(CropType::Maize),
            "rapeseed" | "canola" => Some(CropType::Rapeseed),
            "soybean" | "soy" => Some(CropType::Soybean),
            "sunflower" => Some(CropType::Sunflower),
            "potato" => Some(CropType::Potato),
            "sugarbeet" => Some(CropType::SugarBeet),
            "other" => Some(CropType::Other),
            _ => None,
        }
    }

    pub fn color(&self) -> ratatui::style::Color {
        use ratatui::style::Color;
        match self {
            CropType::Wheat => Color::Yellow,
            CropType::Barley => Color::LightYellow,
            CropType::Maize => Color::Green,
            CropType::Rapeseed => Color::LightGreen,
            CropType::Soybean => Color::Cyan,
            CropType::Sunflower => Color::LightYellow,
            CropType::Potato => Color::LightRed,
            CropType::SugarBeet => Color::Magenta,
            CropType::Other => Color::Gray,
        }
    }
}

impl std::fmt::Display for CropType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub id: Option<i64>,
    pub name: String,
    pub crop: CropType,
    pub area_ha: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Field {
    pub fn new(name: impl Into<String>, crop: CropType) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            name: name.into(),
            crop,
            area_ha: None,
            latitude: None,
            longitude: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_type_from_str_aliases() {
        assert_eq!(CropType::from_str("corn"), Some(CropType::Maize));
        assert_eq!(CropType::from_str("Canola"), Some(CropType::Rapeseed));
        assert_eq!(CropType::from_str("sugar beet"), Some(CropType::SugarBeet));
        assert_eq!(CropType::from_str("kudzu"), None);
    }
}
