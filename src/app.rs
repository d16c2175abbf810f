use crate::config::Config;
use crate::db::Database;
use crate::error::Result;
use crate::logic::data_sync::AdvisorySummary;
use crate::logic::spray_window::{compute_spray_state, ADVISORY_HORIZON_HOURS};
use crate::models::{CropType, Field, SprayRecommendation, SprayReminder};
use chrono::Utc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Dashboard,
    Weather,
    Fields,
    Prices,
}

impl Screen {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '1' => Some(Screen::Dashboard),
            '2' => Some(Screen::Weather),
            '3' => Some(Screen::Fields),
            '4' => Some(Screen::Prices),
            _ => None,
        }
    }
}

pub struct FieldsState {
    pub selected_index: usize,
}

impl FieldsState {
    pub fn new() -> Self {
        Self { selected_index: 0 }
    }

    pub fn next(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    pub fn prev(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }
}

pub struct WeatherState {
    pub scroll: usize,
}

impl WeatherState {
    pub fn new() -> Self {
        Self { scroll: 0 }
    }

    pub fn scroll_down(&mut self, max: usize) {
        if self.scroll + 1 < max {
            self.scroll += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

pub struct App {
    pub screen: Screen,
    pub should_quit: bool,
    pub config: Config,
    pub db: Database,

    // Data
    pub summary: AdvisorySummary,
    pub advisory: Option<SprayRecommendation>,
    pub fields: Vec<Field>,
    pub reminders: Vec<SprayReminder>,

    // Screen states
    pub fields_state: FieldsState,
    pub weather_state: WeatherState,

    // UI state
    pub status_message: Option<String>,
    pub refreshing: bool,
    pub needs_refresh: bool,
}

impl App {
    pub fn new(config: Config, db: Database) -> Result<Self> {
        let fields = db.list_fields()?;
        let reminders = db.upcoming_reminders(Utc::now())?;

        Ok(Self {
            screen: Screen::Dashboard,
            should_quit: false,
            config,
            db,
            summary: AdvisorySummary::default(),
            advisory: None,
            fields,
            reminders,
            fields_state: FieldsState::new(),
            weather_state: WeatherState::new(),
            status_message: None,
            refreshing: false,
            needs_refresh: false,
        })
    }

    pub fn switch_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn set_status(&mut self, message: &str) {
        self.status_message = Some(message.to_string());
    }

    pub fn request_refresh(&mut self) {
        self.needs_refresh = true;
        self.set_status("Refreshing data...");
    }

    pub fn update_summary(&mut self, summary: AdvisorySummary) {
        self.summary = summary;
        self.evaluate_advisory();
    }

    /// Recompute the spray advisory over the near-term forecast horizon.
    pub fn evaluate_advisory(&mut self) {
        self.advisory = self.summary.forecast.as_ref().map(|forecast| {
            let horizon = forecast.next_hours(Utc::now(), ADVISORY_HORIZON_HOURS);
            compute_spray_state(&horizon)
        });
    }

    /// Save a reminder for the advisory's next safe window. A `None` window
    /// means there is nothing actionable to remind about.
    pub fn schedule_reminder(&mut self, field_id: Option<i64>) -> Result<()> {
        let window = match self.advisory.as_ref().and_then(|a| a.next_window) {
            Some(window) => window,
            None => {
                self.set_status("No safe spray window ahead - nothing to schedule");
                return Ok(());
            }
        };

        let mut reminder = SprayReminder::for_window(window.start, window.end);
        if let Some(id) = field_id {
            reminder = reminder.with_field(id);
        }
        self.db.create_reminder(&reminder)?;
        self.reload_reminders()?;
        self.set_status(&format!(
            "Reminder set for {}",
            window.start.format("%Y-%m-%d %H:%M UTC")
        ));
        Ok(())
    }

    pub fn selected_field(&self) -> Option<&Field> {
        self.fields.get(self.fields_state.selected_index)
    }

    pub fn reload_fields(&mut self) -> Result<()> {
        self.fields = self.db.list_fields()?;
        if self.fields_state.selected_index >= self.fields.len() {
            self.fields_state.selected_index = self.fields.len().saturating_sub(1);
        }
        Ok(())
    }

    pub fn reload_reminders(&mut self) -> Result<()> {
        self.reminders = self.db.upcoming_reminders(Utc::now())?;
        Ok(())
    }

    pub fn delete_selected_field(&mut self) -> Result<()> {
        if let Some(id) = self.selected_field().and_then(|f| f.id) {
            self.db.delete_field(id)?;
            self.reload_fields()?;
            self.set_status("Field deleted");
        }
        Ok(())
    }

    /// Seed one field from the config so a fresh install has something to
    /// attach reminders to.
    pub fn create_default_field(&mut self) -> Result<()> {
        let crop = self
            .config
            .farm
            .default_crop
            .as_deref()
            .and_then(CropType::from_str)
            .unwrap_or(CropType::Wheat);

        let mut field = Field::new(format!("{} main field", self.config.farm.name), crop);
        field.latitude = Some(self.config.farm.latitude);
        field.longitude = Some(self.config.farm.longitude);

        self.db.create_field(&field)?;
        self.reload_fields()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ForecastLocation, HourlyObservation, SprayState, WeatherForecast};
    use chrono::Duration;

    fn test_app() -> App {
        App::new(Config::default(), Database::open_in_memory().unwrap()).unwrap()
    }

    fn forecast_with(rain: f64, wind: f64) -> WeatherForecast {
        let now = Utc::now();
        WeatherForecast {
            fetched_at: now,
            location: ForecastLocation {
                name: "Testville".into(),
                latitude: 48.1,
                longitude: 11.5,
            },
            hourly: (0..6)
                .map(|i| HourlyObservation {
                    time: now + Duration::hours(i),
                    temp_c: Some(19.0),
                    rain_prob_percent: Some(rain),
                    wind_speed_kmh: Some(wind),
                })
                .collect(),
        }
    }

    #[test]
    fn advisory_follows_the_forecast() {
        let mut app = test_app();
        assert!(app.advisory.is_none());

        app.update_summary(AdvisorySummary {
            forecast: Some(forecast_with(55.0, 3.0)),
            prices: vec![],
            last_updated: Some(Utc::now()),
        });
        assert_eq!(app.advisory.as_ref().unwrap().state, SprayState::Dont);

        app.update_summary(AdvisorySummary {
            forecast: Some(forecast_with(5.0, 3.0)),
            prices: vec![],
            last_updated: Some(Utc::now()),
        });
        assert_eq!(app.advisory.as_ref().unwrap().state, SprayState::Good);
    }

    #[test]
    fn reminder_requires_a_window() {
        let mut app = test_app();
        app.update_summary(AdvisorySummary {
            // every hour hazardous: no safe window
            forecast: Some(forecast_with(80.0, 25.0)),
            prices: vec![],
            last_updated: Some(Utc::now()),
        });

        app.schedule_reminder(None).unwrap();
        assert!(app.reminders.is_empty());

        app.update_summary(AdvisorySummary {
            forecast: Some(forecast_with(5.0, 3.0)),
            prices: vec![],
            last_updated: Some(Utc::now()),
        });
        app.schedule_reminder(None).unwrap();
        assert_eq!(app.reminders.len(), 1);
    }

    #[test]
    fn default_field_seeded_from_config() {
        let mut app = test_app();
        assert!(app.fields.is_empty());
        app.create_default_field().unwrap();
        assert_eq!(app.fields.len(), 1);
        assert_eq!(app.fields[0].crop, CropType::Wheat);
    }
}
