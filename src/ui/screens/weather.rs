use crate::logic::spray_window::is_good_hour;
use crate::models::WeatherForecast;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Widget},
};

pub struct WeatherScreen<'a> {
    pub forecast: Option<&'a WeatherForecast>,
    pub scroll: usize,
}

impl<'a> WeatherScreen<'a> {
    pub fn new(forecast: Option<&'a WeatherForecast>) -> Self {
        Self {
            forecast,
            scroll: 0,
        }
    }

    pub fn with_scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }
}

impl Widget for WeatherScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(5),    // Hourly table
                Constraint::Length(1), // Nav
            ])
            .split(area);

        self.render_header(chunks[0], buf);
        self.render_hours(chunks[1], buf);
        self.render_nav(chunks[2], buf);
    }
}

impl WeatherScreen<'_> {
    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let title = match self.forecast {
            Some(f) => format!(
                "Hourly Forecast - {} ({:.2}, {:.2})",
                f.location.name, f.location.latitude, f.location.longitude
            ),
            None => "Hourly Forecast".to_string(),
        };

        let block = Block::default()
            .title(Span::styled(title, Theme::title()))
            .borders(Borders::BOTTOM)
            .border_style(Theme::border());

        let fetched = self
            .forecast
            .map(|f| format!("Fetched: {}", f.fetched_at.format("%Y-%m-%d %H:%M")))
            .unwrap_or_else(|| "No data".to_string());

        Paragraph::new(Span::styled(fetched, Theme::dim()))
            .block(block)
            .render(area, buf);
    }

    fn render_hours(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border());
        let inner = block.inner(area);
        block.render(area, buf);

        let forecast = match self.forecast {
            Some(f) => f,
            None => {
                Paragraph::new(Span::styled("No forecast data - press [r]", Theme::dim()))
                    .render(inner, buf);
                return;
            }
        };

        let rows: Vec<Row> = forecast
            .hourly
            .iter()
            .skip(self.scroll)
            .take(inner.height.saturating_sub(1) as usize)
            .map(|h| {
                let spray_ok = is_good_hour(h);
                let marker_style = if spray_ok {
                    Theme::success()
                } else {
                    Theme::warning()
                };

                Row::new(vec![
                    Span::styled(h.time.format("%a %H:%M").to_string(), Theme::normal()),
                    Span::styled(
                        h.temp_c
                            .map(|t| format!("{:.1}°C", t))
                            .unwrap_or_else(|| "-".into()),
                        Theme::normal(),
                    ),
                    Span::styled(
                        h.rain_prob_percent
                            .map(|p| format!("{:.0}%", p))
                            .unwrap_or_else(|| "-".into()),
                        Theme::normal(),
                    ),
                    Span::styled(
                        h.wind_speed_kmh
                            .map(|w| format!("{:.1} km/h", w))
                            .unwrap_or_else(|| "-".into()),
                        Theme::normal(),
                    ),
                    Span::styled(if spray_ok { "spray ok" } else { "hold" }, marker_style),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Length(8),
                Constraint::Length(6),
                Constraint::Length(11),
                Constraint::Length(9),
            ],
        )
        .header(
            Row::new(vec!["Time", "Temp", "Rain", "Wind", "Status"]).style(Theme::header()),
        );

        ratatui::widgets::Widget::render(table, inner, buf);
    }

    fn render_nav(&self, area: Rect, buf: &mut Buffer) {
        let nav = Line::from(vec![
            Span::styled("[↑/↓]", Theme::nav_key()),
            Span::styled("Scroll ", Theme::nav_label()),
            Span::styled("[r]", Theme::nav_key()),
            Span::styled("Refresh ", Theme::nav_label()),
            Span::styled("[1]", Theme::nav_key()),
            Span::styled("Dashboard ", Theme::nav_label()),
            Span::styled("[q]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(area, buf);
    }
}
