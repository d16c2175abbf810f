use crate::models::{CommodityPrice, SprayRecommendation, SprayReminder};
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget},
};

pub struct DashboardScreen<'a> {
    pub farm_name: &'a str,
    pub location_name: &'a str,
    pub advisory: Option<&'a SprayRecommendation>,
    pub reminders: &'a [SprayReminder],
    pub prices: &'a [CommodityPrice],
    pub last_updated: Option<chrono::DateTime<chrono::Utc>>,
    pub status_message: Option<&'a str>,
}

impl<'a> DashboardScreen<'a> {
    pub fn new(
        farm_name: &'a str,
        location_name: &'a str,
        advisory: Option<&'a SprayRecommendation>,
        reminders: &'a [SprayReminder],
        prices: &'a [CommodityPrice],
    ) -> Self {
        Self {
            farm_name,
            location_name,
            advisory,
            reminders,
            prices,
            last_updated: None,
            status_message: None,
        }
    }

    pub fn with_last_updated(mut self, last_updated: Option<chrono::DateTime<chrono::Utc>>) -> Self {
        self.last_updated = last_updated;
        self
    }

    pub fn with_status(mut self, status: Option<&'a str>) -> Self {
        self.status_message = status;
        self
    }
}

impl Widget for DashboardScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Length(7), // Spray advisory
                Constraint::Min(6),    // Reminders and prices
                Constraint::Length(1), // Status message
                Constraint::Length(1), // Nav bar
            ])
            .split(area);

        self.render_header(chunks[0], buf);
        self.render_advisory(chunks[1], buf);

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);

        self.render_reminders(middle[0], buf);
        self.render_prices(middle[1], buf);

        self.render_status_message(chunks[3], buf);
        self.render_nav(chunks[4], buf);
    }
}

impl DashboardScreen<'_> {
    fn render_header(&self, area: Rect, buf: &mut Buffer) {
        let title = format!("AgriOps - {} ({})", self.farm_name, self.location_name);

        let block = Block::default()
            .title(Span::styled(title, Theme::title()))
            .borders(Borders::BOTTOM)
            .border_style(Theme::border());

        let last_updated = self
            .last_updated
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "Never".to_string());

        let info = format!("Last updated: {}", last_updated);
        let para = Paragraph::new(Span::styled(info, Theme::dim())).block(block);
        para.render(area, buf);
    }

    fn render_advisory(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled("Spray Window", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        let advisory = match self.advisory {
            Some(a) => a,
            None => {
                let para =
                    Paragraph::new(Span::styled("No forecast data - press [r]", Theme::dim()));
                para.render(inner, buf);
                return;
            }
        };

        let badge_style = Theme::badge(advisory.state.color());
        let mut lines = vec![
            Line::from(vec![
                Span::styled(format!("{} ", advisory.state.symbol()), badge_style),
                Span::styled(advisory.state.as_str(), badge_style),
            ]),
            Line::from(Span::styled(advisory.reason_text(), Theme::normal())),
            Line::from(Span::styled(
                format!(
                    "Max rain {:.0}%  Max wind {:.0} km/h",
                    advisory.max_rain_prob, advisory.max_wind_kmh
                ),
                Theme::dim(),
            )),
        ];

        match advisory.next_window {
            Some(window) => lines.push(Line::from(vec![
                Span::styled("Next safe window: ", Theme::dim()),
                Span::styled(
                    format!(
                        "{} - {} UTC",
                        window.start.format("%a %H:%M"),
                        window.end.format("%H:%M")
                    ),
                    Theme::highlight(),
                ),
                Span::styled("  [n] remind me", Theme::nav_label()),
            ])),
            None => lines.push(Line::from(Span::styled(
                "No safe window in the forecast horizon",
                Theme::warning(),
            ))),
        }

        Paragraph::new(lines).render(inner, buf);
    }

    fn render_reminders(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled("Upcoming Reminders", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        if self.reminders.is_empty() {
            let para = Paragraph::new(Span::styled("No reminders scheduled", Theme::dim()));
            para.render(inner, buf);
            return;
        }

        let items: Vec<ListItem> = self
            .reminders
            .iter()
            .take(5)
            .map(|r| {
                let line = Line::from(vec![
                    Span::styled(
                        r.window_start.format("%m/%d %H:%M").to_string(),
                        Theme::highlight(),
                    ),
                    Span::styled(
                        format!(" until {}", r.window_end.format("%H:%M")),
                        Theme::dim(),
                    ),
                ]);
                ListItem::new(line)
            })
            .collect();

        List::new(items).render(inner, buf);
    }

    fn render_prices(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(Span::styled("Crop Prices", Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let inner = block.inner(area);
        block.render(area, buf);

        if self.prices.is_empty() {
            let para = Paragraph::new(Span::styled("No price data", Theme::dim()));
            para.render(inner, buf);
            return;
        }

        let items: Vec<ListItem> = self
            .prices
            .iter()
            .take(5)
            .map(|p| {
                let trend = p.trend();
                let line = Line::from(vec![
                    Span::styled(format!("{:<10}", p.commodity), Theme::normal()),
                    Span::styled(
                        format!("{:>8.2} {}/t ", p.price_per_tonne, p.currency),
                        Theme::normal(),
                    ),
                    Span::styled(trend.as_str(), Style::default().fg(trend.color())),
                ]);
                ListItem::new(line)
            })
            .collect();

        List::new(items).render(inner, buf);
    }

    fn render_status_message(&self, area: Rect, buf: &mut Buffer) {
        if let Some(msg) = self.status_message {
            let style = if msg.contains("OFFLINE") || msg.contains("failed") {
                Theme::warning()
            } else {
                Theme::success()
            };
            let para = Paragraph::new(Span::styled(msg, style));
            para.render(area, buf);
        }
    }

    fn render_nav(&self, area: Rect, buf: &mut Buffer) {
        let nav = Line::from(vec![
            Span::styled("[1]", Theme::nav_key()),
            Span::styled("Dashboard ", Theme::nav_label()),
            Span::styled("[2]", Theme::nav_key()),
            Span::styled("Weather ", Theme::nav_label()),
            Span::styled("[3]", Theme::nav_key()),
            Span::styled("Fields ", Theme::nav_label()),
            Span::styled("[4]", Theme::nav_key()),
            Span::styled("Prices ", Theme::nav_label()),
            Span::styled("[n]", Theme::nav_key()),
            Span::styled("Remind ", Theme::nav_label()),
            Span::styled("[r]", Theme::nav_key()),
            Span::styled("Refresh ", Theme::nav_label()),
            Span::styled("[q]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);

        Paragraph::new(nav).render(area, buf);
    }
}
