use crate::models::CommodityPrice;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, Widget},
};

pub struct PricesScreen<'a> {
    pub prices: &'a [CommodityPrice],
}

impl<'a> PricesScreen<'a> {
    pub fn new(prices: &'a [CommodityPrice]) -> Self {
        Self { prices }
    }
}

impl Widget for PricesScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(5),    // Price table
                Constraint::Length(1), // Nav
            ])
            .split(area);

        let block = Block::default()
            .title(Span::styled("Crop Prices", Theme::title()))
            .borders(Borders::BOTTOM)
            .border_style(Theme::border());
        block.render(chunks[0], buf);

        self.render_table(chunks[1], buf);
        self.render_nav(chunks[2], buf);
    }
}

impl PricesScreen<'_> {
    fn render_table(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border());
        let inner = block.inner(area);
        block.render(area, buf);

        if self.prices.is_empty() {
            Paragraph::new(Span::styled(
                "No price data - configure a price feed or press [r]",
                Theme::dim(),
            ))
            .render(inner, buf);
            return;
        }

        let rows: Vec<Row> = self
            .prices
            .iter()
            .map(|p| {
                let trend = p.trend();
                let change_text = p
                    .change_percent
                    .map(|c| format!("{:+.1}%", c))
                    .unwrap_or_else(|| "-".into());

                Row::new(vec![
                    Span::styled(p.commodity.clone(), Theme::normal()),
                    Span::styled(
                        format!("{:.2} {}/t", p.price_per_tonne, p.currency),
                        Theme::normal(),
                    ),
                    Span::styled(
                        format!("{} {}", trend.as_str(), change_text),
                        ratatui::style::Style::default().fg(trend.color()),
                    ),
                    Span::styled(
                        p.updated_at.format("%Y-%m-%d %H:%M").to_string(),
                        Theme::dim(),
                    ),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(14),
                Constraint::Length(14),
                Constraint::Length(10),
                Constraint::Length(17),
            ],
        )
        .header(Row::new(vec!["Commodity", "Price", "Change", "Updated"]).style(Theme::header()));

        ratatui::widgets::Widget::render(table, inner, buf);
    }

    fn render_nav(&self, area: Rect, buf: &mut Buffer) {
        let nav = Line::from(vec![
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
