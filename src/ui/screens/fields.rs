use crate::models::Field;
use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Widget},
};

pub struct FieldsScreen<'a> {
    pub fields: &'a [Field],
    pub selected_index: usize,
}

impl<'a> FieldsScreen<'a> {
    pub fn new(fields: &'a [Field]) -> Self {
        Self {
            fields,
            selected_index: 0,
        }
    }

    pub fn with_selection(mut self, selected_index: usize) -> Self {
        self.selected_index = selected_index;
        self
    }
}

impl Widget for FieldsScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Header
                Constraint::Min(5),    // Field list
                Constraint::Length(1), // Nav
            ])
            .split(area);

        let block = Block::default()
            .title(Span::styled("Fields", Theme::title()))
            .borders(Borders::BOTTOM)
            .border_style(Theme::border());
        block.render(chunks[0], buf);

        self.render_list(chunks[1], buf);
        self.render_nav(chunks[2], buf);
    }
}

impl FieldsScreen<'_> {
    fn render_list(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border());
        let inner = block.inner(area);
        block.render(area, buf);

        if self.fields.is_empty() {
            Paragraph::new(Span::styled("No fields recorded", Theme::dim())).render(inner, buf);
            return;
        }

        let items: Vec<ListItem> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let crop_style = Style::default().fg(field.crop.color());
                let area_text = field
                    .area_ha
                    .map(|a| format!("{:.1} ha", a))
                    .unwrap_or_else(|| "-".into());

                let line = Line::from(vec![
                    Span::styled(format!("{:<24}", field.name), Theme::normal()),
                    Span::styled(format!("{:<12}", field.crop.as_str()), crop_style),
                    Span::styled(area_text, Theme::dim()),
                ]);

                if i == self.selected_index {
                    ListItem::new(line).style(Theme::selected())
                } else {
                    ListItem::new(line)
                }
            })
            .collect();

        List::new(items).render(inner, buf);
    }

    fn render_nav(&self, area: Rect, buf: &mut Buffer) {
        let nav = Line::from(vec![
            Span::styled("[↑/↓]", Theme::nav_key()),
            Span::styled("Select ", Theme::nav_label()),
            Span::styled("[n]", Theme::nav_key()),
            Span::styled("Remind for field ", Theme::nav_label()),
            Span::styled("[d]", Theme::nav_key()),
            Span::styled("Delete ", Theme::nav_label()),
            Span::styled("[1]", Theme::nav_key()),
            Span::styled("Dashboard ", Theme::nav_label()),
            Span::styled("[q]", Theme::nav_key()),
            Span::styled("Quit", Theme::nav_label()),
        ]);
        Paragraph::new(nav).render(area, buf);
    }
}
