use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, StatefulWidget, Widget},
};

use crate::company_picker::CompanyPicker;

/// Popup listing companies; entries already chosen are checked
pub struct PickerPopup<'a> {
    selected: &'a [String],
    pub border_fg: Color,
    pub active_fg: Color,
}

impl<'a> PickerPopup<'a> {
    pub fn new(selected: &'a [String]) -> Self {
        Self {
            selected,
            border_fg: Color::Cyan,
            active_fg: Color::Yellow,
        }
    }

    pub fn with_colors(mut self, border_fg: Color, active_fg: Color) -> Self {
        self.border_fg = border_fg;
        self.active_fg = active_fg;
        self
    }
}

impl StatefulWidget for PickerPopup<'_> {
    type State = CompanyPicker;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        Clear.render(area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_fg))
            .title(" Select company names ");
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Fill(1),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(Line::from(vec![
            Span::raw("> "),
            Span::raw(state.filter.as_str()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.active_fg))
                .title("Filter"),
        )
        .render(layout[0], buf);

        let filtered = state.filtered();
        if filtered.is_empty() {
            let hint = if state.filter.trim().is_empty() {
                "No companies loaded".to_string()
            } else {
                format!("Enter: add \"{}\" as a query", state.filter.trim())
            };
            Paragraph::new(hint)
                .style(Style::default().fg(Color::DarkGray))
                .render(layout[1], buf);
        } else {
            let items: Vec<ListItem> = filtered
                .iter()
                .map(|name| {
                    let mark = if self.selected.iter().any(|s| s == name) {
                        "[x] "
                    } else {
                        "[ ] "
                    };
                    ListItem::new(format!("{}{}", mark, name))
                })
                .collect();
            let list = List::new(items)
                .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
            StatefulWidget::render(list, layout[1], buf, &mut state.list_state);
        }

        // Free-text queries that are not company names are still listed here
        let chosen = if self.selected.is_empty() {
            "Selected: none (all companies)".to_string()
        } else {
            format!("Selected: {}", self.selected.join(", "))
        };
        Paragraph::new(chosen)
            .style(Style::default().fg(self.active_fg))
            .render(layout[2], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_to_text(picker: &mut CompanyPicker, selected: &[String]) -> String {
        let area = Rect::new(0, 0, 50, 12);
        let mut buf = Buffer::empty(area);
        PickerPopup::new(selected).render(area, &mut buf, picker);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_marks_selected() {
        let mut picker = CompanyPicker::new();
        picker.open(vec!["Acme Corp".to_string(), "Beta Inc".to_string()]);
        let text = render_to_text(&mut picker, &["Beta Inc".to_string()]);
        assert!(text.contains("[ ] Acme Corp"));
        assert!(text.contains("[x] Beta Inc"));
        assert!(text.contains("Selected: Beta Inc"));
    }

    #[test]
    fn test_free_text_hint() {
        let mut picker = CompanyPicker::new();
        picker.open(vec!["Acme Corp".to_string()]);
        picker.push_char('z');
        let text = render_to_text(&mut picker, &[]);
        assert!(text.contains("add \"z\" as a query"));
    }
}
