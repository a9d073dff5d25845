use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Row, StatefulWidget, Table, TableState},
};

use crate::config::Theme;
use crate::presenter::{CellClass, PresentedTable};

/// Renders a presented table with one color per cell classification
pub struct ResultsTable<'a> {
    table: &'a PresentedTable,
    pub header_bg: Color,
    pub header_fg: Color,
    pub border_fg: Color,
    pub table_cell_padding: u16,
    class_colors: [(CellClass, Color); 4],
}

impl<'a> ResultsTable<'a> {
    pub fn new(table: &'a PresentedTable) -> Self {
        Self {
            table,
            header_bg: Color::Indexed(236),
            header_fg: Color::White,
            border_fg: Color::Cyan,
            table_cell_padding: 2,
            class_colors: [
                (CellClass::Increase, Color::Green),
                (CellClass::Decrease, Color::Red),
                (CellClass::Unchanged, Color::Yellow),
                (CellClass::Dna, Color::Blue),
            ],
        }
    }

    /// Take header, border and classification colors from the theme
    pub fn with_theme(mut self, theme: &Theme) -> Self {
        self.header_bg = theme.get("table_header_bg");
        self.header_fg = theme.get("table_header");
        self.border_fg = theme.get("table_border");
        for (class, color) in self.class_colors.iter_mut() {
            if let Some(c) = theme.get_optional(class.as_str()) {
                *color = c;
            }
        }
        self
    }

    pub fn with_cell_padding(mut self, padding: u16) -> Self {
        self.table_cell_padding = padding;
        self
    }

    /// Style for a classified cell; unclassified cells keep the row style
    pub fn cell_style(&self, class: CellClass) -> Style {
        self.class_colors
            .iter()
            .find(|(c, _)| *c == class)
            .map(|(_, color)| Style::default().fg(*color).add_modifier(Modifier::BOLD))
            .unwrap_or_default()
    }

    /// Each column as wide as its widest value or header
    fn widths(&self) -> Vec<u16> {
        let mut widths: Vec<u16> = self
            .table
            .columns
            .iter()
            .map(|c| c.chars().count() as u16)
            .collect();
        for row in &self.table.rows {
            if let Some(w) = widths.first_mut() {
                *w = (*w).max(row.company.chars().count() as u16);
            }
            for (i, cell) in row.cells.iter().enumerate() {
                if let Some(w) = widths.get_mut(i + 1) {
                    *w = (*w).max(cell.value.chars().count() as u16);
                }
            }
        }
        widths
    }
}

impl StatefulWidget for ResultsTable<'_> {
    type State = TableState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let widths: Vec<Constraint> = self
            .widths()
            .into_iter()
            .map(Constraint::Length)
            .collect();

        let header_style = if self.header_bg == Color::Reset {
            Style::default().fg(self.header_fg)
        } else {
            Style::default().bg(self.header_bg).fg(self.header_fg)
        };

        let header = Row::new(
            self.table
                .columns
                .iter()
                .map(|c| Cell::from(Line::from(c.as_str()))),
        )
        .style(header_style.add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = self
            .table
            .rows
            .iter()
            .map(|row| {
                let company = Cell::from(row.company.as_str())
                    .style(Style::default().add_modifier(Modifier::BOLD));
                let cells = row
                    .cells
                    .iter()
                    .map(|cell| Cell::from(cell.value.as_str()).style(self.cell_style(cell.class)));
                Row::new(std::iter::once(company).chain(cells))
            })
            .collect();

        let title = format!(" {} companies ", self.table.len());
        StatefulWidget::render(
            Table::new(rows, widths)
                .column_spacing(self.table_cell_padding)
                .header(header)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(self.border_fg))
                        .title(title),
                )
                .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED)),
            area,
            buf,
            state,
        );
    }
}
