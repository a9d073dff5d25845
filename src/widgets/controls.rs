use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Paragraph, Widget},
};

const NORMAL_CONTROLS: [(&str, &str); 6] = [
    ("c", "Companies"),
    ("+/-", "Count"),
    ("Enter", "Run"),
    ("x", "Clear"),
    ("↑↓", "Scroll"),
    ("q", "Quit"),
];

const PICKER_CONTROLS: [(&str, &str); 4] = [
    ("Enter", "Toggle"),
    ("↑↓", "Move"),
    ("Del", "Remove last"),
    ("Esc", "Close"),
];

pub struct Controls {
    pub row_count: Option<usize>,
    pub picking: bool,
    pub dimmed: bool,
    pub bg: Color,
    pub key_fg: Color,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            row_count: None,
            picking: false,
            dimmed: false,
            bg: Color::DarkGray,
            key_fg: Color::Reset,
        }
    }
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row_count(mut self, row_count: Option<usize>) -> Self {
        self.row_count = row_count;
        self
    }

    pub fn with_picking(mut self, picking: bool) -> Self {
        self.picking = picking;
        self
    }

    pub fn with_dimmed(mut self, dimmed: bool) -> Self {
        self.dimmed = dimmed;
        self
    }

    pub fn with_colors(mut self, bg: Color, key_fg: Color) -> Self {
        self.bg = bg;
        self.key_fg = key_fg;
        self
    }

    fn controls(&self) -> &'static [(&'static str, &'static str)] {
        if self.picking {
            &PICKER_CONTROLS
        } else {
            &NORMAL_CONTROLS
        }
    }
}

impl Widget for &Controls {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let controls = self.controls();

        let mut constraints = controls.iter().fold(vec![], |mut acc, (key, action)| {
            acc.push(Constraint::Length(key.chars().count() as u16 + 2));
            acc.push(Constraint::Length(action.chars().count() as u16 + 1));
            acc
        });

        if self.row_count.is_some() {
            constraints.push(Constraint::Length(15)); // Space for "Rows: 12345"
        }
        constraints.push(Constraint::Fill(1));

        let layout = Layout::new(Direction::Horizontal, constraints).split(area);

        let base_style = if self.dimmed {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        for (i, (key, action)) in controls.iter().enumerate() {
            let j = i * 2;
            Paragraph::new(*key)
                .style(base_style.fg(self.key_fg).add_modifier(Modifier::BOLD))
                .centered()
                .render(layout[j], buf);
            Paragraph::new(*action)
                .style(base_style.bg(self.bg))
                .render(layout[j + 1], buf);
        }

        let mut fill_start_idx = controls.len() * 2;
        if let Some(count) = self.row_count {
            Paragraph::new(format!("Rows: {}", count))
                .style(base_style.bg(self.bg).fg(if self.dimmed {
                    Color::DarkGray
                } else {
                    Color::White
                }))
                .right_aligned()
                .render(layout[fill_start_idx], buf);
            fill_start_idx += 1;
        }

        Paragraph::new("")
            .style(base_style.bg(self.bg))
            .render(layout[fill_start_idx], buf);
    }
}
