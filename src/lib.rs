use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::{Path, PathBuf};
use std::sync::{mpsc::Sender, Arc};

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, StatefulWidget, TableState};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

pub mod cache;
pub mod cli;
pub mod company_picker;
pub mod config;
pub mod dataset;
pub mod logging;
pub mod presenter;
pub mod resolver;
pub mod session;
pub mod widgets;

pub use cache::CacheManager;
pub use cli::Args;
pub use config::{AppConfig, ColorParser, ConfigManager, Theme};
pub use dataset::{Dataset, Row};
pub use presenter::{classify, CellClass, PresentedTable, RowPresenter};
pub use resolver::{CompanyResolver, DEFAULT_CUTOFF};
pub use session::{RunState, Session};

use company_picker::{CompanyPicker, PickAction};
use widgets::controls::Controls;
use widgets::debug::DebugState;
use widgets::picker::PickerPopup;
use widgets::results::ResultsTable;

/// Application name used for config and cache directories
pub const APP_NAME: &str = "capex";

const TITLE: &str = "CapEx Analyzer";
const NOTE: &str = "Note: 'DNA' - 'Data not available'";

/// How the dataset file is read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOptions {
    pub delimiter: Option<u8>,
    pub key_column: String,
    pub sentinel: String,
    pub sentinel_code: String,
}

impl Default for OpenOptions {
    fn default() -> Self {
        let dataset = config::DatasetConfig::default();
        Self {
            delimiter: dataset.delimiter,
            key_column: dataset.key_column,
            sentinel: dataset.sentinel,
            sentinel_code: dataset.sentinel_code,
        }
    }
}

impl OpenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_key_column(mut self, key_column: impl Into<String>) -> Self {
        self.key_column = key_column.into();
        self
    }

    /// Create OpenOptions from CLI args and config, with CLI args taking precedence
    pub fn from_args_and_config(args: &cli::Args, config: &AppConfig) -> Self {
        Self {
            // Only single-byte delimiters are usable; main rejects anything else up front
            delimiter: args
                .delimiter
                .and_then(|c| u8::try_from(c).ok())
                .or(config.dataset.delimiter),
            key_column: args
                .key_column
                .clone()
                .unwrap_or_else(|| config.dataset.key_column.clone()),
            sentinel: config.dataset.sentinel.clone(),
            sentinel_code: config.dataset.sentinel_code.clone(),
        }
    }
}

impl From<&cli::Args> for OpenOptions {
    fn from(args: &cli::Args) -> Self {
        let config = AppConfig::default();
        Self::from_args_and_config(args, &config)
    }
}

pub enum AppEvent {
    Key(KeyEvent),
    Run,
    Exit,
    Crash(String),
    Resize(u16, u16), // resized (width, height)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    Picking,
}

pub struct App {
    path: Option<PathBuf>,
    dataset: Option<Arc<Dataset>>,
    company_count: usize,
    events: Sender<AppEvent>,
    resolver: CompanyResolver,
    pub session: Session,
    view: Option<PresentedTable>,
    pub table_state: TableState,
    pub input_mode: InputMode,
    pub picker: CompanyPicker,
    debug: DebugState,
    theme: Theme,
    show_note: bool,
    table_cell_padding: u16,
}

impl App {
    pub fn send_event(&mut self, event: AppEvent) -> color_eyre::Result<()> {
        self.events.send(event)?;
        Ok(())
    }

    pub fn new(events: Sender<AppEvent>) -> App {
        let theme = Theme::from_config(&AppConfig::default().theme).unwrap_or_else(|e| {
            eprintln!(
                "Warning: Failed to create default theme: {}. Using fallback.",
                e
            );
            Theme::default()
        });

        Self::new_with_config(events, theme, AppConfig::default())
    }

    pub fn new_with_theme(events: Sender<AppEvent>, theme: Theme) -> App {
        Self::new_with_config(events, theme, AppConfig::default())
    }

    pub fn new_with_config(events: Sender<AppEvent>, theme: Theme, app_config: AppConfig) -> App {
        App {
            path: None,
            dataset: None,
            company_count: 0,
            events,
            resolver: CompanyResolver::new().with_cutoff(app_config.matching.cutoff),
            session: Session::new().with_limit(app_config.display.default_limit),
            view: None,
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
            picker: CompanyPicker::new(),
            debug: DebugState::default(),
            theme,
            show_note: app_config.display.show_note,
            table_cell_padding: app_config.display.table_cell_padding,
        }
    }

    pub fn enable_debug(&mut self) {
        self.debug.enabled = true;
    }

    pub fn set_dataset(&mut self, path: Option<PathBuf>, dataset: Arc<Dataset>) {
        self.company_count = dataset.companies().len();
        self.path = path;
        self.dataset = Some(dataset);
        self.session.limit = self.session.limit.min(self.company_count);
        self.refresh();
    }

    pub fn set_session(&mut self, session: Session) {
        self.session = session;
        self.session.limit = self.session.limit.min(self.max_limit());
        self.refresh();
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Header text: the app name, then the dataset file name once one is loaded
    pub fn title(&self) -> String {
        match self.path().and_then(|p| p.file_name()) {
            Some(name) => format!("{} - {}", TITLE, name.to_string_lossy()),
            None => TITLE.to_string(),
        }
    }

    /// Largest count the user can select: the number of distinct companies
    pub fn max_limit(&self) -> usize {
        self.company_count
    }

    pub fn view(&self) -> Option<&PresentedTable> {
        self.view.as_ref()
    }

    /// Recompute the visible table from the current selections
    pub fn refresh(&mut self) {
        self.view = match &self.dataset {
            Some(dataset) => self.session.view(dataset, &self.resolver),
            None => None,
        };
        if self.view.is_some() {
            self.debug.num_recomputes += 1;
        }

        let len = self.view.as_ref().map_or(0, PresentedTable::len);
        if len == 0 {
            self.table_state.select(None);
        } else {
            let selected = self.table_state.selected().unwrap_or(0).min(len - 1);
            self.table_state.select(Some(selected));
        }
    }

    /// Get a color from the theme by name
    fn color(&self, name: &str) -> Color {
        self.theme.get(name)
    }

    fn increase_limit(&mut self) {
        self.session.limit = (self.session.limit + 1).min(self.max_limit());
    }

    fn decrease_limit(&mut self) {
        self.session.limit = self.session.limit.saturating_sub(1);
    }

    fn open_picker(&mut self) {
        let companies: Vec<String> = self
            .dataset
            .as_ref()
            .map(|d| d.companies().into_iter().map(String::from).collect())
            .unwrap_or_default();
        self.picker.open(companies);
        self.input_mode = InputMode::Picking;
    }

    fn close_picker(&mut self) {
        self.picker.close();
        self.input_mode = InputMode::Normal;
    }

    fn picker_key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        match event.code {
            KeyCode::Esc => self.close_picker(),
            KeyCode::Enter => match self.picker.confirm() {
                PickAction::Toggle(name) => self.session.toggle_query(&name),
                PickAction::AddQuery(query) => {
                    self.session.add_query(&query);
                    self.picker.clear_filter();
                }
                PickAction::Nothing => {}
            },
            KeyCode::Down => self.picker.select_next(),
            KeyCode::Up => self.picker.select_previous(),
            KeyCode::Backspace => self.picker.pop_char(),
            KeyCode::Delete => {
                self.session.queries.pop();
            }
            KeyCode::Char(c) => self.picker.push_char(c),
            _ => {}
        }
        None
    }

    fn key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        self.debug.on_key(event);

        if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppEvent::Exit);
        }

        if self.input_mode == InputMode::Picking {
            return self.picker_key(event);
        }

        match event.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Some(AppEvent::Exit),
            KeyCode::Char('c') | KeyCode::Char('/') => self.open_picker(),
            KeyCode::Enter | KeyCode::Char('r') => return Some(AppEvent::Run),
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => self.increase_limit(),
            KeyCode::Char('-') | KeyCode::Left => self.decrease_limit(),
            KeyCode::Char('0') => self.session.limit = 0,
            KeyCode::Char('x') => self.session.clear_queries(),
            KeyCode::Char('j') | KeyCode::Down => self.table_state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.table_state.select_previous(),
            KeyCode::Char('g') | KeyCode::Home => self.table_state.select_first(),
            KeyCode::Char('G') | KeyCode::End => self.table_state.select_last(),
            _ => {}
        }
        None
    }

    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        self.debug.num_events += 1;
        let next = match event {
            AppEvent::Key(key) => self.key(key),
            AppEvent::Run => {
                if self.dataset.is_none() {
                    return Some(AppEvent::Crash("No dataset loaded".to_string()));
                }
                self.session.run();
                None
            }
            AppEvent::Resize(_cols, _rows) => None,
            _ => None,
        };
        self.refresh();
        next
    }

    fn render_selection_bar(&self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Fill(4), Constraint::Fill(1)])
            .split(area);

        let border = if self.input_mode == InputMode::Picking {
            self.color("modal_border_active")
        } else {
            self.color("modal_border")
        };

        let companies = if self.session.queries.is_empty() {
            Line::from(Span::styled(
                "All companies",
                Style::default().fg(self.color("dimmed")),
            ))
        } else {
            Line::from(Span::styled(
                self.session.queries.join(", "),
                Style::default().fg(self.color("text_primary")),
            ))
        };
        Paragraph::new(companies)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border))
                    .title("Companies"),
            )
            .render(chunks[0], buf);

        let count = if self.session.limit == 0 {
            format!("All ({})", self.max_limit())
        } else {
            format!("{} of {}", self.session.limit, self.max_limit())
        };
        Paragraph::new(count)
            .style(Style::default().fg(self.color("text_primary")))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.color("modal_border")))
                    .title("Count"),
            )
            .render(chunks[1], buf);
    }

    fn render_message(&self, message: &str, color: Color, area: Rect, buf: &mut Buffer) {
        Paragraph::new(message)
            .style(Style::default().fg(color))
            .centered()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(self.color("table_border"))),
            )
            .render(area, buf);
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.debug.num_frames += 1;

        let mut constraints = vec![
            Constraint::Length(1), // Title
            Constraint::Length(3), // Selections
            Constraint::Fill(1),   // Results
        ];
        if self.show_note {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Length(1)); // Controls
        if self.debug.enabled {
            constraints.push(Constraint::Length(1));
        }
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        Paragraph::new(self.title())
            .style(
                Style::default()
                    .fg(self.color("title"))
                    .add_modifier(Modifier::BOLD),
            )
            .centered()
            .render(layout[0], buf);

        self.render_selection_bar(layout[1], buf);

        let main_area = layout[2];
        match (&self.dataset, &self.view) {
            (None, _) => self.render_message("No dataset loaded", self.color("error"), main_area, buf),
            (Some(_), None) => self.render_message(
                "Press c to choose companies, then Enter to run",
                self.color("primary"),
                main_area,
                buf,
            ),
            (Some(_), Some(view)) if view.is_empty() => self.render_message(
                "No matching companies",
                self.color("secondary"),
                main_area,
                buf,
            ),
            (Some(_), Some(view)) => {
                ResultsTable::new(view)
                    .with_theme(&self.theme)
                    .with_cell_padding(self.table_cell_padding)
                    .render(main_area, buf, &mut self.table_state);
            }
        }

        let mut next = 3;
        if self.show_note {
            Paragraph::new(NOTE)
                .style(Style::default().fg(self.color("dimmed")))
                .render(layout[next], buf);
            next += 1;
        }

        let picking = self.input_mode == InputMode::Picking;
        Controls::new()
            .with_row_count(self.view.as_ref().map(PresentedTable::len))
            .with_picking(picking)
            .with_colors(self.color("controls_bg"), self.color("primary"))
            .render(layout[next], buf);
        next += 1;

        if self.debug.enabled {
            (&self.debug).render(layout[next], buf);
        }

        if picking {
            let popup_area = centered_rect(area, 60, 70);
            PickerPopup::new(&self.session.queries)
                .with_colors(self.color("modal_border"), self.color("modal_border_active"))
                .render(popup_area, buf, &mut self.picker);
        }
    }
}

fn centered_rect(r: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
