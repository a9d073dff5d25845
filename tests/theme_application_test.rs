use capex::config::{AppConfig, Theme};
use capex::presenter::{CellClass, PresentedCell, PresentedRow, PresentedTable};
use capex::widgets::results::ResultsTable;
use capex::{App, AppEvent};
use ratatui::style::Color;
use std::sync::mpsc::channel;

#[test]
fn test_app_accepts_theme() {
    let config = AppConfig::default();
    let theme =
        Theme::from_config(&config.theme).expect("Failed to create theme from default config");

    let (tx, _rx) = channel::<AppEvent>();
    let app = App::new_with_theme(tx, theme);

    // No dataset yet, so nothing to show
    assert!(app.view().is_none());
}

#[test]
fn test_theme_has_classification_colors() {
    let config = AppConfig::default();
    let theme = Theme::from_config(&config.theme).unwrap();

    for class in CellClass::iterator().filter(|c| *c != CellClass::Neutral) {
        assert!(
            theme.get_optional(class.as_str()).is_some(),
            "no color for {}",
            class.as_str()
        );
    }
    assert!(theme.get_optional("none").is_none());
    assert_eq!(theme.get("missing"), Color::Reset);
}

#[test]
fn test_custom_colors_reach_results_table() {
    std::env::remove_var("NO_COLOR");
    let mut config = AppConfig::default();
    config.theme.colors.increase = "magenta".to_string();
    config.theme.colors.dna = "indexed(33)".to_string();
    let theme = Theme::from_config(&config.theme).unwrap();

    let table = PresentedTable {
        columns: vec!["Company".to_string(), "Q1".to_string()],
        rows: vec![PresentedRow {
            company: "Acme Corp".to_string(),
            cells: vec![PresentedCell {
                value: "Increase".to_string(),
                class: CellClass::Increase,
            }],
        }],
    };
    let widget = ResultsTable::new(&table).with_theme(&theme);
    assert_eq!(widget.cell_style(CellClass::Increase).fg, Some(Color::Magenta));
    assert_eq!(widget.cell_style(CellClass::Dna).fg, Some(Color::Indexed(33)));
    assert_eq!(widget.cell_style(CellClass::Decrease).fg, Some(Color::Red));
}
