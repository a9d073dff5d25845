use capex::dataset::Dataset;
use capex::session::RunState;
use capex::{App, AppEvent, InputMode, OpenOptions};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};
use std::sync::{mpsc, Arc};

mod common;

fn loaded_app() -> (tempfile::TempDir, App) {
    let (dir, path) = common::sample_csv();
    let dataset = Dataset::from_csv(&path, &OpenOptions::default()).unwrap();
    let (tx, _rx) = mpsc::channel();
    let mut app = App::new(tx);
    app.set_dataset(Some(path), Arc::new(dataset));
    (dir, app)
}

fn send(app: &mut App, event: AppEvent) {
    let mut next = app.event(&event);
    while let Some(event) = next {
        if matches!(event, AppEvent::Exit | AppEvent::Crash(_)) {
            break;
        }
        next = app.event(&event);
    }
}

fn key(app: &mut App, code: KeyCode) {
    send(app, AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)));
}

fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        key(app, KeyCode::Char(c));
    }
}

fn screen(app: &mut App) -> String {
    let area = Rect::new(0, 0, 120, 24);
    let mut buf = Buffer::empty(area);
    app.render(area, &mut buf);
    buf.content().iter().map(|c| c.symbol()).collect()
}

#[test]
fn test_app_creation() {
    let (tx, _) = mpsc::channel();
    let app = App::new(tx);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.view().is_none());
}

#[test]
fn test_full_workflow() {
    let (_dir, mut app) = loaded_app();
    assert_eq!(app.max_limit(), 4);

    // Nothing is shown before Run
    key(&mut app, KeyCode::Char('c'));
    assert_eq!(app.input_mode, InputMode::Picking);
    type_text(&mut app, "gam");
    key(&mut app, KeyCode::Enter);
    key(&mut app, KeyCode::Esc);
    assert!(app.view().is_none());
    assert!(screen(&mut app).contains("Gamma Holdings"));

    key(&mut app, KeyCode::Enter);
    assert_eq!(app.session.run_state(), RunState::Ready);
    let view = app.view().unwrap();
    assert_eq!(view.len(), 1);
    assert_eq!(view.rows[0].company, "Gamma Holdings");

    // Later changes recompute immediately
    key(&mut app, KeyCode::Char('x'));
    assert_eq!(app.view().map(|v| v.len()), Some(5));
    key(&mut app, KeyCode::Char('+'));
    key(&mut app, KeyCode::Char('+'));
    assert_eq!(app.view().map(|v| v.len()), Some(2));
}

#[test]
fn test_free_text_query_from_picker() {
    let (_dir, mut app) = loaded_app();
    key(&mut app, KeyCode::Char('c'));
    // No company name contains this text, so Enter adds it as a query
    type_text(&mut app, "akme");
    assert!(app.picker.filtered().is_empty());
    key(&mut app, KeyCode::Enter);
    assert_eq!(app.session.queries, vec!["akme".to_string()]);
    assert!(app.picker.filter.is_empty());

    key(&mut app, KeyCode::Esc);
    key(&mut app, KeyCode::Char('r'));
    let view = app.view().unwrap();
    assert_eq!(view.len(), 1);
    assert_eq!(view.rows[0].company, "Acme Corp");
}

#[test]
fn test_delete_removes_last_query() {
    let (_dir, mut app) = loaded_app();
    app.session.add_query("Acme");
    app.session.add_query("Beta");
    key(&mut app, KeyCode::Char('c'));
    key(&mut app, KeyCode::Delete);
    assert_eq!(app.session.queries, vec!["Acme".to_string()]);
}

#[test]
fn test_unmatched_selection_shows_message() {
    let (_dir, mut app) = loaded_app();
    app.session.add_query("Zzzznomatch");
    key(&mut app, KeyCode::Enter);
    assert!(app.view().unwrap().is_empty());
    assert!(screen(&mut app).contains("No matching companies"));
}

#[test]
fn test_results_screen() {
    let (_dir, mut app) = loaded_app();
    key(&mut app, KeyCode::Enter);
    let text = screen(&mut app);
    assert!(text.contains("CapEx Analyzer"));
    assert!(text.contains("Delta Industries"));
    assert!(text.contains("Note: 'DNA' - 'Data not available'"));
    assert!(text.contains("All (4)"));
}
