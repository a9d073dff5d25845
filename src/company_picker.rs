use ratatui::widgets::ListState;

/// What pressing Enter in the picker should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickAction {
    /// Toggle a canonical company name
    Toggle(String),
    /// Add the typed text as a free-form query
    AddQuery(String),
    Nothing,
}

/// Multi-select over the dataset's company names with type-to-filter
#[derive(Default)]
pub struct CompanyPicker {
    pub active: bool,
    pub filter: String,
    pub companies: Vec<String>,
    pub list_state: ListState,
}

impl CompanyPicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, companies: Vec<String>) {
        self.active = true;
        self.companies = companies;
        self.filter.clear();
        self.reset_highlight();
    }

    pub fn close(&mut self) {
        self.active = false;
        self.filter.clear();
    }

    /// Companies whose name contains the filter text, ignoring case
    pub fn filtered(&self) -> Vec<&str> {
        let needle = self.filter.to_lowercase();
        self.companies
            .iter()
            .filter(|c| c.to_lowercase().contains(&needle))
            .map(String::as_str)
            .collect()
    }

    pub fn highlighted(&self) -> Option<&str> {
        let idx = self.list_state.selected()?;
        self.filtered().get(idx).copied()
    }

    pub fn select_next(&mut self) {
        let len = self.filtered().len();
        if len == 0 {
            return;
        }
        let next = self.list_state.selected().map_or(0, |i| (i + 1).min(len - 1));
        self.list_state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        if self.filtered().is_empty() {
            return;
        }
        let prev = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.list_state.select(Some(prev));
    }

    pub fn push_char(&mut self, c: char) {
        self.filter.push(c);
        self.reset_highlight();
    }

    pub fn pop_char(&mut self) {
        self.filter.pop();
        self.reset_highlight();
    }

    pub fn clear_filter(&mut self) {
        self.filter.clear();
        self.reset_highlight();
    }

    /// Enter picks the highlighted company, or the typed text when nothing is listed
    pub fn confirm(&self) -> PickAction {
        if let Some(name) = self.highlighted() {
            return PickAction::Toggle(name.to_string());
        }
        let typed = self.filter.trim();
        if typed.is_empty() {
            PickAction::Nothing
        } else {
            PickAction::AddQuery(typed.to_string())
        }
    }

    fn reset_highlight(&mut self) {
        if self.filtered().is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picker() -> CompanyPicker {
        let mut p = CompanyPicker::new();
        p.open(vec![
            "Acme Corp".to_string(),
            "Beta Inc".to_string(),
            "Acme Holdings".to_string(),
        ]);
        p
    }

    #[test]
    fn test_open_highlights_first() {
        let p = picker();
        assert!(p.active);
        assert_eq!(p.highlighted(), Some("Acme Corp"));
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let mut p = picker();
        for c in "ACME".chars() {
            p.push_char(c);
        }
        assert_eq!(p.filtered(), vec!["Acme Corp", "Acme Holdings"]);
        p.select_next();
        assert_eq!(p.highlighted(), Some("Acme Holdings"));
        p.select_next();
        assert_eq!(p.highlighted(), Some("Acme Holdings"));
        p.select_previous();
        assert_eq!(p.highlighted(), Some("Acme Corp"));
    }

    #[test]
    fn test_confirm_free_text_when_nothing_listed() {
        let mut p = picker();
        for c in "gamma".chars() {
            p.push_char(c);
        }
        assert!(p.filtered().is_empty());
        assert_eq!(p.confirm(), PickAction::AddQuery("gamma".to_string()));
        p.pop_char();
        assert_eq!(p.filter, "gamm");
    }

    #[test]
    fn test_confirm_toggles_highlighted() {
        let p = picker();
        assert_eq!(p.confirm(), PickAction::Toggle("Acme Corp".to_string()));
    }

    #[test]
    fn test_close_clears_filter() {
        let mut p = picker();
        p.push_char('b');
        p.close();
        assert!(!p.active);
        assert!(p.filter.is_empty());
    }

    #[test]
    fn test_empty_picker() {
        let mut p = CompanyPicker::new();
        p.open(Vec::new());
        p.select_next();
        assert_eq!(p.highlighted(), None);
        assert_eq!(p.confirm(), PickAction::Nothing);
    }
}
