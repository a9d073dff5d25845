use crate::dataset::Dataset;
use crate::presenter::{PresentedTable, RowPresenter};
use crate::resolver::CompanyResolver;

/// Whether the user has asked for results yet. Once `Ready`, stays `Ready`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    Ready,
}

impl RunState {
    pub fn trigger(&mut self) {
        *self = RunState::Ready;
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, RunState::Ready)
    }
}

/// Selections and run flag of one user session
#[derive(Debug, Default, Clone)]
pub struct Session {
    pub queries: Vec<String>,
    pub limit: usize,
    run_state: RunState,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_queries(mut self, queries: Vec<String>) -> Self {
        self.queries = queries;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn run(&mut self) {
        if !self.run_state.is_ready() {
            tracing::info!(queries = self.queries.len(), limit = self.limit, "run triggered");
        }
        self.run_state.trigger();
    }

    /// Add a query unless an identical one is already selected. Returns true if added.
    pub fn add_query(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() || self.queries.iter().any(|q| q == query) {
            return false;
        }
        self.queries.push(query.to_string());
        true
    }

    pub fn remove_query(&mut self, query: &str) -> bool {
        let before = self.queries.len();
        self.queries.retain(|q| q != query);
        self.queries.len() != before
    }

    /// Add the query if absent, remove it if present
    pub fn toggle_query(&mut self, query: &str) {
        if !self.remove_query(query) {
            self.add_query(query);
        }
    }

    pub fn clear_queries(&mut self) {
        self.queries.clear();
    }

    /// Recompute the visible table from scratch. `None` until the session has been run.
    pub fn view(&self, dataset: &Dataset, resolver: &CompanyResolver) -> Option<PresentedTable> {
        if !self.run_state.is_ready() {
            return None;
        }
        let rows = resolver.resolve(&self.queries, dataset);
        Some(RowPresenter::present(dataset, rows, self.limit))
    }
}
