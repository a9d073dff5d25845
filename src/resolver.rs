//! Company name resolution.
//!
//! Queries typed or picked by the user are matched against the dataset's key column with a
//! normalized Levenshtein ratio. Each query resolves to at most one canonical name, and every row
//! carrying that name is selected. Queries that resolve to nothing are skipped.

use std::collections::HashSet;

use crate::dataset::{Dataset, Row};

/// Minimum similarity a canonical name must reach to be accepted as a match.
///
/// Permissive: case, spacing and small spelling differences still resolve, while a
/// query sharing almost nothing with any name is dropped.
pub const DEFAULT_CUTOFF: f64 = 0.3;

/// Best canonical name for a query, with its score
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    pub name: &'a str,
    pub score: f64,
}

#[derive(Debug, Clone)]
pub struct CompanyResolver {
    cutoff: f64,
}

impl Default for CompanyResolver {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
        }
    }
}

impl CompanyResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = cutoff.clamp(0.0, 1.0);
        self
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Similarity in `[0, 1]` between a query and a canonical name, ignoring case and runs of
    /// whitespace
    pub fn similarity(query: &str, candidate: &str) -> f64 {
        strsim::normalized_levenshtein(&normalize(query), &normalize(candidate))
    }

    /// Closest canonical name at or above the cutoff.
    ///
    /// Ties keep the earliest candidate in `canonical` order.
    pub fn best_match<'a>(&self, query: &str, canonical: &[&'a str]) -> Option<Match<'a>> {
        let mut best: Option<Match<'a>> = None;
        for candidate in canonical {
            let score = Self::similarity(query, candidate);
            if score < self.cutoff {
                continue;
            }
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(Match {
                    name: candidate,
                    score,
                });
            }
        }
        best
    }

    /// Rows matched by `queries`, in query order, without exact duplicates.
    ///
    /// An empty query list selects the whole dataset.
    pub fn resolve(&self, queries: &[String], dataset: &Dataset) -> Vec<Row> {
        if queries.is_empty() {
            return dataset.rows().to_vec();
        }

        let canonical = dataset.canonical();
        let mut selected: Vec<&Row> = Vec::new();

        for query in queries {
            match self.best_match(query, &canonical) {
                Some(m) => {
                    tracing::debug!(query = %query, matched = m.name, score = m.score, "query resolved");
                    selected.extend(
                        dataset
                            .rows()
                            .iter()
                            .filter(|row| dataset.company(row) == m.name),
                    );
                }
                None => {
                    tracing::debug!(query = %query, cutoff = self.cutoff, "no company matched query");
                }
            }
        }

        dedup_rows(selected)
    }
}

/// Drop exact duplicate rows, keeping first occurrences
pub fn dedup_rows<'a, I>(rows: I) -> Vec<Row>
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut seen: HashSet<&Row> = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(*row))
        .cloned()
        .collect()
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
