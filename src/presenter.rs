use crate::dataset::{Dataset, Row};

/// Display classification of a cell value.
///
/// Advisory metadata for styling; it never changes the value itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellClass {
    Increase,
    Decrease,
    Unchanged,
    Dna,
    /// No styling (the `none` tag)
    Neutral,
}

impl CellClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellClass::Increase => "increase",
            CellClass::Decrease => "decrease",
            CellClass::Unchanged => "unchanged",
            CellClass::Dna => "dna",
            CellClass::Neutral => "none",
        }
    }

    pub fn iterator() -> impl Iterator<Item = CellClass> {
        [
            CellClass::Increase,
            CellClass::Decrease,
            CellClass::Unchanged,
            CellClass::Dna,
            CellClass::Neutral,
        ]
        .iter()
        .copied()
    }
}

/// Classify a cell's text. Case-insensitive, exact match only.
pub fn classify(value: &str) -> CellClass {
    match value.trim().to_lowercase().as_str() {
        "increase" => CellClass::Increase,
        "decrease" => CellClass::Decrease,
        "unchanged" => CellClass::Unchanged,
        "dna" | "data not available" => CellClass::Dna,
        _ => CellClass::Neutral,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedCell {
    pub value: String,
    pub class: CellClass,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedRow {
    pub company: String,
    pub cells: Vec<PresentedCell>,
}

/// Table ready for rendering, indexed by company.
///
/// `columns` starts with the key column; each row's `cells` hold the remaining columns in
/// dataset order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresentedTable {
    pub columns: Vec<String>,
    pub rows: Vec<PresentedRow>,
}

impl PresentedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Plain-text rendering with space-aligned columns, one line per row
    pub fn to_text(&self) -> String {
        let lines: Vec<Vec<&str>> = std::iter::once(self.columns.iter().map(String::as_str).collect())
            .chain(self.rows.iter().map(|row| {
                std::iter::once(row.company.as_str())
                    .chain(row.cells.iter().map(|c| c.value.as_str()))
                    .collect()
            }))
            .collect();

        let mut widths = vec![0usize; self.columns.len()];
        for line in &lines {
            for (w, value) in widths.iter_mut().zip(line) {
                *w = (*w).max(value.chars().count());
            }
        }

        let mut out = String::new();
        for line in &lines {
            let padded: Vec<String> = line
                .iter()
                .zip(&widths)
                .map(|(value, w)| format!("{:<width$}", value, width = *w))
                .collect();
            out.push_str(padded.join("  ").trim_end());
            out.push('\n');
        }
        out
    }
}

pub struct RowPresenter;

impl RowPresenter {
    /// Keep at most `limit` leading rows; `0` keeps everything
    pub fn truncate(mut rows: Vec<Row>, limit: usize) -> Vec<Row> {
        if limit > 0 {
            rows.truncate(limit);
        }
        rows
    }

    /// Truncate resolved rows and attach a classification to every cell
    pub fn present(dataset: &Dataset, rows: Vec<Row>, limit: usize) -> PresentedTable {
        let key = dataset.key_index();
        let columns = std::iter::once(dataset.key_column().to_string())
            .chain(
                dataset
                    .columns()
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != key)
                    .map(|(_, c)| c.clone()),
            )
            .collect();

        let rows = Self::truncate(rows, limit)
            .into_iter()
            .map(|row| PresentedRow {
                company: dataset.company(&row).to_string(),
                cells: row
                    .values
                    .into_iter()
                    .enumerate()
                    .filter(|(i, _)| *i != key)
                    .map(|(_, value)| PresentedCell {
                        class: classify(&value),
                        value,
                    })
                    .collect(),
            })
            .collect();

        PresentedTable { columns, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(n: usize) -> Vec<Row> {
        (0..n).map(|i| Row::new([format!("c{}", i)])).collect()
    }

    #[test]
    fn test_classify_case_insensitive() {
        assert_eq!(classify("INCREASE"), CellClass::Increase);
        assert_eq!(classify("increase"), CellClass::Increase);
        assert_eq!(classify("Decrease"), CellClass::Decrease);
        assert_eq!(classify("unChanged"), CellClass::Unchanged);
        assert_eq!(classify("DNA"), CellClass::Dna);
        assert_eq!(classify("Data not available"), CellClass::Dna);
    }

    #[test]
    fn test_classify_exact_not_substring() {
        assert_eq!(classify("increased"), CellClass::Neutral);
        assert_eq!(classify("no increase"), CellClass::Neutral);
        assert_eq!(classify(""), CellClass::Neutral);
        assert_eq!(classify("12.5"), CellClass::Neutral);
    }

    #[test]
    fn test_tags() {
        let tags: Vec<_> = CellClass::iterator().map(|c| c.as_str()).collect();
        assert_eq!(tags, vec!["increase", "decrease", "unchanged", "dna", "none"]);
    }

    #[test]
    fn test_to_text_aligns_columns() {
        let table = PresentedTable {
            columns: vec!["Company".to_string(), "Q1".to_string()],
            rows: vec![PresentedRow {
                company: "Acme Corp".to_string(),
                cells: vec![PresentedCell {
                    value: "DNA".to_string(),
                    class: CellClass::Dna,
                }],
            }],
        };
        assert_eq!(table.to_text(), "Company    Q1\nAcme Corp  DNA\n");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(RowPresenter::truncate(rows(5), 0), rows(5));
        assert_eq!(RowPresenter::truncate(rows(5), 3), rows(3));
        assert_eq!(RowPresenter::truncate(rows(2), 10), rows(2));
        assert!(RowPresenter::truncate(Vec::new(), 3).is_empty());
    }
}
