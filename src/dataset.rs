use color_eyre::eyre::eyre;
use color_eyre::Result;
use polars::prelude::*;
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;

use crate::OpenOptions;

/// Column used to look up companies unless configured otherwise
pub const DEFAULT_KEY_COLUMN: &str = "Company";
/// Raw text the source files use for missing comparisons
pub const DEFAULT_SENTINEL: &str = "Data not available";
/// Short code the sentinel is replaced with at load time
pub const DEFAULT_SENTINEL_CODE: &str = "DNA";

/// One record of the dataset. Values are positional and line up with `Dataset::columns`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Row {
    pub values: Vec<String>,
}

impl Row {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }
}

/// Immutable, fully loaded table with a single lookup column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<String>,
    key_index: usize,
    rows: Vec<Row>,
}

impl Dataset {
    /// Build a dataset from already-parsed rows.
    ///
    /// Fails if `key_column` is not one of `columns` or a row has the wrong width.
    pub fn new(columns: Vec<String>, key_column: &str, rows: Vec<Row>) -> Result<Self> {
        let key_index = columns
            .iter()
            .position(|c| c == key_column)
            .ok_or_else(|| {
                eyre!(
                    "Dataset has no '{}' column (found: {})",
                    key_column,
                    columns.join(", ")
                )
            })?;

        if let Some((i, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.values.len() != columns.len())
        {
            return Err(eyre!(
                "Row {} has {} values, expected {}",
                i + 1,
                row.values.len(),
                columns.len()
            ));
        }

        Ok(Self {
            columns,
            key_index,
            rows,
        })
    }

    /// Load a delimited file with a header row.
    ///
    /// Every column is read as text. Cells equal to `options.sentinel` are replaced with
    /// `options.sentinel_code` before the data reaches the resolver.
    pub fn from_csv(path: &Path, options: &OpenOptions) -> Result<Self> {
        if !path.exists() {
            return Err(eyre!("Dataset file not found: {}", path.display()));
        }

        let delimiter = options.delimiter.unwrap_or_else(|| delimiter_for(path));

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .map_parse_options(|opts| opts.with_separator(delimiter))
            .try_into_reader_with_file_path(Some(path.into()))?
            .finish()
            .map_err(|e| eyre!("Failed to read dataset {}: {}", path.display(), e))?;

        let dataset = Self::from_dataframe(&df, options)?;
        tracing::info!(
            path = %path.display(),
            rows = dataset.len(),
            companies = dataset.companies().len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Convert a polars frame into rows of text
    pub fn from_dataframe(df: &DataFrame, options: &OpenOptions) -> Result<Self> {
        let columns: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();

        let mut rows: Vec<Vec<String>> = vec![Vec::with_capacity(columns.len()); df.height()];
        for column in df.get_columns() {
            for (row_index, row) in rows.iter_mut().enumerate() {
                let value = column.get(row_index)?;
                let text: Cow<str> = if matches!(value, AnyValue::Null) {
                    Cow::Borrowed("")
                } else {
                    value.str_value()
                };
                row.push(normalize_sentinel(&text, &options.sentinel, &options.sentinel_code));
            }
        }

        Self::new(
            columns,
            &options.key_column,
            rows.into_iter().map(|values| Row { values }).collect(),
        )
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn key_column(&self) -> &str {
        &self.columns[self.key_index]
    }

    pub fn key_index(&self) -> usize {
        self.key_index
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Company value of a row
    pub fn company<'a>(&self, row: &'a Row) -> &'a str {
        row.get(self.key_index).unwrap_or_default()
    }

    /// Key column values in row order, duplicates included
    pub fn canonical(&self) -> Vec<&str> {
        self.rows.iter().map(|r| self.company(r)).collect()
    }

    /// Unique company names in first-seen order
    pub fn companies(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(|r| self.company(r))
            .filter(|c| seen.insert(*c))
            .collect()
    }
}

/// Replace a cell that is exactly the sentinel text with its short code
pub fn normalize_sentinel(value: &str, sentinel: &str, code: &str) -> String {
    if value == sentinel {
        code.to_string()
    } else {
        value.to_string()
    }
}

fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        Some(ext) if ext.eq_ignore_ascii_case("psv") => b'|',
        _ => b',',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        vec!["Company".to_string(), "Q1".to_string()]
    }

    #[test]
    fn test_missing_key_column() {
        let err = Dataset::new(columns(), "Ticker", vec![]).unwrap_err();
        assert!(err.to_string().contains("'Ticker'"));
    }

    #[test]
    fn test_ragged_row_rejected() {
        let rows = vec![Row::new(["Acme Corp"])];
        assert!(Dataset::new(columns(), "Company", rows).is_err());
    }

    #[test]
    fn test_companies_unique_in_order() {
        let rows = vec![
            Row::new(["Beta Inc", "increase"]),
            Row::new(["Acme Corp", "decrease"]),
            Row::new(["Beta Inc", "unchanged"]),
        ];
        let ds = Dataset::new(columns(), "Company", rows).unwrap();
        assert_eq!(ds.companies(), vec!["Beta Inc", "Acme Corp"]);
        assert_eq!(ds.canonical(), vec!["Beta Inc", "Acme Corp", "Beta Inc"]);
        assert_eq!(ds.key_column(), "Company");
    }

    #[test]
    fn test_normalize_sentinel_exact_only() {
        assert_eq!(
            normalize_sentinel("Data not available", DEFAULT_SENTINEL, "DNA"),
            "DNA"
        );
        assert_eq!(
            normalize_sentinel("data not available", DEFAULT_SENTINEL, "DNA"),
            "data not available"
        );
        assert_eq!(normalize_sentinel("increase", DEFAULT_SENTINEL, "DNA"), "increase");
    }

    #[test]
    fn test_delimiter_for_extension() {
        assert_eq!(delimiter_for(Path::new("a.csv")), b',');
        assert_eq!(delimiter_for(Path::new("a.TSV")), b'\t');
        assert_eq!(delimiter_for(Path::new("a.psv")), b'|');
        assert_eq!(delimiter_for(Path::new("a")), b',');
    }
}
