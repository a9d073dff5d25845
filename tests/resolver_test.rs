use capex::dataset::Dataset;
use capex::presenter::{CellClass, RowPresenter};
use capex::resolver::CompanyResolver;
use capex::OpenOptions;

mod common;

fn load() -> (tempfile::TempDir, Dataset) {
    let (dir, path) = common::sample_csv();
    let dataset = Dataset::from_csv(&path, &OpenOptions::default()).unwrap();
    (dir, dataset)
}

fn companies(dataset: &Dataset, queries: &[&str]) -> Vec<String> {
    let queries: Vec<String> = queries.iter().map(|q| q.to_string()).collect();
    CompanyResolver::new()
        .resolve(&queries, dataset)
        .iter()
        .map(|row| dataset.company(row).to_string())
        .collect()
}

#[test]
fn test_approximate_query_resolves() {
    let (_dir, dataset) = load();
    assert_eq!(companies(&dataset, &["acme"]), vec!["Acme Corp"]);
    assert_eq!(companies(&dataset, &["GAMMA holdings"]), vec!["Gamma Holdings"]);
}

#[test]
fn test_unmatched_query_is_skipped() {
    let (_dir, dataset) = load();
    assert!(companies(&dataset, &["Zzzznomatch"]).is_empty());
    assert_eq!(
        companies(&dataset, &["Zzzznomatch", "Delta"]),
        vec!["Delta Industries"]
    );
}

#[test]
fn test_overlapping_queries_deduplicated() {
    let (_dir, dataset) = load();
    // Both queries land on Beta Inc, whose two rows are identical
    assert_eq!(companies(&dataset, &["Beta", "Beta Inc"]), vec!["Beta Inc"]);
}

#[test]
fn test_every_row_of_matched_company_selected_once() {
    let (_dir, path) = common::write_temp_file(
        "two_rows.csv",
        "Company,Q1\nAcme Corp,Increase\nBeta Inc,Unchanged\nAcme Corp,Decrease\n",
    );
    let dataset = Dataset::from_csv(&path, &OpenOptions::default()).unwrap();

    let queries = vec!["Acme Corp".to_string(), "acme".to_string()];
    let rows = CompanyResolver::new().resolve(&queries, &dataset);
    let pairs: Vec<(&str, &str)> = rows
        .iter()
        .map(|r| (dataset.company(r), r.get(1).unwrap()))
        .collect();
    assert_eq!(
        pairs,
        vec![("Acme Corp", "Increase"), ("Acme Corp", "Decrease")]
    );
}

#[test]
fn test_query_order_is_preserved() {
    let (_dir, dataset) = load();
    assert_eq!(
        companies(&dataset, &["Delta Industries", "Acme Corp"]),
        vec!["Delta Industries", "Acme Corp"]
    );
}

#[test]
fn test_empty_queries_select_everything() {
    let (_dir, dataset) = load();
    let rows = CompanyResolver::new().resolve(&[], &dataset);
    assert_eq!(rows, dataset.rows().to_vec());
}

#[test]
fn test_resolve_is_stable() {
    let (_dir, dataset) = load();
    let queries = vec!["acme".to_string(), "beta".to_string(), "acme corp".to_string()];
    let resolver = CompanyResolver::new();
    let first = resolver.resolve(&queries, &dataset);
    let second = resolver.resolve(&queries, &dataset);
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn test_limit_applies_after_resolution() {
    let (_dir, dataset) = load();
    let queries = vec![
        "Beta Inc".to_string(),
        "Beta".to_string(),
        "Acme".to_string(),
    ];
    let rows = CompanyResolver::new().resolve(&queries, &dataset);
    let table = RowPresenter::present(&dataset, rows, 2);
    let names: Vec<&str> = table.rows.iter().map(|r| r.company.as_str()).collect();
    assert_eq!(names, vec!["Beta Inc", "Acme Corp"]);
}

#[test]
fn test_presented_cells_are_classified() {
    let (_dir, dataset) = load();
    let rows = CompanyResolver::new().resolve(&["Acme".to_string()], &dataset);
    let table = RowPresenter::present(&dataset, rows, 0);

    assert_eq!(table.columns[0], "Company");
    let classes: Vec<CellClass> = table.rows[0].cells.iter().map(|c| c.class).collect();
    assert_eq!(
        classes,
        vec![CellClass::Increase, CellClass::Decrease, CellClass::Dna]
    );
    assert_eq!(table.rows[0].cells[2].value, "DNA");
}
