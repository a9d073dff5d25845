#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Quarterly comparison data in the shape the analyzer expects
pub const SAMPLE_CSV: &str = "\
Company,Q1 2023 vs Q1 2024,Q2 2023 vs Q2 2024,Q3 2023 vs Q3 2024
Acme Corp,Increase,Decrease,Data not available
Beta Inc,Unchanged,Increase,Increase
Beta Inc,Unchanged,Increase,Increase
Gamma Holdings,Decrease,Data not available,Unchanged
Delta Industries,Increase,Increase,Decrease
";

/// Write `content` to `name` inside a fresh temporary directory.
///
/// The directory is returned too; the file is removed when it drops.
pub fn write_temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write test file");
    (dir, path)
}

pub fn sample_csv() -> (TempDir, PathBuf) {
    write_temp_file("capex.csv", SAMPLE_CSV)
}
