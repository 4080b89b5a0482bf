//! File-backed loading and saving of case documents.

use crate::model::{RunRecord, TestCase};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Load every test case from a JSON array file.
pub fn load_cases(path: impl AsRef<Path>) -> Result<Vec<TestCase>, StoreError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let cases: Vec<TestCase> = serde_json::from_str(&raw)?;
    info!(path = %path.display(), count = cases.len(), "loaded test cases");
    Ok(cases)
}

/// Save test cases as a pretty-printed JSON array.
pub fn save_cases(path: impl AsRef<Path>, cases: &[TestCase]) -> Result<(), StoreError> {
    let path = path.as_ref();
    let raw = serde_json::to_string_pretty(cases)?;
    fs::write(path, raw)?;
    info!(path = %path.display(), count = cases.len(), "saved test cases");
    Ok(())
}

/// Save run results as a pretty-printed JSON array.
pub fn save_results(path: impl AsRef<Path>, records: &[RunRecord]) -> Result<(), StoreError> {
    let path = path.as_ref();
    let raw = serde_json::to_string_pretty(records)?;
    fs::write(path, raw)?;
    info!(path = %path.display(), count = records.len(), "saved run results");
    Ok(())
}
