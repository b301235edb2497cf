//! File-backed grade history sources.
//!
//! Rows carry either a `yyyyq` term code or a `quarter` and `year` pair. A row
//! whose term cannot be resolved is skipped and counted; a bad or missing grade
//! never drops a row.

use std::path::Path;

use serde::Deserialize;

use crate::error::{GradeHistoryError, Result};
use crate::models::{parse_term_code, Grade, GradeRecord, Quarter};

#[derive(Debug, Clone, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub yyyyq: Option<String>,
    #[serde(default)]
    pub quarter: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default, alias = "courseId", alias = "course")]
    pub course_id: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
}

impl RawRow {
    pub fn into_record(self) -> Result<GradeRecord> {
        let (quarter, year) = match (self.yyyyq.as_deref(), self.quarter.as_deref(), self.year) {
            (Some(code), _, _) if !code.trim().is_empty() => parse_term_code(code)?,
            (_, Some(quarter), Some(year)) => (quarter.parse::<Quarter>()?, year),
            _ => return Err(GradeHistoryError::MissingTerm),
        };

        Ok(GradeRecord {
            quarter,
            year,
            instructor: self.instructor.as_deref().unwrap_or_default().trim().to_string(),
            course_id: self.course_id.as_deref().unwrap_or_default().trim().to_string(),
            grade: Grade::parse_lenient(self.grade.as_deref()),
        })
    }
}

#[derive(Debug, Default)]
pub struct Loaded {
    pub records: Vec<GradeRecord>,
    pub skipped: usize,
}

/// Converts decoded rows, skipping any row that failed to decode or has no usable term.
pub fn convert_rows(rows: impl IntoIterator<Item = Result<RawRow>>) -> Loaded {
    let mut loaded = Loaded::default();

    for (index, row) in rows.into_iter().enumerate() {
        match row.and_then(RawRow::into_record) {
            Ok(record) => loaded.records.push(record),
            Err(err) => {
                tracing::warn!(row = index + 1, error = %err, "skipping grade history row");
                loaded.skipped += 1;
            }
        }
    }

    loaded
}

pub fn load_csv(path: &Path) -> Result<Loaded> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut rows = Vec::new();
    for result in reader.deserialize::<RawRow>() {
        match result {
            Err(err) if err.is_io_error() => return Err(err.into()),
            other => rows.push(other.map_err(GradeHistoryError::from)),
        }
    }

    let loaded = convert_rows(rows);
    tracing::info!(
        path = %path.display(),
        records = loaded.records.len(),
        skipped = loaded.skipped,
        "loaded grade history from csv"
    );
    Ok(loaded)
}

pub fn load_json(path: &Path) -> Result<Loaded> {
    let text = std::fs::read_to_string(path).map_err(|source| GradeHistoryError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let values: Vec<serde_json::Value> = serde_json::from_str(&text)?;

    let loaded = convert_rows(
        values
            .into_iter()
            .map(|value| serde_json::from_value::<RawRow>(value).map_err(GradeHistoryError::from)),
    );
    tracing::info!(
        path = %path.display(),
        records = loaded.records.len(),
        skipped = loaded.skipped,
        "loaded grade history from json"
    );
    Ok(loaded)
}
