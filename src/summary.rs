use chrono::{Datelike, Utc};
use indexmap::IndexMap;

use crate::models::{Grade, GradeRecord, TermGroup};

/// Groups records by (quarter, year, instructor, course) in order of first appearance.
pub fn summarize(records: &[GradeRecord]) -> Vec<TermGroup> {
    let mut groups: IndexMap<_, TermGroup> = IndexMap::new();

    for record in records {
        groups
            .entry(record.key())
            .or_insert_with_key(|key| TermGroup::new(key.clone()))
            .record(record.grade);
    }

    tracing::debug!(
        records = records.len(),
        groups = groups.len(),
        "summarized grade history"
    );

    groups.into_values().collect()
}

/// Grade counts summed across every group, in chart order.
pub fn overall_distribution(groups: &[TermGroup]) -> IndexMap<Grade, usize> {
    let mut totals: IndexMap<Grade, usize> = Grade::ALL.into_iter().map(|g| (g, 0)).collect();

    for group in groups {
        for (grade, count) in group.nonzero() {
            *totals.entry(grade).or_insert(0) += count;
        }
    }

    totals
}

pub fn cutoff_year(since_years: i32) -> i32 {
    Utc::now().year() - since_years.max(1)
}

pub fn filter_since(records: Vec<GradeRecord>, cutoff: i32) -> Vec<GradeRecord> {
    records.into_iter().filter(|r| r.year >= cutoff).collect()
}
