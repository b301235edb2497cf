use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::error::Result;
use crate::source::{convert_rows, Loaded, RawRow};

pub async fn fetch_grade_history(
    pool: &PgPool,
    course: &str,
    instructor: Option<&str>,
) -> Result<Loaded> {
    let mut query = String::from(
        "SELECT yyyyq, course, instructor, grade \
         FROM grade_history \
         WHERE course = $1",
    );

    if instructor.is_some() {
        query.push_str(" AND instructor = $2");
    }
    query.push_str(" ORDER BY yyyyq");

    let mut rows = sqlx::query(&query).bind(course);

    if let Some(value) = instructor {
        rows = rows.bind(value);
    }

    let records = rows.fetch_all(pool).await?;
    tracing::debug!(course, rows = records.len(), "fetched grade history rows");

    let raw: Vec<Result<RawRow>> = records.iter().map(decode_row).collect();
    Ok(convert_rows(raw))
}

fn decode_row(row: &PgRow) -> Result<RawRow> {
    Ok(RawRow {
        yyyyq: row.try_get("yyyyq")?,
        quarter: None,
        year: None,
        instructor: row.try_get("instructor")?,
        course_id: row.try_get("course")?,
        grade: row.try_get("grade")?,
    })
}
