use std::fmt::Write;

use crate::models::{Grade, TermGroup};
use crate::summary;

pub fn build_report(course: Option<&str>, groups: &[TermGroup], skipped: usize) -> String {
    let mut output = String::new();
    let course_label = course.unwrap_or("all courses");
    let record_count: usize = groups.iter().map(|g| g.total()).sum();

    let _ = writeln!(output, "# Grade History Report");
    let _ = writeln!(
        output,
        "Generated for {} ({} grades across {} terms)",
        course_label,
        record_count,
        groups.len()
    );
    if skipped > 0 {
        let _ = writeln!(output, "Skipped {skipped} rows without a usable term.");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Overall Distribution");

    if groups.is_empty() {
        let _ = writeln!(output, "No grade history recorded.");
        return output;
    }

    for (grade, count) in summary::overall_distribution(groups)
        .into_iter()
        .filter(|(_, count)| *count > 0)
    {
        let share = count as f64 * 100.0 / record_count as f64;
        let _ = writeln!(output, "- {}: {} ({:.1}%)", grade, count, share);
    }

    for group in groups {
        let _ = writeln!(output);
        let _ = writeln!(output, "## {}", group.label());
        let _ = writeln!(output, "Course {}", group.course_id);
        for grade in Grade::ALL {
            let count = group.count(grade);
            if count > 0 {
                let _ = writeln!(output, "- {}: {}", grade, count);
            }
        }
        let _ = writeln!(output, "Total: {}", group.total());
    }

    output
}
