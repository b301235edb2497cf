use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::error::GradeHistoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Quarter {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [
        Quarter::Winter,
        Quarter::Spring,
        Quarter::Summer,
        Quarter::Fall,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Quarter::Winter => "Winter",
            Quarter::Spring => "Spring",
            Quarter::Summer => "Summer",
            Quarter::Fall => "Fall",
        }
    }

    /// Digit used in the last position of a `yyyyq` term code.
    pub fn digit(self) -> u8 {
        match self {
            Quarter::Winter => 1,
            Quarter::Spring => 2,
            Quarter::Summer => 3,
            Quarter::Fall => 4,
        }
    }

    pub fn from_digit(digit: u8) -> Option<Quarter> {
        Quarter::ALL.into_iter().find(|q| q.digit() == digit)
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Quarter {
    type Err = GradeHistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "winter" | "w" => Ok(Quarter::Winter),
            "spring" | "s" => Ok(Quarter::Spring),
            "summer" | "m" => Ok(Quarter::Summer),
            "fall" | "f" => Ok(Quarter::Fall),
            _ => Err(GradeHistoryError::UnknownQuarter(trimmed.to_string())),
        }
    }
}

impl Serialize for Quarter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Parses a five digit `yyyyq` code such as `20094` into (quarter, year).
pub fn parse_term_code(code: &str) -> Result<(Quarter, i32), GradeHistoryError> {
    let code = code.trim();
    let invalid = || GradeHistoryError::InvalidTermCode(code.to_string());

    if code.len() != 5 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let year: i32 = code[..4].parse().map_err(|_| invalid())?;
    let digit = code.as_bytes()[4] - b'0';
    let quarter = Quarter::from_digit(digit).ok_or_else(invalid)?;
    Ok((quarter, year))
}

/// Letter grades in chart order. `Other` collects anything outside the fixed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Grade {
    APlus,
    A,
    AMinus,
    BPlus,
    B,
    BMinus,
    CPlus,
    C,
    CMinus,
    DPlus,
    D,
    DMinus,
    F,
    P,
    NP,
    Other,
}

impl Grade {
    pub const ALL: [Grade; 16] = [
        Grade::APlus,
        Grade::A,
        Grade::AMinus,
        Grade::BPlus,
        Grade::B,
        Grade::BMinus,
        Grade::CPlus,
        Grade::C,
        Grade::CMinus,
        Grade::DPlus,
        Grade::D,
        Grade::DMinus,
        Grade::F,
        Grade::P,
        Grade::NP,
        Grade::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::DPlus => "D+",
            Grade::D => "D",
            Grade::DMinus => "D-",
            Grade::F => "F",
            Grade::P => "P",
            Grade::NP => "NP",
            Grade::Other => "Other",
        }
    }

    /// Lenient parse: missing or unrecognized letters land in `Other`.
    pub fn parse_lenient(raw: Option<&str>) -> Grade {
        let Some(raw) = raw else {
            return Grade::Other;
        };
        let letter = raw.trim().to_ascii_uppercase();
        Grade::ALL
            .into_iter()
            .filter(|g| *g != Grade::Other)
            .find(|g| g.as_str() == letter)
            .unwrap_or(Grade::Other)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Grade {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeRecord {
    pub quarter: Quarter,
    pub year: i32,
    pub instructor: String,
    pub course_id: String,
    pub grade: Grade,
}

impl GradeRecord {
    pub fn key(&self) -> TermKey {
        TermKey {
            quarter: self.quarter,
            year: self.year,
            instructor: self.instructor.clone(),
            course_id: self.course_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TermKey {
    pub quarter: Quarter,
    pub year: i32,
    pub instructor: String,
    pub course_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermGroup {
    pub label: String,
    pub quarter: Quarter,
    pub year: i32,
    pub instructor: String,
    pub course_id: String,
    pub counts: IndexMap<Grade, usize>,
    pub total: usize,
}

impl TermGroup {
    pub fn new(key: TermKey) -> Self {
        let label = format!("{} {} - {}", key.quarter, key.year, key.instructor);
        Self {
            label,
            quarter: key.quarter,
            year: key.year,
            instructor: key.instructor,
            course_id: key.course_id,
            counts: Grade::ALL.into_iter().map(|g| (g, 0)).collect(),
            total: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn record(&mut self, grade: Grade) {
        *self.counts.entry(grade).or_insert(0) += 1;
        self.total += 1;
    }

    pub fn count(&self, grade: Grade) -> usize {
        self.counts.get(&grade).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Grades with at least one record, in chart order.
    pub fn nonzero(&self) -> impl Iterator<Item = (Grade, usize)> + '_ {
        self.counts
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(grade, count)| (*grade, *count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn term_codes_map_last_digit_to_quarter() {
        assert_eq!(parse_term_code("20094").unwrap(), (Quarter::Fall, 2009));
        assert_eq!(parse_term_code("20101").unwrap(), (Quarter::Winter, 2010));
        assert_eq!(parse_term_code(" 20223 ").unwrap(), (Quarter::Summer, 2022));
    }

    #[test]
    fn rejects_malformed_term_codes() {
        assert!(parse_term_code("2009").is_err());
        assert!(parse_term_code("20095").is_err());
        assert!(parse_term_code("2009F").is_err());
        assert!(parse_term_code("").is_err());
    }

    #[test]
    fn quarter_names_parse_case_insensitively() {
        assert_eq!("fall".parse::<Quarter>().unwrap(), Quarter::Fall);
        assert_eq!("W".parse::<Quarter>().unwrap(), Quarter::Winter);
        assert_eq!(" Summer ".parse::<Quarter>().unwrap(), Quarter::Summer);
        assert!("autumn".parse::<Quarter>().is_err());
    }

    #[test]
    fn unknown_and_missing_grades_fall_into_other() {
        assert_eq!(Grade::parse_lenient(Some("a-")), Grade::AMinus);
        assert_eq!(Grade::parse_lenient(Some("NP")), Grade::NP);
        assert_eq!(Grade::parse_lenient(Some("W")), Grade::Other);
        assert_eq!(Grade::parse_lenient(Some("")), Grade::Other);
        assert_eq!(Grade::parse_lenient(None), Grade::Other);
        assert_eq!(Grade::parse_lenient(Some("Other")), Grade::Other);
    }

    #[test]
    fn new_group_has_label_and_zeroed_counts() {
        let group = TermGroup::new(TermKey {
            quarter: Quarter::Fall,
            year: 2009,
            instructor: "GONZALEZ T F".to_string(),
            course_id: "CMPSC 156".to_string(),
        });

        assert_eq!(group.label(), "Fall 2009 - GONZALEZ T F");
        assert_eq!(group.counts.len(), Grade::ALL.len());
        assert!(group.counts.values().all(|c| *c == 0));
        assert_eq!(group.total(), 0);
        assert_eq!(group.nonzero().count(), 0);
    }
}
