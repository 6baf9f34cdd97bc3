use std::fmt;

use crate::model::{SyllabusStatus, ValidationResult};

/// Which cards to show, keyed on the syllabus verdict.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Syllabus(SyllabusStatus),
}

impl StatusFilter {
    /// Accepts `all`, the raw verdict names in any case (`in_syllabus`,
    /// `OUT-OF-SYLLABUS`, `error`) and the short forms `in` / `out`.
    pub fn parse(value: &str) -> Result<Self, String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err("filter is empty".to_string());
        }
        let canonical = trimmed.to_ascii_uppercase().replace(['-', ' '], "_");
        let status = match canonical.as_str() {
            "ALL" => return Ok(Self::All),
            "IN" | "IN_SYLLABUS" => SyllabusStatus::InSyllabus,
            "OUT" | "OUT_OF_SYLLABUS" => SyllabusStatus::OutOfSyllabus,
            "ERROR" => SyllabusStatus::Error,
            _ => {
                return Err(format!(
                    "unknown filter '{trimmed}', expected all, in_syllabus, out_of_syllabus or error"
                ))
            }
        };
        Ok(Self::Syllabus(status))
    }

    pub fn matches(&self, result: &ValidationResult) -> bool {
        match self {
            Self::All => true,
            Self::Syllabus(status) => result.syllabus_status() == Some(status),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Syllabus(status) => f.write_str(status.as_str()),
        }
    }
}

pub fn filter_results<'a>(
    results: &'a [ValidationResult],
    filter: &StatusFilter,
) -> Vec<&'a ValidationResult> {
    results.iter().filter(|r| filter.matches(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_aliases_and_case() {
        assert_eq!(StatusFilter::parse("all").unwrap(), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse("in").unwrap(),
            StatusFilter::Syllabus(SyllabusStatus::InSyllabus)
        );
        assert_eq!(
            StatusFilter::parse("out-of-syllabus").unwrap(),
            StatusFilter::Syllabus(SyllabusStatus::OutOfSyllabus)
        );
        assert_eq!(
            StatusFilter::parse(" Error ").unwrap(),
            StatusFilter::Syllabus(SyllabusStatus::Error)
        );
    }

    #[test]
    fn parse_rejects_unknown() {
        assert!(StatusFilter::parse("").is_err());
        assert!(StatusFilter::parse("maybe").is_err());
    }

    #[test]
    fn display_matches_wire_names() {
        assert_eq!(StatusFilter::All.to_string(), "all");
        assert_eq!(
            StatusFilter::parse("out").unwrap().to_string(),
            "OUT_OF_SYLLABUS"
        );
    }
}
