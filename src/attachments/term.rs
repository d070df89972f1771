use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::error::AttachmentError;

/// Billing period of a rent call, written `YYYYMMDDHH` (e.g. `2024031512`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Term(NaiveDateTime);

impl Term {
    pub fn parse(raw: &str) -> Result<Self, AttachmentError> {
        let invalid = |reason: &str| AttachmentError::Parse {
            term: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw.len() != 10 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected ten digits formatted as YYYYMMDDHH"));
        }

        // chrono needs minutes to build a time of day
        let at = NaiveDateTime::parse_from_str(&format!("{raw}00"), "%Y%m%d%H%M")
            .map_err(|err| invalid(&err.to_string()))?;
        Ok(Self(at))
    }

    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }

    /// Two-digit month and year separated by an underscore, e.g. `03_24`.
    pub fn month_year(&self) -> String {
        self.0.format("%m_%y").to_string()
    }
}

impl FromStr for Term {
    type Err = AttachmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Term::parse(s)
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d%H"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn formats_month_and_two_digit_year() {
        let term = Term::parse("2024031512").unwrap();
        assert_eq!(term.month_year(), "03_24");
        assert_eq!(term.datetime().hour(), 12);
        assert_eq!(Term::parse("2023120100").unwrap().month_year(), "12_23");
    }

    #[test]
    fn keeps_leading_zero_of_the_century_year() {
        let term: Term = "2005010100".parse().unwrap();
        assert_eq!(term.month_year(), "01_05");
        assert_eq!(term.datetime().year(), 2005);
        assert_eq!(term.to_string(), "2005010100");
    }

    #[test]
    fn rejects_malformed_terms() {
        for raw in ["", "202403151", "20240315123", "2024-03-15", "2024031a12", " 024031512"] {
            let err = Term::parse(raw).expect_err("malformed term should fail");
            assert!(matches!(err, AttachmentError::Parse { .. }), "{raw}");
        }
    }

    #[test]
    fn rejects_impossible_dates_and_hours() {
        assert!(Term::parse("2023022900").is_err());
        assert!(Term::parse("2024130100").is_err());
        assert!(Term::parse("2024031524").is_err());
        assert!(Term::parse("2024022923").is_ok());
    }
}
