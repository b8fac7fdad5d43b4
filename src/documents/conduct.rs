//! Conduct certificate

use super::{document_number, format_date, letterhead, rule, split_line, Document, Institution};
use crate::types::StudentProfile;
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

const NUMBER_PREFIX: &str = "CC";

/// Title printed before the student's name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Honorific {
    Selvan,
    Selvi,
}

impl fmt::Display for Honorific {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Honorific::Selvan => f.write_str("Selvan"),
            Honorific::Selvi => f.write_str("Selvi"),
        }
    }
}

impl FromStr for Honorific {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "selvan" => Ok(Honorific::Selvan),
            "selvi" => Ok(Honorific::Selvi),
            other => Err(format!("unknown title '{}' (expected Selvan or Selvi)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConductDetails {
    pub honorific: Honorific,
    pub period_from: NaiveDate,
    pub period_to: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConductCertificate {
    number: String,
    issue_date: NaiveDate,
    details: ConductDetails,
    name: String,
    register_number: String,
    department: String,
}

impl ConductCertificate {
    /// Numbered `CC-<register number>-<timestamp>`
    pub fn new(student: &StudentProfile, details: ConductDetails, issued_at: NaiveDateTime) -> Self {
        let prefix = format!("{}-{}", NUMBER_PREFIX, student.register_number);
        ConductCertificate {
            number: document_number(&prefix, issued_at),
            issue_date: issued_at.date(),
            details,
            name: student.name.clone(),
            register_number: student.register_number.clone(),
            department: student.department.clone(),
        }
    }
}

impl Document for ConductCertificate {
    fn number(&self) -> &str {
        &self.number
    }

    fn render(&self, institution: &Institution) -> String {
        let mut out = letterhead(institution, "CONDUCT CERTIFICATE", false);

        out.push_str(&split_line(
            &format!("Roll No: {}", self.register_number),
            &format!("C.C. No: {}", self.number),
        ));
        out.push('\n');

        let _ = writeln!(
            out,
            "This is to certify that {} {} was a student of this college in the {} branch during {} to {}.",
            self.details.honorific,
            self.name,
            self.department,
            format_date(self.details.period_from),
            format_date(self.details.period_to),
        );
        let _ = writeln!(out, "His/Her conduct and character were found to be Good.");
        out.push('\n');

        out.push_str(&split_line(
            &format!("Date: {}", format_date(self.issue_date)),
            "Principal",
        ));
        out.push_str(&rule('='));
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case::selvan("Selvan", Honorific::Selvan)]
    #[case::selvi_lower("selvi", Honorific::Selvi)]
    fn test_honorific_parsing(#[case] input: &str, #[case] expected: Honorific) {
        assert_eq!(input.parse::<Honorific>().unwrap(), expected);
    }

    #[test]
    fn test_honorific_rejects_unknown() {
        assert!("Mr".parse::<Honorific>().is_err());
    }

    #[test]
    fn test_conduct_certificate_text() {
        let student = StudentProfile {
            name: "Kavya".to_string(),
            register_number: "9502".to_string(),
            department: "ECE".to_string(),
            ..Default::default()
        };
        let details = ConductDetails {
            honorific: Honorific::Selvi,
            period_from: date(2020, 8, 1),
            period_to: date(2024, 5, 31),
        };
        let certificate =
            ConductCertificate::new(&student, details, date(2024, 6, 3).and_hms_opt(8, 0, 0).unwrap());

        assert_eq!(certificate.number(), "CC-9502-20240603080000");

        let text = certificate.render(&Institution::default());
        assert!(text.contains("CONDUCT CERTIFICATE"));
        assert!(text.contains("Roll No: 9502"));
        assert!(text.contains(
            "This is to certify that Selvi Kavya was a student of this college in the ECE branch during 01-08-2020 to 31-05-2024."
        ));
        assert!(text.contains("found to be Good."));
        assert!(text.contains("Date: 03-06-2024"));
    }
}
