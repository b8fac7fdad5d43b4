//! Transfer certificate

use super::{document_number, format_date, letterhead, rule, split_line, Document, Institution};
use crate::types::StudentProfile;
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::Write as _;

const NUMBER_PREFIX: &str = "TC";

/// Details entered by the office when issuing a certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferDetails {
    pub admission_number: String,
    pub date_of_admission: NaiveDate,
    pub date_of_leaving: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferCertificate {
    number: String,
    issue_date: NaiveDate,
    details: TransferDetails,
    student: StudentProfile,
}

impl TransferCertificate {
    /// Numbered `TC-<register number>-<timestamp>`
    pub fn new(student: &StudentProfile, details: TransferDetails, issued_at: NaiveDateTime) -> Self {
        let prefix = format!("{}-{}", NUMBER_PREFIX, student.register_number);
        TransferCertificate {
            number: document_number(&prefix, issued_at),
            issue_date: issued_at.date(),
            details,
            student: student.clone(),
        }
    }
}

impl Document for TransferCertificate {
    fn number(&self) -> &str {
        &self.number
    }

    fn render(&self, institution: &Institution) -> String {
        let student = &self.student;
        let issue_date = format_date(self.issue_date);
        let mut out = letterhead(institution, "TRANSFER CERTIFICATE", true);

        out.push_str(&split_line(
            &format!("TC No: {}", self.number),
            &format!("Admission No: {}", self.details.admission_number),
        ));
        out.push_str(&split_line(
            &format!("Date: {}", issue_date),
            &format!("Roll No: {}", student.register_number),
        ));
        out.push('\n');

        let items = [
            ("Name", student.name.clone()),
            ("Father's Name", student.father_name.clone()),
            ("Sex", student.sex.clone()),
            ("DOB", student.date_of_birth.clone()),
            ("Nationality & Religion", student.nationality_religion.clone()),
            ("Community & Subcaste", student.community.clone()),
            ("Date of Admission", format_date(self.details.date_of_admission)),
            (
                "Class and course in which the student was Admitted",
                student.department.clone(),
            ),
            (
                "Class and course studied at the time of leaving",
                student.department.clone(),
            ),
            (
                "Whether Qualified for Promotion to higher studies",
                "REFER MARKSHEET".to_string(),
            ),
            ("Date of Leaving", format_date(self.details.date_of_leaving)),
            ("Issue Date", issue_date),
            ("UMIS No", student.umis_number.clone()),
            ("EMIS No", student.emis_number.clone()),
        ];
        for (position, (label, value)) in items.iter().enumerate() {
            let _ = writeln!(out, "{:>3}. {}: {}", position + 1, label, value);
        }
        out.push('\n');

        let _ = writeln!(
            out,
            "This is to certify that {} has been a student of this institution \
             and the above details are correct.",
            student.name
        );
        out.push('\n');
        out.push_str(&split_line("", "Principal"));
        out.push_str(&rule('='));
        out.push('\n');
        out
    }
}
