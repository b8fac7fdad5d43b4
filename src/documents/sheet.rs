//! Student detail sheet
//!
//! Personal details, family/contact details, fee status for all four years
//! and a component breakdown for one selected year.
//!
//! Detail rows come from the record snapshot, so columns the ledger does not
//! model are shown in file order under the personal details.

use super::{letterhead, rule, rupees, Document, Institution};
use crate::core::fees::year_status;
use crate::io::snapshot;
use crate::types::{AcademicYear, FeeComponent, ProfileField, StudentRecord};
use std::fmt::Write as _;

const PERSONAL_FIELDS: [ProfileField; 11] = [
    ProfileField::Name,
    ProfileField::RegisterNumber,
    ProfileField::UmisNumber,
    ProfileField::EmisNumber,
    ProfileField::Batch,
    ProfileField::Department,
    ProfileField::Sex,
    ProfileField::DateOfBirth,
    ProfileField::Community,
    ProfileField::NationalityReligion,
    ProfileField::FirstGraduate,
];

const CONTACT_FIELDS: [ProfileField; 4] = [
    ProfileField::FatherName,
    ProfileField::MobileNumber,
    ProfileField::Address,
    ProfileField::AadharNumber,
];

#[derive(Debug, Clone, PartialEq)]
pub struct StudentSheet {
    record: StudentRecord,
    details: Vec<(String, String)>,
    extra_columns: Vec<String>,
    detail_year: AcademicYear,
}

impl StudentSheet {
    /// `extra_columns` are the ledger's unmodelled columns, in file order
    pub fn new(record: &StudentRecord, extra_columns: &[String], detail_year: AcademicYear) -> Self {
        StudentSheet {
            record: record.clone(),
            details: snapshot(record, extra_columns),
            extra_columns: extra_columns.to_vec(),
            detail_year,
        }
    }

    fn detail(&self, header: &str) -> &str {
        self.details
            .iter()
            .find(|(name, _)| name == header)
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }
}

impl Document for StudentSheet {
    fn number(&self) -> &str {
        self.record.register_number()
    }

    fn render(&self, institution: &Institution) -> String {
        let mut out = letterhead(institution, "STUDENT DETAILS", false);

        section(&mut out, "Personal Details");
        for field in PERSONAL_FIELDS {
            let _ = writeln!(out, "  {:<24} {}", field.column(), self.detail(field.column()));
        }
        for header in &self.extra_columns {
            let _ = writeln!(out, "  {:<24} {}", header, self.detail(header));
        }

        section(&mut out, "Family & Contact");
        for field in CONTACT_FIELDS {
            let _ = writeln!(out, "  {:<24} {}", field.column(), self.detail(field.column()));
        }

        section(&mut out, "Fee Status");
        let _ = writeln!(
            out,
            "  {:<9} {:>12} {:>12} {:>12} {:>9}  {}",
            "Year", "Total", "Paid", "Balance", "Progress", "Status"
        );
        for year in AcademicYear::ALL {
            let status = year_status(year, self.record.year(year));
            let _ = writeln!(
                out,
                "  {:<9} {:>12} {:>12} {:>12} {:>8.1}%  {}",
                year.roman_label(),
                rupees(status.total),
                rupees(status.paid),
                rupees(status.remaining),
                status.progress,
                status.status
            );
        }

        let fees = self.record.year(self.detail_year);
        section(
            &mut out,
            &format!("Fee Breakdown ({})", self.detail_year.roman_label()),
        );
        for component in FeeComponent::ALL {
            let _ = writeln!(
                out,
                "  {:<24} {:>12}",
                component.label(),
                rupees(fees.component(component))
            );
        }
        let _ = writeln!(out, "  {:<24} {:>12}", "Total", rupees(fees.total));
        let _ = writeln!(out, "  {:<24} {:>12}", "Paid", rupees(fees.paid));
        let _ = writeln!(out, "  {:<24} {:>12}", "Remaining", rupees(fees.remaining));

        out
    }
}

fn section(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&rule('-'));
    out.push('\n');
}
