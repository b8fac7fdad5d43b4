//! Payment receipt
//!
//! Built from a [`CompletedPayment`], so a receipt can only exist for a
//! payment that has already been saved.

use super::{document_number, format_date, letterhead, rule, rupees, split_line, Document, Institution};
use crate::core::CompletedPayment;
use crate::types::{AcademicYear, PaymentOutcome, PaymentPurpose};
use chrono::NaiveDateTime;
use std::fmt::Write as _;

const NUMBER_PREFIX: &str = "RCPT";

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReceipt {
    number: String,
    issued_at: NaiveDateTime,
    student_name: String,
    register_number: String,
    department: String,
    purpose: PaymentPurpose,
    outcome: PaymentOutcome,
}

impl PaymentReceipt {
    pub fn new(payment: &CompletedPayment, issued_at: NaiveDateTime) -> Self {
        let profile = &payment.student.profile;
        PaymentReceipt {
            number: document_number(NUMBER_PREFIX, issued_at),
            issued_at,
            student_name: profile.name.clone(),
            register_number: profile.register_number.clone(),
            department: profile.department.clone(),
            purpose: payment.purpose,
            outcome: payment.outcome.clone(),
        }
    }

    pub fn year(&self) -> AcademicYear {
        self.outcome.year
    }
}

impl Document for PaymentReceipt {
    fn number(&self) -> &str {
        &self.number
    }

    fn render(&self, institution: &Institution) -> String {
        let year = self.outcome.year.roman_label();
        let mut out = letterhead(institution, "FEE PAYMENT RECEIPT", false);

        out.push_str(&split_line(
            &format!("Student Name: {}", self.student_name),
            &format!("Date: {}", format_date(self.issued_at.date())),
        ));
        out.push_str(&split_line(
            &format!("Reg. No: {}", self.register_number),
            &format!("Academic Year: {}", year),
        ));
        out.push_str(&split_line(
            &format!("Department: {}", self.department),
            &format!("Receipt No: {}", self.number),
        ));
        out.push_str(&rule('-'));
        out.push('\n');

        let _ = writeln!(out, "Payment Details");
        let _ = writeln!(out, "  Fee Type:    {}", self.purpose);
        let _ = writeln!(out, "  Amount Paid: {}", rupees(self.outcome.amount));
        out.push('\n');

        let _ = writeln!(out, "Fee Summary");
        let _ = writeln!(out, "  Total Fees ({}):      {}", year, rupees(self.outcome.total));
        let _ = writeln!(out, "  Previously Paid ({}): {}", year, rupees(self.outcome.previous_paid));
        let _ = writeln!(out, "  Amount Paid Now:           {}", rupees(self.outcome.amount));
        let _ = writeln!(out, "  Paid (Now Total):          {}", rupees(self.outcome.paid));
        let _ = writeln!(out, "  Remaining Fees ({}):  {}", year, rupees(self.outcome.remaining));
        out.push('\n');

        out.push_str(&split_line("", "Signature"));
        out.push_str(&rule('-'));
        out.push('\n');
        let _ = writeln!(
            out,
            "This is a computer generated receipt and does not require a physical signature."
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FeeComponent, StudentProfile, StudentRecord};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn payment() -> CompletedPayment {
        let student = StudentRecord {
            profile: StudentProfile {
                name: "Alice".to_string(),
                register_number: "R1".to_string(),
                department: "CSE".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        CompletedPayment {
            student,
            outcome: PaymentOutcome {
                year: AcademicYear::Second,
                amount: Decimal::from(400),
                previous_paid: Decimal::from(100),
                previous_remaining: Decimal::from(900),
                paid: Decimal::from(500),
                remaining: Decimal::from(500),
                total: Decimal::from(1000),
            },
            purpose: PaymentPurpose::Component(FeeComponent::Tuition),
        }
    }

    fn issued_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_receipt_number_from_timestamp() {
        let receipt = PaymentReceipt::new(&payment(), issued_at());
        assert_eq!(receipt.number(), "RCPT-20240601103000");
        assert_eq!(receipt.year(), AcademicYear::Second);
    }

    #[test]
    fn test_receipt_lists_balances() {
        let text = PaymentReceipt::new(&payment(), issued_at()).render(&Institution::default());

        assert!(text.contains("FEE PAYMENT RECEIPT"));
        assert!(text.contains("Student Name: Alice"));
        assert!(text.contains("Reg. No: R1"));
        assert!(text.contains("Date: 01-06-2024"));
        assert!(text.contains("Academic Year: II Year"));
        assert!(text.contains("Fee Type:    Tution Fees"));
        assert!(text.contains("Previously Paid (II Year): ₹100.00"));
        assert!(text.contains("Paid (Now Total):          ₹500.00"));
        assert!(text.contains("Remaining Fees (II Year):  ₹500.00"));
        assert!(text.contains("Total Fees (II Year):      ₹1000.00"));
    }
}
