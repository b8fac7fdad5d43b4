//! Payment-related types for the fee ledger
//!
//! This module defines how a payment names its target student, what it is
//! for, and the outcome reported back for the receipt.

use super::student::{AcademicYear, FeeComponent};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// How an operation identifies a student
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentSelector {
    /// Exact match on the name column
    Name(String),
    /// Exact match on the register number column
    RegisterNumber(String),
}

impl fmt::Display for StudentSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StudentSelector::Name(name) => write!(f, "name '{}'", name),
            StudentSelector::RegisterNumber(reg) => write!(f, "register number '{}'", reg),
        }
    }
}

/// What a payment is for, as printed on the receipt
///
/// The purpose is informational: every payment reduces the year's
/// remaining balance regardless of the component named here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentPurpose {
    Component(FeeComponent),
    #[default]
    General,
}

impl fmt::Display for PaymentPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentPurpose::Component(component) => f.write_str(component.label()),
            PaymentPurpose::General => f.write_str("General Payment"),
        }
    }
}

impl FromStr for PaymentPurpose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if normalized == "general" || normalized == "general payment" {
            return Ok(PaymentPurpose::General);
        }
        s.parse::<FeeComponent>().map(PaymentPurpose::Component)
    }
}

/// A payment against one academic year of one student
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub student: StudentSelector,
    pub year: AcademicYear,
    /// Must be non-negative
    pub amount: Decimal,
    pub purpose: PaymentPurpose,
}

/// Balances before and after a payment
///
/// This is presentation data for the receipt, it is not stored.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentOutcome {
    pub year: AcademicYear,
    pub amount: Decimal,
    pub previous_paid: Decimal,
    pub previous_remaining: Decimal,
    pub paid: Decimal,
    pub remaining: Decimal,
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::general("General Payment", PaymentPurpose::General)]
    #[case::general_short("general", PaymentPurpose::General)]
    #[case::component("hostel", PaymentPurpose::Component(FeeComponent::Hostel))]
    #[case::component_label("Exam Fees", PaymentPurpose::Component(FeeComponent::Exam))]
    fn test_purpose_parsing(#[case] input: &str, #[case] expected: PaymentPurpose) {
        assert_eq!(input.parse::<PaymentPurpose>().unwrap(), expected);
    }

    #[test]
    fn test_purpose_display() {
        assert_eq!(PaymentPurpose::General.to_string(), "General Payment");
        assert_eq!(
            PaymentPurpose::Component(FeeComponent::Tuition).to_string(),
            "Tution Fees"
        );
    }

    #[test]
    fn test_selector_display() {
        assert_eq!(
            StudentSelector::RegisterNumber("R-17".into()).to_string(),
            "register number 'R-17'"
        );
        assert_eq!(StudentSelector::Name("Alice".into()).to_string(), "name 'Alice'");
    }
}
