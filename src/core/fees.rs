//! Fee arithmetic
//!
//! The only business rules of the ledger live here:
//! - totals are the sum of the nine components, computed once at creation
//! - at creation `remaining = total - paid`, without clamping
//! - a payment adds to `paid` and reduces `remaining`, clamped at zero
//!   (overpayment is not tracked as credit)
//!
//! All arithmetic is checked; an overflow leaves the fees untouched.

use crate::types::{AcademicYear, LedgerError, PaymentOutcome, YearFeeInput, YearFees};
use rust_decimal::Decimal;
use std::fmt;

/// Smallest unit the ledger stores: paise
pub const AMOUNT_SCALE: u32 = 2;

/// Reject negative amounts and amounts finer than a paisa
fn check_amount(amount: Decimal, what: &str) -> Result<(), LedgerError> {
    if amount < Decimal::ZERO {
        return Err(LedgerError::invalid_amount(
            amount,
            &format!("{} must not be negative", what),
        ));
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(LedgerError::invalid_amount(
            amount,
            &format!("{} must not have more than two decimal places", what),
        ));
    }
    Ok(())
}

/// Build the stored fees of a year from add-student input
///
/// # Errors
///
/// Returns an error if any component or the initial paid amount is negative
/// or finer than a paisa, or if the sum overflows.
pub fn year_fees_from_input(input: &YearFeeInput, student: &str) -> Result<YearFees, LedgerError> {
    for amount in &input.components {
        check_amount(*amount, "fee components")?;
    }
    check_amount(input.paid, "paid amount")?;

    let mut fees = YearFees {
        components: input.components,
        paid: input.paid,
        ..Default::default()
    };

    fees.total = fees
        .component_sum()
        .ok_or_else(|| LedgerError::arithmetic_overflow("fee total", student))?;

    // No clamping here: an initial overpayment shows as a negative balance
    fees.remaining = fees
        .total
        .checked_sub(fees.paid)
        .ok_or_else(|| LedgerError::arithmetic_overflow("remaining fees", student))?;

    Ok(fees)
}

/// Apply a payment to one year's fees
///
/// # Errors
///
/// Returns an error if the amount is negative or finer than a paisa, or if
/// the new paid amount would overflow. The fees are unchanged on error.
pub fn apply_payment(
    fees: &mut YearFees,
    year: AcademicYear,
    amount: Decimal,
    student: &str,
) -> Result<PaymentOutcome, LedgerError> {
    check_amount(amount, "payment")?;

    let previous_paid = fees.paid;
    let previous_remaining = fees.remaining;

    let new_paid = previous_paid
        .checked_add(amount)
        .ok_or_else(|| LedgerError::arithmetic_overflow("payment", student))?;

    let new_remaining = previous_remaining
        .checked_sub(amount)
        .map(|remaining| remaining.max(Decimal::ZERO))
        .ok_or_else(|| LedgerError::arithmetic_overflow("payment", student))?;

    fees.paid = new_paid;
    fees.remaining = new_remaining;

    Ok(PaymentOutcome {
        year,
        amount,
        previous_paid,
        previous_remaining,
        paid: new_paid,
        remaining: new_remaining,
        total: fees.total,
    })
}

/// Payment status of one academic year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Partial,
    Pending,
    NoFees,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Partial => "Partial",
            PaymentStatus::Pending => "Pending",
            PaymentStatus::NoFees => "No Fees",
        };
        f.write_str(label)
    }
}

/// Summary line for one academic year of a student
#[derive(Debug, Clone, PartialEq)]
pub struct YearStatus {
    pub year: AcademicYear,
    pub total: Decimal,
    pub paid: Decimal,
    pub remaining: Decimal,
    /// Percentage paid, 0-100
    pub progress: Decimal,
    pub status: PaymentStatus,
}

/// Summarise a year's fees for display
pub fn year_status(year: AcademicYear, fees: &YearFees) -> YearStatus {
    let hundred = Decimal::ONE_HUNDRED;

    let (progress, status) = if fees.total > Decimal::ZERO {
        let progress = fees
            .paid
            .checked_div(fees.total)
            .and_then(|ratio| ratio.checked_mul(hundred))
            .map_or(hundred, |pct| pct.min(hundred));

        let status = if fees.remaining <= Decimal::ZERO {
            PaymentStatus::Paid
        } else if fees.paid > Decimal::ZERO {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Pending
        };
        (progress, status)
    } else {
        (Decimal::ZERO, PaymentStatus::NoFees)
    };

    YearStatus {
        year,
        total: fees.total,
        paid: fees.paid,
        remaining: fees.remaining,
        progress,
        status,
    }
}
