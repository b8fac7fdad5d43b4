//! UPI payment link
//!
//! Produces `upi://pay?pa=<id>&pn=<name>&am=<amount>&cu=INR`. Rendering the
//! link as a QR image is left to whatever displays it.

use crate::types::LedgerError;
use rust_decimal::Decimal;
use std::fmt;
use std::fmt::Write as _;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpiPayment {
    upi_id: String,
    payee_name: String,
    amount: Decimal,
}

impl UpiPayment {
    /// # Errors
    ///
    /// - `Config` if `upi_id` is blank
    /// - `InvalidAmount` if `amount` is below 1
    pub fn new(upi_id: &str, payee_name: &str, amount: Decimal) -> Result<Self, LedgerError> {
        if upi_id.trim().is_empty() {
            return Err(LedgerError::config("payment.upi_id is not set"));
        }
        if amount < Decimal::ONE {
            return Err(LedgerError::invalid_amount(amount, "UPI amount must be at least 1"));
        }

        Ok(UpiPayment {
            upi_id: upi_id.trim().to_string(),
            payee_name: payee_name.trim().to_string(),
            amount,
        })
    }

    pub fn link(&self) -> String {
        format!(
            "upi://pay?pa={}&pn={}&am={}&cu=INR",
            escape(&self.upi_id),
            escape(&self.payee_name),
            self.amount.normalize()
        )
    }
}

impl fmt::Display for UpiPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.link())
    }
}

// Percent-encode UTF-8 bytes outside the unreserved set. `@` is legal in a
// query and stays literal so VPAs read as `name@bank`.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'@' => {
                out.push(char::from(byte))
            }
            _ => {
                let _ = write!(out, "%{:02X}", byte);
            }
        }
    }
    out
}
