//! Monetary token parsing.
//!
//! Statement figures look like `$1,234.56`, `-$80.00`, `$12.00 CR` or `$3.10-`.
//! A trailing `CR` or `-` is a credit marker. Parsing applies the credit-marker
//! sign correction only; the transaction sign convention is a separate step
//! (`invert_statement_sign`).

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// A validated monetary token.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoneyToken {
    /// Leading `-` written on the token itself
    pub explicit_minus: bool,
    /// Trailing `CR` or `-`
    pub credit: bool,
    /// Unsigned digit value
    pub magnitude: f64,
}

impl MoneyToken {
    pub fn parse(raw: &str) -> Result<Self> {
        let malformed = || IngestError::MalformedMoneyToken(raw.to_string());

        let (body, credit) = split_credit_marker(raw.trim());
        let (body, explicit_minus) = match body.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (body, false),
        };
        let body = body.strip_prefix('$').unwrap_or(body);

        let (int, frac) = body.split_once('.').ok_or_else(malformed)?;
        if frac.len() != 2 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        if !is_grouped_integer(int) {
            return Err(malformed());
        }

        let digits: String = int.chars().filter(|c| *c != ',').collect();
        let magnitude: f64 = format!("{digits}.{frac}")
            .parse()
            .map_err(|_| malformed())?;

        Ok(Self {
            explicit_minus,
            credit,
            magnitude,
        })
    }

    /// Value as printed, ignoring any credit marker.
    pub fn literal(&self) -> f64 {
        if self.explicit_minus {
            -self.magnitude
        } else {
            self.magnitude
        }
    }

    /// Value after the credit-marker correction.
    pub fn value(&self) -> f64 {
        apply_credit_marker(self.literal(), self.explicit_minus, self.credit)
    }
}

/// Parse a token and apply the credit-marker correction.
pub fn parse_money(raw: &str) -> Result<f64> {
    Ok(MoneyToken::parse(raw)?.value())
}

/// A credit marker forces the value negative unless the token already
/// carries its own minus sign. Never negates twice.
pub fn apply_credit_marker(literal: f64, explicit_minus: bool, credit: bool) -> f64 {
    if credit && !explicit_minus {
        -literal.abs()
    } else {
        literal
    }
}

/// Statement amounts are written from the bank's side of the ledger; stored
/// amounts are negative for money leaving the account.
pub fn invert_statement_sign(amount: f64) -> f64 {
    -amount
}

/// Round half away from zero to two decimal places.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn split_credit_marker(token: &str) -> (&str, bool) {
    let stripped = token
        .strip_suffix("CR")
        .or_else(|| token.strip_suffix('-'));
    match stripped {
        Some(rest) => (rest.strip_suffix(char::is_whitespace).unwrap_or(rest), true),
        None => (token, false),
    }
}

// `1234` or `1,234,567`; a grouped form must use full groups of three.
fn is_grouped_integer(int: &str) -> bool {
    if int.is_empty() {
        return false;
    }
    if !int.contains(',') {
        return int.bytes().all(|b| b.is_ascii_digit());
    }

    let mut groups = int.split(',');
    let head_ok = groups
        .next()
        .is_some_and(|g| (1..=3).contains(&g.len()) && g.bytes().all(|b| b.is_ascii_digit()));
    head_ok && groups.all(|g| g.len() == 3 && g.bytes().all(|b| b.is_ascii_digit()))
}
