//! RBC statement parser (text)
//!
//! Expected extracted-text fragments:
//!   PREVIOUS STATEMENT BALANCE $1,250.00
//!   Jan 03 Jan 05 TIM HORTONS #1234 TORONTO ON                $4.50
//!   Jan 05 Jan 06 PAYMENT - THANK YOU                         $500.00 CR
//!   NEW BALANCE $874.75
//!
//! Each transaction row repeats the date (transaction date, posting date).
//! Row amounts are from the bank's side: purchases are unsigned, payments and
//! refunds carry a credit marker.

use regex::Regex;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::institution::{Institution, StatementParser};
use crate::money::{MoneyToken, invert_statement_sign};
use crate::types::{StatementBalances, Transaction};

const OPENING_ANCHOR: &str = "previous statement balance";
const CLOSING_ANCHOR: &str = "new balance";

pub struct RbcParser {
    opening_re: Regex,
    closing_re: Regex,
    txn_re: Regex,
    embedded_amount_re: Regex,
}

impl RbcParser {
    pub fn new() -> Result<Self> {
        let opening_re = Regex::new(concat!(
            r"(?i:previous (?:statement|account) balance) ",
            r"(?P<balance>-?\$[\d,]+\.\d{2})(?P<cr>-|\s?CR)?"
        ))?;

        // Upper or title case only: lowercase "credit balance" shows up in
        // statement prose. Text extraction sometimes splits the closing
        // figure, e.g. `$874 .75`.
        let closing_re = Regex::new(concat!(
            r"(?:(?:NEW|CREDIT) BALANCE|(?:New|Credit) Balance) ",
            r"(?P<balance>-?\$\d[\d, ]*\. ?\d{2})(?P<cr>-|\s?CR)?"
        ))?;

        // DATE DATE DESCRIPTION AMOUNT [CR]
        let txn_re = Regex::new(concat!(
            r"^(?P<dates>(?:[A-Za-z]{3}\.? \d{2} ){2})",
            r"(?P<desc>.+)\s",
            r"(?P<amount>-?\$[\d,]+\.\d{2})(?P<cr>-|\s?CR)?"
        ))?;

        let embedded_amount_re = Regex::new(r"(?P<amount>-?\$[\d,]+\.\d{2})(?P<cr>-|\s?CR)?")?;

        Ok(Self {
            opening_re,
            closing_re,
            txn_re,
            embedded_amount_re,
        })
    }

    pub fn parse_opening_balance(&self, text: &str) -> Result<f64> {
        let caps = self
            .opening_re
            .captures(text)
            .ok_or(IngestError::BalanceAnchorNotFound {
                anchor: OPENING_ANCHOR,
            })?;

        let token = MoneyToken::parse(&joined_token(&caps["balance"], caps.name("cr")))?;
        debug!(
            balance = token.value(),
            credit = token.credit,
            "parsed opening balance"
        );
        Ok(token.value())
    }

    pub fn parse_closing_balance(&self, text: &str) -> Result<f64> {
        let caps = self
            .closing_re
            .captures(text)
            .ok_or(IngestError::BalanceAnchorNotFound {
                anchor: CLOSING_ANCHOR,
            })?;

        let balance: String = caps["balance"]
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        let token = MoneyToken::parse(&joined_token(&balance, caps.name("cr")))?;
        debug!(
            balance = token.value(),
            credit = token.credit,
            "parsed closing balance"
        );
        Ok(token.value())
    }

    fn parse_line(&self, line: &str) -> Result<Option<Transaction>> {
        let Some(caps) = self.txn_re.captures(line) else {
            return Ok(None);
        };

        let date = normalize_date(&caps["dates"]);
        let token = MoneyToken::parse(&joined_token(&caps["amount"], caps.name("cr")))?;
        let mut amount = invert_statement_sign(token.value());
        let mut description = &caps["desc"];

        // A `$` in the description means the trailing match landed on a
        // running-balance column or a second figure; the embedded one wins.
        if description.contains('$') {
            if let Some(inner) = self.embedded_amount_re.captures(description) {
                let token =
                    MoneyToken::parse(&joined_token(&inner["amount"], inner.name("cr")))?;
                amount = invert_statement_sign(token.value());
                description = description.split('$').next().unwrap_or_default();
            }
        }

        Ok(Some(Transaction::new(date, description.trim(), amount)))
    }
}

impl StatementParser for RbcParser {
    fn institution(&self) -> Institution {
        Institution::Rbc
    }

    fn parse_balances(&self, text: &str) -> Result<StatementBalances> {
        Ok(StatementBalances {
            opening: self.parse_opening_balance(text)?,
            closing: self.parse_closing_balance(text)?,
        })
    }

    fn parse_transactions(&self, text: &str) -> Result<Vec<Transaction>> {
        let mut out = Vec::new();

        for line in text.lines() {
            // Duplicate rows are kept.
            if let Some(txn) = self.parse_line(line)? {
                out.push(txn);
            }
        }

        debug!(count = out.len(), "parsed transactions");
        Ok(out)
    }
}

/// `"Jan. 05 Jan. 06 "` -> `"Jan 05"` (the first of the two dates).
pub fn normalize_date(dates: &str) -> String {
    let mut parts = dates.split_whitespace();
    let month = parts.next().unwrap_or_default().trim_end_matches('.');
    let day = parts.next().unwrap_or_default();
    format!("{month} {day}")
}

fn joined_token(amount: &str, cr: Option<regex::Match<'_>>) -> String {
    match cr {
        Some(m) => format!("{amount}{}", m.as_str()),
        None => amount.to_string(),
    }
}
