use serde::{Deserialize, Serialize};

/// One statement line, normalized (institution-agnostic).
///
/// Equality is structural: two lines with the same date, description and
/// amount compare equal even when they came from different positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    date: String,
    description: String,
    amount: f64,
}

impl Transaction {
    pub fn new(date: impl Into<String>, description: impl Into<String>, amount: f64) -> Self {
        Self {
            date: date.into(),
            description: description.into(),
            amount,
        }
    }

    /// `"Mon DD"`, e.g. `"Jan 05"`
    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Negative means money left the account; positive means money came in.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn is_outflow(&self) -> bool {
        self.amount < 0.0
    }
}

/// Opening and closing balances, after credit-marker correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatementBalances {
    pub opening: f64,
    pub closing: f64,
}

/// Everything an institution parser pulls out of one statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedStatement {
    pub balances: StatementBalances,
    /// In order of appearance in the statement text
    pub transactions: Vec<Transaction>,
}
