//! Institution lookup and the parser capability every institution provides.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};
use crate::parsers::rbc::RbcParser;
use crate::types::{ParsedStatement, StatementBalances, Transaction};

/// Produces (opening, closing, transactions) from one statement's text.
///
/// Implementations hold compiled patterns only; all per-statement values are
/// returned, never stored, so a parser may be reused across loads.
pub trait StatementParser {
    fn institution(&self) -> Institution;

    fn parse_balances(&self, text: &str) -> Result<StatementBalances>;

    fn parse_transactions(&self, text: &str) -> Result<Vec<Transaction>>;

    /// Balances are required: a statement without both anchors fails before
    /// any transaction line is looked at.
    fn parse(&self, text: &str) -> Result<ParsedStatement> {
        let balances = self.parse_balances(text)?;
        let transactions = self.parse_transactions(text)?;
        Ok(ParsedStatement {
            balances,
            transactions,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Institution {
    /// Royal Bank of Canada
    #[serde(rename = "RBC")]
    Rbc,
}

impl Institution {
    pub const ALL: &'static [Institution] = &[Institution::Rbc];

    pub fn code(&self) -> &'static str {
        match self {
            Institution::Rbc => "RBC",
        }
    }

    /// Fresh parser for this institution.
    pub fn parser(&self) -> Result<Box<dyn StatementParser>> {
        match self {
            Institution::Rbc => Ok(Box::new(RbcParser::new()?)),
        }
    }
}

impl fmt::Display for Institution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Institution {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self> {
        Institution::ALL
            .iter()
            .copied()
            .find(|i| i.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| IngestError::UnknownInstitution(s.to_string()))
    }
}
