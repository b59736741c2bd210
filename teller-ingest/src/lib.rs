//! teller-ingest: statement text parsing (balances, transaction lines) and institution lookup.

pub mod error;
pub mod institution;
pub mod money;
pub mod parsers;
pub mod types;

pub use error::{IngestError, Result};
pub use institution::{Institution, StatementParser};
pub use money::{MoneyToken, apply_credit_marker, invert_statement_sign, parse_money, round_cents};
pub use types::{ParsedStatement, StatementBalances, Transaction};
