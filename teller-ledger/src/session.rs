//! One statement load, end to end.
//!
//! A `StatementLoad` is built fresh for every statement and owns everything the
//! load produced. Nothing is kept between loads.

use anyhow::Result;
use teller_ingest::{Institution, StatementBalances, StatementParser, Transaction};
use tracing::info;

use crate::reconcile::{Reconciliation, reconcile};
use crate::sink::{CsvSink, SinkReport};

#[derive(Debug, Clone)]
pub struct StatementLoad {
    pub institution: Institution,
    pub balances: StatementBalances,
    /// In statement order
    pub transactions: Vec<Transaction>,
    pub reconciliation: Reconciliation,
}

impl StatementLoad {
    /// Parse and reconcile. Extraction errors abort the load; a reconciliation
    /// mismatch does not.
    pub fn run(parser: &dyn StatementParser, text: &str) -> teller_ingest::Result<Self> {
        let parsed = parser.parse(text)?;
        let reconciliation = reconcile(&parsed.balances, &parsed.transactions);

        info!(
            institution = %parser.institution(),
            opening = parsed.balances.opening,
            closing = parsed.balances.closing,
            transactions = parsed.transactions.len(),
            balanced = reconciliation.is_balanced(),
            "statement loaded"
        );

        Ok(Self {
            institution: parser.institution(),
            balances: parsed.balances,
            transactions: parsed.transactions,
            reconciliation,
        })
    }

    /// Look up the institution's parser and run a load with it.
    pub fn for_institution(institution: Institution, text: &str) -> teller_ingest::Result<Self> {
        let parser = institution.parser()?;
        Self::run(parser.as_ref(), text)
    }

    /// Write this load's transactions to the sink, balanced or not.
    pub fn commit(&self, sink: &CsvSink) -> Result<SinkReport> {
        sink.append(&self.transactions)
    }
}
