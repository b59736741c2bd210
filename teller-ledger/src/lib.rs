//! teller-ledger: balance reconciliation, per-statement load sessions, and the CSV record sink

pub mod reconcile;
pub mod session;
pub mod sink;

pub use reconcile::{FlowSummary, Reconciliation, reconcile};
pub use session::StatementLoad;
pub use sink::{CsvSink, SinkReport};
