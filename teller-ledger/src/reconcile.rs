//! Balance reconciliation: opening − closing must equal the net of all
//! transactions, to the cent.
//!
//! A mismatch is a report, not an error. The caller still writes the
//! transactions and decides what to do with the discrepancy.

use serde::{Deserialize, Serialize};
use teller_ingest::{StatementBalances, Transaction, round_cents};
use tracing::{info, warn};

/// Transaction totals, each rounded to the cent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowSummary {
    pub net: f64,
    pub inflow: f64,
    pub outflow: f64,
}

impl FlowSummary {
    pub fn from_transactions(txns: &[Transaction]) -> Self {
        let net: f64 = txns.iter().map(|t| t.amount()).sum();
        let inflow: f64 = txns
            .iter()
            .map(|t| t.amount())
            .filter(|a| *a > 0.0)
            .sum();
        let outflow: f64 = txns
            .iter()
            .filter(|t| t.is_outflow())
            .map(|t| t.amount())
            .sum();

        Self {
            net: round_cents(net),
            inflow: round_cents(inflow),
            outflow: round_cents(outflow),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reconciliation {
    Balanced(FlowSummary),

    /// `expected` is `opening − closing`; `flows.net` is what the
    /// transactions actually add up to.
    Discrepancy { expected: f64, flows: FlowSummary },
}

impl Reconciliation {
    pub fn is_balanced(&self) -> bool {
        matches!(self, Reconciliation::Balanced(_))
    }

    pub fn flows(&self) -> &FlowSummary {
        match self {
            Reconciliation::Balanced(flows) => flows,
            Reconciliation::Discrepancy { flows, .. } => flows,
        }
    }

    /// How far the transactions are from the balances (0.0 when balanced).
    pub fn difference(&self) -> f64 {
        match self {
            Reconciliation::Balanced(_) => 0.0,
            Reconciliation::Discrepancy { expected, flows } => round_cents(expected - flows.net),
        }
    }
}

pub fn reconcile(balances: &StatementBalances, txns: &[Transaction]) -> Reconciliation {
    let flows = FlowSummary::from_transactions(txns);
    let expected = round_cents(balances.opening - balances.closing);

    if expected == flows.net {
        info!(net = flows.net, "balance validated");
        return Reconciliation::Balanced(flows);
    }

    warn!(
        expected,
        net = flows.net,
        inflow = flows.inflow,
        outflow = flows.outflow,
        "balance discrepancy"
    );
    Reconciliation::Discrepancy { expected, flows }
}
