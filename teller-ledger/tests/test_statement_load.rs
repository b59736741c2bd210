use std::fs;

use teller_ingest::{IngestError, Institution, Transaction};
use teller_ledger::{CsvSink, Reconciliation, StatementLoad};

const JANUARY: &str = r#"
RBC Royal Bank
Statement period Dec 16 to Jan 15
PREVIOUS STATEMENT BALANCE $1,250.00
Dec 18 Dec 19 TIM HORTONS #1234 TORONTO ON $4.50
Dec 20 Dec 21 PAYMENT - THANK YOU $500.00 CR
Jan. 02 Jan. 03 AMAZON.CA AMAZON.CA $120.25
Jan 05 Jan 06 FEE $5.00 REFUND $12.34
NEW BALANCE $879 .75
"#;

const FEBRUARY: &str = r#"
PREVIOUS STATEMENT BALANCE $879.75
Jan 20 Jan 21 PAYMENT - THANK YOU $879.75 CR
Feb 02 Feb 03 NETFLIX.COM $16.99
NEW BALANCE $16.99
"#;

fn january_rows() -> Vec<Transaction> {
    vec![
        Transaction::new("Dec 18", "TIM HORTONS #1234 TORONTO ON", -4.50),
        Transaction::new("Dec 20", "PAYMENT - THANK YOU", 500.00),
        Transaction::new("Jan 02", "AMAZON.CA AMAZON.CA", -120.25),
        Transaction::new("Jan 05", "FEE", -5.00),
    ]
}

/// Full pipeline: parse, reconcile, write.
#[test]
fn test_load_and_commit_january() {
    let dir = tempfile::tempdir().unwrap();
    let sink = CsvSink::new(dir.path().join("output.csv"));

    let load = StatementLoad::for_institution(Institution::Rbc, JANUARY).unwrap();
    assert_eq!(load.balances.opening, 1250.00);
    assert_eq!(load.balances.closing, 879.75);
    assert_eq!(load.transactions, january_rows());
    assert!(load.reconciliation.is_balanced(), "{:?}", load.reconciliation);

    let report = load.commit(&sink).unwrap();
    assert!(report.wrote_header);
    assert_eq!(report.rows_written, 4);

    // Round trip: data rows come back as the same tuples, same order.
    assert_eq!(sink.read_transactions().unwrap(), january_rows());
}

/// Create then append: one header, N1 + N2 rows.
#[test]
fn test_header_written_once_across_loads() {
    let dir = tempfile::tempdir().unwrap();
    let sink = CsvSink::new(dir.path().join("output.csv"));

    let jan = StatementLoad::for_institution(Institution::Rbc, JANUARY).unwrap();
    let feb = StatementLoad::for_institution(Institution::Rbc, FEBRUARY).unwrap();
    assert!(feb.reconciliation.is_balanced());

    let first = jan.commit(&sink).unwrap();
    let second = feb.commit(&sink).unwrap();
    assert!(first.wrote_header);
    assert!(!second.wrote_header);

    let raw = fs::read_to_string(sink.path()).unwrap();
    let header_count = raw
        .lines()
        .filter(|l| *l == "\"Date\",\"Description\",\"Amount\"")
        .count();
    assert_eq!(header_count, 1);
    assert_eq!(raw.lines().count(), 1 + 4 + 2);

    let rows = sink.read_transactions().unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[4], Transaction::new("Jan 20", "PAYMENT - THANK YOU", 879.75));
    assert_eq!(rows[5], Transaction::new("Feb 02", "NETFLIX.COM", -16.99));
}

/// A discrepancy is reported but the rows are still written.
#[test]
fn test_discrepancy_is_written_anyway() {
    let dir = tempfile::tempdir().unwrap();
    let sink = CsvSink::new(dir.path().join("output.csv"));

    let text = JANUARY.replace("NEW BALANCE $879 .75", "NEW BALANCE $900.00");
    let load = StatementLoad::for_institution(Institution::Rbc, &text).unwrap();

    match &load.reconciliation {
        Reconciliation::Discrepancy { expected, flows } => {
            assert_eq!(*expected, 350.00);
            assert_eq!(flows.net, 370.25);
            assert_eq!(flows.inflow, 500.00);
            assert_eq!(flows.outflow, -129.75);
        }
        other => panic!("expected discrepancy, got {other:?}"),
    }

    let report = load.commit(&sink).unwrap();
    assert_eq!(report.rows_written, 4);
}

/// Extraction errors abort before anything touches the output file.
#[test]
fn test_failed_load_leaves_output_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let sink = CsvSink::new(dir.path().join("output.csv"));
    StatementLoad::for_institution(Institution::Rbc, FEBRUARY)
        .unwrap()
        .commit(&sink)
        .unwrap();
    let before = fs::read_to_string(sink.path()).unwrap();

    let broken = JANUARY.replace("$120.25", "$1,20.25");
    let err = StatementLoad::for_institution(Institution::Rbc, &broken).unwrap_err();
    assert!(matches!(err, IngestError::MalformedMoneyToken(_)));

    let err = StatementLoad::for_institution(Institution::Rbc, "").unwrap_err();
    assert!(matches!(err, IngestError::BalanceAnchorNotFound { .. }));

    assert_eq!(fs::read_to_string(sink.path()).unwrap(), before);
    // No stray staging files next to the destination.
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}
