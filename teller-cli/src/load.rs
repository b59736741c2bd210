use anyhow::{Context, Result};
use clap::Args;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use teller_ingest::Institution;
use teller_ledger::{CsvSink, Reconciliation, SinkReport, StatementLoad};

use crate::config::Config;
use crate::extract::{FileType, statement_text};

#[derive(Args, Debug, Clone, PartialEq)]
pub struct LoadArgs {
    /// The institution who issued the bank statement (e.g. RBC)
    pub institution: Institution,

    /// The file path of the bank statement
    pub filepath: PathBuf,

    /// The file type of the bank statement (default from config: CSV)
    #[arg(short = 't', long, value_enum, ignore_case = true)]
    pub filetype: Option<FileType>,

    /// Print the extracted statement text instead of parsing it
    #[arg(short, long)]
    pub debug: bool,

    /// CSV file to append to (default from config: ./output.csv)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run_load(args: &LoadArgs, cfg: &Config) -> Result<()> {
    let filetype = args.filetype.unwrap_or(cfg.load.filetype);
    let text = statement_text(&args.filepath, filetype)?;

    if args.debug {
        println!("{text}");
        return Ok(());
    }

    let load = StatementLoad::for_institution(args.institution, &text)
        .with_context(|| format!("parsing {}", args.filepath.display()))?;

    let sink = CsvSink::new(
        args.output
            .clone()
            .unwrap_or_else(|| cfg.output.path.clone()),
    );
    let report = load.commit(&sink)?;

    print!("{}", render_summary(&load, &report, &args.filepath, sink.path()));
    Ok(())
}

pub fn render_summary(
    load: &StatementLoad,
    report: &SinkReport,
    source: &Path,
    destination: &Path,
) -> String {
    let mut s = String::new();
    let _ = writeln!(
        s,
        "Parsed {} transactions from {} ({})",
        load.transactions.len(),
        source.display(),
        load.institution
    );
    let _ = writeln!(
        s,
        "Opening balance: {:.2} | Closing balance: {:.2}",
        load.balances.opening, load.balances.closing
    );

    match &load.reconciliation {
        Reconciliation::Balanced(_) => {
            let _ = writeln!(s, "Validating balance...success!");
        }
        Reconciliation::Discrepancy { expected, flows } => {
            let _ = writeln!(s, "Validating balance...discrepancy found!");
            let _ = writeln!(s, "Diff is: {:.2} vs. {:.2}", expected, flows.net);
            let _ = writeln!(
                s,
                "Net/Inflow/Outflow: {:.2} / {:.2} / {:.2}",
                flows.net, flows.inflow, flows.outflow
            );
        }
    }

    let _ = writeln!(
        s,
        "Wrote {} rows to {}{}",
        report.rows_written,
        destination.display(),
        if report.wrote_header { " (new file with header)" } else { "" }
    );
    s
}
