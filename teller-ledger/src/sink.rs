//! CSV record sink.
//!
//! Output layout (every field quoted):
//!   "Date","Description","Amount"
//!   "Jan 03","TIM HORTONS #1234","-4.50"
//!
//! The header is written only when the destination is missing or empty. Each
//! append is staged in a temp file next to the destination and persisted over
//! it in one step, so a failed append leaves the previous contents intact.

use anyhow::{Context, Result};
use csv::{QuoteStyle, StringRecord, WriterBuilder};
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use teller_ingest::Transaction;
use tempfile::NamedTempFile;
use tracing::debug;

pub const HEADER: [&str; 3] = ["Date", "Description", "Amount"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkReport {
    pub rows_written: usize,
    pub wrote_header: bool,
}

#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the destination exists and already has a first row.
    pub fn has_header(&self) -> Result<bool> {
        if !self.path.is_file() {
            return Ok(false);
        }
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        let mut first = StringRecord::new();
        let found = rdr
            .read_record(&mut first)
            .with_context(|| format!("reading {}", self.path.display()))?;
        Ok(found)
    }

    pub fn append(&self, txns: &[Transaction]) -> Result<SinkReport> {
        let wrote_header = !self.has_header()?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut staged = staging_file(dir)?;

        // The staged file replaces the destination, so it takes over its mode.
        if self.path.exists() {
            let perms = fs::metadata(&self.path)
                .with_context(|| format!("stat {}", self.path.display()))?
                .permissions();
            fs::set_permissions(staged.path(), perms)
                .with_context(|| format!("copy permissions of {}", self.path.display()))?;
        }

        if !wrote_header {
            copy_existing(&self.path, staged.as_file_mut())?;
        }

        {
            let mut wtr = WriterBuilder::new()
                .quote_style(QuoteStyle::Always)
                .from_writer(staged.as_file_mut());
            if wrote_header {
                wtr.write_record(HEADER)?;
            }
            for t in txns {
                let amount = format!("{:.2}", t.amount());
                wtr.write_record([t.date(), t.description(), amount.as_str()])?;
            }
            wtr.flush()?;
        }

        staged
            .persist(&self.path)
            .with_context(|| format!("writing {}", self.path.display()))?;

        debug!(
            path = %self.path.display(),
            rows = txns.len(),
            wrote_header,
            "appended transactions"
        );

        Ok(SinkReport {
            rows_written: txns.len(),
            wrote_header,
        })
    }

    /// Data rows currently in the destination, header skipped.
    pub fn read_transactions(&self) -> Result<Vec<Transaction>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;

        let mut out = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let amount: f64 = record
                .get(2)
                .unwrap_or("")
                .trim()
                .parse()
                .with_context(|| format!("bad amount in row {:?}", record))?;
            out.push(Transaction::new(
                record.get(0).unwrap_or(""),
                record.get(1).unwrap_or(""),
                amount,
            ));
        }
        Ok(out)
    }
}

// Temp files default to 0600; a new destination should get the usual
// umask-filtered mode instead, like any file the process creates.
fn staging_file(dir: &Path) -> Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    builder
        .tempfile_in(dir)
        .with_context(|| format!("staging write in {}", dir.display()))
}

// Copies the current destination into the staged file, ending on a newline so
// appended rows never run into the last existing row.
fn copy_existing(path: &Path, staged: &mut File) -> Result<()> {
    let mut existing = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let copied = io::copy(&mut existing, staged)
        .with_context(|| format!("copying {}", path.display()))?;

    if copied > 0 {
        let mut last = [0u8; 1];
        staged.seek(SeekFrom::End(-1))?;
        staged.read_exact(&mut last)?;
        staged.seek(SeekFrom::End(0))?;
        if last[0] != b'\n' {
            staged.write_all(b"\n")?;
        }
    }
    Ok(())
}
