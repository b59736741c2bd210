//! Interactive session: `load ...` as many times as needed, `quit` to leave.
//!
//! A failing command prints one `Error: ...` line and the session carries on.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};

use crate::config::Config;
use crate::load::{LoadArgs, run_load};

const PROMPT: &str = "λ ";

const HELP: &str = "\
Commands:
  load <institution> <filepath> [-t PDF|CSV] [-d] [-o <output.csv>]
                 Parse a bank statement and append its transactions
  help           Show this message
  quit, exit     Leave the session";

#[derive(Debug, PartialEq)]
pub enum LoopControl {
    Continue,
    Exit,
}

/// `load` as typed at the prompt.
#[derive(Parser, Debug)]
#[command(name = "load", about = "Loads the contents of a bank statement file")]
struct LoadLine {
    #[command(flatten)]
    args: LoadArgs,
}

pub fn run_shell(cfg: &Config) -> Result<()> {
    println!(
        "Welcome to Teller ({}), a CLI for loading bank statements. Type \"help\" for available commands.",
        env!("TELLER_BUILD_SHA")
    );

    let stdin = io::stdin();
    let mut input = stdin.lock();

    loop {
        print!("{PROMPT}");
        io::stdout().flush().ok();

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            println!();
            break;
        }

        match handle_line(cfg, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => println!("Error: {err:#}"),
        }
    }

    Ok(())
}

pub fn handle_line(cfg: &Config, line: &str) -> Result<LoopControl> {
    let tokens = shell_words::split(line.trim()).context("parsing command line")?;
    let Some(command) = tokens.first() else {
        return Ok(LoopControl::Continue);
    };

    match command.to_lowercase().as_str() {
        "load" => {
            let parsed = match LoadLine::try_parse_from(&tokens) {
                Ok(parsed) => parsed,
                Err(err) => {
                    // Usage problems and --help both land here; neither ends the session.
                    err.print().ok();
                    return Ok(LoopControl::Continue);
                }
            };
            run_load(&parsed.args, cfg)?;
        }
        "help" | "?" => println!("{HELP}"),
        "quit" | "exit" => return Ok(LoopControl::Exit),
        other => println!("Unknown command: {other} (type \"help\")"),
    }

    Ok(LoopControl::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use teller_ingest::Institution;

    use crate::extract::FileType;

    #[test]
    fn test_quit_and_exit() {
        let cfg = Config::default();
        assert_eq!(handle_line(&cfg, "quit").unwrap(), LoopControl::Exit);
        assert_eq!(handle_line(&cfg, "EXIT\n").unwrap(), LoopControl::Exit);
    }

    #[test]
    fn test_blank_and_unknown_lines_continue() {
        let cfg = Config::default();
        assert_eq!(handle_line(&cfg, "   \n").unwrap(), LoopControl::Continue);
        assert_eq!(handle_line(&cfg, "balance").unwrap(), LoopControl::Continue);
        assert_eq!(handle_line(&cfg, "help").unwrap(), LoopControl::Continue);
    }

    #[test]
    fn test_bad_load_usage_does_not_end_session() {
        let cfg = Config::default();
        assert_eq!(handle_line(&cfg, "load").unwrap(), LoopControl::Continue);
        assert_eq!(handle_line(&cfg, "load TD x.pdf").unwrap(), LoopControl::Continue);
    }

    #[test]
    fn test_unbalanced_quotes_are_an_error() {
        let err = handle_line(&Config::default(), "load RBC \"unterminated").unwrap_err();
        assert!(err.to_string().contains("parsing command line"));
    }

    #[test]
    fn test_load_line_arguments() {
        let tokens = shell_words::split("load rbc \"my statements/jan.pdf\" -t pdf -d").unwrap();
        let parsed = LoadLine::try_parse_from(&tokens).unwrap().args;
        assert_eq!(parsed.institution, Institution::Rbc);
        assert_eq!(parsed.filepath, PathBuf::from("my statements/jan.pdf"));
        assert_eq!(parsed.filetype, Some(FileType::Pdf));
        assert!(parsed.debug);
        assert_eq!(parsed.output, None);
    }

    #[test]
    fn test_load_failure_surfaces_as_error() {
        let dir = tempfile::tempdir().unwrap();
        let statement = dir.path().join("empty.txt");
        fs::write(&statement, "").unwrap();

        let line = format!(
            "load RBC {} -o {}",
            statement.display(),
            dir.path().join("out.csv").display()
        );
        let err = handle_line(&Config::default(), &line).unwrap_err();
        assert!(format!("{err:#}").contains("Balance anchor not found"));
    }
}
