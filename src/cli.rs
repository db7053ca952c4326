//! Command-line interface: argument parsing, glob expansion, and the
//! per-file split/join loop.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::error::{Result, SplitJoinError};
use crate::joiner::Joiner;
use crate::report::Diagnostics;
use crate::splitter::Splitter;

/// Split JMeter test plans into git-friendly fragments, or join them back.
#[derive(Parser)]
#[command(name = "jmx2git")]
#[command(version, about, long_about = None)]
#[command(group = ArgGroup::new("mode").required(true).args(["split", "join"]))]
pub struct Cli {
    /// JMX source files; glob patterns are expanded
    #[arg(short = 'j', long = "jmx-file", value_name = "PATTERN", num_args = 1.., required = true)]
    pub jmx_file: Vec<String>,

    /// Split each test plan into a fragment folder
    #[arg(short, long)]
    pub split: bool,

    /// Rebuild each test plan from its fragment folder
    #[arg(short = 'o', long)]
    pub join: bool,

    /// Disable colored diagnostic output
    #[arg(long)]
    pub no_color: bool,
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut diagnostics = Diagnostics::stdout(!cli.no_color);
    run_with(&cli, &mut diagnostics)
}

/// Run a parsed CLI against a diagnostics sink.
///
/// Files are processed strictly in order; the first fatal error aborts the
/// remainder of the batch.
pub fn run_with<W: std::io::Write>(cli: &Cli, diagnostics: &mut Diagnostics<W>) -> Result<()> {
    let files = expand_patterns(&cli.jmx_file)?;
    for file in files {
        if cli.split {
            Splitter::new(&file, diagnostics).split_to_parts()?;
        } else {
            Joiner::new(&file, diagnostics).join_from_parts()?;
        }
    }
    Ok(())
}

/// Expand glob patterns into an ordered file list, patterns in the order
/// given and matches in glob order within each pattern.
///
/// # Errors
/// `InvalidPattern` for a malformed pattern, `NoFilesMatched` when the
/// expansion is empty overall.
fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        for entry in glob::glob(pattern)? {
            match entry {
                Ok(path) => files.push(path),
                Err(e) => return Err(SplitJoinError::Io(e.into_error())),
            }
        }
    }
    if files.is_empty() {
        return Err(SplitJoinError::NoFilesMatched {
            patterns: patterns.join(", "),
        });
    }
    Ok(files)
}
