//! uniset-cli - command-line driver around the set-expression pipeline.
//!
//! Reads one `UnicodeSet` pattern (as a positional argument, or from
//! stdin if none is given), parses it with [`uniset_par::apply_pattern`],
//! and prints the resolved set's rebuilt pattern plus a summary of its
//! members. A thin `Config`/`Session` split mirrors how a larger driver
//! separates "what the user asked for" from "the state of one run" —
//! here there's only one phase, so `Session` is mostly bookkeeping around
//! where the pattern text came from.

use std::io::Read;

use anyhow::{bail, Context, Result};
use clap::Parser;
use uniset_par::{CaseMode, ParseOptions};
use uniset_set::CodePointSet;

/// What a single invocation was asked to do.
#[derive(Parser, Debug, Clone)]
#[command(name = "uniset", author, version, about = "Parse and rebuild a Unicode set-expression pattern", long_about = None)]
pub struct Config {
    /// Pattern to parse; read from stdin if omitted
    #[arg(value_name = "PATTERN")]
    pub pattern: Option<String>,

    /// Skip pattern whitespace between tokens
    #[arg(long)]
    pub ignore_space: bool,

    /// Close the set over full case mappings
    #[arg(long, conflicts_with_all = ["simple_case_insensitive", "add_case_mappings"])]
    pub case_insensitive: bool,

    /// Close the set over simple case mappings
    #[arg(long, conflicts_with = "add_case_mappings")]
    pub simple_case_insensitive: bool,

    /// Close the set over case mappings both ways
    #[arg(long)]
    pub add_case_mappings: bool,

    /// Print every range and string member instead of just a summary
    #[arg(long = "list")]
    pub list_members: bool,

    /// Raise the log level to debug
    #[arg(long)]
    pub verbose: bool,
}

impl Config {
    /// The three case-mode flags are mutually exclusive (enforced by
    /// `conflicts_with`); at most one is ever set here.
    pub fn options(&self) -> ParseOptions {
        let case_mode = if self.case_insensitive {
            CaseMode::CaseInsensitive
        } else if self.simple_case_insensitive {
            CaseMode::Simple
        } else if self.add_case_mappings {
            CaseMode::AddCaseMappings
        } else {
            CaseMode::None
        };
        ParseOptions {
            ignore_space: self.ignore_space,
            case_mode,
        }
    }
}

/// One run of the CLI: resolves where the pattern text comes from, runs
/// it through the parser, and renders the result.
pub struct Session {
    pub config: Config,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<()> {
        let pattern = self.read_pattern()?;
        let options = self.config.options();
        tracing::debug!(?options, %pattern, "parsing pattern");

        let (set, rebuilt) =
            uniset_par::apply_pattern(&pattern, &options).context("parsing pattern")?;
        tracing::info!(%rebuilt, "rebuilt pattern");

        println!("{}", rebuilt);
        if self.config.list_members {
            print_members(&set);
        }
        Ok(())
    }

    fn read_pattern(&self) -> Result<String> {
        if let Some(pattern) = &self.config.pattern {
            return Ok(pattern.clone());
        }
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading pattern from stdin")?;
        let trimmed = buf.trim();
        if trimmed.is_empty() {
            bail!("no pattern given (pass one as an argument or pipe it on stdin)");
        }
        Ok(trimmed.to_string())
    }
}

fn print_members(set: &CodePointSet) {
    for &(lo, hi) in set.ranges() {
        if lo == hi {
            println!("  U+{:04X}", lo);
        } else {
            println!("  U+{:04X}..U+{:04X}", lo, hi);
        }
    }
    for s in set.strings() {
        println!("  {:?}", s);
    }
}
