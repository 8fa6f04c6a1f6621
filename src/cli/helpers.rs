//! Shared helper functions for CLI commands

use miette::Result;
use std::io::IsTerminal;

use crate::cli::args::{BcpArgs, GlobalOpts};
use crate::core::config::Config;
use crate::core::pipeline::{self, RunContext};
use crate::core::source::AnySource;

/// Parse a column delimiter: a single ASCII character or a name
pub fn parse_delimiter(s: &str) -> std::result::Result<u8, String> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        "pipe" => Ok(b'|'),
        "comma" => Ok(b','),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii() => Ok(c as u8),
                _ => Err(format!(
                    "delimiter must be a single ASCII character or one of tab, pipe, comma: '{}'",
                    s
                )),
            }
        }
    }
}

/// Validate a MM/DD/YYYY load date
pub fn parse_load_date(s: &str) -> std::result::Result<String, String> {
    chrono::NaiveDate::parse_from_str(s, "%m/%d/%Y")
        .map(|d| d.format("%m/%d/%Y").to_string())
        .map_err(|e| format!("load date must be MM/DD/YYYY ({}): '{}'", e, s))
}

/// Truncate a string to max_len, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

/// Whether stdout is an interactive terminal
pub fn stdout_is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

pub fn load_config(global: &GlobalOpts) -> Result<Config> {
    Config::load(global.config.as_deref()).map_err(|e| miette::miette!("{}", e))
}

pub fn open_source(args: &BcpArgs, global: &GlobalOpts) -> Result<AnySource> {
    AnySource::open(&args.source, global.delimiter).map_err(|e| miette::miette!("{}", e))
}

/// Run context for a cache builder, with the command's default table name
pub fn run_context(args: &BcpArgs, global: &GlobalOpts, default_table: &str) -> Result<RunContext> {
    let config = load_config(global)?;
    let table = args
        .table
        .clone()
        .unwrap_or_else(|| default_table.to_string());
    let load_date = args.load_date.clone().unwrap_or_else(pipeline::today);

    Ok(RunContext::new(config, global.output_dir.clone(), table)
        .with_delimiter(global.delimiter)
        .with_load_date(load_date))
}
