//! `seqcache dummy` command - Create "Not Loaded" placeholder sequences

use std::path::PathBuf;

use console::style;
use miette::Result;

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::{load_config, parse_load_date};
use crate::core::pipeline::{self, RunContext};
use crate::core::placeholder;
use crate::core::source::AnySource;

#[derive(clap::Args, Debug)]
pub struct DummyArgs {
    /// Directory of <table>.tsv files, or a SQLite database
    #[arg(long, short = 's')]
    pub source: PathBuf,

    /// Load date stamped on every row (MM/DD/YYYY); defaults to today
    #[arg(long, value_parser = parse_load_date)]
    pub load_date: Option<String>,
}

pub fn run(args: DummyArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let ctx = RunContext::new(config, global.output_dir.clone(), placeholder::SEQUENCE_TABLE)
        .with_delimiter(global.delimiter)
        .with_load_date(args.load_date.unwrap_or_else(pipeline::today));
    let source = AnySource::open(&args.source, global.delimiter).map_err(|e| miette::miette!("{}", e))?;

    let stats = pipeline::build_placeholder_sequences(&source, &ctx).map_err(|e| miette::miette!("{}", e))?;

    if global.quiet {
        return Ok(());
    }
    println!(
        "{} Created {} placeholder sequences from {} unmatched accessions",
        style("✓").green(),
        style(stats.created()).cyan(),
        stats.unmatched
    );
    if stats.skipped > 0 {
        println!(
            "  {} {} accessions skipped (no placeholder profile for their logical DB)",
            style("!").yellow(),
            stats.skipped
        );
    }
    for (table, written) in &stats.tables {
        println!(
            "  {:<18} {} rows -> {}",
            table,
            written.rows_written,
            style(written.output.display()).bold()
        );
    }
    Ok(())
}
