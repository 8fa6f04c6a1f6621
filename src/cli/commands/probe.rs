//! `seqcache probe` command - Rebuild the sequence probe cache

use console::style;
use miette::Result;

use crate::cli::args::{BcpArgs, GlobalOpts};
use crate::cli::helpers::{open_source, run_context};
use crate::core::pipeline;

pub const DEFAULT_TABLE: &str = "SEQ_Probe_Cache";

pub fn run(args: BcpArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = run_context(&args, global, DEFAULT_TABLE)?;
    let source = open_source(&args, global)?;

    let stats = pipeline::build_probe_cache(&source, &ctx).map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Wrote {} rows to {}",
            style("✓").green(),
            style(stats.rows_written).cyan(),
            style(stats.output.display()).bold()
        );
    }
    Ok(())
}
