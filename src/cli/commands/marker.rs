//! `seqcache marker` command - Rebuild the sequence/marker cache

use console::style;
use miette::Result;

use crate::cli::args::{BcpArgs, GlobalOpts};
use crate::cli::helpers::{open_source, run_context};
use crate::core::pipeline::{self, MarkerRunStats};

pub const DEFAULT_TABLE: &str = "SEQ_Marker_Cache";

#[derive(clap::Args, Debug)]
pub struct MarkerArgs {
    #[command(flatten)]
    pub bcp: BcpArgs,

    /// Drop NCBI gene models on the wrong copy of a pseudo-autosomal gene
    #[arg(long)]
    pub par_cleanup: bool,
}

pub fn run(args: MarkerArgs, global: &GlobalOpts) -> Result<()> {
    let ctx = run_context(&args.bcp, global, DEFAULT_TABLE)?;
    let source = open_source(&args.bcp, global)?;

    let stats = pipeline::build_marker_cache(&source, &ctx, args.par_cleanup)
        .map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        print_summary(&stats);
    }
    Ok(())
}

fn print_summary(stats: &MarkerRunStats) {
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", style("Marker Cache Summary").bold());
    println!("{}", style("─".repeat(60)).dim());
    println!("  Markers processed:     {}", style(stats.markers).cyan());
    println!("  Genomic reps:          {}", style(stats.genomic).green());
    println!("  Transcript reps:       {}", style(stats.transcript).green());
    println!("  Polypeptide reps:      {}", style(stats.polypeptide).green());
    println!("  Biotype markers:       {}", style(stats.biotype_markers).cyan());
    println!("  Biotype conflicts:     {}", style(stats.conflicts).magenta());
    if stats.unresolved_biotypes > 0 {
        println!(
            "  Unresolved biotypes:   {}",
            style(stats.unresolved_biotypes).red()
        );
    }
    if stats.par_dropped > 0 {
        println!("  PAR rows dropped:      {}", style(stats.par_dropped).yellow());
    }
    println!(
        "\n{} Wrote {} rows to {}",
        style("✓").green(),
        style(stats.rows_written).cyan(),
        style(stats.output.display()).bold()
    );
}
