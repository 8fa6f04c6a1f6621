//! `seqcache biotype` command - Report biotype conflict verdicts

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::args::{GlobalOpts, OutputFormat};
use crate::cli::helpers::{load_config, stdout_is_terminal, truncate_str};
use crate::cli::output::effective_format;
use crate::core::biotype::{self, BiotypeLookup, MarkerVerdict, UnresolvedBiotype};
use crate::core::keys::{MarkerKey, TermKey};
use crate::core::source::AnySource;

#[derive(clap::Args, Debug)]
pub struct BiotypeArgs {
    /// Directory of <table>.tsv files, or a SQLite database
    #[arg(long, short = 's')]
    pub source: PathBuf,

    /// Output format
    #[arg(long, short = 'o', value_enum, default_value = "auto")]
    pub output: OutputFormat,

    /// Only list markers in conflict
    #[arg(long)]
    pub conflicts_only: bool,
}

#[derive(Tabled)]
struct VerdictRow {
    #[tabled(rename = "MARKER")]
    marker_key: MarkerKey,
    #[tabled(rename = "VERDICT")]
    verdict: String,
    #[tabled(rename = "MODELS")]
    gene_models: usize,
    #[tabled(rename = "GENE MODEL TYPES")]
    gene_model_terms: String,
    #[tabled(rename = "DIRECT TYPES")]
    direct_terms: String,
}

#[derive(Serialize)]
struct BiotypeReport<'a> {
    markers: usize,
    conflicts: usize,
    verdicts: Vec<&'a MarkerVerdict>,
    unresolved: &'a [UnresolvedBiotype],
    without_direct_type: &'a [MarkerKey],
}

fn join_terms(terms: &BTreeSet<TermKey>) -> String {
    terms
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn run(args: BiotypeArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let source = AnySource::open(&args.source, global.delimiter).map_err(|e| miette::miette!("{}", e))?;
    let lookup = biotype::build_lookup(&source, &config).map_err(|e| miette::miette!("{}", e))?;

    let verdicts: Vec<&MarkerVerdict> = lookup
        .verdicts()
        .filter(|v| !args.conflicts_only || v.verdict.is_conflict())
        .collect();

    match effective_format(args.output, stdout_is_terminal()) {
        OutputFormat::Json => {
            let report = report(&lookup, verdicts);
            let json = serde_json::to_string_pretty(&report).into_diagnostic()?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let report = report(&lookup, verdicts);
            let yaml = serde_yml::to_string(&report).into_diagnostic()?;
            print!("{}", yaml);
        }
        OutputFormat::Tsv => {
            println!("marker_key\tverdict\tgene_models\tgene_model_terms\tdirect_terms");
            for v in &verdicts {
                println!(
                    "{}\t{}\t{}\t{}\t{}",
                    v.marker_key,
                    v.verdict,
                    v.gene_models,
                    join_terms(&v.gene_model_terms),
                    join_terms(&v.direct_terms)
                );
            }
        }
        OutputFormat::Table | OutputFormat::Auto => {
            print_table(&lookup, &verdicts);
        }
    }

    Ok(())
}

fn report<'a>(lookup: &'a BiotypeLookup, verdicts: Vec<&'a MarkerVerdict>) -> BiotypeReport<'a> {
    BiotypeReport {
        markers: lookup.marker_count(),
        conflicts: lookup.conflict_count(),
        verdicts,
        unresolved: lookup.unresolved(),
        without_direct_type: lookup.without_direct_type(),
    }
}

fn print_table(lookup: &BiotypeLookup, verdicts: &[&MarkerVerdict]) {
    let rows: Vec<VerdictRow> = verdicts
        .iter()
        .map(|v| VerdictRow {
            marker_key: v.marker_key,
            verdict: v.verdict.to_string(),
            gene_models: v.gene_models,
            gene_model_terms: truncate_str(&join_terms(&v.gene_model_terms), 40),
            direct_terms: truncate_str(&join_terms(&v.direct_terms), 40),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    println!(
        "\n{} markers, {} in conflict",
        style(lookup.marker_count()).cyan(),
        style(lookup.conflict_count()).magenta()
    );

    if !lookup.unresolved().is_empty() {
        println!("\n{}", style("Unresolved raw biotypes").bold().underlined());
        for u in lookup.unresolved() {
            println!(
                "  {} marker {} sequence {} (ldb {}): {}",
                style("✗").red(),
                u.marker_key,
                u.sequence_key,
                u.logical_db_key,
                style(&u.raw_biotype).yellow()
            );
        }
    }
}
