//! Command line arguments

use clap::builder::BoolishValueParser;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::biotype::BiotypeArgs;
use crate::cli::commands::config::ConfigCommands;
use crate::cli::commands::dummy::DummyArgs;
use crate::cli::commands::marker::MarkerArgs;
use crate::cli::helpers::{parse_delimiter, parse_load_date};

#[derive(Parser, Debug)]
#[command(name = "seqcache")]
#[command(author, version, about = "Sequence cache rebuilder", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Configuration file (YAML); defaults to the built-in schema keys
    #[arg(long, global = true, env = "SEQCACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory the .bcp file is written to
    #[arg(long, global = true, env = "CACHEDATADIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Column delimiter (a single character, or "tab")
    #[arg(long, global = true, env = "COLDELIM", default_value = "tab", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Trace per-marker selection decisions
    #[arg(long, global = true, env = "SEQMARKER_DEBUG", value_parser = BoolishValueParser::new())]
    pub debug: bool,

    /// Only log warnings and errors; takes precedence over --debug
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

/// Input table source and output table shared by the cache builders
#[derive(clap::Args, Debug, Clone)]
pub struct BcpArgs {
    /// Directory of <table>.tsv files, or a SQLite database
    #[arg(long, short = 's')]
    pub source: PathBuf,

    /// Output table name (written as <table>.bcp)
    #[arg(long, env = "TABLE")]
    pub table: Option<String>,

    /// Load date stamped on every row (MM/DD/YYYY); defaults to today
    #[arg(long, value_parser = parse_load_date)]
    pub load_date: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rebuild the sequence/marker cache
    Marker(MarkerArgs),

    /// Report biotype conflict verdicts without writing a cache
    Biotype(BiotypeArgs),

    /// Rebuild the sequence description cache
    Description(BcpArgs),

    /// Rebuild the sequence coordinate cache
    Coord(BcpArgs),

    /// Rebuild the sequence probe cache
    Probe(BcpArgs),

    /// Create "Not Loaded" placeholder sequences for unmatched accessions
    Dummy(DummyArgs),

    /// Inspect the loader configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Table on a terminal, TSV otherwise
    #[default]
    Auto,
    Table,
    Tsv,
    Json,
    Yaml,
}
