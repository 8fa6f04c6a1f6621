use clap::Parser;
use log::Level;
use miette::{IntoDiagnostic, Result};
use seqcache::cli::{Cli, Commands};
use simple_logger::init_with_level;

fn main() -> Result<()> {
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();

    let level = if cli.global.quiet {
        Level::Warn
    } else if cli.global.debug {
        Level::Debug
    } else {
        Level::Info
    };
    init_with_level(level).into_diagnostic()?;

    let global = &cli.global;
    match cli.command {
        Commands::Marker(args) => seqcache::cli::commands::marker::run(args, global),
        Commands::Biotype(args) => seqcache::cli::commands::biotype::run(args, global),
        Commands::Description(args) => seqcache::cli::commands::description::run(args, global),
        Commands::Coord(args) => seqcache::cli::commands::coord::run(args, global),
        Commands::Probe(args) => seqcache::cli::commands::probe::run(args, global),
        Commands::Dummy(args) => seqcache::cli::commands::dummy::run(args, global),
        Commands::Config(cmd) => seqcache::cli::commands::config::run(cmd, global),
    }
}
