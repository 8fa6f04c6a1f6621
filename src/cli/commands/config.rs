//! `seqcache config` command - Inspect the loader configuration

use clap::Subcommand;
use miette::Result;

use crate::cli::args::GlobalOpts;
use crate::cli::helpers::load_config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as YAML
    Show,

    /// Load and validate the configuration
    Check,
}

pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    match cmd {
        ConfigCommands::Show => {
            let yaml = config.to_yaml().map_err(|e| miette::miette!("{}", e))?;
            print!("{}", yaml);
        }
        ConfigCommands::Check => {
            if !global.quiet {
                println!(
                    "{} Configuration is valid ({} gene model tiers)",
                    console::style("✓").green(),
                    config.gene_model_tiers.len()
                );
            }
        }
    }
    Ok(())
}
