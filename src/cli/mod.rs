//! CLI module - argument parsing and command dispatch

pub mod args;
pub mod commands;
pub mod helpers;
pub mod output;

pub use args::{BcpArgs, Cli, Commands, GlobalOpts, OutputFormat};
