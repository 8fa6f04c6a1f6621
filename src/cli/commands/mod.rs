//! CLI command implementations

pub mod biotype;
pub mod config;
pub mod coord;
pub mod description;
pub mod dummy;
pub mod marker;
pub mod probe;
