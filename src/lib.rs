//! seqcache: sequence cache rebuilder
//!
//! Rebuilds the denormalized sequence caches of a genome informatics
//! database: representative sequence selection per marker, biotype conflict
//! detection, and the companion description, coordinate and probe caches.
//! Input comes from pre-shaped tables (delimited files or SQLite); output is
//! bulk-load files.

pub mod cli;
pub mod core;
