//! Core module - selection engine, biotype verdicts, sources and sinks

pub mod bcp;
pub mod biotype;
pub mod companion;
pub mod config;
pub mod emitter;
pub mod error;
pub mod keys;
pub mod loader;
pub mod par;
pub mod pipeline;
pub mod placeholder;
pub mod provider;
pub mod representative;
pub mod source;

pub use bcp::{BcpFile, BcpRecord, BcpWriter};
pub use biotype::{BiotypeLookup, ConflictVerdict, EquivalenceTable, TermHierarchy};
pub use config::Config;
pub use emitter::{Emitter, MarkerCacheRow, QualifierKeys};
pub use error::{CacheError, Result};
pub use keys::{MarkerKey, SequenceKey, TermKey};
pub use loader::{CandidateLoader, GenomicUniqueness, MarkerCandidates};
pub use par::ParExclusions;
pub use pipeline::{MarkerRunStats, PlaceholderRunStats, RunContext, TableRunStats};
pub use provider::{GeneModelProvider, GenomicTier, SequenceCategory};
pub use representative::{RepresentativeSet, Representatives, Selector};
pub use source::{AnySource, DataSource, SqliteSource, TsvSource};
