//! Database key aliases shared across the engine

/// `_Marker_key`
pub type MarkerKey = i64;

/// `_Sequence_key`
pub type SequenceKey = i64;

/// `_Term_key` of any controlled vocabulary term
pub type TermKey = i64;
