//! Pseudo-autosomal region cleanup
//!
//! NCBI genes genetically mapped to `XY` carry gene models on both X and Y.
//! A marker whose symbol ends in `X` (or `Y`) only belongs to the copy on
//! the matching chromosome, so the crossed marker/sequence pairs are dropped
//! from the marker cache.

use std::collections::HashSet;

use log::debug;

use crate::core::keys::{MarkerKey, SequenceKey};
use crate::core::source::ParFeatureRow;

const PAR_CHROMOSOME: &str = "XY";

/// Marker/sequence pairs excluded from the cache
#[derive(Debug, Clone, Default)]
pub struct ParExclusions {
    pairs: HashSet<(MarkerKey, SequenceKey)>,
}

/// True when the gene model sits on the chromosome the symbol does not name
pub fn is_crossed(row: &ParFeatureRow) -> bool {
    if !row.genetic_chromosome.trim().eq_ignore_ascii_case(PAR_CHROMOSOME) {
        return false;
    }
    let symbol_chromosome = row
        .symbol
        .trim()
        .chars()
        .last()
        .map(|c| c.to_ascii_uppercase());
    let genomic = row.genomic_chromosome.trim().to_ascii_uppercase();

    matches!(
        (genomic.as_str(), symbol_chromosome),
        ("Y", Some('X')) | ("X", Some('Y'))
    )
}

impl ParExclusions {
    pub fn from_rows(rows: &[ParFeatureRow]) -> Self {
        let pairs = rows
            .iter()
            .filter(|row| is_crossed(row))
            .inspect(|row| {
                debug!(
                    "PAR cleanup drops marker {} ({}) / sequence {} on {}",
                    row.marker_key, row.symbol, row.sequence_key, row.genomic_chromosome
                )
            })
            .map(|row| (row.marker_key, row.sequence_key))
            .collect();
        Self { pairs }
    }

    pub fn excludes(&self, marker_key: MarkerKey, sequence_key: SequenceKey) -> bool {
        self.pairs.contains(&(marker_key, sequence_key))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
