//! Biotype conflict verdicts
//!
//! A marker's gene models agree when their equivalence sets share at least
//! one feature type; the marker agrees with them when exactly one of those
//! shared types is among its curated direct feature types.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{error, warn};
use serde::Serialize;

use crate::core::config::{Config, ConflictKeys};
use crate::core::keys::{MarkerKey, SequenceKey, TermKey};
use crate::core::provider::GeneModelProvider;
use crate::core::source::{GeneModelRow, MarkerFeatureTypeRow};

use super::equivalence::EquivalenceTable;

/// Raw biotype text used when the provider supplied none
pub const NULL_BIOTYPE: &str = "null";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictVerdict {
    Conflict,
    NoConflict,
}

impl ConflictVerdict {
    pub fn term_key(&self, keys: &ConflictKeys) -> i64 {
        match self {
            ConflictVerdict::Conflict => keys.conflict,
            ConflictVerdict::NoConflict => keys.no_conflict,
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ConflictVerdict::Conflict)
    }
}

impl std::fmt::Display for ConflictVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictVerdict::Conflict => write!(f, "conflict"),
            ConflictVerdict::NoConflict => write!(f, "no conflict"),
        }
    }
}

/// Gene model record with its resolved equivalence set
#[derive(Debug, Clone)]
struct ResolvedGeneModel<'t> {
    sequence_key: SequenceKey,
    raw_biotype: String,
    equivalents: &'t BTreeSet<TermKey>,
}

/// A gene model whose raw biotype has no equivalence entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedBiotype {
    pub marker_key: MarkerKey,
    pub sequence_key: SequenceKey,
    pub logical_db_key: i64,
    pub raw_biotype: String,
}

/// Verdict for one marker, with the sets that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkerVerdict {
    pub marker_key: MarkerKey,
    pub verdict: ConflictVerdict,
    pub gene_models: usize,
    pub gene_model_terms: BTreeSet<TermKey>,
    pub direct_terms: BTreeSet<TermKey>,
}

/// Conflict value and raw biotype of one (marker, sequence) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiotypeEntry {
    pub verdict: ConflictVerdict,
    pub raw_biotype: String,
}

/// Every verdict of a run, keyed for the emitter
#[derive(Debug, Clone, Default)]
pub struct BiotypeLookup {
    entries: HashMap<(MarkerKey, SequenceKey), BiotypeEntry>,
    verdicts: BTreeMap<MarkerKey, MarkerVerdict>,
    unresolved: Vec<UnresolvedBiotype>,
    without_direct_type: Vec<MarkerKey>,
}

impl BiotypeLookup {
    pub fn get(&self, marker_key: MarkerKey, sequence_key: SequenceKey) -> Option<&BiotypeEntry> {
        self.entries.get(&(marker_key, sequence_key))
    }

    pub fn verdicts(&self) -> impl Iterator<Item = &MarkerVerdict> {
        self.verdicts.values()
    }

    pub fn verdict(&self, marker_key: MarkerKey) -> Option<ConflictVerdict> {
        self.verdicts.get(&marker_key).map(|v| v.verdict)
    }

    pub fn unresolved(&self) -> &[UnresolvedBiotype] {
        &self.unresolved
    }

    /// Markers with gene models but no curated direct feature type
    pub fn without_direct_type(&self) -> &[MarkerKey] {
        &self.without_direct_type
    }

    pub fn conflict_count(&self) -> usize {
        self.verdicts.values().filter(|v| v.verdict.is_conflict()).count()
    }

    pub fn marker_count(&self) -> usize {
        self.verdicts.len()
    }
}

/// Intersection across gene models, then with the direct types
pub fn decide(
    gene_model_sets: &[&BTreeSet<TermKey>],
    direct_terms: &BTreeSet<TermKey>,
) -> (ConflictVerdict, BTreeSet<TermKey>) {
    let mut sets = gene_model_sets.iter();
    let mut shared: BTreeSet<TermKey> = match sets.next() {
        Some(first) => (*first).clone(),
        None => BTreeSet::new(),
    };
    for set in sets {
        shared = shared.intersection(set).copied().collect();
    }

    if shared.is_empty() {
        return (ConflictVerdict::Conflict, shared);
    }

    let verdict = if shared.intersection(direct_terms).count() == 1 {
        ConflictVerdict::NoConflict
    } else {
        ConflictVerdict::Conflict
    };
    (verdict, shared)
}

/// Compute verdicts for every marker with both gene models and direct types
pub fn evaluate(
    gene_models: &[GeneModelRow],
    direct_types: &[MarkerFeatureTypeRow],
    equivalences: &EquivalenceTable,
    config: &Config,
) -> BiotypeLookup {
    let mut lookup = BiotypeLookup::default();
    let mut by_marker: BTreeMap<MarkerKey, Vec<ResolvedGeneModel<'_>>> = BTreeMap::new();

    for row in gene_models {
        let raw_biotype = row
            .raw_biotype
            .clone()
            .unwrap_or_else(|| NULL_BIOTYPE.to_string());

        let provider: Option<GeneModelProvider> = config
            .gene_model_ldbs
            .provider_for(row.logical_db_key)
            .filter(|p| config.is_tier_enabled(*p));
        let Some(provider) = provider else {
            error!(
                "Invalid ldbKey for sequenceKey: {}, ldbKey: {}, rawBiotype: {}",
                row.sequence_key, row.logical_db_key, raw_biotype
            );
            continue;
        };

        match equivalences.lookup(provider, &raw_biotype) {
            Some(equivalents) => by_marker.entry(row.marker_key).or_default().push(
                ResolvedGeneModel {
                    sequence_key: row.sequence_key,
                    raw_biotype,
                    equivalents,
                },
            ),
            None => {
                error!(
                    "Unresolved raw biotype: sequenceKey: {}, ldbKey: {}, rawBiotype: {}",
                    row.sequence_key, row.logical_db_key, raw_biotype
                );
                lookup.unresolved.push(UnresolvedBiotype {
                    marker_key: row.marker_key,
                    sequence_key: row.sequence_key,
                    logical_db_key: row.logical_db_key,
                    raw_biotype,
                });
            }
        }
    }

    let mut direct: BTreeMap<MarkerKey, BTreeSet<TermKey>> = BTreeMap::new();
    for row in direct_types {
        direct.entry(row.marker_key).or_default().insert(row.term_key);
    }

    for marker_key in by_marker.keys() {
        if !direct.contains_key(marker_key) {
            warn!("Marker {} has gene models but no direct feature type", marker_key);
            lookup.without_direct_type.push(*marker_key);
        }
    }

    for (marker_key, direct_terms) in direct {
        let Some(models) = by_marker.get(&marker_key) else {
            continue;
        };

        let sets: Vec<&BTreeSet<TermKey>> = models.iter().map(|m| m.equivalents).collect();
        let (verdict, gene_model_terms) = decide(&sets, &direct_terms);

        for model in models {
            lookup
                .entries
                .entry((marker_key, model.sequence_key))
                .or_insert_with(|| BiotypeEntry {
                    verdict,
                    raw_biotype: model.raw_biotype.clone(),
                });
        }

        lookup.verdicts.insert(
            marker_key,
            MarkerVerdict {
                marker_key,
                verdict,
                gene_models: models.len(),
                gene_model_terms,
                direct_terms,
            },
        );
    }

    lookup
}
