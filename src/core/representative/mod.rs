//! Representative sequence selection
//!
//! For each marker at most one genomic, one transcript and one polypeptide
//! sequence is chosen. The genomic cascade lives in [`genomic`]; transcript
//! and polypeptide picks either follow the gene-model links of an
//! Ensembl/VEGA genomic representative ([`linked`]) or walk the tiered
//! provider buckets built by the loader.

pub mod genomic;
pub mod linked;

use std::collections::{BTreeMap, HashMap};

use log::{debug, warn};

use crate::core::error::Result;
use crate::core::keys::{MarkerKey, SequenceKey};
use crate::core::loader::MarkerCandidates;
use crate::core::provider::SequenceCategory;
use crate::core::source::OverrideRow;

pub use genomic::{select_genomic, GenomicChoice, SelectionCase};
pub use linked::{resolve_linked, LinkedPair, SequenceLinks};

/// At most one representative per category for one marker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepresentativeSet {
    pub genomic: Option<SequenceKey>,
    pub transcript: Option<SequenceKey>,
    pub polypeptide: Option<SequenceKey>,
}

impl RepresentativeSet {
    pub fn get(&self, category: SequenceCategory) -> Option<SequenceKey> {
        match category {
            SequenceCategory::Genomic => self.genomic,
            SequenceCategory::Transcript => self.transcript,
            SequenceCategory::Polypeptide => self.polypeptide,
        }
    }

    fn set(&mut self, category: SequenceCategory, sequence_key: SequenceKey) {
        match category {
            SequenceCategory::Genomic => self.genomic = Some(sequence_key),
            SequenceCategory::Transcript => self.transcript = Some(sequence_key),
            SequenceCategory::Polypeptide => self.polypeptide = Some(sequence_key),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.genomic.is_none() && self.transcript.is_none() && self.polypeptide.is_none()
    }

    /// Category this sequence represents, checked genomic first
    pub fn category_of(&self, sequence_key: SequenceKey) -> Option<SequenceCategory> {
        [
            SequenceCategory::Genomic,
            SequenceCategory::Transcript,
            SequenceCategory::Polypeptide,
        ]
        .into_iter()
        .find(|c| self.get(*c) == Some(sequence_key))
    }
}

/// Representatives of every marker in a run
#[derive(Debug, Clone, Default)]
pub struct Representatives {
    by_marker: BTreeMap<MarkerKey, RepresentativeSet>,
}

impl Representatives {
    pub fn insert(&mut self, marker_key: MarkerKey, set: RepresentativeSet) {
        if !set.is_empty() {
            self.by_marker.insert(marker_key, set);
        }
    }

    pub fn get(&self, marker_key: MarkerKey) -> Option<&RepresentativeSet> {
        self.by_marker.get(&marker_key)
    }

    /// Qualifier category of a (marker, sequence) pair, if representative
    pub fn category_of(&self, marker_key: MarkerKey, sequence_key: SequenceKey) -> Option<SequenceCategory> {
        self.get(marker_key)
            .and_then(|set| set.category_of(sequence_key))
    }

    /// Number of markers with a representative in the category
    pub fn count(&self, category: SequenceCategory) -> usize {
        self.by_marker
            .values()
            .filter(|set| set.get(category).is_some())
            .count()
    }

    pub fn len(&self) -> usize {
        self.by_marker.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_marker.is_empty()
    }
}

/// Administrator-forced representatives per marker and category
#[derive(Debug, Clone, Default)]
pub struct CuratedOverrides {
    by_marker: HashMap<MarkerKey, RepresentativeSet>,
}

impl CuratedOverrides {
    /// The first override for a marker/category wins
    pub fn from_rows(rows: &[OverrideRow]) -> Self {
        let mut by_marker: HashMap<MarkerKey, RepresentativeSet> = HashMap::new();
        for row in rows {
            let set = by_marker.entry(row.marker_key).or_default();
            match set.get(row.category) {
                Some(existing) => warn!(
                    "Ignoring duplicate {} override for marker {}: keeping {}, dropping {}",
                    row.category, row.marker_key, existing, row.sequence_key
                ),
                None => set.set(row.category, row.sequence_key),
            }
        }
        Self { by_marker }
    }

    pub fn get(&self, marker_key: MarkerKey, category: SequenceCategory) -> Option<SequenceKey> {
        self.by_marker
            .get(&marker_key)
            .and_then(|set| set.get(category))
    }

    pub fn len(&self) -> usize {
        self.by_marker.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_marker.is_empty()
    }
}

/// Per-marker selection over the run's shared lookups
#[derive(Debug, Clone, Copy)]
pub struct Selector<'a> {
    links: &'a SequenceLinks,
    overrides: &'a CuratedOverrides,
}

impl<'a> Selector<'a> {
    pub fn new(links: &'a SequenceLinks, overrides: &'a CuratedOverrides) -> Self {
        Self { links, overrides }
    }

    /// Choose the representative set for one marker
    pub fn select(&self, candidates: &MarkerCandidates) -> Result<RepresentativeSet> {
        let marker_key = candidates.marker_key;
        let mut set = RepresentativeSet::default();

        let genomic = self.genomic_choice(candidates);
        match &genomic {
            Some(choice) => debug!(
                "marker {}: genomic {} ({}, {}{})",
                marker_key,
                choice.sequence_key,
                choice
                    .tier
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| "unclassified".to_string()),
                choice.case,
                if choice.compared { ", Ensembl vs NCBI by length" } else { "" }
            ),
            None => debug!("marker {}: no genomic representative", marker_key),
        }
        set.genomic = genomic.map(|c| c.sequence_key);

        let linked = match genomic.filter(|c| c.is_linked()) {
            Some(choice) => resolve_linked(self.links, marker_key, choice.sequence_key)?,
            None => LinkedPair::default(),
        };

        set.polypeptide = self
            .overrides
            .get(marker_key, SequenceCategory::Polypeptide)
            .or(linked.polypeptide)
            .or_else(|| candidates.polypeptides.first_non_empty().map(|e| e.sequence_key));

        set.transcript = self
            .overrides
            .get(marker_key, SequenceCategory::Transcript)
            .or(linked.transcript)
            .or_else(|| candidates.transcripts.first_non_empty().map(|e| e.sequence_key));

        debug!(
            "marker {}: transcript {:?}, polypeptide {:?}",
            marker_key, set.transcript, set.polypeptide
        );
        Ok(set)
    }

    fn genomic_choice(&self, candidates: &MarkerCandidates) -> Option<GenomicChoice> {
        match self
            .overrides
            .get(candidates.marker_key, SequenceCategory::Genomic)
        {
            Some(sequence_key) => Some(GenomicChoice {
                sequence_key,
                tier: candidates.genomic.tier_of(sequence_key),
                case: SelectionCase::Curated,
                compared: false,
            }),
            None => select_genomic(&candidates.genomic),
        }
    }
}
