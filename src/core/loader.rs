//! Candidate loader
//!
//! Groups annotation rows by marker and sorts each sequence into the pools the
//! selector works from. Genomic candidates keep their full record because the
//! cascade needs counts and uniqueness; transcripts and polypeptides only keep
//! the longest sequence per bucket, since nothing shorter can ever win.

use std::collections::{HashMap, HashSet};

use crate::core::config::Config;
use crate::core::error::{CacheError, Result};
use crate::core::keys::{MarkerKey, SequenceKey};
use crate::core::provider::{
    BucketList, GeneModelProvider, GenomicClassifier, GenomicTier, SequenceTraits,
};
use crate::core::source::{AnnotationRow, GenomicMarkerRow};

/// Which markers each genomic sequence is associated with, globally
#[derive(Debug, Default, Clone)]
pub struct GenomicUniqueness {
    markers_by_sequence: HashMap<SequenceKey, HashSet<MarkerKey>>,
}

impl GenomicUniqueness {
    pub fn from_rows(rows: &[GenomicMarkerRow]) -> Self {
        let mut markers_by_sequence: HashMap<SequenceKey, HashSet<MarkerKey>> = HashMap::new();
        for row in rows {
            markers_by_sequence
                .entry(row.sequence_key)
                .or_default()
                .insert(row.marker_key);
        }
        Self {
            markers_by_sequence,
        }
    }

    /// Associated with exactly one marker
    pub fn is_unique(&self, sequence_key: SequenceKey) -> bool {
        self.markers_by_sequence
            .get(&sequence_key)
            .map(|markers| markers.len() == 1)
            .unwrap_or(false)
    }

    pub fn marker_count(&self, sequence_key: SequenceKey) -> usize {
        self.markers_by_sequence
            .get(&sequence_key)
            .map(|markers| markers.len())
            .unwrap_or(0)
    }
}

/// A genomic sequence under consideration for one marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenomicCandidate {
    pub sequence_key: SequenceKey,
    pub length: u64,
    pub unique: bool,
}

/// Genomic candidates of one marker, per provider tier
#[derive(Debug, Default, Clone)]
pub struct GenomicPools {
    pub vega: Vec<GenomicCandidate>,
    pub ensembl: Vec<GenomicCandidate>,
    pub ncbi: Vec<GenomicCandidate>,
    pub genbank: Vec<GenomicCandidate>,
}

impl GenomicPools {
    pub fn pool(&self, tier: GenomicTier) -> &[GenomicCandidate] {
        match tier {
            GenomicTier::GeneModel(GeneModelProvider::Vega) => &self.vega,
            GenomicTier::GeneModel(GeneModelProvider::Ensembl) => &self.ensembl,
            GenomicTier::GeneModel(GeneModelProvider::Ncbi) => &self.ncbi,
            GenomicTier::GenBank => &self.genbank,
        }
    }

    fn pool_mut(&mut self, tier: GenomicTier) -> &mut Vec<GenomicCandidate> {
        match tier {
            GenomicTier::GeneModel(GeneModelProvider::Vega) => &mut self.vega,
            GenomicTier::GeneModel(GeneModelProvider::Ensembl) => &mut self.ensembl,
            GenomicTier::GeneModel(GeneModelProvider::Ncbi) => &mut self.ncbi,
            GenomicTier::GenBank => &mut self.genbank,
        }
    }

    pub fn has_gene_models(&self) -> bool {
        !self.vega.is_empty() || !self.ensembl.is_empty() || !self.ncbi.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_gene_models() && self.genbank.is_empty()
    }

    /// Tier holding the sequence, if it is one of this marker's candidates
    pub fn tier_of(&self, sequence_key: SequenceKey) -> Option<GenomicTier> {
        [
            GenomicTier::GeneModel(GeneModelProvider::Vega),
            GenomicTier::GeneModel(GeneModelProvider::Ensembl),
            GenomicTier::GeneModel(GeneModelProvider::Ncbi),
            GenomicTier::GenBank,
        ]
        .into_iter()
        .find(|tier| self.pool(*tier).iter().any(|c| c.sequence_key == sequence_key))
    }
}

/// Longest sequence seen so far in a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketEntry {
    pub sequence_key: SequenceKey,
    pub length: u64,
}

/// Current-longest tracker per bucket rank
#[derive(Debug, Clone, Default)]
pub struct LongestPerBucket {
    best: Vec<Option<BucketEntry>>,
}

impl LongestPerBucket {
    pub fn with_buckets(count: usize) -> Self {
        Self {
            best: vec![None; count],
        }
    }

    /// Keep the entry only if strictly longer; ties keep the first seen
    pub fn offer(&mut self, rank: usize, sequence_key: SequenceKey, length: u64) {
        if rank >= self.best.len() {
            self.best.resize(rank + 1, None);
        }
        let slot = &mut self.best[rank];
        match slot {
            Some(current) if length <= current.length => {}
            _ => {
                *slot = Some(BucketEntry {
                    sequence_key,
                    length,
                })
            }
        }
    }

    /// Longest entry of the highest-priority non-empty bucket
    pub fn first_non_empty(&self) -> Option<BucketEntry> {
        self.best.iter().flatten().next().copied()
    }

    pub fn get(&self, rank: usize) -> Option<BucketEntry> {
        self.best.get(rank).copied().flatten()
    }
}

/// Everything the selector needs for one marker
#[derive(Debug, Clone)]
pub struct MarkerCandidates {
    pub marker_key: MarkerKey,
    pub genomic: GenomicPools,
    pub transcripts: LongestPerBucket,
    pub polypeptides: LongestPerBucket,
}

impl MarkerCandidates {
    fn new(marker_key: MarkerKey, transcripts: usize, polypeptides: usize) -> Self {
        Self {
            marker_key,
            genomic: GenomicPools::default(),
            transcripts: LongestPerBucket::with_buckets(transcripts),
            polypeptides: LongestPerBucket::with_buckets(polypeptides),
        }
    }
}

/// Sorts annotation rows into per-marker candidate pools
#[derive(Debug, Clone)]
pub struct CandidateLoader<'a> {
    genomic: GenomicClassifier,
    transcripts: BucketList,
    polypeptides: BucketList,
    uniqueness: &'a GenomicUniqueness,
    deleted_status_key: i64,
}

impl<'a> CandidateLoader<'a> {
    pub fn new(config: &Config, uniqueness: &'a GenomicUniqueness) -> Self {
        Self {
            genomic: GenomicClassifier::new(config),
            transcripts: BucketList::transcripts(config),
            polypeptides: BucketList::polypeptides(config),
            uniqueness,
            deleted_status_key: config.deleted_status_key,
        }
    }

    /// Iterate marker groups in the order markers are encountered
    ///
    /// Rows must already be grouped by marker; a marker that reappears after
    /// its group closed yields [`CacheError::UnsortedInput`].
    pub fn groups<'r>(&'r self, rows: &'r [AnnotationRow]) -> MarkerGroups<'r, 'a> {
        MarkerGroups {
            loader: self,
            rows,
            pos: 0,
            closed: HashSet::new(),
        }
    }

    fn add(&self, candidates: &mut MarkerCandidates, row: &AnnotationRow) {
        let length = row.length.unwrap_or(0).max(0) as u64;
        let traits = SequenceTraits {
            provider_key: row.provider_key,
            sequence_type_key: row.sequence_type_key,
            acc_id: &row.acc_id,
        };

        if let Some(tier) = self.genomic.classify(&traits) {
            candidates.genomic.pool_mut(tier).push(GenomicCandidate {
                sequence_key: row.sequence_key,
                length,
                unique: self.uniqueness.is_unique(row.sequence_key),
            });
        }

        if let Some(bucket) = self.transcripts.bucket_for(&traits) {
            candidates
                .transcripts
                .offer(bucket.rank, row.sequence_key, length);
        }

        if let Some(bucket) = self.polypeptides.bucket_for(&traits) {
            candidates
                .polypeptides
                .offer(bucket.rank, row.sequence_key, length);
        }
    }

    fn is_deleted(&self, row: &AnnotationRow) -> bool {
        row.status_key == Some(self.deleted_status_key)
    }
}

/// Iterator over contiguous marker groups
pub struct MarkerGroups<'r, 'a> {
    loader: &'r CandidateLoader<'a>,
    rows: &'r [AnnotationRow],
    pos: usize,
    closed: HashSet<MarkerKey>,
}

impl Iterator for MarkerGroups<'_, '_> {
    type Item = Result<MarkerCandidates>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rows.get(self.pos)?;
        let marker_key = first.marker_key;

        if !self.closed.insert(marker_key) {
            self.pos = self.rows.len();
            return Some(Err(CacheError::UnsortedInput { marker_key }));
        }

        let mut candidates = MarkerCandidates::new(
            marker_key,
            self.loader.transcripts.len(),
            self.loader.polypeptides.len(),
        );

        while let Some(row) = self.rows.get(self.pos) {
            if row.marker_key != marker_key {
                break;
            }
            if !self.loader.is_deleted(row) {
                self.loader.add(&mut candidates, row);
            }
            self.pos += 1;
        }

        Some(Ok(candidates))
    }
}
