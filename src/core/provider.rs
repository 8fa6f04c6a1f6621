//! Sequence providers, categories and accession subtypes
//!
//! Provider term keys are schema data from [`Config`]; this module turns them
//! into typed classifications so the selection code never sees a magic number.

use serde::{Deserialize, Serialize};

use crate::core::config::Config;

/// Providers of gene model sequences, in the genomic cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneModelProvider {
    Vega,
    Ensembl,
    Ncbi,
}

impl GeneModelProvider {
    pub fn all() -> &'static [GeneModelProvider] {
        &[
            GeneModelProvider::Vega,
            GeneModelProvider::Ensembl,
            GeneModelProvider::Ncbi,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GeneModelProvider::Vega => "VEGA",
            GeneModelProvider::Ensembl => "Ensembl",
            GeneModelProvider::Ncbi => "NCBI",
        }
    }
}

impl std::fmt::Display for GeneModelProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for GeneModelProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "vega" => Ok(GeneModelProvider::Vega),
            "ensembl" => Ok(GeneModelProvider::Ensembl),
            "ncbi" => Ok(GeneModelProvider::Ncbi),
            _ => Err(format!("Unknown gene model provider: {}", s)),
        }
    }
}

/// Provider tier of a genomic candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenomicTier {
    GeneModel(GeneModelProvider),
    GenBank,
}

impl GenomicTier {
    /// Transcripts and proteins must be co-derived from the same gene model
    pub fn is_linked(&self) -> bool {
        matches!(
            self,
            GenomicTier::GeneModel(GeneModelProvider::Vega)
                | GenomicTier::GeneModel(GeneModelProvider::Ensembl)
        )
    }
}

impl std::fmt::Display for GenomicTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenomicTier::GeneModel(p) => write!(f, "{}", p),
            GenomicTier::GenBank => write!(f, "GenBank"),
        }
    }
}

/// Sequence category a representative is chosen for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequenceCategory {
    Genomic,
    Transcript,
    Polypeptide,
}

impl SequenceCategory {
    /// Representative qualifier term used in the cache
    pub fn qualifier_term(&self) -> &'static str {
        match self {
            SequenceCategory::Genomic => "genomic",
            SequenceCategory::Transcript => "transcript",
            SequenceCategory::Polypeptide => "polypeptide",
        }
    }
}

impl std::fmt::Display for SequenceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.qualifier_term())
    }
}

impl std::str::FromStr for SequenceCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "genomic" => Ok(SequenceCategory::Genomic),
            "transcript" => Ok(SequenceCategory::Transcript),
            "polypeptide" | "protein" => Ok(SequenceCategory::Polypeptide),
            _ => Err(format!("Unknown sequence category: {}", s)),
        }
    }
}

// =========================================================================
// Accession subtypes
// =========================================================================

/// RefSeq accession subtype, taken from the accession prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessionSubtype {
    Nm,
    Nr,
    Xm,
    Xr,
    Np,
    Xp,
}

const ACCESSION_PREFIXES: &[(&str, AccessionSubtype)] = &[
    ("NM_", AccessionSubtype::Nm),
    ("NR_", AccessionSubtype::Nr),
    ("XM_", AccessionSubtype::Xm),
    ("XR_", AccessionSubtype::Xr),
    ("NP_", AccessionSubtype::Np),
    ("XP_", AccessionSubtype::Xp),
];

impl AccessionSubtype {
    /// Classify an accession id by its prefix (case-insensitive)
    pub fn classify(acc_id: &str) -> Option<AccessionSubtype> {
        let upper = acc_id.trim().to_uppercase();
        ACCESSION_PREFIXES
            .iter()
            .find(|(prefix, _)| upper.starts_with(prefix))
            .map(|(_, subtype)| *subtype)
    }
}

// =========================================================================
// Provider buckets
// =========================================================================

/// A sequence as seen by the bucket matchers
#[derive(Debug, Clone, Copy)]
pub struct SequenceTraits<'a> {
    pub provider_key: i64,
    pub sequence_type_key: i64,
    pub acc_id: &'a str,
}

/// One tier of the transcript or polypeptide priority list
#[derive(Debug, Clone)]
pub struct ProviderBucket {
    /// Short label for traces
    pub name: &'static str,
    /// Provider term keys accepted by this bucket
    pub providers: Vec<i64>,
    /// Required sequence type, if any
    pub sequence_type: Option<i64>,
    /// Accepted accession subtypes; empty accepts any accession
    pub subtypes: &'static [AccessionSubtype],
    /// Lower is preferred
    pub rank: usize,
}

impl ProviderBucket {
    pub fn matches(&self, seq: &SequenceTraits<'_>) -> bool {
        if !self.providers.contains(&seq.provider_key) {
            return false;
        }
        if let Some(type_key) = self.sequence_type {
            if type_key != seq.sequence_type_key {
                return false;
            }
        }
        if self.subtypes.is_empty() {
            return true;
        }
        AccessionSubtype::classify(seq.acc_id)
            .map(|s| self.subtypes.contains(&s))
            .unwrap_or(false)
    }
}

/// Ordered bucket list; a sequence lands in the first bucket that matches
#[derive(Debug, Clone)]
pub struct BucketList {
    buckets: Vec<ProviderBucket>,
}

impl BucketList {
    fn new(buckets: Vec<ProviderBucket>) -> Self {
        let buckets = buckets
            .into_iter()
            .filter(|b| !b.providers.is_empty())
            .enumerate()
            .map(|(rank, mut b)| {
                b.rank = rank;
                b
            })
            .collect();
        Self { buckets }
    }

    /// Transcript priority: RefSeq NM/NR, GenBank RNA (not EST), RefSeq XM/XR,
    /// minor providers, GenBank EST
    pub fn transcripts(config: &Config) -> Self {
        let p = &config.providers;
        let rna = Some(config.sequence_types.rna);
        Self::new(vec![
            ProviderBucket {
                name: "RefSeq NM/NR",
                providers: p.refseq.clone(),
                sequence_type: None,
                subtypes: &[AccessionSubtype::Nm, AccessionSubtype::Nr],
                rank: 0,
            },
            ProviderBucket {
                name: "GenBank RNA",
                providers: p.genbank_rna.clone(),
                sequence_type: rna,
                subtypes: &[],
                rank: 0,
            },
            ProviderBucket {
                name: "RefSeq XM/XR",
                providers: p.refseq.clone(),
                sequence_type: None,
                subtypes: &[AccessionSubtype::Xm, AccessionSubtype::Xr],
                rank: 0,
            },
            ProviderBucket {
                name: "DFCI/DoTS/NIA",
                providers: p.minor_transcript.clone(),
                sequence_type: None,
                subtypes: &[],
                rank: 0,
            },
            ProviderBucket {
                name: "GenBank EST",
                providers: p.genbank_est.clone(),
                sequence_type: rna,
                subtypes: &[],
                rank: 0,
            },
        ])
    }

    /// Polypeptide priority: SwissProt, RefSeq NP, TrEMBL, RefSeq XP
    pub fn polypeptides(config: &Config) -> Self {
        let p = &config.providers;
        Self::new(vec![
            ProviderBucket {
                name: "SwissProt",
                providers: p.swissprot.clone(),
                sequence_type: None,
                subtypes: &[],
                rank: 0,
            },
            ProviderBucket {
                name: "RefSeq NP",
                providers: p.refseq.clone(),
                sequence_type: None,
                subtypes: &[AccessionSubtype::Np],
                rank: 0,
            },
            ProviderBucket {
                name: "TrEMBL",
                providers: p.trembl.clone(),
                sequence_type: None,
                subtypes: &[],
                rank: 0,
            },
            ProviderBucket {
                name: "RefSeq XP",
                providers: p.refseq.clone(),
                sequence_type: None,
                subtypes: &[AccessionSubtype::Xp],
                rank: 0,
            },
        ])
    }

    /// First bucket accepting the sequence
    pub fn bucket_for(&self, seq: &SequenceTraits<'_>) -> Option<&ProviderBucket> {
        self.buckets.iter().find(|b| b.matches(seq))
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProviderBucket> {
        self.buckets.iter()
    }
}

// =========================================================================
// Genomic classification
// =========================================================================

/// Maps provider keys onto genomic tiers for the enabled tier set
#[derive(Debug, Clone)]
pub struct GenomicClassifier {
    tiers: Vec<(GeneModelProvider, Vec<i64>)>,
    genbank_dna: Vec<i64>,
    dna_type_key: i64,
}

impl GenomicClassifier {
    pub fn new(config: &Config) -> Self {
        let tiers = config
            .gene_model_tiers
            .iter()
            .map(|p| (*p, config.providers.gene_model_keys(*p).to_vec()))
            .collect();
        Self {
            tiers,
            genbank_dna: config.providers.genbank_dna.clone(),
            dna_type_key: config.sequence_types.dna,
        }
    }

    /// Genomic tier of the sequence, if it is a genomic candidate at all
    pub fn classify(&self, seq: &SequenceTraits<'_>) -> Option<GenomicTier> {
        for (provider, keys) in &self.tiers {
            if keys.contains(&seq.provider_key) {
                return Some(GenomicTier::GeneModel(*provider));
            }
        }
        if self.genbank_dna.contains(&seq.provider_key) && seq.sequence_type_key == self.dna_type_key
        {
            return Some(GenomicTier::GenBank);
        }
        None
    }
}
