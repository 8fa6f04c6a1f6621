//! Loader configuration
//!
//! Every schema key the engine needs (provider terms, sequence types,
//! vocabulary roots, conflict terms) lives here. Defaults match the MGD
//! production schema; a YAML file may override any subset.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{CacheError, Result};
use crate::core::provider::GeneModelProvider;

/// Provider term keys (`_SequenceProvider_key`) grouped by role
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderKeys {
    pub ensembl: Vec<i64>,
    pub ncbi: Vec<i64>,
    /// Empty in current schemas; VEGA gene models were retired
    pub vega: Vec<i64>,
    /// GenBank divisions accepted as genomic DNA
    pub genbank_dna: Vec<i64>,
    /// GenBank divisions accepted as non-EST transcripts
    pub genbank_rna: Vec<i64>,
    pub genbank_est: Vec<i64>,
    pub refseq: Vec<i64>,
    pub swissprot: Vec<i64>,
    pub trembl: Vec<i64>,
    /// DFCI, DoTS and NIA transcript assemblies
    pub minor_transcript: Vec<i64>,
}

impl Default for ProviderKeys {
    fn default() -> Self {
        Self {
            ensembl: vec![615429],
            ncbi: vec![706915],
            vega: Vec::new(),
            genbank_dna: vec![
                316380, 316376, 316379, 316375, 316377, 316374, 316373, 316378, 492451, 29320966,
            ],
            genbank_rna: vec![
                316380, 316379, 316375, 316377, 316374, 316373, 316378, 492451,
            ],
            genbank_est: vec![316376],
            refseq: vec![316372],
            swissprot: vec![316384],
            trembl: vec![316385],
            minor_transcript: Vec::new(),
        }
    }
}

impl ProviderKeys {
    pub fn gene_model_keys(&self, provider: GeneModelProvider) -> &[i64] {
        match provider {
            GeneModelProvider::Vega => &self.vega,
            GeneModelProvider::Ensembl => &self.ensembl,
            GeneModelProvider::Ncbi => &self.ncbi,
        }
    }
}

/// `_SequenceType_key` terms
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SequenceTypeKeys {
    pub dna: i64,
    pub rna: i64,
    pub polypeptide: i64,
}

impl Default for SequenceTypeKeys {
    fn default() -> Self {
        Self {
            dna: 316347,
            rna: 316346,
            polypeptide: 316348,
        }
    }
}

/// Logical DB keys identifying gene model accessions
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeneModelLdbs {
    pub ncbi: i64,
    pub ensembl: i64,
    pub vega: i64,
}

impl Default for GeneModelLdbs {
    fn default() -> Self {
        Self {
            ncbi: 59,
            ensembl: 60,
            vega: 85,
        }
    }
}

impl GeneModelLdbs {
    pub fn provider_for(&self, ldb_key: i64) -> Option<GeneModelProvider> {
        if ldb_key == self.ncbi {
            Some(GeneModelProvider::Ncbi)
        } else if ldb_key == self.ensembl {
            Some(GeneModelProvider::Ensembl)
        } else if ldb_key == self.vega {
            Some(GeneModelProvider::Vega)
        } else {
            None
        }
    }
}

/// `SEQ_Sequence_Assoc` qualifier keys
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssociationKeys {
    /// A transcript is transcribed from a genomic sequence
    pub transcribed_from: i64,
    /// A protein is translated from a transcript sequence
    pub translated_from: i64,
}

impl Default for AssociationKeys {
    fn default() -> Self {
        Self {
            transcribed_from: 5445464,
            translated_from: 5445465,
        }
    }
}

/// Feature type vocabulary roots
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeatureTypeKeys {
    pub all_feature_types_root: i64,
    pub ncrna_gene_root: i64,
}

impl Default for FeatureTypeKeys {
    fn default() -> Self {
        Self {
            all_feature_types_root: 6238159,
            ncrna_gene_root: 6238162,
        }
    }
}

/// Biotype conflict vocabulary terms
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConflictKeys {
    pub conflict: i64,
    pub no_conflict: i64,
    /// Written for sequences without a gene model verdict
    pub not_applicable: i64,
}

impl Default for ConflictKeys {
    fn default() -> Self {
        Self {
            conflict: 5420767,
            no_conflict: 5420769,
            not_applicable: 5420769,
        }
    }
}

/// `_Marker_Type_key` terms used by the biotype mapping hints
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MarkerTypeKeys {
    pub gene: i64,
    pub pseudogene: i64,
}

impl Default for MarkerTypeKeys {
    fn default() -> Self {
        Self {
            gene: 1,
            pseudogene: 7,
        }
    }
}

/// Names of the raw biotype vocabularies per gene model provider
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BiotypeVocabularyNames {
    pub ncbi: String,
    pub ensembl: String,
    pub vega: String,
}

impl Default for BiotypeVocabularyNames {
    fn default() -> Self {
        Self {
            ncbi: "BioType NCBI".to_string(),
            ensembl: "BioType Ensembl".to_string(),
            vega: "BioType VEGA".to_string(),
        }
    }
}

impl BiotypeVocabularyNames {
    pub fn name(&self, provider: GeneModelProvider) -> &str {
        match provider {
            GeneModelProvider::Ncbi => &self.ncbi,
            GeneModelProvider::Ensembl => &self.ensembl,
            GeneModelProvider::Vega => &self.vega,
        }
    }

    pub fn provider_for(&self, vocabulary: &str) -> Option<GeneModelProvider> {
        GeneModelProvider::all()
            .iter()
            .copied()
            .find(|p| self.name(*p).eq_ignore_ascii_case(vocabulary))
    }
}

/// Attributes of a "Not Loaded" placeholder sequence for one accession ldb
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PlaceholderProfile {
    pub logical_db_key: i64,
    pub sequence_type: i64,
    pub quality: i64,
    pub provider: i64,
    /// Virtual sequences have no record of their own at the provider
    pub is_virtual: bool,
}

/// Keys used when creating placeholder sequences for unmatched accessions
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaceholderKeys {
    /// "Not Loaded" sequence status
    pub not_loaded_status: i64,
    /// `_MGIType_key` of sequence accessions
    pub sequence_mgi_type: i64,
    pub mouse_organism: i64,
    pub mouse_source: i64,
    pub nonmouse_source: i64,
    pub profiles: Vec<PlaceholderProfile>,
}

impl Default for PlaceholderKeys {
    fn default() -> Self {
        let profile = |logical_db_key, sequence_type, quality, provider, is_virtual| PlaceholderProfile {
            logical_db_key,
            sequence_type,
            quality,
            provider,
            is_virtual,
        };
        Self {
            not_loaded_status: 316345,
            sequence_mgi_type: 19,
            mouse_organism: 1,
            mouse_source: 47395,
            nonmouse_source: 48166,
            profiles: vec![
                // GenBank, RefSeq, SwissProt, TrEMBL
                profile(9, 316349, 316341, 316380, false),
                profile(27, 316349, 316338, 316372, true),
                profile(13, 316348, 316338, 316384, true),
                profile(41, 316348, 316340, 316385, true),
            ],
        }
    }
}

impl PlaceholderKeys {
    pub fn profile(&self, logical_db_key: i64) -> Option<&PlaceholderProfile> {
        self.profiles.iter().find(|p| p.logical_db_key == logical_db_key)
    }

    /// Mouse or non-mouse molecular source
    pub fn source_for(&self, organism_key: i64) -> i64 {
        if organism_key == self.mouse_organism {
            self.mouse_source
        } else {
            self.nonmouse_source
        }
    }
}

/// Root loader configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub providers: ProviderKeys,
    pub sequence_types: SequenceTypeKeys,
    /// Sequences with this status never become representatives
    pub deleted_status_key: i64,
    pub gene_model_ldbs: GeneModelLdbs,
    /// Gene model providers taking part in the genomic cascade
    pub gene_model_tiers: Vec<GeneModelProvider>,
    pub associations: AssociationKeys,
    pub feature_types: FeatureTypeKeys,
    pub conflict: ConflictKeys,
    pub marker_types: MarkerTypeKeys,
    pub biotype_vocabularies: BiotypeVocabularyNames,
    pub placeholders: PlaceholderKeys,
    /// User key stamped on companion cache and placeholder rows
    pub user_key: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            providers: ProviderKeys::default(),
            sequence_types: SequenceTypeKeys::default(),
            deleted_status_key: 316343,
            gene_model_ldbs: GeneModelLdbs::default(),
            gene_model_tiers: vec![GeneModelProvider::Ensembl, GeneModelProvider::Ncbi],
            associations: AssociationKeys::default(),
            feature_types: FeatureTypeKeys::default(),
            conflict: ConflictKeys::default(),
            marker_types: MarkerTypeKeys::default(),
            biotype_vocabularies: BiotypeVocabularyNames::default(),
            placeholders: PlaceholderKeys::default(),
            user_key: 0,
        }
    }
}

impl Config {
    /// Load from a YAML file, or the defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                Self::from_yaml(&content)?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yml::from_str(content).map_err(|e| CacheError::config(e.to_string()))
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yml::to_string(self).map_err(|e| CacheError::config(e.to_string()))
    }

    pub fn is_tier_enabled(&self, provider: GeneModelProvider) -> bool {
        self.gene_model_tiers.contains(&provider)
    }

    /// Reject tier sets the cascade cannot honour
    pub fn validate(&self) -> Result<()> {
        for provider in &self.gene_model_tiers {
            if self.providers.gene_model_keys(*provider).is_empty() {
                return Err(CacheError::config(format!(
                    "gene model tier '{}' is enabled but providers.{} is empty",
                    provider,
                    provider.as_str().to_lowercase()
                )));
            }
        }
        let mut seen = self.gene_model_tiers.clone();
        seen.sort();
        seen.dedup();
        if seen.len() != self.gene_model_tiers.len() {
            return Err(CacheError::config("gene_model_tiers lists a provider twice"));
        }
        let mut ldbs: Vec<i64> = self
            .placeholders
            .profiles
            .iter()
            .map(|p| p.logical_db_key)
            .collect();
        ldbs.sort_unstable();
        ldbs.dedup();
        if ldbs.len() != self.placeholders.profiles.len() {
            return Err(CacheError::config("placeholders.profiles lists a logical DB twice"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(!config.is_tier_enabled(GeneModelProvider::Vega));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("deleted_status_key: 42\nconflict:\n  conflict: 9\n").unwrap();
        assert_eq!(config.deleted_status_key, 42);
        assert_eq!(config.conflict.conflict, 9);
        assert_eq!(config.conflict.no_conflict, 5420769);
        assert_eq!(config.providers.refseq, vec![316372]);
    }

    #[test]
    fn test_vega_tier_requires_provider_keys() {
        let config = Config::from_yaml("gene_model_tiers: [vega, ensembl, ncbi]\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("providers.vega"));

        let config = Config::from_yaml(
            "gene_model_tiers: [vega, ensembl, ncbi]\nproviders:\n  vega: [1865333]\n",
        )
        .unwrap();
        assert!(config.validate().is_ok());
        assert!(config.is_tier_enabled(GeneModelProvider::Vega));
    }

    #[test]
    fn test_duplicate_tier_rejected() {
        let config = Config::from_yaml("gene_model_tiers: [ncbi, ncbi]\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ldb_and_vocabulary_lookup() {
        let config = Config::default();
        assert_eq!(
            config.gene_model_ldbs.provider_for(59),
            Some(GeneModelProvider::Ncbi)
        );
        assert_eq!(config.gene_model_ldbs.provider_for(9), None);
        assert_eq!(
            config.biotype_vocabularies.provider_for("biotype ensembl"),
            Some(GeneModelProvider::Ensembl)
        );
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = Config::default();
        let yaml = config.to_yaml().unwrap();
        let back = Config::from_yaml(&yaml).unwrap();
        assert_eq!(back.gene_model_tiers, config.gene_model_tiers);
        assert_eq!(back.providers.genbank_dna, config.providers.genbank_dna);
    }

    #[test]
    fn test_placeholder_profiles() {
        let keys = Config::default().placeholders;
        let genbank = keys.profile(9).unwrap();
        assert_eq!(genbank.provider, 316380);
        assert!(!genbank.is_virtual);
        assert!(keys.profile(13).unwrap().is_virtual);
        assert!(keys.profile(60).is_none());
        assert_eq!(keys.source_for(1), 47395);
        assert_eq!(keys.source_for(2), 48166);
    }

    #[test]
    fn test_duplicate_placeholder_ldb_rejected() {
        let config = Config::from_yaml(
            "placeholders:\n  profiles:\n    - {logical_db_key: 9, sequence_type: 1, quality: 1, provider: 1, is_virtual: false}\n    - {logical_db_key: 9, sequence_type: 2, quality: 2, provider: 2, is_virtual: true}\n",
        )
        .unwrap();
        assert!(config.validate().is_err());
    }
}
