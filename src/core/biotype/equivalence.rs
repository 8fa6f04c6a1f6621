//! Raw biotype equivalence sets
//!
//! Each provider vocabulary maps a lower-cased raw biotype onto the set of
//! feature type terms it is compatible with. Two pseudo-terms expand through
//! the feature type hierarchy, and raw terms tied to the gene or pseudogene
//! marker type pick up the matching canonical feature type.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use log::{info, warn};

use crate::core::config::Config;
use crate::core::error::{CacheError, Result};
use crate::core::keys::TermKey;
use crate::core::provider::GeneModelProvider;
use crate::core::source::{BiotypeMappingRow, TermRow};

use super::hierarchy::TermHierarchy;

/// Expands to every descendant of the feature type root
pub const ALL_FEATURE_TYPES: &str = "all feature types";
/// Expands to the non-coding RNA subtree when the mapping asks for children
pub const NCRNA_GENE: &str = "non-coding rna gene";
/// Companion term for raw biotypes of pseudogenes
pub const PSEUDOGENIC_REGION: &str = "pseudogenic region";
/// Companion term for raw biotypes of genes
pub const GENE: &str = "gene";

/// Lower-cased raw biotype -> equivalent feature type keys, per provider
#[derive(Debug, Clone, Default)]
pub struct EquivalenceTable {
    by_provider: HashMap<GeneModelProvider, BTreeMap<String, BTreeSet<TermKey>>>,
}

/// Expansion sets shared by every vocabulary
struct Expansions {
    term_keys: HashMap<String, TermKey>,
    all_feature_types: BTreeSet<TermKey>,
    ncrna: BTreeSet<TermKey>,
}

impl Expansions {
    fn new(feature_types: &[TermRow], hierarchy: &TermHierarchy, config: &Config) -> Self {
        let term_keys: HashMap<String, TermKey> = feature_types
            .iter()
            .map(|t| (t.term.to_lowercase(), t.term_key))
            .collect();

        let all_feature_types = hierarchy.descendants(config.feature_types.all_feature_types_root);

        let ncrna_root = config.feature_types.ncrna_gene_root;
        let mut ncrna = hierarchy.descendants(ncrna_root);
        ncrna.insert(ncrna_root);
        if let Some(gene) = term_keys.get(GENE) {
            ncrna.insert(*gene);
        }

        Self {
            term_keys,
            all_feature_types,
            ncrna,
        }
    }

    fn resolve(
        &self,
        term: &str,
        uses_children: bool,
        vocabulary: &str,
        into: &mut BTreeSet<TermKey>,
    ) -> Result<()> {
        if term == ALL_FEATURE_TYPES {
            into.extend(self.all_feature_types.iter().copied());
        } else if term == NCRNA_GENE && uses_children {
            into.extend(self.ncrna.iter().copied());
        } else if let Some(key) = self.term_keys.get(term) {
            into.insert(*key);
        } else {
            return Err(CacheError::UnresolvedEquivalence {
                vocabulary: vocabulary.to_string(),
                term: term.to_string(),
            });
        }
        Ok(())
    }
}

impl EquivalenceTable {
    /// Build every provider's table; an unresolvable mapping term is fatal
    pub fn build(
        mappings: &[BiotypeMappingRow],
        feature_types: &[TermRow],
        hierarchy: &TermHierarchy,
        config: &Config,
    ) -> Result<Self> {
        let expansions = Expansions::new(feature_types, hierarchy, config);

        let raw_terms_of = |marker_type: i64| -> HashSet<String> {
            mappings
                .iter()
                .filter(|m| m.marker_type_key == Some(marker_type))
                .map(|m| m.raw_term.to_lowercase())
                .collect()
        };
        let pseudogene_raw = raw_terms_of(config.marker_types.pseudogene);
        let gene_raw = raw_terms_of(config.marker_types.gene);

        let mut table = EquivalenceTable::default();
        let mut skipped: BTreeSet<&str> = BTreeSet::new();

        for row in mappings {
            let Some(provider) = config.biotype_vocabularies.provider_for(&row.vocabulary) else {
                skipped.insert(&row.vocabulary);
                continue;
            };

            let raw_term = row.raw_term.to_lowercase();
            let mut terms = vec![row.feature_type_term.to_lowercase()];
            if pseudogene_raw.contains(&raw_term) {
                terms.push(PSEUDOGENIC_REGION.to_string());
            } else if gene_raw.contains(&raw_term) {
                terms.push(GENE.to_string());
            }

            let equivalents = table
                .by_provider
                .entry(provider)
                .or_default()
                .entry(raw_term)
                .or_default();
            for term in &terms {
                expansions.resolve(term, row.uses_children(), &row.vocabulary, equivalents)?;
            }
        }

        for vocabulary in skipped {
            warn!("Ignoring biotype mappings of unknown vocabulary '{}'", vocabulary);
        }
        for provider in GeneModelProvider::all() {
            info!(
                "{} raw biotype equivalences: {}",
                config.biotype_vocabularies.name(*provider),
                table.len(*provider)
            );
        }

        Ok(table)
    }

    /// Equivalence set of a raw biotype, compared case-insensitively
    pub fn lookup(&self, provider: GeneModelProvider, raw_biotype: &str) -> Option<&BTreeSet<TermKey>> {
        self.by_provider
            .get(&provider)?
            .get(&raw_biotype.to_lowercase())
    }

    pub fn len(&self, provider: GeneModelProvider) -> usize {
        self.by_provider.get(&provider).map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.by_provider.values().all(|t| t.is_empty())
    }
}
