//! Genomic representative cascade
//!
//! Gene-model providers are consulted tier by tier. At every tier VEGA (when
//! enabled) is tried on its own first, then Ensembl and NCBI are weighed as a
//! pair where the shorter sequence wins and NCBI takes ties. GenBank DNA only
//! matters for markers with no gene models at all.

use crate::core::keys::SequenceKey;
use crate::core::loader::{GenomicCandidate, GenomicPools};
use crate::core::provider::{GeneModelProvider, GenomicTier};

/// Cascade branch that produced a genomic representative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionCase {
    /// No gene models; longest GenBank sequence tied to this marker only
    GenBankLongestUnique,
    /// No gene models and no unique GenBank sequence
    GenBankLongest,
    /// The provider has one sequence and it belongs to this marker only
    SingleUnique,
    /// Shortest of the provider's sequences that belong to this marker only
    ShortestUnique,
    /// The provider has one sequence, shared with other markers
    Single,
    /// Shortest of several shared sequences
    ShortestShared,
    /// Administrator-curated override
    Curated,
}

impl std::fmt::Display for SelectionCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionCase::GenBankLongestUnique => write!(f, "longest unique GenBank"),
            SelectionCase::GenBankLongest => write!(f, "longest GenBank"),
            SelectionCase::SingleUnique => write!(f, "single unique gene model"),
            SelectionCase::ShortestUnique => write!(f, "shortest unique gene model"),
            SelectionCase::Single => write!(f, "single gene model"),
            SelectionCase::ShortestShared => write!(f, "shortest shared gene model"),
            SelectionCase::Curated => write!(f, "curated override"),
        }
    }
}

/// The genomic representative and how it was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenomicChoice {
    pub sequence_key: SequenceKey,
    /// `None` for curated sequences outside the marker's candidate pools
    pub tier: Option<GenomicTier>,
    pub case: SelectionCase,
    /// Both Ensembl and NCBI qualified and lengths decided the winner
    pub compared: bool,
}

impl GenomicChoice {
    /// Transcript and polypeptide must come from the same gene model
    pub fn is_linked(&self) -> bool {
        self.tier.map(|t| t.is_linked()).unwrap_or(false)
    }
}

// =========================================================================
// Per-provider pickers
// =========================================================================

fn single(pool: &[GenomicCandidate]) -> Option<GenomicCandidate> {
    match pool {
        [only] => Some(*only),
        _ => None,
    }
}

fn single_unique(pool: &[GenomicCandidate]) -> Option<GenomicCandidate> {
    single(pool).filter(|c| c.unique)
}

/// Shortest candidate; equal lengths resolve to the lowest sequence key
fn shortest<'a>(pool: impl IntoIterator<Item = &'a GenomicCandidate>) -> Option<GenomicCandidate> {
    pool.into_iter()
        .min_by_key(|c| (c.length, c.sequence_key))
        .copied()
}

/// Longest candidate; equal lengths resolve to the lowest sequence key
fn longest<'a>(pool: impl IntoIterator<Item = &'a GenomicCandidate>) -> Option<GenomicCandidate> {
    pool.into_iter()
        .max_by(|a, b| {
            a.length
                .cmp(&b.length)
                .then_with(|| b.sequence_key.cmp(&a.sequence_key))
        })
        .copied()
}

fn shortest_unique(pool: &[GenomicCandidate]) -> Option<GenomicCandidate> {
    shortest(pool.iter().filter(|c| c.unique))
}

fn shortest_any(pool: &[GenomicCandidate]) -> Option<GenomicCandidate> {
    shortest(pool)
}

// =========================================================================
// Cascade
// =========================================================================

/// Pick the genomic representative, or `None` when the marker has no
/// genomic candidate at all
pub fn select_genomic(pools: &GenomicPools) -> Option<GenomicChoice> {
    if !pools.has_gene_models() {
        return select_genbank(&pools.genbank);
    }

    let tiers: [(SelectionCase, fn(&[GenomicCandidate]) -> Option<GenomicCandidate>); 4] = [
        (SelectionCase::SingleUnique, single_unique),
        (SelectionCase::ShortestUnique, shortest_unique),
        (SelectionCase::Single, single),
        (SelectionCase::ShortestShared, shortest_any),
    ];

    tiers
        .iter()
        .find_map(|(case, pick)| resolve_tier(pools, *case, *pick))
}

fn select_genbank(pool: &[GenomicCandidate]) -> Option<GenomicChoice> {
    let choice = |candidate: GenomicCandidate, case| GenomicChoice {
        sequence_key: candidate.sequence_key,
        tier: Some(GenomicTier::GenBank),
        case,
        compared: false,
    };

    if let Some(candidate) = longest(pool.iter().filter(|c| c.unique)) {
        return Some(choice(candidate, SelectionCase::GenBankLongestUnique));
    }
    longest(pool).map(|candidate| choice(candidate, SelectionCase::GenBankLongest))
}

/// Apply one tier's picker: VEGA alone, then the Ensembl/NCBI pair
fn resolve_tier(
    pools: &GenomicPools,
    case: SelectionCase,
    pick: fn(&[GenomicCandidate]) -> Option<GenomicCandidate>,
) -> Option<GenomicChoice> {
    let choice = |provider, candidate: GenomicCandidate, compared| GenomicChoice {
        sequence_key: candidate.sequence_key,
        tier: Some(GenomicTier::GeneModel(provider)),
        case,
        compared,
    };

    if let Some(vega) = pick(&pools.vega) {
        return Some(choice(GeneModelProvider::Vega, vega, false));
    }

    match (pick(&pools.ensembl), pick(&pools.ncbi)) {
        (Some(ensembl), Some(ncbi)) => {
            if ncbi.length <= ensembl.length {
                Some(choice(GeneModelProvider::Ncbi, ncbi, true))
            } else {
                Some(choice(GeneModelProvider::Ensembl, ensembl, true))
            }
        }
        (Some(ensembl), None) => Some(choice(GeneModelProvider::Ensembl, ensembl, false)),
        (None, Some(ncbi)) => Some(choice(GeneModelProvider::Ncbi, ncbi, false)),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(sequence_key: SequenceKey, length: u64, unique: bool) -> GenomicCandidate {
        GenomicCandidate {
            sequence_key,
            length,
            unique,
        }
    }

    fn pick(pools: &GenomicPools) -> (SequenceKey, GenomicTier, SelectionCase) {
        let choice = select_genomic(pools).unwrap();
        (choice.sequence_key, choice.tier.unwrap(), choice.case)
    }

    const ENSEMBL: GenomicTier = GenomicTier::GeneModel(GeneModelProvider::Ensembl);
    const NCBI: GenomicTier = GenomicTier::GeneModel(GeneModelProvider::Ncbi);
    const VEGA: GenomicTier = GenomicTier::GeneModel(GeneModelProvider::Vega);

    #[test]
    fn test_no_candidates_no_representative() {
        assert_eq!(select_genomic(&GenomicPools::default()), None);
    }

    #[test]
    fn test_single_genbank_wins_regardless_of_length() {
        for length in [0, 1, 500, 1_000_000] {
            let pools = GenomicPools {
                genbank: vec![c(10, length, false)],
                ..Default::default()
            };
            assert_eq!(pick(&pools), (10, GenomicTier::GenBank, SelectionCase::GenBankLongest));
        }
    }

    #[test]
    fn test_genbank_prefers_longest_unique() {
        let pools = GenomicPools {
            genbank: vec![c(10, 9000, false), c(11, 100, true), c(12, 200, true)],
            ..Default::default()
        };
        assert_eq!(
            pick(&pools),
            (12, GenomicTier::GenBank, SelectionCase::GenBankLongestUnique)
        );
    }

    #[test]
    fn test_genbank_non_unique_falls_back_to_longest() {
        let pools = GenomicPools {
            genbank: vec![c(10, 500, false)],
            ..Default::default()
        };
        assert_eq!(pick(&pools).0, 10);
    }

    #[test]
    fn test_gene_models_shadow_genbank() {
        let pools = GenomicPools {
            ncbi: vec![c(20, 10, false), c(21, 30, false)],
            genbank: vec![c(10, 9000, true)],
            ..Default::default()
        };
        assert_eq!(pick(&pools), (20, NCBI, SelectionCase::ShortestShared));
    }

    #[test]
    fn test_single_unique_pair_ncbi_wins_tie() {
        let pools = GenomicPools {
            ensembl: vec![c(1, 1000, true)],
            ncbi: vec![c(2, 1000, true)],
            ..Default::default()
        };
        let choice = select_genomic(&pools).unwrap();
        assert_eq!(choice.sequence_key, 2);
        assert_eq!(choice.case, SelectionCase::SingleUnique);
        assert!(choice.compared);
    }

    #[test]
    fn test_single_unique_pair_shorter_wins() {
        let pools = GenomicPools {
            ensembl: vec![c(1, 900, true)],
            ncbi: vec![c(2, 1000, true)],
            ..Default::default()
        };
        assert_eq!(pick(&pools), (1, ENSEMBL, SelectionCase::SingleUnique));
    }

    #[test]
    fn test_single_unique_beats_multiple() {
        let pools = GenomicPools {
            ensembl: vec![c(1, 10, true), c(3, 5, true)],
            ncbi: vec![c(2, 5000, true)],
            ..Default::default()
        };
        assert_eq!(pick(&pools), (2, NCBI, SelectionCase::SingleUnique));
    }

    #[test]
    fn test_vega_single_unique_wins_over_pair() {
        let pools = GenomicPools {
            vega: vec![c(9, 99_999, true)],
            ensembl: vec![c(1, 10, true)],
            ncbi: vec![c(2, 10, true)],
            ..Default::default()
        };
        assert_eq!(pick(&pools), (9, VEGA, SelectionCase::SingleUnique));
    }

    #[test]
    fn test_shortest_unique_among_multiples() {
        let pools = GenomicPools {
            ensembl: vec![c(1, 300, true), c(3, 200, true), c(5, 100, false)],
            ncbi: vec![c(2, 250, true), c(4, 50, false)],
            ..Default::default()
        };
        assert_eq!(pick(&pools), (3, ENSEMBL, SelectionCase::ShortestUnique));
    }

    #[test]
    fn test_shortest_unique_tie_goes_to_ncbi() {
        let pools = GenomicPools {
            ensembl: vec![c(1, 200, true), c(3, 400, true)],
            ncbi: vec![c(2, 200, true), c(4, 100, false)],
            ..Default::default()
        };
        assert_eq!(pick(&pools), (2, NCBI, SelectionCase::ShortestUnique));
    }

    #[test]
    fn test_unique_in_one_provider_only() {
        let pools = GenomicPools {
            ensembl: vec![c(1, 10, false)],
            ncbi: vec![c(2, 900, true), c(4, 800, true)],
            ..Default::default()
        };
        assert_eq!(pick(&pools), (4, NCBI, SelectionCase::ShortestUnique));
    }

    #[test]
    fn test_single_shared_beats_multiples() {
        let pools = GenomicPools {
            ensembl: vec![c(1, 9000, false)],
            ncbi: vec![c(2, 10, false), c(4, 20, false)],
            ..Default::default()
        };
        assert_eq!(pick(&pools), (1, ENSEMBL, SelectionCase::Single));
    }

    #[test]
    fn test_both_single_shared_shorter_wins() {
        let pools = GenomicPools {
            ensembl: vec![c(1, 100, false)],
            ncbi: vec![c(2, 101, false)],
            ..Default::default()
        };
        assert_eq!(pick(&pools), (1, ENSEMBL, SelectionCase::Single));

        let tied = GenomicPools {
            ensembl: vec![c(1, 100, false)],
            ncbi: vec![c(2, 100, false)],
            ..Default::default()
        };
        assert_eq!(pick(&tied), (2, NCBI, SelectionCase::Single));
    }

    #[test]
    fn test_vega_single_shared_wins() {
        let pools = GenomicPools {
            vega: vec![c(9, 100, false)],
            ensembl: vec![c(1, 10, false)],
            ..Default::default()
        };
        assert_eq!(pick(&pools), (9, VEGA, SelectionCase::Single));
    }

    #[test]
    fn test_multiples_shortest_ncbi_on_tie() {
        let pools = GenomicPools {
            ensembl: vec![c(1, 50, false), c(3, 60, false)],
            ncbi: vec![c(2, 50, false), c(4, 70, false)],
            ..Default::default()
        };
        assert_eq!(pick(&pools), (2, NCBI, SelectionCase::ShortestShared));
    }

    #[test]
    fn test_vega_multiples_preferred() {
        let pools = GenomicPools {
            vega: vec![c(9, 500, false), c(8, 400, false)],
            ncbi: vec![c(2, 5, false), c(4, 6, false)],
            ..Default::default()
        };
        assert_eq!(pick(&pools), (8, VEGA, SelectionCase::ShortestShared));
    }

    #[test]
    fn test_pick_one_ties_are_stable() {
        let pools = GenomicPools {
            ensembl: vec![c(7, 50, false), c(3, 50, false), c(5, 50, false)],
            ..Default::default()
        };
        assert_eq!(pick(&pools).0, 3);

        let genbank = GenomicPools {
            genbank: vec![c(7, 50, true), c(3, 50, true)],
            ..Default::default()
        };
        assert_eq!(pick(&genbank).0, 3);
    }

    #[test]
    fn test_linked_tiers() {
        let ensembl = select_genomic(&GenomicPools {
            ensembl: vec![c(1, 1, true)],
            ..Default::default()
        })
        .unwrap();
        assert!(ensembl.is_linked());

        let ncbi = select_genomic(&GenomicPools {
            ncbi: vec![c(1, 1, true)],
            ..Default::default()
        })
        .unwrap();
        assert!(!ncbi.is_linked());
    }
}
