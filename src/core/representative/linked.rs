//! Gene-model-linked transcript and polypeptide lookups
//!
//! Ensembl and VEGA gene models carry `transcribed from` / `translated from`
//! associations. When one of them is the genomic representative, the
//! transcript and polypeptide representatives are drawn from those links so
//! all three describe the same gene model.

use std::collections::{BTreeMap, HashMap};

use crate::core::config::AssociationKeys;
use crate::core::error::{CacheError, Result};
use crate::core::keys::{MarkerKey, SequenceKey};
use crate::core::source::SequenceAssocRow;

/// Linked sequences keyed by sequence, each with its length
type LinkMap = HashMap<SequenceKey, BTreeMap<SequenceKey, u64>>;

fn length(value: Option<i64>) -> u64 {
    value.unwrap_or(0).max(0) as u64
}

/// Transcript/protein association lookups
#[derive(Debug, Default, Clone)]
pub struct SequenceLinks {
    transcripts_by_genomic: LinkMap,
    proteins_by_genomic: LinkMap,
    transcripts_by_protein: LinkMap,
}

impl SequenceLinks {
    pub fn from_rows(rows: &[SequenceAssocRow], keys: &AssociationKeys) -> Self {
        let mut links = SequenceLinks::default();
        let mut genomics_by_transcript: HashMap<SequenceKey, Vec<SequenceKey>> = HashMap::new();

        // transcript (1) transcribed from genomic (2)
        for row in rows.iter().filter(|r| r.qualifier_key == keys.transcribed_from) {
            links
                .transcripts_by_genomic
                .entry(row.sequence_key_2)
                .or_default()
                .insert(row.sequence_key_1, length(row.length_1));
            genomics_by_transcript
                .entry(row.sequence_key_1)
                .or_default()
                .push(row.sequence_key_2);
        }

        // protein (1) translated from transcript (2)
        for row in rows.iter().filter(|r| r.qualifier_key == keys.translated_from) {
            links
                .transcripts_by_protein
                .entry(row.sequence_key_1)
                .or_default()
                .insert(row.sequence_key_2, length(row.length_2));

            for genomic in genomics_by_transcript
                .get(&row.sequence_key_2)
                .into_iter()
                .flatten()
            {
                links
                    .proteins_by_genomic
                    .entry(*genomic)
                    .or_default()
                    .insert(row.sequence_key_1, length(row.length_1));
            }
        }

        links
    }

    pub fn transcripts_of_genomic(&self, genomic: SequenceKey) -> Option<&BTreeMap<SequenceKey, u64>> {
        self.transcripts_by_genomic.get(&genomic)
    }

    pub fn proteins_of_genomic(&self, genomic: SequenceKey) -> Option<&BTreeMap<SequenceKey, u64>> {
        self.proteins_by_genomic.get(&genomic)
    }

    pub fn transcripts_of_protein(&self, protein: SequenceKey) -> Option<&BTreeMap<SequenceKey, u64>> {
        self.transcripts_by_protein.get(&protein)
    }
}

/// Longest entry, first in key order on ties
fn longest_linked(links: &BTreeMap<SequenceKey, u64>) -> Option<SequenceKey> {
    let mut best: Option<(SequenceKey, u64)> = None;
    for (&key, &len) in links {
        match best {
            Some((_, current)) if len <= current => {}
            _ => best = Some((key, len)),
        }
    }
    best.map(|(key, _)| key)
}

/// Outcome of the linked lookup; `None` fields fall back to tiered selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkedPair {
    pub polypeptide: Option<SequenceKey>,
    pub transcript: Option<SequenceKey>,
}

/// Resolve the polypeptide first, then the transcript through it
///
/// A genomic sequence with linked proteins must also reach a transcript
/// through the chosen protein; when it does not, the association data is
/// inconsistent and the run is aborted. Links built by
/// [`SequenceLinks::from_rows`] always record both sides of a
/// `translated from` row, so only hand-assembled links reach that abort.
pub fn resolve_linked(
    links: &SequenceLinks,
    marker_key: MarkerKey,
    genomic_key: SequenceKey,
) -> Result<LinkedPair> {
    let invariant = |detail: String| CacheError::LinkageInvariant {
        marker_key,
        genomic_key,
        detail,
    };

    match links.proteins_of_genomic(genomic_key) {
        Some(proteins) => {
            let protein = longest_linked(proteins)
                .ok_or_else(|| invariant("linked protein set is empty".to_string()))?;
            let transcripts = links.transcripts_of_protein(protein).ok_or_else(|| {
                invariant(format!("protein {} has no transcript", protein))
            })?;
            Ok(LinkedPair {
                polypeptide: Some(protein),
                transcript: longest_linked(transcripts),
            })
        }
        None => {
            let transcript = match links.transcripts_of_genomic(genomic_key) {
                Some(transcripts) => Some(
                    longest_linked(transcripts)
                        .ok_or_else(|| invariant("linked transcript set is empty".to_string()))?,
                ),
                None => None,
            };
            Ok(LinkedPair {
                polypeptide: None,
                transcript,
            })
        }
    }
}
