//! Marker cache row assembly
//!
//! Merges the representative sets and biotype verdicts into one output row
//! per (sequence, marker, reference) source row.

use std::collections::HashMap;

use crate::core::bcp::{nullable, BcpRecord};
use crate::core::biotype::BiotypeLookup;
use crate::core::config::ConflictKeys;
use crate::core::error::{CacheError, Result};
use crate::core::keys::{MarkerKey, SequenceKey};
use crate::core::provider::SequenceCategory;
use crate::core::representative::Representatives;
use crate::core::source::{CacheSourceRow, TermRow};

/// Qualifier term for rows that represent nothing
pub const NOT_SPECIFIED: &str = "Not Specified";

/// Representative qualifier term keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualifierKeys {
    pub genomic: i64,
    pub transcript: i64,
    pub polypeptide: i64,
    pub not_specified: i64,
}

impl QualifierKeys {
    /// Resolve all four qualifier terms; a missing one is fatal
    pub fn from_terms(rows: &[TermRow]) -> Result<Self> {
        let by_term: HashMap<&str, i64> = rows
            .iter()
            .map(|r| (r.term.as_str(), r.term_key))
            .collect();
        let key = |term: &str| {
            by_term
                .get(term)
                .copied()
                .ok_or_else(|| CacheError::MissingQualifier {
                    term: term.to_string(),
                })
        };

        Ok(Self {
            genomic: key(SequenceCategory::Genomic.qualifier_term())?,
            transcript: key(SequenceCategory::Transcript.qualifier_term())?,
            polypeptide: key(SequenceCategory::Polypeptide.qualifier_term())?,
            not_specified: key(NOT_SPECIFIED)?,
        })
    }

    pub fn key_for(&self, category: Option<SequenceCategory>) -> i64 {
        match category {
            Some(SequenceCategory::Genomic) => self.genomic,
            Some(SequenceCategory::Transcript) => self.transcript,
            Some(SequenceCategory::Polypeptide) => self.polypeptide,
            None => self.not_specified,
        }
    }
}

/// One `SEQ_Marker_Cache` row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerCacheRow {
    pub cache_key: u64,
    pub sequence_key: SequenceKey,
    pub marker_key: MarkerKey,
    pub organism_key: i64,
    pub refs_key: i64,
    pub qualifier_key: i64,
    pub provider_key: i64,
    pub sequence_type_key: i64,
    pub logical_db_key: i64,
    pub marker_type_key: i64,
    pub biotype_conflict_key: i64,
    pub acc_id: String,
    pub raw_biotype: Option<String>,
    pub mdate: String,
    pub user_key: Option<i64>,
    pub load_date: String,
}

impl BcpRecord for MarkerCacheRow {
    fn fields(&self) -> Vec<String> {
        vec![
            self.cache_key.to_string(),
            self.sequence_key.to_string(),
            self.marker_key.to_string(),
            self.organism_key.to_string(),
            self.refs_key.to_string(),
            self.qualifier_key.to_string(),
            self.provider_key.to_string(),
            self.sequence_type_key.to_string(),
            self.logical_db_key.to_string(),
            self.marker_type_key.to_string(),
            self.biotype_conflict_key.to_string(),
            self.acc_id.clone(),
            nullable(self.raw_biotype.as_deref()),
            self.mdate.clone(),
            nullable(self.user_key),
            nullable(self.user_key),
            self.load_date.clone(),
            self.load_date.clone(),
        ]
    }
}

/// Builds cache rows with a running `_Cache_key`
pub struct Emitter<'a> {
    representatives: &'a Representatives,
    biotypes: &'a BiotypeLookup,
    qualifiers: QualifierKeys,
    conflict: ConflictKeys,
    load_date: String,
    next_key: u64,
}

impl<'a> Emitter<'a> {
    pub fn new(
        representatives: &'a Representatives,
        biotypes: &'a BiotypeLookup,
        qualifiers: QualifierKeys,
        conflict: ConflictKeys,
        load_date: impl Into<String>,
    ) -> Self {
        Self {
            representatives,
            biotypes,
            qualifiers,
            conflict,
            load_date: load_date.into(),
            next_key: 1,
        }
    }

    pub fn emit(&mut self, row: &CacheSourceRow) -> MarkerCacheRow {
        let category = self
            .representatives
            .category_of(row.marker_key, row.sequence_key);

        let (biotype_conflict_key, raw_biotype) =
            match self.biotypes.get(row.marker_key, row.sequence_key) {
                Some(entry) => (
                    entry.verdict.term_key(&self.conflict),
                    Some(entry.raw_biotype.clone()),
                ),
                None => (self.conflict.not_applicable, None),
            };

        let cache_key = self.next_key;
        self.next_key += 1;

        MarkerCacheRow {
            cache_key,
            sequence_key: row.sequence_key,
            marker_key: row.marker_key,
            organism_key: row.organism_key,
            refs_key: row.refs_key,
            qualifier_key: self.qualifiers.key_for(category),
            provider_key: row.provider_key,
            sequence_type_key: row.sequence_type_key,
            logical_db_key: row.logical_db_key,
            marker_type_key: row.marker_type_key,
            biotype_conflict_key,
            acc_id: row.acc_id.clone(),
            raw_biotype,
            mdate: row.mdate.clone(),
            user_key: row.user_key,
            load_date: self.load_date.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::representative::RepresentativeSet;

    fn qualifier_terms() -> Vec<TermRow> {
        [
            (615419, "genomic"),
            (615420, "transcript"),
            (615421, "polypeptide"),
            (615422, "Not Specified"),
        ]
        .into_iter()
        .map(|(term_key, term)| TermRow {
            term_key,
            term: term.to_string(),
        })
        .collect()
    }

    fn source_row(sequence_key: i64, marker_key: i64, refs_key: i64) -> CacheSourceRow {
        CacheSourceRow {
            sequence_key,
            marker_key,
            organism_key: 1,
            marker_type_key: 1,
            provider_key: 706915,
            sequence_type_key: 316347,
            logical_db_key: 59,
            refs_key,
            user_key: Some(1001),
            mdate: "03/14/2024".to_string(),
            acc_id: "12345".to_string(),
        }
    }

    #[test]
    fn test_missing_qualifier_is_fatal() {
        let mut terms = qualifier_terms();
        terms.pop();
        assert!(matches!(
            QualifierKeys::from_terms(&terms),
            Err(CacheError::MissingQualifier { term }) if term == "Not Specified"
        ));
    }

    #[test]
    fn test_emit_representative_and_default_biotype() {
        let qualifiers = QualifierKeys::from_terms(&qualifier_terms()).unwrap();
        let mut reps = Representatives::default();
        reps.insert(
            20,
            RepresentativeSet {
                genomic: Some(10),
                ..Default::default()
            },
        );
        let biotypes = BiotypeLookup::default();
        let mut emitter = Emitter::new(
            &reps,
            &biotypes,
            qualifiers,
            ConflictKeys::default(),
            "01/02/2025",
        );

        let first = emitter.emit(&source_row(10, 20, 300));
        let second = emitter.emit(&source_row(11, 20, 300));

        assert_eq!(first.cache_key, 1);
        assert_eq!(first.qualifier_key, 615419);
        assert_eq!(second.cache_key, 2);
        assert_eq!(second.qualifier_key, 615422);
        assert_eq!(first.biotype_conflict_key, 5420769);
        assert_eq!(first.raw_biotype, None);

        assert_eq!(
            first.fields().join("\t"),
            "1\t10\t20\t1\t300\t615419\t706915\t316347\t59\t1\t5420769\t12345\t\t03/14/2024\t1001\t1001\t01/02/2025\t01/02/2025"
        );
    }
}
