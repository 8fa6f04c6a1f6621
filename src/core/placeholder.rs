//! Placeholder ("Not Loaded") sequences
//!
//! Marker and probe accessions that name a sequence the loaders never
//! brought in still need a sequence object to hang off. Each one becomes a
//! virtual sequence row, its raw row, a source association and an
//! accession row, all numbered from the next free primary keys.

use std::collections::BTreeSet;

use log::warn;

use crate::core::bcp::{nullable, BcpRecord};
use crate::core::companion::AuditStamp;
use crate::core::config::PlaceholderKeys;
use crate::core::keys::SequenceKey;
use crate::core::source::{NextKeysRow, UnmatchedAccessionRow};

pub const SEQUENCE_TABLE: &str = "SEQ_Sequence";
pub const RAW_TABLE: &str = "SEQ_Sequence_Raw";
pub const SOURCE_ASSOC_TABLE: &str = "SEQ_Source_Assoc";
pub const ACCESSION_TABLE: &str = "ACC_Accession";

const NOT_LOADED: &str = "Not Loaded";

/// Split an accession id into its prefix and trailing number
///
/// `NM_013627` splits into `("NM_", Some(13627))`; an id with no trailing
/// digits keeps the whole id as prefix.
pub fn split_accession(acc_id: &str) -> (&str, Option<u64>) {
    let digits = acc_id
        .bytes()
        .rev()
        .take_while(|b| b.is_ascii_digit())
        .count();
    let (prefix, number) = acc_id.split_at(acc_id.len() - digits);
    (prefix, number.parse().ok())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRow {
    pub sequence_key: SequenceKey,
    pub sequence_type_key: i64,
    pub quality_key: i64,
    pub status_key: i64,
    pub provider_key: i64,
    pub organism_key: i64,
    pub is_virtual: bool,
    pub stamp: AuditStamp,
}

impl BcpRecord for SequenceRow {
    fn fields(&self) -> Vec<String> {
        let date = &self.stamp.load_date;
        let user = self.stamp.user_key.to_string();
        let mut fields = vec![
            self.sequence_key.to_string(),
            self.sequence_type_key.to_string(),
            self.quality_key.to_string(),
            self.status_key.to_string(),
            self.provider_key.to_string(),
            self.organism_key.to_string(),
        ];
        // length, description, version, division
        fields.extend(std::iter::repeat(String::new()).take(4));
        fields.push(if self.is_virtual { "1" } else { "0" }.to_string());
        // number of orgs
        fields.push(String::new());
        // sequence record and last annotation dates
        fields.extend([date.clone(), date.clone()]);
        fields.extend([user.clone(), user, date.clone(), date.clone()]);
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSequenceRow {
    pub sequence_key: SequenceKey,
    pub stamp: AuditStamp,
}

impl BcpRecord for RawSequenceRow {
    fn fields(&self) -> Vec<String> {
        let user = self.stamp.user_key.to_string();
        let mut fields = vec![self.sequence_key.to_string()];
        fields.extend(std::iter::repeat(NOT_LOADED.to_string()).take(8));
        fields.extend([
            user.clone(),
            user,
            self.stamp.load_date.clone(),
            self.stamp.load_date.clone(),
        ]);
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceAssocRow {
    pub assoc_key: i64,
    pub sequence_key: SequenceKey,
    pub source_key: i64,
    pub stamp: AuditStamp,
}

impl BcpRecord for SourceAssocRow {
    fn fields(&self) -> Vec<String> {
        let user = self.stamp.user_key.to_string();
        vec![
            self.assoc_key.to_string(),
            self.sequence_key.to_string(),
            self.source_key.to_string(),
            user.clone(),
            user,
            self.stamp.load_date.clone(),
            self.stamp.load_date.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessionRow {
    pub accession_key: i64,
    pub acc_id: String,
    pub logical_db_key: i64,
    pub sequence_key: SequenceKey,
    pub mgi_type_key: i64,
    pub stamp: AuditStamp,
}

impl BcpRecord for AccessionRow {
    fn fields(&self) -> Vec<String> {
        let (prefix, number) = split_accession(&self.acc_id);
        let user = self.stamp.user_key.to_string();
        vec![
            self.accession_key.to_string(),
            self.acc_id.clone(),
            prefix.to_string(),
            nullable(number),
            self.logical_db_key.to_string(),
            self.sequence_key.to_string(),
            self.mgi_type_key.to_string(),
            // private, preferred
            "0".to_string(),
            "1".to_string(),
            user.clone(),
            user,
            self.stamp.load_date.clone(),
            self.stamp.load_date.clone(),
        ]
    }
}

/// The four row sets written for a placeholder run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders {
    pub sequences: Vec<SequenceRow>,
    pub raw: Vec<RawSequenceRow>,
    pub source_assocs: Vec<SourceAssocRow>,
    pub accessions: Vec<AccessionRow>,
    /// Accessions whose logical DB has no placeholder profile
    pub skipped: usize,
}

impl Placeholders {
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

/// Build placeholder rows for every distinct unmatched accession
///
/// Rows are numbered in `(acc_id, logical_db_key, organism_key)` order,
/// starting from `next`.
pub fn placeholder_rows(
    unmatched: &[UnmatchedAccessionRow],
    next: NextKeysRow,
    keys: &PlaceholderKeys,
    stamp: &AuditStamp,
) -> Placeholders {
    let distinct: BTreeSet<&UnmatchedAccessionRow> = unmatched.iter().collect();

    let mut out = Placeholders::default();
    let mut sequence_key = next.sequence_key;
    let mut assoc_key = next.source_assoc_key;
    let mut accession_key = next.accession_key;

    for row in distinct {
        let Some(profile) = keys.profile(row.logical_db_key) else {
            warn!(
                "No placeholder profile for logical DB {}; skipping {}",
                row.logical_db_key, row.acc_id
            );
            out.skipped += 1;
            continue;
        };

        out.sequences.push(SequenceRow {
            sequence_key,
            sequence_type_key: profile.sequence_type,
            quality_key: profile.quality,
            status_key: keys.not_loaded_status,
            provider_key: profile.provider,
            organism_key: row.organism_key,
            is_virtual: profile.is_virtual,
            stamp: stamp.clone(),
        });
        out.raw.push(RawSequenceRow {
            sequence_key,
            stamp: stamp.clone(),
        });
        out.source_assocs.push(SourceAssocRow {
            assoc_key,
            sequence_key,
            source_key: keys.source_for(row.organism_key),
            stamp: stamp.clone(),
        });
        out.accessions.push(AccessionRow {
            accession_key,
            acc_id: row.acc_id.clone(),
            logical_db_key: row.logical_db_key,
            sequence_key,
            mgi_type_key: keys.sequence_mgi_type,
            stamp: stamp.clone(),
        });

        sequence_key += 1;
        assoc_key += 1;
        accession_key += 1;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp() -> AuditStamp {
        AuditStamp::new(1000, "05/06/2025")
    }

    fn unmatched(acc_id: &str, logical_db_key: i64, organism_key: i64) -> UnmatchedAccessionRow {
        UnmatchedAccessionRow {
            acc_id: acc_id.to_string(),
            logical_db_key,
            organism_key,
        }
    }

    fn next() -> NextKeysRow {
        NextKeysRow {
            sequence_key: 500,
            source_assoc_key: 70,
            accession_key: 9000,
        }
    }

    #[test]
    fn test_split_accession() {
        assert_eq!(split_accession("NM_013627"), ("NM_", Some(13627)));
        assert_eq!(split_accession("P26367"), ("P", Some(26367)));
        assert_eq!(split_accession("AB000001"), ("AB", Some(1)));
        assert_eq!(split_accession("XYZ"), ("XYZ", None));
        assert_eq!(split_accession("12345"), ("", Some(12345)));
        assert_eq!(split_accession(""), ("", None));
    }

    #[test]
    fn test_genbank_placeholder_is_not_virtual() {
        let rows = placeholder_rows(
            &[unmatched("AB000001", 9, 1)],
            next(),
            &PlaceholderKeys::default(),
            &stamp(),
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows.sequences[0].fields().join("|"),
            "500|316349|316341|316345|316380|1|||||0||05/06/2025|05/06/2025|1000|1000|05/06/2025|05/06/2025"
        );
        assert_eq!(
            rows.raw[0].fields().join("|"),
            "500|Not Loaded|Not Loaded|Not Loaded|Not Loaded|Not Loaded|Not Loaded|Not Loaded|Not Loaded|1000|1000|05/06/2025|05/06/2025"
        );
        assert_eq!(
            rows.source_assocs[0].fields().join("|"),
            "70|500|47395|1000|1000|05/06/2025|05/06/2025"
        );
        assert_eq!(
            rows.accessions[0].fields().join("|"),
            "9000|AB000001|AB|1|9|500|19|0|1|1000|1000|05/06/2025|05/06/2025"
        );
    }

    #[test]
    fn test_keys_advance_in_accession_order() {
        let rows = placeholder_rows(
            &[
                unmatched("Q9XYZ1", 41, 2),
                unmatched("NM_013627", 27, 1),
                unmatched("NM_013627", 27, 1),
                unmatched("P26367", 13, 1),
            ],
            next(),
            &PlaceholderKeys::default(),
            &stamp(),
        );
        let ids: Vec<(&str, i64, i64)> = rows
            .accessions
            .iter()
            .map(|a| (a.acc_id.as_str(), a.sequence_key, a.accession_key))
            .collect();
        assert_eq!(
            ids,
            vec![
                ("NM_013627", 500, 9000),
                ("P26367", 501, 9001),
                ("Q9XYZ1", 502, 9002),
            ]
        );
        let assoc: Vec<i64> = rows.source_assocs.iter().map(|a| a.assoc_key).collect();
        assert_eq!(assoc, vec![70, 71, 72]);

        let trembl = &rows.sequences[2];
        assert_eq!(trembl.sequence_type_key, 316348);
        assert_eq!(trembl.quality_key, 316340);
        assert_eq!(trembl.provider_key, 316385);
        assert!(trembl.is_virtual);
        assert_eq!(rows.source_assocs[2].source_key, 48166);
    }

    #[test]
    fn test_unknown_logical_db_is_skipped_without_consuming_keys() {
        let rows = placeholder_rows(
            &[unmatched("ENSMUSG00000027168", 60, 1), unmatched("NM_1", 27, 1)],
            next(),
            &PlaceholderKeys::default(),
            &stamp(),
        );
        assert_eq!(rows.skipped, 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.sequences[0].sequence_key, 500);
        assert_eq!(rows.accessions[0].acc_id, "NM_1");
    }
}
