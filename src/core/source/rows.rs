//! Typed rows for every input table
//!
//! Field names double as TSV header names and SQLite column names.

use serde::Deserialize;

use crate::core::keys::{MarkerKey, SequenceKey, TermKey};
use crate::core::provider::SequenceCategory;

/// A row whose shape both readers understand
pub trait SourceRow: serde::de::DeserializeOwned + Sized {
    /// Column names, in select order
    const COLUMNS: &'static [&'static str];

    /// Build the row from a SQLite result row
    fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self>;
}

/// Marker/sequence annotation used for representative selection
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnnotationRow {
    pub marker_key: MarkerKey,
    pub sequence_key: SequenceKey,
    pub provider_key: i64,
    pub sequence_type_key: i64,
    pub status_key: Option<i64>,
    pub length: Option<i64>,
    pub acc_id: String,
}

impl SourceRow for AnnotationRow {
    const COLUMNS: &'static [&'static str] = &[
        "marker_key",
        "sequence_key",
        "provider_key",
        "sequence_type_key",
        "status_key",
        "length",
        "acc_id",
    ];

    fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            marker_key: row.get("marker_key")?,
            sequence_key: row.get("sequence_key")?,
            provider_key: row.get("provider_key")?,
            sequence_type_key: row.get("sequence_type_key")?,
            status_key: row.get("status_key")?,
            length: row.get("length")?,
            acc_id: row.get("acc_id")?,
        })
    }
}

/// Marker reached from a genomic sequence's accession (uniqueness input)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GenomicMarkerRow {
    pub sequence_key: SequenceKey,
    pub marker_key: MarkerKey,
}

impl SourceRow for GenomicMarkerRow {
    const COLUMNS: &'static [&'static str] = &["sequence_key", "marker_key"];

    fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            sequence_key: row.get("sequence_key")?,
            marker_key: row.get("marker_key")?,
        })
    }
}

/// Sequence-to-sequence association (`transcribed from`, `translated from`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SequenceAssocRow {
    pub sequence_key_1: SequenceKey,
    pub sequence_key_2: SequenceKey,
    pub qualifier_key: i64,
    /// Length of sequence 1
    pub length_1: Option<i64>,
    /// Length of sequence 2
    pub length_2: Option<i64>,
}

impl SourceRow for SequenceAssocRow {
    const COLUMNS: &'static [&'static str] = &[
        "sequence_key_1",
        "sequence_key_2",
        "qualifier_key",
        "length_1",
        "length_2",
    ];

    fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            sequence_key_1: row.get("sequence_key_1")?,
            sequence_key_2: row.get("sequence_key_2")?,
            qualifier_key: row.get("qualifier_key")?,
            length_1: row.get("length_1")?,
            length_2: row.get("length_2")?,
        })
    }
}

/// Gene model sequence of a marker with its provider biotype
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneModelRow {
    pub marker_key: MarkerKey,
    pub sequence_key: SequenceKey,
    pub logical_db_key: i64,
    pub raw_biotype: Option<String>,
}

impl SourceRow for GeneModelRow {
    const COLUMNS: &'static [&'static str] =
        &["marker_key", "sequence_key", "logical_db_key", "raw_biotype"];

    fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            marker_key: row.get("marker_key")?,
            sequence_key: row.get("sequence_key")?,
            logical_db_key: row.get("logical_db_key")?,
            raw_biotype: row.get("raw_biotype")?,
        })
    }
}

/// Direct (curated) feature type of a marker
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarkerFeatureTypeRow {
    pub marker_key: MarkerKey,
    pub term_key: TermKey,
}

impl SourceRow for MarkerFeatureTypeRow {
    const COLUMNS: &'static [&'static str] = &["marker_key", "term_key"];

    fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            marker_key: row.get("marker_key")?,
            term_key: row.get("term_key")?,
        })
    }
}

/// Ancestor/descendant pair of the feature type hierarchy
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClosureRow {
    pub ancestor_key: TermKey,
    pub descendant_key: TermKey,
}

impl SourceRow for ClosureRow {
    const COLUMNS: &'static [&'static str] = &["ancestor_key", "descendant_key"];

    fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            ancestor_key: row.get("ancestor_key")?,
            descendant_key: row.get("descendant_key")?,
        })
    }
}

/// Generic term row (feature types, representative qualifiers)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TermRow {
    pub term_key: TermKey,
    pub term: String,
}

impl SourceRow for TermRow {
    const COLUMNS: &'static [&'static str] = &["term_key", "term"];

    fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            term_key: row.get("term_key")?,
            term: row.get("term")?,
        })
    }
}

/// One raw biotype to feature type mapping
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BiotypeMappingRow {
    pub vocabulary: String,
    pub raw_term: String,
    pub feature_type_term: String,
    pub marker_type_key: Option<i64>,
    /// 1 when the feature type's descendants are equivalent too
    pub use_children: Option<i64>,
}

impl BiotypeMappingRow {
    pub fn uses_children(&self) -> bool {
        self.use_children == Some(1)
    }
}

impl SourceRow for BiotypeMappingRow {
    const COLUMNS: &'static [&'static str] = &[
        "vocabulary",
        "raw_term",
        "feature_type_term",
        "marker_type_key",
        "use_children",
    ];

    fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            vocabulary: row.get("vocabulary")?,
            raw_term: row.get("raw_term")?,
            feature_type_term: row.get("feature_type_term")?,
            marker_type_key: row.get("marker_type_key")?,
            use_children: row.get("use_children")?,
        })
    }
}

/// Administrator-forced representative
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OverrideRow {
    pub marker_key: MarkerKey,
    pub category: SequenceCategory,
    pub sequence_key: SequenceKey,
}

impl SourceRow for OverrideRow {
    const COLUMNS: &'static [&'static str] = &["marker_key", "category", "sequence_key"];

    fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            marker_key: row.get("marker_key")?,
            category: row.get("category")?,
            sequence_key: row.get("sequence_key")?,
        })
    }
}

/// Sequence/marker/reference triple written to the marker cache
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CacheSourceRow {
    pub sequence_key: SequenceKey,
    pub marker_key: MarkerKey,
    pub organism_key: i64,
    pub marker_type_key: i64,
    pub provider_key: i64,
    pub sequence_type_key: i64,
    pub logical_db_key: i64,
    pub refs_key: i64,
    pub user_key: Option<i64>,
    pub mdate: String,
    pub acc_id: String,
}

impl SourceRow for CacheSourceRow {
    const COLUMNS: &'static [&'static str] = &[
        "sequence_key",
        "marker_key",
        "organism_key",
        "marker_type_key",
        "provider_key",
        "sequence_type_key",
        "logical_db_key",
        "refs_key",
        "user_key",
        "mdate",
        "acc_id",
    ];

    fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            sequence_key: row.get("sequence_key")?,
            marker_key: row.get("marker_key")?,
            organism_key: row.get("organism_key")?,
            marker_type_key: row.get("marker_type_key")?,
            provider_key: row.get("provider_key")?,
            sequence_type_key: row.get("sequence_type_key")?,
            logical_db_key: row.get("logical_db_key")?,
            refs_key: row.get("refs_key")?,
            user_key: row.get("user_key")?,
            mdate: row.get("mdate")?,
            acc_id: row.get("acc_id")?,
        })
    }
}

/// NCBI gene model coordinates of a pseudo-autosomal marker
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ParFeatureRow {
    pub marker_key: MarkerKey,
    pub sequence_key: SequenceKey,
    pub symbol: String,
    pub genetic_chromosome: String,
    pub genomic_chromosome: String,
}

impl SourceRow for ParFeatureRow {
    const COLUMNS: &'static [&'static str] = &[
        "marker_key",
        "sequence_key",
        "symbol",
        "genetic_chromosome",
        "genomic_chromosome",
    ];

    fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            marker_key: row.get("marker_key")?,
            sequence_key: row.get("sequence_key")?,
            symbol: row.get("symbol")?,
            genetic_chromosome: row.get("genetic_chromosome")?,
            genomic_chromosome: row.get("genomic_chromosome")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DescriptionRow {
    pub sequence_key: SequenceKey,
    pub description: Option<String>,
}

impl SourceRow for DescriptionRow {
    const COLUMNS: &'static [&'static str] = &["sequence_key", "description"];

    fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            sequence_key: row.get("sequence_key")?,
            description: row.get("description")?,
        })
    }
}

/// Assembly coordinate of a sequence
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoordinateRow {
    pub map_key: i64,
    pub object_key: SequenceKey,
    pub chromosome: String,
    pub start_coordinate: f64,
    pub end_coordinate: f64,
    pub strand: Option<String>,
    pub map_units: String,
    pub provider: String,
    pub version: Option<String>,
}

impl SourceRow for CoordinateRow {
    const COLUMNS: &'static [&'static str] = &[
        "map_key",
        "object_key",
        "chromosome",
        "start_coordinate",
        "end_coordinate",
        "strand",
        "map_units",
        "provider",
        "version",
    ];

    fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            map_key: row.get("map_key")?,
            object_key: row.get("object_key")?,
            chromosome: row.get("chromosome")?,
            start_coordinate: row.get("start_coordinate")?,
            end_coordinate: row.get("end_coordinate")?,
            strand: row.get("strand")?,
            map_units: row.get("map_units")?,
            provider: row.get("provider")?,
            version: row.get("version")?,
        })
    }
}

/// Probe sharing a sequence accession
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
pub struct ProbeRow {
    pub sequence_key: SequenceKey,
    pub probe_key: i64,
    pub refs_key: i64,
    pub mdate: String,
}

impl SourceRow for ProbeRow {
    const COLUMNS: &'static [&'static str] = &["sequence_key", "probe_key", "refs_key", "mdate"];

    fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            sequence_key: row.get("sequence_key")?,
            probe_key: row.get("probe_key")?,
            refs_key: row.get("refs_key")?,
            mdate: row.get("mdate")?,
        })
    }
}

/// Marker or probe accession with no sequence object behind it
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
pub struct UnmatchedAccessionRow {
    pub acc_id: String,
    pub logical_db_key: i64,
    pub organism_key: i64,
}

impl SourceRow for UnmatchedAccessionRow {
    const COLUMNS: &'static [&'static str] = &["acc_id", "logical_db_key", "organism_key"];

    fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            acc_id: row.get("acc_id")?,
            logical_db_key: row.get("logical_db_key")?,
            organism_key: row.get("organism_key")?,
        })
    }
}

/// First free primary keys of the tables placeholders are written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct NextKeysRow {
    pub sequence_key: i64,
    pub source_assoc_key: i64,
    pub accession_key: i64,
}

impl SourceRow for NextKeysRow {
    const COLUMNS: &'static [&'static str] = &["sequence_key", "source_assoc_key", "accession_key"];

    fn from_sql_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            sequence_key: row.get("sequence_key")?,
            source_assoc_key: row.get("source_assoc_key")?,
            accession_key: row.get("accession_key")?,
        })
    }
}
