//! Tabular data source
//!
//! The engine never issues SQL against the production schema. It reads
//! pre-shaped tables through [`DataSource`], backed either by a directory of
//! delimited files or by a SQLite database holding the same tables.

mod rows;
mod serialize;
mod sqlite;
mod tsv;

use std::path::Path;

use crate::core::error::{CacheError, Result};

pub use rows::{
    AnnotationRow, BiotypeMappingRow, CacheSourceRow, ClosureRow, CoordinateRow, DescriptionRow,
    GeneModelRow, GenomicMarkerRow, MarkerFeatureTypeRow, NextKeysRow, OverrideRow, ParFeatureRow,
    ProbeRow, SequenceAssocRow, SourceRow, TermRow, UnmatchedAccessionRow,
};
pub use sqlite::SqliteSource;
pub use tsv::TsvSource;

/// A named input table
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub name: &'static str,
    /// Missing optional tables read as empty
    pub required: bool,
}

pub mod tables {
    use super::TableSpec;

    pub const ANNOTATIONS: TableSpec = TableSpec { name: "annotations", required: true };
    pub const GENOMIC_MARKERS: TableSpec = TableSpec { name: "genomic_markers", required: true };
    pub const SEQUENCE_ASSOCS: TableSpec = TableSpec { name: "sequence_assocs", required: true };
    pub const GENE_MODELS: TableSpec = TableSpec { name: "gene_models", required: true };
    pub const MARKER_FEATURE_TYPES: TableSpec =
        TableSpec { name: "marker_feature_types", required: true };
    pub const DAG_CLOSURE: TableSpec = TableSpec { name: "dag_closure", required: true };
    pub const FEATURE_TYPES: TableSpec = TableSpec { name: "feature_types", required: true };
    pub const BIOTYPE_MAPPINGS: TableSpec = TableSpec { name: "biotype_mappings", required: true };
    pub const REP_QUALIFIERS: TableSpec = TableSpec { name: "rep_qualifiers", required: true };
    pub const CACHE_ROWS: TableSpec = TableSpec { name: "cache_rows", required: true };
    pub const OVERRIDES: TableSpec = TableSpec { name: "overrides", required: false };
    pub const PAR_FEATURES: TableSpec = TableSpec { name: "par_features", required: false };
    pub const DESCRIPTIONS: TableSpec = TableSpec { name: "descriptions", required: false };
    pub const COORDINATES: TableSpec = TableSpec { name: "coordinates", required: false };
    pub const PROBES: TableSpec = TableSpec { name: "probes", required: false };
    pub const UNMATCHED_ACCESSIONS: TableSpec =
        TableSpec { name: "unmatched_accessions", required: true };
    pub const NEXT_KEYS: TableSpec = TableSpec { name: "next_keys", required: true };
}

/// Supplies every table the cache builders consume
pub trait DataSource {
    /// Read all rows of a table in stored order
    fn read_table<T: SourceRow>(&self, table: &TableSpec) -> Result<Vec<T>>;

    /// Annotation rows, grouped by marker (marker key, then provider key)
    fn annotations(&self) -> Result<Vec<AnnotationRow>> {
        let mut rows: Vec<AnnotationRow> = self.read_table(&tables::ANNOTATIONS)?;
        rows.sort_by_key(|r| (r.marker_key, r.provider_key));
        Ok(rows)
    }

    fn genomic_markers(&self) -> Result<Vec<GenomicMarkerRow>> {
        self.read_table(&tables::GENOMIC_MARKERS)
    }

    fn sequence_assocs(&self) -> Result<Vec<SequenceAssocRow>> {
        self.read_table(&tables::SEQUENCE_ASSOCS)
    }

    fn gene_models(&self) -> Result<Vec<GeneModelRow>> {
        let mut rows: Vec<GeneModelRow> = self.read_table(&tables::GENE_MODELS)?;
        rows.sort_by_key(|r| r.sequence_key);
        Ok(rows)
    }

    fn marker_feature_types(&self) -> Result<Vec<MarkerFeatureTypeRow>> {
        self.read_table(&tables::MARKER_FEATURE_TYPES)
    }

    fn dag_closure(&self) -> Result<Vec<ClosureRow>> {
        self.read_table(&tables::DAG_CLOSURE)
    }

    fn feature_types(&self) -> Result<Vec<TermRow>> {
        self.read_table(&tables::FEATURE_TYPES)
    }

    fn biotype_mappings(&self) -> Result<Vec<BiotypeMappingRow>> {
        self.read_table(&tables::BIOTYPE_MAPPINGS)
    }

    fn rep_qualifiers(&self) -> Result<Vec<TermRow>> {
        self.read_table(&tables::REP_QUALIFIERS)
    }

    fn overrides(&self) -> Result<Vec<OverrideRow>> {
        self.read_table(&tables::OVERRIDES)
    }

    /// Cache rows ordered by sequence, marker, reference
    fn cache_rows(&self) -> Result<Vec<CacheSourceRow>> {
        let mut rows: Vec<CacheSourceRow> = self.read_table(&tables::CACHE_ROWS)?;
        rows.sort_by_key(|r| (r.sequence_key, r.marker_key, r.refs_key));
        Ok(rows)
    }

    fn par_features(&self) -> Result<Vec<ParFeatureRow>> {
        self.read_table(&tables::PAR_FEATURES)
    }

    fn descriptions(&self) -> Result<Vec<DescriptionRow>> {
        self.read_table(&tables::DESCRIPTIONS)
    }

    fn coordinates(&self) -> Result<Vec<CoordinateRow>> {
        self.read_table(&tables::COORDINATES)
    }

    fn probes(&self) -> Result<Vec<ProbeRow>> {
        self.read_table(&tables::PROBES)
    }

    fn unmatched_accessions(&self) -> Result<Vec<UnmatchedAccessionRow>> {
        self.read_table(&tables::UNMATCHED_ACCESSIONS)
    }

    /// The single row of `next_keys`
    fn next_keys(&self) -> Result<NextKeysRow> {
        let rows: Vec<NextKeysRow> = self.read_table(&tables::NEXT_KEYS)?;
        rows.first().copied().ok_or_else(|| CacheError::EmptyTable {
            table: tables::NEXT_KEYS.name.to_string(),
        })
    }
}

/// Source picked at runtime from the path given on the command line
#[derive(Debug)]
pub enum AnySource {
    Tsv(TsvSource),
    Sqlite(SqliteSource),
}

impl AnySource {
    /// A directory opens as TSV files, a regular file as a SQLite database
    pub fn open(path: &Path, delimiter: u8) -> Result<Self> {
        if path.is_dir() {
            Ok(AnySource::Tsv(TsvSource::new(path).with_delimiter(delimiter)))
        } else if path.is_file() {
            Ok(AnySource::Sqlite(SqliteSource::open(path)?))
        } else {
            Err(CacheError::UnknownSource(path.to_path_buf()))
        }
    }
}

impl DataSource for AnySource {
    fn read_table<T: SourceRow>(&self, table: &TableSpec) -> Result<Vec<T>> {
        match self {
            AnySource::Tsv(s) => s.read_table(table),
            AnySource::Sqlite(s) => s.read_table(table),
        }
    }
}
