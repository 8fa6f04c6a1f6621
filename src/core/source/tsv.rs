//! Directory of delimited files, one `<table>.tsv` per table

use std::path::{Path, PathBuf};

use crate::core::error::{CacheError, Result};

use super::{DataSource, SourceRow, TableSpec};

#[derive(Debug, Clone)]
pub struct TsvSource {
    root: PathBuf,
    delimiter: u8,
}

impl TsvSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            delimiter: b'\t',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn table_path(&self, table: &TableSpec) -> PathBuf {
        self.root.join(format!("{}.tsv", table.name))
    }
}

impl DataSource for TsvSource {
    fn read_table<T: SourceRow>(&self, table: &TableSpec) -> Result<Vec<T>> {
        let path = self.table_path(table);
        if !path.exists() {
            if table.required {
                return Err(CacheError::MissingTable {
                    table: table.name.to_string(),
                    location: self.root.clone(),
                });
            }
            return Ok(Vec::new());
        }

        let csv_err = |source: csv::Error| CacheError::Csv {
            table: table.name.to_string(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .quoting(false)
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(csv_err)?;

        reader
            .deserialize::<T>()
            .map(|row| row.map_err(csv_err))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::source::{tables, AnnotationRow, GeneModelRow, OverrideRow};
    use crate::core::provider::SequenceCategory;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_reads_rows_with_nulls() {
        let tmp = tempdir().unwrap();
        fs::write(
            tmp.path().join("gene_models.tsv"),
            "marker_key\tsequence_key\tlogical_db_key\traw_biotype\n\
             10\t100\t59\tprotein-coding\n\
             10\t101\t60\t\n",
        )
        .unwrap();

        let source = TsvSource::new(tmp.path());
        let rows: Vec<GeneModelRow> = source.read_table(&tables::GENE_MODELS).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].raw_biotype.as_deref(), Some("protein-coding"));
        assert_eq!(rows[1].raw_biotype, None);
    }

    #[test]
    fn test_annotations_are_grouped_by_marker() {
        let tmp = tempdir().unwrap();
        fs::write(
            tmp.path().join("annotations.tsv"),
            "marker_key\tsequence_key\tprovider_key\tsequence_type_key\tstatus_key\tlength\tacc_id\n\
             2\t20\t316372\t316346\t\t900\tNM_2\n\
             1\t10\t706915\t316347\t\t\t12345\n\
             2\t21\t316380\t316346\t\t500\tAK1\n",
        )
        .unwrap();

        let source = TsvSource::new(tmp.path());
        let rows: Vec<AnnotationRow> = source.annotations().unwrap();
        let markers: Vec<i64> = rows.iter().map(|r| r.marker_key).collect();
        assert_eq!(markers, vec![1, 2, 2]);
        assert_eq!(rows[0].length, None);
    }

    #[test]
    fn test_missing_required_table_is_an_error() {
        let tmp = tempdir().unwrap();
        let source = TsvSource::new(tmp.path());
        let err = source.annotations().unwrap_err();
        assert!(matches!(err, CacheError::MissingTable { .. }));
    }

    #[test]
    fn test_missing_optional_table_is_empty() {
        let tmp = tempdir().unwrap();
        let source = TsvSource::new(tmp.path());
        assert!(source.overrides().unwrap().is_empty());
        assert!(source.par_features().unwrap().is_empty());
    }

    #[test]
    fn test_category_column_parses() {
        let tmp = tempdir().unwrap();
        fs::write(
            tmp.path().join("overrides.tsv"),
            "marker_key\tcategory\tsequence_key\n7\tpolypeptide\t70\n",
        )
        .unwrap();
        let source = TsvSource::new(tmp.path());
        let rows: Vec<OverrideRow> = source.overrides().unwrap();
        assert_eq!(rows[0].category, SequenceCategory::Polypeptide);
    }

    #[test]
    fn test_custom_delimiter() {
        let tmp = tempdir().unwrap();
        fs::write(
            tmp.path().join("overrides.tsv"),
            "marker_key|category|sequence_key\n7|genomic|70\n",
        )
        .unwrap();
        let source = TsvSource::new(tmp.path()).with_delimiter(b'|');
        let rows: Vec<OverrideRow> = source.overrides().unwrap();
        assert_eq!(rows[0].sequence_key, 70);
    }
}
