//! Bulk-load (BCP) file output
//!
//! Rows are delimited text with no quoting and `\n` terminators. Nulls are
//! empty fields. Files are staged in a temporary sibling and only moved into
//! place by [`BcpFile::commit`], so an aborted run leaves the previous file
//! untouched.

use std::fmt::Display;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::core::error::{CacheError, Result};

/// A record that serializes to one BCP line
pub trait BcpRecord {
    fn fields(&self) -> Vec<String>;
}

/// Field text for a nullable value
pub fn nullable<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Writes records through a delimited, unquoted csv writer
pub struct BcpWriter<W: Write> {
    writer: csv::Writer<W>,
    table: String,
    rows: usize,
}

impl<W: Write> BcpWriter<W> {
    pub fn new(inner: W, table: impl Into<String>, delimiter: u8) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .quote_style(csv::QuoteStyle::Never)
            .terminator(csv::Terminator::Any(b'\n'))
            .has_headers(false)
            .from_writer(inner);
        Self {
            writer,
            table: table.into(),
            rows: 0,
        }
    }

    pub fn write<R: BcpRecord>(&mut self, record: &R) -> Result<()> {
        self.writer
            .write_record(record.fields())
            .map_err(|source| CacheError::Csv {
                table: self.table.clone(),
                source,
            })?;
        self.rows += 1;
        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and hand back the underlying writer
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| CacheError::Io(e.into_error()))
    }
}

/// `<dir>/<table>.bcp`, staged in a temporary file until committed
pub struct BcpFile {
    staged: NamedTempFile,
    target: PathBuf,
}

impl BcpFile {
    pub fn create(dir: &Path, table: &str) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            staged: NamedTempFile::new_in(dir)?,
            target: Self::path_for(dir, table),
        })
    }

    pub fn path_for(dir: &Path, table: &str) -> PathBuf {
        dir.join(format!("{}.bcp", table))
    }

    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn writer(&self, table: &str, delimiter: u8) -> Result<BcpWriter<File>> {
        Ok(BcpWriter::new(self.staged.reopen()?, table, delimiter))
    }

    /// Move the staged file into place
    pub fn commit(self) -> Result<PathBuf> {
        let target = self.target.clone();
        self.staged
            .persist(&target)
            .map_err(|e| CacheError::Io(e.error))?;
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    struct Pair(i64, Option<&'static str>);

    impl BcpRecord for Pair {
        fn fields(&self) -> Vec<String> {
            vec![self.0.to_string(), nullable(self.1)]
        }
    }

    #[test]
    fn test_rows_unquoted_with_empty_nulls() {
        let mut writer = BcpWriter::new(Vec::new(), "test", b'\t');
        writer.write(&Pair(1, Some("protein coding, \"maybe\""))).unwrap();
        writer.write(&Pair(2, None)).unwrap();
        assert_eq!(writer.rows(), 2);
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(out, "1\tprotein coding, \"maybe\"\n2\t\n");
    }

    #[test]
    fn test_custom_delimiter() {
        let mut writer = BcpWriter::new(Vec::new(), "test", b'|');
        writer.write(&Pair(7, Some("x"))).unwrap();
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(out, "7|x\n");
    }

    #[test]
    fn test_commit_moves_file_into_place() {
        let tmp = tempdir().unwrap();
        let file = BcpFile::create(tmp.path(), "SEQ_Marker_Cache").unwrap();
        let target = file.target().to_path_buf();

        let mut writer = file.writer("SEQ_Marker_Cache", b'\t').unwrap();
        writer.write(&Pair(1, None)).unwrap();
        writer.finish().unwrap();
        assert!(!target.exists());

        let path = file.commit().unwrap();
        assert_eq!(path, tmp.path().join("SEQ_Marker_Cache.bcp"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "1\t\n");
    }

    #[test]
    fn test_dropped_file_leaves_previous_output() {
        let tmp = tempdir().unwrap();
        let target = BcpFile::path_for(tmp.path(), "T");
        std::fs::write(&target, "old\n").unwrap();

        {
            let file = BcpFile::create(tmp.path(), "T").unwrap();
            let mut writer = file.writer("T", b'\t').unwrap();
            writer.write(&Pair(1, None)).unwrap();
            writer.finish().unwrap();
        }

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "old\n");
    }
}
