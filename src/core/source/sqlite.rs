//! SQLite database holding the input tables

use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};

use crate::core::error::{CacheError, Result};

use super::{DataSource, SourceRow, TableSpec};

#[derive(Debug)]
pub struct SqliteSource {
    conn: Connection,
    path: PathBuf,
}

impl SqliteSource {
    /// Open an existing database read-only
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(|source| CacheError::Sqlite {
                table: "<open>".to_string(),
                source,
            })?;
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Wrap an existing connection (tests use in-memory databases)
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            path: PathBuf::from(":memory:"),
        }
    }

    fn has_table(&self, name: &str) -> rusqlite::Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type IN ('table', 'view') AND name = ?1",
            [name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

impl DataSource for SqliteSource {
    fn read_table<T: SourceRow>(&self, table: &TableSpec) -> Result<Vec<T>> {
        let sql_err = |source: rusqlite::Error| CacheError::Sqlite {
            table: table.name.to_string(),
            source,
        };

        if !self.has_table(table.name).map_err(sql_err)? {
            if table.required {
                return Err(CacheError::MissingTable {
                    table: table.name.to_string(),
                    location: self.path.clone(),
                });
            }
            return Ok(Vec::new());
        }

        let sql = format!(
            "SELECT {} FROM {} ORDER BY rowid",
            T::COLUMNS.join(", "),
            table.name
        );
        let mut stmt = self.conn.prepare(&sql).map_err(sql_err)?;
        let rows = stmt
            .query_map([], |row| T::from_sql_row(row))
            .map_err(sql_err)?;

        rows.map(|row| row.map_err(sql_err)).collect()
    }
}
