//! SQLite serialization for typed enums
//!
//! Implements ToSql and FromSql for SequenceCategory so override category
//! columns read back as typed values.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::core::provider::SequenceCategory;

fn invalid(message: String) -> FromSqlError {
    FromSqlError::Other(Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        message,
    )))
}

// =========================================================================
// SequenceCategory - ToSql/FromSql
// =========================================================================

impl ToSql for SequenceCategory {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.qualifier_term()))
    }
}

impl FromSql for SequenceCategory {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        s.parse().map_err(invalid)
    }
}
