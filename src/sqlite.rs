//! `rusqlite` implementation of the driver traits.
//!
//! Chrono values travel as text: dates bind as `YYYY-MM-DD` and timestamps
//! as `%F %T%.f`, and reads parse the same shapes back. Each row is
//! materialised into owned values on [`Cursor::advance`], so typed reads
//! never re-enter the driver.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::types::Value;

use crate::driver::{ColumnInfo, Connection, Cursor, SqlType, StatementHandle};
use crate::error::SqlRebindError;

impl Connection for rusqlite::Connection {
    type Statement<'conn> = SqliteStatement<'conn>;

    fn prepare<'conn>(&'conn self, sql: &str) -> Result<SqliteStatement<'conn>, SqlRebindError> {
        let stmt = rusqlite::Connection::prepare(self, sql)?;
        let columns = stmt
            .columns()
            .iter()
            .map(|col| ColumnInfo {
                name: col.name().to_string(),
                sql_type: sql_type_from_decl(col.decl_type()),
            })
            .collect();
        Ok(SqliteStatement { stmt, columns })
    }
}

/// Map a declared column type to the tag the row mapper dispatches on.
/// Unknown declarations (e.g. `NUMERIC`) keep their raw text for the
/// unsupported-type message; expression columns have no declaration at all.
fn sql_type_from_decl(decl: Option<&str>) -> SqlType {
    let Some(decl) = decl else {
        return SqlType::Other("untyped".to_string());
    };
    let upper = decl.to_uppercase();
    let base = upper.split('(').next().unwrap_or(&upper).trim();
    match base {
        s if s.starts_with("INT") || s.ends_with("INT") => SqlType::Integer,
        "REAL" | "FLOAT" | "DOUBLE" | "DOUBLE PRECISION" => SqlType::Real,
        s if s.starts_with("BOOL") => SqlType::Boolean,
        "VARCHAR" | "NVARCHAR" | "VARYING CHARACTER" => SqlType::VarChar,
        "TEXT" | "CLOB" => SqlType::Text,
        "CHAR" | "NCHAR" | "CHARACTER" => SqlType::Char,
        "DATETIME" | "TIMESTAMP" => SqlType::Timestamp,
        "DATE" => SqlType::Date,
        _ => SqlType::Other(decl.to_string()),
    }
}

/// A prepared SQLite statement with its column descriptors captured at
/// prepare time.
pub struct SqliteStatement<'conn> {
    stmt: rusqlite::Statement<'conn>,
    columns: Vec<ColumnInfo>,
}

impl StatementHandle for SqliteStatement<'_> {
    type Cursor<'stmt>
        = SqliteCursor<'stmt>
    where
        Self: 'stmt;

    fn bind_int(&mut self, idx: usize, value: i64) -> Result<(), SqlRebindError> {
        Ok(self.stmt.raw_bind_parameter(idx, value)?)
    }

    fn bind_float(&mut self, idx: usize, value: f64) -> Result<(), SqlRebindError> {
        Ok(self.stmt.raw_bind_parameter(idx, value)?)
    }

    fn bind_bool(&mut self, idx: usize, value: bool) -> Result<(), SqlRebindError> {
        Ok(self.stmt.raw_bind_parameter(idx, value)?)
    }

    fn bind_text(&mut self, idx: usize, value: &str) -> Result<(), SqlRebindError> {
        Ok(self.stmt.raw_bind_parameter(idx, value)?)
    }

    fn bind_date(&mut self, idx: usize, value: NaiveDate) -> Result<(), SqlRebindError> {
        let formatted = value.format("%Y-%m-%d").to_string();
        Ok(self.stmt.raw_bind_parameter(idx, formatted)?)
    }

    fn bind_timestamp(
        &mut self,
        idx: usize,
        value: NaiveDateTime,
    ) -> Result<(), SqlRebindError> {
        let formatted = value.format("%F %T%.f").to_string();
        Ok(self.stmt.raw_bind_parameter(idx, formatted)?)
    }

    fn bind_null(&mut self, idx: usize) -> Result<(), SqlRebindError> {
        Ok(self.stmt.raw_bind_parameter(idx, Value::Null)?)
    }

    fn execute_query(&mut self) -> Result<SqliteCursor<'_>, SqlRebindError> {
        let columns = self.columns.clone();
        let rows = self.stmt.raw_query();
        Ok(SqliteCursor {
            rows,
            columns,
            current: Vec::new(),
        })
    }

    fn execute_update(&mut self) -> Result<usize, SqlRebindError> {
        Ok(self.stmt.raw_execute()?)
    }
}

/// Forward-only cursor over a SQLite result, one materialised row at a time.
pub struct SqliteCursor<'stmt> {
    rows: rusqlite::Rows<'stmt>,
    columns: Vec<ColumnInfo>,
    current: Vec<Value>,
}

impl SqliteCursor<'_> {
    fn cell(&self, idx: usize) -> Result<&Value, SqlRebindError> {
        self.current.get(idx).ok_or_else(|| {
            SqlRebindError::ExecutionError(format!("column index {idx} out of range"))
        })
    }
}

fn storage_mismatch(expected: &str, found: &Value) -> SqlRebindError {
    SqlRebindError::ExecutionError(format!("expected {expected} value, found {found:?}"))
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    // A bare date reads as midnight.
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
}

impl Cursor for SqliteCursor<'_> {
    fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    fn advance(&mut self) -> Result<bool, SqlRebindError> {
        self.current.clear();
        match self.rows.next()? {
            Some(row) => {
                for i in 0..self.columns.len() {
                    self.current.push(Value::from(row.get_ref(i)?));
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn read_int(&self, idx: usize) -> Result<Option<i64>, SqlRebindError> {
        match self.cell(idx)? {
            Value::Null => Ok(None),
            Value::Integer(i) => Ok(Some(*i)),
            other => Err(storage_mismatch("integer", other)),
        }
    }

    fn read_float(&self, idx: usize) -> Result<Option<f64>, SqlRebindError> {
        match self.cell(idx)? {
            Value::Null => Ok(None),
            Value::Real(f) => Ok(Some(*f)),
            // Numeric affinity may hand back an integer for a whole number.
            Value::Integer(i) => Ok(Some(*i as f64)),
            other => Err(storage_mismatch("real", other)),
        }
    }

    fn read_bool(&self, idx: usize) -> Result<Option<bool>, SqlRebindError> {
        match self.cell(idx)? {
            Value::Null => Ok(None),
            Value::Integer(i) => Ok(Some(*i != 0)),
            other => Err(storage_mismatch("boolean", other)),
        }
    }

    fn read_text(&self, idx: usize) -> Result<Option<String>, SqlRebindError> {
        match self.cell(idx)? {
            Value::Null => Ok(None),
            Value::Text(s) => Ok(Some(s.clone())),
            other => Err(storage_mismatch("text", other)),
        }
    }

    fn read_date(&self, idx: usize) -> Result<Option<NaiveDate>, SqlRebindError> {
        match self.cell(idx)? {
            Value::Null => Ok(None),
            Value::Text(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Some)
                .map_err(|e| {
                    SqlRebindError::ExecutionError(format!("cannot parse '{s}' as date: {e}"))
                }),
            other => Err(storage_mismatch("date", other)),
        }
    }

    fn read_timestamp(&self, idx: usize) -> Result<Option<NaiveDateTime>, SqlRebindError> {
        match self.cell(idx)? {
            Value::Null => Ok(None),
            Value::Text(s) => parse_timestamp(s).map(Some).ok_or_else(|| {
                SqlRebindError::ExecutionError(format!("cannot parse '{s}' as timestamp"))
            }),
            other => Err(storage_mismatch("timestamp", other)),
        }
    }
}
