//! Collaborator boundary: the prepared-statement driver this crate sits on.
//!
//! The rewriting, binding, and mapping engines are generic over these traits;
//! a `rusqlite`-backed implementation ships behind the `sqlite` feature.

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::SqlRebindError;

/// Column type tag reported by a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlType {
    Integer,
    Real,
    Boolean,
    /// Fixed-width character column; stored text may carry trailing padding.
    Char,
    VarChar,
    Text,
    Date,
    Timestamp,
    /// A reported type with no conversion; carries the driver's raw tag.
    Other(String),
}

/// One column reported by a cursor, in the cursor's reported order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub sql_type: SqlType,
}

/// A database connection able to prepare statements.
pub trait Connection {
    type Statement<'conn>: StatementHandle
    where
        Self: 'conn;

    /// Prepare a statement from already-rewritten (positional) SQL.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver rejects the SQL.
    fn prepare<'conn>(&'conn self, sql: &str) -> Result<Self::Statement<'conn>, SqlRebindError>;
}

/// A prepared statement with positional typed bind slots.
///
/// Bind indexes are 1-based, matching prepared-statement convention. Binding
/// may be repeated on the same handle to reuse it across executions.
pub trait StatementHandle {
    type Cursor<'stmt>: Cursor
    where
        Self: 'stmt;

    fn bind_int(&mut self, idx: usize, value: i64) -> Result<(), SqlRebindError>;
    fn bind_float(&mut self, idx: usize, value: f64) -> Result<(), SqlRebindError>;
    fn bind_bool(&mut self, idx: usize, value: bool) -> Result<(), SqlRebindError>;
    fn bind_text(&mut self, idx: usize, value: &str) -> Result<(), SqlRebindError>;
    fn bind_date(&mut self, idx: usize, value: NaiveDate) -> Result<(), SqlRebindError>;
    fn bind_timestamp(&mut self, idx: usize, value: NaiveDateTime)
    -> Result<(), SqlRebindError>;
    fn bind_null(&mut self, idx: usize) -> Result<(), SqlRebindError>;

    /// Execute and return a forward-only cursor over the result rows.
    ///
    /// # Errors
    ///
    /// Returns an error if execution fails in the driver.
    fn execute_query(&mut self) -> Result<Self::Cursor<'_>, SqlRebindError>;

    /// Execute a DML statement and return the affected row count.
    ///
    /// # Errors
    ///
    /// Returns an error if execution fails in the driver.
    fn execute_update(&mut self) -> Result<usize, SqlRebindError>;
}

/// A forward-only, single-reader sequence of result rows.
///
/// Typed reads take 0-based column indexes and return `None` for NULL; the
/// null signal is carried in the `Option` rather than a separate post-read
/// query.
pub trait Cursor {
    /// Column descriptors, in reported order. Valid before the first
    /// [`advance`](Self::advance).
    fn columns(&self) -> &[ColumnInfo];

    /// Move to the next row. Returns `false` once the cursor is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver fails to produce the next row.
    fn advance(&mut self) -> Result<bool, SqlRebindError>;

    fn read_int(&self, idx: usize) -> Result<Option<i64>, SqlRebindError>;
    fn read_float(&self, idx: usize) -> Result<Option<f64>, SqlRebindError>;
    fn read_bool(&self, idx: usize) -> Result<Option<bool>, SqlRebindError>;
    fn read_text(&self, idx: usize) -> Result<Option<String>, SqlRebindError>;
    fn read_date(&self, idx: usize) -> Result<Option<NaiveDate>, SqlRebindError>;
    fn read_timestamp(&self, idx: usize) -> Result<Option<NaiveDateTime>, SqlRebindError>;
}
