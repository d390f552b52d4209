//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::binder::bind_parameters;
pub use crate::driver::{ColumnInfo, Connection, Cursor, SqlType, StatementHandle};
pub use crate::error::SqlRebindError;
pub use crate::mapper::{ColumnBinding, FieldSetter, FromColumns, map_row, map_rows};
pub use crate::rewrite::{ParsedQuery, parse_named_sql};
pub use crate::statement::NamedStatement;
pub use crate::value::ParamValue;

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteCursor, SqliteStatement};
