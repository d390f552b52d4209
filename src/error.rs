use thiserror::Error;

/// Errors surfaced by statement rewriting, parameter binding, and row mapping.
///
/// Message text is stable: callers (and this crate's tests) match on the
/// rendered strings, so each variant keeps a fixed template.
#[derive(Debug, Error)]
pub enum SqlRebindError {
    /// Malformed named-parameter syntax in the source SQL.
    #[error("SQL parse error: {0}")]
    SqlParse(String),

    /// A parameter occurrence had no entry in the supplied value map.
    #[error("no value supplied for parameter '{0}'")]
    ParameterValueMissing(String),

    /// A column value cannot convert to the bound field, or a reported
    /// column type has no conversion at all.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// The single-result mapping form matched more than one row.
    #[error("query matched {0} rows, expected at most one")]
    MultipleMatch(usize),

    /// Driver-level failure outside the typed error surface.
    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl SqlRebindError {
    pub(crate) fn missing_identifier() -> Self {
        Self::SqlParse("missing identifier after ':'".to_string())
    }

    pub(crate) fn column_conversion(source: &str, field: &str, column: &str) -> Self {
        Self::UnsupportedType(format!(
            "cannot convert {source} column '{column}' into {field} field"
        ))
    }

    pub(crate) fn unknown_column_type(tag: &str) -> Self {
        Self::UnsupportedType(format!("no conversion for column type {tag}"))
    }
}
