use std::collections::HashMap;

use tracing::debug;

use crate::binder::bind_parameters;
use crate::driver::{Connection, StatementHandle};
use crate::error::SqlRebindError;
use crate::rewrite::{ParsedQuery, parse_named_sql};
use crate::value::ParamValue;

/// A prepared statement whose named parameters have been rewritten into
/// positional placeholders.
///
/// Construction parses the SQL text and prepares the rewritten statement on
/// the connection; the parse result and the prepared handle live as long as
/// this value. Bind values by name with [`set_parameters`](Self::set_parameters),
/// then execute through the convenience methods or the raw handle.
pub struct NamedStatement<'conn, C>
where
    C: Connection + 'conn,
{
    statement: C::Statement<'conn>,
    parsed: ParsedQuery,
}

impl<'conn, C> std::fmt::Debug for NamedStatement<'conn, C>
where
    C: Connection + 'conn,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamedStatement")
            .field("parsed", &self.parsed)
            .finish_non_exhaustive()
    }
}

impl<'conn, C> NamedStatement<'conn, C>
where
    C: Connection + 'conn,
{
    /// Rewrite `sql` and prepare the result on `conn`.
    ///
    /// # Errors
    ///
    /// Returns [`SqlRebindError::SqlParse`] for malformed named-parameter
    /// syntax, or the driver's error if preparation fails. No partial value
    /// is produced on failure.
    pub fn prepare(conn: &'conn C, sql: &str) -> Result<Self, SqlRebindError> {
        let parsed = parse_named_sql(sql)?;
        let statement = conn.prepare(parsed.sql())?;
        debug!(
            parameters = parsed.occurrences().len(),
            "prepared named statement"
        );
        Ok(Self { statement, parsed })
    }

    /// Bind every parameter occurrence from `values`, keyed by name.
    ///
    /// May be called again with a fresh map to reuse the prepared handle.
    ///
    /// # Errors
    ///
    /// Returns [`SqlRebindError::ParameterValueMissing`] if an occurrence has
    /// no entry in `values`, or the driver's error if a bind fails.
    pub fn set_parameters(
        &mut self,
        values: &HashMap<String, ParamValue>,
    ) -> Result<(), SqlRebindError> {
        bind_parameters(&mut self.statement, self.parsed.occurrences(), values)
    }

    /// The rewritten SQL and occurrence sequence.
    #[must_use]
    pub fn parsed_query(&self) -> &ParsedQuery {
        &self.parsed
    }

    /// The underlying prepared statement, for direct driver access.
    pub fn handle_mut(&mut self) -> &mut C::Statement<'conn> {
        &mut self.statement
    }

    /// Execute as a query, returning the driver's cursor.
    ///
    /// # Errors
    ///
    /// Returns the driver's error if execution fails.
    pub fn execute_query(
        &mut self,
    ) -> Result<<C::Statement<'conn> as StatementHandle>::Cursor<'_>, SqlRebindError> {
        self.statement.execute_query()
    }

    /// Execute as a DML statement, returning the affected row count.
    ///
    /// # Errors
    ///
    /// Returns the driver's error if execution fails.
    pub fn execute_update(&mut self) -> Result<usize, SqlRebindError> {
        self.statement.execute_update()
    }
}
