//! Named-parameter SQL rewriting and row-to-record mapping over a
//! prepared-statement driver.
//!
//! Two cooperating facilities:
//!
//! - [`NamedStatement`] rewrites human-readable `:name` parameters into the
//!   positional `?` placeholders prepared-statement APIs expect, keeping an
//!   ordered record of which name occupies which position, and binds values
//!   by name.
//! - [`mapper::map_rows`] / [`mapper::map_row`] convert result-cursor rows
//!   into caller-defined record types via a declarative column-binding
//!   table, with typed conversion and null propagation.
//!
//! The database driver itself is a collaborator behind the traits in
//! [`driver`]; a `rusqlite` implementation ships behind the default
//! `sqlite` feature.
//!
//! ```
//! use std::collections::HashMap;
//! use sql_rebind::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let conn = rusqlite::Connection::open_in_memory()?;
//! conn.execute_batch("CREATE TABLE scores (name TEXT, score INTEGER)")?;
//!
//! let mut insert = NamedStatement::prepare(
//!     &conn,
//!     "INSERT INTO scores (name, score) VALUES (:name, :score)",
//! )?;
//! let mut params = HashMap::new();
//! params.insert("name".to_string(), ParamValue::Text("alice".to_string()));
//! params.insert("score".to_string(), ParamValue::Int(42));
//! insert.set_parameters(&params)?;
//! assert_eq!(insert.execute_update()?, 1);
//! # Ok(())
//! # }
//! ```

pub mod binder;
pub mod driver;
pub mod error;
pub mod mapper;
pub mod prelude;
pub mod rewrite;
pub mod statement;
pub mod value;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use error::SqlRebindError;
pub use rewrite::{ParsedQuery, parse_named_sql};
pub use statement::NamedStatement;
pub use value::ParamValue;
