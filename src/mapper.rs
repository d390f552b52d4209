use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::driver::{ColumnInfo, Cursor, SqlType};
use crate::error::SqlRebindError;

/// How one record field receives a column value.
///
/// Plain function pointers keep binding tables buildable in a static
/// registration step with no captured state. The plain numeric/boolean
/// variants mirror non-nullable fields: a NULL column hands them the zero
/// default, matching prepared-statement drivers' raw accessors. Nullable
/// variants receive `None` for NULL.
pub enum FieldSetter<T> {
    Int(fn(&mut T, i64)),
    NullableInt(fn(&mut T, Option<i64>)),
    Float(fn(&mut T, f64)),
    NullableFloat(fn(&mut T, Option<f64>)),
    Bool(fn(&mut T, bool)),
    NullableBool(fn(&mut T, Option<bool>)),
    Text(fn(&mut T, Option<String>)),
    Date(fn(&mut T, Option<NaiveDate>)),
    Timestamp(fn(&mut T, Option<NaiveDateTime>)),
}

impl<T> FieldSetter<T> {
    /// Stable field-type name used in conversion failure messages.
    fn field_type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "i64",
            Self::NullableInt(_) => "Option<i64>",
            Self::Float(_) => "f64",
            Self::NullableFloat(_) => "Option<f64>",
            Self::Bool(_) => "bool",
            Self::NullableBool(_) => "Option<bool>",
            Self::Text(_) => "Option<String>",
            Self::Date(_) => "Option<NaiveDate>",
            Self::Timestamp(_) => "Option<NaiveDateTime>",
        }
    }
}

/// A declared association between one record field and a source column.
pub struct ColumnBinding<T> {
    column: String,
    trim: bool,
    setter: FieldSetter<T>,
}

impl<T> ColumnBinding<T> {
    /// Bind `setter`'s field to `column` (matched case-insensitively).
    #[must_use]
    pub fn new(column: &str, setter: FieldSetter<T>) -> Self {
        Self {
            column: column.to_uppercase(),
            trim: false,
            setter,
        }
    }

    /// Strip trailing whitespace from non-null fixed-width CHAR values.
    /// Has no effect on other column types.
    #[must_use]
    pub fn trim(mut self) -> Self {
        self.trim = true;
        self
    }
}

/// A record type with a declarative column-binding table.
///
/// Unmapped cursor columns are skipped; unmapped fields keep their
/// `Default` value. At most one field may bind a given column name.
pub trait FromColumns: Default {
    fn column_bindings() -> Vec<ColumnBinding<Self>>
    where
        Self: Sized;
}

/// Map every remaining cursor row into a record, in cursor order.
///
/// # Errors
///
/// Returns [`SqlRebindError::UnsupportedType`] if a column's reported type
/// cannot convert to its bound field (or has no conversion at all), or the
/// driver's error if reading fails.
pub fn map_rows<T: FromColumns, C: Cursor>(cursor: &mut C) -> Result<Vec<T>, SqlRebindError> {
    let bindings = T::column_bindings();
    let mut by_column: HashMap<&str, &ColumnBinding<T>> = HashMap::with_capacity(bindings.len());
    for binding in &bindings {
        let replaced = by_column.insert(binding.column.as_str(), binding).is_some();
        debug_assert!(!replaced, "duplicate column binding for {}", binding.column);
    }

    let columns: Vec<ColumnInfo> = cursor.columns().to_vec();
    let mut out = Vec::new();
    while cursor.advance()? {
        let mut record = T::default();
        for (idx, col) in columns.iter().enumerate() {
            let key = col.name.to_uppercase();
            let Some(binding) = by_column.get(key.as_str()) else {
                continue;
            };
            apply_column(cursor, idx, col, binding, &mut record)?;
        }
        out.push(record);
    }
    debug!(rows = out.len(), "mapped cursor rows");
    Ok(out)
}

/// Map at most one row: `None` for an empty cursor, the single record for
/// exactly one row.
///
/// # Errors
///
/// Returns [`SqlRebindError::MultipleMatch`] carrying the total row count if
/// more than one row was produced, or any error from [`map_rows`].
pub fn map_row<T: FromColumns, C: Cursor>(cursor: &mut C) -> Result<Option<T>, SqlRebindError> {
    let mut rows = map_rows::<T, C>(cursor)?;
    match rows.len() {
        0 => Ok(None),
        1 => Ok(rows.pop()),
        n => Err(SqlRebindError::MultipleMatch(n)),
    }
}

fn apply_column<T, C: Cursor>(
    cursor: &C,
    idx: usize,
    col: &ColumnInfo,
    binding: &ColumnBinding<T>,
    record: &mut T,
) -> Result<(), SqlRebindError> {
    let mismatch = |source: &str| {
        SqlRebindError::column_conversion(
            source,
            binding.setter.field_type_name(),
            &binding.column,
        )
    };

    match &col.sql_type {
        SqlType::Integer => match binding.setter {
            FieldSetter::Int(set) => set(record, cursor.read_int(idx)?.unwrap_or_default()),
            FieldSetter::NullableInt(set) => set(record, cursor.read_int(idx)?),
            _ => return Err(mismatch("integer")),
        },
        SqlType::Real => match binding.setter {
            FieldSetter::Float(set) => set(record, cursor.read_float(idx)?.unwrap_or_default()),
            FieldSetter::NullableFloat(set) => set(record, cursor.read_float(idx)?),
            _ => return Err(mismatch("real")),
        },
        SqlType::Boolean => match binding.setter {
            FieldSetter::Bool(set) => set(record, cursor.read_bool(idx)?.unwrap_or_default()),
            FieldSetter::NullableBool(set) => set(record, cursor.read_bool(idx)?),
            _ => return Err(mismatch("boolean")),
        },
        SqlType::Char => match binding.setter {
            FieldSetter::Text(set) => {
                let mut value = cursor.read_text(idx)?;
                if binding.trim {
                    value = value.map(|s| s.trim_end().to_string());
                }
                set(record, value);
            }
            _ => return Err(mismatch("character")),
        },
        SqlType::VarChar | SqlType::Text => match binding.setter {
            FieldSetter::Text(set) => set(record, cursor.read_text(idx)?),
            _ => return Err(mismatch("text")),
        },
        SqlType::Date => match binding.setter {
            FieldSetter::Date(set) => set(record, cursor.read_date(idx)?),
            FieldSetter::Timestamp(set) => {
                let at_midnight = cursor.read_date(idx)?.map(|d| d.and_time(NaiveTime::MIN));
                set(record, at_midnight);
            }
            _ => return Err(mismatch("date")),
        },
        SqlType::Timestamp => match binding.setter {
            FieldSetter::Timestamp(set) => set(record, cursor.read_timestamp(idx)?),
            _ => return Err(mismatch("timestamp")),
        },
        SqlType::Other(tag) => return Err(SqlRebindError::unknown_column_type(tag)),
    }
    Ok(())
}
