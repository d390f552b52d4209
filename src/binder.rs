use std::collections::HashMap;

use crate::driver::StatementHandle;
use crate::error::SqlRebindError;
use crate::value::ParamValue;

/// Bind one value per parameter occurrence, positionally and 1-based.
///
/// `occurrences` comes from [`crate::rewrite::ParsedQuery`]; the same name's
/// value is re-read from `values` for every occurrence of that name. Binds
/// already applied are left in place if a later lookup fails.
///
/// # Errors
///
/// Returns [`SqlRebindError::ParameterValueMissing`] if an occurrence has no
/// entry in `values`, or the driver's error if a bind primitive fails.
pub fn bind_parameters<S: StatementHandle>(
    stmt: &mut S,
    occurrences: &[String],
    values: &HashMap<String, ParamValue>,
) -> Result<(), SqlRebindError> {
    for (i, name) in occurrences.iter().enumerate() {
        let idx = i + 1;
        let value = values
            .get(name)
            .ok_or_else(|| SqlRebindError::ParameterValueMissing(name.clone()))?;
        match value {
            ParamValue::Int(v) => stmt.bind_int(idx, *v)?,
            ParamValue::Float(v) => stmt.bind_float(idx, *v)?,
            ParamValue::Bool(v) => stmt.bind_bool(idx, *v)?,
            ParamValue::Text(v) => stmt.bind_text(idx, v)?,
            ParamValue::Date(v) => stmt.bind_date(idx, *v)?,
            ParamValue::Timestamp(v) => stmt.bind_timestamp(idx, *v)?,
            ParamValue::Null => stmt.bind_null(idx)?,
        }
    }
    Ok(())
}
