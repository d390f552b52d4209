use chrono::{NaiveDate, NaiveDateTime};

/// A value supplied for one named parameter.
///
/// The variant set is closed over the kinds the binder knows how to bind, so
/// dispatch is exhaustive and checked at compile time. One instance is
/// supplied per distinct parameter *name*; the same value is reused for every
/// occurrence of that name in the SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Text/string value
    Text(String),
    /// Calendar date without a time component
    Date(NaiveDate),
    /// Calendar date and time
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
}

impl ParamValue {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        if let Self::Int(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let Self::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        if let Self::Bool(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let Self::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        if let Self::Date(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let Self::Timestamp(value) = self {
            Some(*value)
        } else {
            None
        }
    }
}
