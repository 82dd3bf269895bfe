//! Coercion of submitted form text into typed values.
//!
//! Every field arrives as text. Optional text is kept exactly as submitted,
//! numbers default to zero when missing or blank, and optional ids treat a
//! blank value as "no reference" rather than id 0.

use crate::errors::{Error, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::str::FromStr;

/// Date format accepted for `event_date`
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Submitted key/value form fields.
#[derive(Debug, Clone, Default)]
pub struct FormFields {
    fields: HashMap<String, String>,
}

impl FormFields {
    /// Wraps already-collected fields.
    #[must_use]
    pub const fn new(fields: HashMap<String, String>) -> Self {
        Self { fields }
    }

    /// Raw value of a field, if it was submitted.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// A field that must be present.
    pub fn required(&self, field: &str) -> Result<String> {
        self.get(field)
            .map(str::to_string)
            .ok_or_else(|| Error::MissingField {
                field: field.to_string(),
            })
    }

    /// Optional text, stored as given.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field).map(str::to_string)
    }

    /// Text with a fallback used only when the field is absent.
    #[must_use]
    pub fn text_or(&self, field: &str, default: &str) -> String {
        self.get(field).unwrap_or(default).to_string()
    }

    /// Decimal amount; missing or blank is `0.0`. `NaN` and infinities are
    /// rejected.
    pub fn number_or_zero(&self, field: &str) -> Result<f64> {
        ensure_finite(field, self.parsed(field)?.unwrap_or(0.0))
    }

    /// Whole count; missing or blank is `0`.
    pub fn integer_or_zero(&self, field: &str) -> Result<i64> {
        Ok(self.parsed(field)?.unwrap_or(0))
    }

    /// Optional reference id; missing or blank is `None`.
    pub fn optional_id(&self, field: &str) -> Result<Option<i64>> {
        self.parsed(field)
    }

    /// Required calendar date in `YYYY-MM-DD` form.
    pub fn date(&self, field: &str) -> Result<NaiveDate> {
        let value = self.required(field)?;
        parse_date(&value)
    }

    fn parsed<T: FromStr>(&self, field: &str) -> Result<Option<T>> {
        match self.get(field).map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => value.parse().map(Some).map_err(|_| Error::InvalidField {
                field: field.to_string(),
                value: value.to_string(),
            }),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for FormFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Rejects `NaN` and infinite amounts, which `SQLite` cannot store in a
/// `NOT NULL` real column.
pub fn ensure_finite(field: &str, amount: f64) -> Result<f64> {
    if amount.is_finite() {
        Ok(amount)
    } else {
        Err(Error::InvalidField {
            field: field.to_string(),
            value: amount.to_string(),
        })
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| Error::InvalidDate {
        value: value.to_string(),
    })
}
