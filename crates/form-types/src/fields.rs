//! Untyped key/value state of a form as it sits in the session

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::FormError;

/// Field name to raw text, exactly as typed in the browser
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValues(BTreeMap<String, String>);

impl FieldValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Trimmed text, empty when the field is absent
    pub fn text(&self, key: &str) -> String {
        self.get(key).map(str::trim).unwrap_or_default().to_string()
    }

    /// Trimmed text, or the given default when absent or blank
    pub fn text_or(&self, key: &str, default: &str) -> String {
        match self.get(key).map(str::trim) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => default.to_string(),
        }
    }

    /// Checkbox semantics: present and not an explicit "off" value
    pub fn flag(&self, key: &str) -> bool {
        match self.get(key).map(|v| v.trim().to_lowercase()) {
            Some(value) => !matches!(value.as_str(), "" | "0" | "false" | "off" | "nao" | "não"),
            None => false,
        }
    }

    pub fn number(&self, key: &str) -> Result<Option<u32>, FormError> {
        let raw = self.text(key);
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse::<u32>()
            .map(Some)
            .map_err(|_| FormError::invalid_field(key, format!("'{}' não é um número inteiro", raw)))
    }

    pub fn integer(&self, key: &str) -> Result<Option<i32>, FormError> {
        let raw = self.text(key);
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse::<i32>()
            .map(Some)
            .map_err(|_| FormError::invalid_field(key, format!("'{}' não é um número inteiro", raw)))
    }

    /// Decimal number accepting the Brazilian comma (`124,46`)
    pub fn decimal(&self, key: &str) -> Result<Option<f64>, FormError> {
        let raw = self.text(key);
        if raw.is_empty() {
            return Ok(None);
        }
        parse_decimal(&raw)
            .map(Some)
            .ok_or_else(|| FormError::invalid_field(key, format!("'{}' não é um valor numérico", raw)))
    }

    /// Date typed as `yyyy-mm-dd` (HTML date input) or `dd/mm/yyyy`
    pub fn date(&self, key: &str) -> Result<Option<NaiveDate>, FormError> {
        let raw = self.text(key);
        if raw.is_empty() {
            return Ok(None);
        }
        parse_date(&raw)
            .map(Some)
            .ok_or_else(|| FormError::invalid_field(key, format!("'{}' não é uma data válida", raw)))
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Copy every non-blank value of `other` over this state.
    ///
    /// Returns how many fields were written.
    pub fn merge_non_empty(&mut self, other: &FieldValues) -> usize {
        let mut written = 0;
        for (key, value) in other.iter() {
            if !value.trim().is_empty() {
                self.0.insert(key.to_string(), value.to_string());
                written += 1;
            }
        }
        written
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FieldValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        FieldValues(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

pub fn parse_decimal(raw: &str) -> Option<f64> {
    let value = raw.trim().replace(',', ".").parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .ok()
}

/// `dd/mm/yyyy`, the way every document prints dates
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
