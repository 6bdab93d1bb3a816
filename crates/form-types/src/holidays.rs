//! Holiday map and its "day-description" text format
//!
//! People type holidays as `1-Confraternização Universal, 21-Tiradentes`.
//! Each comma separated block is one entry; the day comes before the first
//! dash and the description after it.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Day-of-month to holiday description
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HolidayMap(BTreeMap<u32, String>);

/// Why a typed block was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayErrorReason {
    MissingDash,
    InvalidDay,
    DayOutOfRange,
    EmptyDescription,
}

/// A block of the holiday text that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayEntryError {
    pub block: String,
    pub reason: HolidayErrorReason,
}

impl fmt::Display for HolidayEntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self.reason {
            HolidayErrorReason::MissingDash => "faltou \"-\"",
            HolidayErrorReason::InvalidDay => "dia inválido",
            HolidayErrorReason::DayOutOfRange => "dia fora de 1-31",
            HolidayErrorReason::EmptyDescription => "descrição vazia",
        };
        write!(f, "\"{}\" ({})", self.block, reason)
    }
}

impl HolidayMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the comma separated text, collecting every bad block
    pub fn parse(text: &str) -> (HolidayMap, Vec<HolidayEntryError>) {
        let mut map = BTreeMap::new();
        let mut errors = Vec::new();

        for raw in text.split(',') {
            let block = raw.trim();
            if block.is_empty() {
                continue;
            }

            let reject = |reason| HolidayEntryError {
                block: block.to_string(),
                reason,
            };

            let Some((day_text, description)) = block.split_once('-') else {
                errors.push(reject(HolidayErrorReason::MissingDash));
                continue;
            };

            let day = match day_text.trim().parse::<i64>() {
                Ok(day) => day,
                Err(_) => {
                    errors.push(reject(HolidayErrorReason::InvalidDay));
                    continue;
                }
            };
            if !(1..=31).contains(&day) {
                errors.push(reject(HolidayErrorReason::DayOutOfRange));
                continue;
            }

            let description = description.trim();
            if description.is_empty() {
                errors.push(reject(HolidayErrorReason::EmptyDescription));
                continue;
            }

            map.insert(day as u32, description.to_string());
        }

        (HolidayMap(map), errors)
    }

    /// Parse and fail on the first batch of errors
    pub fn parse_strict(text: &str) -> Result<HolidayMap, crate::FormError> {
        let (map, errors) = Self::parse(text);
        if errors.is_empty() {
            Ok(map)
        } else {
            Err(crate::FormError::InvalidHolidays(errors))
        }
    }

    /// Render back to the typed format, ordered by day
    pub fn to_text(&self) -> String {
        self.0
            .iter()
            .map(|(day, description)| format!("{}-{}", day, description))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn insert(&mut self, day: u32, description: impl Into<String>) {
        self.0.insert(day, description.into());
    }

    pub fn get(&self, day: u32) -> Option<&str> {
        self.0.get(&day).map(String::as_str)
    }

    pub fn contains(&self, day: u32) -> bool {
        self.0.contains_key(&day)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.0.iter().map(|(day, d)| (*day, d.as_str()))
    }
}

impl FromIterator<(u32, String)> for HolidayMap {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        HolidayMap(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn parses_placeholder_example() {
        let (map, errors) = HolidayMap::parse("1-Feriado, 2-Feriado2, 3-Feriado3");
        assert!(errors.is_empty());
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(2), Some("Feriado2"));
    }

    #[test]
    fn description_keeps_inner_dashes() {
        let (map, errors) = HolidayMap::parse("15 - Proclamação - República");
        assert!(errors.is_empty());
        assert_eq!(map.get(15), Some("Proclamação - República"));
    }

    #[test]
    fn collects_every_bad_block() {
        let (map, errors) = HolidayMap::parse("Natal, x-Dia, 0-Zero, 32-Demais, 5-, 7-Ok");
        assert_eq!(map.len(), 1);
        let reasons: Vec<_> = errors.iter().map(|e| e.reason).collect();
        assert_eq!(
            reasons,
            vec![
                HolidayErrorReason::MissingDash,
                HolidayErrorReason::InvalidDay,
                HolidayErrorReason::DayOutOfRange,
                HolidayErrorReason::DayOutOfRange,
                HolidayErrorReason::EmptyDescription,
            ]
        );
    }

    #[test]
    fn blank_text_is_empty_map() {
        let (map, errors) = HolidayMap::parse(" , ,, ");
        assert!(map.is_empty());
        assert!(errors.is_empty());
    }

    #[test]
    fn later_duplicate_wins() {
        let (map, _) = HolidayMap::parse("3-Primeiro, 3-Segundo");
        assert_eq!(map.get(3), Some("Segundo"));
    }

    #[test]
    fn strict_parse_reports_errors() {
        assert!(HolidayMap::parse_strict("1-Ok").is_ok());
        assert!(matches!(
            HolidayMap::parse_strict("abc"),
            Err(crate::FormError::InvalidHolidays(e)) if e.len() == 1
        ));
    }

    #[test]
    fn serializes_as_json_object() {
        let map: HolidayMap = vec![(21, "Tiradentes".to_string())].into_iter().collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"21":"Tiradentes"}"#);
        let back: HolidayMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    proptest! {
        #[test]
        fn text_format_round_trips(
            entries in proptest::collection::btree_map(1u32..=31, "[A-Za-z][A-Za-z0-9 ]{0,20}[A-Za-z0-9]", 0..10)
        ) {
            let map: HolidayMap = entries.into_iter().collect();
            let (parsed, errors) = HolidayMap::parse(&map.to_text());
            prop_assert!(errors.is_empty());
            prop_assert_eq!(parsed, map);
        }
    }
}
