//! Portuguese month names and the year ranges offered by the forms

use std::ops::RangeInclusive;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::FormError;

/// Years offered by the timesheet forms
pub const TIMESHEET_YEARS: RangeInclusive<i32> = 2025..=2035;

/// Years offered by the vehicle log
pub const VEHICLE_YEARS: RangeInclusive<i32> = 2026..=2036;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Month {
    Janeiro = 1,
    Fevereiro,
    Marco,
    Abril,
    Maio,
    Junho,
    Julho,
    Agosto,
    Setembro,
    Outubro,
    Novembro,
    Dezembro,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Janeiro,
        Month::Fevereiro,
        Month::Marco,
        Month::Abril,
        Month::Maio,
        Month::Junho,
        Month::Julho,
        Month::Agosto,
        Month::Setembro,
        Month::Outubro,
        Month::Novembro,
        Month::Dezembro,
    ];

    pub fn from_number(number: u32) -> Option<Month> {
        Month::ALL.get(number.checked_sub(1)? as usize).copied()
    }

    pub fn number(self) -> u32 {
        self as u32
    }

    /// Upper-case label printed on the timesheets
    pub fn label(self) -> &'static str {
        match self {
            Month::Janeiro => "JANEIRO",
            Month::Fevereiro => "FEVEREIRO",
            Month::Marco => "MARÇO",
            Month::Abril => "ABRIL",
            Month::Maio => "MAIO",
            Month::Junho => "JUNHO",
            Month::Julho => "JULHO",
            Month::Agosto => "AGOSTO",
            Month::Setembro => "SETEMBRO",
            Month::Outubro => "OUTUBRO",
            Month::Novembro => "NOVEMBRO",
            Month::Dezembro => "DEZEMBRO",
        }
    }

    /// Capitalised, unaccented label used by the vehicle log
    pub fn plain_label(self) -> &'static str {
        match self {
            Month::Janeiro => "Janeiro",
            Month::Fevereiro => "Fevereiro",
            Month::Marco => "Marco",
            Month::Abril => "Abril",
            Month::Maio => "Maio",
            Month::Junho => "Junho",
            Month::Julho => "Julho",
            Month::Agosto => "Agosto",
            Month::Setembro => "Setembro",
            Month::Outubro => "Outubro",
            Month::Novembro => "Novembro",
            Month::Dezembro => "Dezembro",
        }
    }

    /// Resolve a label typed by a person or scraped from a document.
    ///
    /// An exact match wins; otherwise the first month sharing the first
    /// three letters is chosen, so `MAR` and `MARCO` both give March.
    pub fn from_label(label: &str) -> Option<Month> {
        let wanted = fold_accents(label.trim()).to_uppercase();
        if wanted.is_empty() {
            return None;
        }

        if let Some(month) = Month::ALL
            .iter()
            .find(|m| fold_accents(m.label()) == wanted)
        {
            return Some(*month);
        }

        let prefix: String = wanted.chars().take(3).collect();
        Month::ALL
            .iter()
            .find(|m| fold_accents(m.label()).starts_with(&prefix))
            .copied()
    }

    /// Number of days of this month in the given year
    pub fn days_in(self, year: i32) -> u32 {
        let first = NaiveDate::from_ymd_opt(year, self.number(), 1);
        let next = if self == Month::Dezembro {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, self.number() + 1, 1)
        };

        match (first, next.and_then(|d| d.pred_opt())) {
            (Some(_), Some(last)) => last.day(),
            _ => 31,
        }
    }
}

impl TryFrom<u32> for Month {
    type Error = FormError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Month::from_number(value).ok_or_else(|| FormError::InvalidMonth(value.to_string()))
    }
}

impl From<Month> for u32 {
    fn from(month: Month) -> u32 {
        month.number()
    }
}

impl Default for Month {
    fn default() -> Self {
        Month::Janeiro
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Keep a year inside the offered range, falling back to its first option
pub fn clamp_year(year: i32, range: &RangeInclusive<i32>) -> i32 {
    if range.contains(&year) {
        year
    } else {
        *range.start()
    }
}

/// Replace Portuguese accented letters by their base letter
pub fn fold_accents(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'Á' | 'À' | 'Â' | 'Ã' | 'Ä' => 'A',
            'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
            'É' | 'È' | 'Ê' | 'Ë' => 'E',
            'é' | 'è' | 'ê' | 'ë' => 'e',
            'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
            'í' | 'ì' | 'î' | 'ï' => 'i',
            'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
            'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
            'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
            'ú' | 'ù' | 'û' | 'ü' => 'u',
            'Ç' => 'C',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_resolve_exactly_and_by_prefix() {
        assert_eq!(Month::from_label("MARÇO"), Some(Month::Marco));
        assert_eq!(Month::from_label("marco"), Some(Month::Marco));
        assert_eq!(Month::from_label("Mar"), Some(Month::Marco));
        assert_eq!(Month::from_label("SETEMBRO"), Some(Month::Setembro));
        assert_eq!(Month::from_label("DEZ"), Some(Month::Dezembro));
        assert_eq!(Month::from_label("XYZ"), None);
        assert_eq!(Month::from_label(""), None);
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(Month::Fevereiro.days_in(2024), 29);
        assert_eq!(Month::Fevereiro.days_in(2025), 28);
        assert_eq!(Month::Dezembro.days_in(2025), 31);
        assert_eq!(Month::Abril.days_in(2026), 30);
    }

    #[test]
    fn serializes_as_number() {
        assert_eq!(serde_json::to_string(&Month::Junho).unwrap(), "6");
        let month: Month = serde_json::from_str("12").unwrap();
        assert_eq!(month, Month::Dezembro);
        assert!(serde_json::from_str::<Month>("13").is_err());
    }

    #[test]
    fn years_outside_range_fall_back() {
        assert_eq!(clamp_year(2030, &TIMESHEET_YEARS), 2030);
        assert_eq!(clamp_year(1999, &TIMESHEET_YEARS), 2025);
        assert_eq!(clamp_year(2025, &VEHICLE_YEARS), 2026);
    }
}
