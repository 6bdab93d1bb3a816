//! Typed records, one per document
//!
//! Each record can be built from the session's [`FieldValues`] and turned
//! back into them, so the HTML form and the JSON API share one model.

mod installment;
mod requests;
mod timesheet;
mod vehicle;

pub use installment::InstallmentRequest;
pub use requests::{ClearanceDeclaration, RestitutionRequest, Sex};
pub use timesheet::{
    entry_time_options, exit_time_options, AccountType, ActivityReport, FooterLines,
    InmateTimesheet, SugespTimesheet, DEFAULT_ENTRY_TIME, DEFAULT_EXIT_TIME,
    UNFILLED_DATE,
};
pub use vehicle::VehicleLog;

use std::ops::RangeInclusive;

use crate::month::clamp_year;
use crate::{FieldValues, FormError, HolidayMap, Month};

/// Month select value: a number from the HTML form or a label from an import
pub(crate) fn month_field(values: &FieldValues, key: &str) -> Result<Month, FormError> {
    let raw = values.text(key);
    if raw.is_empty() {
        return Ok(Month::default());
    }
    if let Ok(number) = raw.parse::<u32>() {
        return Month::try_from(number);
    }
    Month::from_label(&raw).ok_or(FormError::InvalidMonth(raw))
}

pub(crate) fn year_field(
    values: &FieldValues,
    key: &str,
    range: &RangeInclusive<i32>,
) -> Result<i32, FormError> {
    let year = values.integer(key)?.unwrap_or(*range.start());
    Ok(clamp_year(year, range))
}

pub(crate) fn holidays_field(values: &FieldValues, key: &str) -> Result<HolidayMap, FormError> {
    HolidayMap::parse_strict(values.get(key).unwrap_or_default())
}

/// Select semantics: blank gives the default, unknown values the first option
pub(crate) fn option_field(
    values: &FieldValues,
    key: &str,
    options: &[String],
    default: &str,
) -> String {
    let raw = values.text(key);
    if raw.is_empty() {
        return default.to_string();
    }
    if options.iter().any(|o| *o == raw) {
        raw
    } else {
        options.first().cloned().unwrap_or(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_accepts_number_and_label() {
        let values: FieldValues = vec![("a", "3"), ("b", "OUT"), ("c", "13"), ("d", "XX")]
            .into_iter()
            .collect();
        assert_eq!(month_field(&values, "a").unwrap(), Month::Marco);
        assert_eq!(month_field(&values, "b").unwrap(), Month::Outubro);
        assert_eq!(month_field(&values, "z").unwrap(), Month::Janeiro);
        assert!(month_field(&values, "c").is_err());
        assert!(month_field(&values, "d").is_err());
    }

    #[test]
    fn unknown_option_falls_back_to_first() {
        let options = entry_time_options();
        let values: FieldValues = vec![("he", "04:00"), ("ok", "08:30")].into_iter().collect();
        assert_eq!(option_field(&values, "he", &options, DEFAULT_ENTRY_TIME), "05:00");
        assert_eq!(option_field(&values, "ok", &options, DEFAULT_ENTRY_TIME), "08:30");
        assert_eq!(option_field(&values, "x", &options, DEFAULT_ENTRY_TIME), "07:30");
    }
}
