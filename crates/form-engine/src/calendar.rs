//! Calendar-aware labelling of the day rows of a timesheet

use chrono::{Datelike, NaiveDate, Weekday};
use form_types::{HolidayMap, Month};

/// Rows every day table draws, whatever the month length
pub const TABLE_DAYS: u32 = 31;

/// Grey used to shade weekend rows
pub const WEEKEND_GRAY: f32 = 0.85;

/// What a day row of a given month represents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayKind {
    /// Past the end of the month; the row stays blank
    Invalid,
    Saturday,
    Sunday,
    Holiday(String),
    Regular,
}

impl DayKind {
    pub fn is_weekend(&self) -> bool {
        matches!(self, DayKind::Saturday | DayKind::Sunday)
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, DayKind::Invalid)
    }
}

/// Classify one day; weekends win over holidays
pub fn classify_day(year: i32, month: Month, day: u32, holidays: &HolidayMap) -> DayKind {
    let Some(date) = NaiveDate::from_ymd_opt(year, month.number(), day) else {
        return DayKind::Invalid;
    };

    match date.weekday() {
        Weekday::Sat => DayKind::Saturday,
        Weekday::Sun => DayKind::Sunday,
        _ => match holidays.get(day) {
            Some(description) => DayKind::Holiday(description.to_string()),
            None => DayKind::Regular,
        },
    }
}

/// Spelling of Saturday printed in the signature columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelStyle {
    /// Inmate forms: `SÁBADO`
    Accented,
    /// SUGESP layout: `SABADO`
    Plain,
}

/// Texts of one day row
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DayRow {
    pub day: String,
    pub entry_hour: String,
    pub entry_text: String,
    pub exit_hour: String,
    pub exit_text: String,
    pub shaded: bool,
}

impl DayRow {
    /// Build the row for `day` with the configured shift times
    pub fn build(
        kind: &DayKind,
        day: u32,
        entry_time: &str,
        exit_time: &str,
        style: LabelStyle,
    ) -> DayRow {
        let dashes = || "---".to_string();
        let day_label = format!("{:02}", day);

        match kind {
            DayKind::Invalid => DayRow::default(),
            DayKind::Saturday => {
                let label = match style {
                    LabelStyle::Accented => "SÁBADO",
                    LabelStyle::Plain => "SABADO",
                };
                DayRow {
                    day: day_label,
                    entry_hour: dashes(),
                    entry_text: label.to_string(),
                    exit_hour: dashes(),
                    exit_text: label.to_string(),
                    shaded: true,
                }
            }
            DayKind::Sunday => DayRow {
                day: day_label,
                entry_hour: dashes(),
                entry_text: "DOMINGO".to_string(),
                exit_hour: dashes(),
                exit_text: "DOMINGO".to_string(),
                shaded: true,
            },
            DayKind::Holiday(description) => {
                let label = description.to_uppercase();
                DayRow {
                    day: day_label,
                    entry_hour: dashes(),
                    entry_text: label.clone(),
                    exit_hour: dashes(),
                    exit_text: label,
                    shaded: false,
                }
            }
            DayKind::Regular => DayRow {
                day: day_label,
                entry_hour: entry_time.to_string(),
                entry_text: String::new(),
                exit_hour: exit_time.to_string(),
                exit_text: String::new(),
                shaded: false,
            },
        }
    }
}

/// The 31 rows of a month table
pub fn month_rows(
    year: i32,
    month: Month,
    holidays: &HolidayMap,
    entry_time: &str,
    exit_time: &str,
    style: LabelStyle,
) -> Vec<(DayKind, DayRow)> {
    (1..=TABLE_DAYS)
        .map(|day| {
            let kind = classify_day(year, month, day, holidays);
            let row = DayRow::build(&kind, day, entry_time, exit_time, style);
            (kind, row)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn holidays() -> HolidayMap {
        // 2026-02-16 is a Monday, 2026-02-21 a Saturday
        vec![(16, "Carnaval".to_string()), (21, "Feriado no sábado".to_string())]
            .into_iter()
            .collect()
    }

    #[test]
    fn days_past_month_end_are_invalid() {
        let map = HolidayMap::new();
        assert_eq!(classify_day(2026, Month::Fevereiro, 29, &map), DayKind::Invalid);
        assert!(classify_day(2028, Month::Fevereiro, 29, &map).is_valid());
        assert_eq!(classify_day(2026, Month::Abril, 31, &map), DayKind::Invalid);
    }

    #[test]
    fn weekend_wins_over_holiday() {
        let map = holidays();
        assert_eq!(classify_day(2026, Month::Fevereiro, 21, &map), DayKind::Saturday);
        assert_eq!(classify_day(2026, Month::Fevereiro, 22, &map), DayKind::Sunday);
        assert_eq!(
            classify_day(2026, Month::Fevereiro, 16, &map),
            DayKind::Holiday("Carnaval".to_string())
        );
        assert_eq!(classify_day(2026, Month::Fevereiro, 17, &map), DayKind::Regular);
    }

    #[test]
    fn rows_carry_labels() {
        let rows = month_rows(2026, Month::Fevereiro, &holidays(), "07:30", "13:30", LabelStyle::Plain);
        assert_eq!(rows.len(), 31);

        let (_, holiday) = &rows[15];
        assert_eq!(holiday.day, "16");
        assert_eq!(holiday.entry_text, "CARNAVAL");
        assert_eq!(holiday.entry_hour, "---");

        let (_, saturday) = &rows[20];
        assert_eq!(saturday.entry_text, "SABADO");
        assert!(saturday.shaded);

        let (_, regular) = &rows[16];
        assert_eq!(regular.entry_hour, "07:30");
        assert_eq!(regular.exit_hour, "13:30");
        assert!(regular.entry_text.is_empty());

        let (kind, blank) = &rows[29];
        assert_eq!(kind, &DayKind::Invalid);
        assert_eq!(blank, &DayRow::default());
    }

    #[test]
    fn accented_saturday_for_inmate_forms() {
        let row = DayRow::build(&DayKind::Saturday, 7, "", "", LabelStyle::Accented);
        assert_eq!(row.exit_text, "SÁBADO");
        assert_eq!(row.day, "07");
    }

    proptest! {
        #[test]
        fn every_month_has_its_length_of_valid_rows(year in 2025i32..2037, m in 1u32..=12) {
            let month = Month::from_number(m).unwrap();
            let valid = (1..=TABLE_DAYS)
                .filter(|d| classify_day(year, month, *d, &HolidayMap::new()).is_valid())
                .count() as u32;
            prop_assert_eq!(valid, month.days_in(year));
        }
    }
}
