use serde::{Deserialize, Serialize};

use super::{month_field, year_field};
use crate::{FieldValues, FormError, Month, VEHICLE_YEARS};

/// Header of the monthly vehicle use and exit control sheet.
///
/// The trip grid itself is always blank and filled by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleLog {
    pub year: i32,
    pub month: Month,
    pub unidade: String,
    pub placa: String,
    pub modelo: String,
}

impl Default for VehicleLog {
    fn default() -> Self {
        Self {
            year: *VEHICLE_YEARS.start(),
            month: Month::default(),
            unidade: String::new(),
            placa: String::new(),
            modelo: String::new(),
        }
    }
}

impl VehicleLog {
    /// Rows of the grid, header included
    pub const ROWS: usize = 14;

    pub fn from_fields(values: &FieldValues) -> Result<Self, FormError> {
        Ok(Self {
            year: year_field(values, "ano", &VEHICLE_YEARS)?,
            month: month_field(values, "mes")?,
            unidade: values.text("unidade"),
            placa: values.text("placa"),
            modelo: values.text("modelo"),
        })
    }

    pub fn to_fields(&self) -> FieldValues {
        vec![
            ("ano", self.year.to_string()),
            ("mes", self.month.number().to_string()),
            ("unidade", self.unidade.clone()),
            ("placa", self.placa.clone()),
            ("modelo", self.modelo.clone()),
        ]
        .into_iter()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_is_clamped_to_vehicle_range() {
        let values: FieldValues = vec![("ano", "2025"), ("mes", "5"), ("placa", "NDI 2293")]
            .into_iter()
            .collect();
        let log = VehicleLog::from_fields(&values).unwrap();
        assert_eq!(log.year, 2026);
        assert_eq!(log.month, Month::Maio);
        assert_eq!(log.placa, "NDI 2293");
    }
}
