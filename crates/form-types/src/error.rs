//! Validation errors raised while turning submitted values into records

use thiserror::Error;

use crate::holidays::HolidayEntryError;

/// Errors shown back to the person filling the form
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("Revise os feriados informados: {}", join_holiday_errors(.0))]
    InvalidHolidays(Vec<HolidayEntryError>),

    #[error("Mês inválido: {0}")]
    InvalidMonth(String),

    #[error("Campo '{field}' inválido: {reason}")]
    InvalidField { field: String, reason: String },

    #[error(
        "O valor total ({total:.2}) é menor que o mínimo exigido para uma parcela ({minimum:.2})"
    )]
    NotInstallable { total: f64, minimum: f64 },

    #[error("Quantidade de parcelas {requested} fora do intervalo permitido (1 a {max})")]
    InstallmentCountOutOfRange { requested: u32, max: u32 },
}

impl FormError {
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FormError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

fn join_holiday_errors(errors: &[HolidayEntryError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holidays::HolidayMap;

    #[test]
    fn holiday_errors_are_listed_in_message() {
        let (_, errors) = HolidayMap::parse("x, 40-Feriado");
        let message = FormError::InvalidHolidays(errors).to_string();
        assert!(message.starts_with("Revise os feriados informados: "));
        assert!(message.contains("\"x\" (faltou \"-\")"));
        assert!(message.contains("\"40-Feriado\" (dia fora de 1-31)"));
    }
}
