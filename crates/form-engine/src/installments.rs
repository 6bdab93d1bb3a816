//! Discount schedule and installment plans for infraction notices

use chrono::{Months, NaiveDate};
use form_types::{FormError, InstallmentRequest};
use serde::{Deserialize, Serialize};

use crate::format::{format_brl, format_percent};

pub const MAX_INSTALLMENTS: u32 = 30;

/// Discount percent by installment count when the defence was filed in time
#[rustfmt::skip]
const WITHIN_DEADLINE: [f64; MAX_INSTALLMENTS as usize] = [
    20.0, 12.0, 11.5, 11.0, 10.5, 10.0, 9.5, 9.0, 8.5, 8.0,
    7.5, 7.0, 6.5, 6.0, 5.5, 5.0, 4.5, 4.0, 3.5, 3.0,
    2.5, 2.0, 1.75, 1.5, 1.25, 1.0, 0.75, 0.5, 0.25, 0.0,
];

/// Discount percent for `n` installments; late defences get half
pub fn discount_percent(n: u32, within_deadline: bool) -> Option<f64> {
    let index = n.checked_sub(1)? as usize;
    let percent = *WITHIN_DEADLINE.get(index)?;
    Some(if within_deadline { percent } else { percent / 2.0 })
}

/// Fine before discounts
pub fn total_value(request: &InstallmentRequest) -> f64 {
    request.animals as f64 * request.upf_per_animal * request.upf_value
}

/// Smallest amount a single installment may have
pub fn minimum_installment(request: &InstallmentRequest) -> f64 {
    if request.upf_value <= 0.0 {
        0.0
    } else {
        request.min_upf_per_installment * request.upf_value
    }
}

pub fn max_installments(total: f64, minimum: f64) -> u32 {
    if minimum <= 0.0 || total < minimum || !total.is_finite() {
        return 0;
    }
    ((total / minimum).floor() as u32).min(MAX_INSTALLMENTS)
}

/// One line of the discount table shown next to the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountRow {
    pub installments: u32,
    pub percent: f64,
    pub discount: f64,
    pub discounted_total: f64,
    pub installment_value: f64,
}

impl DiscountRow {
    fn compute(total: f64, installments: u32, percent: f64) -> Self {
        let discounted_total = total * (1.0 - percent / 100.0);
        Self {
            installments,
            percent,
            discount: (total - discounted_total).max(0.0),
            discounted_total,
            installment_value: discounted_total / installments as f64,
        }
    }
}

/// Rows for every count the request allows
pub fn discount_table(request: &InstallmentRequest) -> Vec<DiscountRow> {
    let total = total_value(request);
    let max = max_installments(total, minimum_installment(request));
    (1..=max)
        .filter_map(|n| {
            discount_percent(n, request.within_deadline).map(|p| DiscountRow::compute(total, n, p))
        })
        .collect()
}

/// A single dated installment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub number: u32,
    pub value: f64,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallmentPlan {
    pub total: f64,
    pub minimum: f64,
    pub max_installments: u32,
    #[serde(flatten)]
    pub chosen: DiscountRow,
    pub schedule: Vec<Installment>,
}

impl InstallmentPlan {
    /// Paragraph describing the discount the chosen count grants
    pub fn summary(&self) -> String {
        format!(
            "O requerente solicitou o parcelamento em {n} vezes, conforme a tabela de descontos, \
             o que lhe confere o direito a um desconto de {pct} (equivalente a {amount}) sobre o \
             valor inicial. Assim, o valor total, que originalmente era de {total}, passara a ser \
             de {discounted}, distribuido em {n} parcelas de {installment} cada.",
            n = self.chosen.installments,
            pct = format_percent(self.chosen.percent),
            amount = format_brl(self.chosen.discount),
            total = format_brl(self.total),
            discounted = format_brl(self.chosen.discounted_total),
            installment = format_brl(self.chosen.installment_value),
        )
    }
}

/// Banner stating which discount column applies
pub fn deadline_message(within_deadline: bool) -> &'static str {
    if within_deadline {
        "Desconto aplicado para prazo dentro dos 30 dias"
    } else {
        "Desconto aplicado para prazo fora dos 30 dias"
    }
}

pub fn discount_column(within_deadline: bool) -> &'static str {
    if within_deadline {
        "Desconto Concedido (Integral)"
    } else {
        "Desconto Concedido (metade)"
    }
}

/// Hint shown under the installment selector
pub fn limit_message(total: f64, minimum: f64) -> String {
    match max_installments(total, minimum) {
        0 => format!(
            "O valor total e menor que o minimo exigido para uma parcela: R$ {:.2}.",
            minimum
        ),
        max => format!(
            "Eh possivel parcelar em ate {} vezes, respeitando o valor minimo de R$ {:.2} por parcela.",
            max, minimum
        ),
    }
}

/// Build the plan for the count chosen in the request
pub fn plan(request: &InstallmentRequest) -> Result<InstallmentPlan, FormError> {
    let total = total_value(request);
    let minimum = minimum_installment(request);
    let max = max_installments(total, minimum);

    if max == 0 {
        return Err(FormError::NotInstallable { total, minimum });
    }
    let n = request.installments;
    let percent = match discount_percent(n, request.within_deadline) {
        Some(p) if n <= max => p,
        _ => {
            return Err(FormError::InstallmentCountOutOfRange { requested: n, max });
        }
    };

    let chosen = DiscountRow::compute(total, n, percent);
    let schedule = (1..=n)
        .map(|number| Installment {
            number,
            value: chosen.installment_value,
            due_date: add_months(request.request_date, number - 1),
        })
        .collect();

    Ok(InstallmentPlan {
        total,
        minimum,
        max_installments: max,
        chosen,
        schedule,
    })
}

/// Same day `months` later, clamped to the end of shorter months
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn request(animals: u32, installments: u32, within_deadline: bool) -> InstallmentRequest {
        InstallmentRequest {
            request_date: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
            animals,
            installments,
            within_deadline,
            ..InstallmentRequest::default()
        }
    }

    #[test]
    fn discount_lookup() {
        assert_eq!(discount_percent(1, true), Some(20.0));
        assert_eq!(discount_percent(3, true), Some(11.5));
        assert_eq!(discount_percent(3, false), Some(5.75));
        assert_eq!(discount_percent(30, true), Some(0.0));
        assert_eq!(discount_percent(0, true), None);
        assert_eq!(discount_percent(31, false), None);
    }

    #[test]
    fn tables_never_increase() {
        for within in [true, false] {
            for n in 1..MAX_INSTALLMENTS {
                assert!(discount_percent(n, within) >= discount_percent(n + 1, within));
            }
        }
    }

    #[test]
    fn late_defences_use_the_half_column() {
        assert_eq!(discount_column(true), "Desconto Concedido (Integral)");
        assert_eq!(discount_column(false), "Desconto Concedido (metade)");
        assert!(deadline_message(false).ends_with("fora dos 30 dias"));
    }

    #[test]
    fn max_installments_respects_minimum_and_cap() {
        // 10 animals: 10 * 2.5 * 124.46 = 3111.5; minimum 373.38
        assert_eq!(max_installments(3111.5, 373.38), 8);
        assert_eq!(max_installments(100.0, 373.38), 0);
        assert_eq!(max_installments(1_000_000.0, 10.0), 30);
        assert_eq!(max_installments(100.0, 0.0), 0);
    }

    #[test]
    fn plan_for_ten_animals() {
        let plan = plan(&request(10, 2, true)).unwrap();
        assert!((plan.total - 3111.5).abs() < 1e-9);
        assert_eq!(plan.max_installments, 8);
        assert_eq!(plan.chosen.percent, 12.0);
        assert!((plan.chosen.discounted_total - 2738.12).abs() < 1e-9);
        assert!((plan.chosen.installment_value - 1369.06).abs() < 1e-9);
        assert_eq!(plan.schedule.len(), 2);
        assert_eq!(
            plan.schedule[1].due_date,
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
        assert!(plan.summary().contains("desconto de 12%"));
        assert!(plan.summary().contains("R$ 3.111,50"));
    }

    #[test]
    fn late_plan_keeps_three_decimal_discount() {
        let plan = plan(&request(100, 23, false)).unwrap();
        assert_eq!(plan.chosen.percent, 0.875);
        assert!(plan.summary().contains("desconto de 0,875%"));
    }

    #[test]
    fn small_fines_are_not_installable() {
        assert!(matches!(
            plan(&request(1, 1, true)),
            Err(FormError::NotInstallable { .. })
        ));
        assert!(discount_table(&request(1, 1, true)).is_empty());
    }

    #[test]
    fn count_above_max_is_rejected() {
        assert_eq!(
            plan(&request(10, 9, true)),
            Err(FormError::InstallmentCountOutOfRange { requested: 9, max: 8 })
        );
        assert_eq!(
            plan(&request(10, 0, true)),
            Err(FormError::InstallmentCountOutOfRange { requested: 0, max: 8 })
        );
    }

    #[test]
    fn limit_messages() {
        assert_eq!(
            limit_message(3111.5, 373.38),
            "Eh possivel parcelar em ate 8 vezes, respeitando o valor minimo de R$ 373.38 por parcela."
        );
        assert_eq!(
            limit_message(10.0, 373.38),
            "O valor total e menor que o minimo exigido para uma parcela: R$ 373.38."
        );
    }

    #[test]
    fn discount_table_lists_every_allowed_count() {
        let rows = discount_table(&request(10, 1, false));
        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0].percent, 10.0);
        assert_eq!(rows[7].installments, 8);
    }

    proptest! {
        #[test]
        fn installments_sum_to_discounted_total(
            animals in 1u32..500,
            n in 1u32..=30,
            within in any::<bool>(),
        ) {
            let mut req = request(animals, n, within);
            let max = max_installments(total_value(&req), minimum_installment(&req));
            prop_assume!(max >= 1);
            req.installments = n.min(max);
            let plan = plan(&req).unwrap();
            let sum: f64 = plan.schedule.iter().map(|i| i.value).sum();
            prop_assert!((sum - plan.chosen.discounted_total).abs() < 1e-6);
            prop_assert!(plan.chosen.installment_value >= plan.minimum * (1.0 - plan.chosen.percent / 100.0) - 1e-9);
        }

        #[test]
        fn due_dates_strictly_increase(day in 1u32..=31, month in 1u32..=12, n in 1u32..=30) {
            let start = NaiveDate::from_ymd_opt(2026, month, day)
                .unwrap_or_else(|| NaiveDate::from_ymd_opt(2026, month, 28).unwrap());
            let dates: Vec<NaiveDate> = (0..n).map(|i| add_months(start, i)).collect();
            prop_assert!(dates.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
