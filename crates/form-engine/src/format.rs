//! Brazilian number formatting

/// Format an amount of reais as `R$ 1.234,50`
pub fn format_brl(value: f64) -> String {
    if !value.is_finite() {
        return "R$ 0,00".to_string();
    }

    let cents = (value.abs() * 100.0).round() as u64;
    let units = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, digit) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, fraction)
}

/// Format a percentage with a decimal comma and no trailing zeros.
///
/// Three decimals keep the halved late-deadline rates (0,875%) exact.
pub fn format_percent(value: f64) -> String {
    let text = format!("{:.3}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{}%", text.replace('.', ","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn brl_groups_thousands() {
        assert_eq!(format_brl(1234.5), "R$ 1.234,50");
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(999.999), "R$ 1.000,00");
        assert_eq!(format_brl(1_234_567.891), "R$ 1.234.567,89");
        assert_eq!(format_brl(-12.3), "-R$ 12,30");
    }

    #[test]
    fn brl_non_finite_is_zero() {
        assert_eq!(format_brl(f64::NAN), "R$ 0,00");
        assert_eq!(format_brl(f64::INFINITY), "R$ 0,00");
    }

    #[test]
    fn percent_trims_zeros() {
        assert_eq!(format_percent(11.5), "11,5%");
        assert_eq!(format_percent(20.0), "20%");
        assert_eq!(format_percent(1.75), "1,75%");
        assert_eq!(format_percent(0.0), "0%");
    }

    #[test]
    fn percent_keeps_halved_rates() {
        assert_eq!(format_percent(0.875), "0,875%");
        assert_eq!(format_percent(0.625), "0,625%");
        assert_eq!(format_percent(0.125), "0,125%");
        assert_eq!(format_percent(5.75), "5,75%");
    }
}
