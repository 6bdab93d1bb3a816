//! Label-driven field recognition for the two printed timesheet layouts
//!
//! The extracted text is flattened to one upper-case line, then each value is
//! taken as the text between its label and the label printed after it.

use form_types::records::UNFILLED_DATE;
use form_types::{FieldValues, Month};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref NON_DIGIT: Regex = Regex::new(r"[^0-9]").unwrap();
    static ref YEAR: Regex = Regex::new(r"ANO:\s*(\d{4})").unwrap();
    static ref MONTH: Regex = Regex::new(r"M[ÊE]S:\s*([A-ZÇÃÕ]+)").unwrap();
    static ref CPF: Regex = Regex::new(r"CPF:\s*([\d.\-]+)").unwrap();
    static ref CEP: Regex = Regex::new(r"CEP:\s*([\d.\-]+)").unwrap();
    static ref FILL_DATE: Regex = Regex::new(r"DATA:\s*([0-9_/]+)").unwrap();

    static ref SECRETARIA: Regex = Regex::new(r"SECRETARIA:\s*(.+?)(?:\s+ANO:|$)").unwrap();
    static ref REEDUCANDO: Regex = Regex::new(r"REEDUCANDO:\s*(.+?)(?:\s+M[ÊE]S:|$)").unwrap();
    static ref FUNCAO: Regex = Regex::new(r"FUNÇÃO:\s*(.+?)(?:\s+DATA DA INCLUSÃO:|$)").unwrap();
    static ref INCLUSAO: Regex = Regex::new(r"DATA DA INCLUS[ÃA]O:\s*([\d/]+)").unwrap();
    static ref MUNICIPIO: Regex = Regex::new(r"MUNIC[IÍ]PIO:\s*(.+?)(?:\s+CPF:|$)").unwrap();
    static ref BANCO: Regex = Regex::new(r"BCO:\s*([A-Z0-9]+)").unwrap();
    static ref AGENCIA: Regex = Regex::new(r"AG:\s*([A-Z0-9.\-]+)").unwrap();
    static ref CONTA: Regex = Regex::new(r"CONTA:\s*([A-Z0-9.\-]+)").unwrap();
    static ref TIPO_CONTA: Regex = Regex::new(r"TIPO DE CONTA:\s*(.+)").unwrap();
    static ref INMATE_ENDERECO: Regex = Regex::new(r"ENDEREÇO:\s*(.+?)(?:\s+CEP:|$)").unwrap();
    static ref INMATE_TELEFONE: Regex = Regex::new(r"TELEFONE:\s*([0-9\s\-]+)").unwrap();

    static ref MARKED_CORRENTE: Regex = Regex::new(r"\(\s*X\s*\)\s*CORRENTE").unwrap();
    static ref MARKED_SALARIO: Regex = Regex::new(r"\(\s*X\s*\)\s*SAL[ÁA]RIO").unwrap();
    static ref MARKED_POUPANCA: Regex = Regex::new(r"\(\s*X\s*\)\s*POUPAN[ÇC]A").unwrap();

    static ref UNIDADE: Regex = Regex::new(r"UNIDADE:\s*(.+?)(?:\s+ANO:|$)").unwrap();
    static ref SUB_UNIDADE: Regex = Regex::new(r"SUB\s*UNIDADE:\s*(.+?)(?:\s+M[ÊE]S:|$)").unwrap();
    static ref SETOR: Regex =
        Regex::new(r"SETOR DE LOTA[ÇC][ÃA]O:\s*(.+?)(?:\s+SERVIDOR:|$)").unwrap();
    static ref SERVIDOR: Regex = Regex::new(r"SERVIDOR:\s*(.+?)(?:\s+MATR[IÍ]CULA:|$)").unwrap();
    static ref MATRICULA: Regex = Regex::new(r"MATR[IÍ]CULA:\s*([0-9]+)").unwrap();
    static ref SIGLA: Regex = Regex::new(r"MATR[IÍ]CULA:\s*[0-9]+\s*([A-Z]{2,4})\b").unwrap();
    static ref SIGLA_CELL: Regex = Regex::new(r"M[ÊE]S:\s*[A-ZÇÃÕ]+(.*?)(?:CARGO:|DIA)").unwrap();
    static ref SHORT_TOKEN: Regex = Regex::new(r"\b[A-Z]{2,4}\b").unwrap();
    static ref CARGO: Regex = Regex::new(r"CARGO:\s*(.+?)(?:\s+DIA|$)").unwrap();
    static ref SUGESP_ENDERECO: Regex = Regex::new(r"ENDERE[ÇC]O:\s*(.+?)(?:\s+CEP:|$)").unwrap();
    static ref SUGESP_TELEFONE: Regex = Regex::new(r"TELEFONE:\s*([0-9()\s\-]+)").unwrap();
    static ref EMAIL: Regex =
        Regex::new(r"EMAIL:\s*([A-Z0-9._%+\-]+@[A-Z0-9.\-]+\.[A-Z]{2,})").unwrap();
    static ref YEAR_BEFORE_SUB: Regex = Regex::new(r"\b20\d{2}\b\s*SUB").unwrap();
    static ref SUB_UNIDADE_LABEL: Regex = Regex::new(r"\bSUB\s+UNIDADE:").unwrap();

    // Labels whose repetition inside a captured SUGESP value marks the end of it
    static ref UNIDADE_LABEL: Regex = Regex::new(r"UNIDADE:").unwrap();
    static ref SUB_LABEL: Regex = Regex::new(r"SUB\s+UNIDADE:").unwrap();
    static ref SETOR_LABEL: Regex = Regex::new(r"SETOR DE LOTA[ÇC][ÃA]O:").unwrap();
    static ref SERVIDOR_LABEL: Regex = Regex::new(r"SERVIDOR:").unwrap();
    static ref CARGO_LABEL: Regex = Regex::new(r"CARGO:").unwrap();
    static ref ENDERECO_LABEL: Regex = Regex::new(r"ENDERE[ÇC]O:").unwrap();
    static ref TELEFONE_LABEL: Regex = Regex::new(r"TELEFONE:").unwrap();
    static ref EMAIL_LABEL: Regex = Regex::new(r"EMAIL:").unwrap();
    static ref CPF_LABEL: Regex = Regex::new(r"CPF:").unwrap();
}

/// Tokens next to the SUGESP month cell that are never a unit acronym
const NOT_A_SIGLA: [&str; 3] = ["MATR", "MES", "ANO"];

/// Collapse whitespace, trim and upper-case
pub fn normalise(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_uppercase()
}

fn capture(pattern: &Regex, text: &str) -> String {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// `dd/mm/yyyy` when exactly eight digits were printed, else the blank date
fn normalise_date(raw: &str) -> String {
    if raw.contains('_') {
        return UNFILLED_DATE.to_string();
    }
    let digits = NON_DIGIT.replace_all(raw, "");
    if digits.len() == 8 {
        format!("{}/{}/{}", &digits[..2], &digits[2..4], &digits[4..])
    } else {
        UNFILLED_DATE.to_string()
    }
}

/// Account type from the `(X)` marks, then from keywords
fn normalise_account_type(raw: &str) -> String {
    if MARKED_CORRENTE.is_match(raw) {
        return "Corrente".to_string();
    }
    if MARKED_SALARIO.is_match(raw) {
        return "Salário".to_string();
    }
    if MARKED_POUPANCA.is_match(raw) {
        return "Poupança".to_string();
    }
    if raw.contains("POUP") {
        "Poupança".to_string()
    } else if raw.contains("SAL") {
        "Salário".to_string()
    } else if raw.contains("CORRENTE") {
        "Corrente".to_string()
    } else {
        raw.to_string()
    }
}

/// Cut a value at its own label printed again, as when a DOCX cell repeats.
///
/// A label leading the value is skipped, so it never cuts the value to
/// nothing.
fn cut_at_repeated_label(value: &str, label: &str) -> String {
    let from = if value.starts_with(label) { label.len() } else { 0 };
    match value[from..].find(label).map(|index| from + index) {
        Some(index) if index > 0 => value[..index].trim().to_string(),
        _ => value.to_string(),
    }
}

/// SUGESP variant: a second occurrence, or a first one past the start, ends the value
fn cut_at_label_match(value: &str, label: &Regex) -> String {
    let starts: Vec<usize> = label.find_iter(value).map(|m| m.start()).collect();
    match starts.as_slice() {
        [_, second, ..] => value[..*second].trim().to_string(),
        [first] if *first > 0 => value[..*first].trim().to_string(),
        _ => value.to_string(),
    }
}

/// Drop a leading label, then keep what precedes a label left inside
fn strip_label(value: &str, label: &Regex) -> String {
    let value = match label.find(value) {
        Some(m) if m.start() == 0 => value[m.end()..].trim(),
        _ => value,
    };
    match label.find(value) {
        Some(m) if m.start() > 0 => value[..m.start()].trim().to_string(),
        Some(m) => value[m.end()..].trim().to_string(),
        None => value.to_string(),
    }
}

fn put(values: &mut FieldValues, key: &str, value: String) {
    if !value.is_empty() {
        values.set(key, value);
    }
}

fn put_year(values: &mut FieldValues, text: &str) {
    if let Ok(year) = capture(&YEAR, text).parse::<i32>() {
        values.set("ano", year.to_string());
    }
}

fn put_month(values: &mut FieldValues, text: &str) {
    let label = capture(&MONTH, text);
    match Month::from_label(&label) {
        Some(month) => values.set("mes", month.number().to_string()),
        None if !label.is_empty() => debug!(label = %label, "Unrecognised month label"),
        None => {}
    }
}

fn put_fill_date(values: &mut FieldValues, text: &str) {
    if FILL_DATE.is_match(text) {
        values.set("data_preenchimento", normalise_date(&capture(&FILL_DATE, text)));
    }
}

/// Fields of the inmate timesheet (also used by the activity report)
pub fn parse_inmate_sheet(text: &str) -> FieldValues {
    let text = normalise(text);
    let mut values = FieldValues::new();

    let repeated = |value: String, label: &str| cut_at_repeated_label(&value, label);
    put(&mut values, "secretaria", repeated(capture(&SECRETARIA, &text), "SECRETARIA:"));
    put_year(&mut values, &text);
    put(&mut values, "reeducando", repeated(capture(&REEDUCANDO, &text), "REEDUCANDO:"));
    put_month(&mut values, &text);
    put(&mut values, "funcao", repeated(capture(&FUNCAO, &text), "FUNÇÃO:"));
    put(&mut values, "data_inclusao", capture(&INCLUSAO, &text));
    put(&mut values, "municipio", repeated(capture(&MUNICIPIO, &text), "MUNICÍPIO:"));
    put(&mut values, "cpf", capture(&CPF, &text));
    put(&mut values, "banco", capture(&BANCO, &text));
    put(&mut values, "agencia", capture(&AGENCIA, &text));
    put(&mut values, "conta", capture(&CONTA, &text));

    let account = capture(&TIPO_CONTA, &text);
    if !account.is_empty() {
        match normalise_account_type(&account).as_str() {
            known @ ("Corrente" | "Salário" | "Poupança") => values.set("tipo_conta", known),
            other => {
                values.set("tipo_conta", "Outro");
                values.set("tipo_conta_outro", other);
            }
        }
    }

    put(&mut values, "endereco", repeated(capture(&INMATE_ENDERECO, &text), "ENDEREÇO:"));
    put(&mut values, "cep", capture(&CEP, &text));
    put(&mut values, "telefone", capture(&INMATE_TELEFONE, &text));
    put_fill_date(&mut values, &text);

    debug!(fields = values.len(), "Parsed inmate sheet");
    values
}

/// Fields of the SUGESP timesheet
pub fn parse_sugesp_sheet(text: &str) -> FieldValues {
    let text = normalise(text);
    let mut values = FieldValues::new();

    let cleaned = |pattern: &Regex, label: &Regex| {
        strip_label(&cut_at_label_match(&capture(pattern, &text), label), label)
    };

    let mut unidade = cleaned(&UNIDADE, &UNIDADE_LABEL);
    if let Some(m) = YEAR_BEFORE_SUB.find(&unidade) {
        unidade = unidade[..m.start()].trim().to_string();
    }
    if let Some(m) = SUB_UNIDADE_LABEL.find(&unidade) {
        unidade = unidade[..m.start()].trim().to_string();
    }
    put(&mut values, "unidade", unidade);
    put_year(&mut values, &text);
    put(&mut values, "sub_unidade", cleaned(&SUB_UNIDADE, &SUB_LABEL));
    put_month(&mut values, &text);
    put(&mut values, "setor_lotacao", cleaned(&SETOR, &SETOR_LABEL));
    put(&mut values, "servidor", cleaned(&SERVIDOR, &SERVIDOR_LABEL));
    put(&mut values, "matricula", capture(&MATRICULA, &text));
    put(&mut values, "sigla", sigla(&text));
    put(&mut values, "cargo", cleaned(&CARGO, &CARGO_LABEL));
    put(&mut values, "endereco", cleaned(&SUGESP_ENDERECO, &ENDERECO_LABEL));
    put(&mut values, "cep", capture(&CEP, &text));
    put(&mut values, "telefone", cleaned(&SUGESP_TELEFONE, &TELEFONE_LABEL));
    put(&mut values, "email", cleaned(&EMAIL, &EMAIL_LABEL));
    put(&mut values, "cpf", cleaned(&CPF, &CPF_LABEL));
    put_fill_date(&mut values, &text);

    debug!(fields = values.len(), "Parsed SUGESP sheet");
    values
}

/// Acronym printed after the registration number, or the last short token
/// in the cell under the month
fn sigla(text: &str) -> String {
    let after_registration = capture(&SIGLA, text);
    if !after_registration.is_empty() && !NOT_A_SIGLA.contains(&after_registration.as_str()) {
        return after_registration;
    }

    SIGLA_CELL
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|cell| {
            SHORT_TOKEN
                .find_iter(cell.as_str())
                .map(|m| m.as_str())
                .filter(|token| !NOT_A_SIGLA.contains(token))
                .last()
                .map(str::to_string)
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const INMATE_TEXT: &str = "GOVERNO DO ESTADO DE RONDÔNIA\n\
        SECRETARIA: Sejus   ANO: 2026\n\
        REEDUCANDO: José da Silva MÊS: Março\n\
        FUNÇÃO: Serviços gerais DATA DA INCLUSÃO: 01/02/2025\n\
        MUNICÍPIO: São Miguel do Guaporé CPF: 123.456.789-00\n\
        BCO: 001 AG: 1234-5 CONTA: 98765-0\n\
        TIPO DE CONTA: ( ) CORRENTE (X) SALÁRIO ( ) POUPANÇA\n\
        DIA HE ENTRADA HS SAÍDA\n\
        ENDEREÇO: Rua A, 10 CEP: 76932-000\n\
        TELEFONE: 69 3642-1111 DATA: 05032026";

    #[test]
    fn normalise_collapses_and_uppercases() {
        assert_eq!(normalise("  a\n\tb  ç "), "A B Ç");
    }

    #[test]
    fn parses_a_printed_inmate_sheet() {
        let values = parse_inmate_sheet(INMATE_TEXT);
        assert_eq!(values.text("secretaria"), "SEJUS");
        assert_eq!(values.text("ano"), "2026");
        assert_eq!(values.text("reeducando"), "JOSÉ DA SILVA");
        assert_eq!(values.text("mes"), "3");
        assert_eq!(values.text("funcao"), "SERVIÇOS GERAIS");
        assert_eq!(values.text("data_inclusao"), "01/02/2025");
        assert_eq!(values.text("municipio"), "SÃO MIGUEL DO GUAPORÉ");
        assert_eq!(values.text("cpf"), "123.456.789-00");
        assert_eq!(values.text("banco"), "001");
        assert_eq!(values.text("agencia"), "1234-5");
        assert_eq!(values.text("conta"), "98765-0");
        assert_eq!(values.text("tipo_conta"), "Salário");
        assert_eq!(values.text("endereco"), "RUA A, 10");
        assert_eq!(values.text("cep"), "76932-000");
        assert_eq!(values.text("telefone"), "69 3642-1111");
        assert_eq!(values.text("data_preenchimento"), "05/03/2026");
    }

    #[test]
    fn repeated_label_truncates_the_value() {
        let values = parse_inmate_sheet("SECRETARIA: SEJUS SECRETARIA: SEJUS");
        assert_eq!(values.text("secretaria"), "SEJUS");
    }

    #[test]
    fn value_starting_with_its_label_is_kept() {
        assert_eq!(
            cut_at_repeated_label("SECRETARIA: SEJUS", "SECRETARIA:"),
            "SECRETARIA: SEJUS"
        );
        assert_eq!(
            cut_at_repeated_label("SEJUS SECRETARIA: SEJUS", "SECRETARIA:"),
            "SEJUS"
        );
        assert_eq!(
            cut_at_repeated_label("SECRETARIA: SEJUS SECRETARIA: X", "SECRETARIA:"),
            "SECRETARIA: SEJUS"
        );
    }

    #[test]
    fn unknown_account_type_becomes_other() {
        let values = parse_inmate_sheet("TIPO DE CONTA: PIX");
        assert_eq!(values.text("tipo_conta"), "Outro");
        assert_eq!(values.text("tipo_conta_outro"), "PIX");
    }

    #[test]
    fn account_keywords_without_marks() {
        assert_eq!(normalise_account_type("CONTA POUPANCA"), "Poupança");
        assert_eq!(normalise_account_type("( ) CORRENTE (X) POUPANÇA"), "Poupança");
        assert_eq!(normalise_account_type("CORRENTE"), "Corrente");
    }

    #[test]
    fn dates_need_eight_digits() {
        assert_eq!(normalise_date("01/02/2026"), "01/02/2026");
        assert_eq!(normalise_date("__/__/____"), UNFILLED_DATE);
        assert_eq!(normalise_date("1/2/26"), UNFILLED_DATE);
        assert_eq!(normalise_date(""), UNFILLED_DATE);
    }

    #[test]
    fn missing_labels_leave_values_out() {
        let values = parse_inmate_sheet("nothing useful here");
        assert!(values.is_empty());
    }

    #[test]
    fn parses_a_printed_sugesp_sheet() {
        let text = "GOVERNO DO ESTADO DE RONDONIA\n\
            REGISTRO INDIVIDUAL DE PONTO ANO:\n\
            UNIDADE: AGÊNCIA IDARON 2026 SUB UNIDADE: ULSAV MES: FEVEREIRO\n\
            SETOR DE LOTACAO: ESCRITORIO SERVIDOR: MARIA SOUZA MATRICULA: 300012345 SMG\n\
            CARGO: FISCAL DIA Hr ENTRADA Hr SAIDA\n\
            ENDERECO: AV. BRASIL, 100 CEP: 76932-000\n\
            TELEFONE: (69) 3642-0000 EMAIL: maria@idaron.ro.gov.br CPF: 111.222.333-44\n\
            DATA: 28/02/2026";
        let values = parse_sugesp_sheet(text);
        assert_eq!(values.text("unidade"), "AGÊNCIA IDARON");
        assert_eq!(values.text("sub_unidade"), "ULSAV");
        assert_eq!(values.text("mes"), "2");
        assert_eq!(values.text("setor_lotacao"), "ESCRITORIO");
        assert_eq!(values.text("servidor"), "MARIA SOUZA");
        assert_eq!(values.text("matricula"), "300012345");
        assert_eq!(values.text("sigla"), "SMG");
        assert_eq!(values.text("cargo"), "FISCAL");
        assert_eq!(values.text("endereco"), "AV. BRASIL, 100");
        assert_eq!(values.text("cep"), "76932-000");
        assert_eq!(values.text("telefone"), "(69) 3642-0000");
        assert_eq!(values.text("email"), "MARIA@IDARON.RO.GOV.BR");
        assert_eq!(values.text("cpf"), "111.222.333-44");
        assert_eq!(values.text("data_preenchimento"), "28/02/2026");
    }

    #[test]
    fn sigla_falls_back_to_the_month_cell() {
        assert_eq!(sigla("MES: MARCO SMG CARGO: FISCAL"), "SMG");
        assert_eq!(sigla("MES: MARCO ANO CARGO:"), "");
    }

    proptest! {
        #[test]
        fn parsing_never_panics(text in "\\PC{0,300}") {
            let _ = parse_inmate_sheet(&text);
            let _ = parse_sugesp_sheet(&text);
        }

        #[test]
        fn parsed_values_are_never_blank(text in "[A-Z: 0-9/]{0,200}") {
            for (_, value) in parse_sugesp_sheet(&text).iter() {
                prop_assert!(!value.is_empty());
            }
        }
    }
}
