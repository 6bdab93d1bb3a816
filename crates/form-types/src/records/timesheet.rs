use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};

use super::{holidays_field, month_field, option_field, year_field};
use crate::month::clamp_year;
use crate::{FieldValues, FormError, HolidayMap, Month, TIMESHEET_YEARS};

pub const DEFAULT_ENTRY_TIME: &str = "07:30";
pub const DEFAULT_EXIT_TIME: &str = "13:30";

/// Placeholder printed when the filling date is left blank
pub const UNFILLED_DATE: &str = "__/__/____";

pub const DEFAULT_SUGESP_UNIT: &str =
    "SUPERINTENDENCIA DE GESTAO DOS GASTOS PUBLICOS ADMINISTRATIVOS - SUGESP";

pub const DEFAULT_ACTIVITY: &str = "Serviços de limpeza e conservação do prédio, bens materiais e \
utensílios da ULSAV/IDARON de {municipio}. Sob supervisão de um servidor.";

/// 05:00 to 09:00 in half hours
pub fn entry_time_options() -> Vec<String> {
    (5..=9)
        .flat_map(|h| [(h, 0), (h, 30)])
        .filter(|&(h, m)| h < 9 || m == 0)
        .map(|(h, m)| format!("{:02}:{:02}", h, m))
        .collect()
}

/// 10:30 to 17:30 in half hours
pub fn exit_time_options() -> Vec<String> {
    (10..=17)
        .flat_map(|h| [(h, 0), (h, 30)])
        .filter(|&(h, m)| !(h == 10 && m == 0))
        .map(|(h, m)| format!("{:02}:{:02}", h, m))
        .collect()
}

/// Year preselected on a blank form
fn current_year() -> i32 {
    clamp_year(Local::now().year(), &TIMESHEET_YEARS)
}

/// Kind of bank account the inmate's allowance is paid into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AccountType {
    Corrente,
    Salario,
    Poupanca,
    Outro(String),
}

impl AccountType {
    pub const CHOICES: [&'static str; 4] = ["Corrente", "Salário", "Poupança", "Outro"];

    pub fn label(&self) -> &str {
        match self {
            AccountType::Corrente => "Corrente",
            AccountType::Salario => "Salário",
            AccountType::Poupanca => "Poupança",
            AccountType::Outro(text) => text,
        }
    }

    /// Name of the radio choice this value selects
    pub fn choice(&self) -> &'static str {
        match self {
            AccountType::Corrente => "Corrente",
            AccountType::Salario => "Salário",
            AccountType::Poupanca => "Poupança",
            AccountType::Outro(_) => "Outro",
        }
    }

    /// The `TIPO DE CONTA` line with the chosen option marked `(X)`
    pub fn marked_line(&self) -> String {
        let mark = |selected: bool| if selected { "(X)" } else { "( )" };
        let mut line = format!(
            "TIPO DE CONTA: {} CORRENTE {} SALÁRIO {} POUPANÇA",
            mark(*self == AccountType::Corrente),
            mark(*self == AccountType::Salario),
            mark(*self == AccountType::Poupanca),
        );
        if let AccountType::Outro(text) = self {
            if !text.trim().is_empty() {
                line.push_str(&format!(" (X) OUTRO: {}", text.trim().to_uppercase()));
            }
        }
        line
    }
}

impl Default for AccountType {
    fn default() -> Self {
        AccountType::Outro(String::new())
    }
}

impl From<String> for AccountType {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "corrente" => AccountType::Corrente,
            "salário" | "salario" => AccountType::Salario,
            "poupança" | "poupanca" => AccountType::Poupanca,
            _ => AccountType::Outro(value.trim().to_string()),
        }
    }
}

impl From<AccountType> for String {
    fn from(value: AccountType) -> String {
        value.label().to_string()
    }
}

/// Individual time record of an inmate working at the unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InmateTimesheet {
    pub secretaria: String,
    pub reeducando: String,
    pub funcao: String,
    pub data_inclusao: String,
    pub municipio: String,
    pub cpf: String,
    pub banco: String,
    pub agencia: String,
    pub conta: String,
    pub tipo_conta: AccountType,
    pub endereco: String,
    pub cep: String,
    pub telefone: String,
    pub data_preenchimento: String,
    pub year: i32,
    pub month: Month,
    pub entry_time: String,
    pub exit_time: String,
    pub holidays: HolidayMap,
}

impl Default for InmateTimesheet {
    fn default() -> Self {
        Self {
            secretaria: String::new(),
            reeducando: String::new(),
            funcao: String::new(),
            data_inclusao: String::new(),
            municipio: String::new(),
            cpf: String::new(),
            banco: String::new(),
            agencia: String::new(),
            conta: String::new(),
            tipo_conta: AccountType::default(),
            endereco: String::new(),
            cep: String::new(),
            telefone: String::new(),
            data_preenchimento: UNFILLED_DATE.to_string(),
            year: current_year(),
            month: Month::default(),
            entry_time: DEFAULT_ENTRY_TIME.to_string(),
            exit_time: DEFAULT_EXIT_TIME.to_string(),
            holidays: HolidayMap::new(),
        }
    }
}

impl InmateTimesheet {
    pub fn from_fields(values: &FieldValues) -> Result<Self, FormError> {
        let tipo_conta = match values.text("tipo_conta").as_str() {
            "Outro" => AccountType::Outro(values.text("tipo_conta_outro")),
            other => AccountType::from(other.to_string()),
        };

        Ok(Self {
            secretaria: values.text("secretaria"),
            reeducando: values.text("reeducando"),
            funcao: values.text("funcao"),
            data_inclusao: values.text("data_inclusao"),
            municipio: values.text("municipio"),
            cpf: values.text("cpf"),
            banco: values.text("banco"),
            agencia: values.text("agencia"),
            conta: values.text("conta"),
            tipo_conta,
            endereco: values.text("endereco"),
            cep: values.text("cep"),
            telefone: values.text("telefone"),
            data_preenchimento: values.text_or("data_preenchimento", UNFILLED_DATE),
            year: year_field(values, "ano", &TIMESHEET_YEARS)?,
            month: month_field(values, "mes")?,
            entry_time: option_field(values, "he", &entry_time_options(), DEFAULT_ENTRY_TIME),
            exit_time: option_field(values, "hs", &exit_time_options(), DEFAULT_EXIT_TIME),
            holidays: holidays_field(values, "feriados")?,
        })
    }

    pub fn to_fields(&self) -> FieldValues {
        let (tipo, outro) = match &self.tipo_conta {
            AccountType::Outro(text) => ("Outro".to_string(), text.clone()),
            known => (known.label().to_string(), String::new()),
        };

        vec![
            ("secretaria", self.secretaria.clone()),
            ("reeducando", self.reeducando.clone()),
            ("funcao", self.funcao.clone()),
            ("data_inclusao", self.data_inclusao.clone()),
            ("municipio", self.municipio.clone()),
            ("cpf", self.cpf.clone()),
            ("banco", self.banco.clone()),
            ("agencia", self.agencia.clone()),
            ("conta", self.conta.clone()),
            ("tipo_conta", tipo),
            ("tipo_conta_outro", outro),
            ("endereco", self.endereco.clone()),
            ("cep", self.cep.clone()),
            ("telefone", self.telefone.clone()),
            ("data_preenchimento", self.data_preenchimento.clone()),
            ("ano", self.year.to_string()),
            ("mes", self.month.number().to_string()),
            ("he", self.entry_time.clone()),
            ("hs", self.exit_time.clone()),
            ("feriados", self.holidays.to_text()),
        ]
        .into_iter()
        .collect()
    }
}

/// Contact block printed at the bottom of the activity report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterLines {
    pub title: String,
    pub address: String,
    pub phone: String,
    pub city: String,
    pub email: String,
}

impl Default for FooterLines {
    fn default() -> Self {
        Self {
            title: "ULSAV - UNIDADE LOCAL DE SANIDADE ANIMAL E VEGETAL".to_string(),
            address: "Av. São Paulo, 436 – Bairro Centro".to_string(),
            phone: "Fone/Fax: (69) 3642-1026/8479-9229".to_string(),
            city: "CEP 76.932-000 – São Miguel do Guaporé/RO".to_string(),
            email: "saomiguel@idaron.ro.gov.br".to_string(),
        }
    }
}

impl FooterLines {
    pub fn lines(&self) -> [&str; 5] {
        [
            self.title.as_str(),
            self.address.as_str(),
            self.phone.as_str(),
            self.city.as_str(),
            self.email.as_str(),
        ]
    }
}

/// Monthly activity report of an inmate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityReport {
    pub secretaria: String,
    pub reeducando: String,
    pub funcao: String,
    pub municipio: String,
    pub endereco: String,
    pub cep: String,
    pub telefone: String,
    pub data_preenchimento: String,
    pub year: i32,
    pub month: Month,
    pub holidays: HolidayMap,
    /// Text of a working day; `{municipio}` is replaced by the municipality
    pub activity: String,
    pub footer: FooterLines,
}

impl Default for ActivityReport {
    fn default() -> Self {
        Self {
            secretaria: String::new(),
            reeducando: String::new(),
            funcao: String::new(),
            municipio: String::new(),
            endereco: String::new(),
            cep: String::new(),
            telefone: String::new(),
            data_preenchimento: UNFILLED_DATE.to_string(),
            year: current_year(),
            month: Month::default(),
            holidays: HolidayMap::new(),
            activity: DEFAULT_ACTIVITY.to_string(),
            footer: FooterLines::default(),
        }
    }
}

impl ActivityReport {
    /// Activity text with the municipality filled in
    pub fn activity_text(&self) -> String {
        let municipio = if self.municipio.trim().is_empty() {
            "____________"
        } else {
            self.municipio.trim()
        };
        self.activity.replace("{municipio}", municipio)
    }

    pub fn from_fields(values: &FieldValues) -> Result<Self, FormError> {
        let defaults = FooterLines::default();
        Ok(Self {
            secretaria: values.text("secretaria"),
            reeducando: values.text("reeducando"),
            funcao: values.text("funcao"),
            municipio: values.text("municipio"),
            endereco: values.text("endereco"),
            cep: values.text("cep"),
            telefone: values.text("telefone"),
            data_preenchimento: values.text_or("data_preenchimento", UNFILLED_DATE),
            year: year_field(values, "ano", &TIMESHEET_YEARS)?,
            month: month_field(values, "mes")?,
            holidays: holidays_field(values, "feriados")?,
            activity: values.text_or("atividade", DEFAULT_ACTIVITY),
            footer: FooterLines {
                title: values.text_or("rodape_titulo", &defaults.title),
                address: values.text_or("rodape_endereco", &defaults.address),
                phone: values.text_or("rodape_fone", &defaults.phone),
                city: values.text_or("rodape_cep", &defaults.city),
                email: values.text_or("rodape_email", &defaults.email),
            },
        })
    }

    pub fn to_fields(&self) -> FieldValues {
        vec![
            ("secretaria", self.secretaria.clone()),
            ("reeducando", self.reeducando.clone()),
            ("funcao", self.funcao.clone()),
            ("municipio", self.municipio.clone()),
            ("endereco", self.endereco.clone()),
            ("cep", self.cep.clone()),
            ("telefone", self.telefone.clone()),
            ("data_preenchimento", self.data_preenchimento.clone()),
            ("ano", self.year.to_string()),
            ("mes", self.month.number().to_string()),
            ("feriados", self.holidays.to_text()),
            ("atividade", self.activity.clone()),
            ("rodape_titulo", self.footer.title.clone()),
            ("rodape_endereco", self.footer.address.clone()),
            ("rodape_fone", self.footer.phone.clone()),
            ("rodape_cep", self.footer.city.clone()),
            ("rodape_email", self.footer.email.clone()),
        ]
        .into_iter()
        .collect()
    }
}

/// Civil-servant time record in the SUGESP layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SugespTimesheet {
    pub unidade: String,
    pub sub_unidade: String,
    pub setor_lotacao: String,
    pub servidor: String,
    pub matricula: String,
    pub sigla: String,
    pub cargo: String,
    pub endereco: String,
    pub cep: String,
    pub telefone: String,
    pub email: String,
    pub cpf: String,
    pub data_preenchimento: String,
    pub year: i32,
    pub month: Month,
    pub entry_time: String,
    pub exit_time: String,
    pub holidays: HolidayMap,
}

impl Default for SugespTimesheet {
    fn default() -> Self {
        Self {
            unidade: DEFAULT_SUGESP_UNIT.to_string(),
            sub_unidade: String::new(),
            setor_lotacao: String::new(),
            servidor: String::new(),
            matricula: String::new(),
            sigla: String::new(),
            cargo: String::new(),
            endereco: String::new(),
            cep: String::new(),
            telefone: String::new(),
            email: String::new(),
            cpf: String::new(),
            data_preenchimento: UNFILLED_DATE.to_string(),
            year: current_year(),
            month: Month::default(),
            entry_time: DEFAULT_ENTRY_TIME.to_string(),
            exit_time: DEFAULT_EXIT_TIME.to_string(),
            holidays: HolidayMap::new(),
        }
    }
}

impl SugespTimesheet {
    pub fn from_fields(values: &FieldValues) -> Result<Self, FormError> {
        Ok(Self {
            unidade: values.text("unidade"),
            sub_unidade: values.text("sub_unidade"),
            setor_lotacao: values.text("setor_lotacao"),
            servidor: values.text("servidor"),
            matricula: values.text("matricula"),
            sigla: values.text("sigla"),
            cargo: values.text("cargo"),
            endereco: values.text("endereco"),
            cep: values.text("cep"),
            telefone: values.text("telefone"),
            email: values.text("email"),
            cpf: values.text("cpf"),
            data_preenchimento: values.text_or("data_preenchimento", UNFILLED_DATE),
            year: year_field(values, "ano", &TIMESHEET_YEARS)?,
            month: month_field(values, "mes")?,
            entry_time: option_field(values, "he", &entry_time_options(), DEFAULT_ENTRY_TIME),
            exit_time: option_field(values, "hs", &exit_time_options(), DEFAULT_EXIT_TIME),
            holidays: holidays_field(values, "feriados")?,
        })
    }

    pub fn to_fields(&self) -> FieldValues {
        vec![
            ("unidade", self.unidade.clone()),
            ("sub_unidade", self.sub_unidade.clone()),
            ("setor_lotacao", self.setor_lotacao.clone()),
            ("servidor", self.servidor.clone()),
            ("matricula", self.matricula.clone()),
            ("sigla", self.sigla.clone()),
            ("cargo", self.cargo.clone()),
            ("endereco", self.endereco.clone()),
            ("cep", self.cep.clone()),
            ("telefone", self.telefone.clone()),
            ("email", self.email.clone()),
            ("cpf", self.cpf.clone()),
            ("data_preenchimento", self.data_preenchimento.clone()),
            ("ano", self.year.to_string()),
            ("mes", self.month.number().to_string()),
            ("he", self.entry_time.clone()),
            ("hs", self.exit_time.clone()),
            ("feriados", self.holidays.to_text()),
        ]
        .into_iter()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn time_options_cover_the_shift_windows() {
        let entry = entry_time_options();
        assert_eq!(entry.first().map(String::as_str), Some("05:00"));
        assert_eq!(entry.last().map(String::as_str), Some("09:00"));
        assert_eq!(entry.len(), 9);

        let exit = exit_time_options();
        assert_eq!(exit.first().map(String::as_str), Some("10:30"));
        assert_eq!(exit.last().map(String::as_str), Some("17:30"));
        assert_eq!(exit.len(), 15);
    }

    #[test]
    fn account_type_marks_selected_option() {
        assert_eq!(
            AccountType::Corrente.marked_line(),
            "TIPO DE CONTA: (X) CORRENTE ( ) SALÁRIO ( ) POUPANÇA"
        );
        assert_eq!(
            AccountType::Outro("Conta fácil".into()).marked_line(),
            "TIPO DE CONTA: ( ) CORRENTE ( ) SALÁRIO ( ) POUPANÇA (X) OUTRO: CONTA FÁCIL"
        );
        assert_eq!(AccountType::from("salario".to_string()), AccountType::Salario);
    }

    #[test]
    fn inmate_fields_round_trip() {
        let mut sheet = InmateTimesheet {
            reeducando: "ADENIR BELING".into(),
            tipo_conta: AccountType::Poupanca,
            year: 2026,
            month: Month::Fevereiro,
            entry_time: "08:00".into(),
            ..Default::default()
        };
        sheet.holidays.insert(16, "Carnaval");

        let back = InmateTimesheet::from_fields(&sheet.to_fields()).unwrap();
        assert_eq!(back, sheet);
    }

    #[test]
    fn blank_form_uses_defaults() {
        let sheet = InmateTimesheet::from_fields(&FieldValues::new()).unwrap();
        assert_eq!(sheet.data_preenchimento, UNFILLED_DATE);
        assert_eq!(sheet.entry_time, DEFAULT_ENTRY_TIME);
        assert_eq!(sheet.exit_time, DEFAULT_EXIT_TIME);
        assert_eq!(sheet.year, 2025);
    }

    #[test]
    fn bad_holidays_reject_the_form() {
        let values: FieldValues = vec![("feriados", "Natal")].into_iter().collect();
        assert!(matches!(
            SugespTimesheet::from_fields(&values),
            Err(FormError::InvalidHolidays(_))
        ));
    }

    #[test]
    fn activity_text_fills_municipality() {
        let report = ActivityReport {
            municipio: "São Miguel do Guaporé".into(),
            ..Default::default()
        };
        assert!(report
            .activity_text()
            .contains("ULSAV/IDARON de São Miguel do Guaporé."));
    }

    #[test]
    fn sugesp_json_accepts_partial_records() {
        let sheet: SugespTimesheet =
            serde_json::from_str(r#"{"servidor":"FULANO","month":4,"holidays":{"21":"Tiradentes"}}"#)
                .unwrap();
        assert_eq!(sheet.servidor, "FULANO");
        assert_eq!(sheet.month, Month::Abril);
        assert_eq!(sheet.unidade, DEFAULT_SUGESP_UNIT);
        assert_eq!(sheet.holidays.get(21), Some("Tiradentes"));
    }
}
