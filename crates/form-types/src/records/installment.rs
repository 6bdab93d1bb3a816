use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

use crate::fields::{format_date, parse_decimal};
use crate::{FieldValues, FormError};

pub const DEFAULT_UPF_VALUE: f64 = 124.46;
pub const DEFAULT_UPF_PER_ANIMAL: f64 = 2.5;
pub const DEFAULT_MIN_UPF_PER_INSTALLMENT: f64 = 3.0;

/// Request to pay an infraction notice in monthly installments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallmentRequest {
    pub request_date: NaiveDate,
    pub infraction_date: NaiveDate,
    pub infraction_number: String,
    pub nome: String,
    pub cpf: String,
    pub endereco: String,
    pub municipio: String,
    /// Value of one UPF in reais; JSON may send it as `"124,46"`
    #[serde(deserialize_with = "decimal_or_text")]
    pub upf_value: f64,
    pub upf_per_animal: f64,
    pub min_upf_per_installment: f64,
    pub animals: u32,
    /// Defence presented within the 30-day deadline
    pub within_deadline: bool,
    pub installments: u32,
}

impl Default for InstallmentRequest {
    fn default() -> Self {
        let today = Local::now().date_naive();
        Self {
            request_date: today,
            infraction_date: today,
            infraction_number: String::new(),
            nome: String::new(),
            cpf: String::new(),
            endereco: String::new(),
            municipio: String::new(),
            upf_value: DEFAULT_UPF_VALUE,
            upf_per_animal: DEFAULT_UPF_PER_ANIMAL,
            min_upf_per_installment: DEFAULT_MIN_UPF_PER_INSTALLMENT,
            animals: 0,
            within_deadline: true,
            installments: 1,
        }
    }
}

impl InstallmentRequest {
    pub fn from_fields(values: &FieldValues) -> Result<Self, FormError> {
        let defaults = Self::default();
        Ok(Self {
            request_date: values.date("data_requerimento")?.unwrap_or(defaults.request_date),
            infraction_date: values.date("data_auto")?.unwrap_or(defaults.infraction_date),
            infraction_number: values.text("numero_auto"),
            nome: values.text("nome"),
            cpf: values.text("cpf"),
            endereco: values.text("endereco"),
            municipio: values.text("municipio"),
            upf_value: non_negative(values, "valor_upf", defaults.upf_value)?,
            upf_per_animal: non_negative(values, "upf_por_animal", defaults.upf_per_animal)?,
            min_upf_per_installment: non_negative(
                values,
                "upf_por_parcela",
                defaults.min_upf_per_installment,
            )?,
            animals: values.number("animais")?.unwrap_or(0),
            within_deadline: match values.get("prazo_defesa") {
                Some(_) => values.flag("prazo_defesa"),
                None => defaults.within_deadline,
            },
            installments: values.number("parcelas")?.unwrap_or(1),
        })
    }

    pub fn to_fields(&self) -> FieldValues {
        vec![
            ("data_requerimento", self.request_date.format("%Y-%m-%d").to_string()),
            ("data_auto", self.infraction_date.format("%Y-%m-%d").to_string()),
            ("numero_auto", self.infraction_number.clone()),
            ("nome", self.nome.clone()),
            ("cpf", self.cpf.clone()),
            ("endereco", self.endereco.clone()),
            ("municipio", self.municipio.clone()),
            ("valor_upf", decimal_text(self.upf_value)),
            ("upf_por_animal", decimal_text(self.upf_per_animal)),
            ("upf_por_parcela", decimal_text(self.min_upf_per_installment)),
            ("animais", self.animals.to_string()),
            (
                "prazo_defesa",
                if self.within_deadline { "sim" } else { "nao" }.to_string(),
            ),
            ("parcelas", self.installments.to_string()),
        ]
        .into_iter()
        .collect()
    }

    pub fn request_date_label(&self) -> String {
        format_date(self.request_date)
    }

    pub fn infraction_date_label(&self) -> String {
        format_date(self.infraction_date)
    }
}

fn non_negative(values: &FieldValues, key: &str, default: f64) -> Result<f64, FormError> {
    match values.decimal(key)? {
        Some(value) if value < 0.0 => Err(FormError::invalid_field(key, "o valor não pode ser negativo")),
        Some(value) => Ok(value),
        None => Ok(default),
    }
}

/// Brazilian decimal comma, no trailing zeros
fn decimal_text(value: f64) -> String {
    let text = format!("{:.4}", value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.replace('.', ",")
}

fn decimal_or_text<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(value) => Ok(value),
        Raw::Text(text) => parse_decimal(&text)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid decimal '{}'", text))),
    }
}
