//! Form registry and metadata
//!
//! Lists every document the server offers, describes the inputs of each one
//! and dispatches a filled record to its layout.

use std::fmt;
use std::str::FromStr;

use form_types::records::{entry_time_options, exit_time_options};
use form_types::{
    AccountType, ActivityReport, ClearanceDeclaration, FieldValues, FormError, InmateTimesheet,
    InstallmentRequest, Month, RestitutionRequest, Sex, SugespTimesheet, VehicleLog,
    TIMESHEET_YEARS, VEHICLE_YEARS,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assets::Assets;
use crate::documents;
use crate::error::{RenderError, Result};

pub const DEADLINE_WITHIN_LABEL: &str = "Sim (Desconto de 20% pra uma parcela)";
pub const DEADLINE_LATE_LABEL: &str = "Nao (Desconto de 10% pra uma parcela)";
pub const HOLIDAY_PLACEHOLDER: &str = "1-Feriado, 2-Feriado2, 3-Feriado3";

/// The documents the server can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    InmateTimesheet,
    ActivityReport,
    SugespTimesheet,
    VehicleLog,
    InstallmentRequest,
    RestitutionRequest,
    ClearanceDeclaration,
}

impl FormKind {
    pub const ALL: [FormKind; 7] = [
        FormKind::InmateTimesheet,
        FormKind::ActivityReport,
        FormKind::SugespTimesheet,
        FormKind::VehicleLog,
        FormKind::InstallmentRequest,
        FormKind::RestitutionRequest,
        FormKind::ClearanceDeclaration,
    ];

    /// Name used in URLs
    pub fn slug(self) -> &'static str {
        match self {
            FormKind::InmateTimesheet => "inmate_timesheet",
            FormKind::ActivityReport => "activity_report",
            FormKind::SugespTimesheet => "sugesp_timesheet",
            FormKind::VehicleLog => "vehicle_log",
            FormKind::InstallmentRequest => "installment_request",
            FormKind::RestitutionRequest => "restitution_request",
            FormKind::ClearanceDeclaration => "clearance_declaration",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FormKind::InmateTimesheet => "Folha de ponto do reeducando",
            FormKind::ActivityReport => "Relatório de atividades",
            FormKind::SugespTimesheet => "Folha de ponto - SUGESP",
            FormKind::VehicleLog => "Controle de uso e saída de veículo",
            FormKind::InstallmentRequest => "Parcelar auto de infração",
            FormKind::RestitutionRequest => "Requerimento de restituição",
            FormKind::ClearanceDeclaration => "Declaração de nada consta",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            FormKind::InmateTimesheet => "Registro individual de ponto do reeducando, com feriados e fins de semana",
            FormKind::ActivityReport => "Atividades diárias do reeducando com rodapé da ULSAV",
            FormKind::SugespTimesheet => "Registro individual de ponto do servidor no modelo da SUGESP",
            FormKind::VehicleLog => "Planilha mensal de saídas de veículo com checklist",
            FormKind::InstallmentRequest => "Requerimento de parcelamento com tabela de descontos e vencimentos",
            FormKind::RestitutionRequest => "Restituição de taxa recolhida indevidamente",
            FormKind::ClearanceDeclaration => "Declaração de inexistência de ficha de bens semoventes ativa",
        }
    }

    /// File name offered for download
    pub fn download_name(self) -> &'static str {
        match self {
            FormKind::InmateTimesheet => "folha.pdf",
            FormKind::ActivityReport => "relatorio_atividades.pdf",
            FormKind::SugespTimesheet => "folha_sugesp.pdf",
            FormKind::VehicleLog => "controle_uso_saida_veiculo.pdf",
            FormKind::InstallmentRequest => "requerimento_parcelamento.pdf",
            FormKind::RestitutionRequest => "requerimento_restituicao.pdf",
            FormKind::ClearanceDeclaration => "declaracao_nada_consta.pdf",
        }
    }

    /// Whether a previous sheet can be uploaded to pre-fill the form
    pub fn accepts_upload(self) -> bool {
        matches!(
            self,
            FormKind::InmateTimesheet | FormKind::ActivityReport | FormKind::SugespTimesheet
        )
    }

    pub fn fields(self) -> Vec<FieldSpec> {
        match self {
            FormKind::InmateTimesheet => {
                let mut fields = inmate_identity_fields();
                fields.extend([
                    FieldSpec::text("data_inclusao", "Data da inclusão"),
                    FieldSpec::text("cpf", "CPF"),
                    FieldSpec::text("banco", "Banco"),
                    FieldSpec::text("agencia", "Agência"),
                    FieldSpec::text("conta", "Conta"),
                    FieldSpec::select(
                        "tipo_conta",
                        "Tipo de conta",
                        AccountType::CHOICES.iter().map(|c| (c.to_string(), c.to_string())),
                    ),
                    FieldSpec::text("tipo_conta_outro", "Outro tipo de conta"),
                ]);
                fields.extend(contact_fields());
                fields.extend(period_fields(true));
                fields
            }
            FormKind::ActivityReport => {
                let mut fields = inmate_identity_fields();
                fields.extend(contact_fields());
                fields.extend(period_fields(false));
                fields.extend([
                    FieldSpec::textarea("atividade", "Atividade (use {municipio} para o município)"),
                    FieldSpec::text("rodape_titulo", "Rodapé: título"),
                    FieldSpec::text("rodape_endereco", "Rodapé: endereço"),
                    FieldSpec::text("rodape_fone", "Rodapé: telefone"),
                    FieldSpec::text("rodape_cep", "Rodapé: CEP e cidade"),
                    FieldSpec::text("rodape_email", "Rodapé: email"),
                ]);
                fields
            }
            FormKind::SugespTimesheet => {
                let mut fields = vec![
                    FieldSpec::text("unidade", "Unidade"),
                    FieldSpec::text("sub_unidade", "Sub unidade"),
                    FieldSpec::text("setor_lotacao", "Setor de lotação"),
                    FieldSpec::text("servidor", "Servidor"),
                    FieldSpec::text("matricula", "Matrícula"),
                    FieldSpec::text("sigla", "Sigla/Local"),
                    FieldSpec::text("cargo", "Cargo"),
                ];
                fields.extend(contact_fields());
                fields.extend([FieldSpec::text("email", "Email"), FieldSpec::text("cpf", "CPF")]);
                fields.extend(period_fields(true));
                fields
            }
            FormKind::VehicleLog => vec![
                month_select(),
                year_select(VEHICLE_YEARS),
                FieldSpec::text("unidade", "Nome da unidade"),
                FieldSpec::text("placa", "Placa do veículo"),
                FieldSpec::text("modelo", "Modelo"),
            ],
            FormKind::InstallmentRequest => vec![
                FieldSpec::date("data_requerimento", "Data do requerimento"),
                FieldSpec::date("data_auto", "Data do Auto de Infração"),
                FieldSpec::text("numero_auto", "Número do Auto de Infração"),
                FieldSpec::text("nome", "Nome completo"),
                FieldSpec::text("cpf", "Nº do CPF"),
                FieldSpec::text("endereco", "Endereço"),
                FieldSpec::text("municipio", "Município"),
                FieldSpec::text("valor_upf", "Valor da UPF"),
                FieldSpec::number("upf_por_animal", "Qtd UPF por animal/Auto"),
                FieldSpec::number("upf_por_parcela", "Qtd mínima de UPF por parcela"),
                FieldSpec::number("animais", "Número de animais/Auto de Infração"),
                FieldSpec::select(
                    "prazo_defesa",
                    "No prazo de defesa até 30 dias?",
                    [
                        ("sim".to_string(), DEADLINE_WITHIN_LABEL.to_string()),
                        ("nao".to_string(), DEADLINE_LATE_LABEL.to_string()),
                    ],
                ),
                FieldSpec::number("parcelas", "Quantidade de parcelas desejada"),
            ],
            FormKind::RestitutionRequest => vec![
                FieldSpec::checkbox("taxa_gta", "GTA ONLINE"),
                FieldSpec::checkbox("taxa_multa", "Multa IDARON"),
                FieldSpec::text("nome", "Nome"),
                FieldSpec::text("nacionalidade", "Nacionalidade"),
                FieldSpec::text("cpf_cnpj", "CPF/CNPJ"),
                FieldSpec::text("residente", "Residente e domiciliado"),
                FieldSpec::text("municipio", "Município/Distrito"),
                FieldSpec::text("propriedade", "Propriedade"),
                FieldSpec::textarea("vem_requerer", "Vem requerer"),
                FieldSpec::textarea("justificativa", "Justificativa"),
                FieldSpec::text("titular", "Nome do titular da conta"),
                FieldSpec::text("conta_cpf", "CPF do titular"),
                FieldSpec::text("banco", "Banco"),
                FieldSpec::text("agencia", "Agência"),
                FieldSpec::text("conta_corrente", "Conta corrente"),
                FieldSpec::text("numero_banco", "Número do banco"),
                FieldSpec::text("tipo", "Tipo"),
                FieldSpec::textarea("declaracao", "Declaração"),
                FieldSpec::text("codigo_barras", "Código de barras do DARE"),
                FieldSpec::text("local", "Local"),
                FieldSpec::date("data", "Data"),
            ],
            FormKind::ClearanceDeclaration => vec![
                FieldSpec::select(
                    "sexo",
                    "Sexo do requerente",
                    [Sex::Masculino, Sex::Feminino]
                        .map(|s| (s.label().to_string(), s.label().to_string())),
                ),
                FieldSpec::date("data", "Data da solicitação"),
                FieldSpec::text("nome", "Nome do requerente"),
                FieldSpec::text("cpf", "CPF"),
                FieldSpec::text("rg", "RG"),
                FieldSpec::text("endereco", "Endereço"),
                FieldSpec::text("municipio", "Município"),
                FieldSpec::text("servidor_nome", "Servidor responsável"),
                FieldSpec::text("servidor_cargo", "Cargo do servidor"),
                FieldSpec::text("servidor_matricula", "Matrícula do servidor"),
                FieldSpec::checkbox("incluir_assinatura_requerente", "Incluir assinatura do requerente"),
            ],
        }
    }

    pub fn info(self) -> FormInfo {
        FormInfo {
            kind: self,
            slug: self.slug().to_string(),
            title: self.title().to_string(),
            description: self.description().to_string(),
            download_name: self.download_name().to_string(),
            accepts_upload: self.accepts_upload(),
            fields: self.fields(),
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for FormKind {
    type Err = RenderError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        FormKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| RenderError::UnknownForm(s.to_string()))
    }
}

/// How an input is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    TextArea,
    Number,
    Date,
    Checkbox,
    Select,
}

/// One input of a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub key: String,
    pub label: String,
    pub input: InputKind,
    /// `(value, label)` pairs for selects
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

impl FieldSpec {
    fn new(key: &str, label: &str, input: InputKind) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            input,
            options: Vec::new(),
            placeholder: None,
        }
    }

    pub fn text(key: &str, label: &str) -> Self {
        Self::new(key, label, InputKind::Text)
    }

    pub fn textarea(key: &str, label: &str) -> Self {
        Self::new(key, label, InputKind::TextArea)
    }

    pub fn number(key: &str, label: &str) -> Self {
        Self::new(key, label, InputKind::Number)
    }

    pub fn date(key: &str, label: &str) -> Self {
        Self::new(key, label, InputKind::Date)
    }

    pub fn checkbox(key: &str, label: &str) -> Self {
        Self::new(key, label, InputKind::Checkbox)
    }

    pub fn select(key: &str, label: &str, options: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            options: options.into_iter().collect(),
            ..Self::new(key, label, InputKind::Select)
        }
    }

    fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = Some(placeholder.to_string());
        self
    }
}

fn inmate_identity_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::text("secretaria", "Secretaria"),
        FieldSpec::text("reeducando", "Reeducando"),
        FieldSpec::text("funcao", "Função"),
        FieldSpec::text("municipio", "Município"),
    ]
}

fn contact_fields() -> Vec<FieldSpec> {
    vec![
        FieldSpec::text("endereco", "Endereço"),
        FieldSpec::text("cep", "CEP"),
        FieldSpec::text("telefone", "Telefone"),
        FieldSpec::text("data_preenchimento", "Data"),
    ]
}

fn month_select() -> FieldSpec {
    FieldSpec::select(
        "mes",
        "Mês",
        Month::ALL.map(|m| (m.number().to_string(), m.label().to_string())),
    )
}

fn year_select(years: std::ops::RangeInclusive<i32>) -> FieldSpec {
    FieldSpec::select("ano", "Ano", years.map(|y| (y.to_string(), y.to_string())))
}

/// Month, year, shift times and holidays of the timesheet forms
fn period_fields(with_times: bool) -> Vec<FieldSpec> {
    let mut fields = vec![month_select(), year_select(TIMESHEET_YEARS)];
    if with_times {
        let pairs = |options: Vec<String>| options.into_iter().map(|o| (o.clone(), o)).collect::<Vec<_>>();
        fields.push(FieldSpec::select("he", "Horário de entrada", pairs(entry_time_options())));
        fields.push(FieldSpec::select("hs", "Horário de saída", pairs(exit_time_options())));
    }
    fields.push(
        FieldSpec::textarea("feriados", "Feriados (formato: dia-descrição, separados por vírgulas)")
            .with_placeholder(HOLIDAY_PLACEHOLDER),
    );
    fields
}

/// Metadata about an available form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormInfo {
    pub kind: FormKind,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub download_name: String,
    pub accepts_upload: bool,
    pub fields: Vec<FieldSpec>,
}

/// List all available forms
pub fn list_forms() -> Vec<FormInfo> {
    FormKind::ALL.into_iter().map(FormKind::info).collect()
}

/// A filled record of any kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum FormDocument {
    InmateTimesheet(InmateTimesheet),
    ActivityReport(ActivityReport),
    SugespTimesheet(SugespTimesheet),
    VehicleLog(VehicleLog),
    InstallmentRequest(InstallmentRequest),
    RestitutionRequest(RestitutionRequest),
    ClearanceDeclaration(ClearanceDeclaration),
}

impl FormDocument {
    pub fn kind(&self) -> FormKind {
        match self {
            FormDocument::InmateTimesheet(_) => FormKind::InmateTimesheet,
            FormDocument::ActivityReport(_) => FormKind::ActivityReport,
            FormDocument::SugespTimesheet(_) => FormKind::SugespTimesheet,
            FormDocument::VehicleLog(_) => FormKind::VehicleLog,
            FormDocument::InstallmentRequest(_) => FormKind::InstallmentRequest,
            FormDocument::RestitutionRequest(_) => FormKind::RestitutionRequest,
            FormDocument::ClearanceDeclaration(_) => FormKind::ClearanceDeclaration,
        }
    }

    /// The blank form
    pub fn blank(kind: FormKind) -> Self {
        match kind {
            FormKind::InmateTimesheet => FormDocument::InmateTimesheet(Default::default()),
            FormKind::ActivityReport => FormDocument::ActivityReport(Default::default()),
            FormKind::SugespTimesheet => FormDocument::SugespTimesheet(Default::default()),
            FormKind::VehicleLog => FormDocument::VehicleLog(Default::default()),
            FormKind::InstallmentRequest => FormDocument::InstallmentRequest(Default::default()),
            FormKind::RestitutionRequest => FormDocument::RestitutionRequest(Default::default()),
            FormKind::ClearanceDeclaration => FormDocument::ClearanceDeclaration(Default::default()),
        }
    }

    /// Build the record from submitted form values
    pub fn from_fields(kind: FormKind, values: &FieldValues) -> std::result::Result<Self, FormError> {
        Ok(match kind {
            FormKind::InmateTimesheet => FormDocument::InmateTimesheet(InmateTimesheet::from_fields(values)?),
            FormKind::ActivityReport => FormDocument::ActivityReport(ActivityReport::from_fields(values)?),
            FormKind::SugespTimesheet => FormDocument::SugespTimesheet(SugespTimesheet::from_fields(values)?),
            FormKind::VehicleLog => FormDocument::VehicleLog(VehicleLog::from_fields(values)?),
            FormKind::InstallmentRequest => {
                FormDocument::InstallmentRequest(InstallmentRequest::from_fields(values)?)
            }
            FormKind::RestitutionRequest => {
                FormDocument::RestitutionRequest(RestitutionRequest::from_fields(values)?)
            }
            FormKind::ClearanceDeclaration => {
                FormDocument::ClearanceDeclaration(ClearanceDeclaration::from_fields(values)?)
            }
        })
    }

    /// Build the record from a typed JSON body; missing fields take defaults
    pub fn from_json(kind: FormKind, value: serde_json::Value) -> Result<Self> {
        fn parse<T: serde::de::DeserializeOwned>(kind: FormKind, value: serde_json::Value) -> Result<T> {
            serde_json::from_value(value).map_err(|e| RenderError::InvalidJson {
                kind: kind.slug().to_string(),
                message: e.to_string(),
            })
        }

        Ok(match kind {
            FormKind::InmateTimesheet => FormDocument::InmateTimesheet(parse(kind, value)?),
            FormKind::ActivityReport => FormDocument::ActivityReport(parse(kind, value)?),
            FormKind::SugespTimesheet => FormDocument::SugespTimesheet(parse(kind, value)?),
            FormKind::VehicleLog => FormDocument::VehicleLog(parse(kind, value)?),
            FormKind::InstallmentRequest => FormDocument::InstallmentRequest(parse(kind, value)?),
            FormKind::RestitutionRequest => FormDocument::RestitutionRequest(parse(kind, value)?),
            FormKind::ClearanceDeclaration => FormDocument::ClearanceDeclaration(parse(kind, value)?),
        })
    }

    pub fn to_fields(&self) -> FieldValues {
        match self {
            FormDocument::InmateTimesheet(r) => r.to_fields(),
            FormDocument::ActivityReport(r) => r.to_fields(),
            FormDocument::SugespTimesheet(r) => r.to_fields(),
            FormDocument::VehicleLog(r) => r.to_fields(),
            FormDocument::InstallmentRequest(r) => r.to_fields(),
            FormDocument::RestitutionRequest(r) => r.to_fields(),
            FormDocument::ClearanceDeclaration(r) => r.to_fields(),
        }
    }

    /// Lay the record out and return the PDF bytes
    pub fn render_pdf(&self, assets: &Assets) -> Result<Vec<u8>> {
        let bytes = match self {
            FormDocument::InmateTimesheet(r) => documents::render_inmate_timesheet(r, assets)?,
            FormDocument::ActivityReport(r) => documents::render_activity_report(r, assets)?,
            FormDocument::SugespTimesheet(r) => documents::render_sugesp_timesheet(r, assets)?,
            FormDocument::VehicleLog(r) => documents::render_vehicle_log(r, assets)?,
            FormDocument::InstallmentRequest(r) => documents::render_installment_request(r, assets)?,
            FormDocument::RestitutionRequest(r) => documents::render_restitution_request(r, assets)?,
            FormDocument::ClearanceDeclaration(r) => {
                documents::render_clearance_declaration(r, assets)?
            }
        };
        info!(form = %self.kind(), bytes = bytes.len(), "Rendered PDF");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::tests::sample_assets;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn slugs_round_trip() {
        for kind in FormKind::ALL {
            assert_eq!(kind.slug().parse::<FormKind>().unwrap(), kind);
        }
        assert!(matches!(
            "payroll".parse::<FormKind>(),
            Err(RenderError::UnknownForm(_))
        ));
    }

    #[test]
    fn list_forms_describes_every_kind() {
        let forms = list_forms();
        assert_eq!(forms.len(), 7);
        let sugesp = forms.iter().find(|f| f.slug == "sugesp_timesheet").unwrap();
        assert_eq!(sugesp.download_name, "folha_sugesp.pdf");
        assert!(sugesp.accepts_upload);
        assert!(sugesp.fields.iter().any(|f| f.key == "matricula"));
        let vehicle = forms.iter().find(|f| f.slug == "vehicle_log").unwrap();
        let years = vehicle.fields.iter().find(|f| f.key == "ano").unwrap();
        assert_eq!(years.options.first().unwrap().0, "2026");
        assert_eq!(years.options.last().unwrap().0, "2036");
    }

    #[test]
    fn field_keys_match_the_records() {
        // Every key a record writes back must have an input on its form
        for kind in FormKind::ALL {
            let keys: Vec<String> = kind.fields().into_iter().map(|f| f.key).collect();
            for (key, _) in FormDocument::blank(kind).to_fields().iter() {
                assert!(keys.iter().any(|k| k == key), "{} lacks an input for {}", kind, key);
            }
        }
    }

    #[test]
    fn json_bodies_fill_defaults() {
        let doc = FormDocument::from_json(
            FormKind::VehicleLog,
            serde_json::json!({ "placa": "ABC-1234", "month": 3 }),
        )
        .unwrap();
        match doc {
            FormDocument::VehicleLog(log) => {
                assert_eq!(log.placa, "ABC-1234");
                assert_eq!(log.month, Month::Marco);
            }
            other => panic!("unexpected {:?}", other),
        }

        let err = FormDocument::from_json(FormKind::VehicleLog, serde_json::json!({ "month": 13 }))
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidJson { .. }));
    }

    #[test]
    fn installment_json_accepts_comma_decimal() {
        let doc = FormDocument::from_json(
            FormKind::InstallmentRequest,
            serde_json::json!({ "upf_value": "124,46", "animals": 10, "installments": 2 }),
        )
        .unwrap();
        assert!(doc.render_pdf(&Assets::empty()).is_ok());
    }

    #[test]
    fn every_blank_form_renders_except_uninstallable() {
        for kind in FormKind::ALL {
            let result = FormDocument::blank(kind).render_pdf(&sample_assets());
            if kind == FormKind::InstallmentRequest {
                assert!(matches!(result, Err(RenderError::Form(FormError::NotInstallable { .. }))));
            } else {
                let bytes = result.unwrap();
                assert!(bytes.starts_with(b"%PDF-"), "{} did not render", kind);
            }
        }
    }

    proptest! {
        #[test]
        fn rendered_pdfs_are_never_empty(
            kind_index in 0usize..7,
            month in 1u32..=12,
            year in 2025i32..=2035,
            animals in 10u32..200,
        ) {
            let kind = FormKind::ALL[kind_index];
            let mut values = FormDocument::blank(kind).to_fields();
            values.set("mes", month.to_string());
            values.set("ano", year.to_string());
            values.set("animais", animals.to_string());
            values.set("parcelas", "1");
            let doc = FormDocument::from_fields(kind, &values).unwrap();
            let bytes = doc.render_pdf(&Assets::empty()).unwrap();
            prop_assert!(!bytes.is_empty());
        }
    }
}
