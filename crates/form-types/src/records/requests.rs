use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::fields::format_date;
use crate::{FieldValues, FormError};

pub const DEFAULT_NATIONALITY: &str = "Brasileiro(a)";

pub const DEFAULT_REQUEST: &str = "A restituição do valor recolhido indevidamente, referente ao \
pagamento de GTA Online, conforme razões expostas a seguir:";

pub const DEFAULT_JUSTIFICATION: &str = "O requerente enviou o DARE para um dos filhos pagar, que \
estava fora de área, em seguida enviou para a filha que pagou, quando o filho entrou em área pagou \
novamente em duplicidade.";

pub const DEFAULT_DECLARATION: &str = "Declaro, para os devidos fins, que não existe outro \
processo de restituição referente ao pagamento desta GTA em andamento no âmbito da IDARON.";

/// Refund request for fees paid by mistake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestitutionRequest {
    pub nome: String,
    pub nacionalidade: String,
    pub cpf_cnpj: String,
    pub residente: String,
    pub municipio: String,
    pub propriedade: String,
    pub taxa_gta: bool,
    pub taxa_multa: bool,
    pub vem_requerer: String,
    pub justificativa: String,
    pub titular: String,
    pub conta_cpf: String,
    pub banco: String,
    pub agencia: String,
    pub conta_corrente: String,
    pub numero_banco: String,
    pub tipo: String,
    pub codigo_barras: String,
    pub declaracao: String,
    pub local: String,
    pub data: NaiveDate,
}

impl Default for RestitutionRequest {
    fn default() -> Self {
        Self {
            nome: String::new(),
            nacionalidade: DEFAULT_NATIONALITY.to_string(),
            cpf_cnpj: String::new(),
            residente: String::new(),
            municipio: String::new(),
            propriedade: String::new(),
            taxa_gta: false,
            taxa_multa: false,
            vem_requerer: DEFAULT_REQUEST.to_string(),
            justificativa: DEFAULT_JUSTIFICATION.to_string(),
            titular: String::new(),
            conta_cpf: String::new(),
            banco: String::new(),
            agencia: String::new(),
            conta_corrente: String::new(),
            numero_banco: String::new(),
            tipo: String::new(),
            codigo_barras: String::new(),
            declaracao: DEFAULT_DECLARATION.to_string(),
            local: String::new(),
            data: Local::now().date_naive(),
        }
    }
}

impl RestitutionRequest {
    /// `"{local}, {data}"` without dangling separators
    pub fn place_and_date(&self) -> String {
        let joined = format!("{}, {}", self.local.trim(), format_date(self.data));
        joined.trim_matches(|c| c == ',' || c == ' ').to_string()
    }

    pub fn from_fields(values: &FieldValues) -> Result<Self, FormError> {
        Ok(Self {
            nome: values.text("nome"),
            nacionalidade: values.text("nacionalidade"),
            cpf_cnpj: values.text("cpf_cnpj"),
            residente: values.text("residente"),
            municipio: values.text("municipio"),
            propriedade: values.text("propriedade"),
            taxa_gta: values.flag("taxa_gta"),
            taxa_multa: values.flag("taxa_multa"),
            vem_requerer: values.text("vem_requerer"),
            justificativa: values.text("justificativa"),
            titular: values.text("titular"),
            conta_cpf: values.text("conta_cpf"),
            banco: values.text("banco"),
            agencia: values.text("agencia"),
            conta_corrente: values.text("conta_corrente"),
            numero_banco: values.text("numero_banco"),
            tipo: values.text("tipo"),
            codigo_barras: values.text("codigo_barras"),
            declaracao: values.text("declaracao"),
            local: values.text("local"),
            data: values.date("data")?.unwrap_or_else(|| Local::now().date_naive()),
        })
    }

    pub fn to_fields(&self) -> FieldValues {
        let flag = |on: bool| if on { "on" } else { "" }.to_string();
        vec![
            ("nome", self.nome.clone()),
            ("nacionalidade", self.nacionalidade.clone()),
            ("cpf_cnpj", self.cpf_cnpj.clone()),
            ("residente", self.residente.clone()),
            ("municipio", self.municipio.clone()),
            ("propriedade", self.propriedade.clone()),
            ("taxa_gta", flag(self.taxa_gta)),
            ("taxa_multa", flag(self.taxa_multa)),
            ("vem_requerer", self.vem_requerer.clone()),
            ("justificativa", self.justificativa.clone()),
            ("titular", self.titular.clone()),
            ("conta_cpf", self.conta_cpf.clone()),
            ("banco", self.banco.clone()),
            ("agencia", self.agencia.clone()),
            ("conta_corrente", self.conta_corrente.clone()),
            ("numero_banco", self.numero_banco.clone()),
            ("tipo", self.tipo.clone()),
            ("codigo_barras", self.codigo_barras.clone()),
            ("declaracao", self.declaracao.clone()),
            ("local", self.local.clone()),
            ("data", self.data.format("%Y-%m-%d").to_string()),
        ]
        .into_iter()
        .collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    #[default]
    Masculino,
    Feminino,
}

impl Sex {
    pub fn label(self) -> &'static str {
        match self {
            Sex::Masculino => "Masculino",
            Sex::Feminino => "Feminino",
        }
    }

    pub fn addressee(self) -> &'static str {
        match self {
            Sex::Masculino => "Ao Ilustrissimo Sr.",
            Sex::Feminino => "A Ilustrissima Sra.",
        }
    }

    pub fn salutation(self) -> &'static str {
        match self {
            Sex::Masculino => "Ilmo Sr.",
            Sex::Feminino => "Ilma Sra.",
        }
    }
}

/// Declaration that the requester has no active livestock record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClearanceDeclaration {
    pub sexo: Sex,
    pub data: NaiveDate,
    pub nome: String,
    pub cpf: String,
    pub rg: String,
    pub endereco: String,
    pub municipio: String,
    pub servidor_nome: String,
    pub servidor_cargo: String,
    pub servidor_matricula: String,
    pub incluir_assinatura_requerente: bool,
}

impl Default for ClearanceDeclaration {
    fn default() -> Self {
        Self {
            sexo: Sex::default(),
            data: Local::now().date_naive(),
            nome: String::new(),
            cpf: String::new(),
            rg: String::new(),
            endereco: String::new(),
            municipio: String::new(),
            servidor_nome: String::new(),
            servidor_cargo: String::new(),
            servidor_matricula: String::new(),
            incluir_assinatura_requerente: true,
        }
    }
}

impl ClearanceDeclaration {
    pub const BLANK_NAME: &'static str = "____________________________";

    /// Requester name in capitals, or a blank line to be filled by hand
    pub fn requester_name(&self) -> String {
        let name = self.nome.trim().to_uppercase();
        if name.is_empty() {
            Self::BLANK_NAME.to_string()
        } else {
            name
        }
    }

    /// Officer signing the declaration; the requester stands in when blank
    pub fn officer_name(&self) -> String {
        match self.servidor_nome.trim() {
            "" => self.requester_name(),
            name => name.to_string(),
        }
    }

    /// `CPF x, RG y` with whichever documents were given
    fn identity(&self) -> String {
        let mut parts = Vec::new();
        if !self.cpf.trim().is_empty() {
            parts.push(format!("CPF {}", self.cpf.trim()));
        }
        if !self.rg.trim().is_empty() {
            parts.push(format!("RG {}", self.rg.trim()));
        }
        parts.join(", ")
    }

    pub fn body(&self) -> String {
        let identity = self.identity();
        let identity = if identity.is_empty() {
            String::new()
        } else {
            format!("{}, ", identity)
        };
        let name = self.nome.trim().to_uppercase();

        format!(
            "Ao tempo que aproveitamos para cumprimentar Vossa Senhoria, e em resposta a \
             solicitacao de {} e seus anexos, declaramos que, {}, {}residente e domiciliado {}, \
             no municipio de {}, NAO POSSUI FICHA DE CADASTRO DE BENS SEMOVENTE ATIVA, na \
             Agencia IDARON na presente data.",
            format_date(self.data),
            name,
            identity,
            self.endereco.trim(),
            self.municipio.trim(),
        )
    }

    /// `CPF: x | RG: y` under the requester signature
    pub fn requester_documents(&self) -> String {
        let mut docs = Vec::new();
        if !self.cpf.trim().is_empty() {
            docs.push(format!("CPF: {}", self.cpf.trim()));
        }
        if !self.rg.trim().is_empty() {
            docs.push(format!("RG: {}", self.rg.trim()));
        }
        docs.join(" | ")
    }

    pub fn from_fields(values: &FieldValues) -> Result<Self, FormError> {
        let sexo = match values.text("sexo").as_str() {
            "Feminino" => Sex::Feminino,
            _ => Sex::Masculino,
        };
        Ok(Self {
            sexo,
            data: values.date("data")?.unwrap_or_else(|| Local::now().date_naive()),
            nome: values.text("nome"),
            cpf: values.text("cpf"),
            rg: values.text("rg"),
            endereco: values.text("endereco"),
            municipio: values.text("municipio"),
            servidor_nome: values.text("servidor_nome"),
            servidor_cargo: values.text("servidor_cargo"),
            servidor_matricula: values.text("servidor_matricula"),
            incluir_assinatura_requerente: values.flag("incluir_assinatura_requerente"),
        })
    }

    pub fn to_fields(&self) -> FieldValues {
        vec![
            ("sexo", self.sexo.label().to_string()),
            ("data", self.data.format("%Y-%m-%d").to_string()),
            ("nome", self.nome.clone()),
            ("cpf", self.cpf.clone()),
            ("rg", self.rg.clone()),
            ("endereco", self.endereco.clone()),
            ("municipio", self.municipio.clone()),
            ("servidor_nome", self.servidor_nome.clone()),
            ("servidor_cargo", self.servidor_cargo.clone()),
            ("servidor_matricula", self.servidor_matricula.clone()),
            (
                "incluir_assinatura_requerente",
                if self.incluir_assinatura_requerente { "on" } else { "" }.to_string(),
            ),
        ]
        .into_iter()
        .collect()
    }
}
