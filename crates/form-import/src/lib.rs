//! Pre-fill support for the timesheet forms
//!
//! A sheet printed by this system (or typed in the same layout) can be
//! uploaded as PDF or DOCX. The text is extracted, normalised and matched
//! against the printed labels; whatever is recognised becomes form values.
//! Nothing here fails hard: unreadable files and missing labels degrade to
//! fewer values plus a warning for the person filling the form.

pub mod error;
pub mod extract;
pub mod parser;

use form_types::FieldValues;
use serde::Serialize;
use tracing::{info, warn};

pub use error::ImportError;
pub use extract::read_upload;
pub use parser::{normalise, parse_inmate_sheet, parse_sugesp_sheet};

pub const UNREADABLE_WARNING: &str = "Nao consegui ler o arquivo enviado.";
pub const NOTHING_FOUND_WARNING: &str = "Nenhum campo reconhecido no arquivo enviado.";

/// Which printed layout the upload is expected to follow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetLayout {
    /// Inmate timesheet and activity report
    Inmate,
    Sugesp,
}

/// Values recognised in an upload plus messages for the user
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportOutcome {
    pub values: FieldValues,
    pub warnings: Vec<String>,
}

impl ImportOutcome {
    /// Whether text could be extracted from the upload at all
    pub fn was_read(&self) -> bool {
        !self.warnings.iter().any(|w| w == UNREADABLE_WARNING)
    }
}

/// Read `bytes` and parse them with the given layout
pub fn import_upload(layout: SheetLayout, file_name: &str, bytes: &[u8]) -> ImportOutcome {
    let text = match read_upload(file_name, bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(file = %file_name, error = %e, "Upload could not be read");
            return ImportOutcome {
                values: FieldValues::new(),
                warnings: vec![UNREADABLE_WARNING.to_string()],
            };
        }
    };

    let values = match layout {
        SheetLayout::Inmate => parse_inmate_sheet(&text),
        SheetLayout::Sugesp => parse_sugesp_sheet(&text),
    };

    let mut warnings = Vec::new();
    if values.is_empty() {
        warn!(file = %file_name, "No field recognised in upload");
        warnings.push(NOTHING_FOUND_WARNING.to_string());
    }

    info!(file = %file_name, ?layout, fields = values.len(), "Parsed upload");
    ImportOutcome { values, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_extension_degrades_to_a_warning() {
        let outcome = import_upload(SheetLayout::Inmate, "folha.odt", b"whatever");
        assert!(outcome.values.is_empty());
        assert_eq!(outcome.warnings, vec![UNREADABLE_WARNING.to_string()]);
        assert!(!outcome.was_read());
    }

    #[test]
    fn docx_table_fills_sugesp_values() {
        use crate::extract::tests::{docx_bytes, paragraph, table};

        let body = format!(
            "{}{}",
            paragraph("REGISTRO INDIVIDUAL DE PONTO"),
            table(&[
                &["SERVIDOR: Maria Souza", "MATRÍCULA: 300012345 SMG"],
                &["CARGO: Fiscal", "DIA"],
            ]),
        );
        let outcome = import_upload(SheetLayout::Sugesp, "sugesp.docx", &docx_bytes(&body));
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.values.text("servidor"), "MARIA SOUZA");
        assert_eq!(outcome.values.text("matricula"), "300012345");
        assert_eq!(outcome.values.text("sigla"), "SMG");
        assert_eq!(outcome.values.text("cargo"), "FISCAL");
    }

    #[test]
    fn reads_back_a_rendered_inmate_timesheet() {
        use form_types::{InmateTimesheet, Month};

        let sheet = InmateTimesheet {
            reeducando: "JOSE DA SILVA".to_string(),
            cpf: "123.456.789-00".to_string(),
            year: 2026,
            month: Month::Marco,
            ..InmateTimesheet::default()
        };
        let bytes =
            form_engine::documents::render_inmate_timesheet(&sheet, &form_engine::Assets::empty())
                .unwrap();
        let outcome = import_upload(SheetLayout::Inmate, "folha.pdf", &bytes);
        assert!(outcome.values.text("reeducando").starts_with("JOSE DA SILVA"));
        assert_eq!(outcome.values.text("cpf"), "123.456.789-00");
    }

    #[test]
    fn text_without_labels_warns() {
        use crate::extract::tests::{docx_bytes, paragraph};

        let outcome = import_upload(SheetLayout::Inmate, "x.docx", &docx_bytes(&paragraph("Olá")));
        assert!(outcome.values.is_empty());
        assert_eq!(outcome.warnings, vec![NOTHING_FOUND_WARNING.to_string()]);
        assert!(outcome.was_read());
    }

    #[test]
    fn corrupt_docx_degrades_to_a_warning() {
        let outcome = import_upload(SheetLayout::Sugesp, "folha.docx", b"PK not really");
        assert_eq!(outcome.warnings, vec![UNREADABLE_WARNING.to_string()]);
    }
}
