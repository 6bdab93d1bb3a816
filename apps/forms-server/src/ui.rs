//! Browser UI handlers
//!
//! Pages follow post/redirect/get: submitting a form stores the values in the
//! session, renders the PDF and redirects back to the form page, which shows
//! the outcome as flash messages next to the preview.

use axum::{
    extract::{Multipart, Path, State},
    response::{AppendHeaders, Html, IntoResponse, Redirect, Response},
    Form,
};
use form_engine::{list_forms, render_preview, FormDocument, FormKind, RenderError};
use form_import::import_upload;
use form_types::{FieldValues, InstallmentRequest};
use tracing::{debug, error, info};

use crate::api::{form_kind, pdf_response, read_file_part, sheet_layout, DiscountOverview};
use crate::error::ServerError;
use crate::pages::{form_page, index_page, FormPage};
use crate::state::{Flash, FormState, SessionId, SharedState};

pub const PDF_READY: &str = "PDF gerado com sucesso!";
pub const IMPORT_APPLIED: &str = "Campos preenchidos a partir do arquivo.";
pub const NO_FILE_CHOSEN: &str = "Selecione um arquivo PDF ou DOCX.";

fn form_url(kind: FormKind) -> String {
    format!("/forms/{}", kind.slug())
}

/// Redirect back to the form page, setting the cookie for new sessions
fn back_to_form(session: SessionId, kind: FormKind) -> Response {
    (AppendHeaders(session.cookie()), Redirect::to(&form_url(kind))).into_response()
}

/// Handler: GET /
pub async fn handle_index() -> Html<String> {
    Html(index_page(&list_forms()))
}

/// Handler: GET /forms/:kind
pub async fn handle_form_page(
    State(state): State<SharedState>,
    session: SessionId,
    Path(slug): Path<String>,
) -> Result<Response, ServerError> {
    let kind = form_kind(&slug)?;
    let (values, flashes, has_pdf) = state
        .sessions
        .update_existing(session.id, |s| match s {
            Some(s) => {
                let form = s.form_mut(kind);
                (form.values.clone(), std::mem::take(&mut form.flashes), form.pdf.is_some())
            }
            None => (FormState::new(kind).values, Vec::new(), false),
        })
        .await;

    let preview = if has_pdf {
        FormDocument::from_fields(kind, &values)
            .map_err(RenderError::from)
            .and_then(|document| render_preview(&document, &state.assets))
            .map_err(|e| debug!(form = %kind, error = %e, "Preview skipped"))
            .ok()
    } else {
        None
    };
    let discounts = match kind {
        FormKind::InstallmentRequest => InstallmentRequest::from_fields(&values)
            .ok()
            .map(|request| DiscountOverview::for_request(&request)),
        _ => None,
    };

    let info = kind.info();
    let html = form_page(&FormPage {
        info: &info,
        values: &values,
        flashes: &flashes,
        discounts: discounts.as_ref(),
        preview: preview.as_deref(),
        has_pdf,
    });
    Ok((AppendHeaders(session.cookie()), Html(html)).into_response())
}

/// Handler: POST /forms/:kind
pub async fn handle_submit_form(
    State(state): State<SharedState>,
    session: SessionId,
    Path(slug): Path<String>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, ServerError> {
    let kind = form_kind(&slug)?;
    let values: FieldValues = fields.into_iter().collect();
    debug!(form = %kind, fields = values.len(), "Form submitted");

    let rendered = FormDocument::from_fields(kind, &values)
        .map_err(RenderError::from)
        .and_then(|document| document.render_pdf(&state.assets));
    let flash = match &rendered {
        Ok(_) => Flash::success(PDF_READY),
        Err(RenderError::Form(e)) => Flash::error(e.to_string()),
        Err(e) => {
            error!(form = %kind, error = %e, "PDF generation failed");
            Flash::error(format!("Erro ao gerar o PDF: {}", e))
        }
    };

    state
        .sessions
        .update(session.id, move |s| {
            let form = s.form_mut(kind);
            form.values = values;
            form.pdf = rendered.ok();
            form.flashes.push(flash);
        })
        .await;

    Ok(back_to_form(session, kind))
}

/// Handler: GET /forms/:kind/download
pub async fn handle_download(
    State(state): State<SharedState>,
    session: SessionId,
    Path(slug): Path<String>,
) -> Result<Response, ServerError> {
    let kind = form_kind(&slug)?;
    let pdf = state
        .sessions
        .read(session.id, |s| s.and_then(|s| s.form(kind)).and_then(|f| f.pdf.clone()))
        .await
        .ok_or_else(|| ServerError::NoDocument(slug.clone()))?;
    Ok(pdf_response(kind, pdf))
}

/// Handler: POST /forms/:kind/import
pub async fn handle_import_upload(
    State(state): State<SharedState>,
    session: SessionId,
    Path(slug): Path<String>,
    mut multipart: Multipart,
) -> Result<Response, ServerError> {
    let kind = form_kind(&slug)?;
    let layout = sheet_layout(kind).ok_or_else(|| ServerError::UploadNotAccepted(slug.clone()))?;

    let (file_name, bytes) = match read_file_part(&mut multipart).await {
        Ok(upload) => upload,
        Err(ServerError::InvalidRequest(reason)) => {
            debug!(form = %kind, %reason, "Upload without a file");
            state
                .sessions
                .update(session.id, |s| s.form_mut(kind).flashes.push(Flash::warning(NO_FILE_CHOSEN)))
                .await;
            return Ok(back_to_form(session, kind));
        }
        Err(e) => return Err(e),
    };

    let already_applied = state
        .sessions
        .read(session.id, |s| {
            s.and_then(|s| s.form(kind))
                .and_then(|f| f.imported_file.as_deref())
                == Some(file_name.as_str())
        })
        .await;
    if already_applied {
        debug!(form = %kind, file = %file_name, "Upload already applied");
        return Ok(back_to_form(session, kind));
    }

    let outcome = import_upload(layout, &file_name, &bytes);
    state
        .sessions
        .update(session.id, |s| {
            let form = s.form_mut(kind);
            let merged = form.values.merge_non_empty(&outcome.values);
            form.flashes
                .extend(outcome.warnings.iter().map(|w| Flash::warning(w.as_str())));
            if merged > 0 {
                form.flashes.push(Flash::success(IMPORT_APPLIED));
            }
            // An unreadable file may be fixed and sent again under the same name
            if outcome.was_read() {
                form.imported_file = Some(file_name.clone());
            }
            info!(form = %kind, file = %file_name, merged, "Upload applied to form");
        })
        .await;

    Ok(back_to_form(session, kind))
}
