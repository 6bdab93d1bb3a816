//! JSON API handlers for the forms server
//!
//! Provides REST endpoints for:
//! - Form listing and typed-JSON rendering (PDF or HTML preview)
//! - Pre-fill from an uploaded timesheet
//! - Installment discount tables and plans
//! - Holiday text validation

use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
    Json,
};
use form_engine::installments::{max_installments, minimum_installment, total_value};
use form_engine::{
    deadline_message, discount_column, discount_table, limit_message, list_forms, plan,
    render_preview, DiscountRow, FormDocument, FormInfo, FormKind, InstallmentPlan,
};
use form_import::{import_upload, SheetLayout};
use form_types::{FieldValues, HolidayEntryError, HolidayMap, InstallmentRequest};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ServerError;
use crate::state::SharedState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "forms-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Resolve the `:kind` path segment
pub(crate) fn form_kind(slug: &str) -> Result<FormKind, ServerError> {
    Ok(slug.parse::<FormKind>()?)
}

/// Which printed layout an upload for `kind` follows
pub(crate) fn sheet_layout(kind: FormKind) -> Option<SheetLayout> {
    match kind {
        FormKind::InmateTimesheet | FormKind::ActivityReport => Some(SheetLayout::Inmate),
        FormKind::SugespTimesheet => Some(SheetLayout::Sugesp),
        _ => None,
    }
}

/// PDF bytes as a download named after the form
pub(crate) fn pdf_response(kind: FormKind, bytes: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", kind.download_name()),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// The first file part of a multipart body
pub(crate) async fn read_file_part(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ServerError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::InvalidRequest(e.to_string()))?
    {
        let Some(file_name) = field.file_name().filter(|n| !n.is_empty()).map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
        debug!(file = %file_name, bytes = bytes.len(), "Received upload");
        return Ok((file_name, bytes.to_vec()));
    }
    Err(ServerError::InvalidRequest("No file in upload".to_string()))
}

/// Form list response
#[derive(Serialize)]
pub struct FormListResponse {
    pub success: bool,
    pub forms: Vec<FormInfo>,
    pub count: usize,
}

/// Handler: GET /api/forms
pub async fn handle_list_forms() -> Json<FormListResponse> {
    let forms = list_forms();
    let count = forms.len();
    Json(FormListResponse {
        success: true,
        forms,
        count,
    })
}

/// Handler: POST /api/forms/:kind/pdf
pub async fn handle_render_pdf(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Response, ServerError> {
    let kind = form_kind(&slug)?;
    let document = FormDocument::from_json(kind, body)?;
    let bytes = document.render_pdf(&state.assets)?;
    Ok(pdf_response(kind, bytes))
}

/// Handler: POST /api/forms/:kind/preview
pub async fn handle_render_preview(
    State(state): State<SharedState>,
    Path(slug): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Html<String>, ServerError> {
    let kind = form_kind(&slug)?;
    let document = FormDocument::from_json(kind, body)?;
    Ok(Html(render_preview(&document, &state.assets)?))
}

/// Import response
#[derive(Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub fields: FieldValues,
    pub warnings: Vec<String>,
}

/// Handler: POST /api/import/:kind
pub async fn handle_import(
    Path(slug): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, ServerError> {
    let kind = form_kind(&slug)?;
    let layout = sheet_layout(kind).ok_or_else(|| ServerError::UploadNotAccepted(slug.clone()))?;
    let (file_name, bytes) = read_file_part(&mut multipart).await?;

    let outcome = import_upload(layout, &file_name, &bytes);
    Ok(Json(ImportResponse {
        success: outcome.warnings.is_empty(),
        fields: outcome.values,
        warnings: outcome.warnings,
    }))
}

/// Discount table and limits for an installment request
#[derive(Debug, Serialize)]
pub struct DiscountOverview {
    pub total: f64,
    pub minimum: f64,
    pub max_installments: u32,
    pub deadline_message: &'static str,
    pub discount_column: &'static str,
    pub limit_message: String,
    pub rows: Vec<DiscountRow>,
}

impl DiscountOverview {
    pub fn for_request(request: &InstallmentRequest) -> Self {
        let total = total_value(request);
        let minimum = minimum_installment(request);
        Self {
            total,
            minimum,
            max_installments: max_installments(total, minimum),
            deadline_message: deadline_message(request.within_deadline),
            discount_column: discount_column(request.within_deadline),
            limit_message: limit_message(total, minimum),
            rows: discount_table(request),
        }
    }
}

/// Query of GET /api/installments/discounts; absent values take the form defaults
#[derive(Debug, Default, Deserialize)]
pub struct DiscountQuery {
    pub animals: Option<u32>,
    pub upf_value: Option<f64>,
    pub upf_per_animal: Option<f64>,
    pub min_upf_per_installment: Option<f64>,
    pub within_deadline: Option<bool>,
}

impl DiscountQuery {
    fn into_request(self) -> InstallmentRequest {
        let defaults = InstallmentRequest::default();
        InstallmentRequest {
            animals: self.animals.unwrap_or(defaults.animals),
            upf_value: self.upf_value.unwrap_or(defaults.upf_value),
            upf_per_animal: self.upf_per_animal.unwrap_or(defaults.upf_per_animal),
            min_upf_per_installment: self
                .min_upf_per_installment
                .unwrap_or(defaults.min_upf_per_installment),
            within_deadline: self.within_deadline.unwrap_or(defaults.within_deadline),
            ..defaults
        }
    }
}

#[derive(Serialize)]
pub struct DiscountResponse {
    pub success: bool,
    #[serde(flatten)]
    pub overview: DiscountOverview,
}

/// Handler: GET /api/installments/discounts
pub async fn handle_discounts(Query(query): Query<DiscountQuery>) -> Json<DiscountResponse> {
    let request = query.into_request();
    Json(DiscountResponse {
        success: true,
        overview: DiscountOverview::for_request(&request),
    })
}

#[derive(Serialize)]
pub struct PlanResponse {
    pub success: bool,
    pub plan: InstallmentPlan,
    pub summary: String,
}

/// Handler: POST /api/installments/plan
pub async fn handle_plan(Json(request): Json<InstallmentRequest>) -> Result<Json<PlanResponse>, ServerError> {
    let plan = plan(&request)?;
    info!(
        installments = plan.chosen.installments,
        total = plan.total,
        "Installment plan computed"
    );
    Ok(Json(PlanResponse {
        success: true,
        summary: plan.summary(),
        plan,
    }))
}

#[derive(Debug, Deserialize)]
pub struct HolidayRequest {
    pub text: String,
}

#[derive(Serialize)]
pub struct HolidayResponse {
    pub success: bool,
    pub holidays: HolidayMap,
    /// Normalised text, as it would be shown back in the form
    pub text: String,
    pub errors: Vec<HolidayEntryError>,
    pub messages: Vec<String>,
}

/// Handler: POST /api/holidays/parse
pub async fn handle_parse_holidays(Json(body): Json<HolidayRequest>) -> Json<HolidayResponse> {
    let (holidays, errors) = HolidayMap::parse(&body.text);
    Json(HolidayResponse {
        success: errors.is_empty(),
        text: holidays.to_text(),
        messages: errors.iter().map(ToString::to_string).collect(),
        holidays,
        errors,
    })
}
