//! Tests for the forms server
//!
//! Test categories:
//! - JSON API endpoints (listing, rendering, import, installments, holidays)
//! - Browser flow through the session cookie
//! - Properties of path resolution and discount overviews

#[cfg(test)]
mod http_endpoint_tests {
    //! HTTP endpoint integration tests using axum-test

    use std::sync::Arc;

    use axum::http::{header, HeaderValue, StatusCode};
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::{TestResponse, TestServer};
    use form_engine::{Assets, FormDocument, FormKind};
    use form_import::UNREADABLE_WARNING;
    use serde_json::json;

    use crate::app_router;
    use crate::state::{AppState, SharedState};
    use crate::ui::{IMPORT_APPLIED, NO_FILE_CHOSEN, PDF_READY};

    /// Create a test server with the full router
    fn create_test_server() -> TestServer {
        create_test_server_with_state().0
    }

    /// Test server plus a handle on its state
    fn create_test_server_with_state() -> (TestServer, SharedState) {
        let state = Arc::new(AppState::new(Assets::empty(), 10 * 1024 * 1024));
        let server = TestServer::new(app_router(state.clone())).unwrap();
        (server, state)
    }

    /// `name=value` part of the Set-Cookie header
    fn session_cookie(response: &TestResponse) -> HeaderValue {
        let set_cookie = response.header(header::SET_COOKIE);
        let pair = set_cookie.to_str().unwrap().split(';').next().unwrap().to_string();
        HeaderValue::from_str(&pair).unwrap()
    }

    fn rendered_inmate_pdf() -> Vec<u8> {
        let document = FormDocument::from_json(
            FormKind::InmateTimesheet,
            json!({ "reeducando": "JOSE DA SILVA", "cpf": "123.456.789-00", "year": 2026, "month": 3 }),
        )
        .unwrap();
        document.render_pdf(&Assets::empty()).unwrap()
    }

    fn pdf_upload(bytes: Vec<u8>, name: &str) -> MultipartForm {
        MultipartForm::new().add_part(
            "arquivo",
            Part::bytes(bytes).file_name(name).mime_type("application/pdf"),
        )
    }

    #[tokio::test]
    async fn test_health_returns_200() {
        let server = create_test_server();
        let response = server.get("/health").await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "forms-server");
    }

    #[tokio::test]
    async fn test_forms_lists_every_form() {
        let server = create_test_server();
        let response = server.get("/api/forms").await;
        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();
        assert!(json["success"].as_bool().unwrap());
        assert_eq!(json["count"].as_u64().unwrap(), 7);
        assert_eq!(json["forms"][0]["slug"], "inmate_timesheet");
        assert!(json["forms"][0]["accepts_upload"].as_bool().unwrap());
    }

    #[tokio::test]
    async fn test_render_pdf_returns_named_attachment() {
        let server = create_test_server();
        let response = server
            .post("/api/forms/vehicle_log/pdf")
            .json(&json!({ "year": 2026, "month": 3, "placa": "ABC1D23" }))
            .await;

        response.assert_status_ok();
        assert_eq!(response.header(header::CONTENT_TYPE), "application/pdf");
        let disposition = response.header(header::CONTENT_DISPOSITION);
        assert!(disposition.to_str().unwrap().contains("controle_uso_saida_veiculo.pdf"));
        assert!(response.as_bytes().starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_render_unknown_form_is_404() {
        let server = create_test_server();
        let response = server.post("/api/forms/passport/pdf").json(&json!({})).await;

        response.assert_status_not_found();
        let json = response.json::<serde_json::Value>();
        assert!(!json["success"].as_bool().unwrap());
        assert_eq!(json["code"], "FORM_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_render_rejects_invalid_month() {
        let server = create_test_server();
        let response = server
            .post("/api/forms/sugesp_timesheet/pdf")
            .json(&json!({ "month": 13 }))
            .await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<serde_json::Value>()["code"], "INVALID_REQUEST");
    }

    #[tokio::test]
    async fn test_uninstallable_request_is_a_validation_error() {
        let server = create_test_server();
        let response = server
            .post("/api/forms/installment_request/pdf")
            .json(&json!({ "animals": 1 }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<serde_json::Value>()["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_preview_returns_html_fragment() {
        let server = create_test_server();
        let response = server
            .post("/api/forms/sugesp_timesheet/preview")
            .json(&json!({ "servidor": "FULANO", "year": 2026, "month": 2 }))
            .await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("data-form=\"sugesp_timesheet\""));
        assert!(html.contains("FULANO"));
    }

    #[tokio::test]
    async fn test_discounts_follow_the_deadline() {
        let server = create_test_server();
        let response = server
            .get("/api/installments/discounts?animals=10&within_deadline=false")
            .await;

        response.assert_status_ok();
        let json = response.json::<serde_json::Value>();
        assert_eq!(json["max_installments"], 8);
        assert_eq!(json["rows"].as_array().unwrap().len(), 8);
        assert_eq!(json["discount_column"], "Desconto Concedido (metade)");
        assert_eq!(json["rows"][0]["percent"], 10.0);
    }

    #[tokio::test]
    async fn test_plan_schedules_monthly_installments() {
        let server = create_test_server();
        let response = server
            .post("/api/installments/plan")
            .json(&json!({ "animals": 10, "installments": 3, "request_date": "2026-03-10" }))
            .await;

        response.assert_status_ok();
        let json = response.json::<serde_json::Value>();
        let schedule = json["plan"]["schedule"].as_array().unwrap();
        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule[2]["due_date"], "2026-05-10");
        assert!(json["summary"].as_str().unwrap().contains("em 3 vezes"));
    }

    #[tokio::test]
    async fn test_plan_rejects_too_many_installments() {
        let server = create_test_server();
        let response = server
            .post("/api/installments/plan")
            .json(&json!({ "animals": 10, "installments": 20 }))
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_holiday_parse_reports_bad_blocks() {
        let server = create_test_server();
        let response = server
            .post("/api/holidays/parse")
            .json(&json!({ "text": "1-Ano Novo, x" }))
            .await;

        response.assert_status_ok();
        let json = response.json::<serde_json::Value>();
        assert!(!json["success"].as_bool().unwrap());
        assert!(json["holidays"]["1"].is_string());
        assert_eq!(json["errors"].as_array().unwrap().len(), 1);
        assert_eq!(json["errors"][0]["reason"], "missing_dash");
    }

    #[tokio::test]
    async fn test_import_reads_a_rendered_timesheet() {
        let server = create_test_server();
        let response = server
            .post("/api/import/inmate_timesheet")
            .multipart(pdf_upload(rendered_inmate_pdf(), "folha.pdf"))
            .await;

        response.assert_status_ok();
        let json = response.json::<serde_json::Value>();
        assert!(json["fields"]["reeducando"].as_str().unwrap().starts_with("JOSE DA SILVA"));
        assert_eq!(json["fields"]["cpf"], "123.456.789-00");
    }

    #[tokio::test]
    async fn test_import_refuses_forms_without_upload() {
        let server = create_test_server();
        let response = server
            .post("/api/import/vehicle_log")
            .multipart(pdf_upload(b"%PDF".to_vec(), "x.pdf"))
            .await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<serde_json::Value>()["code"], "UPLOAD_NOT_ACCEPTED");
    }

    #[tokio::test]
    async fn test_index_links_the_forms() {
        let server = create_test_server();
        let response = server.get("/").await;
        response.assert_status_ok();
        assert!(response.text().contains("href=\"/forms/installment_request\""));
    }

    #[tokio::test]
    async fn test_submit_then_download() {
        let server = create_test_server();

        let page = server.get("/forms/vehicle_log").await;
        page.assert_status_ok();
        let cookie = session_cookie(&page);

        let submitted = server
            .post("/forms/vehicle_log")
            .add_header(header::COOKIE, cookie.clone())
            .form(&[("mes", "3"), ("ano", "2026"), ("placa", "ABC1D23")])
            .await;
        submitted.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(submitted.header(header::LOCATION), "/forms/vehicle_log");

        let page = server
            .get("/forms/vehicle_log")
            .add_header(header::COOKIE, cookie.clone())
            .await;
        let html = page.text();
        assert!(html.contains(PDF_READY));
        assert!(html.contains("value=\"ABC1D23\""));
        assert!(html.contains("/forms/vehicle_log/download"));
        assert!(html.contains("data-form=\"vehicle_log\""));

        let download = server
            .get("/forms/vehicle_log/download")
            .add_header(header::COOKIE, cookie.clone())
            .await;
        download.assert_status_ok();
        assert!(download.as_bytes().starts_with(b"%PDF"));

        // Flash messages are shown once
        let again = server
            .get("/forms/vehicle_log")
            .add_header(header::COOKIE, cookie)
            .await;
        assert!(!again.text().contains(PDF_READY));
    }

    #[tokio::test]
    async fn test_invalid_holidays_become_a_flash_message() {
        let server = create_test_server();
        let page = server.get("/forms/sugesp_timesheet").await;
        let cookie = session_cookie(&page);

        server
            .post("/forms/sugesp_timesheet")
            .add_header(header::COOKIE, cookie.clone())
            .form(&[("mes", "4"), ("ano", "2026"), ("feriados", "21 Tiradentes")])
            .await
            .assert_status(StatusCode::SEE_OTHER);

        let page = server
            .get("/forms/sugesp_timesheet")
            .add_header(header::COOKIE, cookie.clone())
            .await;
        let html = page.text();
        assert!(html.contains("Revise os feriados informados"));
        assert!(html.contains("21 Tiradentes"));

        let download = server
            .get("/forms/sugesp_timesheet/download")
            .add_header(header::COOKIE, cookie)
            .await;
        download.assert_status_not_found();
        assert_eq!(download.json::<serde_json::Value>()["code"], "NO_DOCUMENT");
    }

    #[tokio::test]
    async fn test_upload_prefills_once_per_file() {
        let server = create_test_server();
        let page = server.get("/forms/inmate_timesheet").await;
        let cookie = session_cookie(&page);

        server
            .post("/forms/inmate_timesheet/import")
            .add_header(header::COOKIE, cookie.clone())
            .multipart(pdf_upload(rendered_inmate_pdf(), "folha.pdf"))
            .await
            .assert_status(StatusCode::SEE_OTHER);

        let html = server
            .get("/forms/inmate_timesheet")
            .add_header(header::COOKIE, cookie.clone())
            .await
            .text();
        assert!(html.contains(IMPORT_APPLIED));
        assert!(html.contains("value=\"123.456.789-00\""));

        // Edits made after the import survive a second upload of the same file
        server
            .post("/forms/inmate_timesheet")
            .add_header(header::COOKIE, cookie.clone())
            .form(&[("cpf", "999.999.999-99"), ("mes", "3"), ("ano", "2026")])
            .await;
        server
            .post("/forms/inmate_timesheet/import")
            .add_header(header::COOKIE, cookie.clone())
            .multipart(pdf_upload(rendered_inmate_pdf(), "folha.pdf"))
            .await;

        let html = server
            .get("/forms/inmate_timesheet")
            .add_header(header::COOKIE, cookie)
            .await
            .text();
        assert!(!html.contains(IMPORT_APPLIED));
        assert!(html.contains("value=\"999.999.999-99\""));
    }

    #[tokio::test]
    async fn test_unreadable_upload_can_be_sent_again() {
        let server = create_test_server();
        let page = server.get("/forms/inmate_timesheet").await;
        let cookie = session_cookie(&page);

        server
            .post("/forms/inmate_timesheet/import")
            .add_header(header::COOKIE, cookie.clone())
            .multipart(pdf_upload(b"not a pdf".to_vec(), "folha.pdf"))
            .await
            .assert_status(StatusCode::SEE_OTHER);
        let html = server
            .get("/forms/inmate_timesheet")
            .add_header(header::COOKIE, cookie.clone())
            .await
            .text();
        assert!(html.contains(UNREADABLE_WARNING));

        // The corrected file keeps the same name
        server
            .post("/forms/inmate_timesheet/import")
            .add_header(header::COOKIE, cookie.clone())
            .multipart(pdf_upload(rendered_inmate_pdf(), "folha.pdf"))
            .await
            .assert_status(StatusCode::SEE_OTHER);
        let html = server
            .get("/forms/inmate_timesheet")
            .add_header(header::COOKIE, cookie)
            .await
            .text();
        assert!(html.contains(IMPORT_APPLIED));
        assert!(html.contains("value=\"123.456.789-00\""));
    }

    #[tokio::test]
    async fn test_viewing_forms_keeps_no_session() {
        let (server, state) = create_test_server_with_state();
        for _ in 0..50 {
            let page = server.get("/forms/vehicle_log").await;
            page.assert_status_ok();
            assert!(page.text().contains("name=\"placa\""));
        }
        assert_eq!(state.sessions.len().await, 0);

        let cookie = session_cookie(&server.get("/forms/vehicle_log").await);
        server
            .post("/forms/vehicle_log")
            .add_header(header::COOKIE, cookie)
            .form(&[("mes", "3"), ("ano", "2026")])
            .await
            .assert_status(StatusCode::SEE_OTHER);
        assert_eq!(state.sessions.len().await, 1);
    }

    #[tokio::test]
    async fn test_upload_without_file_warns() {
        let server = create_test_server();
        let page = server.get("/forms/activity_report").await;
        let cookie = session_cookie(&page);

        let form = MultipartForm::new().add_text("comentario", "sem arquivo");
        server
            .post("/forms/activity_report/import")
            .add_header(header::COOKIE, cookie.clone())
            .multipart(form)
            .await
            .assert_status(StatusCode::SEE_OTHER);

        let html = server
            .get("/forms/activity_report")
            .add_header(header::COOKIE, cookie)
            .await
            .text();
        assert!(html.contains(NO_FILE_CHOSEN));
    }
}

#[cfg(test)]
mod property_tests {
    use form_types::InstallmentRequest;
    use proptest::prelude::*;

    use crate::api::{form_kind, DiscountOverview};
    use form_engine::FormKind;

    proptest! {
        /// Property: only the registered slugs resolve to a form
        #[test]
        fn unknown_slugs_never_resolve(slug in "[a-z_]{1,24}") {
            let known = FormKind::ALL.iter().any(|kind| kind.slug() == slug);
            prop_assert_eq!(form_kind(&slug).is_ok(), known);
        }

        /// Property: the discount table has one row per allowed count
        #[test]
        fn overview_rows_match_the_limit(animals in 0u32..500, within in any::<bool>()) {
            let request = InstallmentRequest { animals, within_deadline: within, ..InstallmentRequest::default() };
            let overview = DiscountOverview::for_request(&request);
            prop_assert_eq!(overview.rows.len() as u32, overview.max_installments);
            prop_assert!(overview.max_installments <= 30);
        }
    }
}
