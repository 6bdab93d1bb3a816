//! HTML markup of the browser pages

use std::fmt::Write as _;

use form_engine::preview::escape_html;
use form_engine::{format_brl, format_percent, FieldSpec, FormInfo, InputKind};
use form_types::FieldValues;

use crate::api::DiscountOverview;
use crate::state::Flash;

const PAGE_STYLE: &str = r#"<style>
body { font-family: Arial, Helvetica, sans-serif; margin: 0; background: #f4f5f7; color: #222; }
header { background: #1f4e79; color: #fff; padding: 12px 24px; }
header a { color: #fff; text-decoration: none; }
main { display: flex; gap: 24px; padding: 24px; align-items: flex-start; }
.form-column { flex: 0 0 380px; background: #fff; padding: 16px; border-radius: 6px; }
.preview-column { flex: 1; overflow-x: auto; }
label { display: block; font-size: 13px; margin-top: 10px; }
input[type=text], input[type=number], input[type=date], select, textarea { width: 100%; box-sizing: border-box; padding: 6px; }
textarea { min-height: 70px; }
button, .button { margin-top: 14px; padding: 8px 14px; background: #1f4e79; color: #fff; border: 0; border-radius: 4px; cursor: pointer; text-decoration: none; display: inline-block; }
.flash { padding: 8px 12px; border-radius: 4px; margin-bottom: 10px; }
.flash.success { background: #dff0d8; }
.flash.warning { background: #fcf8e3; }
.flash.error { background: #f2dede; }
.menu { list-style: none; padding: 0; }
.menu li { background: #fff; margin: 8px 0; padding: 12px 16px; border-radius: 6px; }
.discounts table { border-collapse: collapse; width: 100%; font-size: 12px; }
.discounts td, .discounts th { border: 1px solid #ccc; padding: 3px 6px; text-align: right; }
.upload { border-top: 1px solid #ddd; margin-top: 16px; padding-top: 8px; }
</style>"#;

/// Wrap `body` in the common page chrome
pub fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"pt-BR\"><head><meta charset=\"utf-8\">\
         <title>{title}</title>{style}</head><body>\
         <header><a href=\"/\">Formulários</a> &rsaquo; {title}</header>{body}</body></html>",
        title = escape_html(title),
        style = PAGE_STYLE,
        body = body,
    )
}

/// The menu of forms
pub fn index_page(forms: &[FormInfo]) -> String {
    let mut items = String::new();
    for form in forms {
        let _ = write!(
            items,
            "<li><a href=\"/forms/{}\"><strong>{}</strong></a><br><small>{}</small></li>",
            form.slug,
            escape_html(&form.title),
            escape_html(&form.description),
        );
    }
    layout(
        "Menu",
        &format!("<main><div><h1>Escolha o formulário</h1><ul class=\"menu\">{}</ul></div></main>", items),
    )
}

/// Everything the form page shows
pub struct FormPage<'a> {
    pub info: &'a FormInfo,
    pub values: &'a FieldValues,
    pub flashes: &'a [Flash],
    pub discounts: Option<&'a DiscountOverview>,
    pub preview: Option<&'a str>,
    pub has_pdf: bool,
}

pub fn form_page(page: &FormPage<'_>) -> String {
    let info = page.info;
    let mut left = String::new();

    for flash in page.flashes {
        let _ = write!(
            left,
            "<div class=\"{}\">{}</div>",
            flash.level.css_class(),
            escape_html(&flash.message)
        );
    }

    let _ = write!(left, "<h2>{}</h2>", escape_html(&info.title));
    let _ = write!(left, "<form method=\"post\" action=\"/forms/{}\">", info.slug);
    for spec in &info.fields {
        left.push_str(&field_input(spec, page.values));
    }
    left.push_str("<button type=\"submit\">Gerar PDF</button></form>");

    if let Some(overview) = page.discounts {
        left.push_str(&discount_panel(overview));
    }

    if info.accepts_upload {
        let _ = write!(
            left,
            "<form class=\"upload\" method=\"post\" action=\"/forms/{}/import\" enctype=\"multipart/form-data\">\
             <label for=\"arquivo\">Preencher a partir de uma folha anterior (PDF ou DOCX)</label>\
             <input id=\"arquivo\" type=\"file\" name=\"arquivo\" accept=\".pdf,.docx\">\
             <button type=\"submit\">Enviar arquivo</button></form>",
            info.slug
        );
    }

    let mut right = String::new();
    if page.has_pdf {
        let _ = write!(
            right,
            "<p><a class=\"button\" href=\"/forms/{}/download\" download=\"{}\">Baixar PDF</a></p>",
            info.slug, info.download_name
        );
    }
    if let Some(preview) = page.preview {
        right.push_str(preview);
    }

    layout(
        &info.title,
        &format!(
            "<main><div class=\"form-column\">{}</div><div class=\"preview-column\">{}</div></main>",
            left, right
        ),
    )
}

fn field_input(spec: &FieldSpec, values: &FieldValues) -> String {
    let key = escape_html(&spec.key);
    let label = escape_html(&spec.label);
    let value = escape_html(values.get(&spec.key).unwrap_or_default());
    let placeholder = spec
        .placeholder
        .as_deref()
        .map(|p| format!(" placeholder=\"{}\"", escape_html(p)))
        .unwrap_or_default();

    match spec.input {
        InputKind::Checkbox => format!(
            "<label><input type=\"checkbox\" name=\"{key}\" value=\"on\"{checked}> {label}</label>",
            checked = if values.flag(&spec.key) { " checked" } else { "" },
        ),
        InputKind::Select => {
            let current = values.get(&spec.key).unwrap_or_default();
            let options: String = spec
                .options
                .iter()
                .map(|(option, text)| {
                    format!(
                        "<option value=\"{}\"{}>{}</option>",
                        escape_html(option),
                        if option == current { " selected" } else { "" },
                        escape_html(text)
                    )
                })
                .collect();
            format!("<label for=\"{key}\">{label}</label><select id=\"{key}\" name=\"{key}\">{options}</select>")
        }
        InputKind::TextArea => format!(
            "<label for=\"{key}\">{label}</label><textarea id=\"{key}\" name=\"{key}\"{placeholder}>{value}</textarea>"
        ),
        InputKind::Text | InputKind::Number | InputKind::Date => {
            // Dates and decimals are typed in Brazilian notation, which a
            // number input would reject
            let mode = match spec.input {
                InputKind::Number => " inputmode=\"decimal\"",
                _ => "",
            };
            format!(
                "<label for=\"{key}\">{label}</label>\
                 <input id=\"{key}\" type=\"text\"{mode} name=\"{key}\" value=\"{value}\"{placeholder}>"
            )
        }
    }
}

/// Deadline banner, limit hint and the discount table of the installment form
fn discount_panel(overview: &DiscountOverview) -> String {
    let mut html = format!(
        "<div class=\"discounts\"><p><strong>Valor do Auto: {}</strong></p><p><strong>{}</strong></p><p>{}</p>",
        format_brl(overview.total),
        escape_html(overview.deadline_message),
        escape_html(&overview.limit_message),
    );
    if !overview.rows.is_empty() {
        let _ = write!(
            html,
            "<table><tr><th>Quantidade de Parcelas</th><th>{}</th><th>Valor com Desconto</th>\
             <th>Valor da Parcela</th></tr>",
            escape_html(overview.discount_column)
        );
        for row in &overview.rows {
            let _ = write!(
                html,
                "<tr><td>{}</td><td>{} ({})</td><td>{}</td><td>{}</td></tr>",
                row.installments,
                format_percent(row.percent),
                format_brl(row.discount),
                format_brl(row.discounted_total),
                format_brl(row.installment_value),
            );
        }
        html.push_str("</table>");
    }
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_engine::{FormDocument, FormKind};
    use form_types::InstallmentRequest;

    #[test]
    fn index_links_every_form() {
        let html = index_page(&form_engine::list_forms());
        for kind in FormKind::ALL {
            assert!(html.contains(&format!("href=\"/forms/{}\"", kind.slug())));
        }
    }

    #[test]
    fn inputs_are_prefilled_and_escaped() {
        let info = FormKind::VehicleLog.info();
        let mut values = FormDocument::blank(FormKind::VehicleLog).to_fields();
        values.set("placa", "\"><script>");
        values.set("mes", "3");
        let html = form_page(&FormPage {
            info: &info,
            values: &values,
            flashes: &[Flash::error("Mês inválido: 13")],
            discounts: None,
            preview: None,
            has_pdf: false,
        });
        assert!(html.contains("value=\"&quot;&gt;&lt;script&gt;\""));
        assert!(html.contains("<option value=\"3\" selected>MARÇO</option>"));
        assert!(html.contains("class=\"flash error\""));
        assert!(!html.contains("/forms/vehicle_log/download"));
        assert!(!html.contains("enctype=\"multipart/form-data\""));
    }

    #[test]
    fn timesheets_offer_upload_and_download() {
        let info = FormKind::SugespTimesheet.info();
        let values = FormDocument::blank(FormKind::SugespTimesheet).to_fields();
        let html = form_page(&FormPage {
            info: &info,
            values: &values,
            flashes: &[],
            discounts: None,
            preview: Some("<div class=\"print-page\"></div>"),
            has_pdf: true,
        });
        assert!(html.contains("action=\"/forms/sugesp_timesheet/import\""));
        assert!(html.contains("download=\"folha_sugesp.pdf\""));
        assert!(html.contains("<div class=\"print-page\"></div>"));
    }

    #[test]
    fn decimals_use_text_inputs() {
        let info = FormKind::InstallmentRequest.info();
        let values = FormDocument::blank(FormKind::InstallmentRequest).to_fields();
        let html = form_page(&FormPage {
            info: &info,
            values: &values,
            flashes: &[],
            discounts: None,
            preview: None,
            has_pdf: false,
        });
        assert!(html.contains(
            "<input id=\"upf_por_animal\" type=\"text\" inputmode=\"decimal\" name=\"upf_por_animal\" value=\"2,5\""
        ));
        assert!(!html.contains("type=\"number\""));
    }

    #[test]
    fn discount_panel_lists_allowed_counts() {
        let request = InstallmentRequest {
            animals: 10,
            within_deadline: false,
            ..InstallmentRequest::default()
        };
        let html = discount_panel(&DiscountOverview::for_request(&request));
        assert!(html.contains("Desconto Concedido (metade)"));
        assert!(html.contains("fora dos 30 dias"));
        assert!(html.contains("<td>8</td>"));
        assert!(!html.contains("<td>9</td>"));
        // 23 installments late: half of 1.75
        let request = InstallmentRequest {
            animals: 100,
            within_deadline: false,
            ..InstallmentRequest::default()
        };
        let html = discount_panel(&DiscountOverview::for_request(&request));
        assert!(html.contains("<td>23</td><td>0,875%"));
    }
}
