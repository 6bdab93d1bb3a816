//! HTML print previews
//!
//! Each preview mirrors its PDF layout with plain tables and inline logos so
//! the page can be checked in the browser before downloading. Every value
//! typed by the user is escaped.

use form_types::{
    ActivityReport, ClearanceDeclaration, FooterLines, InmateTimesheet, InstallmentRequest,
    RestitutionRequest, SugespTimesheet, VehicleLog,
};

use crate::assets::{Assets, Logo};
use crate::calendar::{month_rows, DayKind, LabelStyle};
use crate::documents::{frame, installment, restitution, sugesp, vehicle, BLANK_LINE};
use crate::error::Result;
use crate::format::format_brl;
use crate::installments::plan;
use crate::registry::FormDocument;

const STYLE: &str = r#"<style>
.print-page { width: min(100%, 210mm); border: 1px solid #999; padding: 10mm; box-sizing: border-box; margin: 0 auto; background: #fff; font-family: Arial, Helvetica, sans-serif; font-size: 11px; color: #000; }
.print-page.landscape { width: min(100%, 297mm); }
.print-page table { width: 100%; border-collapse: collapse; }
.print-page td, .print-page th { border: 1px solid #222; padding: 1mm 2mm; }
.print-page th { font-weight: 700; text-align: center; }
.print-page .centre { text-align: center; }
.print-page .bold { font-weight: 700; }
.print-page .weekend td { background: #d9d9d9; }
.print-page .logo { display: block; margin: 0 auto 2mm; max-height: 24mm; max-width: 80%; object-fit: contain; }
.print-page .header { text-align: center; font-weight: 700; margin-bottom: 3mm; }
.print-page .footer { display: flex; align-items: center; justify-content: space-between; border-top: 1px solid #222; margin-top: 6mm; padding-top: 2mm; }
.print-page .footer .lines { text-align: center; font-size: 10px; }
.print-page .footer img { max-width: 38mm; max-height: 14mm; }
.print-page .logo-box { border: 1px solid #222; height: 30mm; display: flex; align-items: center; justify-content: center; }
.print-page .logo-box img { max-height: 28mm; max-width: 80%; }
.print-page .title-bar { border: 1px solid #222; border-top: none; text-align: center; font-weight: 700; padding: 1mm; margin-bottom: 6mm; }
.print-page .signature { margin-top: 12mm; text-align: center; }
.print-page .signature .line { display: inline-block; min-width: 70mm; border-top: 1px solid #222; padding-top: 1mm; }
.print-page .legal { background: #bfbfbf; font-weight: 700; font-size: 9px; }
.print-page .decree { writing-mode: vertical-rl; transform: rotate(180deg); font-weight: 700; font-size: 9px; text-align: center; }
.print-page .checkbox { display: inline-block; width: 4mm; height: 4mm; border: 1px solid #222; text-align: center; line-height: 4mm; margin-right: 2mm; }
.print-page p.indent { text-indent: 2em; text-align: justify; line-height: 1.5; }
</style>"#;

/// Escape text for HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Standalone HTML fragment previewing the printed document
pub fn render_preview(document: &FormDocument, assets: &Assets) -> Result<String> {
    let (body, landscape) = match document {
        FormDocument::InmateTimesheet(sheet) => (inmate_timesheet(sheet, assets), false),
        FormDocument::ActivityReport(report) => (activity_report(report, assets), false),
        FormDocument::SugespTimesheet(sheet) => (sugesp_timesheet(sheet, assets), false),
        FormDocument::VehicleLog(log) => (vehicle_log(log, assets), true),
        FormDocument::InstallmentRequest(request) => (installment_request(request)?, false),
        FormDocument::RestitutionRequest(request) => (restitution_request(request, assets), false),
        FormDocument::ClearanceDeclaration(declaration) => {
            (clearance_declaration(declaration, assets), false)
        }
    };

    let class = if landscape { "print-page landscape" } else { "print-page" };
    Ok(format!(
        "{}<div class=\"{}\" data-form=\"{}\">{}</div>",
        STYLE,
        class,
        document.kind().slug(),
        body
    ))
}

fn logo_img(logo: Option<&Logo>, class: &str) -> String {
    match logo {
        Some(logo) => format!("<img class=\"{}\" src=\"{}\" alt=\"Logo\">", class, logo.data_uri()),
        None => String::new(),
    }
}

/// One bordered row split into cells; `widths` are percentages
fn split_row(cells: &[String], widths: &[u32], bold: bool) -> String {
    let mut html = String::from("<table><tr>");
    for (i, cell) in cells.iter().enumerate() {
        let style = match widths.get(i) {
            Some(width) => format!(" style=\"width:{}%\"", width),
            None => String::new(),
        };
        let class = if bold { " class=\"bold\"" } else { "" };
        html.push_str(&format!("<td{}{}>{}</td>", style, class, escape_html(cell)));
    }
    html.push_str("</tr></table>");
    html
}

fn title_row(title: &str) -> String {
    format!(
        "<table><tr><th>{}</th></tr></table>",
        escape_html(title)
    )
}

fn official_header(assets: &Assets) -> String {
    let mut html = String::from("<div class=\"header\">");
    html.push_str(&logo_img(assets.state_header.as_ref(), "logo"));
    for line in frame::STATE_HEADER_LINES {
        html.push_str(&format!("<div>{}</div>", line));
    }
    html.push_str("</div>");
    html
}

fn ulsav_footer(assets: &Assets, footer: &FooterLines) -> String {
    let mut html = String::from("<div class=\"footer\">");
    html.push_str(&logo_img(assets.footer_left.as_ref(), "footer-logo"));
    html.push_str("<div class=\"lines\">");
    for (i, line) in footer.lines().iter().enumerate() {
        let class = if i == 0 { " class=\"bold\"" } else { "" };
        html.push_str(&format!("<div{}>{}</div>", class, escape_html(line)));
    }
    html.push_str("</div>");
    html.push_str(&logo_img(assets.footer_right.as_ref(), "footer-logo"));
    html.push_str("</div>");
    html
}

fn logo_box_with_title(assets: &Assets, title: &str) -> String {
    format!(
        "<div class=\"logo-box\">{}</div><div class=\"title-bar\">{}</div>",
        logo_img(assets.agency.as_ref(), "agency-logo"),
        escape_html(title)
    )
}

/// The DIA / HE / ENTRADA / HS / SAIDA rows with weekend shading
fn day_rows(
    rows: &[(DayKind, crate::calendar::DayRow)],
    trailing_cell: Option<&str>,
) -> String {
    let mut html = String::new();
    for (index, (_, row)) in rows.iter().enumerate() {
        let class = if row.shaded { " class=\"weekend\"" } else { "" };
        html.push_str(&format!(
            "<tr{}><td class=\"centre bold\">{}</td><td class=\"centre\">{}</td>\
             <td class=\"centre bold\">{}</td><td class=\"centre\">{}</td>\
             <td class=\"centre bold\">{}</td>",
            class,
            row.day,
            escape_html(&row.entry_hour),
            escape_html(&row.entry_text),
            escape_html(&row.exit_hour),
            escape_html(&row.exit_text),
        ));
        if let (0, Some(text)) = (index, trailing_cell) {
            html.push_str(&format!(
                "<td rowspan=\"{}\" class=\"decree\">{}</td>",
                rows.len(),
                text
            ));
        }
        html.push_str("</tr>");
    }
    html
}

fn inmate_timesheet(sheet: &InmateTimesheet, assets: &Assets) -> String {
    let mut html = official_header(assets);
    html.push_str(&title_row("REGISTRO INDIVIDUAL DE PONTO"));
    html.push_str(&split_row(
        &[format!("SECRETARIA: {}", sheet.secretaria), format!("ANO: {}", sheet.year)],
        &[78],
        true,
    ));
    html.push_str(&split_row(
        &[
            format!("REEDUCANDO: {}", sheet.reeducando),
            format!("MÊS: {}", sheet.month.label()),
        ],
        &[78],
        true,
    ));
    html.push_str(&split_row(&[format!("FUNÇÃO: {}", sheet.funcao)], &[], true));
    html.push_str(&split_row(
        &[
            format!("DATA DA INCLUSÃO: {}", sheet.data_inclusao),
            format!("MUNICÍPIO: {}", sheet.municipio),
        ],
        &[50],
        true,
    ));
    html.push_str(&split_row(
        &[
            format!("CPF: {}", sheet.cpf),
            format!("BCO: {}", sheet.banco),
            format!("AG: {} CONTA: {}", sheet.agencia, sheet.conta),
        ],
        &[45, 13],
        true,
    ));
    html.push_str(&split_row(&[sheet.tipo_conta.marked_line()], &[], true));

    let rows = month_rows(
        sheet.year,
        sheet.month,
        &sheet.holidays,
        &sheet.entry_time,
        &sheet.exit_time,
        LabelStyle::Accented,
    );
    html.push_str("<table><tr><th>DIA</th><th>HE</th><th>ENTRADA</th><th>HS</th><th>SAÍDA</th></tr>");
    html.push_str(&day_rows(&rows, None));
    html.push_str("</table>");

    html.push_str(&split_row(
        &[format!("ENDEREÇO: {}", sheet.endereco), format!("CEP: {}", sheet.cep)],
        &[70],
        true,
    ));
    html.push_str(&split_row(
        &[
            format!("TELEFONE: {}", sheet.telefone),
            format!("DATA: {}", sheet.data_preenchimento),
        ],
        &[50],
        true,
    ));
    html.push_str(
        "<table><tr style=\"height:14mm\"><td class=\"centre\" style=\"width:50%;vertical-align:bottom\">\
         Assinatura do reeducando</td><td class=\"centre\" style=\"vertical-align:bottom\">\
         Visto do responsável</td></tr></table>",
    );
    html
}

fn activity_report(report: &ActivityReport, assets: &Assets) -> String {
    let mut html = official_header(assets);
    html.push_str(&title_row("RELATÓRIO DE ATIVIDADES"));
    html.push_str(&split_row(
        &[format!("SECRETARIA: {}", report.secretaria), format!("ANO: {}", report.year)],
        &[78],
        true,
    ));
    html.push_str(&split_row(
        &[
            format!("REEDUCANDO: {}", report.reeducando),
            format!("MÊS: {}", report.month.label()),
        ],
        &[78],
        true,
    ));
    html.push_str(&split_row(
        &[
            format!("FUNÇÃO: {}", report.funcao),
            format!("MUNICÍPIO: {}", report.municipio),
        ],
        &[50],
        true,
    ));
    html.push_str(&split_row(
        &[
            format!("ENDEREÇO: {} CEP: {}", report.endereco, report.cep),
            format!("TELEFONE: {}", report.telefone),
        ],
        &[68],
        true,
    ));

    let activity = escape_html(&report.activity_text());
    html.push_str("<table><tr><th style=\"width:9%\">DIA</th><th>ATIVIDADE DESENVOLVIDA</th></tr>");
    for (kind, row) in month_rows(report.year, report.month, &report.holidays, "", "", LabelStyle::Accented)
    {
        let text = match kind {
            DayKind::Invalid => continue,
            DayKind::Regular => activity.clone(),
            _ => format!("<span class=\"bold\">{}</span>", escape_html(&row.entry_text)),
        };
        let class = if row.shaded { " class=\"weekend\"" } else { "" };
        html.push_str(&format!(
            "<tr{}><td class=\"centre bold\">{}</td><td>{}</td></tr>",
            class, row.day, text
        ));
    }
    html.push_str("</table>");

    html.push_str(&format!(
        "<table class=\"signatures\" style=\"margin-top:10mm\"><tr>\
         <td class=\"centre\" style=\"border:none;border-top:1px solid #222\">Assinatura do reeducando</td>\
         <td class=\"centre\" style=\"border:none\">DATA: {}</td>\
         <td class=\"centre\" style=\"border:none;border-top:1px solid #222\">Assinatura do supervisor</td>\
         </tr></table>",
        escape_html(&report.data_preenchimento)
    ));
    html.push_str(&ulsav_footer(assets, &report.footer));
    html
}

fn sugesp_timesheet(sheet: &SugespTimesheet, assets: &Assets) -> String {
    let mut html = String::from("<div class=\"header\">");
    html.push_str(&logo_img(assets.sugesp.as_ref(), "logo"));
    for line in frame::SUGESP_HEADER_LINES {
        html.push_str(&format!("<div>{}</div>", line));
    }
    html.push_str("</div>");

    let cell = |text: String| format!("<td class=\"bold\">{}</td>", escape_html(&text));
    html.push_str("<table>");
    html.push_str(&format!(
        "<tr><td class=\"bold centre\">REGISTRO INDIVIDUAL DE PONTO</td><td class=\"bold\" style=\"width:20%\">ANO:</td></tr>\
         <tr>{}<td class=\"bold centre\">{}</td></tr>\
         <tr>{}<td rowspan=\"3\" class=\"bold centre\">MES: {}</td></tr>\
         <tr>{}</tr><tr>{}</tr>\
         <tr>{}<td class=\"bold centre\">{}</td></tr>\
         <tr>{}<td></td></tr>",
        cell(format!("UNIDADE: {}", sheet.unidade)),
        sheet.year,
        cell(format!("SUB UNIDADE: {}", sheet.sub_unidade)),
        sheet.month.label(),
        cell(format!("SETOR DE LOTACAO: {}", sheet.setor_lotacao)),
        cell(format!("SERVIDOR: {}", sheet.servidor)),
        cell(format!("MATRICULA: {}", sheet.matricula)),
        escape_html(&sheet.sigla),
        cell(format!("CARGO: {}", sheet.cargo)),
    ));
    html.push_str("</table>");

    let rows = month_rows(
        sheet.year,
        sheet.month,
        &sheet.holidays,
        &sheet.entry_time,
        &sheet.exit_time,
        LabelStyle::Plain,
    );
    html.push_str("<table><tr><th>DIA</th><th>Hr</th><th>ENTRADA</th><th>Hr</th><th>SAIDA</th><th style=\"width:5%\"></th></tr>");
    html.push_str(&day_rows(&rows, Some(sugesp::DECREE)));
    html.push_str("</table>");

    html.push_str("<table style=\"margin-top:2mm\">");
    html.push_str(&format!(
        "<tr><td colspan=\"3\">ENDERECO: {} CEP: {}</td></tr>\
         <tr><td>TELEFONE: {}</td><td>EMAIL: {}</td><td>CPF: {}</td></tr>\
         <tr><td>DATA: {}</td><td colspan=\"2\" style=\"font-size:9px\">{}</td></tr>\
         <tr style=\"height:10mm\"><td class=\"centre\" style=\"vertical-align:top\">Assinatura do servidor</td>\
         <td colspan=\"2\" class=\"centre\" style=\"vertical-align:top\">Visto do Chefe</td></tr>\
         <tr style=\"height:10mm\"><td></td><td colspan=\"2\"></td></tr>\
         <tr><td colspan=\"3\" class=\"legal\">{}</td></tr>",
        escape_html(&sheet.endereco),
        escape_html(&sheet.cep),
        escape_html(&sheet.telefone),
        escape_html(&sheet.email),
        escape_html(&sheet.cpf),
        escape_html(&sheet.data_preenchimento),
        sugesp::RETURN_NOTICE,
        sugesp::LEGAL_NOTICE,
    ));
    html.push_str("</table>");
    html
}

fn vehicle_log(log: &VehicleLog, assets: &Assets) -> String {
    let mut html = logo_box_with_title(assets, "CONTROLE DE USO E SAIDA DE VEICULO");
    let unidade = if log.unidade.trim().is_empty() {
        BLANK_LINE
    } else {
        log.unidade.as_str()
    };
    html.push_str(&split_row(
        &[
            format!("ANO: {} / MES: {}", log.year, log.month.plain_label()),
            format!("NOME DA UNIDADE: {}", unidade),
            format!("PLACA DO VEICULO: {} ({})", log.placa, log.modelo),
        ],
        &[25, 40],
        true,
    ));

    html.push_str("<table><tr>");
    for header in vehicle::HEADERS {
        html.push_str(&format!("<th>{}</th>", header));
    }
    html.push_str("</tr>");
    for _ in 1..VehicleLog::ROWS {
        html.push_str("<tr style=\"height:7mm\"><td class=\"centre\">/    /</td>");
        for _ in 1..vehicle::HEADERS.len() {
            html.push_str("<td>&nbsp;</td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");

    html.push_str("<table style=\"margin-top:6mm\"><tr><td style=\"border:none;font-size:9px\"><strong>CHECKLIST:</strong>");
    for item in vehicle::CHECKLIST {
        html.push_str(&format!("<br>{}", item));
    }
    html.push_str(
        "</td><td class=\"centre\" style=\"border:none;vertical-align:bottom\">\
         <span class=\"line\" style=\"border-top:1px solid #222;padding:0 10mm\">Assinatura do Chefe da Unidade</span></td>\
         <td class=\"bold\" style=\"border:none;vertical-align:top\">OBS.:</td></tr></table>",
    );
    html
}

fn installment_request(request: &InstallmentRequest) -> Result<String> {
    let plan = plan(request)?;
    let mut html = format!("<h2 class=\"centre\">{}</h2>", escape_html(installment::HEADING));
    html.push_str(&format!(
        "<p class=\"indent\">{}</p><p class=\"indent bold\">{}</p>",
        escape_html(&installment::request_text(request)),
        escape_html(&plan.summary())
    ));
    html.push_str("<h3>Parcelas e Vencimentos</h3><table><tr>");
    for column in installment::COLUMNS {
        html.push_str(&format!("<th style=\"background:#f2f2f2\">{}</th>", column));
    }
    html.push_str("</tr>");
    for item in &plan.schedule {
        html.push_str(&format!(
            "<tr><td class=\"centre\">{}</td><td class=\"centre\">{}</td><td class=\"centre\">{}</td></tr>",
            item.number,
            format_brl(item.value),
            form_types::fields::format_date(item.due_date)
        ));
    }
    html.push_str("</table>");
    html.push_str(&format!(
        "<div class=\"signature\"><p>Segue assinado,</p><br><br>\
         <div class=\"line bold\">{}</div><div>CPF: {}</div></div>",
        escape_html(&request.nome),
        escape_html(&request.cpf)
    ));
    Ok(html)
}

fn restitution_request(request: &RestitutionRequest, assets: &Assets) -> String {
    let labelled = |label: &str, value: &str| {
        let value = if value.trim().is_empty() {
            BLANK_LINE.to_string()
        } else {
            escape_html(value)
        };
        format!("<div><strong>{}</strong> {}</div>", escape_html(label), value)
    };
    let checkbox = |checked: bool, label: &str| {
        format!(
            "<div><span class=\"checkbox\">{}</span>{}</div>",
            if checked { "X" } else { "" },
            label
        )
    };
    let heading = |text: &str| format!("<div class=\"bold\" style=\"margin-top:3mm\">{}</div>", text);
    let wrapped = |text: &str| format!("<p>{}</p>", escape_html(text).replace('\n', "<br>"));

    let mut html = logo_box_with_title(assets, restitution::TITLE);
    html.push_str(&heading("RESTITUIÇÃO DE VALOR RECOLHIDO INDEVIDAMENTE, REFERENTE A TAXAS"));
    html.push_str(&checkbox(request.taxa_gta, "GTA ONLINE"));
    html.push_str(&checkbox(request.taxa_multa, &escape_html(restitution::FINE_LABEL)));
    for (label, value) in [
        ("Nome:", &request.nome),
        ("Nacionalidade:", &request.nacionalidade),
        ("CPF/CNPJ:", &request.cpf_cnpj),
        ("Residente e domiciliado:", &request.residente),
        ("Município/Distrito:", &request.municipio),
        ("Propriedade:", &request.propriedade),
    ] {
        html.push_str(&labelled(label, value));
    }

    html.push_str(&heading("VEM REQUERER:"));
    html.push_str(&wrapped(&request.vem_requerer));
    html.push_str(&heading("JUSTIFICATIVA:"));
    html.push_str(&wrapped(&request.justificativa));

    html.push_str(&heading("DADOS DA CONTA BANCÁRIA PARA DEVOLUÇÃO:"));
    for (label, value) in [
        ("Nome do titular da conta:", &request.titular),
        ("CPF:", &request.conta_cpf),
        ("Banco:", &request.banco),
        ("Agência:", &request.agencia),
        ("Conta corrente:", &request.conta_corrente),
        ("Número do banco:", &request.numero_banco),
        ("Tipo:", &request.tipo),
    ] {
        html.push_str(&labelled(label, value));
    }

    html.push_str(&heading("DECLARAÇÃO DE INEXISTÊNCIA DE PROCESSO DE RESTITUIÇÃO EM ANDAMENTO"));
    html.push_str(&wrapped(&request.declaracao));
    html.push_str(&heading("CÓDIGO DE BARRAS DO DARE (BOLETO):"));
    html.push_str(&labelled("Código de barras:", &request.codigo_barras));
    html.push_str(&labelled("Local e data:", &request.place_and_date()));

    let signer = match request.nome.trim() {
        "" => "Assinatura".to_string(),
        name => escape_html(name),
    };
    html.push_str(&format!(
        "<div class=\"signature\"><div class=\"line\">{}</div></div>",
        signer
    ));
    html
}

fn clearance_declaration(declaration: &ClearanceDeclaration, assets: &Assets) -> String {
    let mut html = logo_img(assets.agency.as_ref(), "logo");
    html.push_str("<h2 class=\"centre\">DECLARAÇÃO</h2>");
    html.push_str(&format!(
        "<div>{}</div><div>Requerente</div><div>{}</div><div>{}</div>",
        declaration.sexo.addressee(),
        escape_html(&declaration.requester_name()),
        declaration.sexo.salutation()
    ));
    html.push_str(&format!(
        "<p class=\"indent\">{}</p><p>Atenciosamente,</p>",
        escape_html(&declaration.body())
    ));

    html.push_str(&format!(
        "<div class=\"signature\"><div>{}</div>",
        escape_html(&declaration.officer_name())
    ));
    if !declaration.servidor_cargo.trim().is_empty() {
        html.push_str(&format!("<div>Cargo: {}</div>", escape_html(declaration.servidor_cargo.trim())));
    }
    if !declaration.servidor_matricula.trim().is_empty() {
        html.push_str(&format!(
            "<div>Matricula: {}</div>",
            escape_html(declaration.servidor_matricula.trim())
        ));
    }
    html.push_str("</div>");

    let has_identity = [&declaration.nome, &declaration.cpf, &declaration.rg]
        .iter()
        .any(|value| !value.trim().is_empty());
    if declaration.incluir_assinatura_requerente && has_identity {
        html.push_str("<div class=\"signature\">");
        if !declaration.nome.trim().is_empty() {
            html.push_str(&format!("<div>{}</div>", escape_html(&declaration.requester_name())));
        }
        let documents = declaration.requester_documents();
        if !documents.is_empty() {
            html.push_str(&format!("<div>{}</div>", escape_html(&documents)));
        }
        html.push_str("<div>Assinatura do requerente</div></div>");
    }
    html
}
