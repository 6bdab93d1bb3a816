use form_types::VehicleLog;
use pdf_layout::{mm, Canvas, Font, PageSize, A4};
use tracing::debug;

use super::frame::logo_box_with_title;
use super::BLANK_LINE;
use crate::assets::Assets;
use crate::error::Result;

const COLUMN_WEIGHTS: [f32; 8] = [18.0, 18.0, 18.0, 18.0, 16.0, 48.0, 82.0, 44.0];

pub(crate) const HEADERS: [&str; 8] = [
    "DATA",
    "HR SAIDA",
    "KM SAIDA",
    "HR CHEG",
    "KM CHEGADA",
    "DESTINO",
    "SERVICO REALIZADO DETALHADAMENTE",
    "NOME DO CONDUTOR POR EXTENSO",
];

pub(crate) const CHECKLIST: [&str; 6] = [
    "DOCUMENTO DE PORTE OBRIGATORIO ( )SIM ( )NAO",
    "CHAVE DE RODA ( )SIM ( )NAO",
    "MACACO ( )SIM ( )NAO",
    "TRIANGULO ( )SIM ( )NAO",
    "EXTINTOR ( )SIM ( )NAO",
    "ESTEPE ( )SIM ( )NAO",
];

/// Landscape control sheet for vehicle trips
pub fn render_vehicle_log(log: &VehicleLog, assets: &Assets) -> Result<Vec<u8>> {
    let page: PageSize = A4.landscape();
    let mut canvas = Canvas::new(page);
    canvas.set_title("Controle de uso e saida de veiculo");

    let margin = mm(10.0);
    let x = margin;
    let width = page.width - 2.0 * margin;

    let title_y = logo_box_with_title(
        &mut canvas,
        assets,
        x,
        page.height - margin,
        width,
        "CONTROLE DE USO E SAIDA DE VEICULO",
    )?;

    let info_y = title_y - mm(4.0);
    let info_h = mm(8.0);
    canvas.rect(x, info_y - info_h, width, info_h, false);
    canvas.set_font(Font::HelveticaBold, 8.0);
    let text_y = info_y - mm(7.0);
    canvas.draw_string(
        x + mm(2.0),
        text_y,
        &format!("ANO: {} / MES: {}", log.year, log.month.plain_label()),
    );
    let unidade = if log.unidade.trim().is_empty() {
        BLANK_LINE
    } else {
        log.unidade.as_str()
    };
    canvas.draw_string(x + mm(55.0), text_y, &format!("NOME DA UNIDADE: {}", unidade));
    canvas.draw_string(
        x + mm(140.0),
        text_y,
        &format!("PLACA DO VEICULO: {} ({})", log.placa, log.modelo),
    );

    let table_top = info_y - info_h;
    let table_bottom = margin + mm(30.0);
    let rows = VehicleLog::ROWS;
    let row_h = (table_top - table_bottom) / rows as f32;

    let total_weight: f32 = COLUMN_WEIGHTS.iter().sum();
    let widths: Vec<f32> = COLUMN_WEIGHTS
        .iter()
        .map(|w| w * width / total_weight)
        .collect();

    canvas.set_line_width(0.5);
    let mut column_x = x;
    for w in &widths {
        canvas.line(column_x, table_bottom, column_x, table_top);
        column_x += w;
    }
    canvas.line(x + width, table_bottom, x + width, table_top);
    for i in 0..=rows {
        let y = table_top - i as f32 * row_h;
        canvas.line(x, y, x + width, y);
    }

    canvas.set_font(Font::HelveticaBold, 6.0);
    let header_y = table_top - row_h + mm(2.0);
    let mut column_x = x;
    for (w, header) in widths.iter().zip(HEADERS) {
        canvas.draw_centred_string(column_x + w / 2.0, header_y, header);
        column_x += w;
    }

    canvas.set_font(Font::Helvetica, 7.0);
    let date_x = x + widths[0] / 2.0;
    for i in 1..rows {
        let y = table_top - (i as f32 + 0.5) * row_h;
        canvas.draw_centred_string(date_x, y, "/    /");
    }

    let checklist_y = table_bottom - mm(6.0);
    canvas.set_font(Font::HelveticaBold, 7.0);
    canvas.draw_string(x, checklist_y, "CHECKLIST:");
    canvas.set_font(Font::Helvetica, 7.0);
    for (i, item) in CHECKLIST.iter().enumerate() {
        canvas.draw_string(x, checklist_y - mm(4.0) * (i as f32 + 1.0), item);
    }

    let sig_y = margin + mm(8.0);
    let sig_x = x + width * 0.35;
    let sig_w = width * 0.3;
    canvas.line(sig_x, sig_y, sig_x + sig_w, sig_y);
    canvas.draw_centred_string(sig_x + sig_w / 2.0, sig_y - mm(4.0), "Assinatura do Chefe da Unidade");

    canvas.set_font(Font::HelveticaBold, 7.0);
    canvas.draw_string(x + width * 0.75, margin + mm(18.0), "OBS.:");

    debug!(placa = %log.placa, month = log.month.number(), "Vehicle log laid out");
    Ok(canvas.finish()?)
}
