use form_types::InmateTimesheet;
use pdf_layout::{mm, wrap_text, Canvas, Font, A4};
use tracing::debug;

use super::frame::official_header;
use crate::assets::Assets;
use crate::calendar::{month_rows, LabelStyle, TABLE_DAYS, WEEKEND_GRAY};
use crate::error::Result;

pub(crate) const TABLE_WIDTH_MM: f32 = 156.0;
const TITLE_H_MM: f32 = 7.0;
const ROW_H_MM: f32 = 6.0;
const DAY_ROW_MAX_MM: f32 = 5.0;
const BOTTOM_MARGIN_MM: f32 = 12.0;

/// Day table columns in millimetres: DIA, HE, ENTRADA, HS, SAÍDA
const DAY_COLUMNS_MM: [f32; 5] = [14.0, 18.0, 44.0, 18.0, 62.0];

/// A boxed row split into cells at the given fractions of the width.
///
/// Texts are drawn in the current font. Returns the bottom of the row.
pub(crate) fn split_row(
    canvas: &mut Canvas,
    x: f32,
    y_top: f32,
    width: f32,
    height: f32,
    splits: &[f32],
    texts: &[String],
) -> f32 {
    let y = y_top - height;
    canvas.rect(x, y, width, height, false);

    let mut starts = vec![x];
    for fraction in splits {
        let edge = x + width * fraction;
        canvas.line(edge, y, edge, y_top);
        starts.push(edge);
    }

    for (start, text) in starts.iter().zip(texts) {
        canvas.draw_string(start + mm(2.0), y + height / 2.0 - 3.0, text);
    }
    y
}

/// The boxed "REGISTRO INDIVIDUAL DE PONTO" title row
pub(crate) fn title_row(canvas: &mut Canvas, x: f32, y_top: f32, width: f32, title: &str) -> f32 {
    let height = mm(TITLE_H_MM);
    let y = y_top - height;
    canvas.rect(x, y, width, height, false);
    canvas.set_font(Font::HelveticaBold, 12.0);
    canvas.draw_centred_string(x + width / 2.0, y + height / 2.0 - 4.0, title);
    y
}

/// Individual time record of an inmate worker
pub fn render_inmate_timesheet(sheet: &InmateTimesheet, assets: &Assets) -> Result<Vec<u8>> {
    let mut canvas = Canvas::new(A4);
    canvas.set_title("Folha de ponto");

    let y_top = official_header(&mut canvas, assets)?;
    let width = mm(TABLE_WIDTH_MM);
    let x = (canvas.width() - width) / 2.0;

    canvas.set_line_width(1.0);
    let y = draw_identification(&mut canvas, sheet, x, width, y_top);
    let y = draw_days(&mut canvas, sheet, x, y);
    draw_closing(&mut canvas, sheet, x, width, y);

    debug!(reeducando = %sheet.reeducando, month = sheet.month.number(), "Inmate timesheet laid out");
    Ok(canvas.finish()?)
}

fn draw_identification(
    canvas: &mut Canvas,
    sheet: &InmateTimesheet,
    x: f32,
    width: f32,
    y_top: f32,
) -> f32 {
    let row_h = mm(ROW_H_MM);
    let y = title_row(canvas, x, y_top, width, "REGISTRO INDIVIDUAL DE PONTO");

    canvas.set_font(Font::HelveticaBold, 11.0);
    let y = split_row(
        canvas,
        x,
        y,
        width,
        row_h,
        &[0.78],
        &[
            format!("SECRETARIA: {}", sheet.secretaria),
            format!("ANO: {}", sheet.year),
        ],
    );
    let y = split_row(
        canvas,
        x,
        y,
        width,
        row_h,
        &[0.78],
        &[
            format!("REEDUCANDO: {}", sheet.reeducando),
            format!("MÊS: {}", sheet.month.label()),
        ],
    );
    let y = split_row(canvas, x, y, width, row_h, &[], &[format!("FUNÇÃO: {}", sheet.funcao)]);
    let y = split_row(
        canvas,
        x,
        y,
        width,
        row_h,
        &[0.5],
        &[
            format!("DATA DA INCLUSÃO: {}", sheet.data_inclusao),
            format!("MUNICÍPIO: {}", sheet.municipio),
        ],
    );
    let y = split_row(
        canvas,
        x,
        y,
        width,
        row_h,
        &[0.45, 0.58],
        &[
            format!("CPF: {}", sheet.cpf),
            format!("BCO: {}", sheet.banco),
            format!("AG: {} CONTA: {}", sheet.agencia, sheet.conta),
        ],
    );
    split_row(canvas, x, y, width, row_h, &[], &[sheet.tipo_conta.marked_line()])
}

/// Left edges of the day columns plus the right border
fn day_edges(x: f32) -> [f32; 6] {
    let mut edges = [x; 6];
    for (i, width) in DAY_COLUMNS_MM.iter().enumerate() {
        edges[i + 1] = edges[i] + mm(*width);
    }
    edges
}

/// Height left for the closing block under the day table
fn closing_height() -> f32 {
    3.0 * mm(ROW_H_MM) + mm(14.0)
}

fn draw_days(canvas: &mut Canvas, sheet: &InmateTimesheet, x: f32, y_top: f32) -> f32 {
    let xs = day_edges(x);
    let header_h = mm(ROW_H_MM);
    let available = y_top - header_h - closing_height() - mm(BOTTOM_MARGIN_MM);
    let row_h = mm(DAY_ROW_MAX_MM).min(available / TABLE_DAYS as f32);

    let y_header = y_top - header_h;
    canvas.rect(xs[0], y_header, xs[5] - xs[0], header_h, false);
    for edge in &xs[1..5] {
        canvas.line(*edge, y_header, *edge, y_top);
    }
    canvas.set_font(Font::HelveticaBold, 9.0);
    for (i, label) in ["DIA", "HE", "ENTRADA", "HS", "SAÍDA"].iter().enumerate() {
        canvas.draw_centred_string((xs[i] + xs[i + 1]) / 2.0, y_header + mm(2.0), label);
    }

    let rows = month_rows(
        sheet.year,
        sheet.month,
        &sheet.holidays,
        &sheet.entry_time,
        &sheet.exit_time,
        LabelStyle::Accented,
    );
    let mut y_row = y_header;
    for (_, row) in &rows {
        y_row -= row_h;
        if row.shaded {
            canvas.set_fill_gray(WEEKEND_GRAY);
            canvas.rect(xs[0], y_row, xs[5] - xs[0], row_h, true);
            canvas.set_fill_gray(0.0);
        } else {
            canvas.rect(xs[0], y_row, xs[5] - xs[0], row_h, false);
        }
        for edge in &xs[1..5] {
            canvas.line(*edge, y_row, *edge, y_row + row_h);
        }

        let text_y = y_row + row_h / 2.0 - 2.5;
        canvas.set_font(Font::HelveticaBold, 8.0);
        canvas.draw_centred_string((xs[0] + xs[1]) / 2.0, text_y, &row.day);
        canvas.draw_centred_string((xs[1] + xs[2]) / 2.0, text_y, &row.entry_hour);
        canvas.draw_centred_string((xs[3] + xs[4]) / 2.0, text_y, &row.exit_hour);

        for (text, left, right) in [(&row.entry_text, xs[2], xs[3]), (&row.exit_text, xs[4], xs[5])] {
            if text.is_empty() {
                continue;
            }
            canvas.set_font(Font::HelveticaBold, 7.0);
            let line = wrap_text(text, Font::HelveticaBold, 7.0, right - left - mm(2.0))
                .into_iter()
                .next()
                .unwrap_or_default();
            canvas.draw_centred_string((left + right) / 2.0, text_y, &line);
        }
    }
    y_row
}

/// Address, phone and date rows followed by the signature row
fn draw_closing(canvas: &mut Canvas, sheet: &InmateTimesheet, x: f32, width: f32, y_top: f32) {
    let row_h = mm(ROW_H_MM);
    canvas.set_font(Font::HelveticaBold, 9.0);
    let y = split_row(
        canvas,
        x,
        y_top,
        width,
        row_h,
        &[0.7],
        &[
            format!("ENDEREÇO: {}", sheet.endereco),
            format!("CEP: {}", sheet.cep),
        ],
    );
    let y = split_row(
        canvas,
        x,
        y,
        width,
        row_h,
        &[0.5],
        &[
            format!("TELEFONE: {}", sheet.telefone),
            format!("DATA: {}", sheet.data_preenchimento),
        ],
    );

    let sign_h = mm(14.0);
    let y_sign = y - sign_h;
    let middle = x + width / 2.0;
    canvas.rect(x, y_sign, width, sign_h, false);
    canvas.line(middle, y_sign, middle, y);
    canvas.set_font(Font::Helvetica, 8.0);
    canvas.draw_centred_string((x + middle) / 2.0, y_sign + mm(2.0), "Assinatura do reeducando");
    canvas.draw_centred_string((middle + x + width) / 2.0, y_sign + mm(2.0), "Visto do responsável");
}
