use form_types::SugespTimesheet;
use pdf_layout::{mm, wrap_text, Canvas, Font, A4};
use tracing::debug;

use super::frame::sugesp_header;
use crate::assets::Assets;
use crate::calendar::{month_rows, LabelStyle, TABLE_DAYS, WEEKEND_GRAY};
use crate::error::Result;

/// Column widths in twentieths of a point, as measured on the paper form
const COLUMN_DXA: [f32; 7] = [568.0, 624.0, 3770.0, 709.0, 1976.0, 1851.0, 709.0];
const FOOTER_DXA: [f32; 5] = [3119.0, 567.0, 1737.0, 1807.0, 2977.0];

pub(crate) const DECREE: &str =
    "DECRETO N 14828, DE 23 DE DEZEMBRO DE 2009. DOE N 1395, DE 22 DE DEZEMBRO DE 2009.";

pub(crate) const RETURN_NOTICE: &str =
    "Devolver esta folha ate o 1o dia util do mes seguinte na SUGESP-CGP";

pub(crate) const LEGAL_NOTICE: &str = "COM AMPARO LEGAL NA INSTRUCAO NORMATIVA N 001/SEAD, \
    29/03/2006, PUBLICADA NO DOE N 0487, DE 03/04/2006. E OBRIGATORIO NO REGISTRO DE PONTO: \
    NOME COMPLETO; NUMERO DA MATRICULA; CARGO; ORGAO DE LOTACAO E SUBLOTACAO; ENDERECO \
    COMPLETO; ASSINATURA DO SERVIDOR DEVERA SER POR EXTENSO, COM CANETA ESFEROGRAFICA PRETA \
    OU AZUL, SEM RASURAS, DEVIDAMENTE CERTIFICADO PELO CHEFE IMEDIATO, ATRAVES DE ASSINATURA \
    E RESPECTIVO CARIMBO DE IDENTIFICACAO (DEC.5442/91)";

const TABLE_WIDTH_MM: f32 = 180.0;

/// Cumulative x positions for columns scaled to the table width
fn column_edges(x: f32, width: f32, weights: &[f32]) -> Vec<f32> {
    let total: f32 = weights.iter().sum();
    let mut edges = Vec::with_capacity(weights.len() + 1);
    let mut edge = x;
    edges.push(edge);
    for weight in weights {
        edge += weight * width / total;
        edges.push(edge);
    }
    edges
}

/// Civil-servant time record in the SUGESP layout
pub fn render_sugesp_timesheet(sheet: &SugespTimesheet, assets: &Assets) -> Result<Vec<u8>> {
    let mut canvas = Canvas::new(A4);
    canvas.set_title("Folha de ponto SUGESP");

    let y_top = sugesp_header(&mut canvas, assets)?;
    let width = mm(TABLE_WIDTH_MM);
    let x = (canvas.width() - width) / 2.0;
    let xs = column_edges(x, width, &COLUMN_DXA);

    let y = draw_identification(&mut canvas, sheet, &xs, y_top);
    let y = draw_days(&mut canvas, sheet, &xs, y);
    draw_footer(&mut canvas, sheet, x, width, y);

    debug!(servidor = %sheet.servidor, month = sheet.month.number(), "SUGESP timesheet laid out");
    Ok(canvas.finish()?)
}

fn draw_identification(canvas: &mut Canvas, sheet: &SugespTimesheet, xs: &[f32], y_top: f32) -> f32 {
    let (x0, x5, x7) = (xs[0], xs[5], xs[7]);
    let title_h = mm(6.0);
    let row_h = mm(5.0);
    let right_centre = x5 + (x7 - x5) / 2.0;

    canvas.set_line_width(0.7);

    let y1 = y_top - title_h;
    canvas.rect(x0, y1, x5 - x0, title_h, false);
    canvas.rect(x5, y1, x7 - x5, title_h, false);
    canvas.set_font(Font::HelveticaBold, 10.0);
    canvas.draw_centred_string(x0 + (x5 - x0) / 2.0, y1 + mm(2.0), "REGISTRO INDIVIDUAL DE PONTO");
    canvas.set_font(Font::HelveticaBold, 9.0);
    canvas.draw_string(x5 + mm(2.0), y1 + mm(1.5), "ANO:");

    // At most two lines of UNIDADE; the row grows to fit them
    let unit_lines = wrap_text(
        &format!("UNIDADE: {}", sheet.unidade),
        Font::HelveticaBold,
        9.0,
        (x5 - x0) - mm(4.0),
    );
    let unit_lines = &unit_lines[..unit_lines.len().min(2)];
    let unit_h = row_h.max(unit_lines.len() as f32 * mm(3.2) + mm(1.6));
    let y2 = y1 - unit_h;
    canvas.rect(x0, y2, x5 - x0, unit_h, false);
    canvas.rect(x5, y2, x7 - x5, unit_h, false);
    let mut line_y = y2 + unit_h - mm(3.4);
    for line in unit_lines {
        canvas.draw_string(x0 + mm(2.0), line_y, line);
        line_y -= mm(3.4);
    }
    canvas.draw_centred_string(right_centre, y2 + unit_h / 2.0 - 2.0, &sheet.year.to_string());

    let y3 = y2 - row_h;
    canvas.rect(x0, y3, x5 - x0, row_h, false);
    canvas.draw_string(x0 + mm(2.0), y3 + mm(1.5), &format!("SUB UNIDADE: {}", sheet.sub_unidade));

    // MES spans the three rows SUB UNIDADE, SETOR and SERVIDOR
    canvas.rect(x5, y3 - 2.0 * row_h, x7 - x5, 3.0 * row_h, false);
    canvas.draw_centred_string(
        right_centre,
        y3 - row_h + mm(1.5),
        &format!("MES: {}", sheet.month.label()),
    );

    let y4 = y3 - row_h;
    canvas.rect(x0, y4, x5 - x0, row_h, false);
    canvas.draw_string(
        x0 + mm(2.0),
        y4 + mm(1.5),
        &format!("SETOR DE LOTACAO: {}", sheet.setor_lotacao),
    );

    let y5 = y4 - row_h;
    canvas.rect(x0, y5, x5 - x0, row_h, false);
    canvas.draw_string(x0 + mm(2.0), y5 + mm(1.5), &format!("SERVIDOR: {}", sheet.servidor));

    let y6 = y5 - row_h;
    canvas.rect(x0, y6, x5 - x0, row_h, false);
    canvas.rect(x5, y6, x7 - x5, row_h, false);
    canvas.draw_string(x0 + mm(2.0), y6 + mm(1.5), &format!("MATRICULA: {}", sheet.matricula));
    if !sheet.sigla.is_empty() {
        canvas.draw_centred_string(right_centre, y6 + mm(1.5), &sheet.sigla);
    }

    let y7 = y6 - row_h;
    canvas.rect(x0, y7, x5 - x0, row_h, false);
    canvas.rect(x5, y7, x7 - x5, row_h, false);
    canvas.draw_string(x0 + mm(2.0), y7 + mm(1.5), &format!("CARGO: {}", sheet.cargo));

    y7
}

/// Day header, the 31 rows and the rotated decree column. Returns the bottom.
fn draw_days(canvas: &mut Canvas, sheet: &SugespTimesheet, xs: &[f32], y_top: f32) -> f32 {
    let (x0, x1, x2, x3, x4, x6, x7) = (xs[0], xs[1], xs[2], xs[3], xs[4], xs[6], xs[7]);
    let header_h = mm(5.0);
    let row_h = mm(5.0);

    let y_header = y_top - header_h;
    canvas.rect(x0, y_header, x6 - x0, header_h, false);
    for xv in [x1, x2, x3, x4] {
        canvas.line(xv, y_header, xv, y_header + header_h);
    }
    canvas.set_font(Font::HelveticaBold, 8.0);
    let label_y = y_header + mm(1.5);
    canvas.draw_centred_string((x0 + x1) / 2.0, label_y, "DIA");
    canvas.draw_centred_string((x1 + x2) / 2.0, label_y, "Hr");
    canvas.draw_centred_string((x2 + x3) / 2.0, label_y, "ENTRADA");
    canvas.draw_centred_string((x3 + x4) / 2.0, label_y, "Hr");
    canvas.draw_centred_string((x4 + x6) / 2.0, label_y, "SAIDA");

    let bottom = y_header - TABLE_DAYS as f32 * row_h;
    let column_h = y_top - bottom;
    canvas.rect(x6, bottom, x7 - x6, column_h, false);

    canvas.save_state();
    canvas.translate((x6 + x7) / 2.0, (y_top + bottom) / 2.0);
    canvas.rotate(90.0);
    let lines = wrap_text(DECREE, Font::HelveticaBold, 7.0, column_h - mm(4.0));
    canvas.set_font(Font::HelveticaBold, 7.0);
    let mut text_y = lines.len() as f32 * 8.0 / 2.0 - 7.0;
    for line in &lines {
        canvas.draw_centred_string(0.0, text_y, line);
        text_y -= 8.0;
    }
    canvas.restore_state();

    let rows = month_rows(
        sheet.year,
        sheet.month,
        &sheet.holidays,
        &sheet.entry_time,
        &sheet.exit_time,
        LabelStyle::Plain,
    );
    for (index, (_, row)) in rows.iter().enumerate() {
        let y_row = y_header - (index as f32 + 1.0) * row_h;
        if row.shaded {
            canvas.set_fill_gray(WEEKEND_GRAY);
            canvas.rect(x0, y_row, x6 - x0, row_h, true);
            canvas.set_fill_gray(0.0);
        } else {
            canvas.rect(x0, y_row, x6 - x0, row_h, false);
        }
        for xv in [x1, x2, x3, x4] {
            canvas.line(xv, y_row, xv, y_row + row_h);
        }

        canvas.set_font(Font::HelveticaBold, 8.0);
        let text_y = y_row + mm(1.5);
        canvas.draw_centred_string((x0 + x1) / 2.0, text_y, &row.day);
        canvas.draw_centred_string((x1 + x2) / 2.0, text_y, &row.entry_hour);
        canvas.draw_centred_string((x3 + x4) / 2.0, text_y, &row.exit_hour);

        draw_cell_label(canvas, &row.entry_text, x2, x3, y_row);
        draw_cell_label(canvas, &row.exit_text, x4, x6, y_row);
    }

    bottom
}

/// Small bold label centred in a day cell, stacked upwards when it wraps
fn draw_cell_label(canvas: &mut Canvas, text: &str, left: f32, right: f32, y_row: f32) {
    if text.is_empty() {
        return;
    }
    let lines = wrap_text(text, Font::HelveticaBold, 7.0, (right - left) - mm(2.0));
    canvas.set_font(Font::HelveticaBold, 7.0);
    let mut y = y_row + mm(2.5) + (lines.len() as f32 - 1.0) * 3.0;
    for line in &lines {
        canvas.draw_centred_string((left + right) / 2.0, y, line);
        y -= 3.0;
    }
}

fn draw_footer(canvas: &mut Canvas, sheet: &SugespTimesheet, x0: f32, width: f32, y_days_bottom: f32) {
    let fs = column_edges(x0, width, &FOOTER_DXA);
    let row_h = mm(6.0);
    let signature_h = mm(10.0);

    let y_r1 = y_days_bottom - mm(2.0) - row_h;
    canvas.rect(x0, y_r1, width, row_h, false);
    canvas.set_font(Font::Helvetica, 8.0);
    canvas.draw_string(
        x0 + mm(2.0),
        y_r1 + mm(1.5),
        &format!("ENDERECO: {} CEP: {}", sheet.endereco, sheet.cep),
    );

    let y_r2 = y_r1 - row_h;
    canvas.rect(x0, y_r2, width, row_h, false);
    let (b1, b2) = (fs[2], fs[4]);
    canvas.line(b1, y_r2, b1, y_r2 + row_h);
    canvas.line(b2, y_r2, b2, y_r2 + row_h);
    canvas.draw_string(x0 + mm(2.0), y_r2 + mm(1.5), &format!("TELEFONE: {}", sheet.telefone));
    canvas.draw_string(b1 + mm(2.0), y_r2 + mm(1.5), &format!("EMAIL: {}", sheet.email));
    canvas.draw_string(b2 + mm(2.0), y_r2 + mm(1.5), &format!("CPF: {}", sheet.cpf));

    let y_r3 = y_r2 - row_h;
    canvas.rect(x0, y_r3, width, row_h, false);
    canvas.line(fs[1], y_r3, fs[1], y_r3 + row_h);
    canvas.draw_string(
        x0 + mm(2.0),
        y_r3 + mm(1.5),
        &format!("DATA: {}", sheet.data_preenchimento),
    );
    canvas.set_font(Font::Helvetica, 7.0);
    canvas.draw_string(fs[1] + mm(2.0), y_r3 + mm(1.5), RETURN_NOTICE);

    let split = fs[3];
    let y_r4 = y_r3 - signature_h;
    canvas.set_font(Font::Helvetica, 8.0);
    canvas.rect(x0, y_r4, width, signature_h, false);
    canvas.line(split, y_r4, split, y_r4 + signature_h);
    let caption_y = y_r4 + signature_h - mm(4.0);
    canvas.draw_centred_string((x0 + split) / 2.0, caption_y, "Assinatura do servidor");
    canvas.draw_centred_string((split + x0 + width) / 2.0, caption_y, "Visto do Chefe");

    let y_r5 = y_r4 - signature_h;
    canvas.rect(x0, y_r5, width, signature_h, false);
    canvas.line(split, y_r5, split, y_r5 + signature_h);

    let lines = wrap_text(LEGAL_NOTICE, Font::HelveticaBold, 6.5, width - mm(4.0));
    let line_h = mm(2.6);
    let legal_h = mm(10.0).max(lines.len() as f32 * line_h + mm(3.0));
    let y_legal = y_r5 - legal_h;
    canvas.set_fill_gray(0.75);
    canvas.rect(x0, y_legal, width, legal_h, true);
    canvas.set_fill_gray(0.0);
    canvas.set_font(Font::HelveticaBold, 6.5);
    let mut text_y = y_legal + legal_h - mm(3.0);
    for line in &lines {
        canvas.draw_string(x0 + mm(2.0), text_y, line);
        text_y -= line_h;
    }
}
