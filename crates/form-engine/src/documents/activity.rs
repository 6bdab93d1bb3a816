use form_types::ActivityReport;
use pdf_layout::{mm, wrap_text, Canvas, Font, A4};
use tracing::debug;

use super::frame::{official_header, ulsav_footer};
use super::inmate::{split_row, title_row, TABLE_WIDTH_MM};
use crate::assets::Assets;
use crate::calendar::{month_rows, DayKind, LabelStyle, WEEKEND_GRAY};
use crate::error::Result;

const ROW_H_MM: f32 = 6.0;
const DAY_COLUMN_MM: f32 = 14.0;
const MAX_DAY_ROW_MM: f32 = 9.0;
/// Room kept between the table and the footer for the signature lines
const SIGNATURE_AREA_MM: f32 = 16.0;
const TEXT_SIZE: f32 = 7.0;
const MIN_TEXT_SIZE: f32 = 4.5;

/// Monthly activity report: one row per day with the activity performed
pub fn render_activity_report(report: &ActivityReport, assets: &Assets) -> Result<Vec<u8>> {
    let mut canvas = Canvas::new(A4);
    canvas.set_title("Relatório de atividades");

    let y_top = official_header(&mut canvas, assets)?;
    let footer_top = ulsav_footer(&mut canvas, assets, &report.footer)?;

    let width = mm(TABLE_WIDTH_MM);
    let x = (canvas.width() - width) / 2.0;
    canvas.set_line_width(1.0);

    let y = draw_identification(&mut canvas, report, x, width, y_top);
    let table_floor = footer_top + mm(SIGNATURE_AREA_MM);
    draw_activity_table(&mut canvas, report, x, width, y, table_floor);
    draw_signatures(&mut canvas, report, x, width, footer_top);

    debug!(reeducando = %report.reeducando, month = report.month.number(), "Activity report laid out");
    Ok(canvas.finish()?)
}

fn draw_identification(
    canvas: &mut Canvas,
    report: &ActivityReport,
    x: f32,
    width: f32,
    y_top: f32,
) -> f32 {
    let row_h = mm(ROW_H_MM);
    let y = title_row(canvas, x, y_top, width, "RELATÓRIO DE ATIVIDADES");

    canvas.set_font(Font::HelveticaBold, 10.0);
    let y = split_row(
        canvas,
        x,
        y,
        width,
        row_h,
        &[0.78],
        &[
            format!("SECRETARIA: {}", report.secretaria),
            format!("ANO: {}", report.year),
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
            format!("REEDUCANDO: {}", report.reeducando),
            format!("MÊS: {}", report.month.label()),
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
            format!("FUNÇÃO: {}", report.funcao),
            format!("MUNICÍPIO: {}", report.municipio),
        ],
    );
    canvas.set_font(Font::HelveticaBold, 9.0);
    split_row(
        canvas,
        x,
        y,
        width,
        row_h,
        &[0.68],
        &[
            format!("ENDEREÇO: {} CEP: {}", report.endereco, report.cep),
            format!("TELEFONE: {}", report.telefone),
        ],
    )
}

/// Wrap `text` into `height`, shrinking the font until it fits
fn fit_text(text: &str, font: Font, max_width: f32, height: f32) -> (Vec<String>, f32) {
    let mut size = TEXT_SIZE;
    loop {
        let lines = wrap_text(text, font, size, max_width);
        let needed = lines.len() as f32 * size * 1.15;
        if needed <= height - 2.0 || size <= MIN_TEXT_SIZE {
            return (lines, size);
        }
        size -= 0.5;
    }
}

/// Row height for `days` rows between `y_top` and `floor`
fn day_row_height(y_top: f32, floor: f32, days: usize) -> f32 {
    let header_h = mm(ROW_H_MM);
    let available = (y_top - header_h - floor).max(0.0);
    mm(MAX_DAY_ROW_MM).min(available / days.max(1) as f32)
}

fn draw_activity_table(
    canvas: &mut Canvas,
    report: &ActivityReport,
    x: f32,
    width: f32,
    y_top: f32,
    floor: f32,
) -> f32 {
    let rows: Vec<_> = month_rows(
        report.year,
        report.month,
        &report.holidays,
        "",
        "",
        LabelStyle::Accented,
    )
    .into_iter()
    .filter(|(kind, _)| kind.is_valid())
    .collect();

    let header_h = mm(ROW_H_MM);
    let row_h = day_row_height(y_top, floor, rows.len());
    let split = x + mm(DAY_COLUMN_MM);

    let y_header = y_top - header_h;
    canvas.rect(x, y_header, width, header_h, false);
    canvas.line(split, y_header, split, y_top);
    canvas.set_font(Font::HelveticaBold, 9.0);
    canvas.draw_centred_string((x + split) / 2.0, y_header + mm(2.0), "DIA");
    canvas.draw_centred_string((split + x + width) / 2.0, y_header + mm(2.0), "ATIVIDADE DESENVOLVIDA");

    let activity = report.activity_text();
    let text_width = x + width - split - mm(4.0);
    let mut y_row = y_header;
    for (kind, row) in &rows {
        y_row -= row_h;
        if row.shaded {
            canvas.set_fill_gray(WEEKEND_GRAY);
            canvas.rect(x, y_row, width, row_h, true);
            canvas.set_fill_gray(0.0);
        } else {
            canvas.rect(x, y_row, width, row_h, false);
        }
        canvas.line(split, y_row, split, y_row + row_h);

        canvas.set_font(Font::HelveticaBold, 8.0);
        canvas.draw_centred_string((x + split) / 2.0, y_row + row_h / 2.0 - 2.5, &row.day);

        let (text, font) = match kind {
            DayKind::Regular => (activity.as_str(), Font::Helvetica),
            _ => (row.entry_text.as_str(), Font::HelveticaBold),
        };
        let (lines, size) = fit_text(text, font, text_width, row_h);
        canvas.set_font(font, size);
        let line_h = size * 1.15;
        let block_h = lines.len() as f32 * line_h;
        let mut text_y = y_row + (row_h + block_h) / 2.0 - size;
        for line in &lines {
            canvas.draw_string(split + mm(2.0), text_y, line);
            text_y -= line_h;
        }
    }
    y_row
}

fn draw_signatures(canvas: &mut Canvas, report: &ActivityReport, x: f32, width: f32, footer_top: f32) {
    let line_y = footer_top + mm(7.0);
    let line_w = width * 0.4;
    let left = x;
    let right = x + width - line_w;

    canvas.set_line_width(0.7);
    canvas.line(left, line_y, left + line_w, line_y);
    canvas.line(right, line_y, right + line_w, line_y);

    canvas.set_font(Font::Helvetica, 8.0);
    canvas.draw_centred_string(left + line_w / 2.0, line_y - mm(3.5), "Assinatura do reeducando");
    canvas.draw_centred_string(right + line_w / 2.0, line_y - mm(3.5), "Assinatura do supervisor");
    canvas.draw_centred_string(
        x + width / 2.0,
        line_y - mm(3.5),
        &format!("DATA: {}", report.data_preenchimento),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::tests::sample_assets;
    use crate::documents::tests::{page_count, page_strings, shows};
    use form_types::{HolidayMap, Month};

    fn report() -> ActivityReport {
        let mut holidays = HolidayMap::new();
        holidays.insert(7, "Independência");
        ActivityReport {
            reeducando: "JOÃO DA SILVA".to_string(),
            municipio: "São Miguel do Guaporé".to_string(),
            year: 2026,
            month: Month::Setembro,
            holidays,
            ..ActivityReport::default()
        }
    }

    #[test]
    fn rows_never_reach_the_footer() {
        let floor = mm(32.0) + mm(SIGNATURE_AREA_MM);
        let top = 640.0;
        let row_h = day_row_height(top, floor, 31);
        assert!(top - mm(ROW_H_MM) - 31.0 * row_h >= floor - 1e-3);
        assert_eq!(day_row_height(800.0, 100.0, 1), mm(MAX_DAY_ROW_MM));
    }

    #[test]
    fn fit_text_shrinks_until_it_fits() {
        let long = "palavra ".repeat(60);
        let (lines, size) = fit_text(&long, Font::Helvetica, 300.0, 14.0);
        assert!(size < TEXT_SIZE);
        assert!(lines.len() as f32 * size * 1.15 <= 12.0 || size <= MIN_TEXT_SIZE);

        let (lines, size) = fit_text("curto", Font::Helvetica, 300.0, 14.0);
        assert_eq!(lines, vec!["curto"]);
        assert_eq!(size, TEXT_SIZE);
    }

    #[test]
    fn renders_one_row_per_day_of_month() {
        let bytes = render_activity_report(&report(), &sample_assets()).unwrap();
        assert_eq!(page_count(&bytes), 1);
        let strings = page_strings(&bytes, 1);
        assert!(strings.iter().any(|s| s == "30"));
        assert!(!strings.iter().any(|s| s == "31"));
        assert!(shows(&bytes, 1, "INDEPENDÊNCIA"));
        assert!(shows(&bytes, 1, "DOMINGO"));
        assert!(shows(&bytes, 1, "ULSAV - UNIDADE LOCAL DE SANIDADE ANIMAL E VEGETAL"));
    }
}
