use form_types::InstallmentRequest;
use pdf_layout::{mm, wrap_text, Canvas, Font, A4};
use tracing::debug;

use crate::assets::Assets;
use crate::error::Result;
use crate::format::format_brl;
use crate::installments::{plan, InstallmentPlan};

pub(crate) const HEADING: &str =
    "Requerimento para Parcelamento de Auto de Infração - Emitido pela Agencia IDARON";

const MARGIN_MM: f32 = 20.0;
const BODY_SIZE: f32 = 11.0;
const TABLE_ROW_MM: f32 = 7.0;
const SIGNATURE_BLOCK_MM: f32 = 40.0;
pub(crate) const COLUMNS: [&str; 3] = ["Parcela", "Valor da Parcela", "Data de Vencimento"];

/// Opening paragraph identifying the requester and the notice
pub fn request_text(request: &InstallmentRequest) -> String {
    format!(
        "Eu, {nome}, brasileiro(a), portador(a) do CPF no {cpf}, residente no endereco \
         {endereco}, municipio de {municipio}, venho, por meio deste requerimento datado de \
         {data_req}, solicitar o parcelamento do Auto de Infração no {auto}, lavrado em \
         {data_auto}, nos termos da legislacao vigente.",
        nome = request.nome,
        cpf = request.cpf,
        endereco = request.endereco,
        municipio = request.municipio,
        data_req = request.request_date_label(),
        auto = request.infraction_number,
        data_auto = request.infraction_date_label(),
    )
}

/// Request letter with the installment schedule, paginated as needed
pub fn render_installment_request(request: &InstallmentRequest, _assets: &Assets) -> Result<Vec<u8>> {
    let plan = plan(request)?;

    // The first pass only counts pages so the footer can print "de N"
    let mut dry_run = Canvas::new(A4);
    let total_pages = lay_out(&mut dry_run, request, &plan, None);

    let mut canvas = Canvas::new(A4);
    canvas.set_title("Requerimento de parcelamento");
    lay_out(&mut canvas, request, &plan, Some(total_pages));

    debug!(
        installments = plan.chosen.installments,
        pages = total_pages,
        "Installment request laid out"
    );
    Ok(canvas.finish()?)
}

struct Cursor {
    y: f32,
    page: usize,
    total: Option<usize>,
}

impl Cursor {
    fn top() -> f32 {
        A4.height - mm(MARGIN_MM)
    }

    fn bottom() -> f32 {
        mm(MARGIN_MM)
    }

    /// Start a new page when `needed` does not fit; returns true if it did
    fn ensure(&mut self, canvas: &mut Canvas, needed: f32) -> bool {
        if self.y - needed >= Self::bottom() {
            return false;
        }
        self.finish_page(canvas);
        canvas.show_page();
        self.page += 1;
        self.y = Self::top();
        true
    }

    fn finish_page(&self, canvas: &mut Canvas) {
        if let Some(total) = self.total {
            canvas.set_font(Font::Helvetica, 10.0);
            canvas.draw_centred_string(
                A4.width / 2.0,
                mm(10.0),
                &format!("Pagina {} de {}", self.page, total),
            );
        }
    }
}

/// Draw everything and return the number of pages used
fn lay_out(
    canvas: &mut Canvas,
    request: &InstallmentRequest,
    plan: &InstallmentPlan,
    total: Option<usize>,
) -> usize {
    let left = mm(MARGIN_MM);
    let width = A4.width - 2.0 * left;
    let mut cursor = Cursor {
        y: Cursor::top(),
        page: 1,
        total,
    };

    canvas.set_font(Font::HelveticaBold, 13.0);
    for line in wrap_text(HEADING, Font::HelveticaBold, 13.0, width) {
        cursor.y -= mm(6.0);
        canvas.draw_centred_string(A4.width / 2.0, cursor.y, &line);
    }
    cursor.y -= mm(6.0);

    paragraph(canvas, &mut cursor, &request_text(request), Font::Helvetica, left, width);
    cursor.y -= mm(4.0);
    paragraph(canvas, &mut cursor, &plan.summary(), Font::HelveticaBold, left, width);
    cursor.y -= mm(8.0);

    cursor.ensure(canvas, mm(10.0 + 2.0 * TABLE_ROW_MM));
    canvas.set_font(Font::HelveticaBold, 12.0);
    canvas.draw_string(left, cursor.y, "Parcelas e Vencimentos");
    cursor.y -= mm(4.0);

    let row_h = mm(TABLE_ROW_MM);
    let column_w = width / COLUMNS.len() as f32;
    table_header(canvas, &mut cursor, left, column_w, row_h);
    for installment in &plan.schedule {
        if cursor.ensure(canvas, row_h) {
            table_header(canvas, &mut cursor, left, column_w, row_h);
        }
        let cells = [
            installment.number.to_string(),
            format_brl(installment.value),
            form_types::fields::format_date(installment.due_date),
        ];
        table_row(canvas, &mut cursor, left, column_w, row_h, &cells, false);
    }

    cursor.y -= mm(10.0);
    cursor.ensure(canvas, mm(SIGNATURE_BLOCK_MM));
    let centre = A4.width / 2.0;
    canvas.set_font(Font::Helvetica, BODY_SIZE);
    canvas.draw_centred_string(centre, cursor.y, "Segue assinado,");
    cursor.y -= mm(18.0);
    canvas.set_line_width(0.7);
    canvas.line(centre - mm(40.0), cursor.y, centre + mm(40.0), cursor.y);
    cursor.y -= mm(5.0);
    canvas.set_font(Font::HelveticaBold, BODY_SIZE);
    canvas.draw_centred_string(centre, cursor.y, &request.nome);
    cursor.y -= mm(5.0);
    canvas.set_font(Font::Helvetica, BODY_SIZE);
    canvas.draw_centred_string(centre, cursor.y, &format!("CPF: {}", request.cpf));

    cursor.finish_page(canvas);
    cursor.page
}

fn paragraph(canvas: &mut Canvas, cursor: &mut Cursor, text: &str, font: Font, left: f32, width: f32) {
    let line_h = BODY_SIZE * 1.5;
    for line in wrap_text(text, font, BODY_SIZE, width) {
        cursor.ensure(canvas, line_h);
        cursor.y -= line_h;
        canvas.set_font(font, BODY_SIZE);
        canvas.draw_string(left, cursor.y, &line);
    }
}

fn table_header(canvas: &mut Canvas, cursor: &mut Cursor, left: f32, column_w: f32, row_h: f32) {
    let labels = COLUMNS.map(str::to_string);
    table_row(canvas, cursor, left, column_w, row_h, &labels, true);
}

fn table_row(
    canvas: &mut Canvas,
    cursor: &mut Cursor,
    left: f32,
    column_w: f32,
    row_h: f32,
    cells: &[String],
    header: bool,
) {
    cursor.y -= row_h;
    canvas.set_line_width(0.5);
    for (i, cell) in cells.iter().enumerate() {
        let x = left + i as f32 * column_w;
        if header {
            canvas.set_fill_gray(0.95);
            canvas.rect(x, cursor.y, column_w, row_h, true);
            canvas.set_fill_gray(0.0);
        } else {
            canvas.rect(x, cursor.y, column_w, row_h, false);
        }
        let font = if header { Font::HelveticaBold } else { Font::Helvetica };
        canvas.set_font(font, 10.0);
        canvas.draw_centred_string(x + column_w / 2.0, cursor.y + row_h / 2.0 - 3.5, cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::tests::{page_count, page_strings, shows};
    use crate::error::RenderError;
    use chrono::NaiveDate;
    use form_types::FormError;

    fn request(animals: u32, installments: u32) -> InstallmentRequest {
        InstallmentRequest {
            request_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            infraction_date: NaiveDate::from_ymd_opt(2026, 2, 20).unwrap(),
            infraction_number: "A-123".to_string(),
            nome: "José Pereira".to_string(),
            cpf: "123.456.789-00".to_string(),
            animals,
            installments,
            ..InstallmentRequest::default()
        }
    }

    #[test]
    fn request_text_names_the_notice() {
        let text = request_text(&request(10, 1));
        assert!(text.starts_with("Eu, José Pereira, brasileiro(a)"));
        assert!(text.contains("datado de 10/03/2026"));
        assert!(text.contains("Auto de Infração no A-123, lavrado em 20/02/2026"));
    }

    #[test]
    fn short_plan_fits_one_page() {
        let bytes = render_installment_request(&request(10, 3), &Assets::empty()).unwrap();
        assert_eq!(page_count(&bytes), 1);
        assert!(shows(&bytes, 1, "Parcelas e Vencimentos"));
        assert!(shows(&bytes, 1, "10/05/2026"));
        assert!(shows(&bytes, 1, "Pagina 1 de 1"));
    }

    #[test]
    fn long_plan_repeats_the_table_header() {
        let bytes = render_installment_request(&request(400, 30), &Assets::empty()).unwrap();
        let pages = page_count(&bytes);
        assert!(pages >= 2);
        let second = page_strings(&bytes, 2);
        assert!(second.iter().any(|s| s == "Data de Vencimento"));
        assert!(shows(&bytes, pages as u32, &format!("Pagina {} de {}", pages, pages)));
    }

    #[test]
    fn uninstallable_request_is_an_error() {
        let err = render_installment_request(&request(1, 1), &Assets::empty()).unwrap_err();
        assert!(matches!(err, RenderError::Form(FormError::NotInstallable { .. })));
    }
}
