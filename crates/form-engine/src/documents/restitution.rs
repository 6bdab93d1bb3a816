use form_types::RestitutionRequest;
use pdf_layout::{mm, string_width, wrap_text, Canvas, Font, A4};
use tracing::debug;

use super::frame::logo_box_with_title;
use super::or_blank;
use crate::assets::Assets;
use crate::error::Result;

pub(crate) const TITLE: &str = "Requerimento de restituição de valor recolhido indevidamente";
pub(crate) const FINE_LABEL: &str = "MULTA DECORRENTES DA ATUAÇÃO DA AGÊNCIA DE DEFESA \
    AGROSILVOPASTORIL DO ESTADO DE RONDÔNIA – IDARON";

const MARGIN_MM: f32 = 15.0;
const SIZE: f32 = 10.0;

struct Writer<'a> {
    canvas: &'a mut Canvas,
    x: f32,
    width: f32,
    y: f32,
}

impl Writer<'_> {
    fn line_h() -> f32 {
        mm(6.0)
    }

    fn heading(&mut self, text: &str) {
        self.canvas.set_font(Font::HelveticaBold, SIZE);
        self.canvas.draw_string(self.x, self.y, text);
        self.y -= Self::line_h();
    }

    /// Bold label followed by its value, or a blank line
    fn labelled(&mut self, label: &str, value: &str) {
        let label = format!("{} ", label);
        self.canvas.set_font(Font::HelveticaBold, SIZE);
        self.canvas.draw_string(self.x, self.y, &label);
        self.canvas.set_font(Font::Helvetica, SIZE);
        let offset = string_width(&label, Font::HelveticaBold, SIZE);
        self.canvas.draw_string(self.x + offset, self.y, or_blank(value));
        self.y -= Self::line_h();
    }

    fn wrapped(&mut self, text: &str) {
        self.canvas.set_font(Font::Helvetica, SIZE);
        for line in wrap_text(text, Font::Helvetica, SIZE, self.width) {
            self.canvas.draw_string(self.x, self.y, &line);
            self.y -= mm(5.0);
        }
        self.y -= mm(2.0);
    }

    /// 4 mm box, marked with an X when checked
    fn checkbox(&mut self, x: f32, y: f32, checked: bool) {
        let side = mm(4.0);
        self.canvas.rect(x, y - mm(2.5), side, side, false);
        if checked {
            self.canvas.set_font(Font::HelveticaBold, 12.0);
            self.canvas.draw_string(x + mm(0.7), y - mm(1.5), "X");
        }
    }
}

/// Refund request for unduly paid fees
pub fn render_restitution_request(request: &RestitutionRequest, assets: &Assets) -> Result<Vec<u8>> {
    let mut canvas = Canvas::new(A4);
    canvas.set_title("Requerimento de restituição");

    let margin = mm(MARGIN_MM);
    let width = canvas.width() - 2.0 * margin;
    let top = canvas.height() - margin;
    let title_y = logo_box_with_title(&mut canvas, assets, margin, top, width, TITLE)?;

    let mut w = Writer {
        canvas: &mut canvas,
        x: margin,
        width,
        y: title_y - mm(10.0),
    };

    w.heading("RESTITUIÇÃO DE VALOR RECOLHIDO INDEVIDAMENTE, REFERENTE A TAXAS");

    let y = w.y;
    w.checkbox(w.x, y, request.taxa_gta);
    w.canvas.set_font(Font::Helvetica, SIZE);
    w.canvas.draw_string(w.x + mm(6.0), y - mm(0.5), "GTA ONLINE");

    let y_fine = y - mm(6.0);
    w.checkbox(w.x, y_fine, request.taxa_multa);
    let label_x = w.x + mm(6.0);
    let fine_lines = wrap_text(FINE_LABEL, Font::Helvetica, SIZE, margin + width - label_x);
    w.canvas.set_font(Font::Helvetica, SIZE);
    for (i, line) in fine_lines.iter().enumerate() {
        w.canvas.draw_string(label_x, y_fine - i as f32 * mm(5.0), line);
    }
    w.y -= mm(6.0) + fine_lines.len() as f32 * mm(5.0);

    w.labelled("Nome:", &request.nome);
    w.labelled("Nacionalidade:", &request.nacionalidade);
    w.labelled("CPF/CNPJ:", &request.cpf_cnpj);
    w.labelled("Residente e domiciliado:", &request.residente);
    w.labelled("Município/Distrito:", &request.municipio);
    w.labelled("Propriedade:", &request.propriedade);

    w.heading("VEM REQUERER:");
    w.wrapped(&request.vem_requerer);
    w.heading("JUSTIFICATIVA:");
    w.wrapped(&request.justificativa);

    w.heading("DADOS DA CONTA BANCÁRIA PARA DEVOLUÇÃO:");
    w.labelled("Nome do titular da conta:", &request.titular);
    w.labelled("CPF:", &request.conta_cpf);
    w.labelled("Banco:", &request.banco);
    w.labelled("Agência:", &request.agencia);
    w.labelled("Conta corrente:", &request.conta_corrente);
    w.labelled("Número do banco:", &request.numero_banco);
    w.labelled("Tipo:", &request.tipo);

    w.y -= mm(2.0);
    w.heading("DECLARAÇÃO DE INEXISTÊNCIA DE PROCESSO DE RESTITUIÇÃO EM ANDAMENTO");
    w.wrapped(&request.declaracao);

    w.heading("CÓDIGO DE BARRAS DO DARE (BOLETO):");
    w.labelled("Código de barras:", &request.codigo_barras);
    w.labelled("Local e data:", &request.place_and_date());

    let sig_y = margin + mm(12.0);
    let sig_w = mm(70.0);
    let sig_x = (canvas.width() - sig_w) / 2.0;
    canvas.line(sig_x, sig_y, sig_x + sig_w, sig_y);
    canvas.set_font(Font::Helvetica, 9.0);
    let signer = match request.nome.trim() {
        "" => "Assinatura",
        name => name,
    };
    canvas.draw_centred_string(sig_x + sig_w / 2.0, sig_y - mm(4.0), signer);

    debug!(gta = request.taxa_gta, multa = request.taxa_multa, "Restitution request laid out");
    Ok(canvas.finish()?)
}
