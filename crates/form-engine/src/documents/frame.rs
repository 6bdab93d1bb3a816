//! Headers and footers shared by several documents

use form_types::FooterLines;
use pdf_layout::{mm, Canvas, Font, LayoutError};

use super::{draw_fitted, register_logo};
use crate::assets::Assets;

pub(crate) const STATE_HEADER_LINES: [&str; 3] = [
    "GOVERNO DO ESTADO DE RONDÔNIA",
    "SECRETARIA DE ESTADO DA JUSTIÇA",
    "FUNDO PENITENCIÁRIO",
];

pub(crate) const SUGESP_HEADER_LINES: [&str; 2] = [
    "GOVERNO DO ESTADO DE RONDONIA",
    "SUPERINTENDENCIA DE GESTAO DOS GASTOS PUBLICOS ADMINISTRATIVOS - SUGESP",
];

/// State coat of arms and the three institutional lines of the inmate forms.
///
/// Returns the y coordinate where the body may start.
pub(crate) fn official_header(canvas: &mut Canvas, assets: &Assets) -> Result<f32, LayoutError> {
    let top_margin = mm(14.0);
    let lift = mm(8.0);
    let centre = canvas.width() / 2.0;

    let mut y_logo = canvas.height() - top_margin;
    if let Some((id, aspect)) = register_logo(canvas, assets.state_header.as_ref()) {
        let width = mm(24.0);
        let height = width * aspect;
        y_logo = canvas.height() - top_margin - height - lift;
        canvas.draw_image(id, centre - width / 2.0, y_logo, width, height)?;
    }

    let y_text = y_logo - mm(0.5);
    let spacing = 10.0;
    canvas.set_font(Font::HelveticaBold, 10.0);
    for (i, line) in STATE_HEADER_LINES.iter().enumerate() {
        canvas.draw_centred_string(centre, y_text - i as f32 * spacing, line);
    }

    Ok(y_text - 2.0 * spacing - mm(2.0))
}

/// Rule, side logos and the five contact lines of the ULSAV footer.
///
/// Returns the y coordinate just above the footer.
pub(crate) fn ulsav_footer(
    canvas: &mut Canvas,
    assets: &Assets,
    footer: &FooterLines,
) -> Result<f32, LayoutError> {
    let bottom_margin = mm(8.0);
    let side_margin = mm(15.0);
    let y_base = bottom_margin + mm(22.0);
    let x_left = side_margin;
    let x_right = canvas.width() - side_margin;

    canvas.set_line_width(1.0);
    canvas.line(x_left, y_base, x_right, y_base);

    let logo_w = mm(38.0);
    let logo_h = mm(14.0);
    let y_logo = bottom_margin + mm(4.0);
    if let Some((id, _)) = register_logo(canvas, assets.footer_left.as_ref()) {
        draw_fitted(canvas, id, x_left, y_logo, logo_w, logo_h)?;
    }
    if let Some((id, _)) = register_logo(canvas, assets.footer_right.as_ref()) {
        draw_fitted(canvas, id, x_right - logo_w, y_logo, logo_w, logo_h)?;
    }

    let centre = canvas.width() / 2.0;
    let y_text = y_logo + logo_h - mm(1.0);
    for (i, line) in footer.lines().iter().enumerate() {
        let font = if i == 0 { Font::HelveticaBold } else { Font::Helvetica };
        canvas.set_font(font, 9.0);
        canvas.draw_centred_string(centre, y_text - i as f32 * 10.0, line);
    }

    Ok(y_base + mm(2.0))
}

/// SUGESP logo and the two superintendency lines
pub(crate) fn sugesp_header(canvas: &mut Canvas, assets: &Assets) -> Result<f32, LayoutError> {
    let y_top = canvas.height() - mm(6.0);
    let centre = canvas.width() / 2.0;

    let mut y_logo = y_top;
    if let Some((id, aspect)) = register_logo(canvas, assets.sugesp.as_ref()) {
        let height = mm(22.0);
        let width = if aspect > 0.0 { height / aspect } else { height };
        y_logo = y_top - height;
        canvas.draw_image(id, centre - width / 2.0, y_logo, width, height)?;
    }

    let y_text = y_logo - mm(3.0);
    canvas.set_font(Font::HelveticaBold, 10.0);
    canvas.draw_centred_string(centre, y_text, SUGESP_HEADER_LINES[0]);
    canvas.set_font(Font::HelveticaBold, 9.0);
    canvas.draw_centred_string(centre, y_text - mm(4.0), SUGESP_HEADER_LINES[1]);

    Ok(y_text - mm(8.0))
}

/// Logo box with a title bar under it, used by the agency documents.
///
/// The box spans `width` from `x` with its top at `y_top`. Returns the
/// bottom of the title bar.
pub(crate) fn logo_box_with_title(
    canvas: &mut Canvas,
    assets: &Assets,
    x: f32,
    y_top: f32,
    width: f32,
    title: &str,
) -> Result<f32, LayoutError> {
    let box_h = mm(30.0);
    let box_y = y_top - box_h;
    canvas.set_line_width(0.7);
    canvas.rect(x, box_y, width, box_h, false);

    if let Some((id, _)) = register_logo(canvas, assets.agency.as_ref()) {
        let (w, h) = match canvas.image(id) {
            Some(image) => image.fit(width * 0.8, mm(32.0)),
            None => (0.0, 0.0),
        };
        let logo_x = x + (width - w) / 2.0;
        let logo_y = box_y + (box_h - h) / 2.0 - mm(2.0);
        canvas.draw_image(id, logo_x, logo_y, w, h)?;
    }

    let bar_h = mm(6.0);
    let bar_y = box_y - bar_h;
    canvas.rect(x, bar_y, width, bar_h, false);
    canvas.set_font(Font::HelveticaBold, 10.0);
    canvas.draw_centred_string(x + width / 2.0, bar_y + mm(2.2), title);

    Ok(bar_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::tests::sample_assets;
    use pdf_layout::A4;

    #[test]
    fn header_without_logo_starts_below_top_margin() {
        let mut canvas = Canvas::new(A4);
        let y = official_header(&mut canvas, &Assets::empty()).unwrap();
        let expected = A4.height - mm(14.0) - mm(0.5) - 20.0 - mm(2.0);
        assert!((y - expected).abs() < 1e-3);
    }

    #[test]
    fn header_logo_pushes_body_down() {
        let mut with_logo = Canvas::new(A4);
        let mut without = Canvas::new(A4);
        let low = official_header(&mut with_logo, &sample_assets()).unwrap();
        let high = official_header(&mut without, &Assets::empty()).unwrap();
        // sample logo is 60 x 30 px: 24 mm wide, 12 mm high, lifted 8 mm
        assert!((high - low - mm(20.0)).abs() < 1e-2);
    }

    #[test]
    fn footer_reserves_thirty_two_mm() {
        let mut canvas = Canvas::new(A4);
        let y = ulsav_footer(&mut canvas, &sample_assets(), &FooterLines::default()).unwrap();
        assert!((y - mm(32.0)).abs() < 1e-3);
    }

    #[test]
    fn sugesp_header_height() {
        let mut canvas = Canvas::new(A4);
        let y = sugesp_header(&mut canvas, &sample_assets()).unwrap();
        let expected = A4.height - mm(6.0) - mm(22.0) - mm(3.0) - mm(8.0);
        assert!((y - expected).abs() < 1e-2);
    }
}
