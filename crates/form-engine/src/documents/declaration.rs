use form_types::ClearanceDeclaration;
use pdf_layout::{mm, wrap_text, Canvas, Font, A4};
use tracing::debug;

use super::register_logo;
use crate::assets::Assets;
use crate::error::Result;

const MARGIN_MM: f32 = 20.0;

/// "Nothing pending" declaration signed by an agency officer
pub fn render_clearance_declaration(
    declaration: &ClearanceDeclaration,
    assets: &Assets,
) -> Result<Vec<u8>> {
    let mut canvas = Canvas::new(A4);
    canvas.set_title("Declaração de nada consta");

    let margin = mm(MARGIN_MM);
    let width = canvas.width() - 2.0 * margin;
    let centre = canvas.width() / 2.0;
    let mut y = canvas.height() - margin;

    if let Some((id, _)) = register_logo(&mut canvas, assets.agency.as_ref()) {
        let (w, h) = match canvas.image(id) {
            Some(image) => image.fit(width, mm(25.0)),
            None => (0.0, 0.0),
        };
        y -= h;
        canvas.draw_image(id, centre - w / 2.0, y, w, h)?;
    }
    y -= mm(10.0);

    canvas.set_font(Font::HelveticaBold, 14.0);
    canvas.draw_centred_string(centre, y, "DECLARAÇÃO");
    y -= mm(12.0);

    canvas.set_font(Font::Helvetica, 11.0);
    let requester = declaration.requester_name();
    for line in [
        declaration.sexo.addressee(),
        "Requerente",
        requester.as_str(),
        declaration.sexo.salutation(),
    ] {
        canvas.draw_string(margin, y, line);
        y -= mm(6.0);
    }

    y -= mm(2.0);
    for line in wrap_text(&declaration.body(), Font::Helvetica, 11.0, width) {
        canvas.draw_string(margin, y, &line);
        y -= mm(5.0);
    }

    y -= mm(6.0);
    canvas.draw_string(margin, y, "Atenciosamente,");
    y -= mm(14.0);

    canvas.draw_centred_string(centre, y, &declaration.officer_name());
    y -= mm(6.0);
    canvas.set_font(Font::Helvetica, 10.0);
    if !declaration.servidor_cargo.trim().is_empty() {
        canvas.draw_centred_string(centre, y, &format!("Cargo: {}", declaration.servidor_cargo.trim()));
        y -= mm(5.0);
    }
    if !declaration.servidor_matricula.trim().is_empty() {
        canvas.draw_centred_string(
            centre,
            y,
            &format!("Matricula: {}", declaration.servidor_matricula.trim()),
        );
        y -= mm(5.0);
    }

    let has_identity = [&declaration.nome, &declaration.cpf, &declaration.rg]
        .iter()
        .any(|value| !value.trim().is_empty());
    if declaration.incluir_assinatura_requerente && has_identity {
        y -= mm(10.0);
        if !declaration.nome.trim().is_empty() {
            canvas.set_font(Font::Helvetica, 11.0);
            canvas.draw_centred_string(centre, y, &requester);
            y -= mm(6.0);
        }
        let documents = declaration.requester_documents();
        canvas.set_font(Font::Helvetica, 10.0);
        if !documents.is_empty() {
            canvas.draw_centred_string(centre, y, &documents);
            y -= mm(5.0);
        }
        canvas.draw_centred_string(centre, y, "Assinatura do requerente");
    }

    debug!(sexo = declaration.sexo.label(), "Clearance declaration laid out");
    Ok(canvas.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::tests::sample_assets;
    use crate::documents::tests::{page_count, page_strings, shows};
    use form_types::Sex;

    fn declaration() -> ClearanceDeclaration {
        ClearanceDeclaration {
            sexo: Sex::Feminino,
            nome: "Maria Lima".to_string(),
            cpf: "111.222.333-44".to_string(),
            servidor_nome: "Carlos Alves".to_string(),
            servidor_cargo: "Fiscal".to_string(),
            ..ClearanceDeclaration::default()
        }
    }

    #[test]
    fn addresses_by_sex_and_signs() {
        let bytes = render_clearance_declaration(&declaration(), &sample_assets()).unwrap();
        assert_eq!(page_count(&bytes), 1);
        assert!(shows(&bytes, 1, "A Ilustrissima Sra."));
        assert!(shows(&bytes, 1, "MARIA LIMA"));
        assert!(shows(&bytes, 1, "Cargo: Fiscal"));
        assert!(shows(&bytes, 1, "CPF: 111.222.333-44"));
        assert!(shows(&bytes, 1, "Assinatura do requerente"));
        assert!(!shows(&bytes, 1, "Matricula:"));
    }

    #[test]
    fn requester_block_can_be_left_out() {
        let mut without = declaration();
        without.incluir_assinatura_requerente = false;
        let bytes = render_clearance_declaration(&without, &Assets::empty()).unwrap();
        assert!(!shows(&bytes, 1, "Assinatura do requerente"));
    }

    #[test]
    fn blank_declaration_uses_placeholders() {
        let bytes =
            render_clearance_declaration(&ClearanceDeclaration::default(), &Assets::empty()).unwrap();
        let strings = page_strings(&bytes, 1);
        // Blank requester name stands in for the officer too
        let blanks = strings
            .iter()
            .filter(|s| s.as_str() == ClearanceDeclaration::BLANK_NAME)
            .count();
        assert_eq!(blanks, 2);
        assert!(!strings.iter().any(|s| s == "Assinatura do requerente"));
    }
}
