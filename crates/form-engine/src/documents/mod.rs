//! Page layouts, one per document kind
//!
//! Coordinates are in points with the origin at the bottom-left corner.
//! Every layout takes its record and the loaded [`Assets`] and returns the
//! finished PDF bytes.

pub(crate) mod activity;
pub(crate) mod declaration;
pub(crate) mod frame;
pub(crate) mod inmate;
pub(crate) mod installment;
pub(crate) mod restitution;
pub(crate) mod sugesp;
pub(crate) mod vehicle;

pub use activity::render_activity_report;
pub use declaration::render_clearance_declaration;
pub use inmate::render_inmate_timesheet;
pub use installment::render_installment_request;
pub use restitution::render_restitution_request;
pub use sugesp::render_sugesp_timesheet;
pub use vehicle::render_vehicle_log;

use pdf_layout::{Canvas, ImageId};

use crate::assets::Logo;

/// Printed in place of a value nobody filled in
pub(crate) const BLANK_LINE: &str = "______________________________";

pub(crate) fn or_blank(value: &str) -> &str {
    if value.trim().is_empty() {
        BLANK_LINE
    } else {
        value
    }
}

/// Register an optional logo on the canvas
pub(crate) fn register_logo(canvas: &mut Canvas, logo: Option<&Logo>) -> Option<(ImageId, f32)> {
    logo.map(|logo| {
        let aspect = logo.image.aspect();
        (canvas.add_image(logo.image.clone()), aspect)
    })
}

/// Draw an image fitted inside a box, centred in it
pub(crate) fn draw_fitted(
    canvas: &mut Canvas,
    id: ImageId,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
) -> Result<(), pdf_layout::LayoutError> {
    let (w, h) = match canvas.image(id) {
        Some(image) => image.fit(width, height),
        None => return Err(pdf_layout::LayoutError::UnknownImage(0)),
    };
    canvas.draw_image(id, x + (width - w) / 2.0, y + (height - h) / 2.0, w, h)
}

#[cfg(test)]
pub(crate) mod tests {
    use lopdf::content::Content;
    use lopdf::{Document, Object};

    /// Parse rendered bytes and return the page count
    pub(crate) fn page_count(bytes: &[u8]) -> usize {
        assert!(bytes.starts_with(b"%PDF-"));
        let doc = Document::load_mem(bytes).unwrap();
        doc.get_pages().len()
    }

    /// Strings shown on a page (1-based), in drawing order
    pub(crate) fn page_strings(bytes: &[u8], page: u32) -> Vec<String> {
        let doc = Document::load_mem(bytes).unwrap();
        let page_id = doc.get_pages()[&page];
        let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
        content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| match op.operands.first() {
                Some(Object::String(bytes, _)) => Some(bytes.iter().map(|b| *b as char).collect()),
                _ => None,
            })
            .collect()
    }

    /// True when some string on the page contains `needle`
    pub(crate) fn shows(bytes: &[u8], page: u32, needle: &str) -> bool {
        page_strings(bytes, page).iter().any(|s| s.contains(needle))
    }
}
