//! The drawing surface
//!
//! Drawing calls append content-stream operators to the current page.
//! `show_page` closes a page and opens the next one; `finish` assembles the
//! document with fonts, images and the info dictionary.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

use crate::error::LayoutError;
use crate::fonts::{encode_win_ansi, string_width, Font};
use crate::raster::RasterImage;
use crate::units::PageSize;

/// Handle to an image registered with [`Canvas::add_image`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageId(usize);

impl ImageId {
    fn resource_name(self) -> String {
        format!("Im{}", self.0 + 1)
    }
}

#[derive(Debug, Clone, Copy)]
struct TextState {
    font: Font,
    size: f32,
}

struct Page {
    size: PageSize,
    operations: Vec<Operation>,
}

pub struct Canvas {
    size: PageSize,
    title: Option<String>,
    pages: Vec<Page>,
    operations: Vec<Operation>,
    text: TextState,
    saved: Vec<TextState>,
    images: Vec<RasterImage>,
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

impl Canvas {
    pub fn new(size: PageSize) -> Self {
        Self {
            size,
            title: None,
            pages: Vec::new(),
            operations: Vec::new(),
            text: TextState {
                font: Font::Helvetica,
                size: 12.0,
            },
            saved: Vec::new(),
            images: Vec::new(),
        }
    }

    pub fn page_size(&self) -> PageSize {
        self.size
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    /// Title stored in the document information dictionary
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Pages closed so far plus the one being drawn
    pub fn page_count(&self) -> usize {
        self.pages.len() + 1
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    pub fn set_line_width(&mut self, width: f32) {
        self.push("w", vec![real(width)]);
    }

    pub fn set_stroke_gray(&mut self, gray: f32) {
        self.push("G", vec![real(gray)]);
    }

    pub fn set_fill_gray(&mut self, gray: f32) {
        self.push("g", vec![real(gray)]);
    }

    pub fn set_stroke_rgb(&mut self, r: f32, g: f32, b: f32) {
        self.push("RG", vec![real(r), real(g), real(b)]);
    }

    pub fn set_fill_rgb(&mut self, r: f32, g: f32, b: f32) {
        self.push("rg", vec![real(r), real(g), real(b)]);
    }

    pub fn set_font(&mut self, font: Font, size: f32) {
        self.text = TextState { font, size };
    }

    pub fn font(&self) -> (Font, f32) {
        (self.text.font, self.text.size)
    }

    /// Width of `text` in the current font
    pub fn string_width(&self, text: &str) -> f32 {
        string_width(text, self.text.font, self.text.size)
    }

    /// Rectangle outline, or filled with the fill colour and outlined
    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: bool) {
        self.push("re", vec![real(x), real(y), real(width), real(height)]);
        self.push(if fill { "B" } else { "S" }, vec![]);
    }

    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.push("m", vec![real(x1), real(y1)]);
        self.push("l", vec![real(x2), real(y2)]);
        self.push("S", vec![]);
    }

    /// Text with its baseline starting at (x, y)
    pub fn draw_string(&mut self, x: f32, y: f32, text: &str) {
        if text.is_empty() {
            return;
        }
        let TextState { font, size } = self.text;
        self.push("BT", vec![]);
        self.push(
            "Tf",
            vec![Object::Name(font.resource_name().as_bytes().to_vec()), real(size)],
        );
        self.push("Td", vec![real(x), real(y)]);
        self.push(
            "Tj",
            vec![Object::String(encode_win_ansi(text), StringFormat::Literal)],
        );
        self.push("ET", vec![]);
    }

    /// Text centred horizontally on x
    pub fn draw_centred_string(&mut self, x: f32, y: f32, text: &str) {
        let width = self.string_width(text);
        self.draw_string(x - width / 2.0, y, text);
    }

    /// Text ending at x
    pub fn draw_right_string(&mut self, x: f32, y: f32, text: &str) {
        let width = self.string_width(text);
        self.draw_string(x - width, y, text);
    }

    pub fn save_state(&mut self) {
        self.saved.push(self.text);
        self.push("q", vec![]);
    }

    pub fn restore_state(&mut self) {
        if let Some(text) = self.saved.pop() {
            self.text = text;
            self.push("Q", vec![]);
        }
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.push(
            "cm",
            vec![real(1.0), real(0.0), real(0.0), real(1.0), real(dx), real(dy)],
        );
    }

    /// Counter-clockwise rotation in degrees
    pub fn rotate(&mut self, degrees: f32) {
        let (sin, cos) = degrees.to_radians().sin_cos();
        self.push(
            "cm",
            vec![real(cos), real(sin), real(-sin), real(cos), real(0.0), real(0.0)],
        );
    }

    /// Register an image once; it can then be drawn any number of times
    pub fn add_image(&mut self, image: RasterImage) -> ImageId {
        self.images.push(image);
        ImageId(self.images.len() - 1)
    }

    pub fn image(&self, id: ImageId) -> Option<&RasterImage> {
        self.images.get(id.0)
    }

    /// Paint an image into the box with lower-left corner (x, y)
    pub fn draw_image(
        &mut self,
        id: ImageId,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), LayoutError> {
        if id.0 >= self.images.len() {
            return Err(LayoutError::UnknownImage(id.0));
        }
        self.push("q", vec![]);
        self.push(
            "cm",
            vec![real(width), real(0.0), real(0.0), real(height), real(x), real(y)],
        );
        self.push("Do", vec![Object::Name(id.resource_name().into_bytes())]);
        self.push("Q", vec![]);
        Ok(())
    }

    /// Close the current page and start a new one of the same size
    pub fn show_page(&mut self) {
        let operations = std::mem::take(&mut self.operations);
        self.pages.push(Page {
            size: self.size,
            operations,
        });
        self.saved.clear();
    }

    /// Assemble the PDF.
    ///
    /// A page left open with content is closed first, and a canvas on which
    /// nothing was drawn still yields one blank page.
    pub fn finish(mut self) -> Result<Vec<u8>, LayoutError> {
        if !self.operations.is_empty() || self.pages.is_empty() {
            self.show_page();
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = Dictionary::new();
        for font in Font::ALL {
            let font_id = doc.add_object(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Font".to_vec())),
                ("Subtype", Object::Name(b"Type1".to_vec())),
                ("BaseFont", Object::Name(font.base_font().as_bytes().to_vec())),
                ("Encoding", Object::Name(b"WinAnsiEncoding".to_vec())),
            ]));
            fonts.set(font.resource_name(), Object::Reference(font_id));
        }

        let mut xobjects = Dictionary::new();
        for (index, image) in self.images.iter().enumerate() {
            let image_id = add_image_object(&mut doc, image);
            xobjects.set(
                ImageId(index).resource_name(),
                Object::Reference(image_id),
            );
        }

        let mut resources = Dictionary::new();
        resources.set("Font", Object::Dictionary(fonts));
        if !self.images.is_empty() {
            resources.set("XObject", Object::Dictionary(xobjects));
        }
        let resources_id = doc.add_object(resources);

        let mut page_ids = Vec::with_capacity(self.pages.len());
        for page in self.pages {
            let content = Content {
                operations: page.operations,
            };
            let bytes = content
                .encode()
                .map_err(|e| LayoutError::ContentEncode(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(Dictionary::new(), bytes));

            let page_id = doc.add_object(Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        real(0.0),
                        real(0.0),
                        real(page.size.width),
                        real(page.size.height),
                    ]),
                ),
                ("Resources", Object::Reference(resources_id)),
                ("Contents", Object::Reference(content_id)),
            ]));
            page_ids.push(page_id);
        }

        let pages = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(page_ids.len() as i64)),
            (
                "Kids",
                Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
            ),
        ]);
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ]));
        doc.trailer.set("Root", Object::Reference(catalog_id));

        let mut info = Dictionary::new();
        info.set("Producer", Object::string_literal("pdf-layout"));
        if let Some(title) = &self.title {
            info.set("Title", text_string(title));
        }
        let info_id = doc.add_object(info);
        doc.trailer.set("Info", Object::Reference(info_id));

        doc.compress();

        let mut output = Vec::new();
        doc.save_to(&mut output)
            .map_err(|e| LayoutError::Save(e.to_string()))?;

        debug!(
            pages = page_ids.len(),
            bytes = output.len(),
            "PDF assembled"
        );
        Ok(output)
    }
}

fn add_image_object(doc: &mut Document, image: &RasterImage) -> ObjectId {
    let dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(image.width as i64)),
        ("Height", Object::Integer(image.height as i64)),
        ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
        ("BitsPerComponent", Object::Integer(8)),
        ("Filter", Object::Name(b"FlateDecode".to_vec())),
    ]);
    doc.add_object(Stream::new(dict, image.data.clone()).with_compression(false))
}

/// PDF text string: UTF-16BE with a byte order mark
fn text_string(text: &str) -> Object {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
