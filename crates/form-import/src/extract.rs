//! Plain text from uploaded PDF and DOCX files

use std::io::{Cursor, Read};

use pdf_extract::extract_text_from_mem;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::error::{ImportError, Result};

/// Extract the text of an upload, choosing the reader by file extension
pub fn read_upload(file_name: &str, bytes: &[u8]) -> Result<String> {
    if bytes.is_empty() {
        return Err(ImportError::Empty);
    }

    let lower = file_name.to_lowercase();
    let text = if lower.ends_with(".pdf") {
        read_pdf(bytes)?
    } else if lower.ends_with(".docx") {
        read_docx(bytes)?
    } else {
        let extension = lower.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        return Err(ImportError::UnsupportedFormat(extension.to_string()));
    };

    debug!(file = %file_name, chars = text.len(), "Extracted upload text");
    Ok(text)
}

fn read_pdf(bytes: &[u8]) -> Result<String> {
    extract_text_from_mem(bytes).map_err(|e| ImportError::Pdf(e.to_string()))
}

fn read_docx(bytes: &[u8]) -> Result<String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| ImportError::Docx(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ImportError::Docx(e.to_string()))?
        .read_to_string(&mut xml)
        .map_err(|e| ImportError::Docx(e.to_string()))?;

    let lines = document_lines(&xml)?;
    Ok(lines.join("\n"))
}

/// Paragraphs outside tables first, then the text of every table cell.
///
/// Blank entries are skipped. A cell holding several paragraphs keeps them
/// on separate lines of one entry.
pub(crate) fn document_lines(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs = Vec::new();
    let mut cells = Vec::new();
    let mut table_depth = 0usize;
    let mut cell: Option<Vec<String>> = None;
    let mut paragraph = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"tbl" => table_depth += 1,
                b"tc" if table_depth == 1 => cell = Some(Vec::new()),
                b"p" => paragraph.clear(),
                b"t" => in_text = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"tab" => paragraph.push('\t'),
                b"br" | b"cr" => paragraph.push('\n'),
                _ => {}
            },
            Ok(Event::Text(e)) => {
                if in_text {
                    let text = e
                        .unescape()
                        .map_err(|err| ImportError::Docx(err.to_string()))?;
                    paragraph.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    let text = std::mem::take(&mut paragraph);
                    if table_depth == 0 {
                        paragraphs.push(text);
                    } else if let Some(cell) = cell.as_mut() {
                        cell.push(text);
                    }
                }
                b"tc" if table_depth == 1 => {
                    if let Some(done) = cell.take() {
                        cells.push(done.join("\n"));
                    }
                }
                b"tbl" => table_depth = table_depth.saturating_sub(1),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ImportError::Docx(e.to_string())),
            _ => {}
        }
    }

    Ok(paragraphs
        .into_iter()
        .chain(cells)
        .filter(|line| !line.trim().is_empty())
        .collect())
}
