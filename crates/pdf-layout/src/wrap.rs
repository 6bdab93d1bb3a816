use crate::fonts::{string_width, Font};

/// Greedy word wrap against measured string widths.
///
/// Paragraphs separated by `\n` wrap independently and a blank paragraph
/// yields an empty line. A word wider than `max_width` gets a line of its
/// own. Never returns an empty list.
pub fn wrap_text(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut words = paragraph.split_whitespace();
        let Some(first) = words.next() else {
            lines.push(String::new());
            continue;
        };

        let mut line = first.to_string();
        for word in words {
            let candidate = format!("{} {}", line, word);
            if string_width(&candidate, font, size) <= max_width {
                line = candidate;
            } else {
                lines.push(std::mem::replace(&mut line, word.to_string()));
            }
        }
        lines.push(line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}
