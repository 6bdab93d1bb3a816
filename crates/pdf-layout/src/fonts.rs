//! Base-14 Helvetica faces: glyph widths and WinAnsi encoding
//!
//! Widths are the Adobe AFM advance widths in thousandths of an em for the
//! printable ASCII range. Accented Latin letters measure as their base
//! letter, which matches the AFM values for the Portuguese alphabet.

/// The two faces every document uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    pub const ALL: [Font; 2] = [Font::Helvetica, Font::HelveticaBold];

    /// Name of the font in the page resource dictionary
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    pub fn base_font(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    fn ascii_widths(self) -> &'static [u16; 95] {
        match self {
            Font::Helvetica => &HELVETICA_WIDTHS,
            Font::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Advance width of one character in thousandths of an em
    pub fn char_width(self, c: char) -> u16 {
        let c = base_letter(c);
        match c {
            ' '..='~' => self.ascii_widths()[c as usize - 32],
            '–' => 556,
            '—' => 1000,
            '°' => 400,
            'º' => 365,
            'ª' => 370,
            '“' | '”' => match self {
                Font::Helvetica => 333,
                Font::HelveticaBold => 500,
            },
            '‘' | '’' => match self {
                Font::Helvetica => 222,
                Font::HelveticaBold => 278,
            },
            '•' => 350,
            '…' => 1000,
            '\t' => self.ascii_widths()[0],
            _ => 556,
        }
    }
}

/// Width of `text` in points at the given size
pub fn string_width(text: &str, font: Font, size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| font.char_width(c) as u32).sum();
    units as f32 * size / 1000.0
}

/// Encode text for a WinAnsi simple font; unsupported characters become `?`
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .filter_map(|c| match c {
            '\t' => Some(b' '),
            c if c.is_control() => None,
            ' '..='~' => Some(c as u8),
            '\u{a0}'..='\u{ff}' => Some(c as u32 as u8),
            '€' => Some(0x80),
            '…' => Some(0x85),
            '‘' => Some(0x91),
            '’' => Some(0x92),
            '“' => Some(0x93),
            '”' => Some(0x94),
            '•' => Some(0x95),
            '–' => Some(0x96),
            '—' => Some(0x97),
            _ => Some(b'?'),
        })
        .collect()
}

fn base_letter(c: char) -> char {
    match c {
        'Á' | 'À' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'Ó' | 'Ò' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'Ç' => 'C',
        'ç' => 'c',
        'Ñ' => 'N',
        'ñ' => 'n',
        '\u{a0}' => ' ',
        other => other,
    }
}

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn measures_ascii_with_afm_widths() {
        // H e l l o = 722 + 556 + 222 + 222 + 556
        assert!((string_width("Hello", Font::Helvetica, 10.0) - 22.78).abs() < 1e-4);
        // bold: 722 + 556 + 278 + 278 + 611
        assert!((string_width("Hello", Font::HelveticaBold, 10.0) - 24.45).abs() < 1e-4);
        assert_eq!(string_width("", Font::Helvetica, 12.0), 0.0);
    }

    #[test]
    fn accented_letters_measure_as_base() {
        assert_eq!(
            string_width("FUNÇÃO", Font::HelveticaBold, 9.0),
            string_width("FUNCAO", Font::HelveticaBold, 9.0)
        );
    }

    #[test]
    fn encodes_portuguese_and_dashes() {
        assert_eq!(encode_win_ansi("Ção"), vec![0xC7, 0xE3, b'o']);
        assert_eq!(encode_win_ansi("a – b"), vec![b'a', b' ', 0x96, b' ', b'b']);
        assert_eq!(encode_win_ansi("漢"), vec![b'?']);
        assert_eq!(encode_win_ansi("a\nb"), vec![b'a', b'b']);
    }
}
