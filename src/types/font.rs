use crate::{
    traits::FontType,
    types::{FontFamily, Style},
};

const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    278, 278, 564, 564, 564, 444, 921,
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889,
    722, 722, 556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
    333, 278, 333, 469, 500, 333,
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778,
    500, 500, 500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
    480, 200, 480, 541,
];

const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 570, 570, 570, 500, 930,
    722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944,
    722, 778, 611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667,
    333, 278, 333, 581, 500, 333,
    500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833,
    556, 500, 556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444,
    394, 220, 394, 520,
];

const TIMES_ITALIC: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 675, 675, 675, 500, 920,
    611, 611, 667, 722, 611, 611, 722, 722, 333, 444, 667, 556, 833,
    667, 722, 611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556,
    389, 278, 389, 422, 500, 333,
    500, 500, 444, 500, 444, 278, 500, 500, 278, 278, 444, 278, 722,
    500, 500, 500, 500, 389, 389, 278, 500, 444, 667, 444, 444, 389,
    400, 275, 400, 541,
];

const TIMES_BOLD_ITALIC: [u16; 95] = [
    250, 389, 555, 500, 500, 833, 778, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 570, 570, 570, 500, 832,
    667, 667, 667, 722, 667, 667, 722, 778, 389, 500, 667, 611, 889,
    722, 722, 611, 722, 667, 556, 611, 722, 667, 889, 667, 611, 611,
    333, 278, 333, 570, 500, 333,
    500, 500, 444, 500, 444, 333, 500, 556, 278, 278, 500, 278, 778,
    556, 500, 500, 500, 389, 389, 278, 556, 444, 667, 500, 444, 389,
    348, 220, 348, 570,
];

const COURIER_WIDTH: f32 = 600.0;
const FALLBACK_WIDTH: f32 = 500.0;

/// Unaccented letter whose advance stands in for a Latin-1 accented one.
fn latin1_base(code: u8) -> Option<u8> {
    let base = match code {
        0xC0..=0xC5 => b'A',
        0xC7 => b'C',
        0xC8..=0xCB => b'E',
        0xCC..=0xCF => b'I',
        0xD1 => b'N',
        0xD2..=0xD6 | 0xD8 => b'O',
        0xD9..=0xDC => b'U',
        0xDD => b'Y',
        0xE0..=0xE5 => b'a',
        0xE7 => b'c',
        0xE8..=0xEB => b'e',
        0xEC..=0xEF => b'i',
        0xF1 => b'n',
        0xF2..=0xF6 | 0xF8 => b'o',
        0xF9..=0xFC => b'u',
        0xFD | 0xFF => b'y',
        0x8A => b'S',
        0x9A => b's',
        0x8E => b'Z',
        0x9E => b'z',
        0x9F => b'Y',
        _ => return None,
    };
    Some(base)
}

/// Standard PDF font used when a bundled font file is missing or unreadable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Base14 {
    Courier,
    Times(Style),
}

impl Base14 {
    pub fn for_face(family: FontFamily, style: Style) -> Self {
        match family {
            FontFamily::Mono => Base14::Courier,
            FontFamily::Serif => Base14::Times(style),
        }
    }

    fn times_table(style: Style) -> &'static [u16; 95] {
        match style {
            Style::Normal => &TIMES_ROMAN,
            Style::Bold => &TIMES_BOLD,
            Style::Italic => &TIMES_ITALIC,
            Style::BoldItalic => &TIMES_BOLD_ITALIC,
        }
    }
}

impl FontType for Base14 {
    fn glyph_width(&self, code: u8) -> f32 {
        let style = match self {
            Base14::Courier => return COURIER_WIDTH,
            Base14::Times(style) => *style,
        };
        let table = Base14::times_table(style);

        match code {
            32..=126 => f32::from(table[usize::from(code - 32)]),
            0xA0 => f32::from(table[0]),
            0x95 => 350.0,
            0x85 | 0x97 => 1000.0,
            0x91 | 0x92 => 333.0,
            0x93 | 0x94 => 444.0,
            _ => latin1_base(code)
                .map(|base| f32::from(table[usize::from(base - 32)]))
                .unwrap_or(FALLBACK_WIDTH),
        }
    }
}

/// Advances measured from an embedded TrueType face, one per WinAnsi code
/// from 32 to 255.
#[derive(Debug, Clone)]
pub struct EmbeddedMetrics {
    pub widths: Vec<f32>,
}

impl EmbeddedMetrics {
    pub const FIRST_CHAR: u8 = 32;
    pub const LAST_CHAR: u8 = 255;
}

impl FontType for EmbeddedMetrics {
    fn glyph_width(&self, code: u8) -> f32 {
        code.checked_sub(Self::FIRST_CHAR)
            .and_then(|index| self.widths.get(usize::from(index)))
            .copied()
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn courier_is_fixed_pitch() {
        let courier = Base14::Courier;
        assert_eq!(courier.text_width("iiii", 12.0), courier.text_width("MMMM", 12.0));
        assert!((courier.text_width("abc", 10.0) - 18.0).abs() < f32::EPSILON);
    }

    #[test]
    fn times_bold_is_wider_than_roman() {
        let roman = Base14::Times(Style::Normal);
        let bold = Base14::Times(Style::Bold);
        assert!(bold.text_width("Hamburg", 12.0) > roman.text_width("Hamburg", 12.0));
    }

    #[test]
    fn accented_letters_use_their_base_width() {
        let roman = Base14::Times(Style::Normal);
        assert_eq!(roman.char_width('è', 12.0), roman.char_width('e', 12.0));
        assert_eq!(roman.char_width('À', 12.0), roman.char_width('A', 12.0));
    }

    #[test]
    fn embedded_widths_are_indexed_from_space() {
        let mut widths = vec![0.0; 224];
        widths[0] = 250.0;
        widths[usize::from(b'A' - 32)] = 700.0;
        let metrics = EmbeddedMetrics { widths };
        assert_eq!(metrics.glyph_width(b' '), 250.0);
        assert_eq!(metrics.glyph_width(b'A'), 700.0);
        assert_eq!(metrics.glyph_width(10), 0.0);
    }
}
