use crate::types::encoding::encode_char;

/// Glyph metrics for one physical font.
///
/// Layout measures text only through this trait, so the pipeline does not
/// care whether a logical face is backed by an embedded TrueType file or by
/// a base-14 fallback. Widths are expressed per WinAnsi code in 1/1000 em,
/// the unit of the PDF `/Widths` array.
pub trait FontType {
    fn glyph_width(&self, code: u8) -> f32;

    fn char_width(&self, ch: char, font_size: f32) -> f32 {
        self.glyph_width(encode_char(ch)) * font_size / 1000.0
    }

    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().map(|ch| self.char_width(ch, font_size)).sum()
    }
}
