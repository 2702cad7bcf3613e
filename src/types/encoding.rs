//! WinAnsi (Windows-1252) text encoding shared by the base-14 fallbacks and
//! the embedded TrueType fonts, which are both registered as simple fonts.

use encoding_rs::{EncoderResult, WINDOWS_1252};

/// Byte written for characters WinAnsi cannot express.
pub const REPLACEMENT: u8 = b'?';

/// Unicode character shown by WinAnsi code `byte`.
pub fn decode_byte(byte: u8) -> char {
    WINDOWS_1252
        .decode_without_bom_handling(&[byte])
        .0
        .chars()
        .next()
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}

/// WinAnsi code for `ch`, or [`REPLACEMENT`].
pub fn encode_char(ch: char) -> u8 {
    let mut buf = [0u8; 4];
    to_winansi(ch.encode_utf8(&mut buf))
        .first()
        .copied()
        .unwrap_or(REPLACEMENT)
}

/// One byte per character: control characters become spaces, characters
/// outside the code page become [`REPLACEMENT`].
pub fn to_winansi(text: &str) -> Vec<u8> {
    let visible: String = text
        .chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect();

    let mut encoder = WINDOWS_1252.new_encoder();
    let mut out = Vec::with_capacity(visible.len() + 1);
    let mut rest = visible.as_str();

    loop {
        let (result, read) = encoder.encode_from_utf8_to_vec_without_replacement(rest, &mut out, true);
        rest = &rest[read..];
        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => out.reserve(rest.len() + 1),
            EncoderResult::Unmappable(_) => out.push(REPLACEMENT),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn italian_accents_survive() {
        assert_eq!(to_winansi("però è"), vec![b'p', b'e', b'r', 0xF2, b' ', 0xE8]);
    }

    #[test]
    fn typographic_punctuation_maps_to_windows_codes() {
        assert_eq!(to_winansi("\u{2022}\u{2014}\u{2019}"), vec![0x95, 0x97, 0x92]);
        for byte in [0x95u8, 0x97, 0x92, 0x80, 0xE9] {
            assert_eq!(encode_char(decode_byte(byte)), byte);
        }
        assert_eq!(decode_byte(0x80), '\u{20AC}');
        assert_eq!(decode_byte(b'A'), 'A');
    }

    #[test]
    fn unencodable_characters_are_replaced() {
        assert_eq!(to_winansi("\u{4E2D}"), vec![REPLACEMENT]);
        assert_eq!(to_winansi("a\u{1F600}b\u{4E2D}"), vec![b'a', REPLACEMENT, b'b', REPLACEMENT]);
        assert_eq!(encode_char('\u{3042}'), REPLACEMENT);
    }

    #[test]
    fn controls_show_as_spaces() {
        assert_eq!(to_winansi("a\tb\u{7}\u{85}"), b"a b  ".to_vec());
        assert_eq!(encode_char('\u{7F}'), b' ');
    }
}
