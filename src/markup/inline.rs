use std::{ops::Range, sync::OnceLock};

use regex::Regex;

use crate::{
    markup::scan::{br_to_newlines, decode_entities, entity_spans, tags},
    types::{StyledRun, BASE_FONT_PT},
};

/// Editor pixel size to PDF points.
const PX_TO_PT: f32 = 0.75;
const BASE_PX: f32 = 16.0;

fn re_font_size() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)\bsize\s*=\s*["']?([1-7])"#).expect("valid size pattern"))
}

/// Pixel size of a `<font size=n>` level.
pub fn font_size_px(level: u8) -> f32 {
    match level {
        2 => 14.0,
        3 => 16.0,
        4 => 18.0,
        n => BASE_PX + 2.0 * (f32::from(n) - 3.0),
    }
}

/// points, rounded to two decimals
pub fn px_to_pt(px: f32) -> f32 {
    (px * PX_TO_PT * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Format {
    bold: bool,
    italic: bool,
    underline: bool,
    size: f32,
}

impl Default for Format {
    fn default() -> Self {
        Format {
            bold: false,
            italic: false,
            underline: false,
            size: BASE_FONT_PT,
        }
    }
}

/// Turns inline markup into styled runs.
///
/// `<b>`/`<strong>`, `<i>`/`<em>` and `<u>` toggle their flag; a close tag
/// with nothing open is a no-op and anything left open ends with the input.
/// `<font size=n>` pushes a size that the matching `</font>` pops. Every
/// `<br>`, like every newline in the text, becomes its own `"\n"` run. All
/// other tags are dropped, and adjacent runs with the same format are
/// merged.
///
/// Entities are decoded over the tag-stripped text, so an entity split by
/// a tag still decodes; it takes the format of its `&`.
///
/// Never fails: with no recognised markup the result is one plain run of
/// the stripped, decoded text.
pub fn lex(html: &str) -> Vec<StyledRun> {
    let html = br_to_newlines(html);
    let mut text = String::with_capacity(html.len());
    let mut format = Format::default();
    let mut marks: Vec<(usize, Format)> = vec![(0, format)];
    let mut sizes: Vec<f32> = Vec::new();
    let mut from = 0;

    for tag in tags(&html) {
        text.push_str(&html[from..tag.start]);
        from = tag.end;

        let before = format;
        match (tag.name.as_str(), tag.closing) {
            ("b" | "strong", closing) => format.bold = !closing,
            ("i" | "em", closing) => format.italic = !closing,
            ("u", closing) => format.underline = !closing,
            ("font", false) => {
                sizes.push(format.size);
                if let Some(level) = re_font_size()
                    .captures(tag.attrs)
                    .and_then(|caps| caps.get(1))
                    .and_then(|level| level.as_str().parse::<u8>().ok())
                {
                    format.size = px_to_pt(font_size_px(level));
                }
            }
            ("font", true) => format.size = sizes.pop().unwrap_or(BASE_FONT_PT),
            _ => {}
        }
        if format != before {
            marks.push((text.len(), format));
        }
    }
    text.push_str(&html[from..]);

    let mut runs: Vec<StyledRun> = Vec::new();
    let mut pos = 0;
    for entity in entity_spans(&text) {
        push_marked(&mut runs, &text, pos..entity.start, &marks);
        let decoded = decode_entities(&text[entity.clone()]);
        push_text(&mut runs, &decoded, format_at(&marks, entity.start));
        pos = entity.end;
    }
    push_marked(&mut runs, &text, pos..text.len(), &marks);

    runs
}

/// format in effect at byte `pos` of the stripped text
fn format_at(marks: &[(usize, Format)], pos: usize) -> Format {
    marks
        .iter()
        .rev()
        .find(|(offset, _)| *offset <= pos)
        .map(|(_, format)| *format)
        .unwrap_or_default()
}

/// Pushes `text[range]`, split wherever the format changes.
fn push_marked(runs: &mut Vec<StyledRun>, text: &str, range: Range<usize>, marks: &[(usize, Format)]) {
    let mut start = range.start;
    while start < range.end {
        let end = marks
            .iter()
            .map(|(offset, _)| *offset)
            .find(|offset| *offset > start)
            .map_or(range.end, |offset| offset.min(range.end));
        push_text(runs, &text[start..end], format_at(marks, start));
        start = end;
    }
}

fn push_text(runs: &mut Vec<StyledRun>, text: &str, format: Format) {
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            runs.push(StyledRun::line_break());
        }
        if line.is_empty() {
            continue;
        }

        let run = StyledRun {
            text: line.to_string(),
            bold: format.bold,
            italic: format.italic,
            underline: format.underline,
            size_pt: format.size,
        };

        match runs.last_mut() {
            Some(last) if !last.is_line_break() && last.same_format(&run) => {
                last.text.push_str(&run.text);
            }
            _ => runs.push(run),
        }
    }
}
