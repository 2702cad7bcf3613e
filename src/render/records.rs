//! Plain-text rendering of character, outline and bible records.

use crate::types::{
    parse_records, Beat, BibleSection, Character, CustomField, FontFamily, Labels, StyledRun,
    TextBlock, Writer, BASE_FONT_PT,
};

/// Extra space between lines of record text.
pub const RECORD_LINE_GAP: f32 = 4.0;

/// Text of a record section, or `None` when `section` is not a record
/// section. Unparsable payloads and empty arrays give an empty string.
pub fn format_section(section: &str, raw: &str, labels: &Labels) -> Option<String> {
    let text = match section {
        "personaggi" => parse_records::<Character>(section, raw)
            .map(|records| format_characters(&records, labels)),
        "scaletta" => parse_records::<Beat>(section, raw).map(|records| format_beats(&records, labels)),
        "bibbia" => {
            parse_records::<BibleSection>(section, raw).map(|records| format_bible(&records, labels))
        }
        _ => return None,
    };
    Some(text.unwrap_or_default())
}

/// Accumulates labelled lines, skipping absent values.
struct Lines(Vec<String>);

impl Lines {
    fn header(&mut self, label: &str, number: usize) {
        self.0.push(format!("\n=== {label} {number} ==="));
    }

    /// `Label: value`
    fn short(&mut self, label: &str, value: &str) {
        if !value.is_empty() {
            self.0.push(format!("{label}: {value}"));
        }
    }

    /// `Label:` with the value on the following lines
    fn long(&mut self, label: &str, value: &str) {
        if !value.is_empty() {
            self.0.push(format!("{label}:\n{value}"));
        }
    }

    fn custom(&mut self, fields: &[CustomField], default_title: &str, trim_value: bool) {
        for field in fields {
            let title: &str = if field.title.is_empty() {
                default_title
            } else {
                &field.title
            };
            let value: &str = if trim_value {
                field.value.trim()
            } else {
                &field.value
            };
            if !value.trim().is_empty() {
                self.0.push(format!("{}:\n{value}", title.to_uppercase()));
            }
        }
    }

    fn finish(self) -> String {
        self.0.join("\n")
    }
}

/// Character sheets in array order; values are printed as stored.
pub fn format_characters(characters: &[Character], labels: &Labels) -> String {
    let f = &labels.fields;
    let mut lines = Lines(Vec::new());

    for (index, character) in characters.iter().enumerate() {
        lines.header(&f.character_header, index + 1);
        lines.short(&f.name, &character.name);
        lines.short(&f.role, &character.role);
        lines.short(&f.age_appearance, &character.age_appearance);
        lines.long(&f.background, &character.background);
        lines.long(&f.goal, &character.goal);
        lines.long(&f.conflict, &character.conflict);
        lines.long(&f.arc, &character.arc);
        lines.long(&f.relationships, &character.relationships);
        lines.long(&f.traits, &character.traits);
        lines.short(&f.quote, &character.quote);
        lines.long(&f.notes, &character.notes);
        lines.custom(&character.custom_fields, &f.custom, false);
    }

    lines.finish()
}

/// Outline beats in array order; values are trimmed.
pub fn format_beats(beats: &[Beat], labels: &Labels) -> String {
    let f = &labels.fields;
    let mut lines = Lines(Vec::new());

    for (index, beat) in beats.iter().enumerate() {
        lines.header(&f.beat_header, index + 1);
        lines.short(&f.title, beat.title.trim());
        lines.short(&f.container, beat.container.trim());
        lines.long(&f.summary, beat.summary.trim());
        lines.short(&f.objective, beat.objective.trim());
        lines.short(&f.obstacle, beat.obstacle.trim());
        lines.short(&f.outcome, beat.outcome.trim());
        lines.short(&f.time_place, beat.time_place.trim());
        lines.short(&f.characters, beat.characters.trim());
        lines.short(&f.links, beat.links.trim());
        lines.custom(&beat.custom_fields, &f.custom, true);
    }

    lines.finish()
}

/// Bible sections in array order. Canonical section titles are shown in
/// the export language; a section with content but no title is headed with
/// the generic section label.
pub fn format_bible(sections: &[BibleSection], labels: &Labels) -> String {
    let mut lines = Vec::new();

    for section in sections {
        let title = section.title.trim();
        let content = section.content.trim();
        if title.is_empty() && content.is_empty() {
            continue;
        }

        let heading = if title.is_empty() {
            labels.fields.section.clone()
        } else {
            labels.bible_title(title)
        };
        lines.push(format!("\n=== {} ===", heading.to_uppercase()));
        if !content.is_empty() {
            lines.push(content.to_string());
        }
    }

    lines.join("\n")
}

/// Writes formatted record text across the content width.
pub fn render_text(writer: &mut Writer, text: &str) {
    if text.trim().is_empty() {
        return;
    }

    let block = TextBlock::new(FontFamily::Mono)
        .with_font_size(BASE_FONT_PT)
        .and_width(writer.content_width())
        .and_line_gap(RECORD_LINE_GAP)
        .layout(&[StyledRun::plain(text)], &writer.fonts);

    let x = writer.left();
    writer.write(&block, x);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Language;

    #[test]
    fn character_with_only_a_name() {
        let labels = Labels::new(Language::En);
        let text = format_section("personaggi", r#"[{"name": "Ada"}]"#, &labels).unwrap();
        assert_eq!(text, "\n=== Character 1 ===\nName: Ada");
    }

    #[test]
    fn long_fields_and_custom_fields() {
        let labels = Labels::new(Language::It);
        let raw = r#"[{
            "name": "Bea",
            "goal": "Fuggire",
            "quote": "Mai.",
            "customFields": [
                {"title": "Paura", "value": "il buio"},
                {"title": "", "value": "senza titolo"},
                {"title": "Vuoto", "value": "   "}
            ]
        }]"#;
        let text = format_section("personaggi", raw, &labels).unwrap();
        assert_eq!(
            text,
            "\n=== Personaggio 1 ===\nNome: Bea\nObiettivo:\nFuggire\nCitazione: Mai.\n\
             PAURA:\nil buio\nCAMPO PERSONALIZZATO:\nsenza titolo"
        );
    }

    #[test]
    fn beats_are_numbered_and_trimmed() {
        let labels = Labels::new(Language::En);
        let raw = r#"[{"title": " Opening ", "summary": "Rain.", "links": ""}, {}]"#;
        let text = format_section("scaletta", raw, &labels).unwrap();
        assert_eq!(
            text,
            "\n=== Beat 1 ===\nTitle: Opening\nSummary:\nRain.\n\n=== Beat 2 ==="
        );
    }

    #[test]
    fn bible_titles_are_localized() {
        let labels = Labels::new(Language::En);
        let raw = r#"[
            {"title": "TEMI", "content": "Perdono"},
            {"title": "", "content": ""},
            {"title": "", "content": "orfano"},
            {"title": "Ricette", "content": ""}
        ]"#;
        let text = format_section("bibbia", raw, &labels).unwrap();
        assert_eq!(
            text,
            "\n=== THEMES ===\nPerdono\n\n=== SECTION ===\norfano\n\n=== RICETTE ==="
        );
    }

    #[test]
    fn malformed_or_foreign_sections() {
        let labels = Labels::default();
        assert_eq!(format_section("personaggi", "[{oops", &labels), Some(String::new()));
        assert_eq!(format_section("scaletta", "[]", &labels), Some(String::new()));
        assert_eq!(format_section("note", "[]", &labels), None);
    }
}
