use crate::types::{
    hex_to_rgb, number_events, parse_records, FontFamily, Labels, NumberedEvent, StyledRun,
    TextBlock, TimelineEvent, Writer, BASE_FONT_PT, LINE_HEIGHT,
};

const HEADER_PT: f32 = 13.0;
const HEADER_COLOR: u32 = 0x111111;
const DESC_LINE_GAP: f32 = 4.0;
const BAR_HEIGHT: f32 = 6.0;
const BAR_OFFSET: f32 = 2.0;
const BAR_LEAD_LINES: f32 = 0.5;
const RULE_COLOR: u32 = 0xE5E7EB;
const RULE_WIDTH: f32 = 0.7;
const RULE_OFFSET: f32 = 4.0;

/// Header line of an event: its number, then the upper-cased title or
/// `<label> <number>` when the event has none. Lone events are numbered
/// `n.`, grouped ones `n.m`.
pub fn event_header(numbered: &NumberedEvent, label: &str) -> String {
    let number = &numbered.number;
    let prefix = if number.contains('.') {
        number.clone()
    } else {
        format!("{number}.")
    };

    let title = numbered.event.title.trim();
    if title.is_empty() {
        format!("{prefix} {label} {number}")
    } else {
        format!("{prefix} {}", title.to_uppercase())
    }
}

/// Renders a timeline payload. Invalid JSON renders nothing.
pub fn render_json(writer: &mut Writer, raw: &str, labels: &Labels) {
    if let Some(events) = parse_records::<TimelineEvent>("timeline", raw) {
        render(writer, events, labels);
    }
}

/// Draws the chronology group by group, with a colour bar above coloured
/// events and a thin rule after each group.
pub fn render(writer: &mut Writer, events: Vec<TimelineEvent>, labels: &Labels) {
    let label = labels.fields.timeline_event.as_str();
    let x = writer.left();
    let width = writer.content_width();

    for group in number_events(events) {
        for numbered in &group.events {
            if let Some(color) = numbered.event.color_id {
                // the bar stays on the page of its header's first line
                let lead = BAR_LEAD_LINES * BASE_FONT_PT * LINE_HEIGHT;
                writer.ensure_room((lead + HEADER_PT * LINE_HEIGHT).max(BAR_OFFSET + BAR_HEIGHT));
                writer.fill_rect(x, BAR_OFFSET, width, BAR_HEIGHT, color.rgb());
                writer.move_down(BAR_LEAD_LINES, BASE_FONT_PT);
            }

            let header = StyledRun {
                bold: true,
                size_pt: HEADER_PT,
                ..StyledRun::plain(event_header(numbered, label))
            };
            let block = TextBlock::new(FontFamily::Mono)
                .with_font_size(HEADER_PT)
                .and_width(width)
                .and_color(hex_to_rgb(HEADER_COLOR))
                .layout(&[header], &writer.fonts);
            writer.write(&block, x);

            let desc = numbered.event.desc.trim();
            if !desc.is_empty() {
                let block = TextBlock::new(FontFamily::Mono)
                    .and_width(width)
                    .and_line_gap(DESC_LINE_GAP)
                    .layout(&[StyledRun::plain(desc)], &writer.fonts);
                writer.write(&block, x);
            }

            writer.move_down(0.5, BASE_FONT_PT);
        }

        writer.ensure_room(RULE_OFFSET);
        writer.rule(x, x + width, RULE_OFFSET, RULE_WIDTH, hex_to_rgb(RULE_COLOR));
        writer.move_down(0.6, BASE_FONT_PT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FontAssets, FontSet, Language, PageGeometry};
    use pdf_writer::{Pdf, Ref};

    fn writer() -> Writer {
        let mut pdf = Pdf::new();
        let mut alloc = Ref::new(1);
        let fonts = FontSet::register(&mut pdf, &mut alloc, &FontAssets::none());
        let mut writer = Writer::new(PageGeometry::default(), alloc, fonts);
        writer.new_page();
        writer
    }

    #[test]
    fn headers_follow_group_numbering() {
        let raw = r#"[
            {"title": "alba", "ordering": 0, "stackPos": 0},
            {"title": "", "ordering": 10, "stackPos": 1},
            {"title": "mezzogiorno", "ordering": 10, "stackPos": 0}
        ]"#;
        let events: Vec<TimelineEvent> = parse_records("timeline", raw).unwrap();
        let headers: Vec<String> = number_events(events)
            .iter()
            .flat_map(|group| group.events.iter())
            .map(|numbered| event_header(numbered, "Evento"))
            .collect();

        assert_eq!(headers, vec!["1. ALBA", "2.1 MEZZOGIORNO", "2.2 Evento 2.2"]);
    }

    #[test]
    fn draws_bars_headers_and_rules() {
        let mut writer = writer();
        let labels = Labels::new(Language::En);
        render_json(
            &mut writer,
            r#"[{"title": "launch", "desc": "T-0", "ordering": 1, "colorId": "red"}, {"ordering": 2}]"#,
            &labels,
        );

        let page = writer.pages.pop().unwrap();
        let stream = String::from_utf8_lossy(&page.content.finish()).into_owned();
        assert!(stream.contains("(1. LAUNCH) Tj"));
        assert!(stream.contains("(T-0) Tj"));
        assert!(stream.contains("(2. Event 2) Tj"));
        assert!(stream.contains("/Mono-Bold 13 Tf"));
        assert_eq!(stream.matches(" re").count(), 1);
        assert_eq!(stream.matches("\nS\n").count(), 2);
    }

    #[test]
    fn colour_bar_moves_to_the_next_page_with_its_header() {
        let mut writer = writer();
        // room for the bar alone, not for the header below it
        writer.y = writer.geometry.bottom() + BAR_OFFSET + BAR_HEIGHT + 2.0;
        render_json(
            &mut writer,
            r#"[{"title": "tramonto", "ordering": 1, "colorId": "blue"}]"#,
            &Labels::default(),
        );

        assert_eq!(writer.pages.len(), 2);
        let last = writer.pages.pop().unwrap();
        let first = writer.pages.pop().unwrap();
        let first = String::from_utf8_lossy(&first.content.finish()).into_owned();
        let last = String::from_utf8_lossy(&last.content.finish()).into_owned();
        assert!(!first.contains(" re"));
        assert!(last.contains(" re"));
        assert!(last.contains("(1. TRAMONTO) Tj"));
    }

    #[test]
    fn invalid_payload_draws_nothing() {
        let mut writer = writer();
        let top = writer.y;
        render_json(&mut writer, "[{", &Labels::default());
        assert_eq!(writer.y, top);
    }
}
