use crate::{
    markup::{inline::px_to_pt, normalize, segment, split_pages, Mode},
    render::screenplay,
    types::{
        Block, FontFamily, ListBlock, Style, StyledRun, TextBlock, Word, Writer, BASE_FONT_PT,
    },
};

/// Indentation added per list nesting level.
const LIST_INDENT: f32 = 28.0;

/// Space between a list marker and the item text.
const MARKER_GAP: f32 = 6.0;

const BULLET: &str = "\u{2022}";

/// Prose family.
const FAMILY: FontFamily = FontFamily::Serif;

/// heading point size for h1..h3 (32, 24 and 18 editor pixels)
pub fn heading_size(level: u8) -> f32 {
    match level {
        1 => px_to_pt(32.0),
        2 => px_to_pt(24.0),
        _ => px_to_pt(18.0),
    }
}

/// Marker drawn before the item at zero-based `index`.
pub fn list_marker(ordered: bool, index: usize) -> String {
    if ordered {
        format!("{}.", index + 1)
    } else {
        BULLET.to_string()
    }
}

/// Renders stored rich markup. Content already split into `page-content`
/// segments starts a new page for every segment after the first.
pub fn render_markup(writer: &mut Writer, raw: &str) {
    for (index, page) in split_pages(raw).into_iter().enumerate() {
        if index > 0 {
            writer.new_page();
        }
        let blocks = segment(&normalize(page), Mode::Rich);
        render(writer, &blocks);
    }
}

pub fn render(writer: &mut Writer, blocks: &[Block]) {
    for block in blocks {
        match block {
            Block::Heading { level, runs } => heading(writer, *level, runs),
            Block::List(list) => {
                render_list(writer, list, 0);
                writer.move_down(0.4, BASE_FONT_PT);
            }
            Block::Paragraph(runs) => paragraph(writer, runs),
            Block::Screenplay(line) => screenplay::render_line(writer, line),
        }
    }
}

fn heading(writer: &mut Writer, level: u8, runs: &[StyledRun]) {
    let size = heading_size(level);
    let runs: Vec<StyledRun> = runs
        .iter()
        .map(|run| StyledRun {
            bold: true,
            size_pt: size,
            ..run.clone()
        })
        .collect();

    let block = TextBlock::new(FAMILY)
        .with_font_size(size)
        .and_width(writer.content_width())
        .layout(&runs, &writer.fonts);

    let x = writer.left();
    writer.write(&block, x);
    writer.move_down(0.8, size);
}

fn paragraph(writer: &mut Writer, runs: &[StyledRun]) {
    let block = TextBlock::new(FAMILY)
        .and_width(writer.content_width())
        .layout(runs, &writer.fonts);

    let x = writer.left();
    writer.write(&block, x);
    writer.move_down(0.6, BASE_FONT_PT);
}

/// Draws each item with its marker hanging left of the text, then the
/// item's sublists one indentation step further in.
fn render_list(writer: &mut Writer, list: &ListBlock, depth: usize) {
    let left = writer.left();
    let right = left + writer.content_width();
    let x_start = left + LIST_INDENT * depth as f32;

    for (index, item) in list.items.iter().enumerate() {
        let marker = list_marker(list.ordered, index);
        let marker_width = writer
            .fonts
            .text_width(FAMILY, Style::Bold, &format!("{marker} "), BASE_FONT_PT)
            + MARKER_GAP;
        let x_text = x_start + marker_width;

        let marker = Word {
            width: writer.fonts.text_width(FAMILY, Style::Bold, &marker, BASE_FONT_PT),
            text: marker,
            style: Style::Bold,
            underline: false,
            size: BASE_FONT_PT,
            x: -marker_width,
        };

        let block = TextBlock::new(FAMILY)
            .and_width((right - x_text).max(marker_width))
            .layout(&item.runs, &writer.fonts)
            .with_marker(marker);

        writer.write(&block, x_text);
        writer.move_down(0.25, BASE_FONT_PT);

        for sublist in &item.sublists {
            render_list(writer, sublist, depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FontAssets, FontSet, PageGeometry};
    use pdf_writer::{Pdf, Ref};

    fn writer() -> Writer {
        let mut pdf = Pdf::new();
        let mut alloc = Ref::new(1);
        let fonts = FontSet::register(&mut pdf, &mut alloc, &FontAssets::none());
        let mut writer = Writer::new(PageGeometry::default(), alloc, fonts);
        writer.new_page();
        writer
    }

    fn streams(writer: Writer) -> Vec<String> {
        writer
            .pages
            .into_iter()
            .map(|page| String::from_utf8_lossy(&page.content.finish()).into_owned())
            .collect()
    }

    #[test]
    fn heading_sizes() {
        assert_eq!(heading_size(1), 24.0);
        assert_eq!(heading_size(2), 18.0);
        assert_eq!(heading_size(3), 13.5);
    }

    #[test]
    fn ordered_markers_follow_item_positions() {
        let mut writer = writer();
        render_markup(&mut writer, "<ol><li>uno</li><li>due</li><li>tre</li></ol>");

        let stream = &streams(writer)[0];
        let positions: Vec<usize> = ["(1.) Tj", "(2.) Tj", "(3.) Tj"]
            .iter()
            .map(|marker| stream.find(marker).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(stream.contains("(due) Tj"));
        assert!(stream.contains("/Serif-Bold 12 Tf"));
    }

    #[test]
    fn bullets_and_mixed_styles_in_items() {
        let mut writer = writer();
        render_markup(&mut writer, "<ul><li>a <b>forte</b> <i>lieve</i></li></ul>");

        let stream = &streams(writer)[0];
        // WinAnsi 0x95; non-ASCII strings are written in hex
        assert!(stream.to_ascii_uppercase().contains("<95> TJ"));
        assert!(stream.contains("(forte) Tj"));
        assert!(stream.contains("/Serif-Italic 12 Tf"));
    }

    #[test]
    fn page_segments_start_new_pages() {
        let mut writer = writer();
        render_markup(
            &mut writer,
            r#"<div class="page-content"><p>prima</p></div><div class="page-content"><h2>seconda</h2></div>"#,
        );

        let streams = streams(writer);
        assert_eq!(streams.len(), 2);
        assert!(streams[0].contains("(prima) Tj"));
        assert!(streams[1].contains("(seconda) Tj"));
        assert!(streams[1].contains("/Serif-Bold 18 Tf"));
    }

    #[test]
    fn paragraphs_advance_the_write_head() {
        let mut writer = writer();
        let top = writer.y;
        render(&mut writer, &[Block::Paragraph(vec![StyledRun::plain("riga")])]);
        assert!((top - writer.y - (14.4 + 0.6 * 14.4)).abs() < 0.01);
    }
}
