use pdf_writer::{Content, Ref, Str};

use crate::types::{
    encoding::to_winansi, FontFace, FontSet, Page, PageGeometry, TextBlock,
};

/// Line advance as a multiple of the font size.
pub const LINE_HEIGHT: f32 = 1.2;

/// Distance from the top of a line box to its baseline, in font sizes.
const ASCENT: f32 = 0.8;

const BLACK: [f32; 3] = [0.0, 0.0, 0.0];

/// the rendering engine
/// contains
/// - page references and their content streams
/// - ref allocator
/// - the registered fonts
/// - page geometry and the vertical write head
pub struct Writer {
    pub y: f32,
    pub alloc: Ref,
    pub pages: Vec<Page>,
    pub geometry: PageGeometry,
    pub fonts: FontSet,
}

impl Writer {
    /// Starts without pages; the first write or `new_page` call opens one.
    pub fn new(geometry: PageGeometry, alloc: Ref, fonts: FontSet) -> Self {
        Writer {
            y: geometry.top(),
            alloc,
            pages: Vec::new(),
            geometry,
            fonts,
        }
    }

    /// get a new reference for indirect object
    pub fn bump(&mut self) -> Ref {
        self.alloc.bump()
    }

    /// left edge of the content area
    pub fn left(&self) -> f32 {
        self.geometry.margin_left
    }

    pub fn content_width(&self) -> f32 {
        self.geometry.content_width()
    }

    /// opens a fresh page and moves the write head to its top margin
    pub fn new_page(&mut self) {
        let page_id = self.bump();
        let content_id = self.bump();

        self.pages.push(Page {
            page_id,
            content_id,
            content: Content::new(),
        });
        self.y = self.geometry.top();
    }

    /// scrolls the writer down the page
    pub fn feed(&mut self, num: f32) {
        self.y -= num;
    }

    /// moves down `lines` lines of text at `font_size`
    pub fn move_down(&mut self, lines: f32, font_size: f32) {
        self.feed(lines * font_size * LINE_HEIGHT);
    }

    /// starts a new page unless `height` still fits above the bottom margin
    pub fn ensure_room(&mut self, height: f32) {
        let at_top = self.y >= self.geometry.top();
        if self.pages.is_empty() || (self.y - height < self.geometry.bottom() && !at_top) {
            self.new_page();
        }
    }

    fn content(&mut self) -> &mut Content {
        if self.pages.is_empty() {
            self.new_page();
        }
        let index = self.pages.len() - 1;
        &mut self.pages[index].content
    }

    /// does the heavy lifting of rendering a laid out `TextBlock` at `x`,
    /// breaking to a new page whenever the next line would cross the bottom margin
    pub fn write(&mut self, block: &TextBlock, x: f32) {
        let family = block.font_family;
        let color = block.color.unwrap_or(BLACK);

        for line in &block.lines {
            let advance = line.height * LINE_HEIGHT;
            self.ensure_room(advance);

            if line.body.is_empty() {
                self.feed(advance + block.line_gap);
                continue;
            }

            let baseline = self.y - line.height * ASCENT;
            let start = x + line.offset;
            let mut underlines = Vec::new();

            let fonts = &self.fonts;
            let index = self.pages.len() - 1;
            let content = &mut self.pages[index].content;

            content.set_fill_rgb(color[0], color[1], color[2]);
            content.begin_text();
            for word in &line.body {
                debug_assert!(!word.text.is_empty());

                let font = fonts.get(family, word.style);
                content.set_font(font.name, word.size);
                content.set_text_matrix([1.0, 0.0, 0.0, 1.0, start + word.x, baseline]);
                content.show(Str(&to_winansi(&word.text)));

                if word.underline {
                    underlines.push((start + word.x, start + word.x + word.width, word.size));
                }
            }
            content.end_text();

            if !underlines.is_empty() {
                content.set_stroke_rgb(color[0], color[1], color[2]);
                for (from, to, size) in underlines {
                    let under = baseline - size * 0.1;
                    content.set_line_width(size * 0.05);
                    content.move_to(from, under);
                    content.line_to(to, under);
                    content.stroke();
                }
            }

            if color != BLACK {
                content.set_fill_rgb(0.0, 0.0, 0.0);
                content.set_stroke_rgb(0.0, 0.0, 0.0);
            }

            self.feed(advance + block.line_gap);
        }
    }

    /// filled rectangle whose top edge sits `top` points below the write head
    pub fn fill_rect(&mut self, x: f32, top: f32, width: f32, height: f32, color: [f32; 3]) {
        let y = self.y - top - height;
        let content = self.content();
        content.set_fill_rgb(color[0], color[1], color[2]);
        content.rect(x, y, width, height);
        content.fill_nonzero();
        content.set_fill_rgb(0.0, 0.0, 0.0);
    }

    /// horizontal rule `below` points under the write head
    pub fn rule(&mut self, from: f32, to: f32, below: f32, line_width: f32, color: [f32; 3]) {
        let y = self.y - below;
        let content = self.content();
        content.set_stroke_rgb(color[0], color[1], color[2]);
        content.set_line_width(line_width);
        content.move_to(from, y);
        content.line_to(to, y);
        content.stroke();
        content.set_stroke_rgb(0.0, 0.0, 0.0);
    }

    /// Draws a single string at an absolute position on page `page_index`
    /// without moving the write head. Used for the page number footer.
    pub fn text_at(
        &mut self,
        page_index: usize,
        text: &str,
        (x, baseline): (f32, f32),
        face: FontFace,
        size: f32,
        color: [f32; 3],
    ) {
        let name = self.fonts.get(face.family, face.style).name;
        if let Some(page) = self.pages.get_mut(page_index) {
            let content = &mut page.content;
            content.set_fill_rgb(color[0], color[1], color[2]);
            content.begin_text();
            content.set_font(name, size);
            content.set_text_matrix([1.0, 0.0, 0.0, 1.0, x, baseline]);
            content.show(Str(&to_winansi(text)));
            content.end_text();
            content.set_fill_rgb(0.0, 0.0, 0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FontAssets, FontFamily, StyledRun};
    use pdf_writer::Pdf;

    fn writer() -> Writer {
        let mut pdf = Pdf::new();
        let mut alloc = Ref::new(1);
        let fonts = FontSet::register(&mut pdf, &mut alloc, &FontAssets::none());
        Writer::new(PageGeometry::default(), alloc, fonts)
    }

    #[test]
    fn long_blocks_flow_onto_new_pages() {
        let mut writer = writer();
        let runs: Vec<StyledRun> = (0..120)
            .flat_map(|_| [StyledRun::plain("line"), StyledRun::line_break()])
            .collect();
        let block = TextBlock::new(FontFamily::Mono)
            .and_width(writer.content_width())
            .layout(&runs, &writer.fonts);

        let x = writer.left();
        writer.write(&block, x);

        // 841.5 - 108 = 733.5pt per page, 14.4pt per line: 50 lines a page
        assert_eq!(writer.pages.len(), 3);
        assert!(writer.y < writer.geometry.top());
        assert!(writer.y >= writer.geometry.bottom());
    }

    #[test]
    fn text_is_written_as_winansi_strings() {
        let mut writer = writer();
        let block = TextBlock::new(FontFamily::Mono)
            .and_width(writer.content_width())
            .layout(&[StyledRun::plain("DRAFT")], &writer.fonts);
        writer.write(&block, 66.0);

        let page = writer.pages.pop().unwrap();
        let bytes = page.content.finish();
        let stream = String::from_utf8_lossy(&bytes);
        assert!(stream.contains("(DRAFT) Tj"));
        assert!(stream.contains("/Mono 12 Tf"));
    }
}
