use chrono::{DateTime, Datelike, Local, Timelike};
use pdf_writer::{Chunk, Date, Finish, Pdf, Rect, Ref, TextStr};
use tracing::debug;

use crate::{
    markup::plain_text,
    render::{records, rich_text, screenplay, timeline},
    types::{
        hex_to_rgb, FontAssets, FontFace, FontFamily, FontSet, Labels, PageGeometry, Style,
        StyledRun, TextAlignment, TextBlock, Writer,
    },
};

pub const CREATOR: &str = "Scriptum";
pub const PRODUCER: &str = "scriptum-pdf";
pub const DEFAULT_TITLE: &str = "Scriptum Export";

/// The section always drawn as screenplay.
pub const SCREENPLAY_SECTION: &str = "scene";
pub const TIMELINE_SECTION: &str = "timeline";
pub const RECORD_SECTIONS: [&str; 3] = ["personaggi", "scaletta", "bibbia"];

const SECTION_TITLE_PT: f32 = 18.0;
const MESSAGE_PT: f32 = 14.0;
const FOOTER_PT: f32 = 9.0;
const FOOTER_COLOR: u32 = 0x555555;

/// Document information dictionary entries.
#[derive(Debug, Clone)]
pub struct DocInfo {
    pub title: String,
    pub subject: String,
    pub created: DateTime<Local>,
}

impl DocInfo {
    pub fn new(title: impl Into<String>, subject: impl Into<String>) -> Self {
        DocInfo {
            title: title.into(),
            subject: subject.into(),
            created: Local::now(),
        }
    }
}

/// How the stored content of a section is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Screenplay,
    Timeline,
    Records,
    RichText,
}

impl SectionKind {
    /// Picks the renderer from the section id and the shape of its content.
    /// JSON is only recognised in the timeline and record sections.
    pub fn classify(id: &str, raw: &str) -> Self {
        if id == SCREENPLAY_SECTION {
            SectionKind::Screenplay
        } else if id == TIMELINE_SECTION && looks_like_json(raw) {
            SectionKind::Timeline
        } else if RECORD_SECTIONS.contains(&id) && looks_like_json(raw) {
            SectionKind::Records
        } else {
            SectionKind::RichText
        }
    }
}

/// Stored JSON starts with `[` or `{` after optional whitespace.
pub fn looks_like_json(raw: &str) -> bool {
    matches!(raw.trim_start().chars().next(), Some('[' | '{'))
}

/// Whether a project export leaves the section out.
///
/// The screenplay section and JSON-shaped content are always attempted;
/// anything else is skipped when it has no visible text.
pub fn is_blank_section(id: &str, raw: &str) -> bool {
    id != SCREENPLAY_SECTION && !looks_like_json(raw) && plain_text(raw).is_empty()
}

fn pdf_date(time: &DateTime<Local>) -> Date {
    let offset_minutes = time.offset().local_minus_utc() / 60;
    Date::new(u16::try_from(time.year()).unwrap_or_default())
        .month(time.month() as u8)
        .day(time.day() as u8)
        .hour(time.hour() as u8)
        .minute(time.minute() as u8)
        .second(time.second() as u8)
        .utc_offset_hour((offset_minutes / 60) as i8)
        .utc_offset_minute((offset_minutes.abs() % 60) as u8)
}

/// # Document assembler
///
/// Owns the PDF under construction and the layout `Writer`. Sections are
/// added in export order, each starting on a new page under its title;
/// `finish` numbers every page and serializes the document.
pub struct Doc {
    pdf: Pdf,
    writer: Writer,
    labels: Labels,
    page_tree_id: Ref,
    sections: usize,
}

impl Doc {
    /// Writes the information dictionary and registers the eight fonts,
    /// embedding whichever `assets` parse.
    pub fn new(labels: Labels, geometry: PageGeometry, assets: &FontAssets, info: &DocInfo) -> Self {
        let mut pdf = Pdf::new();
        let mut alloc = Ref::new(1);
        let page_tree_id = alloc.bump();
        let info_id = alloc.bump();

        let title = if info.title.trim().is_empty() {
            DEFAULT_TITLE
        } else {
            info.title.as_str()
        };
        let date = pdf_date(&info.created);
        pdf.document_info(info_id)
            .title(TextStr(title))
            .subject(TextStr(&info.subject))
            .creator(TextStr(CREATOR))
            .producer(TextStr(PRODUCER))
            .creation_date(date)
            .modified_date(date);

        let fonts = FontSet::register(&mut pdf, &mut alloc, assets);

        Doc {
            pdf,
            writer: Writer::new(geometry, alloc, fonts),
            labels,
            page_tree_id,
            sections: 0,
        }
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn page_count(&self) -> usize {
        self.writer.pages.len()
    }

    /// true once any section has been added
    pub fn wrote_anything(&self) -> bool {
        self.sections > 0
    }

    /// Starts a page with the section title and draws `raw` with the
    /// renderer its id and shape select. Malformed content draws nothing
    /// below the title.
    pub fn add_section(&mut self, id: &str, raw: &str) {
        let kind = SectionKind::classify(id, raw);
        debug!(section = id, ?kind, "rendering section");

        self.writer.new_page();
        self.section_title(id);

        match kind {
            SectionKind::Screenplay => screenplay::render_markup(&mut self.writer, raw),
            SectionKind::Timeline => timeline::render_json(&mut self.writer, raw, &self.labels),
            SectionKind::Records => {
                let text = records::format_section(id, raw, &self.labels).unwrap_or_default();
                records::render_text(&mut self.writer, &text);
            }
            SectionKind::RichText => rich_text::render_markup(&mut self.writer, raw),
        }

        self.sections += 1;
    }

    fn section_title(&mut self, id: &str) {
        let title = StyledRun {
            bold: true,
            size_pt: SECTION_TITLE_PT,
            ..StyledRun::plain(self.labels.section_label(id))
        };
        let block = TextBlock::new(FontFamily::Mono)
            .with_font_size(SECTION_TITLE_PT)
            .and_alignment(TextAlignment::Center)
            .and_width(self.writer.content_width())
            .layout(&[title], &self.writer.fonts);

        let x = self.writer.left();
        self.writer.write(&block, x);
        self.writer.move_down(0.8, SECTION_TITLE_PT);
    }

    /// Single page carrying the localized "nothing to export" sentence.
    pub fn nothing_to_export(&mut self) {
        self.writer.new_page();

        let message = StyledRun {
            size_pt: MESSAGE_PT,
            ..StyledRun::plain(self.labels.nothing_to_export.as_str())
        };
        let block = TextBlock::new(FontFamily::Mono)
            .with_font_size(MESSAGE_PT)
            .and_width(self.writer.content_width())
            .layout(&[message], &self.writer.fonts);

        let x = self.writer.left();
        self.writer.write(&block, x);
    }

    /// Centers `<page word> <n>` in the bottom margin of every page. Runs
    /// once the page count is final.
    fn number_pages(&mut self) {
        let face = FontFace::new(FontFamily::Serif, Style::Normal);
        let color = hex_to_rgb(FOOTER_COLOR);
        let left = self.writer.left();
        let width = self.writer.content_width();
        let baseline = self.writer.geometry.margin_bottom / 2.0;

        for index in 0..self.writer.pages.len() {
            let text = format!("{} {}", self.labels.page, index + 1);
            let text_width = self
                .writer
                .fonts
                .text_width(face.family, face.style, &text, FOOTER_PT);
            let x = left + (width - text_width) / 2.0;
            self.writer
                .text_at(index, &text, (x, baseline), face, FOOTER_PT, color);
        }
    }

    /// Numbers the pages and writes the page tree, the content streams and
    /// the catalog. A document with no page gets one blank page.
    pub fn finish(mut self) -> Vec<u8> {
        if self.writer.pages.is_empty() {
            self.writer.new_page();
        }
        self.number_pages();

        let Doc {
            mut pdf,
            mut writer,
            page_tree_id,
            ..
        } = self;

        let mut secondary = Chunk::new();
        let media_box = Rect::new(0.0, 0.0, writer.geometry.width, writer.geometry.height);
        let page_ids: Vec<Ref> = writer.pages.iter().map(|page| page.page_id).collect();

        for page in writer.pages.drain(..) {
            let mut pdf_page = pdf.page(page.page_id);
            pdf_page.media_box(media_box);
            pdf_page.parent(page_tree_id);
            pdf_page.contents(page.content_id);

            let mut resources = pdf_page.resources();
            let mut fonts = resources.fonts();
            for font in writer.fonts.iter() {
                fonts.pair(font.name, font.id);
            }
            fonts.finish();
            resources.finish();
            pdf_page.finish();

            secondary.stream(page.content_id, &page.content.finish());
        }

        pdf.extend(&secondary);

        pdf.pages(page_tree_id)
            .kids(page_ids.iter().copied())
            .count(page_ids.len() as i32);

        let catalog_id = writer.bump();
        pdf.catalog(catalog_id).pages(page_tree_id);

        pdf.finish()
    }
}
