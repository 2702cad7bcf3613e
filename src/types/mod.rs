mod block;
mod config;
mod doc;
pub mod encoding;
mod error;
mod font;
mod font_family;
mod font_reference;
mod font_style;
mod labels;
mod page;
mod project;
mod records;
mod styled_run;
mod text;
mod text_alignment;
mod writer;

pub use block::{Block, ListBlock, ListItem, ScreenplayKind, ScreenplayLine};
pub use config::{ExportConfig, FONTS_DIR_NAME};
pub use doc::{
    is_blank_section, looks_like_json, Doc, DocInfo, SectionKind, CREATOR, DEFAULT_TITLE,
    PRODUCER, RECORD_SECTIONS, SCREENPLAY_SECTION, TIMELINE_SECTION,
};
pub use error::{Error, Result};
pub use font::{Base14, EmbeddedMetrics};
pub use font_family::{FontFace, FontFamily};
pub use font_reference::{FontAssets, FontReference, FontSet};
pub use font_style::Style;
pub use labels::{FieldLabels, LabelOverrides, Labels, Language};
pub use page::{Page, PageGeometry};
pub use project::{ProjectMeta, ProjectType};
pub use records::{
    hex_to_rgb, number_events, parse_records, Beat, BibleSection, Character, CustomField,
    NumberedEvent, TimelineColor, TimelineEvent, TimelineGroup,
};
pub use styled_run::{runs_are_blank, runs_text, StyledRun, BASE_FONT_PT};
pub use text::{Line, TextBlock, Word};
pub use text_alignment::TextAlignment;
pub use writer::{Writer, LINE_HEIGHT};
