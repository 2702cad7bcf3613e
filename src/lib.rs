//! # Introduction
//!
//! Scriptum PDF turns the sections of a Scriptum writing project into a single paginated
//! PDF. Sections are stored as editor markup (prose, screenplay) or as JSON records
//! (characters, beats, story bible, timeline). Built on top of pdf_writer (Typst), every
//! section starts on a new page under its upper-cased title and every page carries a
//! "Page N" footer.
//!
//! Feature Road Map:
//! - [X] Rich text: headings (H1-H3), paragraphs, ordered and bulleted lists
//! - [X] Bold, italic, underline and font size runs
//! - [X] Manual page breaks
//! - [X] Screenplay layout (scene heading, action, character, parenthetical, dialogue, transition)
//! - [X] Character, beat and bible records
//! - [X] Grouped timeline with colour bars
//! - [X] Embedded TrueType families with Base-14 fallback
//! - [X] Italian and English labels
//! - [ ] Strikethrough
//! - [ ] Text colour runs
//! - [ ] Link annotation
//! - [ ] Images
//!
//! ## Links
//! PDF Writer:
//!
//! - <https://github.com/typst/pdf-writer>
//!
//! # Basic Usage
//! The main entry point is the [`Exporter`], built from a [`SectionSource`] (usually a
//! [`ProjectDir`]), a set of [`Labels`] and an [`ExportConfig`].
//!
//! ### Export a project
//! ```ignore
//! use scriptum_pdf::{ExportConfig, ExportFormat, Exporter, Labels, Language, ProjectDir};
//!
//! let exporter = Exporter::new(
//!     ProjectDir::new("projects/Roma__sceneggiatura"),
//!     Labels::new(Language::It),
//!     ExportConfig::default(),
//! );
//!
//! // writes projects/Roma__sceneggiatura/export_Roma.pdf
//! let path = exporter
//!     .export_project(&["concept", "scene", "timeline"], ExportFormat::Pdf, None)
//!     .await?;
//! ```
//!
//! ### Export one section
//! ```ignore
//! let path = exporter.export_section("personaggi", Some("out/personaggi.pdf".as_ref())).await?;
//! ```

pub mod export;
pub mod markup;
pub mod render;
pub mod traits;
pub mod types;

pub use export::{
    sanitize_file_name, suggested_project_file_name, suggested_section_file_name, ExportFormat,
    Exporter,
};
pub use traits::{ProjectDir, SectionSource};
pub use types::{
    Error, ExportConfig, LabelOverrides, Labels, Language, PageGeometry, ProjectMeta,
    ProjectType, Result,
};
