//! Async export entry points: a whole project, or one section, to a PDF
//! file.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono::NaiveDateTime;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::{
    traits::SectionSource,
    types::{
        is_blank_section, Doc, DocInfo, Error, ExportConfig, FontAssets, Labels, ProjectMeta,
        Result, DEFAULT_TITLE,
    },
};

const PROJECT_SUBJECT: &str = "Scriptum Export";
const SECTION_SUBJECT: &str = "Scriptum Export (Section)";
const STAMP_FORMAT: &str = "%Y-%m-%d %H.%M";

/// Output formats the exporter can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Renders the sections of one project.
///
/// Holds no state between calls: every export reads its sections afresh
/// and builds its own document, labels and fonts.
pub struct Exporter<S> {
    source: S,
    labels: Labels,
    config: ExportConfig,
}

impl<S: SectionSource> Exporter<S> {
    pub fn new(source: S, labels: Labels, config: ExportConfig) -> Self {
        Exporter {
            source,
            labels,
            config,
        }
    }

    /// Exporter with the default labels of `config.language`.
    pub fn from_config(source: S, config: ExportConfig) -> Self {
        let labels = Labels::new(config.language);
        Exporter::new(source, labels, config)
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Exports `sections` in the given order into one file and returns its
    /// path.
    ///
    /// Sections missing from the source, and text sections with nothing
    /// visible, are left out. When nothing remains the document holds a
    /// single "nothing to export" page. Without `output` the file is
    /// `export_<project>.pdf` in the source's export directory.
    pub async fn export_project<I>(
        &self,
        sections: &[I],
        format: ExportFormat,
        output: Option<&Path>,
    ) -> Result<PathBuf>
    where
        I: AsRef<str> + Sync,
    {
        let meta = self.source.meta().await?;
        let labels = self.labels_for(&meta);
        let file_name = format!(
            "export_{}.{}",
            sanitize_file_name(&meta.name),
            format.extension()
        );
        let out = self.output_path(output, &file_name)?;

        info!(
            project = %meta.name,
            sections = sections.len(),
            output = %out.display(),
            "exporting project"
        );
        ensure_parent_dir(&out).await?;

        let assets = FontAssets::discover(&self.config.resolve_fonts_dir()).await;
        let mut doc = Doc::new(
            labels,
            self.config.page,
            &assets,
            &DocInfo::new(meta.name.as_str(), PROJECT_SUBJECT),
        );

        for id in sections {
            let id = id.as_ref();
            let Some(raw) = self.source.section(id).await? else {
                debug!(section = id, "section not on disk, skipping");
                continue;
            };
            if is_blank_section(id, &raw) {
                debug!(section = id, "section has no visible text, skipping");
                continue;
            }
            doc.add_section(id, &raw);
        }

        if !doc.wrote_anything() {
            debug!("no section produced output");
            doc.nothing_to_export();
        }

        let pages = doc.page_count();
        write_output(&out, &doc.finish()).await?;

        info!(pages, output = %out.display(), "project export written");
        Ok(out)
    }

    /// Exports one section into its own file and returns its path.
    ///
    /// Fails with [`Error::SectionNotFound`] before touching the file system
    /// when the section does not exist. Without `output` the file is
    /// `<section>_export.pdf` in the source's export directory.
    pub async fn export_section(&self, id: &str, output: Option<&Path>) -> Result<PathBuf> {
        let meta = self.source.meta().await?;
        let labels = self.labels_for(&meta);
        let raw = self
            .source
            .section(id)
            .await?
            .ok_or_else(|| Error::SectionNotFound(id.to_string()))?;

        let file_name = format!("{}_export.{}", sanitize_file_name(id), ExportFormat::Pdf.extension());
        let out = self.output_path(output, &file_name)?;

        info!(project = %meta.name, section = id, output = %out.display(), "exporting section");
        ensure_parent_dir(&out).await?;

        let title = if meta.name.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            format!("{} \u{2014} {}", meta.name, labels.section_label(id))
        };
        let assets = FontAssets::discover(&self.config.resolve_fonts_dir()).await;
        let mut doc = Doc::new(
            labels,
            self.config.page,
            &assets,
            &DocInfo::new(title, SECTION_SUBJECT),
        );
        doc.add_section(id, &raw);

        let pages = doc.page_count();
        write_output(&out, &doc.finish()).await?;

        info!(pages, output = %out.display(), "section export written");
        Ok(out)
    }

    /// Caller labels, plus the project type overrides when the caller did
    /// not choose a type.
    fn labels_for(&self, meta: &ProjectMeta) -> Labels {
        let mut labels = self.labels.clone();
        if labels.project_type.is_none() {
            if let Some(project_type) = meta.project_type {
                labels.apply_project_type(project_type);
            }
        }
        labels
    }

    fn output_path(&self, output: Option<&Path>, file_name: &str) -> Result<PathBuf> {
        match output {
            Some(path) => Ok(path.to_path_buf()),
            None => self
                .source
                .default_export_dir()
                .map(|dir| dir.join(file_name))
                .ok_or(Error::MissingOutputPath),
        }
    }
}

async fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    Ok(())
}

/// Streams the finished document to its final path.
async fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = tokio::fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await?;
    Ok(())
}

/// File name offered in a save dialog for a project export:
/// `<project> — Export YYYY-MM-DD HH.MM.pdf`.
pub fn suggested_project_file_name(project: &str, now: NaiveDateTime) -> String {
    sanitize_file_name(&format!(
        "{project} \u{2014} Export {}.pdf",
        now.format(STAMP_FORMAT)
    ))
}

/// `<project> — <section label> — YYYY-MM-DD HH.MM.pdf`
pub fn suggested_section_file_name(project: &str, label: &str, now: NaiveDateTime) -> String {
    sanitize_file_name(&format!(
        "{project} \u{2014} {label} \u{2014} {}.pdf",
        now.format(STAMP_FORMAT)
    ))
}

/// Removes characters file systems reject, collapses whitespace and trims
/// trailing dots and spaces.
pub fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|ch| !matches!(ch, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .filter(|ch| !ch.is_control())
        .collect();

    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed.trim_end_matches(['.', ' ']);

    if trimmed.is_empty() {
        "export".to_string()
    } else {
        trimmed.to_string()
    }
}
