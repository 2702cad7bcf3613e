use std::path::PathBuf;

use serde::Deserialize;

use crate::types::{Language, PageGeometry};

/// Name of the directory holding the bundled font files.
pub const FONTS_DIR_NAME: &str = "fonts";

/// Settings of one exporter, fixed once the `Exporter` is built.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// directory with the eight bundled TrueType files
    pub fonts_dir: Option<PathBuf>,
    /// language of the labels built by `Exporter::from_config`; an
    /// `Exporter` given explicit labels ignores it
    pub language: Language,
    pub page: PageGeometry,
}

impl ExportConfig {
    /// The configured fonts directory, else `fonts/` next to the running
    /// executable, else `./fonts`.
    pub fn resolve_fonts_dir(&self) -> PathBuf {
        if let Some(dir) = &self.fonts_dir {
            return dir.clone();
        }

        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(FONTS_DIR_NAME)))
            .filter(|dir| dir.is_dir())
            .unwrap_or_else(|| PathBuf::from(FONTS_DIR_NAME))
    }
}
