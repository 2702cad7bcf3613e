use std::{
    collections::HashMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tracing::debug;

use crate::types::{ProjectMeta, Result};

const TYPE_FILE_NAME: &str = "project.type";

/// Read access to the stored sections of one project.
///
/// The exporter never writes through this trait; it only asks for the raw
/// text of each section and for display metadata.
#[async_trait]
pub trait SectionSource: Send + Sync {
    /// Raw stored content of `id`, or `None` when the section does not exist.
    async fn section(&self, id: &str) -> Result<Option<String>>;

    async fn meta(&self) -> Result<ProjectMeta>;

    /// Directory receiving exports when the caller gives no output path.
    fn default_export_dir(&self) -> Option<PathBuf> {
        None
    }
}

/// A project folder on disk: one `<id>.txt` file per section.
#[derive(Debug, Clone)]
pub struct ProjectDir {
    root: PathBuf,
}

impl ProjectDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ProjectDir { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_valid_id(id: &str) -> bool {
        !id.is_empty()
            && id
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
    }

    async fn read_optional(path: &Path) -> Result<Option<String>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl SectionSource for ProjectDir {
    async fn section(&self, id: &str) -> Result<Option<String>> {
        if !ProjectDir::is_valid_id(id) {
            debug!(section = id, "rejecting section id outside [A-Za-z0-9_-]");
            return Ok(None);
        }

        let content = ProjectDir::read_optional(&self.root.join(format!("{id}.txt"))).await?;

        // projects created before the outline was renamed
        if content.is_none() && id == "scaletta" {
            return ProjectDir::read_optional(&self.root.join("struttura.txt")).await;
        }

        Ok(content)
    }

    async fn meta(&self) -> Result<ProjectMeta> {
        let folder_id = self
            .root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut meta = ProjectMeta::from_folder_id(&folder_id);

        if meta.project_type.is_none() {
            if let Some(raw) = ProjectDir::read_optional(&self.root.join(TYPE_FILE_NAME)).await? {
                meta.project_type = raw.parse().ok();
            }
        }

        Ok(meta)
    }

    fn default_export_dir(&self) -> Option<PathBuf> {
        Some(self.root.clone())
    }
}

/// In-memory sections keyed by id; the project is named "Scriptum".
#[async_trait]
impl SectionSource for HashMap<String, String> {
    async fn section(&self, id: &str) -> Result<Option<String>> {
        Ok(self.get(id).cloned())
    }

    async fn meta(&self) -> Result<ProjectMeta> {
        Ok(ProjectMeta {
            name: "Scriptum".to_string(),
            project_type: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProjectType;

    #[tokio::test]
    async fn reads_sections_and_reports_missing_ones() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("Roma__teatro");
        tokio::fs::create_dir_all(&root).await.unwrap();
        tokio::fs::write(root.join("note.txt"), "appunti").await.unwrap();

        let source = ProjectDir::new(&root);
        assert_eq!(source.section("note").await.unwrap().as_deref(), Some("appunti"));
        assert_eq!(source.section("concept").await.unwrap(), None);
        assert_eq!(source.section("../note").await.unwrap(), None);

        let meta = source.meta().await.unwrap();
        assert_eq!(meta.name, "Roma");
        assert_eq!(meta.project_type, Some(ProjectType::Teatro));
        assert_eq!(source.default_export_dir(), Some(root));
    }

    #[tokio::test]
    async fn legacy_layout_uses_type_file_and_old_outline_name() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("Vecchio");
        tokio::fs::create_dir_all(&root).await.unwrap();
        tokio::fs::write(root.join(TYPE_FILE_NAME), "libro\n").await.unwrap();
        tokio::fs::write(root.join("struttura.txt"), "[]").await.unwrap();

        let source = ProjectDir::new(&root);
        assert_eq!(source.section("scaletta").await.unwrap().as_deref(), Some("[]"));

        let meta = source.meta().await.unwrap();
        assert_eq!(meta.name, "Vecchio");
        assert_eq!(meta.project_type, Some(ProjectType::Libro));
    }
}
