use std::str::FromStr;

use serde::Deserialize;

/// Kind of writing project; decides the default section list and a few
/// label overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    #[default]
    Sceneggiatura,
    Libro,
    Teatro,
}

impl ProjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectType::Sceneggiatura => "sceneggiatura",
            ProjectType::Libro => "libro",
            ProjectType::Teatro => "teatro",
        }
    }

    /// Sections of a project of this type, in sidebar order.
    pub fn default_sections(self) -> &'static [&'static str] {
        match self {
            ProjectType::Sceneggiatura => &[
                "concept",
                "soggetto",
                "trattamento",
                "scaletta",
                "bibbia",
                "personaggi",
                "scene",
                "storyboard",
                "spoglio",
                "timeline",
                "note",
            ],
            ProjectType::Libro => &[
                "soggetto_logline",
                "outline",
                "scaletta",
                "capitoli",
                "personaggi",
                "bibbia",
                "timeline",
                "note",
                "revisioni",
            ],
            ProjectType::Teatro => &[
                "premessa_sinossi",
                "scaletta",
                "scene",
                "personaggi",
                "bibbia",
                "didascalie",
                "timeline",
                "note_prova",
                "revisioni",
            ],
        }
    }
}

impl FromStr for ProjectType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sceneggiatura" => Ok(ProjectType::Sceneggiatura),
            "libro" => Ok(ProjectType::Libro),
            "teatro" => Ok(ProjectType::Teatro),
            other => Err(format!("unknown project type \"{other}\"")),
        }
    }
}

/// Display information about the project being exported.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectMeta {
    pub name: String,
    pub project_type: Option<ProjectType>,
}

impl ProjectMeta {
    /// Splits a folder id of the form `Name__type`.
    ///
    /// Folders without a recognised suffix are legacy projects: the whole id
    /// is the display name and the type is unknown.
    pub fn from_folder_id(id: &str) -> Self {
        if let Some((name, suffix)) = id.rsplit_once("__") {
            let is_word = !suffix.is_empty() && suffix.chars().all(|ch| ch.is_ascii_alphabetic());
            if is_word {
                if let Ok(project_type) = suffix.parse() {
                    return ProjectMeta {
                        name: name.trim().to_string(),
                        project_type: Some(project_type),
                    };
                }
            }
        }

        ProjectMeta {
            name: id.to_string(),
            project_type: None,
        }
    }
}
