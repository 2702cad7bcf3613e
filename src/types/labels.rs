use std::{collections::BTreeMap, str::FromStr};

use serde::Deserialize;

use crate::types::ProjectType;

/// Languages with a bundled label set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    It,
    En,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::It => "it",
            Language::En => "en",
        }
    }
}

impl FromStr for Language {
    type Err = String;

    /// Accepts region-qualified tags such as `en-US`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        if tag.starts_with("en") {
            Ok(Language::En)
        } else if tag.starts_with("it") {
            Ok(Language::It)
        } else {
            Err(format!("unsupported language \"{s}\""))
        }
    }
}

/// Display names of record fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldLabels {
    pub character_header: String,
    pub name: String,
    pub role: String,
    pub age_appearance: String,
    pub background: String,
    pub goal: String,
    pub conflict: String,
    pub arc: String,
    pub relationships: String,
    pub traits: String,
    pub quote: String,
    pub notes: String,
    pub custom: String,
    pub beat_header: String,
    pub title: String,
    pub container: String,
    pub summary: String,
    pub objective: String,
    pub obstacle: String,
    pub outcome: String,
    pub time_place: String,
    pub characters: String,
    pub links: String,
    pub timeline_event: String,
    pub section: String,
}

impl FieldLabels {
    pub fn for_language(lang: Language) -> Self {
        let pick = |it: &str, en: &str| match lang {
            Language::It => it.to_string(),
            Language::En => en.to_string(),
        };

        FieldLabels {
            character_header: pick("Personaggio", "Character"),
            name: pick("Nome", "Name"),
            role: pick("Ruolo", "Role"),
            age_appearance: pick("Età / Aspetto", "Age / Appearance"),
            background: pick("Background", "Background"),
            goal: pick("Obiettivo", "Goal"),
            conflict: pick("Conflitto", "Conflict"),
            arc: pick("Evoluzione", "Arc"),
            relationships: pick("Relazioni", "Relationships"),
            traits: pick("Tratti", "Traits"),
            quote: pick("Citazione", "Quote"),
            notes: pick("Note", "Notes"),
            custom: pick("Campo personalizzato", "Custom Field"),
            beat_header: pick("Battuta", "Beat"),
            title: pick("Titolo", "Title"),
            container: pick("Sequenza", "Sequence"),
            summary: pick("Riassunto", "Summary"),
            objective: pick("Obiettivo", "Objective"),
            obstacle: pick("Ostacolo", "Obstacle"),
            outcome: pick("Esito", "Outcome"),
            time_place: pick("Tempo / Luogo", "Time / Place"),
            characters: pick("Personaggi", "Characters"),
            links: pick("Collegamenti", "Links"),
            timeline_event: pick("Evento", "Event"),
            section: pick("Sezione", "Section"),
        }
    }

    /// Replaces the label stored under its camelCase key. Returns `false`
    /// for unknown keys.
    pub fn set(&mut self, key: &str, value: String) -> bool {
        let slot = match key {
            "characterHeader" => &mut self.character_header,
            "name" => &mut self.name,
            "role" => &mut self.role,
            "ageAppearance" => &mut self.age_appearance,
            "background" => &mut self.background,
            "goal" => &mut self.goal,
            "conflict" => &mut self.conflict,
            "arc" => &mut self.arc,
            "relationships" => &mut self.relationships,
            "traits" => &mut self.traits,
            "quote" => &mut self.quote,
            "notes" => &mut self.notes,
            "custom" => &mut self.custom,
            "beatHeader" => &mut self.beat_header,
            "title" => &mut self.title,
            "container" => &mut self.container,
            "summary" => &mut self.summary,
            "objective" => &mut self.objective,
            "obstacle" => &mut self.obstacle,
            "outcome" => &mut self.outcome,
            "timePlace" => &mut self.time_place,
            "characters" => &mut self.characters,
            "links" => &mut self.links,
            "timelineEvent" => &mut self.timeline_event,
            "section" => &mut self.section,
            _ => return false,
        };
        *slot = value;
        true
    }
}

struct BibleEntry {
    key: &'static str,
    /// id the editor stores for the default section
    editor_id: &'static str,
    it: &'static str,
    en: &'static str,
}

const BIBLE_SECTIONS: [BibleEntry; 20] = [
    BibleEntry { key: "title", editor_id: "title", it: "TITOLO", en: "TITLE" },
    BibleEntry { key: "author", editor_id: "author", it: "AUTORE", en: "AUTHOR" },
    BibleEntry { key: "pitch", editor_id: "pitch", it: "PITCH / LOGLINE", en: "PITCH / LOGLINE" },
    BibleEntry { key: "premise", editor_id: "premise", it: "PREMESSA", en: "PREMISE" },
    BibleEntry { key: "synShort", editor_id: "synopsisShort", it: "SINOSSI BREVE", en: "SHORT SYNOPSIS" },
    BibleEntry { key: "synLong", editor_id: "synopsisLong", it: "SINOSSI ESTESA", en: "EXTENDED SYNOPSIS" },
    BibleEntry { key: "themes", editor_id: "themes", it: "TEMI", en: "THEMES" },
    BibleEntry { key: "tone", editor_id: "toneStyle", it: "TONO & STILE", en: "TONE & STYLE" },
    BibleEntry { key: "world", editor_id: "worldOverview", it: "MONDO / AMBIENTAZIONE", en: "WORLD / SETTING" },
    BibleEntry { key: "rules", editor_id: "worldRules", it: "REGOLE DEL MONDO", en: "WORLD RULES" },
    BibleEntry { key: "locations", editor_id: "locations", it: "LUOGHI CHIAVE", en: "KEY LOCATIONS" },
    BibleEntry { key: "period", editor_id: "timePeriod", it: "PERIODO/EPOCA", en: "PERIOD/ERA" },
    BibleEntry { key: "structure", editor_id: "structureNotes", it: "STRUTTURA", en: "STRUCTURE" },
    BibleEntry { key: "motifs", editor_id: "motifs", it: "MOTIVI & SIMBOLI", en: "MOTIFS & SYMBOLS" },
    BibleEntry { key: "props", editor_id: "props", it: "OGGETTI CHIAVE", en: "KEY PROPS" },
    BibleEntry { key: "refs", editor_id: "references", it: "RIFERIMENTI & MOODBOARD", en: "REFERENCES & MOODBOARD" },
    BibleEntry { key: "production", editor_id: "production", it: "NOTE DI PRODUZIONE", en: "PRODUCTION NOTES" },
    BibleEntry { key: "glossary", editor_id: "glossary", it: "GLOSSARIO", en: "GLOSSARY" },
    BibleEntry { key: "biblio", editor_id: "bibliography", it: "FONTI & BIBLIOGRAFIA", en: "SOURCES & BIBLIOGRAPHY" },
    BibleEntry { key: "questions", editor_id: "openQuestions", it: "QUESTIONI APERTE", en: "OPEN QUESTIONS" },
];

const SECTION_TITLES: [(&str, &str, &str); 14] = [
    ("scene", "Stesura", "Draft"),
    ("capitoli", "Capitoli", "Chapters"),
    ("concept", "Concept", "Concept"),
    ("soggetto", "Soggetto", "Story"),
    ("trattamento", "Trattamento", "Treatment"),
    ("scaletta", "Scaletta", "Outline"),
    ("bibbia", "Bibbia", "Bible"),
    ("personaggi", "Personaggi", "Characters"),
    ("timeline", "Timeline", "Timeline"),
    ("note", "Note", "Notes"),
    ("soggetto_logline", "Soggetto & logline", "Premise & Logline"),
    ("outline", "Outline", "Outline"),
    ("didascalie", "Didascalie", "Stage Directions"),
    ("premessa_sinossi", "Premessa & sinossi", "Premise & Synopsis"),
];

/// Everything user-visible that depends on the export language.
#[derive(Debug, Clone, PartialEq)]
pub struct Labels {
    pub lang: Language,
    /// word preceding the page number in the footer
    pub page: String,
    pub nothing_to_export: String,
    pub section_titles: BTreeMap<String, String>,
    pub fields: FieldLabels,
    pub project_type: Option<ProjectType>,
}

impl Labels {
    pub fn new(lang: Language) -> Self {
        let section_titles = SECTION_TITLES
            .iter()
            .map(|(id, it, en)| {
                let title = match lang {
                    Language::It => it,
                    Language::En => en,
                };
                (id.to_string(), title.to_string())
            })
            .collect();

        let (page, nothing_to_export) = match lang {
            Language::It => ("Pagina", "Nessun contenuto da esportare."),
            Language::En => ("Page", "No content to export."),
        };

        Labels {
            lang,
            page: page.to_string(),
            nothing_to_export: nothing_to_export.to_string(),
            section_titles,
            fields: FieldLabels::for_language(lang),
            project_type: None,
        }
    }

    /// Default labels with the project type overrides applied.
    pub fn for_project(lang: Language, project_type: Option<ProjectType>) -> Self {
        let mut labels = Labels::new(lang);
        if let Some(project_type) = project_type {
            labels.apply_project_type(project_type);
        }
        labels
    }

    /// Records the project type and applies its title overrides. English
    /// book projects call their outline a chapter breakdown.
    pub fn apply_project_type(&mut self, project_type: ProjectType) {
        self.project_type = Some(project_type);
        if self.lang == Language::En && project_type == ProjectType::Libro {
            self.section_titles
                .insert("scaletta".to_string(), "Chapter Breakdown".to_string());
        }
    }

    /// Upper-cased display title of a section. Ids without a title are
    /// shown with their first letter capitalised.
    pub fn section_label(&self, id: &str) -> String {
        match self.section_titles.get(id).filter(|title| !title.is_empty()) {
            Some(title) => title.to_uppercase(),
            None => capitalize(id).to_uppercase(),
        }
    }

    /// Title of a bible record in the export language.
    ///
    /// A stored title naming a canonical bible section, either by key or by
    /// its label in any bundled language, is replaced with the label of the
    /// current language. Other titles are returned trimmed.
    pub fn bible_title(&self, stored: &str) -> String {
        let stored = stored.trim();
        let canonical = BIBLE_SECTIONS.iter().find(|entry| {
            [entry.key, entry.editor_id, entry.it, entry.en]
                .iter()
                .any(|name| name.to_lowercase() == stored.to_lowercase())
        });

        match (canonical, self.lang) {
            (Some(entry), Language::It) => entry.it.to_string(),
            (Some(entry), Language::En) => entry.en.to_string(),
            (None, _) => stored.to_string(),
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Labels::new(Language::default())
    }
}

fn capitalize(id: &str) -> String {
    let mut chars = id.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Caller-provided label changes, read from JSON.
///
/// Section titles and field labels merge key by key over the defaults of
/// `lang`; the remaining entries replace the default outright.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelOverrides {
    pub lang: Option<Language>,
    pub page: Option<String>,
    pub nothing_to_export: Option<String>,
    pub section_titles: BTreeMap<String, String>,
    pub fields: BTreeMap<String, String>,
    pub project_type: Option<ProjectType>,
}

impl LabelOverrides {
    pub fn merge(self) -> Labels {
        let mut labels = Labels::new(self.lang.unwrap_or_default());

        if let Some(page) = self.page {
            labels.page = page;
        }
        if let Some(message) = self.nothing_to_export {
            labels.nothing_to_export = message;
        }
        labels.section_titles.extend(self.section_titles);
        for (key, value) in self.fields {
            labels.fields.set(&key, value);
        }
        if let Some(project_type) = self.project_type {
            labels.apply_project_type(project_type);
        }

        labels
    }
}

impl From<LabelOverrides> for Labels {
    fn from(overrides: LabelOverrides) -> Self {
        overrides.merge()
    }
}
