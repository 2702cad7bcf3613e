use crate::types::StyledRun;

/// Structural role of a screenplay line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenplayKind {
    SceneHeading,
    Character,
    Dialogue,
    Parenthetical,
    Transition,
    Action,
    /// vertical spacing only, never carries text
    SceneGap,
}

impl ScreenplayKind {
    /// Maps an editor class name to its line type; unknown classes are `None`.
    pub fn from_class(class: &str) -> Option<Self> {
        match class {
            "scene-heading" => Some(ScreenplayKind::SceneHeading),
            "character" => Some(ScreenplayKind::Character),
            "dialogue" => Some(ScreenplayKind::Dialogue),
            "parenthetical" => Some(ScreenplayKind::Parenthetical),
            "transition" => Some(ScreenplayKind::Transition),
            "action" => Some(ScreenplayKind::Action),
            "scene-gap" => Some(ScreenplayKind::SceneGap),
            _ => None,
        }
    }

    pub fn class_name(self) -> &'static str {
        match self {
            ScreenplayKind::SceneHeading => "scene-heading",
            ScreenplayKind::Character => "character",
            ScreenplayKind::Dialogue => "dialogue",
            ScreenplayKind::Parenthetical => "parenthetical",
            ScreenplayKind::Transition => "transition",
            ScreenplayKind::Action => "action",
            ScreenplayKind::SceneGap => "scene-gap",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenplayLine {
    pub kind: ScreenplayKind,
    pub text: String,
}

/// An ordered or unordered list; items may carry one level of sublists.
#[derive(Debug, Clone, PartialEq)]
pub struct ListBlock {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub runs: Vec<StyledRun>,
    pub sublists: Vec<ListBlock>,
}

/// One independently laid out unit of section content, in source order.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, runs: Vec<StyledRun> },
    List(ListBlock),
    Paragraph(Vec<StyledRun>),
    Screenplay(ScreenplayLine),
}
