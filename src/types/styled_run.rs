use crate::types::Style;

/// Body text size: 16px in the editor, rendered at 0.75pt per px.
pub const BASE_FONT_PT: f32 = 12.0;

/// A contiguous span of text sharing one bold/italic/underline/size combination.
///
/// A run whose text is exactly `"\n"` is an explicit line break.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledRun {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub size_pt: f32,
}

impl StyledRun {
    /// unstyled run at body size
    pub fn plain(text: impl Into<String>) -> Self {
        StyledRun {
            text: text.into(),
            bold: false,
            italic: false,
            underline: false,
            size_pt: BASE_FONT_PT,
        }
    }

    pub fn line_break() -> Self {
        StyledRun::plain("\n")
    }

    pub fn is_line_break(&self) -> bool {
        self.text == "\n"
    }

    pub fn style(&self) -> Style {
        Style::from_flags(self.bold, self.italic)
    }

    /// true when two runs would render identically and can be merged
    pub fn same_format(&self, other: &StyledRun) -> bool {
        self.bold == other.bold
            && self.italic == other.italic
            && self.underline == other.underline
            && self.size_pt == other.size_pt
    }
}

/// true when the runs carry no visible text
pub fn runs_are_blank(runs: &[StyledRun]) -> bool {
    runs.iter().all(|run| run.text.chars().all(char::is_whitespace))
}

/// concatenated text of all runs, ignoring style
pub fn runs_text(runs: &[StyledRun]) -> String {
    runs.iter().map(|run| run.text.as_str()).collect()
}
