use crate::types::Style;

/// Logical font families. Screenplay and structured sections use `Mono`,
/// prose sections use `Serif`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontFamily {
    Mono,
    Serif,
}

/// One of the eight logical faces a document registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontFace {
    pub family: FontFamily,
    pub style: Style,
}

impl FontFace {
    pub fn new(family: FontFamily, style: Style) -> Self {
        FontFace { family, style }
    }

    pub fn all() -> impl Iterator<Item = FontFace> {
        [FontFamily::Mono, FontFamily::Serif]
            .into_iter()
            .flat_map(|family| Style::ALL.into_iter().map(move |style| FontFace { family, style }))
    }

    /// resource name used in page content streams
    pub fn resource_name(self) -> &'static str {
        match (self.family, self.style) {
            (FontFamily::Mono, Style::Normal) => "Mono",
            (FontFamily::Mono, Style::Bold) => "Mono-Bold",
            (FontFamily::Mono, Style::Italic) => "Mono-Oblique",
            (FontFamily::Mono, Style::BoldItalic) => "Mono-BoldOblique",
            (FontFamily::Serif, Style::Normal) => "Serif",
            (FontFamily::Serif, Style::Bold) => "Serif-Bold",
            (FontFamily::Serif, Style::Italic) => "Serif-Italic",
            (FontFamily::Serif, Style::BoldItalic) => "Serif-BoldItalic",
        }
    }

    /// bundled TrueType file expected under the fonts directory
    pub fn file_name(self) -> &'static str {
        match (self.family, self.style) {
            (FontFamily::Mono, Style::Normal) => "CourierPrime-Regular.ttf",
            (FontFamily::Mono, Style::Bold) => "CourierPrime-Bold.ttf",
            (FontFamily::Mono, Style::Italic) => "CourierPrime-Italic.ttf",
            (FontFamily::Mono, Style::BoldItalic) => "CourierPrime-BoldItalic.ttf",
            (FontFamily::Serif, Style::Normal) => "Lora-Regular.ttf",
            (FontFamily::Serif, Style::Bold) => "Lora-Bold.ttf",
            (FontFamily::Serif, Style::Italic) => "Lora-Italic.ttf",
            (FontFamily::Serif, Style::BoldItalic) => "Lora-BoldItalic.ttf",
        }
    }

    /// base-14 font standing in when the bundled file is unavailable
    pub fn base14_name(self) -> &'static str {
        match (self.family, self.style) {
            (FontFamily::Mono, Style::Normal) => "Courier",
            (FontFamily::Mono, Style::Bold) => "Courier-Bold",
            (FontFamily::Mono, Style::Italic) => "Courier-Oblique",
            (FontFamily::Mono, Style::BoldItalic) => "Courier-BoldOblique",
            (FontFamily::Serif, Style::Normal) => "Times-Roman",
            (FontFamily::Serif, Style::Bold) => "Times-Bold",
            (FontFamily::Serif, Style::Italic) => "Times-Italic",
            (FontFamily::Serif, Style::BoldItalic) => "Times-BoldItalic",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn eight_distinct_faces() {
        let faces: Vec<FontFace> = FontFace::all().collect();
        assert_eq!(faces.len(), 8);
        let names: HashSet<&str> = faces.iter().map(|face| face.resource_name()).collect();
        let files: HashSet<&str> = faces.iter().map(|face| face.file_name()).collect();
        assert_eq!(names.len(), 8);
        assert_eq!(files.len(), 8);
    }
}
