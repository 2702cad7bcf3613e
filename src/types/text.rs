use crate::types::{FontFamily, FontSet, Style, StyledRun, TextAlignment, BASE_FONT_PT};

/// block level container holding laid out `Line` objects
/// ```ignore
/// let block = TextBlock::new(FontFamily::Serif)
///     .with_font_size(12.0)
///     .and_alignment(TextAlignment::Center)
///     .and_width(area)
///     .layout(&runs, &fonts);
/// ```
#[derive(Debug, Clone)]
pub struct TextBlock {
    pub alignment: TextAlignment,
    pub font_family: FontFamily,
    /// size used for empty lines; runs carry their own size
    pub font_size: f32,
    pub width: f32,
    /// extra space added after every line
    pub line_gap: f32,
    pub color: Option<[f32; 3]>,
    pub lines: Vec<Line>,
}

/// Wrapper for `Word` objects that fit the block width
#[derive(Debug, Clone, Default)]
pub struct Line {
    pub body: Vec<Word>,
    pub width: f32,
    pub offset: f32,
    /// largest font size on the line
    pub height: f32,
}

/// Text drawn with one font at one position; x is relative to the line start
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub style: Style,
    pub underline: bool,
    pub size: f32,
    pub x: f32,
    pub width: f32,
}

#[derive(Debug, Clone)]
struct Fragment<'a> {
    text: String,
    run: &'a StyledRun,
    width: f32,
}

#[derive(Debug)]
enum Token<'a> {
    Word(Vec<Fragment<'a>>),
    Break,
}

impl TextBlock {
    /// default settings:
    /// - Font size: 12.0
    /// - Text alignment: Left
    /// - Width: unbounded
    pub fn new(font_family: FontFamily) -> Self {
        TextBlock {
            alignment: TextAlignment::Left,
            font_family,
            font_size: BASE_FONT_PT,
            width: f32::MAX,
            line_gap: 0.0,
            color: None,
            lines: Vec::new(),
        }
    }

    /// builder function setting font size
    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    /// builder function setting block alignment
    pub fn and_alignment(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// builder function setting the wrapping width
    pub fn and_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    pub fn and_line_gap(mut self, line_gap: f32) -> Self {
        self.line_gap = line_gap;
        self
    }

    pub fn and_color(mut self, color: [f32; 3]) -> Self {
        self.color = Some(color);
        self
    }

    /// Breaks `runs` into lines no wider than the block width.
    ///
    /// Runs flow into each other: a style change in the middle of a word
    /// does not split it, and only whitespace or `\n` separate words.
    /// Consecutive words in the same format are merged so each ends up as a
    /// single text operation.
    pub fn layout(mut self, runs: &[StyledRun], fonts: &FontSet) -> Self {
        let family = self.font_family;
        let tokens = tokenize(runs, family, fonts);

        let mut lines = Vec::new();
        let mut line = Line::default();

        for token in tokens {
            let fragments = match token {
                Token::Break => {
                    lines.push(std::mem::take(&mut line));
                    continue;
                }
                Token::Word(fragments) => fragments,
            };

            let word_width: f32 = fragments.iter().map(|fragment| fragment.width).sum();

            if !line.body.is_empty() {
                let first = fragments[0].run;
                let space = fonts.text_width(family, first.style(), " ", first.size_pt);

                if line.width + space + word_width <= self.width {
                    line.width += space;
                    place_fragments(&mut line, fragments, Some(space));
                    continue;
                }

                lines.push(std::mem::take(&mut line));
            }

            if word_width <= self.width {
                place_fragments(&mut line, fragments, None);
            } else {
                for piece in split_overlong(fragments, self.width, family, fonts) {
                    if !line.body.is_empty() {
                        lines.push(std::mem::take(&mut line));
                    }
                    place_fragments(&mut line, piece, None);
                }
            }
        }

        if !line.body.is_empty() || lines.is_empty() {
            lines.push(line);
        }

        for line in &mut lines {
            line.height = line
                .body
                .iter()
                .map(|word| word.size)
                .fold(0.0, f32::max);
            if line.height == 0.0 {
                line.height = self.font_size;
            }
            line.offset = self.alignment.offset(line.width, self.width);
        }

        self.lines = lines;
        self
    }

    /// Puts a list marker on the first line; its `x` is usually negative so
    /// it hangs left of the text.
    pub fn with_marker(mut self, marker: Word) -> Self {
        if self.lines.is_empty() {
            self.lines.push(Line {
                height: marker.size,
                ..Line::default()
            });
        }
        if let Some(first) = self.lines.first_mut() {
            first.height = first.height.max(marker.size);
            first.body.insert(0, marker);
        }
        self
    }
}

/// Appends fragments to the line. `space` is the gap preceding the first
/// fragment when the word follows another on the same line.
fn place_fragments(line: &mut Line, fragments: Vec<Fragment<'_>>, space: Option<f32>) {
    for (index, fragment) in fragments.into_iter().enumerate() {
        let separated = index == 0 && space.is_some();
        let x = line.width;

        if let Some(last) = line.body.last_mut() {
            let same_format = last.style == fragment.run.style()
                && last.underline == fragment.run.underline
                && last.size == fragment.run.size_pt;

            if same_format {
                if separated {
                    last.text.push(' ');
                }
                last.text.push_str(&fragment.text);
                last.width = x + fragment.width - last.x;
                line.width = x + fragment.width;
                continue;
            }
        }

        line.body.push(Word {
            text: fragment.text,
            style: fragment.run.style(),
            underline: fragment.run.underline,
            size: fragment.run.size_pt,
            x,
            width: fragment.width,
        });
        line.width = x + fragment.width;
    }
}

fn tokenize<'a>(runs: &'a [StyledRun], family: FontFamily, fonts: &FontSet) -> Vec<Token<'a>> {
    let mut tokens = Vec::new();
    let mut word: Vec<Fragment<'a>> = Vec::new();

    let flush = |word: &mut Vec<Fragment<'a>>, tokens: &mut Vec<Token<'a>>| {
        if !word.is_empty() {
            tokens.push(Token::Word(std::mem::take(word)));
        }
    };

    for run in runs {
        let mut current = String::new();

        for ch in run.text.chars() {
            // a non-breaking space keeps its neighbours together
            let is_break = ch == '\n';
            let is_space = ch.is_whitespace() && ch != '\u{A0}';

            if is_break || is_space {
                if !current.is_empty() {
                    let text = std::mem::take(&mut current);
                    let width = fonts.text_width(family, run.style(), &text, run.size_pt);
                    word.push(Fragment { text, run, width });
                }
                flush(&mut word, &mut tokens);
                if is_break {
                    tokens.push(Token::Break);
                }
            } else {
                current.push(ch);
            }
        }

        if !current.is_empty() {
            let width = fonts.text_width(family, run.style(), &current, run.size_pt);
            word.push(Fragment {
                text: current,
                run,
                width,
            });
        }
    }

    flush(&mut word, &mut tokens);
    tokens
}

/// Hard-breaks a word wider than `width` between characters.
fn split_overlong<'a>(
    fragments: Vec<Fragment<'a>>,
    width: f32,
    family: FontFamily,
    fonts: &FontSet,
) -> Vec<Vec<Fragment<'a>>> {
    let mut pieces = Vec::new();
    let mut piece: Vec<Fragment<'a>> = Vec::new();
    let mut piece_width = 0.0;

    for fragment in fragments {
        let run = fragment.run;
        let mut text = String::new();
        let mut text_width = 0.0;

        for ch in fragment.text.chars() {
            let ch_width = fonts.get(family, run.style()).metrics.char_width(ch, run.size_pt);
            let empty = piece.is_empty() && text.is_empty();

            if !empty && piece_width + text_width + ch_width > width {
                if !text.is_empty() {
                    piece.push(Fragment {
                        text: std::mem::take(&mut text),
                        run,
                        width: text_width,
                    });
                }
                pieces.push(std::mem::take(&mut piece));
                piece_width = 0.0;
                text_width = 0.0;
            }

            text.push(ch);
            text_width += ch_width;
        }

        if !text.is_empty() {
            piece_width += text_width;
            piece.push(Fragment {
                text,
                run,
                width: text_width,
            });
        }
    }

    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
