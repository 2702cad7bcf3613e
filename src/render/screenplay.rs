use crate::{
    markup::{insert_scene_gaps, normalize_screenplay, segment, Mode},
    types::{
        Block, FontFamily, ScreenplayKind, ScreenplayLine, StyledRun, TextAlignment, TextBlock,
        Writer, BASE_FONT_PT,
    },
};

const CHARACTER_RATIO: f32 = 300.0 / 700.0;
const DIALOGUE_RATIO: f32 = 400.0 / 700.0;
const PARENTHETICAL_RATIO: f32 = 360.0 / 700.0;

/// Horizontal slot of a screenplay line inside the content area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    /// distance from the left margin
    pub x: f32,
    pub width: f32,
    pub alignment: TextAlignment,
}

impl Column {
    fn full(alignment: TextAlignment, content_width: f32) -> Self {
        Column {
            x: 0.0,
            width: content_width,
            alignment,
        }
    }

    fn centered(ratio: f32, alignment: TextAlignment, content_width: f32) -> Self {
        let width = content_width * ratio;
        Column {
            x: (content_width - width) / 2.0,
            width,
            alignment,
        }
    }
}

/// Slot of `kind` for a content area `content_width` points wide.
///
/// Character, dialogue and parenthetical columns are centered on the page;
/// only the character name is also centered inside its column.
pub fn column(kind: ScreenplayKind, content_width: f32) -> Column {
    match kind {
        ScreenplayKind::Character => {
            Column::centered(CHARACTER_RATIO, TextAlignment::Center, content_width)
        }
        ScreenplayKind::Dialogue => {
            Column::centered(DIALOGUE_RATIO, TextAlignment::Left, content_width)
        }
        ScreenplayKind::Parenthetical => {
            Column::centered(PARENTHETICAL_RATIO, TextAlignment::Left, content_width)
        }
        ScreenplayKind::Transition => Column::full(TextAlignment::Right, content_width),
        ScreenplayKind::SceneHeading | ScreenplayKind::Action | ScreenplayKind::SceneGap => {
            Column::full(TextAlignment::Left, content_width)
        }
    }
}

/// Styled text a line is drawn with; `None` for a gap.
fn styled(line: &ScreenplayLine) -> Option<StyledRun> {
    let text = &line.text;
    let run = match line.kind {
        ScreenplayKind::SceneGap => return None,
        ScreenplayKind::SceneHeading | ScreenplayKind::Character | ScreenplayKind::Transition => {
            StyledRun {
                bold: true,
                ..StyledRun::plain(text.to_uppercase())
            }
        }
        ScreenplayKind::Parenthetical => StyledRun {
            italic: true,
            ..StyledRun::plain(format!("({text})"))
        },
        ScreenplayKind::Dialogue | ScreenplayKind::Action => StyledRun::plain(text.as_str()),
    };
    Some(run)
}

/// lines of space left after a line of `kind`
fn space_after(kind: ScreenplayKind) -> f32 {
    match kind {
        ScreenplayKind::SceneHeading => 0.4,
        ScreenplayKind::SceneGap => 0.8,
        _ => 0.2,
    }
}

/// Renders stored screenplay markup: wrappers and line breaks are
/// normalized, a gap is inserted between adjacent blocks the way the editor
/// displays them, and every resulting line is drawn in the fixed-pitch
/// family.
pub fn render_markup(writer: &mut Writer, raw: &str) {
    let html = insert_scene_gaps(&normalize_screenplay(raw));
    let lines: Vec<ScreenplayLine> = segment(&html, Mode::Screenplay)
        .into_iter()
        .filter_map(|block| match block {
            Block::Screenplay(line) => Some(line),
            _ => None,
        })
        .collect();

    render(writer, &lines);
}

pub fn render(writer: &mut Writer, lines: &[ScreenplayLine]) {
    for line in lines {
        render_line(writer, line);
    }
}

pub fn render_line(writer: &mut Writer, line: &ScreenplayLine) {
    if let Some(run) = styled(line) {
        let column = column(line.kind, writer.content_width());
        let block = TextBlock::new(FontFamily::Mono)
            .and_alignment(column.alignment)
            .and_width(column.width)
            .layout(&[run], &writer.fonts);

        let x = writer.left() + column.x;
        writer.write(&block, x);
    }

    writer.move_down(space_after(line.kind), BASE_FONT_PT);
}
