/// Horizontal placement of each line inside its block width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlignment {
    /// offset that places a line of `line_width` inside `area`
    pub fn offset(self, line_width: f32, area: f32) -> f32 {
        if line_width >= area {
            return 0.0;
        }
        match self {
            TextAlignment::Left => 0.0,
            TextAlignment::Center => (area - line_width) / 2.0,
            TextAlignment::Right => area - line_width,
        }
    }
}
