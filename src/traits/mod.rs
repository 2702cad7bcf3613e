mod font_type;
mod section_source;

pub use font_type::FontType;
pub use section_source::{ProjectDir, SectionSource};
