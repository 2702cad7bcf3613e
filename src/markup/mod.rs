//! Stored editor markup to layout blocks: normalizer, inline lexer and
//! block segmenter.

pub mod inline;
pub mod normalize;
pub mod scan;
pub mod segment;

pub use inline::lex;
pub use normalize::{insert_scene_gaps, normalize, normalize_screenplay, split_pages};
pub use scan::plain_text;
pub use segment::{segment, Mode};
