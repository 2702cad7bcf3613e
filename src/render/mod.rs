//! Drawing of segmented section content onto the layout `Writer`.

pub mod records;
pub mod rich_text;
pub mod screenplay;
pub mod timeline;

pub use records::format_section;
pub use screenplay::{column, Column};
