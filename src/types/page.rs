use pdf_writer::{Content, Ref};
use serde::Deserialize;

/// container for pdf_writer page references, each page gets a single `Content` stream
pub struct Page {
    pub page_id: Ref,
    pub content_id: Ref,
    pub content: Content,
}

/// Page size and margins in points.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl PageGeometry {
    /// horizontal space between the side margins
    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }

    /// y of the first baseline region, measured from the page bottom
    pub fn top(&self) -> f32 {
        self.height - self.margin_top
    }

    pub fn bottom(&self) -> f32 {
        self.margin_bottom
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        PageGeometry {
            width: 675.0,
            height: 841.5,
            margin_top: 54.0,
            margin_bottom: 54.0,
            margin_left: 66.0,
            margin_right: 66.0,
        }
    }
}
