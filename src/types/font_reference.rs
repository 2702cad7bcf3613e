use std::{collections::HashMap, path::Path};

use pdf_writer::{types::FontFlags, Name, Pdf, Rect, Ref};
use tracing::{debug, warn};
use ttf_parser::{Face, GlyphId};

use crate::{
    traits::FontType,
    types::{
        encoding::decode_byte, Base14, EmbeddedMetrics, FontFace, FontFamily, Style,
    },
};

const MISSING_GLYPH_WIDTH: f32 = 500.0;

/// A registered font resource: the object id, the resource name used in
/// content streams and the metrics that layout measures with.
pub struct FontReference {
    pub face: FontFace,
    pub id: Ref,
    pub name: Name<'static>,
    pub embedded: bool,
    pub metrics: Box<dyn FontType + Send + Sync>,
}

impl std::fmt::Debug for FontReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontReference")
            .field("face", &self.face)
            .field("id", &self.id)
            .field("embedded", &self.embedded)
            .finish()
    }
}

/// Raw bytes of whichever bundled font files could be read.
#[derive(Debug, Clone, Default)]
pub struct FontAssets {
    files: HashMap<FontFace, Vec<u8>>,
}

impl FontAssets {
    /// No bundled files: every face falls back to its base-14 equivalent.
    pub fn none() -> Self {
        FontAssets::default()
    }

    /// Reads the eight bundled files from `dir`. Missing files, or a
    /// missing directory, are not errors.
    pub async fn discover(dir: &Path) -> Self {
        let mut files = HashMap::new();

        for face in FontFace::all() {
            let path = dir.join(face.file_name());
            match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    files.insert(face, bytes);
                }
                Err(err) => {
                    debug!(path = %path.display(), error = %err, "font file unavailable, using base-14 fallback");
                }
            }
        }

        FontAssets { files }
    }

    pub fn insert(&mut self, face: FontFace, bytes: Vec<u8>) {
        self.files.insert(face, bytes);
    }

    pub fn get(&self, face: FontFace) -> Option<&[u8]> {
        self.files.get(&face).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// The eight logical faces registered in one document.
#[derive(Debug)]
pub struct FontSet {
    refs: Vec<FontReference>,
}

impl FontSet {
    /// Writes one font object per logical face into `pdf`, embedding the
    /// bundled TrueType data when it parses and falling back to the base-14
    /// font otherwise.
    pub fn register(pdf: &mut Pdf, alloc: &mut Ref, assets: &FontAssets) -> Self {
        let mut refs = Vec::with_capacity(8);

        for face in FontFace::all() {
            let id = alloc.bump();
            let name = Name(face.resource_name().as_bytes());

            let embedded = assets.get(face).and_then(|data| {
                let metrics = embed_truetype(pdf, alloc, id, face, data);
                if metrics.is_none() {
                    warn!(file = face.file_name(), "font file could not be parsed, using base-14 fallback");
                }
                metrics
            });

            let reference = match embedded {
                Some(metrics) => FontReference {
                    face,
                    id,
                    name,
                    embedded: true,
                    metrics: Box::new(metrics),
                },
                None => {
                    pdf.type1_font(id)
                        .base_font(Name(face.base14_name().as_bytes()))
                        .encoding_predefined(Name(b"WinAnsiEncoding"));
                    FontReference {
                        face,
                        id,
                        name,
                        embedded: false,
                        metrics: Box::new(Base14::for_face(face.family, face.style)),
                    }
                }
            };

            refs.push(reference);
        }

        debug!(
            embedded = refs.iter().filter(|font| font.embedded).count(),
            "registered document fonts"
        );

        FontSet { refs }
    }

    /// Font backing `family` in `style`.
    pub fn get(&self, family: FontFamily, style: Style) -> &FontReference {
        let index = self
            .refs
            .iter()
            .position(|font| font.face.family == family && font.face.style == style)
            .unwrap_or(0);
        &self.refs[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &FontReference> {
        self.refs.iter()
    }

    pub fn text_width(&self, family: FontFamily, style: Style, text: &str, size: f32) -> f32 {
        self.get(family, style).metrics.text_width(text, size)
    }
}

fn embed_truetype(
    pdf: &mut Pdf,
    alloc: &mut Ref,
    font_id: Ref,
    face_kind: FontFace,
    data: &[u8],
) -> Option<EmbeddedMetrics> {
    let face = Face::parse(data, 0).ok()?;
    let data_len = i32::try_from(data.len()).ok()?;

    let units = f32::from(face.units_per_em());
    let scale = |value: i16| f32::from(value) / units * 1000.0;

    let bb = face.global_bounding_box();
    let bbox = Rect::new(scale(bb.x_min), scale(bb.y_min), scale(bb.x_max), scale(bb.y_max));
    let cap_height = face.capital_height().map(scale).unwrap_or(700.0);
    let missing = face
        .glyph_hor_advance(GlyphId(0))
        .map(|advance| f32::from(advance) / units * 1000.0)
        .unwrap_or(MISSING_GLYPH_WIDTH);

    let widths: Vec<f32> = (EmbeddedMetrics::FIRST_CHAR..=EmbeddedMetrics::LAST_CHAR)
        .map(|code| {
            face.glyph_index(decode_byte(code))
                .and_then(|glyph| face.glyph_hor_advance(glyph))
                .map(|advance| f32::from(advance) / units * 1000.0)
                .unwrap_or(missing)
        })
        .collect();

    let mut flags = FontFlags::NON_SYMBOLIC;
    if face_kind.family == FontFamily::Mono {
        flags |= FontFlags::FIXED_PITCH;
    } else {
        flags |= FontFlags::SERIF;
    }
    if face_kind.style.is_italic() {
        flags |= FontFlags::ITALIC;
    }

    let ps_name = face_kind.file_name().trim_end_matches(".ttf");
    let descriptor_id = alloc.bump();
    let data_id = alloc.bump();

    pdf.stream(data_id, data).pair(Name(b"Length1"), data_len);

    pdf.font_descriptor(descriptor_id)
        .name(Name(ps_name.as_bytes()))
        .flags(flags)
        .bbox(bbox)
        .italic_angle(if face_kind.style.is_italic() { -12.0 } else { 0.0 })
        .ascent(scale(face.ascender()))
        .descent(scale(face.descender()))
        .cap_height(cap_height)
        .stem_v(if face_kind.style.is_bold() { 120.0 } else { 80.0 })
        .font_file2(data_id);

    {
        let mut dict = pdf.indirect(font_id).dict();
        dict.pair(Name(b"Type"), Name(b"Font"));
        dict.pair(Name(b"Subtype"), Name(b"TrueType"));
        dict.pair(Name(b"BaseFont"), Name(ps_name.as_bytes()));
        dict.pair(Name(b"Encoding"), Name(b"WinAnsiEncoding"));
        dict.pair(Name(b"FirstChar"), i32::from(EmbeddedMetrics::FIRST_CHAR));
        dict.pair(Name(b"LastChar"), i32::from(EmbeddedMetrics::LAST_CHAR));
        dict.pair(Name(b"FontDescriptor"), descriptor_id);
        dict.insert(Name(b"Widths")).array().items(widths.iter().copied());
    }

    Some(EmbeddedMetrics { widths })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEJAVU_MONO: &[u8] = include_bytes!("../../tests/fixtures/DejaVuSansMono.ttf");

    #[test]
    fn parsable_font_files_are_embedded_as_truetype() {
        let mut pdf = Pdf::new();
        let mut alloc = Ref::new(1);
        let mut assets = FontAssets::none();
        assets.insert(FontFace::new(FontFamily::Mono, Style::Normal), DEJAVU_MONO.to_vec());

        let fonts = FontSet::register(&mut pdf, &mut alloc, &assets);
        let mono = fonts.get(FontFamily::Mono, Style::Normal);
        assert!(mono.embedded);
        assert_eq!(fonts.iter().filter(|font| font.embedded).count(), 1);
        // 1233 units per glyph at 2048 units per em
        assert!((mono.metrics.text_width("ab", 10.0) - 12.041).abs() < 0.01);

        let bytes = pdf.finish();
        let text = String::from_utf8_lossy(&bytes);
        assert_eq!(text.matches("/FontFile2").count(), 1);
        assert!(text.contains("/Subtype /TrueType"));
        assert!(text.contains("/BaseFont /CourierPrime-Regular"));
        assert!(text.contains("/FirstChar 32"));
        assert!(text.contains("/LastChar 255"));
        assert!(text.contains("/Widths ["));
        assert!(text.contains("/Length1 343140"));
        assert!(text.contains("/BaseFont /Courier-Bold"));
    }

    #[test]
    fn unreadable_font_data_falls_back_to_base14() {
        let mut pdf = Pdf::new();
        let mut alloc = Ref::new(1);
        let mut assets = FontAssets::none();
        assets.insert(FontFace::new(FontFamily::Serif, Style::Bold), b"not a font".to_vec());

        let fonts = FontSet::register(&mut pdf, &mut alloc, &assets);
        assert_eq!(fonts.iter().count(), 8);
        assert!(fonts.iter().all(|font| !font.embedded));

        let bytes = pdf.finish();
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/BaseFont /Times-Bold"));
        assert!(text.contains("/BaseFont /Courier"));
    }

    #[test]
    fn lookup_returns_the_requested_face() {
        let mut pdf = Pdf::new();
        let mut alloc = Ref::new(1);
        let fonts = FontSet::register(&mut pdf, &mut alloc, &FontAssets::none());

        let font = fonts.get(FontFamily::Mono, Style::Italic);
        assert_eq!(font.name, Name(b"Mono-Oblique"));
        assert_eq!(font.metrics.text_width("ab", 10.0), 12.0);
    }

    #[tokio::test]
    async fn missing_directory_yields_no_assets() {
        let dir = tempfile::tempdir().unwrap();
        let assets = FontAssets::discover(&dir.path().join("fonts")).await;
        assert!(assets.is_empty());
    }
}
