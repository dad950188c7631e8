//! TrueType font embedding
//!
//! Fonts are embedded whole as Type0/CIDFontType2 with Identity-H encoding.
//! The width array and ToUnicode CMap cover only the characters that were
//! actually drawn; the documents produced here carry a handful of short
//! strings, so subsetting the font program itself is not worth the
//! machinery.

use crate::{PdfError, Result};
use lopdf::{Dictionary, Object, Stream};
use std::collections::BTreeSet;

/// An embeddable TrueType font with usage tracking
#[derive(Debug, Clone)]
pub struct Typeface {
    /// Font identifier (also used as the PDF BaseFont name)
    pub name: String,
    /// Raw TTF bytes
    pub data: Vec<u8>,
    /// Characters drawn with this font, for width/CMap generation
    pub used_chars: BTreeSet<char>,
    face: Option<ttf_parser::Face<'static>>,
}

/// PDF objects generated for one embedded font
pub struct FontObjects {
    /// Type0 font dictionary
    pub type0_font: Dictionary,
    /// CIDFontType2 dictionary
    pub cid_font: Dictionary,
    /// Font descriptor dictionary
    pub font_descriptor: Dictionary,
    /// Font program stream (raw TTF)
    pub font_file_stream: Stream,
    /// ToUnicode CMap stream
    pub tounicode_stream: Stream,
}

impl Typeface {
    /// Parse a typeface from TTF bytes
    pub fn from_bytes(name: &str, ttf_data: &[u8]) -> Result<Self> {
        let data = ttf_data.to_vec();

        // The parsed face borrows the font bytes for the life of the
        // document, so the backing buffer is leaked once per loaded font.
        let static_data: &'static [u8] = Box::leak(data.clone().into_boxed_slice());
        let face = ttf_parser::Face::parse(static_data, 0)
            .map_err(|e| PdfError::FontParseError(format!("{e:?}")))?;

        Ok(Self {
            name: name.to_string(),
            data,
            used_chars: BTreeSet::new(),
            face: Some(face),
        })
    }

    /// Record characters as used (for the width array and ToUnicode CMap)
    pub fn note_chars(&mut self, text: &str) {
        self.used_chars.extend(text.chars());
    }

    /// Glyph ID for a character, if the font has one
    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.face
            .as_ref()
            .and_then(|face| face.glyph_index(c).map(|id| id.0))
    }

    /// Horizontal advance of a character in font units
    pub fn glyph_advance(&self, c: char) -> Option<u16> {
        self.face.as_ref().and_then(|face| {
            let glyph_id = face.glyph_index(c)?;
            face.glyph_hor_advance(glyph_id)
        })
    }

    /// Font units per em
    pub fn units_per_em(&self) -> u16 {
        self.face
            .as_ref()
            .map(|face| face.units_per_em())
            .unwrap_or(1000)
    }

    /// Font ascender in font units
    pub fn ascender(&self) -> i16 {
        self.face
            .as_ref()
            .map(|face| face.ascender())
            .unwrap_or(800)
    }

    /// Font descender in font units
    pub fn descender(&self) -> i16 {
        self.face
            .as_ref()
            .map(|face| face.descender())
            .unwrap_or(-200)
    }

    /// Width of a string in font units
    pub fn text_width(&self, text: &str) -> u32 {
        text.chars()
            .filter_map(|c| self.glyph_advance(c))
            .map(u32::from)
            .sum()
    }

    /// Width of a string in points at the given font size
    pub fn text_width_points(&self, text: &str, font_size: f32) -> f32 {
        (self.text_width(text) as f32 / self.units_per_em() as f32) * font_size
    }

    /// Encode text as a hex string of glyph IDs for the Tj operator
    pub fn encode_text_hex(&self, text: &str) -> String {
        let mut result = String::new();
        for c in text.chars() {
            let gid = self.glyph_id(c).unwrap_or(0);
            result.push_str(&format!("{gid:04X}"));
        }
        format!("<{result}>")
    }

    /// Generate all PDF objects needed to embed this font
    ///
    /// Cross-references between the dictionaries are placeholders; the
    /// document wires them up when the objects are added.
    pub fn to_pdf_objects(&self) -> Result<FontObjects> {
        let font_name = Object::Name(self.name.clone().into());

        let tounicode_content = self.generate_tounicode_cmap();
        let tounicode_stream = Stream::new(
            Dictionary::from_iter(vec![
                ("Type", "CMap".into()),
                ("Length", (tounicode_content.len() as i32).into()),
            ]),
            tounicode_content.into_bytes(),
        );

        let font_file_stream = Stream::new(
            Dictionary::from_iter(vec![(
                "Length1",
                (self.data.len() as i32).into(),
            )]),
            self.data.clone(),
        );

        let units_per_em = self.units_per_em() as i32;
        let ascender = self.ascender();
        let descender = self.descender();

        let font_bbox = vec![
            0.into(),
            descender.into(),
            units_per_em.into(),
            ascender.into(),
        ];

        let font_descriptor = Dictionary::from_iter(vec![
            ("Type", "FontDescriptor".into()),
            ("FontName", font_name.clone()),
            ("Flags", 4.into()), // Symbolic
            ("FontBBox", font_bbox.into()),
            ("ItalicAngle", 0.into()),
            ("Ascent", ascender.into()),
            ("Descent", descender.into()),
            ("CapHeight", ascender.into()),
            ("StemV", 80.into()),
            ("FontFile2", Object::Reference((0, 0))),
        ]);

        let cid_system_info = Dictionary::from_iter(vec![
            ("Registry", Object::string_literal("Adobe")),
            ("Ordering", Object::string_literal("Identity")),
            ("Supplement", 0.into()),
        ]);

        let cid_font = Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "CIDFontType2".into()),
            ("BaseFont", font_name.clone()),
            ("CIDSystemInfo", cid_system_info.into()),
            ("FontDescriptor", Object::Reference((0, 0))),
            ("W", self.generate_widths_array().into()),
            ("DW", 1000.into()),
        ]);

        let type0_font = Dictionary::from_iter(vec![
            ("Type", "Font".into()),
            ("Subtype", "Type0".into()),
            ("BaseFont", font_name),
            ("Encoding", "Identity-H".into()),
            ("DescendantFonts", vec![Object::Reference((0, 0))].into()),
            ("ToUnicode", Object::Reference((0, 0))),
        ]);

        Ok(FontObjects {
            type0_font,
            cid_font,
            font_descriptor,
            font_file_stream,
            tounicode_stream,
        })
    }

    /// Build the /W array mapping used glyph IDs to advance widths
    fn generate_widths_array(&self) -> Vec<Object> {
        let mut widths = Vec::new();
        let face = match &self.face {
            Some(f) => f,
            None => return widths,
        };

        let mut gids: Vec<u16> = self
            .used_chars
            .iter()
            .filter_map(|&c| self.glyph_id(c))
            .collect();
        gids.sort_unstable();
        gids.dedup();

        // Individual [gid [width]] pairs; less compact than ranges but
        // correct for any glyph distribution.
        for gid in gids {
            let advance = face.glyph_hor_advance(ttf_parser::GlyphId(gid)).unwrap_or(1000);
            widths.push(gid.into());
            widths.push(vec![advance.into()].into());
        }

        widths
    }

    /// Build the ToUnicode CMap so extracted text maps back to Unicode
    fn generate_tounicode_cmap(&self) -> String {
        let mut cmap = String::new();

        cmap.push_str("/CIDInit /ProcSet findresource begin\n");
        cmap.push_str("12 dict begin\n");
        cmap.push_str("begincmap\n");
        cmap.push_str("/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n");
        cmap.push_str("/CMapName /Adobe-Identity-UCS def\n");
        cmap.push_str("/CMapType 2 def\n");
        cmap.push_str("1 begincodespacerange\n");
        cmap.push_str("<0000> <FFFF>\n");
        cmap.push_str("endcodespacerange\n");

        let chars: Vec<char> = self.used_chars.iter().copied().collect();
        // bfchar sections are limited to 100 entries per the PDF spec
        for chunk in chars.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
            for c in chunk {
                let gid = self.glyph_id(*c).unwrap_or(0);
                cmap.push_str(&format!("<{gid:04X}> <{:04X}>\n", *c as u32));
            }
            cmap.push_str("endbfchar\n");
        }

        cmap.push_str("endcmap\n");
        cmap.push_str("CMapName currentdict /CMap defineresource pop\n");
        cmap.push_str("end\n");
        cmap.push_str("end\n");

        cmap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unparsed_typeface() -> Typeface {
        Typeface {
            name: "test".to_string(),
            data: vec![0u8; 100],
            used_chars: BTreeSet::new(),
            face: None,
        }
    }

    #[test]
    fn test_note_chars_dedups() {
        let mut font = unparsed_typeface();
        font.note_chars("Pedro Osório");
        // 12 chars, but the repeated 'r' and 'o' collapse
        assert_eq!(font.used_chars.len(), 10);
        assert!(font.used_chars.contains(&'P'));
        assert!(font.used_chars.contains(&'ó'));
    }

    #[test]
    fn test_metric_defaults_without_face() {
        let font = unparsed_typeface();
        assert_eq!(font.units_per_em(), 1000);
        assert_eq!(font.ascender(), 800);
        assert_eq!(font.descender(), -200);
        assert_eq!(font.text_width("abc"), 0);
        assert_eq!(font.text_width_points("abc", 11.0), 0.0);
    }

    #[test]
    fn test_encode_text_hex_without_face() {
        let font = unparsed_typeface();
        assert_eq!(font.encode_text_hex(""), "<>");
        // No face means every character falls back to GID 0
        assert_eq!(font.encode_text_hex("A"), "<0000>");
        assert_eq!(font.encode_text_hex("AB"), "<00000000>");
    }

    #[test]
    fn test_to_pdf_objects() {
        let mut font = unparsed_typeface();
        font.note_chars("ITBI");

        let objects = font.to_pdf_objects().expect("pdf objects");
        assert!(!objects.type0_font.is_empty());
        assert!(!objects.cid_font.is_empty());
        assert!(!objects.font_descriptor.is_empty());
        assert!(!objects.font_file_stream.content.is_empty());
        assert!(!objects.tounicode_stream.content.is_empty());
    }

    #[test]
    fn test_tounicode_cmap_accented_chars() {
        let mut font = unparsed_typeface();
        font.note_chars("Osório");

        let cmap = font.generate_tounicode_cmap();
        assert!(cmap.contains("begincmap"));
        assert!(cmap.contains("endcmap"));
        // ó is U+00F3; without a face it maps from GID 0
        assert!(cmap.contains("<0000> <00F3>"));
    }

    #[test]
    fn test_tounicode_cmap_empty() {
        let font = unparsed_typeface();
        let cmap = font.generate_tounicode_cmap();
        assert!(cmap.contains("/CIDInit"));
        assert!(!cmap.contains("beginbfchar"));
    }

    #[test]
    fn test_from_bytes_rejects_garbage() {
        assert!(Typeface::from_bytes("bad", &[0u8; 16]).is_err());
    }
}
