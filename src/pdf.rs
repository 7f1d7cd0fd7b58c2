//! Minimal PDF 1.4 writer for text-only documents
//!
//! Pages hold positioned text runs in a single font. The font is either one of
//! the standard Type1 fonts (WinAnsi, Latin-1 only) or a TrueType program
//! embedded as a CID font with Identity-H encoding, which covers any script
//! the font has glyphs for. The output carries no timestamps or identifiers
//! and is identical for identical input.

use crate::error::{ReconError, Result};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use ttf_parser::Face;

pub const A4_WIDTH: f64 = 595.28;
pub const A4_HEIGHT: f64 = 841.89;

/// Font shared by every run of a document
#[derive(Debug, Clone, PartialEq)]
pub enum Font {
    /// Standard Type1 font by base name
    Standard(&'static str),
    Embedded(EmbeddedFont),
}

impl Font {
    pub fn times_roman() -> Self {
        Font::Standard("Times-Roman")
    }

    pub fn base_name(&self) -> &str {
        match self {
            Font::Standard(name) => name,
            Font::Embedded(font) => font.name(),
        }
    }
}

/// TrueType font program with the metrics needed to describe it
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedFont {
    name: String,
    data: Vec<u8>,
    units_per_em: u16,
    bbox: [i16; 4],
    ascent: i16,
    descent: i16,
    cap_height: i16,
    /// char -> (glyph id, advance width in font units)
    glyphs: HashMap<char, (u16, u16)>,
    /// Drawn for characters the font has no glyph for
    fallback: (u16, u16),
}

impl EmbeddedFont {
    /// Read a `.ttf` file; the PostScript name is derived from the file stem
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read(path).map_err(|e| {
            ReconError::config(format!("cannot read font '{}': {}", path.display(), e))
        })?;
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        Self::from_bytes(stem, data)
            .map_err(|e| ReconError::config(format!("font '{}': {}", path.display(), e)))
    }

    pub fn from_bytes(name: &str, data: Vec<u8>) -> Result<Self> {
        let (units_per_em, bbox, ascent, descent, cap_height, glyphs) = {
            let face = Face::parse(&data, 0)
                .map_err(|e| ReconError::config(format!("invalid TrueType data: {}", e)))?;

            let mut glyphs = HashMap::new();
            if let Some(cmap) = face.tables().cmap {
                for subtable in cmap.subtables {
                    if !subtable.is_unicode() {
                        continue;
                    }
                    subtable.codepoints(|code_point| {
                        let Some(c) = char::from_u32(code_point) else {
                            return;
                        };
                        if let Some(glyph) = face.glyph_index(c) {
                            let advance = face.glyph_hor_advance(glyph).unwrap_or(0);
                            glyphs.entry(c).or_insert((glyph.0, advance));
                        }
                    });
                }
            }

            let bbox = face.global_bounding_box();
            (
                face.units_per_em(),
                [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max],
                face.ascender(),
                face.descender(),
                face.capital_height().unwrap_or_else(|| face.ascender()),
                glyphs,
            )
        };

        if units_per_em == 0 {
            return Err(ReconError::config("font reports zero units per em"));
        }
        if glyphs.is_empty() {
            return Err(ReconError::config("font has no Unicode character map"));
        }

        let fallback = glyphs.get(&'?').copied().unwrap_or((0, 0));
        Ok(Self {
            name: pdf_name(name),
            data,
            units_per_em,
            bbox,
            ascent,
            descent,
            cap_height,
            glyphs,
            fallback,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.glyphs.get(&c).map(|(glyph, _)| *glyph)
    }

    /// Scale font units to the 1000-unit text space
    fn scale(&self, value: i64) -> i64 {
        value * 1000 / i64::from(self.units_per_em)
    }
}

/// One string drawn at a baseline position
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub runs: Vec<TextRun>,
}

impl Page {
    pub fn text(&mut self, x: f64, y: f64, size: f64, text: impl Into<String>) {
        self.runs.push(TextRun { x, y, size, text: text.into() });
    }

    /// Content stream; glyphs drawn with an embedded font are recorded in `used`
    fn content_stream(&self, font: &Font, used: &mut BTreeMap<u16, (u16, char)>) -> Vec<u8> {
        let mut out = Vec::new();
        for run in &self.runs {
            out.extend_from_slice(
                format!("BT /F1 {} Tf {} {} Td ", number(run.size), number(run.x), number(run.y)).as_bytes(),
            );
            match font {
                Font::Standard(_) => {
                    out.push(b'(');
                    out.extend_from_slice(&encode_text(&run.text));
                    out.push(b')');
                }
                Font::Embedded(embedded) => {
                    out.push(b'<');
                    out.extend_from_slice(encode_glyphs(embedded, &run.text, used).as_bytes());
                    out.push(b'>');
                }
            }
            out.extend_from_slice(b" Tj ET\n");
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub width: f64,
    pub height: f64,
    pub font: Font,
    pub pages: Vec<Page>,
}

impl Document {
    pub fn new(width: f64, height: f64, font: Font) -> Self {
        Self { width, height, font, pages: Vec::new() }
    }

    /// Append an empty page and return it
    pub fn add_page(&mut self) -> &mut Page {
        self.pages.push(Page::default());
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Serialize the document.
    ///
    /// Object layout: 1 catalog, 2 page tree, 3 font, then a page object and
    /// its content stream for every page. An embedded font appends its CID
    /// font, descriptor, font program and ToUnicode map after the pages.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = Vec::new();

        let mut used = BTreeMap::new();
        let streams: Vec<Vec<u8>> = self
            .pages
            .iter()
            .map(|page| page.content_stream(&self.font, &mut used))
            .collect();
        let font_base = 4 + 2 * self.pages.len();

        out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

        let kids = (0..self.pages.len())
            .map(|i| format!("{} 0 R", 4 + 2 * i))
            .collect::<Vec<_>>()
            .join(" ");

        push_object(&mut out, &mut offsets, b"<< /Type /Catalog /Pages 2 0 R >>");
        push_object(
            &mut out,
            &mut offsets,
            format!("<< /Type /Pages /Kids [{}] /Count {} >>", kids, self.pages.len()).as_bytes(),
        );
        let font_dict = match &self.font {
            Font::Standard(name) => format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                name
            ),
            Font::Embedded(font) => format!(
                "<< /Type /Font /Subtype /Type0 /BaseFont /{} /Encoding /Identity-H \
                 /DescendantFonts [{} 0 R] /ToUnicode {} 0 R >>",
                font.name,
                font_base,
                font_base + 3
            ),
        };
        push_object(&mut out, &mut offsets, font_dict.as_bytes());

        for (i, stream) in streams.iter().enumerate() {
            let content_id = 5 + 2 * i;
            push_object(
                &mut out,
                &mut offsets,
                format!(
                    "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
                     /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
                    number(self.width),
                    number(self.height),
                    content_id
                )
                .as_bytes(),
            );
            push_object(
                &mut out,
                &mut offsets,
                &stream_object(&format!("/Length {}", stream.len()), stream),
            );
        }

        if let Font::Embedded(font) = &self.font {
            push_embedded_font(&mut out, &mut offsets, font, font_base, &used);
        }

        let xref_offset = out.len();
        out.extend_from_slice(format!("xref\n0 {}\n", offsets.len() + 1).as_bytes());
        out.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &offsets {
            out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
        out.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                offsets.len() + 1,
                xref_offset
            )
            .as_bytes(),
        );

        out
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_bytes())?;
        Ok(())
    }
}

fn push_object(out: &mut Vec<u8>, offsets: &mut Vec<usize>, body: &[u8]) {
    offsets.push(out.len());
    out.extend_from_slice(format!("{} 0 obj\n", offsets.len()).as_bytes());
    out.extend_from_slice(body);
    out.extend_from_slice(b"\nendobj\n");
}

fn stream_object(dict_entries: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!("<< {} >>\nstream\n", dict_entries).into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(b"\nendstream");
    body
}

/// CID font, descriptor, font program and ToUnicode map, numbered from `base`
fn push_embedded_font(
    out: &mut Vec<u8>,
    offsets: &mut Vec<usize>,
    font: &EmbeddedFont,
    base: usize,
    used: &BTreeMap<u16, (u16, char)>,
) {
    let widths = used
        .iter()
        .map(|(glyph, (advance, _))| format!("{} [{}]", glyph, font.scale(i64::from(*advance))))
        .collect::<Vec<_>>()
        .join(" ");

    push_object(
        out,
        offsets,
        format!(
            "<< /Type /Font /Subtype /CIDFontType2 /BaseFont /{} \
             /CIDSystemInfo << /Registry (Adobe) /Ordering (Identity) /Supplement 0 >> \
             /FontDescriptor {} 0 R /CIDToGIDMap /Identity /DW 1000 /W [{}] >>",
            font.name,
            base + 1,
            widths
        )
        .as_bytes(),
    );

    let [x_min, y_min, x_max, y_max] = font.bbox.map(|v| font.scale(i64::from(v)));
    push_object(
        out,
        offsets,
        format!(
            "<< /Type /FontDescriptor /FontName /{} /Flags 32 /FontBBox [{} {} {} {}] \
             /ItalicAngle 0 /Ascent {} /Descent {} /CapHeight {} /StemV 80 /FontFile2 {} 0 R >>",
            font.name,
            x_min,
            y_min,
            x_max,
            y_max,
            font.scale(i64::from(font.ascent)),
            font.scale(i64::from(font.descent)),
            font.scale(i64::from(font.cap_height)),
            base + 2
        )
        .as_bytes(),
    );

    push_object(
        out,
        offsets,
        &stream_object(
            &format!("/Length {} /Length1 {}", font.data.len(), font.data.len()),
            &font.data,
        ),
    );

    let cmap = to_unicode_cmap(used);
    push_object(
        out,
        offsets,
        &stream_object(&format!("/Length {}", cmap.len()), cmap.as_bytes()),
    );
}

/// Glyph-to-Unicode map so viewers can search and copy the text
fn to_unicode_cmap(used: &BTreeMap<u16, (u16, char)>) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n12 dict begin\nbegincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n/CMapType 2 def\n\
         1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
    );

    let entries: Vec<(&u16, &(u16, char))> = used.iter().collect();
    // bfchar blocks hold at most 100 entries
    for chunk in entries.chunks(100) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (glyph, (_, c)) in chunk {
            let mut units = [0u16; 2];
            let utf16: String = c.encode_utf16(&mut units).iter().map(|u| format!("{:04X}", u)).collect();
            cmap.push_str(&format!("<{:04X}> <{}>\n", glyph, utf16));
        }
        cmap.push_str("endbfchar\n");
    }

    cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend");
    cmap
}

/// Fixed two-decimal form with trailing zeros removed
fn number(value: f64) -> String {
    let s = format!("{:.2}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// PDF name token: ASCII letters, digits and hyphens only
fn pdf_name(raw: &str) -> String {
    let name: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if name.is_empty() {
        "EmbeddedFont".to_string()
    } else {
        name
    }
}

/// Encode a string literal body: Latin-1 bytes, `?` for anything else,
/// delimiters escaped, control characters dropped.
pub fn encode_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '(' | ')' => {
                out.push(b'\\');
                out.push(c as u8);
            }
            c if (c as u32) < 0x20 => {}
            c if (0x80..0xA0).contains(&(c as u32)) => out.push(b'?'),
            c if (c as u32) <= 0xFF => out.push(c as u32 as u8),
            _ => out.push(b'?'),
        }
    }
    out
}

/// Hex string of two-byte glyph ids; characters without a glyph use the
/// font's `?`.
pub fn encode_glyphs(font: &EmbeddedFont, text: &str, used: &mut BTreeMap<u16, (u16, char)>) -> String {
    let mut out = String::with_capacity(text.len() * 4);
    for c in text.chars() {
        if (c as u32) < 0x20 {
            continue;
        }
        let (glyph, advance, mapped) = match font.glyphs.get(&c) {
            Some((glyph, advance)) => (*glyph, *advance, c),
            None => (font.fallback.0, font.fallback.1, '?'),
        };
        used.entry(glyph).or_insert((advance, mapped));
        out.push_str(&format!("{:04X}", glyph));
    }
    out
}
