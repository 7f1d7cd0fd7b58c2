//! Combined PDF view over all category artifacts

use crate::category::Category;
use crate::error::Result;
use crate::pdf::{Document, EmbeddedFont, Font, Page, A4_HEIGHT, A4_WIDTH};
use crate::report::{is_marker_line, read_data_lines, ReportIndex, AGGREGATE_REPORT_NAME};
use std::path::{Path, PathBuf};

pub const DOCUMENT_TITLE: &str = "Comparison report";

/// Serif TrueType fonts tried in order when no font is configured
pub const SYSTEM_FONT_CANDIDATES: [&str; 7] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/dejavu/DejaVuSerif.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
    "/usr/share/fonts/liberation-serif/LiberationSerif-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Times New Roman.ttf",
    "/Library/Fonts/Times New Roman.ttf",
    "C:\\Windows\\Fonts\\times.ttf",
];

/// Page geometry and cursor steps of the aggregate document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub width: f64,
    pub height: f64,
    pub left_margin: f64,
    pub top_margin: f64,
    pub bottom_margin: f64,
    pub heading_size: f64,
    pub body_size: f64,
    pub title_gap: f64,
    pub section_gap: f64,
    pub header_gap: f64,
    pub line_step: f64,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width: A4_WIDTH,
            height: A4_HEIGHT,
            left_margin: 50.0,
            top_margin: 50.0,
            bottom_margin: 50.0,
            heading_size: 12.0,
            body_size: 10.0,
            title_gap: 20.0,
            section_gap: 20.0,
            header_gap: 10.0,
            line_step: 15.0,
        }
    }
}

impl PageLayout {
    fn top(&self) -> f64 {
        self.height - self.top_margin
    }
}

/// One category's surviving lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub lines: Vec<String>,
}

/// Read back every indexed artifact in category order, dropping marker lines
/// and categories left with nothing.
pub fn collect_sections(reports_dir: &Path, index: &ReportIndex) -> Result<Vec<Section>> {
    let mut sections = Vec::new();
    for category in Category::ALL {
        let file_name = match index.get(category.slug()) {
            Some(name) => name,
            None => continue,
        };

        let lines: Vec<String> = read_data_lines(&reports_dir.join(file_name))?
            .into_iter()
            .filter(|line| !is_marker_line(line))
            .collect();

        if lines.is_empty() {
            log::debug!("{}: only marker lines, omitted from aggregate", category);
            continue;
        }
        sections.push(Section { title: category.title().to_string(), lines });
    }
    Ok(sections)
}

/// Baseline position on the current page
struct Cursor<'l> {
    layout: &'l PageLayout,
    y: f64,
}

impl<'l> Cursor<'l> {
    fn new(layout: &'l PageLayout) -> Self {
        Self { layout, y: layout.top() }
    }

    fn shift(&mut self, step: f64) {
        self.y -= step;
    }

    /// Move down and start a new page when the cursor falls below the bottom margin
    fn advance<'d>(&mut self, doc: &'d mut Document, step: f64) -> &'d mut Page {
        self.y -= step;
        if self.y < self.layout.bottom_margin {
            self.y = self.layout.top();
            return doc.add_page();
        }
        last_page(doc)
    }
}

fn last_page(doc: &mut Document) -> &mut Page {
    if doc.pages.is_empty() {
        return doc.add_page();
    }
    let last = doc.pages.len() - 1;
    &mut doc.pages[last]
}

/// Pick the document font.
///
/// A configured font must load. Without one, the first readable system
/// candidate is embedded; if none is found the standard Times-Roman is used
/// and characters outside Latin-1 are drawn as `?`.
pub fn resolve_font(configured: Option<&Path>) -> Result<Font> {
    if let Some(path) = configured {
        return EmbeddedFont::load(path).map(Font::Embedded);
    }

    for candidate in SYSTEM_FONT_CANDIDATES {
        let path = Path::new(candidate);
        if !path.is_file() {
            continue;
        }
        match EmbeddedFont::load(path) {
            Ok(font) => return Ok(Font::Embedded(font)),
            Err(e) => log::debug!("Skipping font {}: {}", candidate, e),
        }
    }

    log::warn!("No TrueType font found, non-Latin text in the aggregate will show as '?'; set pdf_font in the config");
    Ok(Font::times_roman())
}

/// Lay sections out on pages with a moving baseline cursor
pub fn layout_sections(sections: &[Section], layout: &PageLayout, font: Font) -> Document {
    let mut doc = Document::new(layout.width, layout.height, font);
    let x = layout.left_margin;
    let mut cursor = Cursor::new(layout);

    doc.add_page().text(x, cursor.y, layout.heading_size, DOCUMENT_TITLE);
    cursor.shift(layout.title_gap);

    for section in sections {
        let page = cursor.advance(&mut doc, layout.section_gap);
        page.text(x, cursor.y, layout.heading_size, format!("{}:", section.title));
        cursor.shift(layout.header_gap);

        for line in &section.lines {
            let page = cursor.advance(&mut doc, layout.line_step);
            page.text(x, cursor.y, layout.body_size, line.as_str());
        }
    }

    doc
}

/// Render `report_all.pdf` when at least one section survives filtering.
/// Returns the path of the written document.
pub fn render_aggregate(
    reports_dir: &Path,
    index: &ReportIndex,
    font_path: Option<&Path>,
) -> Result<Option<PathBuf>> {
    let sections = collect_sections(reports_dir, index)?;
    if sections.is_empty() {
        log::info!("No aggregate content, skipping {}", AGGREGATE_REPORT_NAME);
        return Ok(None);
    }

    let font = resolve_font(font_path)?;
    let doc = layout_sections(&sections, &PageLayout::default(), font);
    let path = reports_dir.join(AGGREGATE_REPORT_NAME);
    doc.save(&path)?;
    log::info!(
        "Wrote {} ({} sections, {} pages, font {})",
        AGGREGATE_REPORT_NAME,
        sections.len(),
        doc.page_count(),
        doc.font.base_name()
    );

    Ok(Some(path))
}
