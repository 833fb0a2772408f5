//! Chordsheet renderer — lays a Document out on fixed-size pages and emits
//! positioned draw commands per page.
//!
//! Layout runs in two passes: `layout::compose` measures and places every
//! flowable (splitting progressions at page breaks), then each placed
//! flowable draws into its page's command list. The command lists can be
//! consumed directly, exported as JSON, or turned into one SVG per page.

mod beat_grid;
mod constants;
mod draw;
mod flowable;
mod guitar;
mod header;
mod layout;
mod measure;
mod piano;
mod progression;
mod svg_builder;

use serde::Serialize;

use crate::error::Result;
use crate::model::Document;
use crate::style::{Size, Style};
use svg_builder::page_to_svg;

pub use draw::{Align, Canvas, DrawCommand, DrawList, Paint};
pub use flowable::{Flowable, PageBreak, Placement};
pub use guitar::GuitarChart;
pub use header::{Heading, TitleBlock};
pub use layout::{build_story, compose, DocumentLayout, PageLayout, PlacedFlowable};
pub use measure::{EstimatedMetrics, TextMeasure};
pub use piano::{KeyRun, PianoChart};
pub use progression::ChordProgression;

// ═══════════════════════════════════════════════════════════════════════
// Output structures
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub index: usize,
    pub commands: Vec<DrawCommand>,
}

/// Draw commands for every page, in page-space points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedDocument {
    pub page_size: Size,
    pub font: String,
    pub pages: Vec<Page>,
}

impl RenderedDocument {
    /// Every command paired with the index of the page it belongs to.
    pub fn instructions(&self) -> impl Iterator<Item = (usize, &DrawCommand)> {
        self.pages
            .iter()
            .flat_map(|page| page.commands.iter().map(move |c| (page.index, c)))
    }

    /// One standalone SVG document per page.
    pub fn to_svg_pages(&self) -> Vec<String> {
        self.pages
            .iter()
            .map(|page| page_to_svg(self.page_size.width, self.page_size.height, &self.font, &page.commands))
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════

/// Lay out and draw a document.
///
/// The document is validated first, so a dangling chord reference is
/// reported before any layout starts.
pub fn render_document(document: &Document, style: &Style, measure: &dyn TextMeasure) -> Result<RenderedDocument> {
    document.validate()?;

    let frame = style.frame();
    let layout = compose(build_story(document), style)?;

    let mut pages = Vec::with_capacity(layout.pages.len());
    for (index, page) in layout.pages.iter().enumerate() {
        let mut canvas = DrawList::new();
        for placed in &page.flowables {
            canvas.set_origin(placed.x, placed.y);
            placed.flowable.draw(&mut canvas, style, frame.width, measure)?;
        }
        pages.push(Page { index, commands: canvas.into_commands() });
    }

    Ok(RenderedDocument { page_size: style.page(), font: style.font.clone(), pages })
}

/// Render a document to one SVG string per page, measuring text with
/// [`EstimatedMetrics`].
pub fn render_document_to_svg(document: &Document, style: &Style) -> Result<Vec<String>> {
    let rendered = render_document(document, style, &EstimatedMetrics::default())?;
    Ok(rendered.to_svg_pages())
}

/// Render a document's draw commands as pretty-printed JSON.
pub fn render_document_to_json(document: &Document, style: &Style) -> Result<String> {
    render_document(document, style, &EstimatedMetrics::default())?.to_json()
}
