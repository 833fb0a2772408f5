//! Page flow — builds the story of flowables for a document and places
//! them top to bottom across pages, splitting progressions at page breaks.

use std::collections::VecDeque;

use crate::error::LayoutError;
use crate::model::{Document, Instrument};
use crate::style::{Size, Style};
use super::constants::*;
use super::flowable::{Flowable, PageBreak, Placement};
use super::guitar::GuitarChart;
use super::header::{Heading, TitleBlock};
use super::piano::PianoChart;
use super::progression::ChordProgression;

// ═══════════════════════════════════════════════════════════════════════
// Layout structures
// ═══════════════════════════════════════════════════════════════════════

/// A flowable with its final page position (top-left corner, points).
#[derive(Debug, Clone)]
pub struct PlacedFlowable<'a> {
    pub flowable: Flowable<'a>,
    pub x: f64,
    pub y: f64,
    pub size: Size,
}

#[derive(Debug, Clone, Default)]
pub struct PageLayout<'a> {
    pub flowables: Vec<PlacedFlowable<'a>>,
}

#[derive(Debug, Clone)]
pub struct DocumentLayout<'a> {
    pub pages: Vec<PageLayout<'a>>,
}

enum FlowItem<'a> {
    Content(Flowable<'a>),
    Break(PageBreak),
}

// ═══════════════════════════════════════════════════════════════════════
// Story
// ═══════════════════════════════════════════════════════════════════════

/// Flowables for a document, in page order: title, voicing charts, then a
/// heading and progression per non-empty section.
pub fn build_story(document: &Document) -> Vec<Flowable<'_>> {
    let mut story = Vec::new();

    if !document.title.is_empty() {
        story.push(Flowable::Title(TitleBlock::new(document)));
    }
    if document.has_voicings(Instrument::Guitar) {
        story.push(Flowable::Heading(Heading::new(GUITAR_HEADING)));
        story.push(Flowable::Guitar(GuitarChart::new(&document.chords)));
    }
    if document.has_voicings(Instrument::Piano) {
        story.push(Flowable::Heading(Heading::new(PIANO_HEADING)));
        story.push(Flowable::Piano(PianoChart::new(&document.chords)));
    }

    for (i, section) in document.sections.iter().enumerate() {
        if section.blocks.is_empty() {
            continue;
        }
        let name = if section.name.is_empty() { format!("Section {}", i + 1) } else { section.name.clone() };
        story.push(Flowable::Heading(Heading::new(name)));
        story.push(Flowable::Progression(ChordProgression::new(
            &document.chords,
            section.blocks.clone(),
            document.time_signature,
        )));
    }

    story
}

// ═══════════════════════════════════════════════════════════════════════
// Composer
// ═══════════════════════════════════════════════════════════════════════

/// Place every flowable on a running cursor, opening a new page when one
/// does not fit. Progressions that do not fit are split on whole grid
/// lines; anything else moves to the next page whole. A heading is kept
/// with the flowable after it: if that one would have to move to the next
/// page, the heading moves too.
pub fn compose<'a>(story: Vec<Flowable<'a>>, style: &Style) -> Result<DocumentLayout<'a>, LayoutError> {
    let frame = style.frame();
    let (origin_x, origin_y) = style.frame_origin();
    let separator = style.separator_pt();

    let mut queue: VecDeque<FlowItem<'a>> = story.into_iter().map(FlowItem::Content).collect();
    let mut pages = vec![PageLayout::default()];
    let mut cursor = 0.0;

    while let Some(item) = queue.pop_front() {
        let flowable = match item {
            FlowItem::Break(PageBreak) => {
                log::debug!("page break after page {}", pages.len());
                pages.push(PageLayout::default());
                cursor = 0.0;
                continue;
            }
            FlowItem::Content(flowable) => flowable,
        };

        let page_is_fresh = pages.last().map_or(true, |p| p.flowables.is_empty());

        match flowable.place(style, frame.width, frame.height - cursor)? {
            Placement::FitsWhole(size) => {
                if !page_is_fresh && matches!(flowable, Flowable::Heading(_)) {
                    let below = frame.height - cursor - size.height - separator;
                    if let Some(FlowItem::Content(next)) = queue.front() {
                        if let Placement::Unsplittable(_) = next.place(style, frame.width, below)? {
                            log::debug!("{} moves to page {} with the {}", flowable.name(), pages.len() + 1, next.name());
                            queue.push_front(FlowItem::Content(flowable));
                            queue.push_front(FlowItem::Break(PageBreak));
                            continue;
                        }
                    }
                }
                if let Some(page) = pages.last_mut() {
                    page.flowables.push(PlacedFlowable {
                        flowable,
                        x: origin_x,
                        y: origin_y + cursor,
                        size,
                    });
                }
                cursor += size.height + separator;
            }
            Placement::SplitInto { first, page_break, rest } => {
                queue.push_front(FlowItem::Content(rest));
                queue.push_front(FlowItem::Break(page_break));
                queue.push_front(FlowItem::Content(first));
            }
            Placement::Unsplittable(size) => {
                if page_is_fresh {
                    return Err(LayoutError::PageOverflow {
                        element: flowable.name(),
                        height: size.height,
                        page_height: frame.height,
                    });
                }
                log::debug!(
                    "{} ({:.1}pt) does not fit in {:.1}pt, moving to page {}",
                    flowable.name(),
                    size.height,
                    frame.height - cursor,
                    pages.len() + 1
                );
                queue.push_front(FlowItem::Content(flowable));
                queue.push_front(FlowItem::Break(PageBreak));
            }
        }
    }

    log::debug!("composed {} page(s)", pages.len());
    Ok(DocumentLayout { pages })
}
