//! The measure / place / draw protocol shared by every page element.

use crate::error::LayoutError;
use crate::style::{Size, Style};
use super::constants::FIT_EPSILON;
use super::draw::Canvas;
use super::guitar::GuitarChart;
use super::header::{Heading, TitleBlock};
use super::measure::TextMeasure;
use super::piano::PianoChart;
use super::progression::ChordProgression;

#[derive(Debug, Clone)]
pub enum Flowable<'a> {
    Title(TitleBlock<'a>),
    Heading(Heading),
    Guitar(GuitarChart<'a>),
    Piano(PianoChart<'a>),
    Progression(ChordProgression<'a>),
}

/// Marker between the two halves of a split flowable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBreak;

/// Outcome of offering a flowable the space left on the current page.
#[derive(Debug, Clone)]
pub enum Placement<'a> {
    FitsWhole(Size),
    /// `first` fits the offered height; `rest` continues after the break.
    SplitInto { first: Flowable<'a>, page_break: PageBreak, rest: Flowable<'a> },
    /// Too tall for the offered height and cannot be divided.
    Unsplittable(Size),
}

impl<'a> Flowable<'a> {
    pub fn name(&self) -> &'static str {
        match self {
            Flowable::Title(_) => "title block",
            Flowable::Heading(_) => "heading",
            Flowable::Guitar(_) => "guitar chart",
            Flowable::Piano(_) => "piano chart",
            Flowable::Progression(_) => "chord progression",
        }
    }

    /// Footprint at the given content width.
    pub fn wrap(&self, style: &Style, avail_width: f64) -> Result<Size, LayoutError> {
        let size = match self {
            Flowable::Title(t) => t.wrap(style, avail_width),
            Flowable::Heading(h) => h.wrap(style, avail_width),
            Flowable::Guitar(g) => g.wrap(style, avail_width)?,
            Flowable::Piano(p) => p.wrap(style, avail_width)?,
            Flowable::Progression(p) => p.wrap(style, avail_width)?,
        };
        log::trace!("{} wraps to {:.1} x {:.1}", self.name(), size.width, size.height);
        Ok(size)
    }

    pub fn place(&self, style: &Style, avail_width: f64, avail_height: f64) -> Result<Placement<'a>, LayoutError> {
        let size = self.wrap(style, avail_width)?;
        if size.height <= avail_height + FIT_EPSILON {
            return Ok(Placement::FitsWhole(size));
        }

        if let Flowable::Progression(progression) = self {
            if let Some((first, rest)) = progression.split(style, avail_width, avail_height)? {
                return Ok(Placement::SplitInto {
                    first: Flowable::Progression(first),
                    page_break: PageBreak,
                    rest: Flowable::Progression(rest),
                });
            }
        }
        Ok(Placement::Unsplittable(size))
    }

    /// Draw at the canvas origin, which is the flowable's top-left corner.
    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        style: &Style,
        avail_width: f64,
        measure: &dyn TextMeasure,
    ) -> Result<(), LayoutError> {
        match self {
            Flowable::Title(t) => t.draw(canvas, style, avail_width),
            Flowable::Heading(h) => h.draw(canvas, style),
            Flowable::Guitar(g) => g.draw(canvas, style, avail_width, measure)?,
            Flowable::Piano(p) => p.draw(canvas, style, avail_width)?,
            Flowable::Progression(p) => p.draw(canvas, style, avail_width)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Beats, Block, ChordList};

    fn progression(chords: &ChordList, beats: u32) -> Flowable<'_> {
        let blocks = vec![Block::new(Beats::from_whole(beats), None, None).unwrap()];
        Flowable::Progression(ChordProgression::new(chords, blocks, 4))
    }

    #[test]
    fn fits_whole_when_there_is_room() {
        let style = Style::default();
        let chords = ChordList::new();
        let flow = progression(&chords, 16);
        let frame = style.frame();
        assert!(matches!(flow.place(&style, frame.width, frame.height).unwrap(), Placement::FitsWhole(_)));
    }

    #[test]
    fn progression_splits_with_a_break() {
        let style = Style::default();
        let chords = ChordList::new();
        let flow = progression(&chords, 400);
        let frame = style.frame();

        match flow.place(&style, frame.width, frame.height).unwrap() {
            Placement::SplitInto { first: Flowable::Progression(a), page_break, rest: Flowable::Progression(b) } => {
                assert_eq!(page_break, PageBreak);
                assert_eq!(a.total_beats() + b.total_beats(), Beats::from_whole(400));
                assert!(a.wrap(&style, frame.width).unwrap().height <= frame.height);
            }
            other => panic!("expected a split, got {other:?}"),
        }
    }

    #[test]
    fn headings_do_not_split() {
        let style = Style::default();
        let flow = Flowable::Heading(Heading::new("Chorus"));
        assert!(matches!(flow.place(&style, 300.0, 5.0).unwrap(), Placement::Unsplittable(_)));
    }
}
