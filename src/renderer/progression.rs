//! Chord progression — a beat ruler over a grid of block rectangles, one
//! grid line per `width_in_beats` beats. Splits across pages on whole
//! grid lines.

use crate::error::LayoutError;
use crate::model::{total_beats, Beats, Block, ChordList};
use crate::style::{Size, Style};
use super::beat_grid::{place_on_grid, split_at_beat_count};
use super::constants::*;
use super::draw::{write_text, Align, Canvas, Paint};

#[derive(Debug, Clone)]
pub struct ChordProgression<'a> {
    chords: &'a ChordList,
    blocks: Vec<Block>,
    time_signature: u32,
}

impl<'a> ChordProgression<'a> {
    pub fn new(chords: &'a ChordList, blocks: Vec<Block>, time_signature: u32) -> Self {
        Self { chords, blocks, time_signature }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn total_beats(&self) -> Beats {
        total_beats(&self.blocks)
    }

    /// Beats per grid line: the largest even number of whole measures that
    /// fits `avail_width`.
    pub fn width_in_beats(&self, style: &Style, avail_width: f64) -> Result<u32, LayoutError> {
        let pair = 2 * self.time_signature.max(1);
        let pair_width = style.unit_width_pt() * pair as f64;
        let pairs = (avail_width / pair_width).floor();
        if !pairs.is_finite() || pairs < 1.0 {
            return Err(LayoutError::TooNarrow {
                element: "chord progression",
                available: avail_width,
                required: pair_width,
            });
        }
        Ok(pair * pairs as u32)
    }

    /// Height of the beat ruler above the grid.
    pub fn header_height(style: &Style) -> f64 {
        style.pt(style.beats_height)
    }

    /// Number of grid lines the blocks occupy, counting a partial last line.
    pub fn line_count(&self, style: &Style, avail_width: f64) -> Result<u64, LayoutError> {
        let line = Beats::from_whole(self.width_in_beats(style, avail_width)?);
        Ok(self.total_beats().lines_of(line))
    }

    pub fn wrap(&self, style: &Style, avail_width: f64) -> Result<Size, LayoutError> {
        let width_in_beats = self.width_in_beats(style, avail_width)?;
        let lines = self.line_count(style, avail_width)?;
        Ok(Size::new(
            width_in_beats as f64 * style.unit_width_pt(),
            Self::header_height(style) + style.unit_height_pt() * lines as f64,
        ))
    }

    /// Split into the grid lines that fit `avail_height` and the rest.
    ///
    /// `None` when not even one grid line fits, or when everything fits and
    /// there is nothing to split off.
    pub fn split(
        &self,
        style: &Style,
        avail_width: f64,
        avail_height: f64,
    ) -> Result<Option<(Self, Self)>, LayoutError> {
        let width_in_beats = self.width_in_beats(style, avail_width)?;
        let room = (avail_height - Self::header_height(style) + FIT_EPSILON) / style.unit_height_pt();
        if !room.is_finite() || room < 1.0 {
            return Ok(None);
        }

        let line = Beats::from_whole(width_in_beats);
        let target = match line.checked_times(room.floor() as u64) {
            Some(target) if target < self.total_beats() => target,
            _ => return Ok(None),
        };

        let (first, rest) = split_at_beat_count(&self.blocks, line, target)?;
        log::debug!("split progression at {target} beats, {} beats carried over", total_beats(&rest));
        Ok(Some((
            Self::new(self.chords, first, self.time_signature),
            Self::new(self.chords, rest, self.time_signature),
        )))
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, style: &Style, avail_width: f64) -> Result<(), LayoutError> {
        let width_in_beats = self.width_in_beats(style, avail_width)?;
        let unit_width = style.unit_width_pt();
        let unit_height = style.unit_height_pt();
        let header = Self::header_height(style);

        self.draw_ruler(canvas, style, width_in_beats);

        for cell in place_on_grid(&self.blocks, Beats::from_whole(width_in_beats)) {
            let x = cell.column.as_f64() * unit_width;
            let y = header + cell.row as f64 * unit_height;
            let width = cell.block.length().as_f64() * unit_width;
            let centre = x + width / 2.0;

            canvas.rect(x, y, width, unit_height, Paint::Stroke);

            if let Some(chord) = cell.block.chord.and_then(|id| self.chords.get(id)) {
                let size = style.chord_name_font_size;
                let top = y + (unit_height - style.leading(size)) / 2.0;
                write_text(canvas, style, &chord.name, size, top, centre, Align::Centre);
            }
            if let Some(notes) = &cell.block.notes {
                let size = style.notes_font_size;
                let top = y + unit_height - NOTES_OFFSET_FACTOR * size;
                write_text(canvas, style, notes, size, top, centre, Align::Centre);
            }
        }
        Ok(())
    }

    /// Tick per beat, long at each measure start, with the beat number
    /// within the measure over every column.
    fn draw_ruler(&self, canvas: &mut dyn Canvas, style: &Style, width_in_beats: u32) {
        let unit_width = style.unit_width_pt();
        let header = Self::header_height(style);
        let beats_per_measure = self.time_signature.max(1);

        for u in 0..=width_in_beats {
            let x = u as f64 * unit_width;
            let tick = if u % beats_per_measure == 0 { header } else { header / 2.0 };
            canvas.line(x, header, x, header - tick);
            if u == width_in_beats {
                break;
            }
            let label = ((u % beats_per_measure) + 1).to_string();
            write_text(canvas, style, &label, style.beats_font_size, 0.0, x + unit_width / 2.0, Align::Centre);
        }
    }
}
