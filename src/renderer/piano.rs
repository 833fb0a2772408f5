//! Piano voicing chart — a small keyboard icon per chord with a dot on
//! every voiced key, packed left to right into rows.

use crate::error::LayoutError;
use crate::model::{is_black_key, ChordList, PianoVoicing};
use crate::style::{Size, Style};
use super::constants::*;
use super::draw::{write_text, Align, Canvas, Paint};

/// The run of keys drawn for one chord, as unbounded positions in the
/// 12-key cycle (position 12 is the A above position 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRun {
    pub start: i32,
    pub end: i32,
    /// Position of every voiced note, in voicing order.
    pub notes: Vec<i32>,
}

impl KeyRun {
    /// Smallest run holding every note of the voicing with one key of
    /// padding either side, widened so it starts and ends on white keys.
    ///
    /// Notes are read lowest first: each one sits on the first matching key
    /// above the previous note.
    pub fn for_voicing(voicing: &PianoVoicing) -> Self {
        let mut notes: Vec<i32> = Vec::with_capacity(voicing.notes().len());
        for note in voicing.notes() {
            let mut position = note.key as i32;
            if let Some(&previous) = notes.last() {
                while position <= previous {
                    position += 12;
                }
            }
            notes.push(position);
        }

        let lowest = notes.first().copied().unwrap_or(0);
        let highest = notes.last().copied().unwrap_or(0);

        let mut start = lowest - 1;
        while is_black_key(start) {
            start -= 1;
        }
        let mut end = highest + 1;
        while is_black_key(end) {
            end += 1;
        }

        Self { start, end, notes }
    }

    pub fn white_keys(&self) -> usize {
        (self.start..=self.end).filter(|&p| !is_black_key(p)).count()
    }

    /// Icon width: black keys overlay the whites and take no slot.
    pub fn width(&self) -> f64 {
        self.white_keys() as f64 * WHITE_KEY_WIDTH
    }

    /// Number of white keys strictly left of `position`.
    fn whites_before(&self, position: i32) -> usize {
        (self.start..position).filter(|&p| !is_black_key(p)).count()
    }

    /// Horizontal centre of a key within the icon.
    pub fn key_centre(&self, position: i32) -> f64 {
        let whites = self.whites_before(position) as f64;
        if is_black_key(position) {
            whites * WHITE_KEY_WIDTH
        } else {
            (whites + 0.5) * WHITE_KEY_WIDTH
        }
    }
}

#[derive(Debug, Clone)]
pub struct PianoChart<'a> {
    chords: Vec<(&'a str, &'a PianoVoicing, KeyRun)>,
}

impl<'a> PianoChart<'a> {
    /// Chart of every chord in the list that has a piano voicing.
    pub fn new(chords: &'a ChordList) -> Self {
        let chords = chords
            .iter()
            .filter_map(|(_, c)| {
                c.voicings
                    .piano
                    .as_ref()
                    .map(|v| (c.name.as_str(), v, KeyRun::for_voicing(v)))
            })
            .collect();
        Self { chords }
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    /// Group chord indices into rows by accumulated icon width.
    pub fn pack_rows(&self, avail_width: f64) -> Result<Vec<Vec<usize>>, LayoutError> {
        let mut rows: Vec<Vec<usize>> = Vec::new();
        let mut current: Vec<usize> = Vec::new();
        let mut x = 0.0;

        for (i, (_, _, run)) in self.chords.iter().enumerate() {
            let width = run.width();
            if width > avail_width + FIT_EPSILON {
                return Err(LayoutError::TooNarrow {
                    element: "piano chart",
                    available: avail_width,
                    required: width,
                });
            }
            if !current.is_empty() && x + width > avail_width + FIT_EPSILON {
                rows.push(std::mem::take(&mut current));
                x = 0.0;
            }
            current.push(i);
            x += width + PIANO_CHORD_SPACING;
        }
        if !current.is_empty() {
            rows.push(current);
        }
        Ok(rows)
    }

    fn row_height(style: &Style) -> f64 {
        style.leading(PIANO_NAME_FONT_SIZE) + WHITE_KEY_HEIGHT + style.leading(PIANO_LABEL_FONT_SIZE)
    }

    fn row_width(&self, row: &[usize]) -> f64 {
        let icons: f64 = row.iter().map(|&i| self.chords[i].2.width()).sum();
        icons + PIANO_CHORD_SPACING * row.len().saturating_sub(1) as f64
    }

    pub fn wrap(&self, style: &Style, avail_width: f64) -> Result<Size, LayoutError> {
        let rows = self.pack_rows(avail_width)?;
        if rows.is_empty() {
            return Ok(Size::default());
        }
        let width = if rows.len() == 1 { self.row_width(&rows[0]) } else { avail_width };
        let height = Self::row_height(style) * rows.len() as f64 + PIANO_ROW_GAP * (rows.len() - 1) as f64;
        Ok(Size::new(width, height))
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, style: &Style, avail_width: f64) -> Result<(), LayoutError> {
        let row_pitch = Self::row_height(style) + PIANO_ROW_GAP;

        for (r, row) in self.pack_rows(avail_width)?.iter().enumerate() {
            let top = r as f64 * row_pitch;
            let mut x = 0.0;
            for &i in row {
                let (name, voicing, run) = &self.chords[i];
                draw_icon(canvas, style, name, voicing, run, x, top);
                x += run.width() + PIANO_CHORD_SPACING;
            }
        }
        Ok(())
    }
}

fn draw_icon(
    canvas: &mut dyn Canvas,
    style: &Style,
    name: &str,
    voicing: &PianoVoicing,
    run: &KeyRun,
    x: f64,
    top: f64,
) {
    let name_height = write_text(canvas, style, name, PIANO_NAME_FONT_SIZE, top, x + run.width() / 2.0, Align::Centre);
    let keys_top = top + name_height;

    for position in (run.start..=run.end).filter(|&p| !is_black_key(p)) {
        let left = x + run.key_centre(position) - WHITE_KEY_WIDTH / 2.0;
        canvas.rect(left, keys_top, WHITE_KEY_WIDTH, WHITE_KEY_HEIGHT, Paint::Outlined);
    }
    // Black keys go on top of the whites they straddle.
    for position in (run.start..=run.end).filter(|&p| is_black_key(p)) {
        let left = x + run.key_centre(position) - BLACK_KEY_WIDTH / 2.0;
        canvas.rect(left, keys_top, BLACK_KEY_WIDTH, BLACK_KEY_HEIGHT, Paint::Fill);
    }

    for &position in &run.notes {
        let cx = x + run.key_centre(position);
        if is_black_key(position) {
            canvas.circle(cx, keys_top + BLACK_KEY_HEIGHT / 2.0, KEY_DOT_RADIUS, Paint::FillInverted);
        } else {
            canvas.circle(cx, keys_top + WHITE_KEY_HEIGHT - KEY_DOT_INSET, KEY_DOT_RADIUS, Paint::Fill);
        }
    }

    if let (Some(&first), Some(note)) = (run.notes.first(), voicing.notes().first()) {
        let cx = x + run.key_centre(first);
        write_text(
            canvas,
            style,
            &note.spelling,
            PIANO_LABEL_FONT_SIZE,
            keys_top + WHITE_KEY_HEIGHT,
            cx,
            Align::Centre,
        );
    }
}
