//! Guitar voicing chart — packs chord columns into rows and draws string
//! lines between the fret symbols.

use crate::error::LayoutError;
use crate::model::{ChordList, GuitarVoicing, GUITAR_STRINGS};
use crate::style::{Size, Style};
use super::constants::*;
use super::draw::{write_text, Align, Canvas};
use super::measure::TextMeasure;

#[derive(Debug, Clone)]
pub struct GuitarChart<'a> {
    chords: Vec<(&'a str, &'a GuitarVoicing)>,
}

impl<'a> GuitarChart<'a> {
    /// Chart of every chord in the list that has a guitar voicing.
    pub fn new(chords: &'a ChordList) -> Self {
        let chords = chords
            .iter()
            .filter_map(|(_, c)| c.voicings.guitar.as_ref().map(|v| (c.name.as_str(), v)))
            .collect();
        Self { chords }
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    /// Whole chord columns that fit across `avail_width`.
    pub fn columns_per_row(style: &Style, avail_width: f64) -> Result<usize, LayoutError> {
        let spacing = style.pt(style.string_hz_sp);
        let fixed = GUITAR_CHART_MARGIN + style.pt(style.string_hz_gap);
        let n = ((avail_width - fixed) / spacing).floor();
        if !n.is_finite() || n < 1.0 {
            return Err(LayoutError::TooNarrow {
                element: "guitar chart",
                available: avail_width,
                required: fixed + spacing,
            });
        }
        Ok(n as usize)
    }

    /// Height of one row: six strings plus the name line.
    fn row_height(style: &Style) -> f64 {
        style.pt(style.string_height) * (GUITAR_STRINGS + 1) as f64
    }

    pub fn wrap(&self, style: &Style, avail_width: f64) -> Result<Size, LayoutError> {
        if self.chords.is_empty() {
            return Ok(Size::default());
        }
        let per_row = Self::columns_per_row(style, avail_width)?;
        let fixed = GUITAR_CHART_MARGIN + style.pt(style.string_hz_gap);

        if self.chords.len() <= per_row {
            let width = fixed + style.pt(style.string_hz_sp) * self.chords.len() as f64;
            return Ok(Size::new(width, Self::row_height(style)));
        }

        let rows = self.chords.len().div_ceil(per_row);
        let height = Self::row_height(style) * rows as f64
            + style.pt(style.string_height) * (rows - 1) as f64;
        Ok(Size::new(avail_width, height))
    }

    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        style: &Style,
        avail_width: f64,
        measure: &dyn TextMeasure,
    ) -> Result<(), LayoutError> {
        if self.chords.is_empty() {
            return Ok(());
        }
        let per_row = Self::columns_per_row(style, avail_width)?;
        let string_height = style.pt(style.string_height);
        let row_pitch = Self::row_height(style) + string_height;

        for (r, row) in self.chords.chunks(per_row).enumerate() {
            let row_top = r as f64 * row_pitch;

            for (i, line_name) in GUITAR_LINE_NAMES.iter().enumerate() {
                let top = row_top + i as f64 * string_height;
                write_text(canvas, style, line_name, GUITAR_FONT_SIZE, top, GUITAR_CHART_MARGIN, Align::Right);

                let labels: Vec<&str> = row.iter().map(|(name, voicing)| line_label(name, voicing, i)).collect();
                let y = top + string_height / 2.0;
                for (start, end) in connector_segments(&labels, style, measure) {
                    canvas.line(start, y, end, y);
                }

                let spacing = style.pt(style.string_hz_sp);
                for (j, label) in labels.iter().enumerate() {
                    let x = GUITAR_CHART_MARGIN + spacing * (j as f64 + 0.5);
                    write_text(canvas, style, label, GUITAR_FONT_SIZE, top, x, Align::Centre);
                }
            }
        }
        Ok(())
    }
}

/// Text for chart line `i`: high e string first, the chord name last.
fn line_label<'v>(name: &'v str, voicing: &'v GuitarVoicing, i: usize) -> &'v str {
    if i < GUITAR_STRINGS {
        &voicing.strings()[GUITAR_STRINGS - 1 - i]
    } else {
        name
    }
}

/// Horizontal string segments for one chart line, in chart coordinates.
///
/// Each segment runs from just past one label to just before the next,
/// leaving `string_hz_gap` either side of the measured text. The first
/// segment starts at the chart margin; the last ends at the edge of the
/// final column. Segments squeezed out by wide labels are omitted.
pub(super) fn connector_segments(labels: &[&str], style: &Style, measure: &dyn TextMeasure) -> Vec<(f64, f64)> {
    let spacing = style.pt(style.string_hz_sp);
    let gap = style.pt(style.string_hz_gap);
    let margin = GUITAR_CHART_MARGIN;
    let width = |s: &str| measure.text_width(s, &style.font, GUITAR_FONT_SIZE);

    let mut segments = Vec::with_capacity(labels.len() + 1);
    let mut last_width = 0.0;

    for (j, label) in labels.iter().enumerate() {
        let current = width(label);
        let centre = margin + spacing * (j as f64 + 0.5);

        let start = if j == 0 {
            margin + gap
        } else {
            centre - spacing + last_width / 2.0 + gap
        };
        segments.push((start, centre - current / 2.0 - gap));

        if j == labels.len() - 1 {
            segments.push((centre + current / 2.0 + gap, margin + spacing * (j as f64 + 1.0)));
        }
        last_width = current;
    }

    segments.retain(|&(start, end)| {
        let keep = end > start;
        if !keep {
            log::warn!("guitar chart label too wide for its column, omitting a string segment");
        }
        keep
    });
    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Chord, Instrument};
    use crate::renderer::draw::{DrawCommand, DrawList};

    /// Every character is exactly `size` points wide.
    fn mono(text: &str, _font: &str, size: f64) -> f64 {
        text.chars().count() as f64 * size
    }

    fn chord_list(n: usize) -> ChordList {
        let mut list = ChordList::new();
        for i in 0..n {
            let chord = Chord::new(format!("C{i}"))
                .with_voicing(Instrument::Guitar, "x32010")
                .unwrap();
            list.add(chord);
        }
        list
    }

    #[test]
    fn column_count_is_maximal() {
        let style = Style::default();
        let spacing = style.pt(style.string_hz_sp);
        let fixed = GUITAR_CHART_MARGIN + style.pt(style.string_hz_gap);

        for avail in [120.0, 200.0, 350.5, style.frame().width, 1000.0] {
            let n = GuitarChart::columns_per_row(&style, avail).unwrap() as f64;
            assert!(n * spacing + fixed <= avail);
            assert!((n + 1.0) * spacing + fixed > avail);
        }
    }

    #[test]
    fn too_narrow_for_one_column() {
        let style = Style::default();
        assert!(matches!(
            GuitarChart::columns_per_row(&style, 50.0),
            Err(LayoutError::TooNarrow { .. })
        ));
    }

    #[test]
    fn single_row_is_as_wide_as_its_columns() {
        let style = Style::default();
        let list = chord_list(3);
        let chart = GuitarChart::new(&list);
        let size = chart.wrap(&style, style.frame().width).unwrap();
        let expected = GUITAR_CHART_MARGIN + style.pt(style.string_hz_gap) + 3.0 * style.pt(style.string_hz_sp);
        assert!((size.width - expected).abs() < 1e-9);
        assert!((size.height - 7.0 * style.pt(style.string_height)).abs() < 1e-9);
    }

    #[test]
    fn wraps_into_rows_with_a_gap_between() {
        let style = Style::default();
        let avail = style.frame().width;
        let per_row = GuitarChart::columns_per_row(&style, avail).unwrap();
        let list = chord_list(per_row * 2 + 1);
        let chart = GuitarChart::new(&list);
        let size = chart.wrap(&style, avail).unwrap();
        let sh = style.pt(style.string_height);
        assert!((size.height - (3.0 * 7.0 * sh + 2.0 * sh)).abs() < 1e-9);
        assert_eq!(size.width, avail);
    }

    #[test]
    fn chords_without_guitar_voicing_are_skipped() {
        let mut list = chord_list(2);
        list.add(Chord::new("N"));
        assert_eq!(GuitarChart::new(&list).len(), 2);
    }

    #[test]
    fn connectors_bracket_each_label() {
        let style = Style::default();
        let spacing = style.pt(style.string_hz_sp);
        let gap = style.pt(style.string_hz_gap);
        let m = GUITAR_CHART_MARGIN;

        let segments = connector_segments(&["x", "10"], &style, &mono);
        // 12pt mono: "x" is 12 wide, "10" is 24 wide
        let expected = vec![
            (m + gap, m + spacing * 0.5 - 6.0 - gap),
            (m + spacing * 0.5 + 6.0 + gap, m + spacing * 1.5 - 12.0 - gap),
            (m + spacing * 1.5 + 12.0 + gap, m + spacing * 2.0),
        ];
        assert_eq!(segments.len(), expected.len());
        for (got, want) in segments.iter().zip(&expected) {
            assert!((got.0 - want.0).abs() < 1e-9 && (got.1 - want.1).abs() < 1e-9);
        }
    }

    #[test]
    fn oversized_labels_drop_their_segments() {
        let style = Style::default();
        let long = "a very long chord name";
        let segments = connector_segments(&[long], &style, &mono);
        assert!(segments.is_empty());
    }

    #[test]
    fn draws_every_row() {
        let style = Style::default();
        let avail = style.frame().width;
        let per_row = GuitarChart::columns_per_row(&style, avail).unwrap();
        let list = chord_list(per_row + 1);
        let chart = GuitarChart::new(&list);

        let mut canvas = DrawList::new();
        chart.draw(&mut canvas, &style, avail, &mono).unwrap();

        let texts = canvas
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Text { .. }))
            .count();
        // Two rows of 7 line names, plus one label per chord per line.
        assert_eq!(texts, 2 * 7 + (per_row + 1) * 7);

        let last_name_top = 7.0 * style.pt(style.string_height) + style.pt(style.string_height) + 6.0 * style.pt(style.string_height);
        let found = canvas.commands().iter().any(|c| matches!(
            c,
            DrawCommand::Text { text, y, .. } if text == &format!("C{per_row}") && *y > last_name_top
        ));
        assert!(found, "last chord name should be drawn on the second row");
    }
}
