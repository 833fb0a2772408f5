//! Beat-grid splitting — wraps a block list onto lines of fixed beat width
//! so that no block straddles a line boundary.

use crate::error::LayoutError;
use crate::model::{Beats, Block};

/// Split blocks so every run of `max_width` beats forms exactly one line.
///
/// A block that would cross a line boundary is cut into fragments: the
/// first fills the current line, then whole lines, then any remainder.
/// Fragments share the original chord and notes. Lengths are exact, so the
/// output sums to the same total as the input.
pub(super) fn split_blocks(blocks: &[Block], max_width: Beats) -> Vec<Block> {
    if max_width.is_zero() {
        return blocks.to_vec();
    }

    let mut out = Vec::with_capacity(blocks.len());
    let mut h = Beats::ZERO;

    for block in blocks {
        if h == max_width {
            h = Beats::ZERO;
        }
        let length = block.length();

        if h + length > max_width {
            let first = max_width - h;
            out.push(block.fragment(first));
            let mut last = first;
            let mut remaining = length - first;

            while remaining >= max_width {
                out.push(block.fragment(max_width));
                remaining = remaining - max_width;
                last = max_width;
            }
            if !remaining.is_zero() {
                out.push(block.fragment(remaining));
                last = remaining;
            }
            h = last;
        } else {
            out.push(block.clone());
            h += length;
        }
    }

    out
}

/// Split a block list at `beats`, which must be a whole number of
/// `max_width` lines. Returns the blocks before and after the boundary.
pub(super) fn split_at_beat_count(
    blocks: &[Block],
    max_width: Beats,
    beats: Beats,
) -> Result<(Vec<Block>, Vec<Block>), LayoutError> {
    let mut rest = split_blocks(blocks, max_width);
    let mut sum = Beats::ZERO;
    let mut cut = 0;

    while sum < beats && cut < rest.len() {
        sum += rest[cut].length();
        cut += 1;
    }

    if sum != beats {
        return Err(LayoutError::SplitInvariantViolation { target: beats, reached: sum });
    }

    let first: Vec<Block> = rest.drain(..cut).collect();
    Ok((first, rest))
}

/// A block positioned on the grid: `column` is the beat offset within its
/// line, `row` the line index.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct GridCell {
    pub(super) block: Block,
    pub(super) column: Beats,
    pub(super) row: u64,
}

/// Split the blocks and assign each fragment its line and column.
pub(super) fn place_on_grid(blocks: &[Block], max_width: Beats) -> Vec<GridCell> {
    let mut cells = Vec::new();
    let mut column = Beats::ZERO;
    let mut row = 0;

    for block in split_blocks(blocks, max_width) {
        if column == max_width {
            column = Beats::ZERO;
            row += 1;
        }
        let length = block.length();
        cells.push(GridCell { block, column, row });
        column += length;
    }

    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{total_beats, Chord, ChordId, ChordList};
    use pretty_assertions::assert_eq;

    fn beats(n: u32) -> Beats {
        Beats::from_whole(n)
    }

    fn chords(names: &[&str]) -> Vec<ChordId> {
        let mut list = ChordList::new();
        names.iter().map(|n| list.add(Chord::new(*n))).collect()
    }

    fn block(len: Beats, chord: Option<ChordId>) -> Block {
        Block::new(len, chord, None).unwrap()
    }

    fn lengths(blocks: &[Block]) -> Vec<Beats> {
        blocks.iter().map(Block::length).collect()
    }

    /// Deterministic pseudo-random block lists for property checks.
    fn generated_lists() -> Vec<Vec<Block>> {
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed
        };
        (0..200)
            .map(|_| {
                let n = (next() % 12) as usize;
                (0..n)
                    .map(|_| {
                        // Quarter-beat resolution, 0.25..=12 beats
                        let quarters = 1 + next() % 48;
                        block(Beats::from_ticks(quarters * 240), None)
                    })
                    .collect()
            })
            .collect()
    }

    #[test]
    fn worked_example() {
        let ids = chords(&["A", "B", "C"]);
        let input = vec![
            block(beats(3), Some(ids[0])),
            block(beats(2), Some(ids[1])),
            block(beats(5), Some(ids[2])),
        ];
        let out = split_blocks(&input, beats(4));

        assert_eq!(lengths(&out), vec![beats(3), beats(1), beats(1), beats(3), beats(2)]);
        let chord_seq: Vec<Option<ChordId>> = out.iter().map(|b| b.chord).collect();
        assert_eq!(
            chord_seq,
            vec![Some(ids[0]), Some(ids[1]), Some(ids[1]), Some(ids[2]), Some(ids[2])]
        );
        assert_eq!(total_beats(&out), beats(10));
    }

    #[test]
    fn exact_multiple_leaves_no_empty_fragment() {
        let input = vec![block(beats(2), None), block(beats(10), None), block(beats(1), None)];
        let out = split_blocks(&input, beats(4));
        // 2 | 2 + 4 + 4 | 1  -> second block ends exactly on a line boundary
        assert_eq!(lengths(&out), vec![beats(2), beats(2), beats(4), beats(4), beats(1)]);
        assert!(out.iter().all(|b| !b.length().is_zero()));

        let whole = split_blocks(&[block(beats(8), None)], beats(4));
        assert_eq!(lengths(&whole), vec![beats(4), beats(4)]);
    }

    #[test]
    fn fragments_keep_notes() {
        let ids = chords(&["G"]);
        let input = vec![Block::new(beats(6), Some(ids[0]), Some("rit.".into())).unwrap()];
        let out = split_blocks(&input, beats(4));
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|b| b.notes.as_deref() == Some("rit.") && b.chord == Some(ids[0])));
    }

    #[test]
    fn fractional_lengths_split_exactly() {
        let input = vec![block(Beats::parse("1.5").unwrap(), None), block(Beats::parse("3.25").unwrap(), None)];
        let out = split_blocks(&input, beats(2));
        assert_eq!(
            lengths(&out),
            vec![
                Beats::parse("1.5").unwrap(),
                Beats::parse("0.5").unwrap(),
                beats(2),
                Beats::parse("0.75").unwrap(),
            ]
        );
    }

    #[test]
    fn conservation_and_no_straddling() {
        for width in [1, 3, 4, 8, 12] {
            let max = beats(width);
            for list in generated_lists() {
                let out = split_blocks(&list, max);
                assert_eq!(total_beats(&out), total_beats(&list));

                let mut h = Beats::ZERO;
                for b in &out {
                    if h == max {
                        h = Beats::ZERO;
                    }
                    assert!(h + b.length() <= max, "fragment crosses a line boundary");
                    h += b.length();
                }
            }
        }
    }

    #[test]
    fn splitting_is_idempotent() {
        for list in generated_lists() {
            let once = split_blocks(&list, beats(8));
            let twice = split_blocks(&once, beats(8));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn split_at_beat_count_lands_on_the_boundary() {
        let max = beats(4);
        for list in generated_lists() {
            let total = total_beats(&list);
            let lines = total.ticks() / max.ticks();
            for n in 0..=lines {
                let target = max.checked_times(n).unwrap();
                let (first, rest) = split_at_beat_count(&list, max, target).unwrap();
                assert_eq!(total_beats(&first), target);
                assert_eq!(total_beats(&first) + total_beats(&rest), total);
            }
        }
    }

    #[test]
    fn split_at_mid_block() {
        let ids = chords(&["A", "B"]);
        let input = vec![block(beats(6), Some(ids[0])), block(beats(6), Some(ids[1]))];
        let (first, rest) = split_at_beat_count(&input, beats(4), beats(8)).unwrap();
        assert_eq!(lengths(&first), vec![beats(4), beats(2), beats(2)]);
        assert_eq!(lengths(&rest), vec![beats(4)]);
        assert_eq!(rest[0].chord, Some(ids[1]));
    }

    #[test]
    fn unreachable_split_point_is_reported() {
        let input = vec![block(beats(3), None)];
        let err = split_at_beat_count(&input, beats(4), beats(8)).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::SplitInvariantViolation { target, reached }
                if target == beats(8) && reached == beats(3)
        ));
    }

    #[test]
    fn grid_positions_follow_lines() {
        let input = vec![block(beats(3), None), block(beats(2), None), block(beats(5), None)];
        let cells = place_on_grid(&input, beats(4));
        let positions: Vec<(Beats, u64)> = cells.iter().map(|c| (c.column, c.row)).collect();
        assert_eq!(
            positions,
            vec![(beats(0), 0), (beats(3), 0), (beats(0), 1), (beats(1), 1), (beats(0), 2)]
        );
    }
}
