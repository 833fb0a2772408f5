//! Shared constants for the chordsheet renderer (points unless noted).

use crate::style::MM;

// ── Headings ────────────────────────────────────────────────────────
pub(super) const GUITAR_HEADING: &str = "Guitar chord voicings";
pub(super) const PIANO_HEADING: &str = "Piano chord voicings";

// ── Guitar chart ────────────────────────────────────────────────────
pub(super) const GUITAR_CHART_MARGIN: f64 = 15.0 * MM; // room for the string names
pub(super) const GUITAR_FONT_SIZE: f64 = 12.0;
pub(super) const GUITAR_LINE_NAMES: [&str; 7] = ["e", "B", "G", "D", "A", "E", "Name"];

// ── Piano chart ─────────────────────────────────────────────────────
pub(super) const WHITE_KEY_WIDTH: f64 = 3.5 * MM;
pub(super) const WHITE_KEY_HEIGHT: f64 = 12.0 * MM;
pub(super) const BLACK_KEY_WIDTH: f64 = 2.2 * MM;
pub(super) const BLACK_KEY_HEIGHT: f64 = 7.5 * MM;
pub(super) const KEY_DOT_RADIUS: f64 = 0.9 * MM;
pub(super) const KEY_DOT_INSET: f64 = 2.0 * MM; // white-key dot centre above the key's bottom edge
pub(super) const PIANO_CHORD_SPACING: f64 = 5.0 * MM;
pub(super) const PIANO_ROW_GAP: f64 = 3.0 * MM;
pub(super) const PIANO_NAME_FONT_SIZE: f64 = 12.0;
pub(super) const PIANO_LABEL_FONT_SIZE: f64 = 7.0;

// ── Chord progression ───────────────────────────────────────────────
pub(super) const NOTES_OFFSET_FACTOR: f64 = 1.3; // notes sit this many font sizes above the cell bottom

// ── Page flow ───────────────────────────────────────────────────────
pub(super) const FIT_EPSILON: f64 = 1e-6;

// ── SVG output ──────────────────────────────────────────────────────
pub(super) const INK_COLOR: &str = "#1a1a1a";
pub(super) const PAPER_COLOR: &str = "white";
pub(super) const STROKE_WIDTH: f64 = 0.8;
