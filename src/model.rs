//! Data model for a chordsheet document.
//!
//! Chords live in an arena ([`ChordList`]) and blocks refer to them by
//! [`ChordId`], so renaming or removing a chord is a single slot update that
//! every block sees.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::parser::{parse_guitar_fingering, parse_piano_voicing};

// ═══════════════════════════════════════════════════════════════════════
// Beats
// ═══════════════════════════════════════════════════════════════════════

/// Fixed-point subdivisions of one beat. Divisible by 2, 3, 4, 5, 6, 8, 16
/// and 32 so the usual fractional lengths are exact.
pub const TICKS_PER_BEAT: u64 = 960;

/// Upper bound on a block or section length, in beats.
pub const MAX_BEATS: u64 = 1_000_000_000;

/// A span of musical time, stored as an exact tick count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Beats(u64);

impl Beats {
    pub const ZERO: Beats = Beats(0);

    pub const fn from_whole(beats: u32) -> Self {
        Beats(beats as u64 * TICKS_PER_BEAT)
    }

    pub const fn from_ticks(ticks: u64) -> Self {
        Beats(ticks)
    }

    /// Longest span a block or a section may hold. Totals of validated
    /// documents stay far below `u64::MAX` ticks, so plain addition is safe.
    pub const MAX: Beats = Beats(MAX_BEATS * TICKS_PER_BEAT);

    /// Parse a decimal length such as `"4"` or `"1.5"`. The digits are read
    /// exactly: a value that does not land on a tick, or is longer than
    /// [`Beats::MAX`], is an error.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let text = text.trim();
        let invalid = || DocumentError::InvalidLength { value: text.to_string() };

        let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
        let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !digits(whole) || !digits(fraction) {
            return Err(invalid());
        }

        let whole_ticks = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<u64>()
                .ok()
                .filter(|&w| w <= MAX_BEATS)
                .ok_or_else(invalid)?
                * TICKS_PER_BEAT
        };

        let fraction = fraction.trim_end_matches('0');
        let fraction_ticks = if fraction.is_empty() {
            0
        } else {
            // A tick is 1/960 beat, so more than six significant decimals
            // can never land on one.
            if fraction.len() > 6 {
                return Err(invalid());
            }
            let denominator = 10u64.pow(fraction.len() as u32);
            let scaled = fraction.parse::<u64>().map_err(|_| invalid())? * TICKS_PER_BEAT;
            if scaled % denominator != 0 {
                return Err(invalid());
            }
            scaled / denominator
        };

        let ticks = whole_ticks + fraction_ticks;
        if ticks == 0 || ticks > Self::MAX.0 {
            return Err(invalid());
        }
        Ok(Beats(ticks))
    }

    pub const fn ticks(self) -> u64 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / TICKS_PER_BEAT as f64
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Whole lines of `line` beats needed to hold this span (rounded up).
    pub fn lines_of(self, line: Beats) -> u64 {
        if line.is_zero() {
            return 0;
        }
        self.0.div_ceil(line.0)
    }

    pub fn checked_add(self, rhs: Beats) -> Option<Beats> {
        self.0.checked_add(rhs.0).map(Beats)
    }

    /// `n` repetitions of this span, or `None` on overflow.
    pub fn checked_times(self, n: u64) -> Option<Beats> {
        self.0.checked_mul(n).map(Beats)
    }
}

impl Add for Beats {
    type Output = Beats;
    fn add(self, rhs: Beats) -> Beats {
        Beats(self.0 + rhs.0)
    }
}

impl AddAssign for Beats {
    fn add_assign(&mut self, rhs: Beats) {
        self.0 += rhs.0;
    }
}

impl Sub for Beats {
    type Output = Beats;
    fn sub(self, rhs: Beats) -> Beats {
        Beats(self.0 - rhs.0)
    }
}

impl Sum for Beats {
    fn sum<I: Iterator<Item = Beats>>(iter: I) -> Beats {
        iter.fold(Beats::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Beats> for Beats {
    fn sum<I: Iterator<Item = &'a Beats>>(iter: I) -> Beats {
        iter.copied().sum()
    }
}

impl fmt::Display for Beats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % TICKS_PER_BEAT == 0 {
            write!(f, "{}", self.0 / TICKS_PER_BEAT)
        } else {
            write!(f, "{}", self.as_f64())
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Instruments and voicings
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Instrument {
    Guitar,
    Piano,
}

impl Instrument {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "guitar" => Some(Instrument::Guitar),
            "piano" => Some(Instrument::Piano),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Instrument::Guitar => "guitar",
            Instrument::Piano => "piano",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Number of strings on a standard guitar.
pub const GUITAR_STRINGS: usize = 6;

/// One fret/fingering symbol per string, lowest (E) string first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuitarVoicing {
    strings: [String; GUITAR_STRINGS],
}

impl GuitarVoicing {
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        Ok(Self { strings: parse_guitar_fingering(text)? })
    }

    /// Symbols ordered from the lowest string to the highest.
    pub fn strings(&self) -> &[String; GUITAR_STRINGS] {
        &self.strings
    }
}

impl fmt::Display for GuitarVoicing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.strings.join(","))
    }
}

/// The fixed 12-key chromatic cycle used for piano charts, starting on A.
pub const KEY_CYCLE: [&str; 12] = [
    "A", "A♯", "B", "C", "C♯", "D", "D♯", "E", "F", "F♯", "G", "G♯",
];

/// Flat spellings rewritten to their sharp equivalent before key lookup.
pub const ENHARMONIC_FLATS: [(&str, &str); 5] = [
    ("B♭", "A♯"),
    ("D♭", "C♯"),
    ("E♭", "D♯"),
    ("G♭", "F♯"),
    ("A♭", "G♯"),
];

/// Rewrite a flat spelling to its sharp equivalent; other names pass through.
pub fn normalize_enharmonic(name: &str) -> &str {
    ENHARMONIC_FLATS
        .iter()
        .find(|(flat, _)| *flat == name)
        .map_or(name, |(_, sharp)| sharp)
}

/// Position of a note name within [`KEY_CYCLE`] after enharmonic normalisation.
pub fn key_index(name: &str) -> Option<u8> {
    let normalized = normalize_enharmonic(name);
    KEY_CYCLE
        .iter()
        .position(|k| *k == normalized)
        .map(|i| i as u8)
}

/// Whether a (possibly unbounded) key position falls on a black key.
pub fn is_black_key(position: i32) -> bool {
    matches!(position.rem_euclid(12), 1 | 4 | 6 | 9 | 11)
}

/// A voiced piano note: its place in the key cycle and the spelling entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PianoNote {
    pub key: u8,
    pub spelling: String,
}

/// Notes in playing order, lowest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PianoVoicing {
    notes: Vec<PianoNote>,
}

impl PianoVoicing {
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        Ok(Self { notes: parse_piano_voicing(text)? })
    }

    pub fn notes(&self) -> &[PianoNote] {
        &self.notes
    }
}

impl fmt::Display for PianoVoicing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let spellings: Vec<&str> = self.notes.iter().map(|n| n.spelling.as_str()).collect();
        f.write_str(&spellings.join(","))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voicings {
    pub guitar: Option<GuitarVoicing>,
    pub piano: Option<PianoVoicing>,
}

impl Voicings {
    pub fn has(&self, instrument: Instrument) -> bool {
        match instrument {
            Instrument::Guitar => self.guitar.is_some(),
            Instrument::Piano => self.piano.is_some(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Chords
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chord {
    pub name: String,
    pub voicings: Voicings,
}

impl Chord {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), voicings: Voicings::default() }
    }

    /// Parse `text` as a voicing for `instrument` and store it. On error the
    /// chord is left exactly as it was.
    pub fn set_voicing(&mut self, instrument: Instrument, text: &str) -> Result<(), DocumentError> {
        match instrument {
            Instrument::Guitar => {
                let voicing = GuitarVoicing::parse(text)?;
                self.voicings.guitar = Some(voicing);
            }
            Instrument::Piano => {
                let voicing = PianoVoicing::parse(text)?;
                self.voicings.piano = Some(voicing);
            }
        }
        Ok(())
    }

    pub fn with_voicing(mut self, instrument: Instrument, text: &str) -> Result<Self, DocumentError> {
        self.set_voicing(instrument, text)?;
        Ok(self)
    }
}

/// Index of a chord in a [`ChordList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChordId(usize);

/// Arena of chords. Removed chords leave an empty slot so existing ids
/// never change meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordList {
    slots: Vec<Option<Chord>>,
}

impl ChordList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, chord: Chord) -> ChordId {
        self.slots.push(Some(chord));
        ChordId(self.slots.len() - 1)
    }

    pub fn get(&self, id: ChordId) -> Option<&Chord> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: ChordId) -> Option<&mut Chord> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Like [`get`](Self::get) but reports an unknown id as an error.
    pub fn lookup(&self, id: ChordId) -> Result<&Chord, DocumentError> {
        self.get(id).ok_or(DocumentError::UnknownChord { id: id.0 })
    }

    pub fn rename(&mut self, id: ChordId, name: impl Into<String>) -> Result<(), DocumentError> {
        let chord = self
            .get_mut(id)
            .ok_or(DocumentError::UnknownChord { id: id.0 })?;
        chord.name = name.into();
        Ok(())
    }

    pub fn remove(&mut self, id: ChordId) -> Option<Chord> {
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    pub fn find_by_name(&self, name: &str) -> Option<ChordId> {
        self.iter().find(|(_, c)| c.name == name).map(|(id, _)| id)
    }

    pub fn resolve(&self, name: &str) -> Result<ChordId, DocumentError> {
        self.find_by_name(name)
            .ok_or_else(|| DocumentError::DanglingChordReference { name: name.to_string() })
    }

    /// Live chords in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ChordId, &Chord)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|c| (ChordId(i), c)))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Blocks, sections and the document
// ═══════════════════════════════════════════════════════════════════════

/// A timed chord/annotation span within a progression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    length: Beats,
    pub chord: Option<ChordId>,
    pub notes: Option<String>,
}

impl Block {
    pub fn new(length: Beats, chord: Option<ChordId>, notes: Option<String>) -> Result<Self, DocumentError> {
        if length.is_zero() || length > Beats::MAX {
            return Err(DocumentError::InvalidLength { value: length.to_string() });
        }
        Ok(Self { length, chord, notes })
    }

    pub fn length(&self) -> Beats {
        self.length
    }

    /// A fragment of this block: same chord and notes, different length.
    pub(crate) fn fragment(&self, length: Beats) -> Self {
        Self { length, chord: self.chord, notes: self.notes.clone() }
    }
}

/// Total length of a block list.
pub fn total_beats(blocks: &[Block]) -> Beats {
    blocks.iter().map(Block::length).sum()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), blocks: Vec::new() }
    }

    pub fn total_beats(&self) -> Beats {
        total_beats(&self.blocks)
    }
}

pub const DEFAULT_TIME_SIGNATURE: u32 = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub subtitle: Option<String>,
    pub composer: Option<String>,
    pub arranger: Option<String>,
    /// Beats per measure
    pub time_signature: u32,
    pub tempo: Option<String>,
    pub chords: ChordList,
    pub sections: Vec<Section>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: None,
            composer: None,
            arranger: None,
            time_signature: DEFAULT_TIME_SIGNATURE,
            tempo: None,
            chords: ChordList::new(),
            sections: Vec::new(),
        }
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a block whose chord is looked up by name. `None` means no chord.
    pub fn block(&self, length: Beats, chord_name: Option<&str>, notes: Option<&str>) -> Result<Block, DocumentError> {
        let chord = chord_name.map(|n| self.chords.resolve(n)).transpose()?;
        Block::new(length, chord, notes.map(String::from))
    }

    /// Check everything layout relies on: a usable time signature, block
    /// chord references that still point at live chords, and section
    /// lengths no longer than [`Beats::MAX`].
    pub fn validate(&self) -> Result<(), DocumentError> {
        if self.time_signature == 0 {
            return Err(DocumentError::InvalidTimeSignature(self.time_signature.to_string()));
        }
        for section in &self.sections {
            let mut total = Beats::ZERO;
            for block in &section.blocks {
                if let Some(id) = block.chord {
                    self.chords.lookup(id)?;
                }
                total = total
                    .checked_add(block.length())
                    .filter(|t| *t <= Beats::MAX)
                    .ok_or_else(|| DocumentError::InvalidLength {
                        value: format!("section '{}' is longer than {MAX_BEATS} beats", section.name),
                    })?;
            }
        }
        Ok(())
    }

    pub fn has_voicings(&self, instrument: Instrument) -> bool {
        self.chords.iter().any(|(_, c)| c.voicings.has(instrument))
    }
}
