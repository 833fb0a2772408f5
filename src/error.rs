//! Error types for document validation and layout.
//!
//! Two families are kept apart:
//! - [`DocumentError`] covers bad input (malformed voicings, chord names that
//!   do not resolve, unusable lengths). These are recoverable at the editing
//!   boundary and are always raised before anything is mutated.
//! - [`LayoutError`] covers page-geometry failures and internal invariant
//!   violations of the pagination engine.
//!
//! ```
//! use chordsheet::{Error, DocumentError};
//!
//! let err: Error = DocumentError::DanglingChordReference { name: "Gm7".into() }.into();
//! assert!(!err.is_internal());
//! assert_eq!(err.to_string(), "Chord 'Gm7' does not match any chord in the chord list");
//! ```

use thiserror::Error;

use crate::model::{Beats, Instrument};

#[derive(Error, Debug)]
pub enum DocumentError {
    /// A voicing string does not resolve to a usable voicing for its instrument.
    #[error("Voicing <{voicing}> is malformed for {instrument}: {reason}")]
    MalformedVoicing {
        instrument: Instrument,
        voicing: String,
        reason: String,
    },

    /// A block or serialized reference names a chord absent from the chord list.
    #[error("Chord '{name}' does not match any chord in the chord list")]
    DanglingChordReference { name: String },

    /// A chord id points at an empty or out-of-range arena slot.
    #[error("Chord id {id} does not refer to a chord in the chord list")]
    UnknownChord { id: usize },

    /// A block length that is not a positive, exactly representable beat count.
    #[error("Invalid block length: {value}")]
    InvalidLength { value: String },

    #[error("Invalid time signature: {0}")]
    InvalidTimeSignature(String),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum LayoutError {
    /// The cumulative beat count never landed on the requested split point.
    #[error("Split invariant violated: wanted a boundary at {target} beats, sum reached {reached}")]
    SplitInvariantViolation { target: Beats, reached: Beats },

    /// An element cannot be placed even on an empty page.
    #[error("{element} needs {height:.1}pt but a page only holds {page_height:.1}pt")]
    PageOverflow {
        element: &'static str,
        height: f64,
        page_height: f64,
    },

    /// The frame is too narrow to hold a single column or measure group.
    #[error("{element} needs at least {required:.1}pt of width, only {available:.1}pt available")]
    TooNarrow {
        element: &'static str,
        available: f64,
        required: f64,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// True for failures that indicate a defect in the layout engine
    /// rather than bad input or an impossible page geometry.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Error::Layout(LayoutError::SplitInvariantViolation { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
