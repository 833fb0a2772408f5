//! Page geometry, units and the `Style` bundle that every layout
//! operation reads from.
//!
//! Lengths in a `Style` are expressed in its `unit`; font sizes are always
//! points. Layout code works in points and converts through [`Style::pt`].

use serde::{Deserialize, Serialize};

/// Points per millimetre.
pub const MM: f64 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    Mm,
    Cm,
    Inch,
    Point,
}

impl Unit {
    /// Size of one unit in points.
    pub fn points(self) -> f64 {
        match self {
            Unit::Mm => MM,
            Unit::Cm => 10.0 * MM,
            Unit::Inch => 72.0,
            Unit::Point => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    /// Explicit dimensions in points.
    Custom { width: f64, height: f64 },
}

impl PageSize {
    /// Page dimensions in points, portrait.
    pub fn size(self) -> Size {
        match self {
            PageSize::A4 => Size::new(210.0 * MM, 297.0 * MM),
            PageSize::A5 => Size::new(148.0 * MM, 210.0 * MM),
            PageSize::Letter => Size::new(612.0, 792.0),
            PageSize::Legal => Size::new(612.0, 1008.0),
            PageSize::Custom { width, height } => Size::new(width, height),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub unit: Unit,
    pub page_size: PageSize,

    // Margins (style units)
    pub left_margin: f64,
    pub right_margin: f64,
    pub top_margin: f64,
    pub bottom_margin: f64,

    pub font: String,
    /// Leading as a multiple of font size
    pub line_spacing: f64,

    // Beat grid (style units)
    pub unit_width: f64,
    pub unit_height: f64,
    pub beats_height: f64,

    // Guitar chart (style units)
    pub string_hz_sp: f64,
    pub string_hz_gap: f64,
    pub string_height: f64,

    /// Space after every flowable (style units)
    pub separator_size: f64,

    // Font sizes (points)
    pub title_font_size: f64,
    pub subtitle_font_size: f64,
    pub credits_font_size: f64,
    pub tempo_font_size: f64,
    pub heading_font_size: f64,
    pub notes_font_size: f64,
    pub chord_name_font_size: f64,
    pub beats_font_size: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            unit: Unit::Mm,
            page_size: PageSize::A4,
            left_margin: 10.0,
            right_margin: 10.0,
            top_margin: 10.0,
            bottom_margin: 10.0,
            font: "FreeSans".into(),
            line_spacing: 1.15,
            unit_width: 10.0,
            unit_height: 20.0,
            beats_height: 5.0,
            string_hz_sp: 20.0,
            string_hz_gap: 2.0,
            string_height: 5.0,
            separator_size: 5.0,
            title_font_size: 24.0,
            subtitle_font_size: 18.0,
            credits_font_size: 12.0,
            tempo_font_size: 12.0,
            heading_font_size: 18.0,
            notes_font_size: 12.0,
            chord_name_font_size: 18.0,
            beats_font_size: 12.0,
        }
    }
}

impl Style {
    /// Load a style from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert a length in style units to points.
    pub fn pt(&self, length: f64) -> f64 {
        length * self.unit.points()
    }

    pub fn page(&self) -> Size {
        self.page_size.size()
    }

    /// Top-left corner of the content frame, in points.
    pub fn frame_origin(&self) -> (f64, f64) {
        (self.pt(self.left_margin), self.pt(self.top_margin))
    }

    /// Width and height available to flowables on each page, in points.
    pub fn frame(&self) -> Size {
        let page = self.page();
        Size::new(
            page.width - self.pt(self.left_margin) - self.pt(self.right_margin),
            page.height - self.pt(self.top_margin) - self.pt(self.bottom_margin),
        )
    }

    /// Vertical space a line of text at `size` occupies.
    pub fn leading(&self, size: f64) -> f64 {
        size * self.line_spacing
    }

    pub fn unit_width_pt(&self) -> f64 {
        self.pt(self.unit_width)
    }

    pub fn unit_height_pt(&self) -> f64 {
        self.pt(self.unit_height)
    }

    pub fn separator_pt(&self) -> f64 {
        self.pt(self.separator_size)
    }
}
