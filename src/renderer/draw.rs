//! Draw primitives — the instructions layout emits once geometry is fixed.
//!
//! Coordinates are points with the origin at the top-left corner of the
//! page and y growing downwards. Text `y` is the baseline.

use serde::Serialize;

use crate::style::Style;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Centre,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Paint {
    /// Outline only
    Stroke,
    Fill,
    /// Filled with the background colour, for marks drawn on filled shapes
    FillInverted,
    /// Filled with the background colour and outlined in ink
    Outlined,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum DrawCommand {
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Rect { x: f64, y: f64, width: f64, height: f64, paint: Paint },
    Circle { x: f64, y: f64, r: f64, paint: Paint },
    Text { x: f64, y: f64, text: String, font: String, size: f64, align: Align },
}

/// Sink for draw primitives. Later calls draw on top of earlier ones.
pub trait Canvas {
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64);
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: Paint);
    fn circle(&mut self, x: f64, y: f64, r: f64, paint: Paint);
    fn text(&mut self, x: f64, y: f64, text: &str, font: &str, size: f64, align: Align);
}

/// Records primitives for one page, translating flowable-local
/// coordinates by the current origin.
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
    origin: (f64, f64),
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_origin(&mut self, x: f64, y: f64) {
        self.origin = (x, y);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }
}

impl Canvas for DrawList {
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let (ox, oy) = self.origin;
        self.commands.push(DrawCommand::Line { x1: ox + x1, y1: oy + y1, x2: ox + x2, y2: oy + y2 });
    }

    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64, paint: Paint) {
        let (ox, oy) = self.origin;
        self.commands.push(DrawCommand::Rect { x: ox + x, y: oy + y, width, height, paint });
    }

    fn circle(&mut self, x: f64, y: f64, r: f64, paint: Paint) {
        let (ox, oy) = self.origin;
        self.commands.push(DrawCommand::Circle { x: ox + x, y: oy + y, r, paint });
    }

    fn text(&mut self, x: f64, y: f64, text: &str, font: &str, size: f64, align: Align) {
        let (ox, oy) = self.origin;
        self.commands.push(DrawCommand::Text {
            x: ox + x,
            y: oy + y,
            text: text.to_string(),
            font: font.to_string(),
            size,
            align,
        });
    }
}

/// Write one line of text whose box starts at `top` and return the height
/// it took up.
pub(super) fn write_text(
    canvas: &mut dyn Canvas,
    style: &Style,
    text: &str,
    size: f64,
    top: f64,
    x: f64,
    align: Align,
) -> f64 {
    let baseline = top + 0.75 * size * style.line_spacing;
    canvas.text(x, baseline, text, &style.font, size, align);
    style.leading(size)
}
