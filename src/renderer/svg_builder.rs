//! SVG builder — accumulates SVG elements for one page and produces the
//! final string.

use super::constants::*;
use super::draw::{Align, DrawCommand, Paint};

// ═══════════════════════════════════════════════════════════════════════
// SvgBuilder
// ═══════════════════════════════════════════════════════════════════════

pub(super) struct SvgBuilder {
    elements: Vec<String>,
    width: f64,
    height: f64,
    font: String,
}

impl SvgBuilder {
    pub(super) fn new(width: f64, height: f64, font: &str) -> Self {
        Self {
            elements: Vec::new(),
            width,
            height,
            font: font.to_string(),
        }
    }

    pub(super) fn build(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {:.2} {:.2}" width="{:.2}pt" height="{:.2}pt" style="font-family: '{}', sans-serif;">"#,
            self.width,
            self.height,
            self.width,
            self.height,
            escape(&self.font)
        );
        svg.push('\n');
        for el in &self.elements {
            svg.push_str("  ");
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    pub(super) fn background(&mut self) {
        self.elements.push(format!(
            r#"<rect x="0" y="0" width="{:.2}" height="{:.2}" fill="{}"/>"#,
            self.width, self.height, PAPER_COLOR
        ));
    }

    pub(super) fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.elements.push(format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{:.1}"/>"#,
            x1, y1, x2, y2, INK_COLOR, STROKE_WIDTH
        ));
    }

    pub(super) fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, paint: Paint) {
        let (fill, stroke) = paint_colors(paint);
        self.elements.push(format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" stroke="{}" stroke-width="{:.1}"/>"#,
            x, y, w, h, fill, stroke, STROKE_WIDTH
        ));
    }

    pub(super) fn circle(&mut self, cx: f64, cy: f64, r: f64, paint: Paint) {
        let (fill, stroke) = paint_colors(paint);
        self.elements.push(format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" stroke="{}" stroke-width="{:.1}"/>"#,
            cx, cy, r, fill, stroke, STROKE_WIDTH
        ));
    }

    pub(super) fn text(&mut self, x: f64, y: f64, content: &str, font: &str, size: f64, align: Align) {
        let anchor = match align {
            Align::Left => "start",
            Align::Centre => "middle",
            Align::Right => "end",
        };
        let family = if font == self.font { String::new() } else { format!(r#" font-family="{}""#, escape(font)) };
        self.elements.push(format!(
            r#"<text x="{:.2}" y="{:.2}"{} font-size="{:.1}" fill="{}" text-anchor="{}">{}</text>"#,
            x, y, family, size, INK_COLOR, anchor, escape(content)
        ));
    }

    pub(super) fn command(&mut self, command: &DrawCommand) {
        match command {
            DrawCommand::Line { x1, y1, x2, y2 } => self.line(*x1, *y1, *x2, *y2),
            DrawCommand::Rect { x, y, width, height, paint } => self.rect(*x, *y, *width, *height, *paint),
            DrawCommand::Circle { x, y, r, paint } => self.circle(*x, *y, *r, *paint),
            DrawCommand::Text { x, y, text, font, size, align } => self.text(*x, *y, text, font, *size, *align),
        }
    }
}

/// (fill, stroke) for a paint mode.
fn paint_colors(paint: Paint) -> (&'static str, &'static str) {
    match paint {
        Paint::Stroke => ("none", INK_COLOR),
        Paint::Fill => (INK_COLOR, INK_COLOR),
        Paint::FillInverted => (PAPER_COLOR, PAPER_COLOR),
        Paint::Outlined => (PAPER_COLOR, INK_COLOR),
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render one page of draw commands as a standalone SVG document.
pub(super) fn page_to_svg(width: f64, height: f64, font: &str, commands: &[DrawCommand]) -> String {
    let mut svg = SvgBuilder::new(width, height, font);
    svg.background();
    for command in commands {
        svg.command(command);
    }
    svg.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_escaped_and_anchored() {
        let commands = vec![DrawCommand::Text {
            x: 10.0,
            y: 20.0,
            text: "C <maj7> & more".into(),
            font: "FreeSans".into(),
            size: 12.0,
            align: Align::Right,
        }];
        let svg = page_to_svg(100.0, 50.0, "FreeSans", &commands);
        assert!(svg.contains("C &lt;maj7&gt; &amp; more"));
        assert!(svg.contains(r#"text-anchor="end""#));
        assert!(!svg.contains(r#"<text x="10.00" y="20.00" font-family"#));
    }

    #[test]
    fn paints_map_to_colors() {
        let commands = vec![
            DrawCommand::Rect { x: 0.0, y: 0.0, width: 5.0, height: 5.0, paint: Paint::Stroke },
            DrawCommand::Circle { x: 1.0, y: 1.0, r: 1.0, paint: Paint::FillInverted },
            DrawCommand::Rect { x: 7.0, y: 0.0, width: 5.0, height: 5.0, paint: Paint::Outlined },
        ];
        let svg = page_to_svg(100.0, 50.0, "FreeSans", &commands);
        assert!(svg.contains(&format!(r#"fill="none" stroke="{INK_COLOR}""#)));
        assert!(svg.contains(&format!(r#"<circle cx="1.00" cy="1.00" r="1.00" fill="{PAPER_COLOR}""#)));
        assert!(svg.contains(&format!(
            r#"<rect x="7.00" y="0.00" width="5.00" height="5.00" fill="{PAPER_COLOR}" stroke="{INK_COLOR}""#
        )));
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
