//! Text measurement — the one font capability layout depends on.

/// Width of rendered text, in points.
///
/// Implementations must be deterministic: the same string, font and size
/// always give the same width.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font: &str, size: f64) -> f64;
}

impl<F> TextMeasure for F
where
    F: Fn(&str, &str, f64) -> f64,
{
    fn text_width(&self, text: &str, font: &str, size: f64) -> f64 {
        self(text, font, size)
    }
}

/// Width estimate from per-character advance classes, for callers without
/// real font metrics. Close to a sans-serif face at typical sizes.
#[derive(Debug, Clone, Copy)]
pub struct EstimatedMetrics {
    pub char_width_factor: f64,
}

impl Default for EstimatedMetrics {
    fn default() -> Self {
        Self { char_width_factor: 0.55 }
    }
}

impl EstimatedMetrics {
    fn advance(&self, c: char) -> f64 {
        match c {
            'i' | 'j' | 'l' | 'I' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' => 0.25,
            'f' | 't' | 'r' | ' ' | '(' | ')' | '-' | '1' => 0.35,
            'm' | 'w' | 'M' | 'W' => 0.85,
            c if c.is_ascii_uppercase() => 0.68,
            _ => self.char_width_factor,
        }
    }
}

impl TextMeasure for EstimatedMetrics {
    fn text_width(&self, text: &str, _font: &str, size: f64) -> f64 {
        text.chars().map(|c| self.advance(c)).sum::<f64>() * size
    }
}
