//! Title block and section headings.

use crate::model::Document;
use crate::style::{Size, Style};
use super::draw::{write_text, Align, Canvas};

/// Title, subtitle, credits and tempo at the top of the first page.
#[derive(Debug, Clone, Copy)]
pub struct TitleBlock<'a> {
    document: &'a Document,
}

impl<'a> TitleBlock<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Each present line with its font size and alignment, top to bottom.
    fn lines(&self, style: &Style) -> Vec<(String, f64, Align)> {
        let doc = self.document;
        let present = |s: &Option<String>| s.as_deref().filter(|s| !s.is_empty()).map(str::to_string);
        let mut lines = Vec::new();

        if !doc.title.is_empty() {
            lines.push((doc.title.clone(), style.title_font_size, Align::Centre));
        }
        if let Some(subtitle) = present(&doc.subtitle) {
            lines.push((subtitle, style.subtitle_font_size, Align::Centre));
        }
        if let Some(composer) = present(&doc.composer) {
            lines.push((format!("Composer: {composer}"), style.credits_font_size, Align::Centre));
        }
        if let Some(arranger) = present(&doc.arranger) {
            lines.push((format!("Arranger: {arranger}"), style.credits_font_size, Align::Centre));
        }
        if let Some(tempo) = present(&doc.tempo) {
            lines.push((format!("♩ = {tempo} bpm"), style.tempo_font_size, Align::Left));
        }
        lines
    }

    pub fn wrap(&self, style: &Style, avail_width: f64) -> Size {
        let height = self.lines(style).iter().map(|(_, size, _)| style.leading(*size)).sum();
        Size::new(avail_width, height)
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, style: &Style, avail_width: f64) {
        let mut top = 0.0;
        for (text, size, align) in self.lines(style) {
            let x = match align {
                Align::Left => 0.0,
                Align::Centre => avail_width / 2.0,
                Align::Right => avail_width,
            };
            top += write_text(canvas, style, &text, size, top, x, align);
        }
    }
}

/// A single left-aligned line at the heading size.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub text: String,
}

impl Heading {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn wrap(&self, style: &Style, avail_width: f64) -> Size {
        Size::new(avail_width, style.leading(style.heading_font_size))
    }

    pub fn draw(&self, canvas: &mut dyn Canvas, style: &Style) {
        write_text(canvas, style, &self.text, style.heading_font_size, 0.0, 0.0, Align::Left);
    }
}
