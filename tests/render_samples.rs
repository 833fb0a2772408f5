//! Rendering tests — load the fixture chordsheet and render to SVG / JSON.

use chordsheet::renderer::DrawCommand;
use chordsheet::{
    parse_file, render_document, render_document_to_json, render_document_to_svg, render_file_to_svg,
    EstimatedMetrics, PageSize, Style,
};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn output_dir() -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_output");
    std::fs::create_dir_all(&dir).ok();
    dir
}

#[test]
fn render_example_svg() {
    let pages = render_file_to_svg(fixture("example.xml"), &Style::default()).expect("Failed to render example");
    assert_eq!(pages.len(), 1, "example fits on one A4 page");

    let svg = &pages[0];
    assert!(svg.starts_with("<svg"), "Output should be SVG");
    assert!(svg.contains("</svg>"), "SVG should be closed");
    assert!(svg.contains("Example Song"), "SVG should contain title");
    assert!(svg.contains("Composer: Ivan Holmes"));
    assert!(svg.contains("♩ = 120 bpm"));
    assert!(svg.contains("Guitar chord voicings"));
    assert!(svg.contains("Piano chord voicings"));
    assert!(svg.contains("Verse") && svg.contains("Chorus"));
    assert!(svg.contains("<circle"), "piano chart should mark voiced keys");

    let out = output_dir().join("example.svg");
    std::fs::write(&out, svg).expect("Failed to write SVG");
}

#[test]
fn render_example_json() {
    let doc = parse_file(fixture("example.xml")).unwrap();
    let json = render_document_to_json(&doc, &Style::default()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let commands = value["pages"][0]["commands"].as_array().expect("commands array");
    assert!(commands.iter().any(|c| c["op"] == "line"));
    assert!(commands.iter().any(|c| c["op"] == "rect" && c["paint"] == "stroke"));
    assert!(commands.iter().any(|c| c["op"] == "circle" && c["paint"] == "fill_inverted"));
}

#[test]
fn svg_pages_match_page_size() {
    let doc = parse_file(fixture("example.xml")).unwrap();
    let style = Style { page_size: PageSize::Letter, ..Style::default() };
    let pages = render_document_to_svg(&doc, &style).unwrap();
    assert!(pages[0].contains(r#"viewBox="0 0 612.00 792.00""#));
}

#[test]
fn every_chord_name_is_drawn_in_the_progression() {
    let doc = parse_file(fixture("example.xml")).unwrap();
    let rendered = render_document(&doc, &Style::default(), &EstimatedMetrics::default()).unwrap();

    let texts: Vec<&str> = rendered
        .instructions()
        .filter_map(|(_, c)| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    for name in ["C", "Am", "B♭", "G", "hold", "push"] {
        assert!(texts.contains(&name), "missing {name}");
    }
}

#[test]
fn custom_measure_is_used_for_guitar_connectors() {
    let doc = parse_file(fixture("example.xml")).unwrap();
    let style = Style::default();

    let narrow = render_document(&doc, &style, &|t: &str, _: &str, size: f64| t.chars().count() as f64 * size * 0.1).unwrap();
    let wide = render_document(&doc, &style, &|t: &str, _: &str, size: f64| t.chars().count() as f64 * size * 0.6).unwrap();

    let line_length = |r: &chordsheet::RenderedDocument| -> f64 {
        r.instructions()
            .filter_map(|(_, c)| match c {
                DrawCommand::Line { x1, x2, y1, y2 } if y1 == y2 => Some(x2 - x1),
                _ => None,
            })
            .sum()
    };
    assert!(line_length(&narrow) > line_length(&wide));
}
