//! Chordsheet XML loader and the text helpers shared with the editing layer
//! (chord name symbols, guitar fingerings, piano note lists).

use roxmltree::{Document as XmlDocument, Node};

use crate::error::DocumentError;
use crate::model::*;

// ─── Names and voicings ──────────────────────────────────────────────

/// Replace ASCII accidentals in a chord name with their musical symbols.
pub fn parse_name(name: &str) -> String {
    name.replace('b', "♭").replace('#', "♯")
}

/// Parse a guitar fingering in concise (`xx4455`) or long
/// (`x,x,10,10,11,11`) form into one symbol per string.
pub fn parse_guitar_fingering(text: &str) -> Result<[String; GUITAR_STRINGS], DocumentError> {
    let text = text.trim();
    let symbols: Vec<String> = if text.chars().count() == GUITAR_STRINGS {
        text.chars().map(String::from).collect()
    } else {
        text.split(',').map(|s| s.trim().to_string()).collect()
    };

    let malformed = |reason: String| DocumentError::MalformedVoicing {
        instrument: Instrument::Guitar,
        voicing: text.to_string(),
        reason,
    };

    if symbols.iter().any(String::is_empty) {
        return Err(malformed("empty string symbol".into()));
    }
    let found = symbols.len();
    symbols
        .try_into()
        .map_err(|_| malformed(format!("expected {GUITAR_STRINGS} strings, found {found}")))
}

/// Parse a comma-separated list of note names, lowest first.
pub fn parse_piano_voicing(text: &str) -> Result<Vec<PianoNote>, DocumentError> {
    let malformed = |reason: String| DocumentError::MalformedVoicing {
        instrument: Instrument::Piano,
        voicing: text.to_string(),
        reason,
    };

    if text.trim().is_empty() {
        return Err(malformed("no notes".into()));
    }

    text.split(',')
        .map(|raw| {
            let spelling = spell_note(raw.trim())
                .ok_or_else(|| malformed(format!("'{}' is not a note name", raw.trim())))?;
            let key = key_index(&spelling)
                .ok_or_else(|| malformed(format!("'{spelling}' is outside the 12-key cycle")))?;
            Ok(PianoNote { key, spelling })
        })
        .collect()
}

/// Uppercase the letter and normalise accidentals to `♭`/`♯`.
fn spell_note(raw: &str) -> Option<String> {
    let mut chars = raw.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    if !('A'..='G').contains(&letter) {
        return None;
    }
    let mut spelling = String::from(letter);
    for c in chars {
        match c {
            'b' | '♭' => spelling.push('♭'),
            '#' | '♯' => spelling.push('♯'),
            _ => return None,
        }
    }
    Some(spelling)
}

// ─── XML document ────────────────────────────────────────────────────

/// Parse a chordsheet XML string into a [`Document`].
///
/// The whole document is built before it is returned, so a failure part
/// way through (a bad voicing, a block naming an unknown chord) never
/// yields a half-loaded document.
pub fn parse_chordsheet_xml(xml: &str) -> Result<Document, DocumentError> {
    let doc = XmlDocument::parse(xml).map_err(|e| DocumentError::Xml(e.to_string()))?;
    let root = doc.root_element();

    if root.tag_name().name() != "chordsheet" {
        return Err(DocumentError::Xml(format!(
            "Unsupported root element: '{}'. Expected 'chordsheet'.",
            root.tag_name().name()
        )));
    }

    let mut document = Document::new();

    for child in root.children().filter(|n| n.is_element()) {
        match child.tag_name().name() {
            "title" => document.title = element_text(&child).unwrap_or_default(),
            "subtitle" => document.subtitle = element_text(&child),
            "composer" => document.composer = element_text(&child),
            "arranger" => document.arranger = element_text(&child),
            "tempo" => document.tempo = element_text(&child),
            "timesignature" => document.time_signature = parse_time_signature(&child)?,
            "chords" => parse_chords(&child, &mut document.chords)?,
            _ => {}
        }
    }

    // Sections are read after every chord is known, wherever <chords> sits.
    let mut section_index = 0;
    for child in root.children().filter(|n| n.has_tag_name("section")) {
        section_index += 1;
        let section = parse_section(&child, section_index, &document.chords)?;
        document.sections.push(section);
    }

    log::debug!(
        "loaded chordsheet '{}': {} chords, {} sections",
        document.title,
        document.chords.len(),
        document.sections.len()
    );
    Ok(document)
}

fn element_text(node: &Node) -> Option<String> {
    node.text().map(|t| t.trim().to_string())
}

fn child_text(node: &Node, name: &str) -> Option<String> {
    node.children()
        .find(|n| n.has_tag_name(name))
        .and_then(|n| element_text(&n))
}

fn parse_time_signature(node: &Node) -> Result<u32, DocumentError> {
    let text = element_text(node).unwrap_or_default();
    match text.parse::<u32>() {
        Ok(beats) if beats > 0 => Ok(beats),
        _ => Err(DocumentError::InvalidTimeSignature(text)),
    }
}

// ─── Chords ──────────────────────────────────────────────────────────

fn parse_chords(node: &Node, chords: &mut ChordList) -> Result<(), DocumentError> {
    for chord_node in node.children().filter(|n| n.has_tag_name("chord")) {
        let name = child_text(&chord_node, "name")
            .ok_or_else(|| DocumentError::Xml("<chord> without a <name>".into()))?;
        let mut chord = Chord::new(parse_name(&name));

        for voicing in chord_node.children().filter(|n| n.has_tag_name("voicing")) {
            let inst_name = voicing.attribute("instrument").unwrap_or_default();
            let text = element_text(&voicing).unwrap_or_default();
            match Instrument::from_name(inst_name) {
                Some(instrument) => chord.set_voicing(instrument, &text)?,
                None => log::warn!(
                    "ignoring voicing for unsupported instrument '{}' on chord '{}'",
                    inst_name,
                    chord.name
                ),
            }
        }

        chords.add(chord);
    }
    Ok(())
}

// ─── Sections ────────────────────────────────────────────────────────

fn parse_section(node: &Node, index: usize, chords: &ChordList) -> Result<Section, DocumentError> {
    let name = node
        .attribute("name")
        .map(String::from)
        .unwrap_or_else(|| format!("Section {index}"));
    let mut section = Section::new(name);

    for block_node in node.children().filter(|n| n.has_tag_name("block")) {
        section.blocks.push(parse_block(&block_node, chords)?);
    }
    Ok(section)
}

fn parse_block(node: &Node, chords: &ChordList) -> Result<Block, DocumentError> {
    let length_text = child_text(node, "length")
        .ok_or_else(|| DocumentError::Xml("<block> without a <length>".into()))?;
    let length = Beats::parse(&length_text)?;

    let chord = child_text(node, "chord")
        .filter(|name| !name.is_empty())
        .map(|name| chords.resolve(&parse_name(&name)))
        .transpose()?;

    let notes = child_text(node, "notes");
    Block::new(length, chord, notes)
}
