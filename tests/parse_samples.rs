//! Parsing tests — load the fixture chordsheet and check the document model.

use chordsheet::{parse_bytes, parse_file, Beats, DocumentError, Error, Instrument};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

#[test]
fn parse_example_metadata() {
    let doc = parse_file(fixture("example.xml")).expect("Failed to parse example.xml");

    assert_eq!(doc.title, "Example Song");
    assert_eq!(doc.subtitle.as_deref(), Some("Chord chart"));
    assert_eq!(doc.composer.as_deref(), Some("Ivan Holmes"));
    assert_eq!(doc.arranger.as_deref(), Some("Ivan Holmes"));
    assert_eq!(doc.tempo.as_deref(), Some("120"));
    assert_eq!(doc.time_signature, 4);
}

#[test]
fn parse_example_chords() {
    let doc = parse_file(fixture("example.xml")).unwrap();
    let names: Vec<&str> = doc.chords.iter().map(|(_, c)| c.name.as_str()).collect();
    assert_eq!(names, vec!["C", "Am", "B♭", "G"]);

    let b_flat = doc.chords.find_by_name("B♭").expect("B♭ should be in the chord list");
    let chord = doc.chords.get(b_flat).unwrap();
    assert_eq!(
        chord.voicings.guitar.as_ref().map(|v| v.to_string()).as_deref(),
        Some("x,1,3,3,3,1")
    );
    assert!(chord.voicings.has(Instrument::Piano));

    let g = doc.chords.get(doc.chords.find_by_name("G").unwrap()).unwrap();
    assert!(g.voicings.has(Instrument::Guitar));
    assert!(!g.voicings.has(Instrument::Piano));
}

#[test]
fn parse_example_sections() {
    let doc = parse_file(fixture("example.xml")).unwrap();
    let summary: Vec<(&str, Beats)> = doc.sections.iter().map(|s| (s.name.as_str(), s.total_beats())).collect();
    assert_eq!(
        summary,
        vec![("Verse", Beats::from_whole(24)), ("Chorus", Beats::from_whole(20))]
    );

    let chorus = &doc.sections[1];
    assert_eq!(chorus.blocks[2].length(), Beats::parse("1.5").unwrap());
    assert_eq!(chorus.blocks[2].notes.as_deref(), Some("push"));
    doc.validate().expect("loaded document should validate");
}

#[test]
fn missing_file_is_an_io_error() {
    let err = parse_file(fixture("does-not-exist.xml")).unwrap_err();
    assert!(matches!(err, Error::Document(DocumentError::Io { .. })));
}

#[test]
fn malformed_voicing_fails_the_load() {
    let xml = br#"<chordsheet><chords>
        <chord><name>D</name><voicing instrument="guitar">x,x,0,2</voicing></chord>
    </chords></chordsheet>"#;
    let err = parse_bytes(xml).unwrap_err();
    assert!(matches!(
        err,
        Error::Document(DocumentError::MalformedVoicing { instrument: Instrument::Guitar, .. })
    ));
}

#[test]
fn invalid_block_length_fails_the_load() {
    let xml = br#"<chordsheet><section><block><length>0</length></block></section></chordsheet>"#;
    assert!(matches!(
        parse_bytes(xml).unwrap_err(),
        Error::Document(DocumentError::InvalidLength { .. })
    ));
}
