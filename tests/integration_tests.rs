//! Integration tests for chordsheet
//!
//! Tests the path from raw song text to rendered, transposed lines and chord
//! diagrams through the public API.

use chordsheet::chord::Fret;
use chordsheet::import::{song_from_tab, TabRecord};
use chordsheet::{
    chord_shapes, get_chord_shape, is_likely_chord_guide_line, merge_chord_shapes, parse_chord,
    parse_content, parse_lyric_line, parse_song_document, render_song, shapes_for_chord,
    stringify_lines, to_song_document, transpose_chord, transpose_document, transpose_segments,
    ChartError, ChordLibrary, ChordQuality, LyricSegment, PreferredShapeSelection, RenderedLine,
    SongLine,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

const WAGON_WHEEL: &str = r#"---
title: Wagon Wheel
artist: Old Crow Medicine Show
key: G
capo: 2
tags: [folk]
---
[Verse 1]
G                 D
Headed down south to the land of the pines
Em                    C
I'm thumbin' my way into North Caroline


# Chorus
[G]So rock me mama like a [D]wagon wheel
(2x)  G   D   Em   C
"#;

#[test]
fn test_document_to_lines() {
    let song = parse_song_document(WAGON_WHEEL).expect("document should parse");
    assert_eq!(song.id, "old-crow-medicine-show-wagon-wheel");
    assert_eq!(song.capo, Some(2));
    assert_eq!(song.tags, vec!["folk"]);
    assert_eq!(
        song.lines,
        vec![
            SongLine::section("Verse 1"),
            SongLine::line("Headed down south to the land of the pines", Some("G                 D")),
            SongLine::line("I'm thumbin' my way into North Caroline", Some("Em                    C")),
            SongLine::Spacer,
            SongLine::section("Chorus"),
            SongLine::line("[G]So rock me mama like a [D]wagon wheel", None),
            SongLine::line("", Some("(2x)  G   D   Em   C")),
        ]
    );
}

#[test]
fn test_render_transposed() {
    let song = parse_song_document(WAGON_WHEEL).unwrap();
    let rendered = render_song(&song, -2);
    assert_eq!(rendered.key, "F");
    assert_eq!(rendered.unique_chords, vec!["A#", "C", "Dm", "F"]);

    let RenderedLine::Line { segments, .. } = &rendered.lines[1] else {
        panic!("expected a lyric line, got {:?}", rendered.lines[1]);
    };
    assert_eq!(
        segments,
        &vec![
            LyricSegment::with_chord("F", "Headed down south "),
            LyricSegment::with_chord("C", "to the land of the pines"),
        ]
    );

    // Lyrics survive every transposition untouched.
    for steps in -11..=11 {
        for (line, original) in render_song(&song, steps).lines.iter().zip(&song.lines) {
            if let (RenderedLine::Line { segments, .. }, SongLine::Line { content, chords }) = (line, original) {
                let lyric: String = segments.iter().map(|segment| segment.lyric.as_str()).collect();
                let expected: String = parse_lyric_line(content, chords.as_deref())
                    .into_iter()
                    .map(|segment| segment.lyric)
                    .collect();
                assert_eq!(lyric, expected);
            }
        }
    }
}

#[test]
fn test_end_to_end_example() {
    let lines = parse_content("[Verse]\n   C        G\nHello there my friend\n\nD\nGoodbye");
    assert_eq!(
        lines,
        vec![
            SongLine::section("Verse"),
            SongLine::line("Hello there my friend", Some("   C        G")),
            SongLine::Spacer,
            SongLine::line("Goodbye", Some("D")),
        ]
    );
}

#[test]
fn test_no_consecutive_spacers() {
    let text = (0..20).map(|i| if i % 3 == 0 { "la" } else { "" }).collect::<Vec<_>>().join("\n");
    let lines = parse_content(&text);
    assert!(lines.windows(2).all(|pair| !(pair[0] == SongLine::Spacer && pair[1] == SongLine::Spacer)));
}

#[test]
fn test_guide_lyric_concatenation() {
    let cases = [
        ("Hello there my friend", "   C        G"),
        ("short", "C     G      Am      F       D"),
        ("a much longer lyric line than its guide", "Em"),
        ("ünïcödé wörds hère", "  D   A"),
        ("", "G  D"),
    ];
    for (lyric, guide) in cases {
        let joined: String = parse_lyric_line(lyric, Some(guide)).into_iter().map(|segment| segment.lyric).collect();
        assert_eq!(joined, lyric, "guide {:?} over {:?}", guide, lyric);
    }
}

#[test]
fn test_chord_properties() {
    assert_eq!(transpose_chord("C", 12), "C");
    assert_eq!(transpose_chord("C", -12), "C");
    assert_eq!(transpose_chord("C", 2), "D");
    assert_eq!(transpose_chord("Db", 1), "D");
    assert_eq!(transpose_chord("F#m7", 1), "Gm7");
    assert_eq!(transpose_chord("N.C.", 3), "N.C.");

    let quality = |symbol: &str| parse_chord(symbol).map(|chord| chord.quality);
    assert_eq!(quality("C"), Some(ChordQuality::Major));
    assert_eq!(quality("Cm7b5"), Some(ChordQuality::HalfDiminished));
    assert_eq!(quality("Csus"), Some(ChordQuality::Sus4));
    assert_eq!(quality("Cadd9"), Some(ChordQuality::Add9));
    assert_eq!(quality("C13"), Some(ChordQuality::Seventh));
    assert_eq!(quality("Cxyz"), Some(ChordQuality::Unknown));
    assert_eq!(quality("xyz"), None);

    assert!(is_likely_chord_guide_line("   C        G        Am"));
    assert!(!is_likely_chord_guide_line("I walked down the lonely road"));
    assert!(is_likely_chord_guide_line("C"));
}

#[test]
fn test_transpose_round_trip() {
    for symbol in ["G", "Em7", "C#m7b5", "Dsus4", "A/C#", "F#7"] {
        for steps in -11..=11 {
            assert_eq!(transpose_chord(&transpose_chord(symbol, steps), -steps), symbol, "{} by {}", symbol, steps);
        }
    }
}

#[test]
fn test_transpose_segments_keeps_lyrics() {
    let segments = parse_lyric_line("[Bb]Take me [Gm7]home, country [Eb]roads", None);
    let up = transpose_segments(&segments, 2, transpose_chord);
    assert_eq!(
        up,
        vec![
            LyricSegment::with_chord("C", "Take me "),
            LyricSegment::with_chord("Am7", "home, country "),
            LyricSegment::with_chord("F", "roads"),
        ]
    );
}

#[test]
fn test_stringify_reparses_to_same_chords() {
    let lines = parse_content("[Intro]\n[C]One [G]two [Am]three [F]four\nplain words");
    let reparsed = parse_content(&stringify_lines(&lines));

    let segments = |lines: &[SongLine]| -> Vec<LyricSegment> {
        lines
            .iter()
            .flat_map(|line| match line {
                SongLine::Line { content, chords } => parse_lyric_line(content, chords.as_deref()),
                _ => Vec::new(),
            })
            .collect()
    };
    assert_eq!(segments(&lines), segments(&reparsed));
}

#[test]
fn test_transpose_document_round_trip() {
    let up = transpose_document(WAGON_WHEEL, 3).unwrap();
    let down = transpose_document(&up, -3).unwrap();
    let song = parse_song_document(&down).unwrap();
    assert_eq!(song.default_key, "G");

    let original = render_song(&parse_song_document(WAGON_WHEEL).unwrap(), 0);
    assert_eq!(render_song(&song, 0).unique_chords, original.unique_chords);
}

#[test]
fn test_shapes_and_library() {
    assert_eq!(get_chord_shape("G").map(|shape| shape.is_open), Some(true));
    assert!(get_chord_shape("Cxyz").is_none());
    assert!(!chord_shapes("Bbm7").is_empty());

    let library = ChordLibrary::from_yaml(
        r#"
custom:
  Am:
    - id: "default-override:Am:0"
      frets: ["x", 0, 2, 2, 1, 0]
      isOpen: true
      label: Mine
preferred:
  F:
    type: built-in
    index: 0
"#,
    )
    .expect("library should load");
    let merged = library.merged();

    let am = shapes_for_chord("Am", &merged);
    assert_eq!(am[0].label.as_deref(), Some("Mine"));
    assert_eq!(am[0].frets[0], Fret::Muted);
    assert_eq!(am.len(), chordsheet::list_built_in_chord_shapes()["Am"].len());
}

#[test]
fn test_preferred_third_of_three_moves_first() {
    let shape = |fret: u8| chordsheet::ChordShape {
        frets: [Fret::At(fret); 6],
        fingers: None,
        barres: Vec::new(),
        is_open: false,
        label: Some(format!("fret {}", fret)),
    };
    let built_in = BTreeMap::from([("X".to_string(), vec![shape(1), shape(2), shape(3)])]);
    let preferred = BTreeMap::from([("X".to_string(), PreferredShapeSelection::BuiltIn { index: 2 })]);

    let merged = merge_chord_shapes(&built_in, &BTreeMap::new(), &preferred);
    let labels: Vec<_> = merged["X"].iter().filter_map(|shape| shape.label.clone()).collect();
    assert_eq!(labels, vec!["fret 3", "fret 1", "fret 2"]);
}

#[test]
fn test_import_tab_to_document() {
    let tab = TabRecord::from_json(
        r#"{"id": 1234567, "song_name": "Let It Be", "artist_name": "The Beatles",
            "tonality_name": "C", "content": "[Verse]\r\n[tab][ch]C[/ch]       [ch]G[/ch]\r\nWhen I find myself[/tab]"}"#,
    )
    .unwrap();
    let song = song_from_tab(&tab).unwrap();
    let document = to_song_document(&song).unwrap();
    let reparsed = parse_song_document(&document).unwrap();
    assert_eq!(reparsed, song);
}

#[test]
fn test_errors_at_the_edges() {
    assert!(matches!(parse_song_document("---\ncapo: -1\n---\nla"), Err(ChartError::MetadataError(_))));
    assert!(matches!(ChordLibrary::from_yaml("custom: 12"), Err(ChartError::LibraryError(_))));
    assert!(matches!(chordsheet::Song::from_json("{}"), Err(ChartError::RecordError(_))));
    assert!(matches!(chordsheet::import::extract_tab_id(""), Err(ChartError::ImportError(_))));
}
