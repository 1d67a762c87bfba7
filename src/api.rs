//! # Public API
//!
//! High-level entry points that tie the chord model, line parsing and song
//! records together.
//!
//! ## Functions
//!
//! - [`render_song()`] - Transposed segments for every line, ready to display
//! - [`transpose_song()`] - A song rewritten in another key
//! - [`transpose_document()`] - Same, from document text to document text
//! - [`current_key()`] / [`transpose_options()`] - Key display for the transposer
//! - [`shapes_for_chord()`] - Diagrams for a chord, user library first
//!
//! ## Typical Usage
//!
//! ```rust
//! use chordsheet::{parse_song_document, render_song, RenderedLine};
//!
//! let song = parse_song_document(r#"---
//! title: Amazing Grace
//! key: G
//! ---
//! [Verse]
//!          G            C      G
//! Amazing grace how sweet the sound
//! "#)?;
//!
//! let rendered = render_song(&song, 2);
//! assert_eq!(rendered.key, "A");
//! assert_eq!(rendered.unique_chords, vec!["A", "D"]);
//! assert!(matches!(rendered.lines[0], RenderedLine::Section { .. }));
//! # Ok::<(), chordsheet::ChartError>(())
//! ```

use crate::chord::{chord_shapes, transpose_chord, ChordShape, ShapeTable};
use crate::content::SongLine;
use crate::error::ChartError;
use crate::lyrics::{parse_lyric_line, segments_to_ultimate_guitar_lines, transpose_segments, LyricSegment};
use crate::song::{parse_song_document, to_song_document, Song};
use serde::Serialize;
use std::collections::BTreeSet;

pub const MIN_STEP: i32 = -11;
pub const MAX_STEP: i32 = 11;

/// A song line prepared for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RenderedLine {
    Section { label: String },
    Line { content: String, segments: Vec<LyricSegment> },
    Spacer,
}

/// A song transposed and split into segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedSong {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub key: String,
    pub steps: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capo: Option<u32>,
    pub lines: Vec<RenderedLine>,
    /// Every chord used, sorted.
    pub unique_chords: Vec<String>,
}

/// Clamp a transposition to one octave either way.
pub fn clamp_steps(steps: i32) -> i32 {
    steps.clamp(MIN_STEP, MAX_STEP)
}

/// The song's default key after transposing.
pub fn current_key(song: &Song, steps: i32) -> String {
    transpose_chord(&song.default_key, steps)
}

/// `(steps, key)` for every step from -11 to 11.
///
/// ```
/// use chordsheet::transpose_options;
///
/// let options = transpose_options("G");
/// assert_eq!(options.len(), 23);
/// assert_eq!(options[0], (-11, "G#".to_string()));
/// assert!(options.contains(&(0, "G".to_string())));
/// ```
pub fn transpose_options(key: &str) -> Vec<(i32, String)> {
    (MIN_STEP..=MAX_STEP)
        .map(|steps| (steps, transpose_chord(key, steps)))
        .collect()
}

fn line_segments(content: &str, chords: Option<&str>, steps: i32) -> Vec<LyricSegment> {
    transpose_segments(&parse_lyric_line(content, chords), steps, transpose_chord)
}

/// Split every line into segments and transpose its chords.
pub fn render_song(song: &Song, steps: i32) -> RenderedSong {
    let steps = clamp_steps(steps);
    let mut collected = BTreeSet::new();

    let lines = song
        .lines
        .iter()
        .map(|line| match line {
            SongLine::Section { label } => RenderedLine::Section { label: label.clone() },
            SongLine::Spacer => RenderedLine::Spacer,
            SongLine::Line { content, chords } => {
                let segments = line_segments(content, chords.as_deref(), steps);
                collected.extend(segments.iter().filter_map(|segment| segment.chord.clone()));
                RenderedLine::Line { content: content.clone(), segments }
            }
        })
        .collect();

    RenderedSong {
        id: song.id.clone(),
        title: song.title.clone(),
        artist: song.artist.clone(),
        key: current_key(song, steps),
        steps,
        capo: song.capo,
        lines,
        unique_chords: collected.into_iter().collect(),
    }
}

/// The song rewritten in a new key.
///
/// Lyric lines are rebuilt as chord-guide lines from their transposed
/// segments, so text on a guide line that is not a chord is dropped and
/// inline `[Chord]` markup becomes a guide line.
pub fn transpose_song(song: &Song, steps: i32) -> Song {
    let steps = clamp_steps(steps);
    let lines = song
        .lines
        .iter()
        .map(|line| match line {
            SongLine::Line { content, chords } => {
                let formatted = segments_to_ultimate_guitar_lines(&line_segments(content, chords.as_deref(), steps));
                let chords = Some(formatted.chords).filter(|chords| !chords.is_empty());
                SongLine::Line { content: formatted.lyric, chords }
            }
            other => other.clone(),
        })
        .collect();

    Song { default_key: current_key(song, steps), lines, ..song.clone() }
}

/// Parse a song document, transpose it and write it back.
pub fn transpose_document(source: &str, steps: i32) -> Result<String, ChartError> {
    let song = parse_song_document(source)?;
    to_song_document(&transpose_song(&song, steps))
}

/// Shapes to draw for a chord: the merged library entry when there is one,
/// otherwise the built-in shapes. Empty means no diagram is available.
pub fn shapes_for_chord(symbol: &str, merged: &ShapeTable) -> Vec<ChordShape> {
    match merged.get(symbol) {
        Some(shapes) if !shapes.is_empty() => shapes.clone(),
        _ => chord_shapes(symbol),
    }
}
