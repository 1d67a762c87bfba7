//! Chord symbol parsing.
//!
//! A chord symbol is a root note, an optional accidental, a free-form suffix
//! and an optional `/bass` note: `F#m7b5`, `Bb/D`, `Gsus4`, `E♭maj7`.
//! The suffix is kept verbatim; its lowercase form decides the [`ChordQuality`].

use super::note::Note;
use std::fmt;

/// Chord quality, as far as shapes and guide-line detection care.
///
/// `Unknown` chords still have a valid root and can be transposed, but no
/// fretboard shape is ever produced for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChordQuality {
    Major,
    Minor,
    Seventh,
    MinorSeventh,
    MajorSeventh,
    Sus4,
    Sus2,
    SeventhSus4,
    Add9,
    Diminished,
    DiminishedSeventh,
    HalfDiminished,
    Augmented,
    Unknown,
}

impl ChordQuality {
    /// Short name: `maj`, `m`, `7`, `m7`, `maj7`, `sus4`, `sus2`, `7sus4`,
    /// `add9`, `dim`, `dim7`, `m7b5`, `aug`, `unknown`.
    pub fn as_str(self) -> &'static str {
        match self {
            ChordQuality::Major => "maj",
            ChordQuality::Minor => "m",
            ChordQuality::Seventh => "7",
            ChordQuality::MinorSeventh => "m7",
            ChordQuality::MajorSeventh => "maj7",
            ChordQuality::Sus4 => "sus4",
            ChordQuality::Sus2 => "sus2",
            ChordQuality::SeventhSus4 => "7sus4",
            ChordQuality::Add9 => "add9",
            ChordQuality::Diminished => "dim",
            ChordQuality::DiminishedSeventh => "dim7",
            ChordQuality::HalfDiminished => "m7b5",
            ChordQuality::Augmented => "aug",
            ChordQuality::Unknown => "unknown",
        }
    }

    /// Suffix used when naming a built-in shape (`C`, `Am`, `Fmaj7`, ...).
    pub fn symbol_suffix(self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            other => other.as_str(),
        }
    }

    /// Classify a chord suffix. Prefix rules are checked in a fixed order so
    /// that overlapping spellings resolve the same way every time: minor
    /// spellings (`m`, `min`, `-`) are examined before `maj`, `m7b5` before
    /// `m7`, `7sus4` before `7`.
    ///
    /// ```
    /// use chordsheet::chord::ChordQuality;
    ///
    /// assert_eq!(ChordQuality::from_suffix(""), ChordQuality::Major);
    /// assert_eq!(ChordQuality::from_suffix("m7b5"), ChordQuality::HalfDiminished);
    /// assert_eq!(ChordQuality::from_suffix("maj7"), ChordQuality::MajorSeventh);
    /// assert_eq!(ChordQuality::from_suffix("13"), ChordQuality::Seventh);
    /// assert_eq!(ChordQuality::from_suffix("xyz"), ChordQuality::Unknown);
    /// ```
    pub fn from_suffix(suffix: &str) -> Self {
        let lower = suffix.trim().to_lowercase();

        if lower.is_empty() {
            return ChordQuality::Major;
        }

        if lower.starts_with('ø') {
            return ChordQuality::HalfDiminished;
        }

        if let Some(rest) = strip_minor_marker(&lower) {
            if rest.starts_with("7b5") || rest.starts_with("7♭5") {
                return ChordQuality::HalfDiminished;
            }
            if rest.starts_with('7') || rest.starts_with('9') {
                return ChordQuality::MinorSeventh;
            }
            return ChordQuality::Minor;
        }

        if lower.starts_with("maj7") || lower.starts_with("ma7") {
            return ChordQuality::MajorSeventh;
        }
        if lower.starts_with("maj") {
            return ChordQuality::Major;
        }
        if lower.starts_with("7sus4") {
            return ChordQuality::SeventhSus4;
        }
        if lower.starts_with("sus2") {
            return ChordQuality::Sus2;
        }
        if lower.starts_with("sus") {
            return ChordQuality::Sus4;
        }
        if lower.starts_with("add9") {
            return ChordQuality::Add9;
        }
        if lower.starts_with("dim7") {
            return ChordQuality::DiminishedSeventh;
        }
        if lower.starts_with("dim") || lower.starts_with('°') {
            return ChordQuality::Diminished;
        }
        if lower.starts_with("aug") || lower.starts_with('+') {
            return ChordQuality::Augmented;
        }
        if lower.starts_with('9') || lower.starts_with("11") || lower.starts_with("13") {
            return ChordQuality::Seventh;
        }
        if lower.starts_with('7') {
            return ChordQuality::Seventh;
        }

        ChordQuality::Unknown
    }
}

/// `min...`, `-...` and `m...` (but not `ma...`, which is major) mark a minor
/// chord. Returns what follows the marker.
fn strip_minor_marker(lower: &str) -> Option<&str> {
    if let Some(rest) = lower.strip_prefix("min") {
        return Some(rest);
    }
    if let Some(rest) = lower.strip_prefix('-') {
        return Some(rest);
    }
    match lower.strip_prefix('m') {
        Some(rest) if !rest.starts_with('a') => Some(rest),
        _ => None,
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chord symbol split into its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedChord {
    pub root: Note,
    /// Everything after the root, trimmed, with its original casing.
    pub suffix: String,
    pub bass: Option<Note>,
    pub quality: ChordQuality,
    /// The root was written with a flat, so output should use flats too.
    pub prefers_flat: bool,
}

impl ParsedChord {
    /// Parse a chord symbol. Returns `None` when there is no valid root.
    ///
    /// An unreadable bass note (`C/H`) leaves `bass` empty instead of failing
    /// the whole chord.
    ///
    /// ```
    /// use chordsheet::chord::{ChordQuality, Note, ParsedChord};
    ///
    /// let chord = ParsedChord::parse("Bbm7/F").unwrap();
    /// assert_eq!(chord.root, Note::ASharp);
    /// assert_eq!(chord.suffix, "m7");
    /// assert_eq!(chord.bass, Some(Note::F));
    /// assert_eq!(chord.quality, ChordQuality::MinorSeventh);
    /// assert!(chord.prefers_flat);
    ///
    /// assert!(ParsedChord::parse("Hello").is_none());
    /// ```
    pub fn parse(symbol: &str) -> Option<Self> {
        if symbol.trim().is_empty() {
            return None;
        }

        let (chord_part, bass_part) = split_bass(symbol);
        let (raw_root, rest) = split_root(chord_part.trim())?;
        let root = Note::normalize(raw_root)?;
        let suffix = rest.trim().to_string();

        Some(Self {
            root,
            quality: ChordQuality::from_suffix(&suffix),
            suffix,
            bass: bass_part.and_then(Note::normalize),
            prefers_flat: is_flat_spelling(raw_root),
        })
    }

    /// True when a shape can be looked up or the chord counts as a chord on a
    /// guide line.
    pub fn is_known(&self) -> bool {
        self.quality != ChordQuality::Unknown
    }
}

/// Convenience wrapper around [`ParsedChord::parse`].
pub fn parse_chord(symbol: &str) -> Option<ParsedChord> {
    ParsedChord::parse(symbol)
}

/// Split `main/bass` on the first two `/`-separated parts. A third part is ignored.
pub(crate) fn split_bass(symbol: &str) -> (&str, Option<&str>) {
    let mut parts = symbol.split('/');
    let main = parts.next().unwrap_or_default();
    (main, parts.next())
}

/// Root letter `A`-`G` plus an optional `#`, `b`, `♯` or `♭`.
fn split_root(chord: &str) -> Option<(&str, &str)> {
    let mut chars = chord.char_indices();
    let (_, letter) = chars.next()?;
    if !('A'..='G').contains(&letter) {
        return None;
    }

    let mut end = letter.len_utf8();
    if let Some((idx, accidental)) = chars.next() {
        if matches!(accidental, '#' | 'b' | '♯' | '♭') {
            end = idx + accidental.len_utf8();
        }
    }
    Some(chord.split_at(end))
}

pub(crate) fn is_flat_spelling(note: &str) -> bool {
    note.contains('b') || note.contains('♭')
}
