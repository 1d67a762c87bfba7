//! # Lyric Lines and Chord Segments
//!
//! Turns one lyric line (plus an optional chord-guide line above it) into an
//! ordered list of [`LyricSegment`]s, and back.
//!
//! ## Input Styles
//!
//! ### Chord-guide lines
//! ```text
//!    C        G
//! Hello there my friend
//! ```
//! Each chord on the guide line starts a segment at the same column of the
//! lyric line: `[(None, "Hel"), ("C", "lo there "), ("G", "my friend")]`.
//!
//! ### Inline markup
//! ```text
//! [C]Hello there [G]my friend
//! ```
//! Bracketed text becomes the chord of the following lyric fragment.
//!
//! ## Guarantees
//! - Concatenating the `lyric` of every segment gives back the lyric line
//!   (for inline markup: the line without its bracketed chords).
//! - The result is never empty: a line without chords is one chord-less segment.
//! - Columns are counted in characters, not bytes.

use crate::chord::ParsedChord;
use serde::{Deserialize, Serialize};

/// A lyric fragment, optionally starting with a chord change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LyricSegment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chord: Option<String>,
    pub lyric: String,
}

impl LyricSegment {
    pub fn plain(lyric: impl Into<String>) -> Self {
        Self { chord: None, lyric: lyric.into() }
    }

    pub fn with_chord(chord: impl Into<String>, lyric: impl Into<String>) -> Self {
        Self { chord: Some(chord.into()), lyric: lyric.into() }
    }
}

/// Ultimate-Guitar style pair: a chord line positioned above a lyric line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UltimateGuitarLines {
    pub chords: String,
    pub lyric: String,
}

/// Fraction of tokens that must be chords for a line to count as a guide line.
pub const CHORD_GUIDE_RATIO: f64 = 0.6;

/// Characters stripped from a token before it is read as a chord: bar lines,
/// parentheses and brackets (`|G|`, `(Am)`, `[C]`).
fn sanitize_token(token: &str) -> String {
    token.chars().filter(|c| !matches!(c, '|' | '(' | ')' | '[' | ']')).collect()
}

/// Whitespace-separated tokens of a line with their starting column.
fn tokens_with_columns(line: &str) -> Vec<(usize, &str)> {
    let mut tokens = Vec::new();
    let mut start: Option<(usize, usize)> = None;

    for (column, (byte, c)) in line.char_indices().enumerate() {
        match (c.is_whitespace(), start) {
            (false, None) => start = Some((column, byte)),
            (true, Some((col, from))) => {
                tokens.push((col, &line[from..byte]));
                start = None;
            }
            _ => {}
        }
    }
    if let Some((col, from)) = start {
        tokens.push((col, &line[from..]));
    }
    tokens
}

/// Decide whether a line is mostly chord symbols.
///
/// Tokens are split on whitespace and stripped of `|()[]`. Every token counts
/// toward the total, including a bare `|` that strips to nothing. A token
/// counts as a chord when it parses with a recognised quality. The line
/// qualifies when at least [`CHORD_GUIDE_RATIO`] of its tokens are chords, so
/// an annotation like `(2x)` may sit among the chords while prose that happens
/// to contain `A` does not.
///
/// ```
/// use chordsheet::is_likely_chord_guide_line;
///
/// assert!(is_likely_chord_guide_line("   C        G        Am"));
/// assert!(is_likely_chord_guide_line("G  D/F#  Em  C  (2x)"));
/// assert!(!is_likely_chord_guide_line("| G | D/F# | Em | C |"));
/// assert!(!is_likely_chord_guide_line("I walked down the lonely road"));
/// assert!(!is_likely_chord_guide_line("A day in the life"));
/// ```
pub fn is_likely_chord_guide_line(line: &str) -> bool {
    let tokens: Vec<String> = line
        .split_whitespace()
        .map(sanitize_token)
        .collect();

    if tokens.is_empty() {
        return false;
    }

    let chord_count = tokens
        .iter()
        .filter(|token| ParsedChord::parse(token).is_some_and(|chord| chord.is_known()))
        .count();

    if chord_count == 0 {
        return false;
    }
    if tokens.len() == 1 {
        return chord_count == 1;
    }

    chord_count as f64 / tokens.len() as f64 >= CHORD_GUIDE_RATIO
}

/// Accumulates segments while a line is scanned left to right.
///
/// The only state carried between steps is the chord waiting for its lyric.
#[derive(Default)]
struct SegmentBuilder {
    segments: Vec<LyricSegment>,
    pending: Option<String>,
}

impl SegmentBuilder {
    /// Lyric text up to the next chord (or the end of the line).
    fn text(mut self, text: &str) -> Self {
        match self.pending.take() {
            Some(chord) if chord.is_empty() => self.segments.push(LyricSegment::plain(text)),
            Some(chord) => self.segments.push(LyricSegment::with_chord(chord, text)),
            None if !text.is_empty() => self.segments.push(LyricSegment::plain(text)),
            None => {}
        }
        self
    }

    fn chord(mut self, chord: String) -> Self {
        if self.pending.is_some() {
            self = self.text("");
        }
        self.pending = Some(chord);
        self
    }

    fn finish(self, tail: &str, line: &str) -> Vec<LyricSegment> {
        let segments = self.text(tail).segments;
        if segments.is_empty() {
            vec![LyricSegment::plain(line)]
        } else {
            segments
        }
    }
}

/// Byte index of character `column` in `text`, clamped to its length.
fn byte_at_column(text: &str, column: usize) -> usize {
    text.char_indices().nth(column).map(|(byte, _)| byte).unwrap_or(text.len())
}

/// Chords on a guide line with their columns. Tokens that are not chords
/// (`x2`, `N.C.`, `(repeat)`) are skipped.
fn guide_chords(guide: &str) -> Vec<(usize, String)> {
    tokens_with_columns(guide)
        .into_iter()
        .filter_map(|(column, token)| {
            let chord = sanitize_token(token);
            ParsedChord::parse(&chord).map(|_| (column, chord))
        })
        .collect()
}

fn parse_with_guide(lyric: &str, chords: Vec<(usize, String)>) -> Vec<LyricSegment> {
    let lyric_len = lyric.chars().count();

    let (builder, cursor) = chords.into_iter().fold(
        (SegmentBuilder::default(), 0usize),
        |(builder, cursor), (column, chord)| {
            // Guide and lyric lengths differ freely; keep positions monotonic
            // and inside the lyric.
            let position = column.max(cursor).min(lyric_len);
            let from = byte_at_column(lyric, cursor);
            let to = byte_at_column(lyric, position);
            (builder.text(&lyric[from..to]).chord(chord), position)
        },
    );

    builder.finish(&lyric[byte_at_column(lyric, cursor)..], lyric)
}

/// Next `[chord]` in `line` at or after byte `from`: `(start, end, chord)`.
/// The chord is the trimmed bracket text, so `[ ]` yields an empty chord.
/// `[]` holds nothing and is left as text.
fn next_inline_chord(line: &str, from: usize) -> Option<(usize, usize, &str)> {
    let mut search = from;
    while let Some(open) = line[search..].find('[').map(|i| search + i) {
        let close = line[open + 1..].find(']').map(|i| open + 1 + i)?;
        if close > open + 1 {
            return Some((open, close + 1, line[open + 1..close].trim()));
        }
        search = open + 1;
    }
    None
}

fn parse_inline(line: &str) -> Vec<LyricSegment> {
    let mut builder = SegmentBuilder::default();
    let mut cursor = 0;

    while let Some((start, end, chord)) = next_inline_chord(line, cursor) {
        builder = builder.text(&line[cursor..start]).chord(chord.to_string());
        cursor = end;
    }

    builder.finish(&line[cursor..], line)
}

/// Split a lyric line into chord segments.
///
/// With a non-blank `chord_guide` the chords are positioned by column over the
/// lyric; a guide without any chord falls back to inline `[Chord]` markup in
/// the lyric itself.
///
/// ```
/// use chordsheet::{parse_lyric_line, LyricSegment};
///
/// let segments = parse_lyric_line("Hello there my friend", Some("C     G"));
/// assert_eq!(segments, vec![
///     LyricSegment::with_chord("C", "Hello "),
///     LyricSegment::with_chord("G", "there my friend"),
/// ]);
///
/// let segments = parse_lyric_line("[Am]Hold [F]on", None);
/// assert_eq!(segments, vec![
///     LyricSegment::with_chord("Am", "Hold "),
///     LyricSegment::with_chord("F", "on"),
/// ]);
/// ```
pub fn parse_lyric_line(lyric: &str, chord_guide: Option<&str>) -> Vec<LyricSegment> {
    match chord_guide.filter(|guide| !guide.trim().is_empty()) {
        Some(guide) => {
            let chords = guide_chords(guide);
            if chords.is_empty() {
                parse_inline(lyric)
            } else {
                parse_with_guide(lyric, chords)
            }
        }
        None => parse_inline(lyric),
    }
}

/// Render segments as a chord line above a lyric line.
///
/// Each chord is placed at the column where its lyric starts. When that spot
/// is taken (or would touch the previous chord) it slides right one column at
/// a time; chords never move left. Trailing spaces are trimmed from the chord
/// line only.
///
/// ```
/// use chordsheet::{parse_lyric_line, segments_to_ultimate_guitar_lines};
///
/// let lines = segments_to_ultimate_guitar_lines(&parse_lyric_line("[C]Hello [G]world", None));
/// assert_eq!(lines.chords, "C     G");
/// assert_eq!(lines.lyric, "Hello world");
/// ```
pub fn segments_to_ultimate_guitar_lines(segments: &[LyricSegment]) -> UltimateGuitarLines {
    let lyric: String = segments.iter().map(|segment| segment.lyric.as_str()).collect();

    if segments.iter().all(|segment| segment.chord.is_none()) {
        return UltimateGuitarLines { chords: String::new(), lyric };
    }

    let mut buffer: Vec<char> = Vec::new();
    let mut column = 0;

    for segment in segments {
        if let Some(chord) = segment.chord.as_deref() {
            let chord: Vec<char> = chord.chars().collect();
            let mut position = column;
            while !is_free(&buffer, position, chord.len()) {
                position += 1;
            }
            if buffer.len() < position + chord.len() {
                buffer.resize(position + chord.len(), ' ');
            }
            buffer[position..position + chord.len()].copy_from_slice(&chord);
        }
        column += segment.lyric.chars().count();
    }

    let chords: String = buffer.into_iter().collect();
    UltimateGuitarLines { chords: chords.trim_end().to_string(), lyric }
}

/// A chord fits at `position` when its cells and the cell just before it are blank.
fn is_free(buffer: &[char], position: usize, width: usize) -> bool {
    let from = position.saturating_sub(1);
    let to = (position + width).min(buffer.len());
    from >= to || buffer[from..to].iter().all(|c| *c == ' ')
}

/// Transpose every chord in a segment list; lyrics are left as they are.
///
/// ```
/// use chordsheet::{parse_lyric_line, transpose_chord, transpose_segments};
///
/// let segments = parse_lyric_line("[C]Hello [Am]world", None);
/// let up = transpose_segments(&segments, 2, transpose_chord);
/// assert_eq!(up[0].chord.as_deref(), Some("D"));
/// assert_eq!(up[1].chord.as_deref(), Some("Bm"));
/// assert_eq!(up[1].lyric, "world");
/// ```
pub fn transpose_segments<F>(segments: &[LyricSegment], semitones: i32, transpose_fn: F) -> Vec<LyricSegment>
where
    F: Fn(&str, i32) -> String,
{
    segments
        .iter()
        .map(|segment| LyricSegment {
            chord: segment.chord.as_deref().map(|chord| transpose_fn(chord, semitones)),
            lyric: segment.lyric.clone(),
        })
        .collect()
}

/// Distinct chords in order of first appearance.
pub fn collect_unique_chords(segments: &[LyricSegment]) -> Vec<String> {
    let mut chords: Vec<String> = Vec::new();
    for chord in segments.iter().filter_map(|segment| segment.chord.as_ref()) {
        if !chords.contains(chord) {
            chords.push(chord.clone());
        }
    }
    chords
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::transpose_chord;
    use pretty_assertions::assert_eq;

    fn joined(segments: &[LyricSegment]) -> String {
        segments.iter().map(|s| s.lyric.as_str()).collect()
    }

    #[test]
    fn test_guide_line_detection() {
        assert!(is_likely_chord_guide_line("   C        G        Am"));
        assert!(is_likely_chord_guide_line("C"));
        assert!(is_likely_chord_guide_line("Am7  D9  Gmaj7  Cadd9"));
        assert!(is_likely_chord_guide_line("(G)  [C]  |D|"));
        assert!(!is_likely_chord_guide_line("I walked down the lonely road"));
        assert!(!is_likely_chord_guide_line(""));
        assert!(!is_likely_chord_guide_line("    "));
        assert!(!is_likely_chord_guide_line("| | |"));
    }

    #[test]
    fn test_guide_line_tolerates_annotations() {
        // 3 of 4 tokens are chords.
        assert!(is_likely_chord_guide_line("G  D  Em  x4"));
        // 2 of 4 is not enough.
        assert!(!is_likely_chord_guide_line("G  D  riff  x4"));
    }

    #[test]
    fn test_bar_lines_count_as_tokens() {
        // 4 chords among 9 tokens.
        assert!(!is_likely_chord_guide_line("| G | D | Em | C |"));
        assert!(is_likely_chord_guide_line("|G| |D| |Em|"));
    }

    #[test]
    fn test_guide_line_requires_known_quality() {
        assert!(!is_likely_chord_guide_line("Cxyz"));
        assert!(!is_likely_chord_guide_line("Be Do"));
        assert!(!is_likely_chord_guide_line("x2"));
    }

    #[test]
    fn test_guide_mode_positions() {
        let segments = parse_lyric_line("Hello there my friend", Some("   C        G"));
        assert_eq!(
            segments,
            vec![
                LyricSegment::plain("Hel"),
                LyricSegment::with_chord("C", "lo there "),
                LyricSegment::with_chord("G", "my friend"),
            ]
        );
    }

    #[test]
    fn test_guide_longer_than_lyric() {
        let segments = parse_lyric_line("Hi", Some("C      G      D"));
        assert_eq!(
            segments,
            vec![
                LyricSegment::with_chord("C", "Hi"),
                LyricSegment::with_chord("G", ""),
                LyricSegment::with_chord("D", ""),
            ]
        );
    }

    #[test]
    fn test_guide_with_empty_lyric() {
        let segments = parse_lyric_line("", Some("G   D"));
        assert_eq!(segments, vec![LyricSegment::with_chord("G", ""), LyricSegment::with_chord("D", "")]);
    }

    #[test]
    fn test_guide_tokens_are_sanitized() {
        let segments = parse_lyric_line("one two three", Some("(G)    |D|  x2"));
        assert_eq!(
            segments,
            vec![LyricSegment::with_chord("G", "one two"), LyricSegment::with_chord("D", " three")]
        );
    }

    #[test]
    fn test_guide_without_chords_falls_back_to_inline() {
        let segments = parse_lyric_line("[G]Sing it", Some("riff x2"));
        assert_eq!(segments, vec![LyricSegment::with_chord("G", "Sing it")]);
    }

    #[test]
    fn test_guide_mode_preserves_lyric_text() {
        let cases = [
            ("Hello there my friend", "   C        G"),
            ("short", "C   G   D   A   E   B"),
            ("a much longer lyric than the guide", "Em"),
            ("ünïcödé wörds hére", "  Am    F"),
            ("[not] markup", "D"),
        ];
        for (lyric, guide) in cases {
            assert_eq!(joined(&parse_lyric_line(lyric, Some(guide))), lyric);
        }
    }

    #[test]
    fn test_guide_columns_count_characters() {
        let segments = parse_lyric_line("ééé abc", Some("    G"));
        assert_eq!(segments, vec![LyricSegment::plain("ééé "), LyricSegment::with_chord("G", "abc")]);
    }

    #[test]
    fn test_inline_mode() {
        let segments = parse_lyric_line("Intro [Am]Hold [F]on [C]", None);
        assert_eq!(
            segments,
            vec![
                LyricSegment::plain("Intro "),
                LyricSegment::with_chord("Am", "Hold "),
                LyricSegment::with_chord("F", "on "),
                LyricSegment::with_chord("C", ""),
            ]
        );
    }

    #[test]
    fn test_inline_adjacent_chords() {
        let segments = parse_lyric_line("[C][G]Go", None);
        assert_eq!(segments, vec![LyricSegment::with_chord("C", ""), LyricSegment::with_chord("G", "Go")]);
    }

    #[test]
    fn test_inline_blank_brackets() {
        // `[]` stays in the lyric, `[ ]` is consumed as an empty chord.
        let segments = parse_lyric_line("a [] b [ ] c", None);
        assert_eq!(segments, vec![LyricSegment::plain("a [] b "), LyricSegment::plain(" c")]);
        assert_eq!(joined(&segments), "a [] b  c");
        assert_eq!(collect_unique_chords(&segments), Vec::<String>::new());
    }

    #[test]
    fn test_inline_chord_text_is_trimmed() {
        let segments = parse_lyric_line("[ Dm7 ]la", None);
        assert_eq!(segments, vec![LyricSegment::with_chord("Dm7", "la")]);
    }

    #[test]
    fn test_no_chords_gives_single_segment() {
        assert_eq!(parse_lyric_line("Just words", None), vec![LyricSegment::plain("Just words")]);
        assert_eq!(parse_lyric_line("", None), vec![LyricSegment::plain("")]);
        assert_eq!(parse_lyric_line("Just words", Some("   ")), vec![LyricSegment::plain("Just words")]);
    }

    #[test]
    fn test_ultimate_guitar_lines() {
        let segments = parse_lyric_line("[C]Hello there [G]my friend", None);
        let lines = segments_to_ultimate_guitar_lines(&segments);
        assert_eq!(lines.chords, "C           G");
        assert_eq!(lines.lyric, "Hello there my friend");
    }

    #[test]
    fn test_ultimate_guitar_lines_without_chords() {
        let lines = segments_to_ultimate_guitar_lines(&[LyricSegment::plain("la la")]);
        assert_eq!(lines, UltimateGuitarLines { chords: String::new(), lyric: "la la".to_string() });
    }

    #[test]
    fn test_ultimate_guitar_lines_slide_on_collision() {
        let segments = vec![
            LyricSegment::with_chord("Cmaj7", "a"),
            LyricSegment::with_chord("G", "b"),
            LyricSegment::with_chord("D", "cdefghij"),
        ];
        let lines = segments_to_ultimate_guitar_lines(&segments);
        assert_eq!(lines.chords, "Cmaj7 G D");
        assert_eq!(lines.lyric, "abcdefghij");
    }

    #[test]
    fn test_ultimate_guitar_lines_reparse_to_same_chords() {
        let original = parse_lyric_line("[C]Hel[G]lo [Am]my [F]friend", None);
        let lines = segments_to_ultimate_guitar_lines(&original);
        let reparsed = parse_lyric_line(&lines.lyric, Some(&lines.chords));
        assert_eq!(collect_unique_chords(&reparsed), vec!["C", "G", "Am", "F"]);
        assert_eq!(joined(&reparsed), "Hello my friend");
    }

    #[test]
    fn test_transpose_segments() {
        let segments = vec![LyricSegment::plain("Intro "), LyricSegment::with_chord("Bb", "go")];
        let transposed = transpose_segments(&segments, -2, transpose_chord);
        assert_eq!(transposed, vec![LyricSegment::plain("Intro "), LyricSegment::with_chord("Ab", "go")]);
    }

    #[test]
    fn test_collect_unique_chords() {
        let segments = parse_lyric_line("[G]a [D]b [G]c [Em]d", None);
        assert_eq!(collect_unique_chords(&segments), vec!["G", "D", "Em"]);
    }
}
