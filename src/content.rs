//! # Song Content
//!
//! Splits a song text into typed [`SongLine`]s and writes them back.
//!
//! ## Line Rules
//! Lines are classified in source order, first match wins:
//! 1. **Blank** - a spacer; runs of blank lines collapse to one spacer.
//! 2. **`[Label]`** - a section header (`[Verse]`, `[Chorus 2]`).
//! 3. **`# Label`** - a section header.
//! 4. **Chord-guide line** - held back and attached to the next lyric line.
//! 5. **Anything else** - a lyric line, carrying the held guide line if any.
//!
//! A guide line that is not followed by a lyric (end of text, a blank line, a
//! header, or another guide line) becomes a line with empty content.
//!
//! ## Example
//! ```rust
//! use chordsheet::{parse_content, SongLine};
//!
//! let lines = parse_content("[Verse]\n   C        G\nHello there my friend\n\nD\nGoodbye");
//! assert_eq!(lines, vec![
//!     SongLine::section("Verse"),
//!     SongLine::line("Hello there my friend", Some("   C        G")),
//!     SongLine::Spacer,
//!     SongLine::line("Goodbye", Some("D")),
//! ]);
//! ```

use crate::lyrics::{is_likely_chord_guide_line, parse_lyric_line, segments_to_ultimate_guitar_lines};
use serde::{Deserialize, Serialize};

/// One structural line of a song.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SongLine {
    Section {
        label: String,
    },
    Line {
        content: String,
        /// Raw chord-guide text that stood above `content`, columns intact.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        chords: Option<String>,
    },
    Spacer,
}

impl SongLine {
    pub fn section(label: impl Into<String>) -> Self {
        SongLine::Section { label: label.into() }
    }

    pub fn line(content: impl Into<String>, chords: Option<&str>) -> Self {
        SongLine::Line {
            content: content.into(),
            chords: chords.map(str::to_string),
        }
    }
}

const DEFAULT_SECTION_LABEL: &str = "Section";

/// Parser state between lines: the output so far and a guide line waiting
/// for its lyric.
#[derive(Default)]
struct ContentState {
    lines: Vec<SongLine>,
    pending_guide: Option<String>,
}

impl ContentState {
    fn flush_guide(mut self) -> Self {
        if let Some(guide) = self.pending_guide.take() {
            self.lines.push(SongLine::line("", Some(&guide)));
        }
        self
    }

    fn step(self, line: &str) -> Self {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            let mut state = self.flush_guide();
            if state.lines.last() != Some(&SongLine::Spacer) {
                state.lines.push(SongLine::Spacer);
            }
            return state;
        }

        if let Some(label) = bracket_section_label(trimmed) {
            let mut state = self.flush_guide();
            state.lines.push(SongLine::section(label));
            return state;
        }

        if trimmed.starts_with('#') {
            let label = trimmed.trim_start_matches('#').trim();
            let mut state = self.flush_guide();
            state.lines.push(SongLine::section(or_default_label(label)));
            return state;
        }

        if is_likely_chord_guide_line(line) {
            let mut state = self.flush_guide();
            state.pending_guide = Some(line.to_string());
            return state;
        }

        let mut state = self;
        let guide = state.pending_guide.take();
        state.lines.push(SongLine::line(line, guide.as_deref()));
        state
    }

    fn finish(self) -> Vec<SongLine> {
        self.flush_guide().lines
    }
}

fn or_default_label(label: &str) -> &str {
    if label.is_empty() {
        DEFAULT_SECTION_LABEL
    } else {
        label
    }
}

/// `[Label]` covering the whole trimmed line. Everything between the outer
/// brackets is the label, so `[C]  [G]` reads as a section named `C]  [G`.
fn bracket_section_label(trimmed: &str) -> Option<&str> {
    let inner = trimmed.strip_prefix('[')?.strip_suffix(']')?;
    if inner.is_empty() {
        return None;
    }
    Some(or_default_label(inner.trim()))
}

/// Parse song text into structural lines.
pub fn parse_content(text: &str) -> Vec<SongLine> {
    text.replace("\r\n", "\n")
        .split('\n')
        .fold(ContentState::default(), ContentState::step)
        .finish()
}

/// Write structural lines back as Ultimate-Guitar style text.
///
/// Stored chord-guide lines are written as they are. Lines without one get a
/// guide line built from their inline `[Chord]` markup.
///
/// ```
/// use chordsheet::{stringify_lines, SongLine};
///
/// let text = stringify_lines(&[
///     SongLine::section("Chorus"),
///     SongLine::line("[G]Sing [D]along", None),
///     SongLine::Spacer,
///     SongLine::line("Plain words", None),
/// ]);
/// assert_eq!(text, "[Chorus]\nG    D\nSing along\n\nPlain words");
/// ```
pub fn stringify_lines(lines: &[SongLine]) -> String {
    let mut output: Vec<String> = Vec::with_capacity(lines.len());

    for line in lines {
        match line {
            SongLine::Section { label } => output.push(format!("[{}]", label)),
            SongLine::Spacer => output.push(String::new()),
            SongLine::Line { content, chords: Some(chords) } if !chords.trim().is_empty() => {
                output.push(chords.clone());
                output.push(content.clone());
            }
            SongLine::Line { content, .. } => {
                let formatted = segments_to_ultimate_guitar_lines(&parse_lyric_line(content, None));
                if !formatted.chords.is_empty() {
                    output.push(formatted.chords);
                }
                output.push(formatted.lyric);
            }
        }
    }

    output.join("\n")
}
