use super::note::Note;
use super::parse::{is_flat_spelling, split_bass, ParsedChord};

/// Transpose a note name, keeping the requested spelling style.
/// Returns the input unchanged when it is not a note name.
pub fn transpose_note(note: &str, semitones: i32, prefers_flat: bool) -> String {
    match Note::normalize(note) {
        Some(parsed) => parsed.transpose(semitones).spelled(prefers_flat).to_string(),
        None => note.to_string(),
    }
}

/// Transpose a chord symbol by a number of semitones.
///
/// The suffix is reattached verbatim. A flat-spelled root stays flat-spelled;
/// the bass note is spelled with flats when either the root or the bass was
/// written with a flat. Text that is not a chord comes back untouched.
///
/// ```
/// use chordsheet::transpose_chord;
///
/// assert_eq!(transpose_chord("C", 2), "D");
/// assert_eq!(transpose_chord("Db", 1), "D");
/// assert_eq!(transpose_chord("F#m7", 1), "Gm7");
/// assert_eq!(transpose_chord("Bb/D", 2), "C/E");
/// assert_eq!(transpose_chord("N.C.", 3), "N.C.");
/// ```
pub fn transpose_chord(symbol: &str, semitones: i32) -> String {
    let parsed = match ParsedChord::parse(symbol) {
        Some(parsed) => parsed,
        None => return symbol.to_string(),
    };

    let root = parsed.root.transpose(semitones).spelled(parsed.prefers_flat);
    let (_, raw_bass) = split_bass(symbol);

    match (parsed.bass, raw_bass) {
        (Some(bass), Some(raw)) => {
            let prefers_flat = parsed.prefers_flat || is_flat_spelling(raw);
            let bass = bass.transpose(semitones).spelled(prefers_flat);
            format!("{}{}/{}", root, parsed.suffix, bass)
        }
        // Unreadable bass text is carried along rather than dropped.
        (None, Some(raw)) if !raw.trim().is_empty() => {
            format!("{}{}/{}", root, parsed.suffix, raw.trim())
        }
        _ => format!("{}{}", root, parsed.suffix),
    }
}
