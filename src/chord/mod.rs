//! # Chord Model
//!
//! Chord symbols, transposition and guitar shapes.
//!
//! ## Sub-modules
//! - `note` - the 12 pitch classes and their sharp/flat spellings
//! - `parse` - chord symbol parsing and quality classification
//! - `transpose` - chord transposition that keeps the input's spelling style
//! - `shapes` - built-in open shapes and movable barre templates
//! - `library` - custom shapes, default overrides and preferred selections
//!
//! ## Failure Model
//! Nothing here returns an error. Text that is not a chord gives `None` from
//! [`parse_chord`], passes through [`transpose_chord`] unchanged, and has no
//! shape.
//!
//! ## Example
//! ```rust
//! use chordsheet::chord::{get_chord_shape, parse_chord, transpose_chord, ChordQuality};
//!
//! let chord = parse_chord("F#m7").unwrap();
//! assert_eq!(chord.quality, ChordQuality::MinorSeventh);
//!
//! assert_eq!(transpose_chord("F#m7", 1), "Gm7");
//! assert!(get_chord_shape("Gm7").is_some());
//! ```

mod library;
mod note;
mod parse;
mod shapes;
mod transpose;

pub use library::{
    build_default_override_id, merge_chord_shapes, parse_default_override_id, ChordLibrary,
    CustomChordShape, PreferredShapeSelection, ShapeTable, DEFAULT_OVERRIDE_PREFIX,
};
pub use note::{Note, NOTE_SEQUENCE};
pub use parse::{parse_chord, ChordQuality, ParsedChord};
pub use shapes::{
    chord_shapes, get_chord_shape, list_built_in_chord_shapes, shapes_for_parsed, Barre,
    ChordShape, Fret, STRING_COUNT,
};
pub use transpose::{transpose_chord, transpose_note};
