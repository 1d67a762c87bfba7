pub mod api;
pub mod chord;
pub mod content;
pub mod error;
pub mod import;
pub mod lyrics;
pub mod song;

pub use api::{
    clamp_steps, current_key, render_song, shapes_for_chord, transpose_document, transpose_options,
    transpose_song, RenderedLine, RenderedSong, MAX_STEP, MIN_STEP,
};
pub use chord::{
    chord_shapes, get_chord_shape, list_built_in_chord_shapes, merge_chord_shapes, parse_chord,
    transpose_chord, ChordLibrary, ChordQuality, ChordShape, CustomChordShape, ParsedChord,
    PreferredShapeSelection,
};
pub use content::{parse_content, stringify_lines, SongLine};
pub use error::*;
pub use lyrics::{
    collect_unique_chords, is_likely_chord_guide_line, parse_lyric_line,
    segments_to_ultimate_guitar_lines, transpose_segments, LyricSegment, UltimateGuitarLines,
};
pub use song::{
    build_song_id, ensure_unique_id, parse_song_document, parse_song_map, to_song_document, Song,
    SongMap,
};
