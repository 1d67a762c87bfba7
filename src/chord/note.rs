//! Pitch classes and their spellings.

use std::fmt;

/// One of the 12 pitch classes, indexed from C = 0 to B = 11.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Note {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

/// Canonical order used for indexing and transposition.
pub const NOTE_SEQUENCE: [Note; 12] = [
    Note::C,
    Note::CSharp,
    Note::D,
    Note::DSharp,
    Note::E,
    Note::F,
    Note::FSharp,
    Note::G,
    Note::GSharp,
    Note::A,
    Note::ASharp,
    Note::B,
];

impl Note {
    /// Index of this pitch class in [`NOTE_SEQUENCE`] (C = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Pitch class for an index, wrapping modulo 12.
    pub fn from_index(index: usize) -> Self {
        NOTE_SEQUENCE[index % 12]
    }

    /// Sharp spelling: `C`, `C#`, `D`, ...
    pub fn sharp_name(self) -> &'static str {
        match self {
            Note::C => "C",
            Note::CSharp => "C#",
            Note::D => "D",
            Note::DSharp => "D#",
            Note::E => "E",
            Note::F => "F",
            Note::FSharp => "F#",
            Note::G => "G",
            Note::GSharp => "G#",
            Note::A => "A",
            Note::ASharp => "A#",
            Note::B => "B",
        }
    }

    /// Flat spelling. Only the five black keys change; naturals keep their name.
    pub fn flat_name(self) -> &'static str {
        match self {
            Note::CSharp => "Db",
            Note::DSharp => "Eb",
            Note::FSharp => "Gb",
            Note::GSharp => "Ab",
            Note::ASharp => "Bb",
            natural => natural.sharp_name(),
        }
    }

    pub fn spelled(self, prefers_flat: bool) -> &'static str {
        if prefers_flat {
            self.flat_name()
        } else {
            self.sharp_name()
        }
    }

    /// Move this pitch class by a number of semitones. Any offset is accepted;
    /// the result always lands in 0..12.
    pub fn transpose(self, semitones: i32) -> Self {
        let shifted = (self.index() as i32 + semitones).rem_euclid(12);
        Self::from_index(shifted as usize)
    }

    /// Semitones needed to move upward from `self` to `target` (0..12).
    pub fn distance_to(self, target: Note) -> usize {
        (target.index() + 12 - self.index()) % 12
    }

    /// Parse a note name into its pitch class.
    ///
    /// Accepts the canonical sharp names, unicode `♯`/`♭`, and the flat names
    /// `Db Eb Gb Ab Bb Cb Fb`. Anything else (including `E#`, `B#` and
    /// lowercase names) is rejected.
    ///
    /// ```
    /// use chordsheet::chord::Note;
    ///
    /// assert_eq!(Note::normalize("Bb"), Some(Note::ASharp));
    /// assert_eq!(Note::normalize("E♭"), Some(Note::DSharp));
    /// assert_eq!(Note::normalize("Cb"), Some(Note::B));
    /// assert_eq!(Note::normalize("H"), None);
    /// ```
    pub fn normalize(name: &str) -> Option<Self> {
        let cleaned = name.trim();
        if let Some(note) = Self::from_sharp_name(cleaned) {
            return Some(note);
        }

        let formatted = cleaned.replace('♭', "b").replace('♯', "#");
        if let Some(note) = Self::from_sharp_name(&formatted) {
            return Some(note);
        }

        match formatted.as_str() {
            "Db" => Some(Note::CSharp),
            "Eb" => Some(Note::DSharp),
            "Gb" => Some(Note::FSharp),
            "Ab" => Some(Note::GSharp),
            "Bb" => Some(Note::ASharp),
            "Cb" => Some(Note::B),
            "Fb" => Some(Note::E),
            _ => None,
        }
    }

    fn from_sharp_name(name: &str) -> Option<Self> {
        NOTE_SEQUENCE.iter().copied().find(|note| note.sharp_name() == name)
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sharp_name())
    }
}
