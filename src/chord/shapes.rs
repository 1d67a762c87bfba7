//! # Guitar Chord Shapes
//!
//! Fretboard shapes for standard-tuned six-string guitar.
//!
//! ## Lookup Order
//! 1. **Open shapes** - hand-voiced open-position shapes keyed by root and quality
//!    (`C`, `Am`, `G7`, `Dsus2`, ...).
//! 2. **Barre templates** - a movable shape per quality anchored at a base root
//!    (F for E-shape barres, B for A-shape barres and the diminished family).
//!    The template is slid up the neck by the distance from its base root to
//!    the target root.
//!
//! A quality with neither (`unknown`, or `sus2` away from its open roots) has
//! no shape; callers show "no diagram available".
//!
//! ## String Order
//! Index 0 is the low E string, index 5 the high E string.

use super::note::Note;
use super::parse::{ChordQuality, ParsedChord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Number of strings on the modelled instrument.
pub const STRING_COUNT: usize = 6;

/// State of one string: muted, or pressed at a fret (0 = open string).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFret", into = "RawFret")]
pub enum Fret {
    Muted,
    At(u8),
}

impl Fret {
    pub fn fret(self) -> Option<u8> {
        match self {
            Fret::Muted => None,
            Fret::At(fret) => Some(fret),
        }
    }

    fn shifted(self, distance: u8) -> Self {
        match self {
            Fret::Muted => Fret::Muted,
            Fret::At(fret) => Fret::At(fret + distance),
        }
    }
}

impl fmt::Display for Fret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fret::Muted => f.write_str("x"),
            Fret::At(fret) => write!(f, "{}", fret),
        }
    }
}

/// Persisted form of a fret: a number, or `"x"` for a muted string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawFret {
    Number(u8),
    Text(String),
}

impl TryFrom<RawFret> for Fret {
    type Error = String;

    fn try_from(raw: RawFret) -> Result<Self, Self::Error> {
        match raw {
            RawFret::Number(fret) => Ok(Fret::At(fret)),
            RawFret::Text(text) if text.eq_ignore_ascii_case("x") => Ok(Fret::Muted),
            RawFret::Text(text) => Err(format!("invalid fret value: {:?}", text)),
        }
    }
}

impl From<Fret> for RawFret {
    fn from(fret: Fret) -> Self {
        match fret {
            Fret::Muted => RawFret::Text("x".to_string()),
            Fret::At(fret) => RawFret::Number(fret),
        }
    }
}

/// One finger held across several strings at the same fret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Barre {
    pub fret: u8,
    #[serde(rename = "fromString")]
    pub first_string: u8,
    #[serde(rename = "toString")]
    pub last_string: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finger: Option<u8>,
}

/// A fingering for one chord.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChordShape {
    pub frets: [Fret; STRING_COUNT],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingers: Option<[Option<u8>; STRING_COUNT]>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub barres: Vec<Barre>,
    #[serde(default)]
    pub is_open: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ChordShape {
    /// Lowest fretted position, ignoring open and muted strings.
    pub fn base_fret(&self) -> Option<u8> {
        self.frets
            .iter()
            .filter_map(|fret| fret.fret())
            .filter(|&fret| fret > 0)
            .min()
    }

    /// Compact `x32010` style notation (frets above 9 are dot-separated).
    pub fn fret_string(&self) -> String {
        if self.frets.iter().any(|fret| matches!(fret, Fret::At(f) if *f > 9)) {
            self.frets.iter().map(|f| f.to_string()).collect::<Vec<_>>().join(".")
        } else {
            self.frets.iter().map(|f| f.to_string()).collect()
        }
    }
}

// Raw table encoding: -1 is a muted string, finger 0 is "no finger".
const X: i8 = -1;

struct RawBarre {
    fret: u8,
    first_string: u8,
    last_string: u8,
    finger: u8,
}

const FULL_BARRE: RawBarre = RawBarre { fret: 1, first_string: 0, last_string: 5, finger: 1 };
const A_SHAPE_BARRE: RawBarre = RawBarre { fret: 2, first_string: 1, last_string: 5, finger: 1 };

struct OpenShape {
    root: Note,
    quality: ChordQuality,
    frets: [i8; STRING_COUNT],
    fingers: [u8; STRING_COUNT],
    barres: &'static [RawBarre],
}

/// Movable shape anchored at `base_root`.
struct ShapeTemplate {
    base_root: Note,
    frets: [i8; STRING_COUNT],
    fingers: [u8; STRING_COUNT],
    barres: &'static [RawBarre],
}

macro_rules! open {
    ($root:ident, $quality:ident, $frets:expr, $fingers:expr) => {
        open!($root, $quality, $frets, $fingers, &[])
    };
    ($root:ident, $quality:ident, $frets:expr, $fingers:expr, $barres:expr) => {
        OpenShape {
            root: Note::$root,
            quality: ChordQuality::$quality,
            frets: $frets,
            fingers: $fingers,
            barres: $barres,
        }
    };
}

const OPEN_SHAPES: &[OpenShape] = &[
    open!(C, Major, [X, 3, 2, 0, 1, 0], [0, 3, 2, 0, 1, 0]),
    open!(A, Major, [X, 0, 2, 2, 2, 0], [0, 0, 1, 2, 3, 0]),
    open!(G, Major, [3, 2, 0, 0, 0, 3], [2, 1, 0, 0, 0, 3]),
    open!(G, Major, [3, 2, 0, 0, 3, 3], [2, 1, 0, 0, 3, 4]),
    open!(E, Major, [0, 2, 2, 1, 0, 0], [0, 2, 3, 1, 0, 0]),
    open!(D, Major, [X, X, 0, 2, 3, 2], [0, 0, 0, 1, 3, 2]),
    open!(C, MajorSeventh, [X, 3, 2, 0, 0, 0], [0, 3, 2, 0, 0, 0]),
    open!(G, MajorSeventh, [3, 2, 0, 0, 0, 2], [2, 1, 0, 0, 0, 3]),
    open!(A, MajorSeventh, [X, 0, 2, 1, 2, 0], [0, 0, 2, 1, 3, 0]),
    open!(C, Add9, [X, 3, 2, 0, 3, 0], [0, 3, 2, 0, 4, 0]),
    open!(G, Add9, [3, 0, 0, 2, 0, 2], [2, 0, 0, 1, 0, 3]),
    open!(A, Sus2, [X, 0, 2, 2, 0, 0], [0, 0, 2, 3, 0, 0]),
    open!(D, Sus2, [X, X, 0, 2, 3, 0], [0, 0, 0, 1, 3, 0]),
    open!(A, Sus4, [X, 0, 2, 2, 3, 0], [0, 0, 1, 2, 3, 0]),
    open!(D, Sus4, [X, X, 0, 2, 3, 3], [0, 0, 0, 1, 3, 4]),
    open!(G, Sus4, [3, 3, 0, 0, 1, 3], [2, 3, 0, 0, 1, 4]),
    open!(A, SeventhSus4, [X, 0, 2, 0, 3, 0], [0, 0, 2, 0, 4, 0]),
    open!(E, Sus4, [0, 2, 2, 2, 0, 0], [0, 2, 3, 4, 0, 0]),
    open!(E, Sus2, [0, 2, 4, 4, 0, 0], [0, 1, 3, 4, 0, 0]),
    open!(A, Minor, [X, 0, 2, 2, 1, 0], [0, 0, 2, 3, 1, 0]),
    open!(E, Minor, [0, 2, 2, 0, 0, 0], [0, 2, 3, 0, 0, 0]),
    open!(D, Minor, [X, X, 0, 2, 3, 1], [0, 0, 0, 2, 3, 1]),
    open!(E, MinorSeventh, [0, 2, 0, 0, 0, 0], [0, 2, 0, 0, 0, 0]),
    open!(A, MinorSeventh, [X, 0, 2, 0, 1, 0], [0, 0, 2, 0, 1, 0]),
    open!(
        D,
        MinorSeventh,
        [X, X, 0, 2, 1, 1],
        [0, 0, 0, 2, 1, 1],
        &[RawBarre { fret: 1, first_string: 4, last_string: 5, finger: 1 }]
    ),
    open!(G, Seventh, [3, 2, 0, 0, 0, 1], [2, 1, 0, 0, 0, 3]),
    open!(C, Seventh, [X, 3, 2, 3, 1, 0], [0, 3, 2, 4, 1, 0]),
    open!(A, Seventh, [X, 0, 2, 0, 2, 0], [0, 0, 2, 0, 3, 0]),
    open!(E, Seventh, [0, 2, 0, 1, 0, 0], [0, 2, 0, 1, 0, 0]),
    open!(D, Seventh, [X, X, 0, 2, 1, 2], [0, 0, 0, 2, 1, 3]),
];

const MAJOR_TEMPLATES: &[ShapeTemplate] = &[
    ShapeTemplate {
        base_root: Note::F,
        frets: [1, 3, 3, 2, 1, 1],
        fingers: [0, 3, 4, 2, 0, 0],
        barres: &[FULL_BARRE],
    },
    ShapeTemplate {
        base_root: Note::B,
        frets: [X, 2, 4, 4, 4, 2],
        fingers: [0, 0, 2, 3, 4, 0],
        barres: &[A_SHAPE_BARRE],
    },
];

const MINOR_TEMPLATES: &[ShapeTemplate] = &[
    ShapeTemplate {
        base_root: Note::F,
        frets: [1, 3, 3, 1, 1, 1],
        fingers: [0, 3, 4, 0, 0, 0],
        barres: &[FULL_BARRE],
    },
    ShapeTemplate {
        base_root: Note::B,
        frets: [X, 2, 4, 4, 3, 2],
        fingers: [0, 0, 3, 4, 2, 0],
        barres: &[A_SHAPE_BARRE],
    },
];

const SEVENTH_TEMPLATES: &[ShapeTemplate] = &[
    ShapeTemplate {
        base_root: Note::F,
        frets: [1, 3, 1, 2, 1, 1],
        fingers: [0, 3, 0, 2, 0, 0],
        barres: &[FULL_BARRE],
    },
    ShapeTemplate {
        base_root: Note::B,
        frets: [X, 2, 4, 2, 4, 2],
        fingers: [0, 0, 3, 0, 4, 0],
        barres: &[A_SHAPE_BARRE],
    },
];

const MINOR_SEVENTH_TEMPLATES: &[ShapeTemplate] = &[
    ShapeTemplate {
        base_root: Note::F,
        frets: [1, 3, 1, 1, 1, 1],
        fingers: [0, 3, 0, 0, 0, 0],
        barres: &[FULL_BARRE],
    },
    ShapeTemplate {
        base_root: Note::B,
        frets: [X, 2, 4, 2, 3, 2],
        fingers: [0, 0, 3, 0, 2, 0],
        barres: &[A_SHAPE_BARRE],
    },
];

const MAJOR_SEVENTH_TEMPLATES: &[ShapeTemplate] = &[ShapeTemplate {
    base_root: Note::F,
    frets: [1, 3, 2, 2, 1, 1],
    fingers: [0, 3, 2, 4, 0, 0],
    barres: &[FULL_BARRE],
}];

const SUS4_TEMPLATES: &[ShapeTemplate] = &[ShapeTemplate {
    base_root: Note::F,
    frets: [1, 3, 3, 3, 1, 1],
    fingers: [0, 3, 4, 2, 0, 0],
    barres: &[FULL_BARRE],
}];

const SEVENTH_SUS4_TEMPLATES: &[ShapeTemplate] = &[ShapeTemplate {
    base_root: Note::F,
    frets: [1, 3, 1, 3, 1, 1],
    fingers: [0, 3, 0, 4, 0, 0],
    barres: &[FULL_BARRE],
}];

const ADD9_TEMPLATES: &[ShapeTemplate] = &[ShapeTemplate {
    base_root: Note::F,
    frets: [1, 3, 3, 1, 1, 3],
    fingers: [0, 3, 4, 0, 0, 4],
    barres: &[FULL_BARRE],
}];

const DIMINISHED_TEMPLATES: &[ShapeTemplate] = &[ShapeTemplate {
    base_root: Note::B,
    frets: [X, 2, 3, 4, 3, X],
    fingers: [0, 1, 2, 4, 3, 0],
    barres: &[],
}];

const DIMINISHED_SEVENTH_TEMPLATES: &[ShapeTemplate] = &[ShapeTemplate {
    base_root: Note::B,
    frets: [X, 2, 3, 1, 3, 1],
    fingers: [0, 2, 3, 1, 4, 1],
    barres: &[RawBarre { fret: 1, first_string: 3, last_string: 5, finger: 1 }],
}];

const HALF_DIMINISHED_TEMPLATES: &[ShapeTemplate] = &[ShapeTemplate {
    base_root: Note::B,
    frets: [X, 2, 3, 2, 3, X],
    fingers: [0, 1, 3, 2, 4, 0],
    barres: &[],
}];

const AUGMENTED_TEMPLATES: &[ShapeTemplate] = &[ShapeTemplate {
    base_root: Note::F,
    frets: [1, 4, 3, 2, 2, 1],
    fingers: [1, 4, 3, 2, 2, 1],
    barres: &[FULL_BARRE],
}];

/// Movable templates for a quality.
fn barre_templates(quality: ChordQuality) -> &'static [ShapeTemplate] {
    match quality {
        ChordQuality::Major => MAJOR_TEMPLATES,
        ChordQuality::Minor => MINOR_TEMPLATES,
        ChordQuality::Seventh => SEVENTH_TEMPLATES,
        ChordQuality::MinorSeventh => MINOR_SEVENTH_TEMPLATES,
        ChordQuality::MajorSeventh => MAJOR_SEVENTH_TEMPLATES,
        ChordQuality::Sus4 => SUS4_TEMPLATES,
        ChordQuality::SeventhSus4 => SEVENTH_SUS4_TEMPLATES,
        ChordQuality::Add9 => ADD9_TEMPLATES,
        ChordQuality::Diminished => DIMINISHED_TEMPLATES,
        ChordQuality::DiminishedSeventh => DIMINISHED_SEVENTH_TEMPLATES,
        ChordQuality::HalfDiminished => HALF_DIMINISHED_TEMPLATES,
        ChordQuality::Augmented => AUGMENTED_TEMPLATES,
        ChordQuality::Sus2 | ChordQuality::Unknown => &[],
    }
}

/// Every quality that can carry a shape, in table order.
const SHAPED_QUALITIES: [ChordQuality; 13] = [
    ChordQuality::Major,
    ChordQuality::Minor,
    ChordQuality::Seventh,
    ChordQuality::MinorSeventh,
    ChordQuality::MajorSeventh,
    ChordQuality::Sus4,
    ChordQuality::Sus2,
    ChordQuality::SeventhSus4,
    ChordQuality::Add9,
    ChordQuality::Diminished,
    ChordQuality::DiminishedSeventh,
    ChordQuality::HalfDiminished,
    ChordQuality::Augmented,
];

fn fret_from_raw(raw: i8) -> Fret {
    if raw < 0 {
        Fret::Muted
    } else {
        Fret::At(raw as u8)
    }
}

fn fingers_from_raw(raw: [u8; STRING_COUNT]) -> [Option<u8>; STRING_COUNT] {
    raw.map(|finger| if finger == 0 { None } else { Some(finger) })
}

fn barres_from_raw(raw: &[RawBarre], distance: u8) -> Vec<Barre> {
    raw.iter()
        .map(|barre| Barre {
            fret: barre.fret + distance,
            first_string: barre.first_string,
            last_string: barre.last_string,
            finger: Some(barre.finger),
        })
        .filter(|barre| barre.fret > 0)
        .collect()
}

impl OpenShape {
    fn to_shape(&self) -> ChordShape {
        ChordShape {
            frets: self.frets.map(fret_from_raw),
            fingers: Some(fingers_from_raw(self.fingers)),
            barres: barres_from_raw(self.barres, 0),
            is_open: true,
            label: None,
        }
    }
}

impl ShapeTemplate {
    /// Slide the template up the neck until its root lands on `target`.
    fn build(&self, target: Note) -> ChordShape {
        let distance = self.base_root.distance_to(target) as u8;
        ChordShape {
            frets: self.frets.map(|raw| fret_from_raw(raw).shifted(distance)),
            fingers: Some(fingers_from_raw(self.fingers)),
            barres: barres_from_raw(self.barres, distance),
            is_open: false,
            label: None,
        }
    }
}

/// All built-in shapes for a parsed chord: open shapes first, then every
/// barre template moved to the chord's root. Empty for unknown qualities.
pub fn shapes_for_parsed(chord: &ParsedChord) -> Vec<ChordShape> {
    if !chord.is_known() {
        return Vec::new();
    }

    OPEN_SHAPES
        .iter()
        .filter(|open| open.root == chord.root && open.quality == chord.quality)
        .map(OpenShape::to_shape)
        .chain(barre_templates(chord.quality).iter().map(|t| t.build(chord.root)))
        .collect()
}

/// All built-in shapes for a chord symbol, best first.
///
/// ```
/// use chordsheet::chord::chord_shapes;
///
/// let shapes = chord_shapes("C");
/// assert!(shapes[0].is_open);
/// assert_eq!(shapes[0].fret_string(), "x32010");
///
/// assert!(chord_shapes("Cxyz").is_empty());
/// assert!(chord_shapes("not a chord").is_empty());
/// ```
pub fn chord_shapes(symbol: &str) -> Vec<ChordShape> {
    ParsedChord::parse(symbol)
        .map(|chord| shapes_for_parsed(&chord))
        .unwrap_or_default()
}

/// The single best built-in shape for a chord symbol.
pub fn get_chord_shape(symbol: &str) -> Option<ChordShape> {
    chord_shapes(symbol).into_iter().next()
}

/// The full built-in table keyed by chord symbol: every open shape under its
/// own symbol, plus each barre template at its base root (`F`, `Bm7`, `Bdim`, ...).
pub fn list_built_in_chord_shapes() -> BTreeMap<String, Vec<ChordShape>> {
    let mut shapes: BTreeMap<String, Vec<ChordShape>> = BTreeMap::new();

    for open in OPEN_SHAPES {
        let symbol = format!("{}{}", open.root.sharp_name(), open.quality.symbol_suffix());
        shapes.entry(symbol).or_default().push(open.to_shape());
    }

    for quality in SHAPED_QUALITIES {
        for template in barre_templates(quality) {
            let symbol = format!("{}{}", template.base_root.sharp_name(), quality.symbol_suffix());
            shapes.entry(symbol).or_default().push(template.build(template.base_root));
        }
    }

    shapes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_shape_preferred() {
        let shape = get_chord_shape("Am").unwrap();
        assert!(shape.is_open);
        assert_eq!(shape.fret_string(), "x02210");
        assert_eq!(shape.fingers.unwrap()[4], Some(1));
    }

    #[test]
    fn test_barre_shape_from_f_template() {
        // G minor: F-shape template moved up two frets.
        let shape = get_chord_shape("Gm").unwrap();
        assert!(!shape.is_open);
        assert_eq!(shape.frets, [Fret::At(3), Fret::At(5), Fret::At(5), Fret::At(3), Fret::At(3), Fret::At(3)]);
        assert_eq!(shape.barres.len(), 1);
        assert_eq!(shape.barres[0].fret, 3);
        assert_eq!(shape.base_fret(), Some(3));
    }

    #[test]
    fn test_barre_shape_from_b_template() {
        // C diminished: B-anchored template moved up one fret, muted strings stay muted.
        let shape = get_chord_shape("Cdim").unwrap();
        assert_eq!(shape.frets, [Fret::Muted, Fret::At(3), Fret::At(4), Fret::At(5), Fret::At(4), Fret::Muted]);
        assert!(shape.barres.is_empty());
    }

    #[test]
    fn test_flat_root_uses_same_shape_as_sharp() {
        assert_eq!(get_chord_shape("Bb"), get_chord_shape("A#"));
        let shape = get_chord_shape("Bb").unwrap();
        assert_eq!(shape.frets[0], Fret::At(6));
    }

    #[test]
    fn test_all_shapes_for_chord() {
        let shapes = chord_shapes("G");
        // Two open voicings, then the E-shape and A-shape barres.
        assert_eq!(shapes.len(), 4);
        assert!(shapes[0].is_open && shapes[1].is_open);
        assert_eq!(shapes[2].frets[0], Fret::At(3));
        assert_eq!(shapes[3].frets[1], Fret::At(10));
    }

    #[test]
    fn test_no_shape_for_unknown_or_untemplated() {
        assert!(get_chord_shape("C6").is_none());
        assert!(get_chord_shape("Xm").is_none());
        assert!(get_chord_shape("Csus2").is_none());
        assert!(get_chord_shape("Dsus2").is_some());
    }

    #[test]
    fn test_built_in_table() {
        let table = list_built_in_chord_shapes();
        assert_eq!(table["C"].len(), 1);
        assert_eq!(table["G"].len(), 2);
        assert_eq!(table["F"].len(), 1);
        assert!(!table["F"][0].is_open);
        assert_eq!(table["B"].len(), 1);
        assert_eq!(table["Bdim"].len(), 1);
        assert_eq!(table["Dm7"][0].barres.len(), 1);
        assert!(table.values().all(|shapes| !shapes.is_empty()));
        assert!(!table.contains_key("Fsus2"));
    }

    #[test]
    fn test_fret_serialization() {
        let shape = get_chord_shape("D").unwrap();
        let json = serde_json::to_value(&shape).unwrap();
        assert_eq!(json["frets"], serde_json::json!(["x", "x", 0, 2, 3, 2]));
        assert_eq!(json["isOpen"], serde_json::json!(true));

        let parsed: ChordShape = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, shape);
    }

    #[test]
    fn test_invalid_fret_rejected() {
        let result: Result<ChordShape, _> =
            serde_json::from_str(r#"{"frets": ["x", 3, 2, "o", 1, 0]}"#);
        assert!(result.is_err());
        let result: Result<ChordShape, _> = serde_json::from_str(r#"{"frets": [3, 2, 0]}"#);
        assert!(result.is_err());
    }
}
