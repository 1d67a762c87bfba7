//! # Chord Library
//!
//! User additions on top of the built-in shape table.
//!
//! ## Custom Shapes
//! A [`CustomChordShape`] is a shape with a stable id. Two kinds exist:
//! - **Added shapes** with any id: appended after the built-in shapes.
//! - **Default overrides** with an id of the form
//!   `default-override:<url-encoded chord>:<index>`: an edited copy of the
//!   built-in shape at `index`, shown in its place.
//!
//! ## Preferred Shapes
//! A [`PreferredShapeSelection`] per chord symbol moves one shape to the front
//! of the merged list. The other shapes keep their relative order.
//!
//! ## Configuration File
//! ```yaml
//! custom:
//!   C:
//!     - id: my-c
//!       frets: [x, 3, 5, 5, 5, 3]
//!       label: Barre
//! preferred:
//!   C:
//!     type: custom
//!     id: my-c
//! ```

use super::shapes::{list_built_in_chord_shapes, ChordShape};
use crate::error::ChartError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_OVERRIDE_PREFIX: &str = "default-override:";

/// Shape tables keyed by chord symbol.
pub type ShapeTable = BTreeMap<String, Vec<ChordShape>>;

/// A user-supplied shape with a stable identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomChordShape {
    pub id: String,
    #[serde(flatten)]
    pub shape: ChordShape,
}

/// Which shape a chord should show first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PreferredShapeSelection {
    BuiltIn { index: usize },
    Custom { id: String },
}

/// Id for an edited copy of built-in shape `index` of `chord`.
///
/// ```
/// use chordsheet::chord::build_default_override_id;
///
/// assert_eq!(build_default_override_id("C#m7/G#", 1), "default-override:C%23m7%2FG%23:1");
/// ```
pub fn build_default_override_id(chord: &str, index: usize) -> String {
    format!("{}{}:{}", DEFAULT_OVERRIDE_PREFIX, encode_uri_component(chord), index)
}

/// Inverse of [`build_default_override_id`]. `None` when the id is not a
/// default override or its payload is malformed.
pub fn parse_default_override_id(id: &str) -> Option<(String, usize)> {
    let payload = id.strip_prefix(DEFAULT_OVERRIDE_PREFIX)?;
    let mut parts = payload.split(':');
    let chord = decode_uri_component(parts.next().unwrap_or_default())?;
    let index = parts.next()?.trim().parse::<usize>().ok()?;
    Some((chord, index))
}

fn is_unreserved(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || b"-_.!~*'()".contains(&byte)
}

/// Percent-encode everything but the URI-component unreserved set.
fn encode_uri_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        if is_unreserved(byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}

fn decode_uri_component(value: &str) -> Option<String> {
    let bytes = value.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = value.get(i + 1..i + 3)?;
            decoded.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(decoded).ok()
}

struct ShapeEntry {
    shape: ChordShape,
    built_in_index: Option<usize>,
    custom_id: Option<String>,
}

impl ShapeEntry {
    fn matches(&self, selection: &PreferredShapeSelection) -> bool {
        match selection {
            PreferredShapeSelection::BuiltIn { index } => self.built_in_index == Some(*index),
            PreferredShapeSelection::Custom { id } => self.custom_id.as_deref() == Some(id.as_str()),
        }
    }
}

fn labelled(shape: &ChordShape, fallback: &str) -> ChordShape {
    let mut shape = shape.clone();
    if shape.label.is_none() {
        shape.label = Some(fallback.to_string());
    }
    shape
}

/// Merge built-in shapes with custom shapes and apply preferred selections.
///
/// For each symbol in either table:
/// 1. Built-in shapes in table order (labelled `Default` when unlabelled).
/// 2. Default overrides replace the built-in shape at their index. Other
///    custom shapes, including overrides whose index is past the built-in
///    shapes, are appended (labelled `Custom` when unlabelled).
/// 3. A preferred selection that resolves to a shape after the first is moved
///    to the front.
pub fn merge_chord_shapes(
    built_in: &ShapeTable,
    custom: &BTreeMap<String, Vec<CustomChordShape>>,
    preferred: &BTreeMap<String, PreferredShapeSelection>,
) -> ShapeTable {
    let symbols: BTreeSet<&String> = built_in.keys().chain(custom.keys()).collect();

    symbols
        .into_iter()
        .map(|symbol| {
            let shapes = merge_symbol(
                symbol,
                built_in.get(symbol).map(Vec::as_slice).unwrap_or_default(),
                custom.get(symbol).map(Vec::as_slice).unwrap_or_default(),
                preferred.get(symbol),
            );
            (symbol.clone(), shapes)
        })
        .collect()
}

fn merge_symbol(
    symbol: &str,
    built_in: &[ChordShape],
    custom: &[CustomChordShape],
    preferred: Option<&PreferredShapeSelection>,
) -> Vec<ChordShape> {
    let mut entries: Vec<ShapeEntry> = built_in
        .iter()
        .enumerate()
        .map(|(index, shape)| ShapeEntry {
            shape: labelled(shape, "Default"),
            built_in_index: Some(index),
            custom_id: None,
        })
        .collect();

    for custom_shape in custom {
        match parse_default_override_id(&custom_shape.id) {
            Some((chord, index)) if chord == symbol && index < built_in.len() => {
                entries[index] = ShapeEntry {
                    shape: labelled(&custom_shape.shape, "Default"),
                    built_in_index: Some(index),
                    custom_id: Some(custom_shape.id.clone()),
                };
            }
            _ => {
                if custom_shape.id.starts_with(DEFAULT_OVERRIDE_PREFIX) {
                    log::warn!(
                        "custom shape {:?} for {} does not override a built-in shape; appending it",
                        custom_shape.id,
                        symbol
                    );
                }
                entries.push(ShapeEntry {
                    shape: labelled(&custom_shape.shape, "Custom"),
                    built_in_index: None,
                    custom_id: Some(custom_shape.id.clone()),
                });
            }
        }
    }

    if let Some(selection) = preferred {
        if let Some(position) = entries.iter().position(|entry| entry.matches(selection)) {
            if position > 0 {
                let chosen = entries.remove(position);
                entries.insert(0, chosen);
            }
        }
    }

    entries.into_iter().map(|entry| entry.shape).collect()
}

/// Custom shapes and preferred selections, as stored in a chord library file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChordLibrary {
    pub custom: BTreeMap<String, Vec<CustomChordShape>>,
    pub preferred: BTreeMap<String, PreferredShapeSelection>,
}

impl ChordLibrary {
    pub fn from_yaml(source: &str) -> Result<Self, ChartError> {
        let library: ChordLibrary =
            serde_yaml::from_str(source).map_err(|e| ChartError::LibraryError(e.to_string()))?;
        log::debug!(
            "loaded chord library: {} chords with custom shapes, {} preferred selections",
            library.custom.len(),
            library.preferred.len()
        );
        Ok(library)
    }

    pub fn to_yaml(&self) -> Result<String, ChartError> {
        serde_yaml::to_string(self).map_err(|e| ChartError::LibraryError(e.to_string()))
    }

    /// Built-in table merged with this library.
    pub fn merged(&self) -> ShapeTable {
        merge_chord_shapes(&list_built_in_chord_shapes(), &self.custom, &self.preferred)
    }

    /// Add an independent shape for `symbol`; returns its new id.
    pub fn add_custom(&mut self, symbol: &str, shape: ChordShape) -> String {
        let shapes = self.custom.entry(symbol.to_string()).or_default();
        let mut n = shapes.len() + 1;
        let id = loop {
            let candidate = format!("custom:{}:{}", encode_uri_component(symbol), n);
            if shapes.iter().all(|existing| existing.id != candidate) {
                break candidate;
            }
            n += 1;
        };
        shapes.push(CustomChordShape { id: id.clone(), shape });
        id
    }

    /// Store an edited copy of built-in shape `index`, replacing an earlier edit.
    pub fn add_override(&mut self, symbol: &str, index: usize, shape: ChordShape) -> String {
        let id = build_default_override_id(symbol, index);
        let shapes = self.custom.entry(symbol.to_string()).or_default();
        let entry = CustomChordShape { id: id.clone(), shape };
        match shapes.iter_mut().find(|existing| existing.id == id) {
            Some(existing) => *existing = entry,
            None => shapes.push(entry),
        }
        id
    }

    /// Delete a custom shape or override. A preferred selection pointing at
    /// it is cleared. Returns whether anything was removed.
    pub fn remove_custom(&mut self, symbol: &str, id: &str) -> bool {
        let Some(shapes) = self.custom.get_mut(symbol) else {
            return false;
        };
        let before = shapes.len();
        shapes.retain(|shape| shape.id != id);
        let removed = shapes.len() != before;
        if shapes.is_empty() {
            self.custom.remove(symbol);
        }

        let points_at_removed = matches!(
            self.preferred.get(symbol),
            Some(PreferredShapeSelection::Custom { id: preferred }) if preferred == id
        );
        if removed && points_at_removed {
            self.preferred.remove(symbol);
        }
        removed
    }

    pub fn set_preferred(&mut self, symbol: &str, selection: Option<PreferredShapeSelection>) {
        match selection {
            Some(selection) => {
                self.preferred.insert(symbol.to_string(), selection);
            }
            None => {
                self.preferred.remove(symbol);
            }
        }
    }
}
