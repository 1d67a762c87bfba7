//! # Song Records
//!
//! The persisted song record and the plain-text song document format.
//!
//! ## Document Format
//! A song document is song text with an optional YAML block between `---`
//! lines, at the top or the bottom of the file:
//!
//! ```text
//! ---
//! title: Wagon Wheel
//! artist: Old Crow Medicine Show
//! key: G
//! capo: 2
//! source-url: https://example.com/tab/123456
//! tags: [folk, campfire]
//! ---
//! [Verse]
//! G             D
//! Headed down south to the land of the pines
//! ```
//!
//! Keys are kebab-case. Everything outside the block is parsed with
//! [`parse_content`].

use crate::chord::parse_chord;
use crate::content::{parse_content, stringify_lines, SongLine};
use crate::error::ChartError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_KEY: &str = "C";
const UNTITLED: &str = "Untitled";
const SLUG_MAX_LEN: usize = 60;

/// A stored song, as kept by the song library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub default_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capo: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub song_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub lines: Vec<SongLine>,
}

/// Songs keyed by id.
pub type SongMap = BTreeMap<String, Song>;

impl Song {
    /// A song in the default key with an id derived from title and artist.
    pub fn new(title: &str, artist: &str, lines: Vec<SongLine>) -> Self {
        Song {
            id: build_song_id(title, artist),
            title: title.to_string(),
            artist: artist.to_string(),
            default_key: DEFAULT_KEY.to_string(),
            capo: None,
            source_url: None,
            song_type: None,
            tags: Vec::new(),
            lines,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ChartError> {
        serde_json::from_str(json).map_err(|e| ChartError::RecordError(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, ChartError> {
        serde_json::to_string_pretty(self).map_err(|e| ChartError::RecordError(e.to_string()))
    }
}

/// Parse a JSON object of songs keyed by id.
pub fn parse_song_map(json: &str) -> Result<SongMap, ChartError> {
    serde_json::from_str(json).map_err(|e| ChartError::RecordError(e.to_string()))
}

fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut in_gap = false;
    for c in value.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
            in_gap = false;
        } else if !in_gap {
            slug.push('-');
            in_gap = true;
        }
    }
    // Slug characters are all ASCII, so byte truncation is safe.
    let mut slug = slug.trim_matches('-').to_string();
    slug.truncate(SLUG_MAX_LEN);
    slug
}

/// Stable id for a song: `artist-title` slug, else the title slug, else `song`.
///
/// ```
/// use chordsheet::build_song_id;
///
/// assert_eq!(build_song_id("Wagon Wheel", "Old Crow Medicine Show"), "old-crow-medicine-show-wagon-wheel");
/// assert_eq!(build_song_id("Hallelujah", ""), "hallelujah");
/// assert_eq!(build_song_id("???", "!!!"), "song");
/// ```
pub fn build_song_id(title: &str, artist: &str) -> String {
    let base = format!("{}-{}", slugify(artist), slugify(title));
    let base = base.trim_matches('-');
    if !base.is_empty() {
        return base.to_string();
    }
    let fallback = slugify(title);
    if fallback.is_empty() {
        "song".to_string()
    } else {
        fallback
    }
}

/// `candidate`, or `candidate-2`, `candidate-3`, ... when the id is taken.
pub fn ensure_unique_id(candidate: &str, songs: &SongMap) -> String {
    if !songs.contains_key(candidate) {
        return candidate.to_string();
    }
    (2..)
        .map(|attempt| format!("{}-{}", candidate, attempt))
        .find(|id| !songs.contains_key(id))
        .unwrap_or_else(|| candidate.to_string())
}

/// Front matter as written in a song document.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RawMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capo: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub song_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Split the `---` block from the song text. The block must open the
/// document or close it: the first non-blank line is `---`, or the last
/// non-blank line is. `---` dividers inside the body are left alone.
fn extract_front_matter(source: &str) -> (Option<String>, String) {
    let lines: Vec<&str> = source.lines().collect();
    let is_marker = |line: &&str| line.trim() == "---";
    let is_content = |line: &&str| !line.trim().is_empty();

    let top = lines.iter().position(is_content).filter(|&first| is_marker(&lines[first])).and_then(|start| {
        let end = start + 1 + lines[start + 1..].iter().position(is_marker)?;
        Some((start, end))
    });
    let bottom = || {
        let end = lines.iter().rposition(is_content).filter(|&last| is_marker(&lines[last]))?;
        let start = lines[..end].iter().rposition(is_marker)?;
        Some((start, end))
    };

    match top.or_else(bottom) {
        Some((start, end)) => {
            let metadata = lines[start + 1..end].join("\n");
            let remaining: Vec<&str> = lines[..start].iter().chain(lines[end + 1..].iter()).copied().collect();
            (Some(metadata), remaining.join("\n"))
        }
        None => (None, source.to_string()),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_capo(capo: Option<i64>) -> Result<Option<u32>, ChartError> {
    match capo {
        None | Some(0) => Ok(None),
        Some(fret) => u32::try_from(fret)
            .map(Some)
            .map_err(|_| ChartError::MetadataError(format!("capo must be a positive integer, got {}", fret))),
    }
}

fn parse_default_key(key: Option<String>) -> Result<String, ChartError> {
    match non_blank(key) {
        None => Ok(DEFAULT_KEY.to_string()),
        Some(key) if parse_chord(&key).is_some() => Ok(key),
        Some(key) => Err(ChartError::MetadataError(format!("Invalid key: {}", key))),
    }
}

fn parse_metadata(content: &str) -> Result<RawMetadata, ChartError> {
    if content.trim().is_empty() {
        return Ok(RawMetadata::default());
    }
    serde_yaml::from_str(content).map_err(|e| ChartError::MetadataError(e.to_string()))
}

/// Parse a song document: optional YAML front matter plus song text.
///
/// ```
/// use chordsheet::{parse_song_document, SongLine};
///
/// let song = parse_song_document("---\ntitle: Hey Jude\nartist: The Beatles\nkey: F\n---\nF\nHey Jude").unwrap();
/// assert_eq!(song.id, "the-beatles-hey-jude");
/// assert_eq!(song.default_key, "F");
/// assert_eq!(song.lines, vec![SongLine::line("Hey Jude", Some("F"))]);
/// ```
pub fn parse_song_document(source: &str) -> Result<Song, ChartError> {
    let (metadata, body) = extract_front_matter(source);
    let has_front_matter = metadata.is_some();
    let raw = match metadata {
        Some(content) => parse_metadata(&content)?,
        None => RawMetadata::default(),
    };

    let title = non_blank(raw.title).unwrap_or_else(|| UNTITLED.to_string());
    let artist = non_blank(raw.artist).unwrap_or_default();
    let id = non_blank(raw.id).unwrap_or_else(|| build_song_id(&title, &artist));
    let default_key = parse_default_key(raw.key)?;
    let capo = parse_capo(raw.capo)?;
    let lines = parse_content(&body);

    log::debug!(
        "parsed song document '{}': {} lines, front matter: {}",
        id,
        lines.len(),
        has_front_matter
    );

    Ok(Song {
        id,
        title,
        artist,
        default_key,
        capo,
        source_url: non_blank(raw.source_url),
        song_type: non_blank(raw.song_type),
        tags: raw.tags.unwrap_or_default(),
        lines,
    })
}

/// Write a song back as a document with front matter.
pub fn to_song_document(song: &Song) -> Result<String, ChartError> {
    let raw = RawMetadata {
        title: Some(song.title.clone()),
        artist: Some(song.artist.clone()).filter(|artist| !artist.is_empty()),
        id: Some(song.id.clone()),
        key: Some(song.default_key.clone()),
        capo: song.capo.map(i64::from),
        source_url: song.source_url.clone(),
        song_type: song.song_type.clone(),
        tags: Some(song.tags.clone()).filter(|tags| !tags.is_empty()),
    };
    let yaml = serde_yaml::to_string(&raw).map_err(|e| ChartError::MetadataError(e.to_string()))?;
    Ok(format!("---\n{}---\n{}", yaml, stringify_lines(&song.lines)))
}
