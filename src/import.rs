//! # Ultimate Guitar Import
//!
//! Turns an already-fetched Ultimate Guitar tab record into a [`Song`].
//! Fetching is left to the caller; this module only cleans the tab markup and
//! maps the record fields.
//!
//! ```
//! use chordsheet::import::normalize_ultimate_guitar_content;
//!
//! let raw = "[tab][ch]G[/ch]   [ch]D[/ch]\r\nTake me home[/tab]\r\n\r\n\r\n\r\n";
//! assert_eq!(normalize_ultimate_guitar_content(raw), "[G]   [D]\nTake me home");
//! ```

use crate::content::parse_content;
use crate::error::ChartError;
use crate::song::{build_song_id, Song, DEFAULT_KEY};
use serde::Deserialize;

const MIN_TAB_ID_DIGITS: usize = 5;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TabRecording {
    #[serde(default)]
    pub tonality_name: Option<String>,
}

/// The tab fields an import needs, as the Ultimate Guitar API names them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TabRecord {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub song_name: String,
    #[serde(default)]
    pub artist_name: String,
    #[serde(default)]
    pub tonality_name: Option<String>,
    #[serde(default)]
    pub capo: Option<i64>,
    #[serde(default)]
    pub recording: Option<TabRecording>,
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "type")]
    pub tab_type: Option<String>,
    #[serde(default, rename = "urlWeb")]
    pub url_web: Option<String>,
}

impl TabRecord {
    pub fn from_json(json: &str) -> Result<Self, ChartError> {
        serde_json::from_str(json).map_err(|e| ChartError::ImportError(e.to_string()))
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&text[prefix.len()..])
    } else {
        None
    }
}

/// Rewrite every `[...]` tag the handler recognises; other brackets are copied.
fn rewrite_tags<F>(text: &str, handler: F) -> String
where
    F: Fn(&str, &mut String) -> Option<usize>,
{
    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('[') {
        output.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match handler(tail, &mut output) {
            Some(consumed) => rest = &tail[consumed..],
            None => {
                output.push('[');
                rest = &tail[1..];
            }
        }
    }
    output.push_str(rest);
    output
}

fn drop_tab_tag(tail: &str, _: &mut String) -> Option<usize> {
    ["[tab]", "[/tab]"]
        .iter()
        .find_map(|tag| strip_prefix_ignore_case(tail, tag))
        .map(|after| tail.len() - after.len())
}

/// `[ch]X[/ch]` becomes `[X]` when X is non-empty and holds no `[`.
fn unwrap_chord_tag(tail: &str, output: &mut String) -> Option<usize> {
    let body = strip_prefix_ignore_case(tail, "[ch]")?;
    let end = body.find('[').filter(|&end| end > 0)?;
    let after = strip_prefix_ignore_case(&body[end..], "[/ch]")?;
    output.push('[');
    output.push_str(&body[..end]);
    output.push(']');
    Some(tail.len() - after.len())
}

fn collapse_blank_runs(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut newlines = 0;
    for c in text.chars() {
        if c == '\n' {
            newlines += 1;
            if newlines > 2 {
                continue;
            }
        } else {
            newlines = 0;
        }
        output.push(c);
    }
    output
}

/// Clean Ultimate Guitar tab markup into plain song text.
pub fn normalize_ultimate_guitar_content(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    let text = rewrite_tags(&text, drop_tab_tag);
    let text = rewrite_tags(&text, unwrap_chord_tag);
    collapse_blank_runs(&text).trim_end().to_string()
}

/// First run of at least five ASCII digits.
fn find_digit_run(text: &str) -> Option<&str> {
    text.split(|c: char| !c.is_ascii_digit())
        .find(|run| run.len() >= MIN_TAB_ID_DIGITS)
}

/// Path part of an absolute URL, without query or fragment.
fn url_path(text: &str) -> Option<&str> {
    let (_, after_scheme) = text.split_once("://")?;
    let path_start = after_scheme.find('/')?;
    let path = &after_scheme[path_start..];
    let path_end = path.find(['?', '#']).unwrap_or(path.len());
    Some(&path[..path_end])
}

fn parse_tab_id(digits: &str) -> Result<u64, ChartError> {
    digits
        .parse()
        .map_err(|_| ChartError::ImportError(format!("Tab id out of range: {}", digits)))
}

/// Tab id from a bare id or a tab URL.
///
/// ```
/// use chordsheet::import::extract_tab_id;
///
/// assert_eq!(extract_tab_id("1234").unwrap(), 1234);
/// assert_eq!(extract_tab_id("https://tabs.ultimate-guitar.com/tab/u2/one-chords-12345").unwrap(), 12345);
/// assert!(extract_tab_id("no digits here").is_err());
/// ```
pub fn extract_tab_id(source: &str) -> Result<u64, ChartError> {
    let trimmed = source.trim();
    if trimmed.is_empty() {
        return Err(ChartError::ImportError("Provide a URL or tab id.".to_string()));
    }
    if trimmed.chars().all(|c| c.is_ascii_digit()) {
        return parse_tab_id(trimmed);
    }

    url_path(trimmed)
        .and_then(find_digit_run)
        .or_else(|| find_digit_run(trimmed))
        .ok_or_else(|| ChartError::ImportError("Unable to find a tab id in the provided value.".to_string()))
        .and_then(parse_tab_id)
}

/// The first non-blank key candidate, else `C`.
pub fn resolve_default_key<'a, I>(candidates: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|key| !key.is_empty())
        .unwrap_or(DEFAULT_KEY)
        .to_string()
}

/// Build a song from a fetched tab record.
pub fn song_from_tab(tab: &TabRecord) -> Result<Song, ChartError> {
    if tab.song_name.trim().is_empty() || tab.artist_name.trim().is_empty() || tab.content.trim().is_empty() {
        return Err(ChartError::ImportError(
            "Received an incomplete response from Ultimate Guitar.".to_string(),
        ));
    }

    let lines = parse_content(&normalize_ultimate_guitar_content(&tab.content));
    let default_key = resolve_default_key([
        tab.tonality_name.as_deref(),
        tab.recording.as_ref().and_then(|recording| recording.tonality_name.as_deref()),
    ]);
    let capo = tab
        .capo
        .filter(|&fret| fret > 0)
        .and_then(|fret| u32::try_from(fret).ok());

    log::debug!("imported tab {}: {} lines, key {}", tab.id, lines.len(), default_key);

    Ok(Song {
        id: build_song_id(&tab.song_name, &tab.artist_name),
        title: tab.song_name.clone(),
        artist: tab.artist_name.clone(),
        default_key,
        capo,
        source_url: tab.url_web.clone(),
        song_type: tab.tab_type.clone(),
        tags: Vec::new(),
        lines,
    })
}
