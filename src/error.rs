//! # Error Types
//!
//! Chord parsing, transposition and line parsing never fail: malformed chord text
//! falls back to `None` or passes through untouched. Errors only come from the
//! outer surfaces of the crate: song front matter, chord library files, JSON
//! records and import sources.
//!
//! ## Usage
//! ```rust
//! use chordsheet::{parse_song_document, ChartError};
//!
//! match parse_song_document("---\ncapo: -2\n---\nHello") {
//!     Ok(song) => println!("{}", song.title),
//!     Err(ChartError::MetadataError(message)) => eprintln!("bad front matter: {}", message),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    /// Invalid YAML front matter or an invalid metadata value.
    ///
    /// # Example
    /// ```
    /// # use chordsheet::ChartError;
    /// let err = ChartError::MetadataError("capo must be a positive integer".to_string());
    /// assert_eq!(err.to_string(), "Invalid metadata: capo must be a positive integer");
    /// ```
    #[error("Invalid metadata: {0}")]
    MetadataError(String),

    /// Invalid chord library configuration.
    #[error("Invalid chord library: {0}")]
    LibraryError(String),

    /// A JSON song record that does not match the persisted layout.
    #[error("Invalid song record: {0}")]
    RecordError(String),

    /// An import source or tab record that cannot be turned into a song.
    ///
    /// # Example
    /// ```
    /// # use chordsheet::ChartError;
    /// let err = ChartError::ImportError("Provide a URL or tab id.".to_string());
    /// assert_eq!(err.to_string(), "Import failed: Provide a URL or tab id.");
    /// ```
    #[error("Import failed: {0}")]
    ImportError(String),
}
