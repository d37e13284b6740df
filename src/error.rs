use std::path::PathBuf;

use thiserror::Error;

/// Problems found while turning a character map into a `Level`.
#[derive(Debug, Error, PartialEq)]
pub enum LevelError {
    #[error("level map has no tiles")]
    Empty,

    #[error("unknown glyph {glyph:?} at column {col}, row {row}")]
    UnknownGlyph { glyph: char, col: usize, row: usize },
}

/// Errors raised while loading a level pack from disk.
#[derive(Debug, Error)]
pub enum PackError {
    #[error("failed to read level pack {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("level pack is not valid RON: {0}")]
    Syntax(#[from] ron::error::SpannedError),

    #[error("level {index} ({name}) is invalid: {source}")]
    Level {
        index: usize,
        name: String,
        #[source]
        source: LevelError,
    },

    #[error("level pack contains no levels")]
    NoLevels,
}
