//! Subsieve - subtitle release matching
//!
//! Core of a subtitle aggregator: parses release names, scores them against
//! the video being subtitled, normalises provider languages (including
//! regional variants), finds sidecar subtitles on disk and picks the right
//! file out of subtitle archives.
//!
//! # Architecture
//!
//! A provider returns raw candidates. Each one goes through:
//! 1. [`release::extract`] to structure the release name
//! 2. [`score::Scorer`] to rank it against the [`video::VideoMetadata`]
//! 3. [`language::Resolver`] to normalise its language
//! 4. [`archive::select`] when the download is an archive
//!
//! # Example
//!
//! ```
//! use subsieve::release::{extract, MediaHint};
//! use subsieve::score::{score, MatchLabel};
//! use subsieve::video::VideoMetadata;
//!
//! let video = VideoMetadata::episode("Show", 1, 2).with_release_group("GROUP");
//! let attrs = extract("Show.S01E02.1080p.WEB.x264-GROUP", MediaHint::Episode);
//! let result = score(&attrs, &video);
//!
//! assert!(result.contains(MatchLabel::Episode));
//! println!("score: {}", result.score);
//! ```

pub mod archive;
pub mod config;
pub mod detect;
pub mod language;
pub mod provider;
pub mod release;
pub mod scanner;
pub mod score;
pub mod video;

pub use config::Config;
pub use language::{resolve, LanguageTag, TokenSource};
pub use release::{extract, MediaHint, ReleaseAttributes};
pub use scanner::{scan, Scanner, ScannerConfig};
pub use score::{score, MatchLabel, MatchResult, Scorer};
pub use video::VideoMetadata;

/// Hard failures. Expected misses (no match, unknown language, nothing
/// suitable in an archive) are plain `None`/empty values instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported archive format: {0}")]
    UnsupportedArchive(String),
    #[error("Corrupt archive: {0}")]
    CorruptArchive(String),
    #[error("Provider error: {0}")]
    Provider(String),
    #[error("Config error: {0}")]
    Config(String),
}
