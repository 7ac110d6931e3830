//! Video metadata model.
//!
//! The known attributes of the video being subtitled. Built once per video by
//! whatever identifies it and read-only afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::release::{self, AudioCodec, MediaHint, Resolution, Source, VideoCodec};

/// Identity of a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieInfo {
    pub title: String,
    /// Other known titles, primary first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_titles: Vec<String>,
}

/// Identity of a series episode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeInfo {
    pub series: String,
    /// Other known series names, primary first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_series: Vec<String>,
    pub season: u32,
    pub episode: u32,
    /// Episode title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The series has no remake or reboot sharing its name, so releases
    /// don't need a year to be unambiguous.
    #[serde(default)]
    pub original_series: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_imdb_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_tvdb_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvdb_id: Option<u64>,
}

/// Movie or episode identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoKind {
    Movie(MovieInfo),
    Episode(EpisodeInfo),
}

/// The video a subtitle is wanted for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub kind: VideoKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_codec: Option<VideoCodec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<AudioCodec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streaming_service: Option<String>,
    /// File hashes keyed by algorithm name (`opensubtitles`, `napiprojekt`, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hashes: BTreeMap<String, String>,
}

impl VideoMetadata {
    fn with_kind(kind: VideoKind) -> Self {
        Self {
            kind,
            year: None,
            imdb_id: None,
            resolution: None,
            source: None,
            video_codec: None,
            audio_codec: None,
            release_group: None,
            streaming_service: None,
            hashes: BTreeMap::new(),
        }
    }

    pub fn movie(title: impl Into<String>) -> Self {
        Self::with_kind(VideoKind::Movie(MovieInfo {
            title: title.into(),
            alternative_titles: Vec::new(),
        }))
    }

    pub fn episode(series: impl Into<String>, season: u32, episode: u32) -> Self {
        Self::with_kind(VideoKind::Episode(EpisodeInfo {
            series: series.into(),
            alternative_series: Vec::new(),
            season,
            episode,
            title: None,
            original_series: false,
            series_imdb_id: None,
            series_tvdb_id: None,
            tvdb_id: None,
        }))
    }

    /// Guess metadata from a video filename.
    ///
    /// Returns `None` when the name lacks the identity the kind requires: a
    /// title for movies, or series, season and episode for episodes.
    pub fn from_name(name: &str, hint: MediaHint) -> Option<Self> {
        let attrs = release::extract(name, hint);

        let mut video = match hint {
            MediaHint::Movie => Self::movie(attrs.title.clone()?),
            MediaHint::Episode => {
                let mut video =
                    Self::episode(attrs.series.clone()?, attrs.season()?, attrs.episode()?);
                if let VideoKind::Episode(info) = &mut video.kind {
                    info.title = attrs.title.clone();
                }
                video
            }
        };

        video.year = attrs.year;
        video.resolution = attrs.resolution;
        video.source = attrs.source;
        video.video_codec = attrs.video_codec;
        video.audio_codec = attrs.audio_codec;
        video.release_group = attrs.release_group;
        video.streaming_service = attrs.streaming_service;
        Some(video)
    }

    pub fn with_year(mut self, year: u16) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_video_codec(mut self, codec: VideoCodec) -> Self {
        self.video_codec = Some(codec);
        self
    }

    pub fn with_audio_codec(mut self, codec: AudioCodec) -> Self {
        self.audio_codec = Some(codec);
        self
    }

    pub fn with_release_group(mut self, group: impl Into<String>) -> Self {
        self.release_group = Some(group.into());
        self
    }

    pub fn with_streaming_service(mut self, service: impl Into<String>) -> Self {
        self.streaming_service = Some(service.into());
        self
    }

    pub fn with_hash(mut self, algorithm: impl Into<String>, hash: impl Into<String>) -> Self {
        self.hashes.insert(algorithm.into(), hash.into());
        self
    }

    /// Add an alternative title (movies) or series name (episodes).
    pub fn with_alternative_title(mut self, title: impl Into<String>) -> Self {
        match &mut self.kind {
            VideoKind::Movie(info) => info.alternative_titles.push(title.into()),
            VideoKind::Episode(info) => info.alternative_series.push(title.into()),
        }
        self
    }

    /// Mark an episode's series as having no same-named remake.
    ///
    /// No effect on movies.
    pub fn with_original_series(mut self, original: bool) -> Self {
        if let VideoKind::Episode(info) = &mut self.kind {
            info.original_series = original;
        }
        self
    }

    pub fn hint(&self) -> MediaHint {
        match self.kind {
            VideoKind::Movie(_) => MediaHint::Movie,
            VideoKind::Episode(_) => MediaHint::Episode,
        }
    }

    /// Primary title or series name followed by the alternatives, in order.
    pub fn titles(&self) -> impl Iterator<Item = &str> {
        let (primary, alternatives) = match &self.kind {
            VideoKind::Movie(info) => (&info.title, &info.alternative_titles),
            VideoKind::Episode(info) => (&info.series, &info.alternative_series),
        };
        std::iter::once(primary.as_str()).chain(alternatives.iter().map(String::as_str))
    }

    pub fn as_episode(&self) -> Option<&EpisodeInfo> {
        match &self.kind {
            VideoKind::Episode(info) => Some(info),
            VideoKind::Movie(_) => None,
        }
    }
}
