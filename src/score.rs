//! Match scoring.
//!
//! Compares a release's [`ReleaseAttributes`] against the [`VideoMetadata`]
//! it is a candidate for. The result is the set of matching attribute labels
//! and their summed weight, used to rank candidates for the same video.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::release::ReleaseAttributes;
use crate::video::{VideoKind, VideoMetadata};

/// An attribute that matched between a release and the video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchLabel {
    Hash,
    Title,
    Series,
    Year,
    Season,
    Episode,
    ReleaseGroup,
    StreamingService,
    Source,
    AudioCodec,
    Resolution,
    VideoCodec,
}

impl MatchLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchLabel::Hash => "hash",
            MatchLabel::Title => "title",
            MatchLabel::Series => "series",
            MatchLabel::Year => "year",
            MatchLabel::Season => "season",
            MatchLabel::Episode => "episode",
            MatchLabel::ReleaseGroup => "release_group",
            MatchLabel::StreamingService => "streaming_service",
            MatchLabel::Source => "source",
            MatchLabel::AudioCodec => "audio_codec",
            MatchLabel::Resolution => "resolution",
            MatchLabel::VideoCodec => "video_codec",
        }
    }
}

impl fmt::Display for MatchLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-label weights for one kind of video.
///
/// Labels never produced for a kind of video (`title` for episodes, `series`,
/// `season` and `episode` for movies) carry 0 in its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weights {
    pub hash: u32,
    pub title: u32,
    pub series: u32,
    pub year: u32,
    pub season: u32,
    pub episode: u32,
    pub release_group: u32,
    pub streaming_service: u32,
    pub source: u32,
    pub audio_codec: u32,
    pub resolution: u32,
    pub video_codec: u32,
}

impl Weights {
    /// Episode weights.
    pub const EPISODE: Weights = Weights {
        hash: 359,
        title: 0,
        series: 180,
        year: 90,
        season: 30,
        episode: 30,
        release_group: 15,
        streaming_service: 15,
        source: 7,
        audio_codec: 3,
        resolution: 2,
        video_codec: 2,
    };

    /// Movie weights.
    pub const MOVIE: Weights = Weights {
        hash: 119,
        title: 60,
        series: 0,
        year: 30,
        season: 0,
        episode: 0,
        release_group: 15,
        streaming_service: 15,
        source: 7,
        audio_codec: 3,
        resolution: 2,
        video_codec: 2,
    };

    pub fn get(&self, label: MatchLabel) -> u32 {
        match label {
            MatchLabel::Hash => self.hash,
            MatchLabel::Title => self.title,
            MatchLabel::Series => self.series,
            MatchLabel::Year => self.year,
            MatchLabel::Season => self.season,
            MatchLabel::Episode => self.episode,
            MatchLabel::ReleaseGroup => self.release_group,
            MatchLabel::StreamingService => self.streaming_service,
            MatchLabel::Source => self.source,
            MatchLabel::AudioCodec => self.audio_codec,
            MatchLabel::Resolution => self.resolution,
            MatchLabel::VideoCodec => self.video_codec,
        }
    }

    fn slot(&mut self, label: MatchLabel) -> &mut u32 {
        match label {
            MatchLabel::Hash => &mut self.hash,
            MatchLabel::Title => &mut self.title,
            MatchLabel::Series => &mut self.series,
            MatchLabel::Year => &mut self.year,
            MatchLabel::Season => &mut self.season,
            MatchLabel::Episode => &mut self.episode,
            MatchLabel::ReleaseGroup => &mut self.release_group,
            MatchLabel::StreamingService => &mut self.streaming_service,
            MatchLabel::Source => &mut self.source,
            MatchLabel::AudioCodec => &mut self.audio_codec,
            MatchLabel::Resolution => &mut self.resolution,
            MatchLabel::VideoCodec => &mut self.video_codec,
        }
    }

    /// Replace weights with configured values.
    ///
    /// Zero overrides are ignored. If the result would let a technical label
    /// weigh as much as an identity label, every override is dropped.
    pub fn with_overrides(self, overrides: &WeightOverrides) -> Self {
        let mut weights = self;
        for (label, value) in overrides.iter() {
            if value == 0 {
                log::warn!("ignoring zero weight for {}", label);
                continue;
            }
            *weights.slot(label) = value;
        }
        if !weights.ranks_identity_first() {
            log::warn!("ignoring weight overrides ranking technical labels above identity");
            return self;
        }
        weights
    }

    /// Whether every non-zero identity weight exceeds every technical weight.
    pub fn ranks_identity_first(&self) -> bool {
        let identity = IDENTITY_LABELS
            .iter()
            .map(|l| self.get(*l))
            .filter(|w| *w > 0)
            .min();
        let technical = TECHNICAL_LABELS
            .iter()
            .map(|l| self.get(*l))
            .max()
            .unwrap_or(0);
        identity.map_or(true, |w| w > technical)
    }

    /// Score of a release matching every label.
    pub fn total(&self) -> u32 {
        ALL_LABELS.iter().map(|l| self.get(*l)).sum()
    }
}

const ALL_LABELS: [MatchLabel; 12] = [
    MatchLabel::Hash,
    MatchLabel::Title,
    MatchLabel::Series,
    MatchLabel::Year,
    MatchLabel::Season,
    MatchLabel::Episode,
    MatchLabel::ReleaseGroup,
    MatchLabel::StreamingService,
    MatchLabel::Source,
    MatchLabel::AudioCodec,
    MatchLabel::Resolution,
    MatchLabel::VideoCodec,
];

const IDENTITY_LABELS: [MatchLabel; 6] = [
    MatchLabel::Hash,
    MatchLabel::Title,
    MatchLabel::Series,
    MatchLabel::Year,
    MatchLabel::Season,
    MatchLabel::Episode,
];

const TECHNICAL_LABELS: [MatchLabel; 6] = [
    MatchLabel::ReleaseGroup,
    MatchLabel::StreamingService,
    MatchLabel::Source,
    MatchLabel::AudioCodec,
    MatchLabel::Resolution,
    MatchLabel::VideoCodec,
];

/// Optional per-label weight overrides, as read from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightOverrides {
    pub hash: Option<u32>,
    pub title: Option<u32>,
    pub series: Option<u32>,
    pub year: Option<u32>,
    pub season: Option<u32>,
    pub episode: Option<u32>,
    pub release_group: Option<u32>,
    pub streaming_service: Option<u32>,
    pub source: Option<u32>,
    pub audio_codec: Option<u32>,
    pub resolution: Option<u32>,
    pub video_codec: Option<u32>,
}

impl WeightOverrides {
    fn iter(&self) -> impl Iterator<Item = (MatchLabel, u32)> + '_ {
        ALL_LABELS.into_iter().filter_map(move |label| {
            let value = match label {
                MatchLabel::Hash => self.hash,
                MatchLabel::Title => self.title,
                MatchLabel::Series => self.series,
                MatchLabel::Year => self.year,
                MatchLabel::Season => self.season,
                MatchLabel::Episode => self.episode,
                MatchLabel::ReleaseGroup => self.release_group,
                MatchLabel::StreamingService => self.streaming_service,
                MatchLabel::Source => self.source,
                MatchLabel::AudioCodec => self.audio_codec,
                MatchLabel::Resolution => self.resolution,
                MatchLabel::VideoCodec => self.video_codec,
            };
            value.map(|v| (label, v))
        })
    }
}

/// How a candidate was found.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lookup {
    /// Text search by title, series or identifiers.
    #[default]
    Query,
    /// Looked up by a file hash of the given algorithm.
    Hash(String),
}

/// Matched labels and their summed weight.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchResult {
    pub matches: BTreeSet<MatchLabel>,
    pub score: u32,
}

impl MatchResult {
    pub fn contains(&self, label: MatchLabel) -> bool {
        self.matches.contains(&label)
    }
}

/// Scores releases against videos with one weight table per video kind.
#[derive(Debug, Clone)]
pub struct Scorer {
    episode: Weights,
    movie: Weights,
}

impl Scorer {
    pub fn new() -> Self {
        Self::with_weights(Weights::EPISODE, Weights::MOVIE)
    }

    pub fn with_weights(episode: Weights, movie: Weights) -> Self {
        Self { episode, movie }
    }

    pub fn weights_for(&self, video: &VideoMetadata) -> &Weights {
        match video.kind {
            VideoKind::Movie(_) => &self.movie,
            VideoKind::Episode(_) => &self.episode,
        }
    }

    /// Score a release found by a text query.
    pub fn score(&self, attrs: &ReleaseAttributes, video: &VideoMetadata) -> MatchResult {
        self.score_lookup(attrs, video, &Lookup::Query)
    }

    /// Score a release, taking into account how it was found.
    pub fn score_lookup(
        &self,
        attrs: &ReleaseAttributes,
        video: &VideoMetadata,
        lookup: &Lookup,
    ) -> MatchResult {
        let matches = compute_matches(attrs, video, lookup);
        let weights = self.weights_for(video);
        let score = matches.iter().map(|l| weights.get(*l)).sum();
        MatchResult { matches, score }
    }
}

impl Default for Scorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Score a release found by a text query with the default weights.
pub fn score(attrs: &ReleaseAttributes, video: &VideoMetadata) -> MatchResult {
    Scorer::new().score(attrs, video)
}

/// Labels of every attribute that matches between `attrs` and `video`.
///
/// Missing data on either side never produces a label.
pub fn compute_matches(
    attrs: &ReleaseAttributes,
    video: &VideoMetadata,
    lookup: &Lookup,
) -> BTreeSet<MatchLabel> {
    let mut matches = BTreeSet::new();

    if let Lookup::Hash(algorithm) = lookup {
        if video.hashes.contains_key(algorithm) {
            matches.insert(MatchLabel::Hash);
        }
    }

    match &video.kind {
        VideoKind::Episode(info) => {
            if title_matches(attrs.series.as_deref(), video) {
                matches.insert(MatchLabel::Series);
            }
            if attrs.seasons.contains(&info.season) {
                matches.insert(MatchLabel::Season);
                // an episode number only means something within its season
                if attrs.episodes.contains(&info.episode) {
                    matches.insert(MatchLabel::Episode);
                }
            }
            let year = match (attrs.year, video.year) {
                (Some(found), Some(known)) => found == known,
                (None, _) => info.original_series,
                (Some(_), None) => false,
            };
            if year {
                matches.insert(MatchLabel::Year);
            }
        }
        VideoKind::Movie(_) => {
            if title_matches(attrs.title.as_deref(), video) {
                matches.insert(MatchLabel::Title);
            }
            if attrs.year.is_some() && attrs.year == video.year {
                matches.insert(MatchLabel::Year);
            }
        }
    }

    if let (Some(found), Some(known)) = (&attrs.release_group, &video.release_group) {
        if release_groups_match(found, known) {
            matches.insert(MatchLabel::ReleaseGroup);
        }
    }

    if let (Some(found), Some(known)) = (&attrs.streaming_service, &video.streaming_service) {
        if streaming_service_code(found) == streaming_service_code(known) {
            matches.insert(MatchLabel::StreamingService);
        }
    }

    if let (Some(found), Some(known)) = (attrs.source, video.source) {
        if found.is_compatible(&known) {
            matches.insert(MatchLabel::Source);
        }
    }

    if attrs.resolution.is_some() && attrs.resolution == video.resolution {
        matches.insert(MatchLabel::Resolution);
    }
    if attrs.video_codec.is_some() && attrs.video_codec == video.video_codec {
        matches.insert(MatchLabel::VideoCodec);
    }
    if attrs.audio_codec.is_some() && attrs.audio_codec == video.audio_codec {
        matches.insert(MatchLabel::AudioCodec);
    }

    log::debug!("matches {:?}", matches);
    matches
}

fn title_matches(found: Option<&str>, video: &VideoMetadata) -> bool {
    let Some(found) = found.map(sanitize).filter(|s| !s.is_empty()) else {
        return false;
    };
    video.titles().any(|title| sanitize(title) == found)
}

static LEADING_ARTICLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(the|a|an) ").unwrap());

/// Normalise a title for comparison: transliterated to ASCII, lowercase,
/// punctuation removed, leading article dropped.
pub fn sanitize(title: &str) -> String {
    let ascii = deunicode::deunicode(title).to_lowercase().replace('&', " and ");
    let words: String = ascii
        .chars()
        .filter(|c| *c != '\'')
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    let collapsed = words.split_whitespace().collect::<Vec<_>>().join(" ");
    LEADING_ARTICLE.replace(&collapsed, "").into_owned()
}

static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

/// Normalise a release group for comparison: bracketed tags removed,
/// lowercase, alphanumerics only.
pub fn sanitize_release_group(group: &str) -> String {
    BRACKETED
        .replace_all(group, "")
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_lowercase()
}

/// Groups known to publish the same encodes under different names.
const EQUIVALENT_RELEASE_GROUPS: &[&[&str]] = &[
    &["lol", "dimension"],
    &["asap", "immerse", "fleet"],
    &["avs", "sva"],
];

fn release_groups_match(found: &str, known: &str) -> bool {
    let found = sanitize_release_group(found);
    let known = sanitize_release_group(known);
    if found.is_empty() || known.is_empty() {
        return false;
    }
    found == known
        || EQUIVALENT_RELEASE_GROUPS
            .iter()
            .any(|set| set.contains(&found.as_str()) && set.contains(&known.as_str()))
}

/// Canonical short code of a streaming service, from its tag or name.
pub fn streaming_service_code(service: &str) -> String {
    let key: String = service
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_lowercase();
    let code = match key.as_str() {
        "amzn" | "amazon" | "amazonprime" | "primevideo" => "AMZN",
        "nf" | "netflix" => "NF",
        "dsnp" | "disney" | "disneyplus" => "DSNP",
        "hmax" | "hbomax" | "max" => "HMAX",
        "atvp" | "appletv" | "appletvplus" => "ATVP",
        "hulu" => "HULU",
        "pcok" | "peacock" => "PCOK",
        "pmtp" | "paramount" | "paramountplus" => "PMTP",
        "it" | "itunes" => "iT",
        _ => return key,
    };
    code.to_string()
}
