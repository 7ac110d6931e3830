//! Release attribute extraction.
//!
//! Parses a free-text release string (a filename, or a release name scraped
//! from a provider page) into [`ReleaseAttributes`]. Extraction is best
//! effort and never fails: whatever cannot be recognised is left absent.
//!
//! # Example
//!
//! ```
//! use subsieve::release::{extract, MediaHint, Resolution, Source};
//!
//! let attrs = extract("Breaking.Bad.S05E16.720p.WEB-DL.DD5.1.H.264-NTb", MediaHint::Episode);
//! assert_eq!(attrs.series.as_deref(), Some("Breaking Bad"));
//! assert_eq!(attrs.seasons, vec![5]);
//! assert_eq!(attrs.episodes, vec![16]);
//! assert_eq!(attrs.resolution, Some(Resolution::R720p));
//! assert_eq!(attrs.source, Some(Source::WebDL));
//! assert_eq!(attrs.release_group.as_deref(), Some("NTb"));
//! ```

mod episode;

#[cfg(test)]
mod samples_test;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::language::{default_resolver, LanguageTag, Resolver, TokenSource};

/// Whether the release is expected to be a movie or an episode.
///
/// Changes how ambiguous tokens are read: `Show - 05` is an episode number
/// for series and part of the title for movies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaHint {
    Movie,
    Episode,
}

/// Video resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Resolution {
    R480p,
    R576p,
    R720p,
    R1080p,
    R2160p,
}

impl Resolution {
    /// Parse a single resolution token (`720p`, `4K`, `UHD`).
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_uppercase().as_str() {
            "480P" | "480" | "SD" => Some(Resolution::R480p),
            "576P" | "576" => Some(Resolution::R576p),
            "720P" | "720" => Some(Resolution::R720p),
            "1080P" | "1080I" | "1080" => Some(Resolution::R1080p),
            "2160P" | "2160" | "4K" | "UHD" => Some(Resolution::R2160p),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::R480p => "480p",
            Resolution::R576p => "576p",
            Resolution::R720p => "720p",
            Resolution::R1080p => "1080p",
            Resolution::R2160p => "2160p",
        }
    }
}

/// Release source, ordered from lowest to highest quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Source {
    Cam,
    TeleSync,
    TeleCine,
    Screener,
    DVD,
    HDTV,
    Web,
    WebRip,
    WebDL,
    BluRay,
    Remux,
}

impl Source {
    /// Parse a single source token (`WEB-DL`, `BDRip`, `HDTV`).
    pub fn parse(token: &str) -> Option<Self> {
        let upper = token.trim().to_uppercase().replace(['-', '.', ' '], "");
        match upper.as_str() {
            "CAM" | "CAMRIP" | "HDCAM" => Some(Source::Cam),
            "TS" | "TELESYNC" | "HDTS" | "PDVD" => Some(Source::TeleSync),
            "TC" | "TELECINE" | "HDTC" => Some(Source::TeleCine),
            "SCR" | "SCREENER" | "DVDSCR" | "BDSCR" => Some(Source::Screener),
            "DVD" | "DVDRIP" | "DVDR" | "DVD5" | "DVD9" => Some(Source::DVD),
            "HDTV" | "HDTVRIP" | "PDTV" | "SDTV" | "TV" => Some(Source::HDTV),
            "WEB" => Some(Source::Web),
            "WEBRIP" => Some(Source::WebRip),
            "WEBDL" => Some(Source::WebDL),
            "BLURAY" | "BD" | "BDRIP" | "BRRIP" | "BLURAYRIP" => Some(Source::BluRay),
            "REMUX" | "BDREMUX" => Some(Source::Remux),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Cam => "Cam",
            Source::TeleSync => "Telesync",
            Source::TeleCine => "Telecine",
            Source::Screener => "Screener",
            Source::DVD => "DVD",
            Source::HDTV => "HDTV",
            Source::Web => "Web",
            Source::WebRip => "WEBRip",
            Source::WebDL => "WEB-DL",
            Source::BluRay => "BluRay",
            Source::Remux => "Remux",
        }
    }

    /// Loose equality: the web sources are interchangeable, and so are a
    /// Blu-ray encode and its remux.
    pub fn is_compatible(&self, other: &Source) -> bool {
        use Source::*;
        self == other
            || matches!(
                (self, other),
                (Web | WebRip | WebDL, Web | WebRip | WebDL) | (BluRay | Remux, BluRay | Remux)
            )
    }
}

/// Video codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VideoCodec {
    H264,
    H265,
    AV1,
    VP9,
    XviD,
    MPEG2,
}

impl VideoCodec {
    /// Parse a single codec token (`x264`, `H.265`, `HEVC`).
    pub fn parse(token: &str) -> Option<Self> {
        let upper = token.trim().to_uppercase().replace(['.', '-'], "");
        match upper.as_str() {
            "X264" | "H264" | "AVC" => Some(VideoCodec::H264),
            "X265" | "H265" | "HEVC" => Some(VideoCodec::H265),
            "AV1" => Some(VideoCodec::AV1),
            "VP9" => Some(VideoCodec::VP9),
            "XVID" | "DIVX" => Some(VideoCodec::XviD),
            "MPEG2" => Some(VideoCodec::MPEG2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VideoCodec::H264 => "H.264",
            VideoCodec::H265 => "H.265",
            VideoCodec::AV1 => "AV1",
            VideoCodec::VP9 => "VP9",
            VideoCodec::XviD => "XviD",
            VideoCodec::MPEG2 => "MPEG-2",
        }
    }
}

/// Audio codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AudioCodec {
    AAC,
    AC3,
    EAC3,
    DTS,
    DtsHd,
    TrueHD,
    Atmos,
    FLAC,
    MP3,
    Opus,
}

impl AudioCodec {
    /// Parse a single codec token (`DD5.1`, `DDP5.1`, `DTS-HD.MA`, `AAC2.0`).
    pub fn parse(token: &str) -> Option<Self> {
        let upper = token
            .trim()
            .to_uppercase()
            .replace('+', "P")
            .replace(['.', '-', ' '], "");
        match upper.as_str() {
            "TRUEHD" => Some(AudioCodec::TrueHD),
            "ATMOS" => Some(AudioCodec::Atmos),
            "FLAC" => Some(AudioCodec::FLAC),
            "MP3" => Some(AudioCodec::MP3),
            "OPUS" => Some(AudioCodec::Opus),
            "AC3" => Some(AudioCodec::AC3),
            "EAC3" => Some(AudioCodec::EAC3),
            s if s.starts_with("DTSHD") => Some(AudioCodec::DtsHd),
            s if s.starts_with("DTS") => Some(AudioCodec::DTS),
            s if s.starts_with("DDP") => Some(AudioCodec::EAC3),
            s if s.starts_with("DD") && s[2..].chars().all(|c| c.is_ascii_digit()) => {
                Some(AudioCodec::AC3)
            }
            s if s.starts_with("AAC") && s[3..].chars().all(|c| c.is_ascii_digit()) => {
                Some(AudioCodec::AAC)
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCodec::AAC => "AAC",
            AudioCodec::AC3 => "AC3",
            AudioCodec::EAC3 => "EAC3",
            AudioCodec::DTS => "DTS",
            AudioCodec::DtsHd => "DTS-HD",
            AudioCodec::TrueHD => "TrueHD",
            AudioCodec::Atmos => "Atmos",
            AudioCodec::FLAC => "FLAC",
            AudioCodec::MP3 => "MP3",
            AudioCodec::Opus => "Opus",
        }
    }
}

macro_rules! string_conversions {
    ($($ty:ident => $what:literal),* $(,)?) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl TryFrom<String> for $ty {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                $ty::parse(&value).ok_or_else(|| format!("unknown {} {:?}", $what, value))
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> String {
                value.as_str().to_string()
            }
        }
    )*};
}

string_conversions! {
    Resolution => "resolution",
    Source => "source",
    VideoCodec => "video codec",
    AudioCodec => "audio codec",
}

/// Structured attributes of one release string.
///
/// Absent fields mean "unknown", never "explicitly empty".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReleaseAttributes {
    /// Movie title, or episode title for series.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    /// Seasons covered, in order of appearance (several for season packs).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub seasons: Vec<u32>,
    /// Episodes covered, in order (several for multi-episode releases).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub episodes: Vec<u32>,
    /// Marked as a complete season or series.
    #[serde(skip_serializing_if = "is_false")]
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution: Option<Resolution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_codec: Option<VideoCodec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<AudioCodec>,
    /// Streaming service tag (`AMZN`, `NF`, ...).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub streaming_service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_group: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<LanguageTag>,
    #[serde(skip_serializing_if = "is_false")]
    pub forced: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub hearing_impaired: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ReleaseAttributes {
    /// Nothing at all was recognised.
    pub fn is_empty(&self) -> bool {
        *self == ReleaseAttributes::default()
    }

    /// The first season mentioned, if any.
    pub fn season(&self) -> Option<u32> {
        self.seasons.first().copied()
    }

    /// The first episode mentioned, if any.
    pub fn episode(&self) -> Option<u32> {
        self.episodes.first().copied()
    }
}

static EXTENSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\.(mkv|mp4|avi|m4v|mov|wmv|mpg|mpeg|ts|m2ts|webm|flv|srt|ass|ssa|sub|idx|vtt|smi|sup|txt|zip|rar|7z)$",
    )
    .unwrap()
});

static LEADING_BRACKET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\[([^\[\]]+)\]\s*").unwrap());

static TRAILING_BRACKET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\[([^\[\]]+)\]\s*$").unwrap());

static CRC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]{8}$").unwrap());

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19\d{2}|20\d{2})\b").unwrap());

static RESOLUTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(2160p|4K|UHD|1080[pi]|720p|576p|480p)\b").unwrap()
});

static SOURCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        \b(
            CAM(?:RIP)?|HDCAM|
            TS|TELESYNC|HDTS|
            TC|TELECINE|
            SCR|SCREENER|DVDSCR|
            DVD(?:RIP|R|5|9)?|
            HDTV(?:RIP)?|PDTV|
            WEB-?DL|
            WEB-?RIP|
            WEB|
            BLU-?RAY|BD(?:RIP)?|BRRIP|
            (?:BD)?REMUX
        )\b",
    )
    .unwrap()
});

static VIDEO_CODEC_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(x\.?264|x\.?265|H\.?264|H\.?265|HEVC|AVC|AV1|VP9|XviD|DivX|MPEG-?2)\b")
        .unwrap()
});

static AUDIO_CODEC_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        \b(
            AAC(?:\d\.\d)?|
            E-?AC-?3|
            DDP(?:\d\.?\d)?|
            DD\d\.?\d|
            AC-?3|
            DTS-HD(?:[\.-]?MA)?|
            DTS(?:-?X)?|
            TrueHD|Atmos|FLAC|MP3|Opus
        )\b",
    )
    .unwrap()
});

// Case-sensitive: "nf" or "it" in lowercase are ordinary words.
static STREAMING_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(AMZN|NF|DSNP|HMAX|ATVP|HULU|PCOK|PMTP|iT)\b").unwrap());

static COMPLETE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bcomplete\b").unwrap());

static FORCED_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bforced\b").unwrap());

// "hi" in lowercase is Hindi, so only the uppercase forms count.
static HI_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:SDH|HI|CC)\b|(?i:\bsdh\b)").unwrap());

static LANGUAGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        \b(
            # Regional variants
            PT-?BR|PT-?PT|ES-?LA|LATINO|CHT|CHS|BIG5|
            # Subbed French
            VOSTFR|
            ENG(?:LISH)?|
            FRENCH|TRUEFRENCH|VFF|VFQ|VF|
            GER(?:MAN)?|DEU(?:TSCH)?|
            SPA(?:NISH)?|ESP(?:ANOL)?|CASTELLANO|
            ITA(?:LIAN)?|
            RUS(?:SIAN)?|
            JAP(?:ANESE)?|JPN|
            KOR(?:EAN)?|
            CHI(?:NESE)?|
            POR(?:TUGUESE)?|
            DUT(?:CH)?|NLD|
            POL(?:ISH)?
        )\b",
    )
    .unwrap()
});

static RELEASE_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-\s*([A-Za-z0-9@&!]+)\s*$").unwrap());

/// Suffix fragments of hyphenated technical tokens, never group names.
const GROUP_BLACKLIST: &[&str] = &["DL", "RIP", "HD", "MA", "RAY", "X"];

/// Map a release language token to a code the resolver understands.
fn language_code(token: &str) -> Option<&'static str> {
    let upper = token.to_uppercase().replace('-', "");
    let code = match upper.as_str() {
        "PTBR" => "pt-br",
        "PTPT" => "pt-pt",
        "ESLA" | "LATINO" => "es-la",
        "CHT" | "BIG5" => "zht",
        "CHS" => "zh",
        "ENG" | "ENGLISH" => "en",
        "VOSTFR" | "FRENCH" | "TRUEFRENCH" | "VFF" | "VFQ" | "VF" => "fr",
        "GER" | "GERMAN" | "DEU" | "DEUTSCH" => "de",
        "SPA" | "SPANISH" | "ESP" | "ESPANOL" | "CASTELLANO" => "es",
        "ITA" | "ITALIAN" => "it",
        "RUS" | "RUSSIAN" => "ru",
        "JAP" | "JAPANESE" | "JPN" => "ja",
        "KOR" | "KOREAN" => "ko",
        "CHI" | "CHINESE" => "zh",
        "POR" | "PORTUGUESE" => "pt",
        "DUT" | "DUTCH" | "NLD" => "nl",
        "POL" | "POLISH" => "pl",
        _ => return None,
    };
    Some(code)
}

/// Extract attributes from a release string with the default resolver.
pub fn extract(release: &str, hint: MediaHint) -> ReleaseAttributes {
    extract_with(release, hint, default_resolver())
}

/// Extract attributes from a release string.
///
/// Embedded language tokens are resolved through `resolver`.
pub fn extract_with(release: &str, hint: MediaHint, resolver: &Resolver) -> ReleaseAttributes {
    let mut attrs = ReleaseAttributes::default();

    let mut name = release.trim();
    if let Some(m) = EXTENSION.find(name) {
        name = &name[..m.start()];
    }

    let mut bracket_group = None;
    if let Some(caps) = LEADING_BRACKET.captures(name) {
        bracket_group = caps.get(1).map(|g| g.as_str().trim().to_string());
        name = &name[caps.get(0).map_or(0, |m| m.end())..];
    }
    if let Some(caps) = TRAILING_BRACKET.captures(name) {
        let tag = caps.get(1).map_or("", |g| g.as_str().trim());
        if bracket_group.is_none() && !CRC.is_match(tag) {
            bracket_group = Some(tag.to_string());
        }
        name = &name[..caps.get(0).map_or(name.len(), |m| m.start())];
    }

    // Start of the first technical token; the title is everything before it.
    let mut boundary = name.len();
    let mut mark = |start: usize| boundary = boundary.min(start);

    let markers = episode::find(name, hint);
    for &(start, _) in &markers.spans {
        mark(start);
    }
    attrs.seasons = markers.seasons;
    attrs.episodes = markers.episodes;

    if let Some(m) = RESOLUTION_PATTERN.find(name) {
        attrs.resolution = Resolution::parse(m.as_str());
        mark(m.start());
    }

    let mut sources = SOURCE_PATTERN.find_iter(name).peekable();
    if let Some(first) = sources.peek() {
        mark(first.start());
    }
    let sources: Vec<Source> = sources.filter_map(|m| Source::parse(m.as_str())).collect();
    attrs.source = if sources.contains(&Source::Remux) {
        Some(Source::Remux)
    } else {
        sources.first().copied()
    };

    if let Some(m) = VIDEO_CODEC_PATTERN.find(name) {
        attrs.video_codec = VideoCodec::parse(m.as_str());
        mark(m.start());
    }

    if let Some(m) = AUDIO_CODEC_PATTERN.find(name) {
        attrs.audio_codec = AudioCodec::parse(m.as_str());
        mark(m.start());
    }

    if let Some(m) = STREAMING_PATTERN.find(name) {
        attrs.streaming_service = Some(m.as_str().to_string());
        mark(m.start());
    }

    if let Some(m) = COMPLETE_PATTERN.find(name) {
        attrs.complete = true;
        mark(m.start());
    }

    if let Some(m) = FORCED_PATTERN.find(name) {
        attrs.forced = true;
        mark(m.start());
    }

    if let Some(m) = HI_PATTERN.find(name) {
        attrs.hearing_impaired = true;
        mark(m.start());
    }

    // A year at the very start is part of the title ("1917", "2012").
    let technical_start = boundary;
    if let Some(m) = YEAR
        .find_iter(name)
        .filter(|m| m.start() > 0 && m.start() < technical_start)
        .last()
    {
        attrs.year = m.as_str().parse().ok();
        boundary = boundary.min(m.start());
    }

    // Language tokens only count after the title, so "The Italian Job" keeps its name.
    if boundary < name.len() {
        for m in LANGUAGE_PATTERN.find_iter(&name[boundary..]) {
            let Some(code) = language_code(m.as_str()) else {
                continue;
            };
            match resolver.resolve(code, &TokenSource::Code) {
                Some(tag) if !attrs.languages.contains(&tag) => attrs.languages.push(tag),
                Some(_) => {}
                None => log::debug!("unresolved release language {:?}", m.as_str()),
            }
        }
    }

    let leading = clean_title(&name[..boundary]);
    match hint {
        MediaHint::Movie => attrs.title = leading,
        MediaHint::Episode => {
            attrs.series = leading;
            attrs.title = markers
                .episode_marker_end
                .and_then(|end| episode_title(name, end, &markers.spans));
        }
    }

    attrs.release_group = dash_group(name, boundary).or(bracket_group);

    log::debug!("extracted {:?} from {:?}", attrs, release);
    attrs
}

/// Text between the episode marker and the next technical token.
fn episode_title(
    name: &str,
    marker_end: usize,
    spans: &[(usize, usize)],
) -> Option<String> {
    let next = [
        RESOLUTION_PATTERN.find_at(name, marker_end),
        SOURCE_PATTERN.find_at(name, marker_end),
        VIDEO_CODEC_PATTERN.find_at(name, marker_end),
        AUDIO_CODEC_PATTERN.find_at(name, marker_end),
        STREAMING_PATTERN.find_at(name, marker_end),
        LANGUAGE_PATTERN.find_at(name, marker_end),
        YEAR.find_at(name, marker_end),
    ]
    .into_iter()
    .flatten()
    .map(|m| m.start())
    .chain(spans.iter().map(|&(s, _)| s).filter(|&s| s >= marker_end))
    .min()
    .unwrap_or(name.len());

    if next <= marker_end {
        return None;
    }
    clean_title(&name[marker_end..next])
}

fn dash_group(name: &str, boundary: usize) -> Option<String> {
    if boundary >= name.len() {
        return None;
    }
    let caps = RELEASE_GROUP.captures(name)?;
    let whole = caps.get(0)?;
    let group = caps.get(1)?.as_str();

    // The whole hyphenated word, as in "PT-BR" or "WEB-DL".
    let word_start = name[..whole.start()]
        .rfind(['.', ' ', '_'])
        .map_or(0, |i| i + 1);
    let word = name[word_start..].trim();

    let rejected = whole.start() < boundary
        || language_code(word).is_some()
        || Source::parse(word).is_some()
        || group.chars().all(|c| c.is_ascii_digit())
        || GROUP_BLACKLIST.contains(&group.to_uppercase().as_str())
        || Resolution::parse(group).is_some()
        || Source::parse(group).is_some()
        || VideoCodec::parse(group).is_some()
        || AudioCodec::parse(group).is_some();

    (!rejected).then(|| group.to_string())
}

/// Turn a dotted/underscored fragment into a display title.
fn clean_title(raw: &str) -> Option<String> {
    let spaced = raw.replace(['.', '_'], " ");
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '(' | '[' | ')' | ']'))
        .to_string();

    trimmed
        .chars()
        .any(char::is_alphanumeric)
        .then_some(trimmed)
}
