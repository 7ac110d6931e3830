//! Subtitle providers and candidate ranking.
//!
//! A [`Provider`] only has to list candidates for a video and download the
//! one picked. Parsing, scoring and language resolution of the candidates
//! happen here, the same way for every provider.

use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::archive::{open_archive, select, EpisodeTarget};
use crate::language::{LanguageTag, Resolver, TokenSource};
use crate::release::{extract, ReleaseAttributes};
use crate::score::{Lookup, MatchResult, Scorer};
use crate::video::VideoMetadata;
use crate::Error;

/// A language as a provider reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageToken {
    pub value: String,
    pub source: TokenSource,
}

impl LanguageToken {
    pub fn code(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            source: TokenSource::Code,
        }
    }

    pub fn name(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            source: TokenSource::Name,
        }
    }
}

/// A subtitle offered by a provider, before parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub provider: String,
    /// Release name or description the subtitle was made for.
    pub release: String,
    pub language: LanguageToken,
    #[serde(default)]
    pub lookup: Lookup,
    /// The download is an archive rather than a subtitle file.
    #[serde(default)]
    pub is_archive: bool,
    /// Provider-specific handle used to download the subtitle.
    pub payload_ref: String,
}

/// A candidate with its parsed attributes, language and score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedCandidate {
    pub candidate: Candidate,
    pub attributes: ReleaseAttributes,
    pub language: LanguageTag,
    #[serde(flatten)]
    pub result: MatchResult,
}

/// A subtitle source.
///
/// `terminate` is always called once `initialize` was, whatever happened in
/// between.
pub trait Provider {
    fn name(&self) -> &str;

    fn initialize(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Candidates for `video` in any of `languages`.
    fn list_candidates(
        &mut self,
        video: &VideoMetadata,
        languages: &[LanguageTag],
    ) -> Result<Vec<Candidate>, Error>;

    /// Raw bytes of a candidate: a subtitle file, or an archive when
    /// `candidate.is_archive` is set.
    fn download(&mut self, candidate: &Candidate) -> Result<Vec<u8>, Error>;

    fn terminate(&mut self) {}
}

/// Parse, resolve and score candidates, best first.
///
/// Candidates with an unrecognised language are dropped. Equal scores keep
/// their input order.
pub fn rank_candidates(
    candidates: Vec<Candidate>,
    video: &VideoMetadata,
    scorer: &Scorer,
    resolver: &Resolver,
) -> Vec<RankedCandidate> {
    let mut ranked: Vec<RankedCandidate> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let Some(tag) = resolver.resolve(&candidate.language.value, &candidate.language.source)
            else {
                log::debug!(
                    "{}: language {:?} not recognized, skipping {}",
                    candidate.provider,
                    candidate.language.value,
                    candidate.release
                );
                return None;
            };
            let attributes = extract(&candidate.release, video.hint());
            let forced = tag.forced || attributes.forced;
            let hearing_impaired = tag.hearing_impaired || attributes.hearing_impaired;
            let language = tag
                .with_forced(forced)
                .with_hearing_impaired(hearing_impaired);
            let result = scorer.score_lookup(&attributes, video, &candidate.lookup);
            Some(RankedCandidate {
                candidate,
                attributes,
                language,
                result,
            })
        })
        .collect();

    ranked.sort_by_key(|r| Reverse(r.result.score));
    ranked
}

/// Ask every provider for candidates and rank those in a wanted language.
///
/// A provider that fails is logged and skipped.
pub fn search(
    providers: &mut [Box<dyn Provider>],
    video: &VideoMetadata,
    languages: &[LanguageTag],
    scorer: &Scorer,
    resolver: &Resolver,
) -> Vec<RankedCandidate> {
    let mut candidates = Vec::new();
    for provider in providers.iter_mut() {
        if let Err(e) = provider.initialize() {
            log::warn!("{}: initialization failed: {}", provider.name(), e);
            provider.terminate();
            continue;
        }
        match provider.list_candidates(video, languages) {
            Ok(found) => {
                log::info!("{}: {} candidate(s)", provider.name(), found.len());
                candidates.extend(found);
            }
            Err(e) => log::warn!("{}: listing failed: {}", provider.name(), e),
        }
        provider.terminate();
    }

    rank_candidates(candidates, video, scorer, resolver)
        .into_iter()
        .filter(|r| languages.is_empty() || languages.iter().any(|l| l.same_language(&r.language)))
        .collect()
}

/// Download a ranked candidate, extracting the right file from archives.
///
/// `Ok(None)` means the archive held nothing matching the video.
pub fn fetch_subtitle(
    provider: &mut dyn Provider,
    ranked: &RankedCandidate,
    video: &VideoMetadata,
    scorer: &Scorer,
) -> Result<Option<Vec<u8>>, Error> {
    let bytes = provider.download(&ranked.candidate)?;
    if !ranked.candidate.is_archive {
        return Ok(Some(bytes));
    }
    let mut archive = open_archive(bytes)?;
    select(archive.as_mut(), EpisodeTarget::of(video), video, scorer)
}
