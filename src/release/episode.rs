//! Season and episode markers.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use super::MediaHint;

/// Widest episode range accepted from a `E01-E99` style marker.
const MAX_RANGE: u32 = 100;

// S01E02, S01E01E02, S01E01-E03, S01E01-03
static SEASON_EPISODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bS(\d{1,3})[\s._]?E(\d{1,4})((?:[\s._]?-?[\s._]?E\d{1,4}|-\d{1,4}\b)*)").unwrap()
});

static EPISODE_CONTINUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(-)?[\s._]*E?(\d{1,4})").unwrap());

// 1x02, 1x01-1x02, 1x01-02
static CROSS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})x(\d{2,3})((?:-(?:\d{1,2}x)?\d{2,3}\b)*)").unwrap()
});

static CROSS_CONTINUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)-(?:\d{1,2}x)?(\d{2,3})").unwrap());

// S01-S03, S01-03
static SEASON_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bS(\d{1,2})[\s._]*-[\s._]*S?(\d{1,2})\b").unwrap());

// Season 2, Saison 2, Sezonul 2, Temporada 2, Season 1-3
static SEASON_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        \b(?:season|saison|sezonul|sezon|temporada|stagione|staffel|seizoen)
        [\s._-]*(\d{1,2})
        (?:[\s._]*(?:-|to)[\s._]*(\d{1,2}))?\b",
    )
    .unwrap()
});

static SEASON_ONLY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bS(\d{1,2})\b").unwrap());

// Episode 5, Ep05, Episodul 5, Episodio 5, Épisode 5, Folge 5
static EPISODE_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        \b(?:episode|episodio|episódio|épisode|episodul|capitulo|capítulo|folge|ep)
        [\s._-]*(\d{1,4})\b",
    )
    .unwrap()
});

// Show - 05 (anime absolute numbering)
static ABSOLUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s-\s(\d{1,4})(?:v\d)?(?:\s|$)").unwrap());

/// Season and episode numbers found in a release name, with their byte spans.
#[derive(Debug, Default)]
pub(super) struct Markers {
    pub seasons: Vec<u32>,
    pub episodes: Vec<u32>,
    pub spans: Vec<(usize, usize)>,
    /// End of the first `S01E02`/`1x02` marker, where an episode title starts.
    pub episode_marker_end: Option<usize>,
}

impl Markers {
    fn add_season(&mut self, season: u32) {
        if !self.seasons.contains(&season) {
            self.seasons.push(season);
        }
    }

    fn add_episode(&mut self, episode: u32) {
        if !self.episodes.contains(&episode) {
            self.episodes.push(episode);
        }
    }

    fn add_range(&mut self, from: u32, to: u32) {
        if to > from && to - from <= MAX_RANGE {
            for n in from..=to {
                self.add_episode(n);
            }
        } else {
            self.add_episode(to);
        }
    }

    fn span(&mut self, caps: &Captures<'_>) {
        if let Some(m) = caps.get(0) {
            self.spans.push((m.start(), m.end()));
        }
    }
}

fn number(caps: &Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse().ok()
}

/// Find every season/episode marker in `name`.
pub(super) fn find(name: &str, hint: MediaHint) -> Markers {
    let mut markers = Markers::default();

    for caps in SEASON_EPISODE.captures_iter(name) {
        let (Some(season), Some(first)) = (number(&caps, 1), number(&caps, 2)) else {
            continue;
        };
        markers.add_season(season);
        markers.add_episode(first);

        let mut last = first;
        if let Some(rest) = caps.get(3) {
            for cont in EPISODE_CONTINUATION.captures_iter(rest.as_str()) {
                let Some(n) = number(&cont, 2) else { continue };
                if cont.get(1).is_some() {
                    markers.add_range(last, n);
                } else {
                    markers.add_episode(n);
                }
                last = n;
            }
        }

        markers.span(&caps);
        if markers.episode_marker_end.is_none() {
            markers.episode_marker_end = caps.get(0).map(|m| m.end());
        }
    }

    if markers.episodes.is_empty() {
        for caps in CROSS.captures_iter(name) {
            let (Some(season), Some(first)) = (number(&caps, 1), number(&caps, 2)) else {
                continue;
            };
            markers.add_season(season);
            markers.add_episode(first);

            let mut last = first;
            if let Some(rest) = caps.get(3) {
                for cont in CROSS_CONTINUATION.captures_iter(rest.as_str()) {
                    let Some(n) = number(&cont, 1) else { continue };
                    markers.add_range(last, n);
                    last = n;
                }
            }

            markers.span(&caps);
            if markers.episode_marker_end.is_none() {
                markers.episode_marker_end = caps.get(0).map(|m| m.end());
            }
        }
    }

    if markers.seasons.is_empty() {
        find_seasons(name, &mut markers);
    }

    if markers.episodes.is_empty() && hint == MediaHint::Episode {
        if let Some(caps) = EPISODE_WORD.captures(name) {
            if let Some(n) = number(&caps, 1) {
                markers.add_episode(n);
                markers.span(&caps);
            }
        } else if let Some(caps) = ABSOLUTE.captures(name) {
            if let Some(n) = number(&caps, 1) {
                markers.add_episode(n);
                markers.span(&caps);
            }
        }
    }

    markers
}

fn find_seasons(name: &str, markers: &mut Markers) {
    if let Some(caps) = SEASON_RANGE.captures(name) {
        if let (Some(from), Some(to)) = (number(&caps, 1), number(&caps, 2)) {
            if to >= from {
                (from..=to).for_each(|s| markers.add_season(s));
                markers.span(&caps);
                return;
            }
        }
    }

    if let Some(caps) = SEASON_WORD.captures(name) {
        if let Some(from) = number(&caps, 1) {
            let to = number(&caps, 2).filter(|to| *to >= from).unwrap_or(from);
            (from..=to).for_each(|s| markers.add_season(s));
            markers.span(&caps);
            return;
        }
    }

    if let Some(caps) = SEASON_ONLY.captures(name) {
        if let Some(season) = number(&caps, 1) {
            markers.add_season(season);
            markers.span(&caps);
        }
    }
}
