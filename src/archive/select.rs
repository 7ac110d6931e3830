//! Archive subtitle selection.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{is_hidden, SubtitleArchive};
use crate::language::stages::SUBTITLE_EXTENSIONS;
use crate::release::extract;
use crate::score::Scorer;
use crate::video::VideoMetadata;
use crate::Error;

/// The episode wanted out of a season pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeTarget {
    pub season: u32,
    pub episode: u32,
}

impl EpisodeTarget {
    pub fn new(season: u32, episode: u32) -> Self {
        Self { season, episode }
    }

    /// Season and episode of an episode video.
    pub fn of(video: &VideoMetadata) -> Option<Self> {
        video.as_episode().map(|info| Self::new(info.season, info.episode))
    }
}

/// Pick the subtitle in `archive` that best matches `video`.
///
/// A lone subtitle entry is returned as is. Otherwise every entry name is
/// parsed and scored; with a `target`, entries for other episodes are
/// skipped and a best score of zero selects nothing.
///
/// `Ok(None)` means no entry fits. Errors come from reading the archive.
pub fn select(
    archive: &mut dyn SubtitleArchive,
    target: Option<EpisodeTarget>,
    video: &VideoMetadata,
    scorer: &Scorer,
) -> Result<Option<Vec<u8>>, Error> {
    let names: Vec<String> = archive
        .namelist()
        .into_iter()
        .filter(|name| !is_hidden(name) && has_subtitle_extension(name))
        .collect();

    match names.as_slice() {
        [] => {
            log::info!("archive holds no subtitles");
            return Ok(None);
        }
        [only] => {
            log::debug!("single subtitle {} in archive", only);
            return archive.read(only).map(Some);
        }
        _ => {}
    }

    let mut best: Option<(&str, u32)> = None;
    for name in &names {
        let basename = Path::new(name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(name);
        let attrs = extract(basename, video.hint());

        if let Some(target) = target {
            // anime packs often carry no season number at all
            let season_ok = attrs.seasons.is_empty() || attrs.seasons.contains(&target.season);
            if !season_ok || !attrs.episodes.contains(&target.episode) {
                log::debug!("{} is not S{:02}E{:02}", name, target.season, target.episode);
                continue;
            }
        }

        let score = scorer.score(&attrs, video).score;
        log::debug!("{} scored {}", name, score);
        if best.map_or(true, |(_, top)| score > top) {
            best = Some((name, score));
        }
    }

    match best {
        Some((_, 0)) if target.is_some() => {
            log::info!("nothing in the archive matches the wanted episode");
            Ok(None)
        }
        Some((name, _)) => {
            let name = name.to_string();
            archive.read(&name).map(Some)
        }
        None => Ok(None),
    }
}

fn has_subtitle_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .is_some_and(|(_, ext)| SUBTITLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::{open_archive, MemoryArchive};

    fn archive(entries: &[(&str, &str)]) -> MemoryArchive {
        entries
            .iter()
            .map(|(name, content)| (*name, content.as_bytes().to_vec()))
            .collect()
    }

    #[test]
    fn test_single_subtitle_shortcut() {
        let mut pack = archive(&[("Unrelated.Name.S09E09.srt", "only"), ("readme.nfo", "x")]);
        let video = VideoMetadata::episode("Show", 1, 2);
        let picked = select(&mut pack, EpisodeTarget::of(&video), &video, &Scorer::new()).unwrap();
        assert_eq!(picked.as_deref(), Some(b"only".as_slice()));
    }

    #[test]
    fn test_season_pack() {
        let mut pack = archive(&[
            ("Show.S01E01.720p.HDTV-GRP.srt", "one"),
            ("Show.S01E02.720p.HDTV-GRP.srt", "two"),
            ("Show.S01E03.720p.HDTV-GRP.srt", "three"),
        ]);
        let video = VideoMetadata::episode("Show", 1, 2);
        let picked = select(&mut pack, EpisodeTarget::of(&video), &video, &Scorer::new()).unwrap();
        assert_eq!(picked.as_deref(), Some(b"two".as_slice()));
    }

    #[test]
    fn test_missing_episode_fails() {
        let mut pack = archive(&[
            ("Show.S01E01.srt", "one"),
            ("Show.S01E03.srt", "three"),
        ]);
        let video = VideoMetadata::episode("Show", 1, 2);
        let picked = select(&mut pack, EpisodeTarget::of(&video), &video, &Scorer::new()).unwrap();
        assert_eq!(picked, None);
    }

    #[test]
    fn test_hidden_entries_ignored() {
        let mut pack = archive(&[
            ("__MACOSX/._Show.S01E02.srt", "fork"),
            (".Show.S01E02.srt", "hidden"),
            ("Subs/Show.S01E02.srt", "real"),
        ]);
        let video = VideoMetadata::episode("Show", 1, 2);
        let picked = select(&mut pack, None, &video, &Scorer::new()).unwrap();
        assert_eq!(picked.as_deref(), Some(b"real".as_slice()));
    }

    #[test]
    fn test_movie_best_release() {
        let mut pack = archive(&[
            ("Heat.1995.720p.HDTV.x264-OTHER.srt", "tv"),
            ("Heat.1995.1080p.BluRay.x264-SPARKS.srt", "bluray"),
        ]);
        let video = VideoMetadata::movie("Heat")
            .with_year(1995)
            .with_release_group("SPARKS");
        let picked = select(&mut pack, None, &video, &Scorer::new()).unwrap();
        assert_eq!(picked.as_deref(), Some(b"bluray".as_slice()));
    }

    #[test]
    fn test_select_from_zip() {
        let bytes = crate::archive::tests::zip_bytes(&[
            ("Show.S02E01.srt", b"first"),
            ("Show.S02E02.srt", b"second"),
        ]);
        let mut zip = open_archive(bytes).unwrap();
        let video = VideoMetadata::episode("Show", 2, 2);
        let picked = select(zip.as_mut(), EpisodeTarget::of(&video), &video, &Scorer::new()).unwrap();
        assert_eq!(picked.as_deref(), Some(b"second".as_slice()));
    }
}
