//! External subtitle scanner.
//!
//! Finds the sidecar subtitle files next to a video and works out their
//! language: from the filename when it follows a `<stem>.<lang>.<ext>`
//! convention, otherwise from the file contents.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::detect::{
    decode_text, dialogue_text, is_hearing_impaired, ContentDetector, StatisticalDetector,
};
use crate::language::stages::SUBTITLE_EXTENSIONS;
use crate::language::{default_resolver, LanguageTag, Resolver, TokenSource};

/// Files larger than this are never treated as plain text.
pub const DEFAULT_MAX_DETECT_SIZE: u64 = 5 * 1024 * 1024;

/// Where sidecar subtitles are looked for besides the video's own folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubfolderPolicy {
    /// Only the video's folder.
    #[default]
    Current,
    /// Also the configured absolute folder.
    Absolute,
    /// Also the configured folder, relative to the video's folder.
    Relative,
}

/// Scanner settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub subfolder: SubfolderPolicy,
    /// Folder used by the `absolute` and `relative` policies.
    pub subfolder_custom: Option<PathBuf>,
    /// Size ceiling in bytes for content-based detection.
    pub max_detect_size: u64,
    /// Subtitle extensions, without the dot.
    pub extensions: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            subfolder: SubfolderPolicy::Current,
            subfolder_custom: None,
            max_detect_size: DEFAULT_MAX_DETECT_SIZE,
            extensions: SUBTITLE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// A sidecar recorded by an earlier scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedSubtitle {
    pub size: u64,
    pub language: Option<LanguageTag>,
}

/// Scan result: sidecar path to its language. `None` marks a file too large
/// for content detection whose name gave no hint either.
pub type ScanResult = BTreeMap<PathBuf, Option<LanguageTag>>;

pub struct Scanner<'a, D: ContentDetector = StatisticalDetector> {
    config: ScannerConfig,
    detector: D,
    resolver: &'a Resolver,
}

impl<D: ContentDetector> Scanner<'static, D> {
    pub fn new(config: ScannerConfig, detector: D) -> Self {
        Self {
            config,
            detector,
            resolver: default_resolver(),
        }
    }
}

impl<'a, D: ContentDetector> Scanner<'a, D> {
    pub fn with_resolver(config: ScannerConfig, detector: D, resolver: &'a Resolver) -> Self {
        Self {
            config,
            detector,
            resolver,
        }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Folders searched for sidecars of `video_path`, in order.
    pub fn search_dirs(&self, video_path: &Path) -> Vec<PathBuf> {
        let current = video_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut dirs = vec![current.clone()];
        match (&self.config.subfolder, &self.config.subfolder_custom) {
            (SubfolderPolicy::Absolute, Some(custom)) if custom.is_absolute() => {
                dirs.push(custom.clone());
            }
            (SubfolderPolicy::Relative, Some(custom)) => dirs.push(current.join(custom)),
            (SubfolderPolicy::Current, _) => {}
            (policy, custom) => {
                log::warn!("subfolder policy {:?} ignored for folder {:?}", policy, custom);
            }
        }
        dirs.dedup();
        dirs
    }

    /// Find the sidecar subtitles of `video_path` and their languages.
    ///
    /// Entries of `previously_indexed` whose size is unchanged keep their
    /// recorded language without being read again. Per-file failures only
    /// drop that file.
    pub fn scan(
        &self,
        video_path: &Path,
        previously_indexed: &BTreeMap<PathBuf, IndexedSubtitle>,
    ) -> ScanResult {
        let mut result = ScanResult::new();
        let Some(stem) = video_path.file_stem().and_then(|s| s.to_str()) else {
            log::warn!("no file stem in {}", video_path.display());
            return result;
        };

        for dir in self.search_dirs(video_path) {
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(e) => {
                    log::debug!("skipping {}: {}", dir.display(), e);
                    continue;
                }
            };

            for entry in entries.flatten() {
                let path = entry.path();
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                let Some(remainder) = sidecar_remainder(name, stem) else {
                    continue;
                };
                if !self.is_subtitle(name) {
                    continue;
                }
                let size = match entry.metadata() {
                    Ok(meta) if meta.is_file() => meta.len(),
                    Ok(_) => continue,
                    Err(e) => {
                        log::warn!("skipping {}: {}", path.display(), e);
                        continue;
                    }
                };

                if let Some(indexed) = previously_indexed.get(&path) {
                    if indexed.size == size {
                        log::debug!("{} unchanged since last scan", name);
                        result.insert(path, indexed.language.clone());
                        continue;
                    }
                }

                if let Some(language) = self.scan_file(&path, name, remainder, size) {
                    result.insert(path, language);
                }
            }
        }

        log::info!("found {} subtitle(s) for {}", result.len(), video_path.display());
        result
    }

    fn is_subtitle(&self, name: &str) -> bool {
        name.rsplit_once('.').is_some_and(|(_, ext)| {
            self.config
                .extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
    }

    /// Outer `None` drops the file, inner `None` keeps it without a language.
    fn scan_file(
        &self,
        path: &Path,
        name: &str,
        remainder: &str,
        size: u64,
    ) -> Option<Option<LanguageTag>> {
        // resolve only what follows the video stem
        let by_name = self
            .resolver
            .resolve(&format!("sidecar{remainder}"), &TokenSource::Filename);
        let fits = size <= self.config.max_detect_size;

        let (mut tag, text) = match by_name {
            Some(tag) => (tag, None),
            None if !fits => {
                log::debug!("{} too large for content detection", name);
                return Some(None);
            }
            None => {
                let text = self.read_text(path)?;
                let Some(code) = self.detector.guess_language(&text) else {
                    log::debug!("no language detected in {}", name);
                    return None;
                };
                let detected = TokenSource::Detected {
                    filename: name.to_string(),
                };
                let Some(tag) = self.resolver.resolve(&code, &detected) else {
                    log::debug!("detected language {} not recognized", code);
                    return None;
                };
                (tag, Some(text))
            }
        };

        if !tag.forced && !tag.hearing_impaired && fits {
            let text = match text {
                Some(text) => Some(text),
                None => self.read_text(path),
            };
            if text.is_some_and(|text| is_hearing_impaired(&dialogue_text(&text))) {
                log::debug!("{} has hearing-impaired cues", name);
                tag = tag.with_hearing_impaired(true);
            }
        }

        Some(Some(tag))
    }

    fn read_text(&self, path: &Path) -> Option<String> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("cannot read {}: {}", path.display(), e);
                return None;
            }
        };
        let text = decode_text(&bytes, &self.detector);
        if text.is_none() {
            log::warn!("cannot decode {}", path.display());
        }
        text
    }
}

/// What follows the video stem in a sidecar name. `Episode 10.en.srt` is not
/// a sidecar of `Episode 1.mkv`.
fn sidecar_remainder<'n>(name: &'n str, stem: &str) -> Option<&'n str> {
    name.strip_prefix(stem)
        .filter(|rest| rest.starts_with(['.', '_', '-', ' ']))
}

/// Scan with the statistical detector and no earlier index.
pub fn scan(video_path: &Path, config: &ScannerConfig) -> ScanResult {
    Scanner::new(config.clone(), StatisticalDetector::new()).scan(video_path, &BTreeMap::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::variants;
    use encoding_rs::Encoding;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[derive(Default)]
    struct CountingDetector {
        language: Option<&'static str>,
        encodings: AtomicUsize,
        guesses: AtomicUsize,
    }

    impl CountingDetector {
        fn guessing(language: &'static str) -> Self {
            Self {
                language: Some(language),
                ..Default::default()
            }
        }

        fn guesses(&self) -> usize {
            self.guesses.load(Ordering::SeqCst)
        }
    }

    impl ContentDetector for CountingDetector {
        fn detect_encoding(&self, _bytes: &[u8]) -> Option<&'static Encoding> {
            self.encodings.fetch_add(1, Ordering::SeqCst);
            None
        }

        fn guess_language(&self, _text: &str) -> Option<String> {
            self.guesses.fetch_add(1, Ordering::SeqCst);
            self.language.map(String::from)
        }
    }

    const DIALOGUE: &str = "1\n00:00:01,000 --> 00:00:02,000\nWhere are you going?\n";

    fn setup(files: &[(&str, &[u8])]) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, content).unwrap();
        }
        let video = dir.path().join("Movie.2010.mkv");
        fs::write(&video, b"video").unwrap();
        (dir, video)
    }

    fn scan_with(
        detector: &CountingDetector,
        config: ScannerConfig,
        video: &Path,
    ) -> BTreeMap<String, Option<LanguageTag>> {
        let scanner = Scanner::new(config, detector);
        scanner
            .scan(video, &BTreeMap::new())
            .into_iter()
            .map(|(path, tag)| (path.file_name().unwrap().to_string_lossy().into_owned(), tag))
            .collect()
    }

    #[test]
    fn test_filename_conventions() {
        let (_dir, video) = setup(&[
            ("Movie.2010.en.srt", DIALOGUE.as_bytes()),
            ("Movie.2010.pt-br.forced.srt", DIALOGUE.as_bytes()),
            ("Movie.2010.nfo", b"info"),
            ("Other.en.srt", DIALOGUE.as_bytes()),
            ("Movie.20101.en.srt", DIALOGUE.as_bytes()),
        ]);
        let detector = CountingDetector::default();
        let found = scan_with(&detector, ScannerConfig::default(), &video);

        assert_eq!(found.len(), 2, "{:?}", found);
        assert_eq!(found["Movie.2010.en.srt"], Some(LanguageTag::base("en", "eng")));
        assert_eq!(
            found["Movie.2010.pt-br.forced.srt"],
            Some(variants::BRAZILIAN_PORTUGUESE.tag().with_forced(true))
        );
        assert_eq!(detector.guesses(), 0);
    }

    #[test]
    fn test_content_detection() {
        let (_dir, video) = setup(&[("Movie.2010.srt", DIALOGUE.as_bytes())]);
        let detector = CountingDetector::guessing("eng");
        let found = scan_with(&detector, ScannerConfig::default(), &video);

        assert_eq!(found["Movie.2010.srt"], Some(LanguageTag::base("en", "eng")));
        assert_eq!(detector.guesses(), 1);
    }

    #[test]
    fn test_oversize_file_skips_detection() {
        let (_dir, video) = setup(&[("Movie.2010.srt", DIALOGUE.as_bytes())]);
        let detector = CountingDetector::guessing("eng");
        let config = ScannerConfig {
            max_detect_size: 8,
            ..Default::default()
        };
        let found = scan_with(&detector, config, &video);

        assert_eq!(found.get("Movie.2010.srt"), Some(&None));
        assert_eq!(detector.guesses(), 0);
    }

    #[test]
    fn test_undetected_files_are_dropped() {
        let (_dir, video) = setup(&[
            ("Movie.2010.srt", DIALOGUE.as_bytes()),
            ("Movie.2010.extra.srt", &[0xC3, 0x28, 0xA0, 0xA1]),
        ]);
        let detector = CountingDetector::default();
        let found = scan_with(&detector, ScannerConfig::default(), &video);

        assert!(found.is_empty(), "{:?}", found);
        // the undecodable file never reaches language guessing
        assert_eq!(detector.guesses(), 1);
    }

    #[test]
    fn test_hearing_impaired_upgrade() {
        let cues = "1\n00:00:01,000 --> 00:00:02,000\n[DOOR SLAMS]\nWho's there?\n";
        let (_dir, video) = setup(&[
            ("Movie.2010.en.srt", cues.as_bytes()),
            ("Movie.2010.de.forced.srt", cues.as_bytes()),
        ]);
        let detector = CountingDetector::default();
        let found = scan_with(&detector, ScannerConfig::default(), &video);

        let english = found["Movie.2010.en.srt"].as_ref().unwrap();
        assert!(english.hearing_impaired);
        let german = found["Movie.2010.de.forced.srt"].as_ref().unwrap();
        assert!(german.forced);
        assert!(!german.hearing_impaired);
    }

    #[test]
    fn test_ass_headers_are_not_cues() {
        let plain = "[Script Info]\nTitle: Movie\nScriptType: v4.00+\n\n\
                     [V4+ Styles]\nFormat: Name, Fontname\nStyle: Default,Arial\n\n\
                     [Events]\nFormat: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n\
                     Dialogue: 0,0:00:01.00,0:00:02.00,Default,,0,0,0,,Where are you going?\n";
        let cues = plain.replace("Where are you going?", "[DOOR SLAMS] Who's there?");
        let (_dir, video) = setup(&[
            ("Movie.2010.en.ass", plain.as_bytes()),
            ("Movie.2010.fr.ass", cues.as_bytes()),
        ]);
        let detector = CountingDetector::default();
        let found = scan_with(&detector, ScannerConfig::default(), &video);

        assert_eq!(found["Movie.2010.en.ass"], Some(LanguageTag::base("en", "eng")));
        assert!(found["Movie.2010.fr.ass"].as_ref().unwrap().hearing_impaired);
    }

    #[test]
    fn test_sidecar_remainder() {
        assert_eq!(sidecar_remainder("Episode 1.en.srt", "Episode 1"), Some(".en.srt"));
        assert_eq!(sidecar_remainder("Episode 1_en.srt", "Episode 1"), Some("_en.srt"));
        assert_eq!(sidecar_remainder("Episode 10.en.srt", "Episode 1"), None);
        assert_eq!(sidecar_remainder("Other.srt", "Episode 1"), None);
    }

    #[test]
    fn test_relative_subfolder() {
        let (_dir, video) = setup(&[("Subs/Movie.2010.fr.srt", DIALOGUE.as_bytes())]);
        let detector = CountingDetector::default();

        let current = scan_with(&detector, ScannerConfig::default(), &video);
        assert!(current.is_empty());

        let config = ScannerConfig {
            subfolder: SubfolderPolicy::Relative,
            subfolder_custom: Some(PathBuf::from("Subs")),
            ..Default::default()
        };
        let relative = scan_with(&detector, config, &video);
        assert_eq!(relative["Movie.2010.fr.srt"], Some(LanguageTag::base("fr", "fra")));
    }

    #[test]
    fn test_previously_indexed_reused() {
        let (dir, video) = setup(&[("Movie.2010.srt", DIALOGUE.as_bytes())]);
        let path = dir.path().join("Movie.2010.srt");
        let detector = CountingDetector::guessing("eng");
        let scanner = Scanner::new(ScannerConfig::default(), &detector);

        let mut index = BTreeMap::new();
        index.insert(
            path.clone(),
            IndexedSubtitle {
                size: DIALOGUE.len() as u64,
                language: Some(LanguageTag::base("de", "deu")),
            },
        );
        let found = scanner.scan(&video, &index);
        assert_eq!(found[&path], Some(LanguageTag::base("de", "deu")));
        assert_eq!(detector.guesses(), 0);

        index.get_mut(&path).unwrap().size += 1;
        let found = scanner.scan(&video, &index);
        assert_eq!(found[&path], Some(LanguageTag::base("en", "eng")));
        assert_eq!(detector.guesses(), 1);
    }

    #[test]
    fn test_config_defaults() {
        let config: ScannerConfig = serde_json::from_str(r#"{"subfolder": "absolute"}"#).unwrap();
        assert_eq!(config.subfolder, SubfolderPolicy::Absolute);
        assert_eq!(config.max_detect_size, DEFAULT_MAX_DETECT_SIZE);
        assert!(config.extensions.iter().any(|e| e == "srt"));
    }
}
