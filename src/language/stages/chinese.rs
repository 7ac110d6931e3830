//! Traditional/Simplified disambiguation for detected Chinese.
//!
//! Statistical detectors only report a generic "Chinese". The script is read
//! from the filename instead: Simplified markers are checked first and win
//! when both kinds of cue are present.

use crate::language::variants::{
    CHINESE_TRADITIONAL, SIMPLIFIED_CHINESE_FUZZY, SIMPLIFIED_CHINESE_SUFFIXES,
    TRADITIONAL_CHINESE_FUZZY, TRADITIONAL_CHINESE_SUFFIXES,
};
use crate::language::{LanguageRegistry, LanguageTag, ResolveStage, TokenSource};

/// Detector codes that mean "some Chinese".
const GENERIC_CHINESE: &[&str] = &["zh", "zho", "chi", "cmn"];

/// Script of a Chinese subtitle as told by its filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChineseScript {
    Simplified,
    Traditional,
    /// No marker either way.
    Unknown,
}

/// Read the script cue from a subtitle filename.
pub fn script_from_filename(filename: &str) -> ChineseScript {
    let lowered = filename.to_lowercase();
    let stem = strip_extension(&lowered);

    if has_marker(stem, SIMPLIFIED_CHINESE_SUFFIXES, SIMPLIFIED_CHINESE_FUZZY) {
        ChineseScript::Simplified
    } else if has_marker(stem, TRADITIONAL_CHINESE_SUFFIXES, TRADITIONAL_CHINESE_FUZZY) {
        ChineseScript::Traditional
    } else {
        ChineseScript::Unknown
    }
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) if pos > 0 => &name[..pos],
        _ => name,
    }
}

fn has_marker(stem: &str, suffixes: &[&str], fuzzy: &[&str]) -> bool {
    fuzzy.iter().any(|m| stem.contains(m))
        || suffixes.iter().any(|s| {
            stem == *s
                || stem
                    .strip_suffix(s)
                    .and_then(|rest| rest.chars().last())
                    .is_some_and(|c| matches!(c, '.' | '-' | '_' | ' ' | '[' | '('))
        })
}

/// Stage that refines a detected generic Chinese into Simplified or Traditional.
#[derive(Debug, Default)]
pub struct ChineseScriptStage {
    _private: (),
}

impl ChineseScriptStage {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl ResolveStage for ChineseScriptStage {
    fn name(&self) -> &'static str {
        "chinese_script"
    }

    fn resolve(
        &self,
        token: &str,
        source: &TokenSource,
        registry: &LanguageRegistry,
    ) -> Option<LanguageTag> {
        let TokenSource::Detected { filename } = source else {
            return None;
        };
        let code = token.trim().to_lowercase();
        if !GENERIC_CHINESE.contains(&code.as_str()) {
            return None;
        }

        match script_from_filename(filename) {
            ChineseScript::Traditional => Some(CHINESE_TRADITIONAL.tag()),
            ChineseScript::Simplified | ChineseScript::Unknown => {
                let record = registry.table().by_code("zh")?;
                Some(LanguageTag::base(record.code2, record.code3))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detected(filename: &str) -> Option<LanguageTag> {
        ChineseScriptStage::new().resolve(
            "zh",
            &TokenSource::Detected {
                filename: filename.to_string(),
            },
            &LanguageRegistry::default(),
        )
    }

    #[test]
    fn test_script_from_filename() {
        assert_eq!(script_from_filename("movie.chs.srt"), ChineseScript::Simplified);
        assert_eq!(script_from_filename("movie.cht.srt"), ChineseScript::Traditional);
        assert_eq!(script_from_filename("Movie.zh-Hant.ass"), ChineseScript::Traditional);
        assert_eq!(script_from_filename("繁.srt"), ChineseScript::Traditional);
        assert_eq!(script_from_filename("movie.srt"), ChineseScript::Unknown);
    }

    #[test]
    fn test_marker_needs_separator() {
        // "disc" ends in "sc" but is not a marker
        assert_eq!(script_from_filename("movie.disc.srt"), ChineseScript::Unknown);
    }

    #[test]
    fn test_simplified_checked_first() {
        assert_eq!(script_from_filename("movie.简繁.srt"), ChineseScript::Simplified);
    }

    #[test]
    fn test_detected_chinese() {
        assert_eq!(detected("movie.chs.srt"), Some(LanguageTag::base("zh", "zho")));
        assert_eq!(detected("movie.cht.srt"), Some(CHINESE_TRADITIONAL.tag()));
        assert_eq!(detected("movie.srt"), Some(LanguageTag::base("zh", "zho")));
    }

    #[test]
    fn test_other_languages_pass_through() {
        let stage = ChineseScriptStage::new();
        let source = TokenSource::Detected {
            filename: "movie.cht.srt".to_string(),
        };
        assert!(stage
            .resolve("en", &source, &LanguageRegistry::default())
            .is_none());
        assert!(stage
            .resolve("zh", &TokenSource::Code, &LanguageRegistry::default())
            .is_none());
    }
}
