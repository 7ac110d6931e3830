//! Filename-suffix stage.
//!
//! Recognises `<stem>.<lang>[.forced|.hi|.sdh|.cc].<ext>` conventions. Forced
//! and hearing-impaired suffixes of every registered variant are tried
//! before any plain suffix, because `.pt-br.forced` also ends in something
//! that looks like a plain suffix once the modifier is ignored.

use crate::language::variants::{CustomLanguageVariant, FORCED_SUFFIXES, HI_SUFFIXES};
use crate::language::{LanguageRegistry, LanguageTag, ResolveStage, TokenSource};

/// Subtitle extensions stripped before suffix matching.
pub const SUBTITLE_EXTENSIONS: &[&str] = &[
    "srt", "ass", "ssa", "sub", "idx", "vtt", "smi", "sami", "txt", "mpl", "sup",
];

/// Stage that reads the language from a subtitle filename.
#[derive(Debug, Default)]
pub struct SuffixStage {
    _private: (),
}

impl SuffixStage {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl ResolveStage for SuffixStage {
    fn name(&self) -> &'static str {
        "suffix"
    }

    fn resolve(
        &self,
        token: &str,
        source: &TokenSource,
        registry: &LanguageRegistry,
    ) -> Option<LanguageTag> {
        if *source != TokenSource::Filename {
            return None;
        }

        let lowered = token.trim().to_lowercase();
        let stem = strip_subtitle_extension(&lowered);

        if let Some(tag) = variant_by_suffix(stem, registry.variants()) {
            return Some(tag);
        }

        generic_by_suffix(stem, registry)
    }
}

/// Remove a trailing subtitle extension, if any.
pub fn strip_subtitle_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext)) if SUBTITLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()) => stem,
        _ => name,
    }
}

fn variant_by_suffix(stem: &str, variants: &[CustomLanguageVariant]) -> Option<LanguageTag> {
    for variant in variants {
        if variant.forced_suffixes().iter().any(|s| stem.ends_with(s.as_str())) {
            return Some(variant.tag().with_forced(true));
        }
        if variant.hi_suffixes().iter().any(|s| stem.ends_with(s.as_str())) {
            return Some(variant.tag().with_hearing_impaired(true));
        }
    }

    variants
        .iter()
        .find(|v| v.extensions.iter().any(|s| stem.ends_with(s)))
        .map(|v| v.tag())
}

fn generic_by_suffix(stem: &str, registry: &LanguageRegistry) -> Option<LanguageTag> {
    let mut segments: Vec<&str> = stem.split('.').collect();
    // the first segment is the video stem (or empty for ".en.srt")
    if segments.len() < 2 {
        return None;
    }

    let mut forced = false;
    let mut hearing_impaired = false;
    let last = format!(".{}", segments[segments.len() - 1]);
    if segments.len() > 2 {
        if FORCED_SUFFIXES.contains(&last.as_str()) {
            forced = true;
            segments.pop();
        } else if HI_SUFFIXES.contains(&last.as_str()) {
            hearing_impaired = true;
            segments.pop();
        }
    }

    let code = segments.last()?;
    let code = code.split(['-', '_']).next().unwrap_or(code);
    if !(2..=3).contains(&code.len()) {
        return None;
    }

    let record = registry.table().by_code(code)?;
    Some(
        LanguageTag::base(record.code2, record.code3)
            .with_forced(forced)
            .with_hearing_impaired(hearing_impaired),
    )
}
