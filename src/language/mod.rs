//! Language and variant resolution.
//!
//! Provider codes, provider display names, subtitle filenames and detector
//! output all end up as a canonical [`LanguageTag`]. Resolution runs a
//! cascade of [`ResolveStage`]s in order and returns the first hit.
//!
//! # Example
//!
//! ```
//! use subsieve::language::{resolve, LanguageTag, TokenSource};
//!
//! let tag = resolve("Portuguese (Brazil)", &TokenSource::Name).unwrap();
//! assert_eq!(tag.to_string(), "pt-BR");
//!
//! let tag = resolve("Movie.2020.en.forced.srt", &TokenSource::Filename).unwrap();
//! assert_eq!(tag, LanguageTag::base("en", "eng").with_forced(true));
//! ```

mod stage;
pub mod stages;
mod table;
mod types;
pub mod variants;

pub use stage::ResolveStage;
pub use stages::{ChineseScriptStage, IsoStage, SuffixStage, VariantStage};
pub use table::{LanguageRecord, LanguageTable, StaticLanguageTable};
pub use types::{LanguageTag, TokenSource};
pub use variants::{CustomLanguageVariant, VARIANTS};

use once_cell::sync::Lazy;
use std::sync::Arc;

/// Variant records plus the standard language table.
pub struct LanguageRegistry {
    variants: &'static [CustomLanguageVariant],
    table: Box<dyn LanguageTable>,
}

impl LanguageRegistry {
    /// Registry backed by a caller-supplied language table.
    pub fn new(table: Box<dyn LanguageTable>) -> Self {
        Self {
            variants: VARIANTS,
            table,
        }
    }

    /// The process-wide registry built from the static table.
    pub fn shared() -> Arc<LanguageRegistry> {
        static SHARED: Lazy<Arc<LanguageRegistry>> =
            Lazy::new(|| Arc::new(LanguageRegistry::default()));
        Arc::clone(&SHARED)
    }

    pub fn variants(&self) -> &'static [CustomLanguageVariant] {
        self.variants
    }

    pub fn table(&self) -> &dyn LanguageTable {
        self.table.as_ref()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new(Box::new(StaticLanguageTable::new()))
    }
}

/// A resolver that runs stages in order until one recognises the token.
pub struct Resolver {
    registry: Arc<LanguageRegistry>,
    stages: Vec<Box<dyn ResolveStage>>,
}

impl Resolver {
    /// Create a resolver with the default stages.
    ///
    /// Stages: VariantStage → ChineseScriptStage → IsoStage → SuffixStage
    pub fn new(registry: Arc<LanguageRegistry>) -> Self {
        Self::with_stages(
            registry,
            vec![
                Box::new(VariantStage::new()),
                Box::new(ChineseScriptStage::new()),
                Box::new(IsoStage::new()),
                Box::new(SuffixStage::new()),
            ],
        )
    }

    /// Create a resolver with the given stages.
    pub fn with_stages(registry: Arc<LanguageRegistry>, stages: Vec<Box<dyn ResolveStage>>) -> Self {
        Self { registry, stages }
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    /// Get the number of stages.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Resolve a token to a canonical tag.
    ///
    /// `None` means the token is unresolvable, which is not an error.
    pub fn resolve(&self, token: &str, source: &TokenSource) -> Option<LanguageTag> {
        if token.trim().is_empty() {
            return None;
        }

        for stage in &self.stages {
            if let Some(tag) = stage.resolve(token, source, &self.registry) {
                log::debug!("resolved {:?} ({}) to {} via {}", token, source, tag, stage.name());
                return Some(tag);
            }
        }

        log::debug!("could not resolve {:?} ({})", token, source);
        None
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(LanguageRegistry::shared())
    }
}

/// The process-wide default resolver.
pub fn default_resolver() -> &'static Resolver {
    static RESOLVER: Lazy<Resolver> = Lazy::new(Resolver::default);
    &RESOLVER
}

/// Resolve a token with the default resolver.
pub fn resolve(token: &str, source: &TokenSource) -> Option<LanguageTag> {
    default_resolver().resolve(token, source)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detected(filename: &str) -> TokenSource {
        TokenSource::Detected {
            filename: filename.to_string(),
        }
    }

    #[test]
    fn test_every_variant_code_round_trips() {
        for variant in VARIANTS {
            let expected = variant.tag();
            for code in [variant.alpha2, variant.alpha3]
                .into_iter()
                .chain(variant.codes.iter().copied())
            {
                assert_eq!(
                    resolve(code, &TokenSource::Code),
                    Some(expected.clone()),
                    "code {code} should resolve to {}",
                    variant.name
                );
            }
        }
    }

    #[test]
    fn test_every_variant_marker_round_trips() {
        for variant in VARIANTS {
            for marker in variant.markers {
                assert_eq!(
                    resolve(marker, &TokenSource::Name),
                    Some(variant.tag()),
                    "marker {marker} should resolve to {}",
                    variant.name
                );
            }
        }
    }

    #[test]
    fn test_every_variant_suffix_round_trips() {
        for variant in VARIANTS {
            for ext in variant.extensions {
                let plain = format!("movie{ext}.srt");
                assert_eq!(
                    resolve(&plain, &TokenSource::Filename),
                    Some(variant.tag()),
                    "{plain}"
                );
            }
            for suffix in variant.forced_suffixes() {
                let name = format!("movie{suffix}.srt");
                let tag = resolve(&name, &TokenSource::Filename).unwrap();
                assert_eq!(tag, variant.tag().with_forced(true), "{name}");
            }
            for suffix in variant.hi_suffixes() {
                let name = format!("movie{suffix}.srt");
                let tag = resolve(&name, &TokenSource::Filename).unwrap();
                assert_eq!(tag, variant.tag().with_hearing_impaired(true), "{name}");
            }
        }
    }

    #[test]
    fn test_standard_codes() {
        assert_eq!(
            resolve("eng", &TokenSource::Code),
            Some(LanguageTag::base("en", "eng"))
        );
        assert_eq!(
            resolve("German", &TokenSource::Name),
            Some(LanguageTag::base("de", "deu"))
        );
        assert_eq!(resolve("xx", &TokenSource::Code), None);
        assert_eq!(resolve("", &TokenSource::Code), None);
    }

    #[test]
    fn test_detected_portuguese_agrees_with_code() {
        let by_code = resolve("pt", &TokenSource::Code);
        assert_eq!(resolve("pt", &detected("movie.srt")), by_code);
        assert_eq!(resolve("por", &detected("movie.srt")), by_code);
        assert_eq!(resolve("Movie.pt.srt", &TokenSource::Filename), by_code);
        // content alone never makes it Brazilian
        assert_eq!(resolve("pt", &detected("movie.pt-br.srt")), by_code);

        let tag = resolve("es", &detected("movie.srt")).unwrap();
        assert!(tag.region.is_none());
    }

    #[test]
    fn test_detected_chinese_uses_filename() {
        assert_eq!(
            resolve("zh", &detected("movie.chs.srt")),
            Some(LanguageTag::base("zh", "zho"))
        );
        assert_eq!(
            resolve("zh", &detected("movie.cht.srt")),
            Some(variants::CHINESE_TRADITIONAL.tag())
        );
        assert_eq!(
            resolve("zh", &detected("繁.srt")),
            Some(variants::CHINESE_TRADITIONAL.tag())
        );
        assert_eq!(
            resolve("zh", &detected("movie.srt")),
            Some(LanguageTag::base("zh", "zho"))
        );
    }

    #[test]
    fn test_custom_stages() {
        let resolver = Resolver::with_stages(
            LanguageRegistry::shared(),
            vec![Box::new(IsoStage::new())],
        );
        assert_eq!(resolver.stage_count(), 1);
        // without the variant stage "pob" is not a language
        assert_eq!(resolver.resolve("pob", &TokenSource::Code), None);
        assert_eq!(
            resolver.resolve("por", &TokenSource::Code),
            Some(LanguageTag::base("pt", "por"))
        );
    }

    #[test]
    fn test_injected_table() {
        struct OnlyKlingon;

        impl LanguageTable for OnlyKlingon {
            fn by_code(&self, code: &str) -> Option<LanguageRecord> {
                (code == "tlh").then(|| LanguageRecord {
                    code2: "tl".to_string(),
                    code3: "tlh".to_string(),
                    code3b: "tlh".to_string(),
                    name: "Klingon".to_string(),
                    enabled: true,
                })
            }

            fn by_name(&self, _name: &str) -> Option<LanguageRecord> {
                None
            }
        }

        let resolver = Resolver::new(Arc::new(LanguageRegistry::new(Box::new(OnlyKlingon))));
        assert_eq!(
            resolver.resolve("tlh", &TokenSource::Code),
            Some(LanguageTag::base("tl", "tlh"))
        );
        assert_eq!(resolver.resolve("en", &TokenSource::Code), None);
    }
}
