//! Core types for language resolution.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::variants::{self, CustomLanguageVariant};

/// Canonical language representation.
///
/// `region` and `script` are only ever set for one of the registered
/// [`CustomLanguageVariant`]s. Two tags are interchangeable when all their
/// fields are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LanguageTag {
    /// ISO 639-1 code (`pt`, `zh`, `en`).
    pub alpha2: String,
    /// ISO 639-2/T code (`por`, `zho`, `eng`).
    pub alpha3: String,
    /// Region qualifier of a registered variant (`BR`, `TW`, `MX`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Script qualifier of a registered variant (`Hant`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    /// Subtitle only covers foreign-language parts.
    #[serde(default)]
    pub forced: bool,
    /// Subtitle transcribes non-dialogue audio.
    #[serde(default)]
    pub hearing_impaired: bool,
}

impl LanguageTag {
    /// Create a plain tag with no region, script or modifiers.
    pub fn base(alpha2: impl Into<String>, alpha3: impl Into<String>) -> Self {
        Self {
            alpha2: alpha2.into(),
            alpha3: alpha3.into(),
            region: None,
            script: None,
            forced: false,
            hearing_impaired: false,
        }
    }

    /// Set the forced modifier.
    pub fn with_forced(mut self, forced: bool) -> Self {
        self.forced = forced;
        self
    }

    /// Set the hearing-impaired modifier.
    pub fn with_hearing_impaired(mut self, hearing_impaired: bool) -> Self {
        self.hearing_impaired = hearing_impaired;
        self
    }

    /// The registered variant this tag refers to, if it carries a region.
    pub fn variant(&self) -> Option<&'static CustomLanguageVariant> {
        let region = self.region.as_deref()?;
        variants::VARIANTS
            .iter()
            .find(|v| v.official_alpha3 == self.alpha3 && v.region == region)
    }

    /// A tag is valid when it has no region, or its region names a registered variant.
    pub fn is_valid(&self) -> bool {
        self.region.is_none() || self.variant().is_some()
    }

    /// Internal two-letter code: the variant code (`pb`, `zt`) or the ISO code.
    pub fn code2(&self) -> &str {
        match self.variant() {
            Some(v) => v.alpha2,
            None => &self.alpha2,
        }
    }

    /// Internal three-letter code: the variant code (`pob`, `zht`) or the ISO code.
    pub fn code3(&self) -> &str {
        match self.variant() {
            Some(v) => v.alpha3,
            None => &self.alpha3,
        }
    }

    /// Human-readable name: the variant name, or the English name from the
    /// shared language table, falling back to the alpha-2 code.
    pub fn display_name(&self) -> String {
        if let Some(v) = self.variant() {
            return v.name.to_string();
        }
        super::LanguageRegistry::shared()
            .table()
            .by_code(&self.alpha3)
            .map(|r| r.name)
            .unwrap_or_else(|| self.alpha2.clone())
    }

    /// Same language, ignoring the forced and hearing-impaired modifiers.
    pub fn same_language(&self, other: &LanguageTag) -> bool {
        self.alpha3 == other.alpha3 && self.region == other.region && self.script == other.script
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.alpha2)?;
        if let Some(script) = &self.script {
            write!(f, "-{}", script)?;
        }
        if let Some(region) = &self.region {
            write!(f, "-{}", region)?;
        }
        if self.forced {
            write!(f, ":forced")?;
        }
        if self.hearing_impaired {
            write!(f, ":hi")?;
        }
        Ok(())
    }
}

/// Where a language token came from.
///
/// Each kind takes a different path through the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSource {
    /// Standard or provider code (`en`, `pob`, `pt-BR`).
    Code,
    /// Free-text display name scraped from a provider page.
    Name,
    /// A subtitle filename, or the part of it after the video stem.
    Filename,
    /// Output of a content-based language detector, with the file it was read from.
    Detected { filename: String },
}

impl TokenSource {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSource::Code => "code",
            TokenSource::Name => "name",
            TokenSource::Filename => "filename",
            TokenSource::Detected { .. } => "detected",
        }
    }
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let tag = LanguageTag::base("en", "eng");
        assert_eq!(tag.to_string(), "en");

        let forced = LanguageTag::base("en", "eng").with_forced(true);
        assert_eq!(forced.to_string(), "en:forced");

        let br = variants::BRAZILIAN_PORTUGUESE.tag();
        assert_eq!(br.to_string(), "pt-BR");

        let tw = variants::CHINESE_TRADITIONAL.tag().with_hearing_impaired(true);
        assert_eq!(tw.to_string(), "zh-Hant-TW:hi");
    }

    #[test]
    fn test_validity() {
        assert!(LanguageTag::base("fr", "fra").is_valid());
        assert!(variants::LATIN_AMERICAN_SPANISH.tag().is_valid());

        let mut bogus = LanguageTag::base("fr", "fra");
        bogus.region = Some("CA".to_string());
        assert!(!bogus.is_valid());
    }

    #[test]
    fn test_internal_codes() {
        let br = variants::BRAZILIAN_PORTUGUESE.tag();
        assert_eq!(br.code2(), "pb");
        assert_eq!(br.code3(), "pob");

        let en = LanguageTag::base("en", "eng");
        assert_eq!(en.code2(), "en");
        assert_eq!(en.code3(), "eng");
    }

    #[test]
    fn test_display_name() {
        assert_eq!(LanguageTag::base("de", "deu").display_name(), "German");
        assert_eq!(
            variants::BRAZILIAN_PORTUGUESE.tag().display_name(),
            "Brazilian Portuguese"
        );
        assert_eq!(LanguageTag::base("xx", "xxx").display_name(), "xx");
    }

    #[test]
    fn test_same_language_ignores_modifiers() {
        let a = LanguageTag::base("en", "eng");
        let b = LanguageTag::base("en", "eng").with_forced(true);
        assert!(a.same_language(&b));
        assert_ne!(a, b);
        assert!(!a.same_language(&variants::EUROPEAN_PORTUGUESE.tag()));
    }
}
