//! Standard ISO 639 language table.
//!
//! The resolver only needs read access by code or by name. Callers that keep
//! languages in their own store implement [`LanguageTable`]; everything else
//! uses the built-in [`StaticLanguageTable`].

use std::collections::HashSet;

/// One row of the standard language table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRecord {
    /// ISO 639-1 code.
    pub code2: String,
    /// ISO 639-2/T code.
    pub code3: String,
    /// ISO 639-2/B code (differs from `code3` for a handful of languages).
    pub code3b: String,
    /// English name.
    pub name: String,
    /// Whether the language is enabled for searching.
    pub enabled: bool,
}

/// Read-only lookup into a language table.
pub trait LanguageTable: Send + Sync {
    /// Find a record by ISO 639-1, 639-2/T or 639-2/B code (case-insensitive).
    fn by_code(&self, code: &str) -> Option<LanguageRecord>;

    /// Find a record by English name (case-insensitive).
    fn by_name(&self, name: &str) -> Option<LanguageRecord>;
}

// (code2, code3, code3b, name)
const LANGUAGES: &[(&str, &str, &str, &str)] = &[
    ("af", "afr", "afr", "Afrikaans"),
    ("sq", "sqi", "alb", "Albanian"),
    ("ar", "ara", "ara", "Arabic"),
    ("hy", "hye", "arm", "Armenian"),
    ("az", "aze", "aze", "Azerbaijani"),
    ("eu", "eus", "baq", "Basque"),
    ("be", "bel", "bel", "Belarusian"),
    ("bn", "ben", "ben", "Bengali"),
    ("bs", "bos", "bos", "Bosnian"),
    ("bg", "bul", "bul", "Bulgarian"),
    ("my", "mya", "bur", "Burmese"),
    ("ca", "cat", "cat", "Catalan"),
    ("zh", "zho", "chi", "Chinese"),
    ("hr", "hrv", "hrv", "Croatian"),
    ("cs", "ces", "cze", "Czech"),
    ("da", "dan", "dan", "Danish"),
    ("nl", "nld", "dut", "Dutch"),
    ("en", "eng", "eng", "English"),
    ("eo", "epo", "epo", "Esperanto"),
    ("et", "est", "est", "Estonian"),
    ("fa", "fas", "per", "Persian"),
    ("fi", "fin", "fin", "Finnish"),
    ("fr", "fra", "fre", "French"),
    ("gl", "glg", "glg", "Galician"),
    ("ka", "kat", "geo", "Georgian"),
    ("de", "deu", "ger", "German"),
    ("el", "ell", "gre", "Greek"),
    ("he", "heb", "heb", "Hebrew"),
    ("hi", "hin", "hin", "Hindi"),
    ("hu", "hun", "hun", "Hungarian"),
    ("is", "isl", "ice", "Icelandic"),
    ("id", "ind", "ind", "Indonesian"),
    ("ga", "gle", "gle", "Irish"),
    ("it", "ita", "ita", "Italian"),
    ("ja", "jpn", "jpn", "Japanese"),
    ("kk", "kaz", "kaz", "Kazakh"),
    ("km", "khm", "khm", "Khmer"),
    ("ko", "kor", "kor", "Korean"),
    ("ku", "kur", "kur", "Kurdish"),
    ("lv", "lav", "lav", "Latvian"),
    ("lt", "lit", "lit", "Lithuanian"),
    ("mk", "mkd", "mac", "Macedonian"),
    ("ms", "msa", "may", "Malay"),
    ("ml", "mal", "mal", "Malayalam"),
    ("mn", "mon", "mon", "Mongolian"),
    ("no", "nor", "nor", "Norwegian"),
    ("nb", "nob", "nob", "Norwegian Bokmal"),
    ("pl", "pol", "pol", "Polish"),
    ("pt", "por", "por", "Portuguese"),
    ("ro", "ron", "rum", "Romanian"),
    ("ru", "rus", "rus", "Russian"),
    ("sr", "srp", "srp", "Serbian"),
    ("si", "sin", "sin", "Sinhala"),
    ("sk", "slk", "slo", "Slovak"),
    ("sl", "slv", "slv", "Slovenian"),
    ("so", "som", "som", "Somali"),
    ("es", "spa", "spa", "Spanish"),
    ("sw", "swa", "swa", "Swahili"),
    ("sv", "swe", "swe", "Swedish"),
    ("tl", "tgl", "tgl", "Tagalog"),
    ("ta", "tam", "tam", "Tamil"),
    ("te", "tel", "tel", "Telugu"),
    ("th", "tha", "tha", "Thai"),
    ("tr", "tur", "tur", "Turkish"),
    ("uk", "ukr", "ukr", "Ukrainian"),
    ("ur", "urd", "urd", "Urdu"),
    ("uz", "uzb", "uzb", "Uzbek"),
    ("vi", "vie", "vie", "Vietnamese"),
    ("cy", "cym", "wel", "Welsh"),
];

/// Built-in table of common subtitle languages, all enabled unless narrowed
/// with [`StaticLanguageTable::with_enabled`].
#[derive(Debug, Clone, Default)]
pub struct StaticLanguageTable {
    enabled: Option<HashSet<String>>,
}

impl StaticLanguageTable {
    pub fn new() -> Self {
        Self { enabled: None }
    }

    /// Only mark the given ISO 639-1 codes as enabled.
    pub fn with_enabled<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enabled = Some(codes.into_iter().map(Into::into).collect());
        self
    }

    fn record(&self, row: &(&str, &str, &str, &str)) -> LanguageRecord {
        let (code2, code3, code3b, name) = *row;
        LanguageRecord {
            code2: code2.to_string(),
            code3: code3.to_string(),
            code3b: code3b.to_string(),
            name: name.to_string(),
            enabled: self.enabled.as_ref().map_or(true, |set| set.contains(code2)),
        }
    }
}

impl LanguageTable for StaticLanguageTable {
    fn by_code(&self, code: &str) -> Option<LanguageRecord> {
        let code = code.trim().to_lowercase();
        LANGUAGES
            .iter()
            .find(|(c2, c3, c3b, _)| *c2 == code || *c3 == code || *c3b == code)
            .map(|row| self.record(row))
    }

    fn by_name(&self, name: &str) -> Option<LanguageRecord> {
        let name = name.trim();
        LANGUAGES
            .iter()
            .find(|(_, _, _, n)| n.eq_ignore_ascii_case(name))
            .map(|row| self.record(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_any_code() {
        let table = StaticLanguageTable::new();
        assert_eq!(table.by_code("fr").unwrap().code3, "fra");
        assert_eq!(table.by_code("FRA").unwrap().code2, "fr");
        assert_eq!(table.by_code("fre").unwrap().code2, "fr");
        assert!(table.by_code("xx").is_none());
    }

    #[test]
    fn test_lookup_by_name() {
        let table = StaticLanguageTable::new();
        assert_eq!(table.by_name("german").unwrap().code2, "de");
        assert!(table.by_name("Klingon").is_none());
    }

    #[test]
    fn test_enabled_flag() {
        let table = StaticLanguageTable::new().with_enabled(["en"]);
        assert!(table.by_code("en").unwrap().enabled);
        assert!(!table.by_code("de").unwrap().enabled);
    }
}
