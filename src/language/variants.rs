//! Registered regional language variants.
//!
//! ISO 639 alone cannot tell Brazilian from European Portuguese, Traditional
//! from Simplified Chinese, or Latin American from European Spanish. Each of
//! those variants is described here by one [`CustomLanguageVariant`] record.
//! The list is closed: supporting a new variant means adding a record to
//! [`VARIANTS`], never touching the resolver stages.

use super::LanguageTag;

/// One non-ISO regional variant.
#[derive(Debug, PartialEq, Eq)]
pub struct CustomLanguageVariant {
    /// Internal two-letter code (`pb`).
    pub alpha2: &'static str,
    /// Internal three-letter code (`pob`).
    pub alpha3: &'static str,
    /// ISO 639-1 code this variant refines (`pt`).
    pub official_alpha2: &'static str,
    /// ISO 639-2/T code this variant refines (`por`).
    pub official_alpha3: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Region qualifier carried by the tag.
    pub region: &'static str,
    /// Script qualifier carried by the tag.
    pub script: Option<&'static str>,
    /// Plain filename suffixes (`.pt-br`), most specific first.
    pub extensions: &'static [&'static str],
    /// Substrings of provider free-text names that identify this variant.
    pub markers: &'static [&'static str],
    /// Code aliases providers use for this variant, numeric ones included.
    pub codes: &'static [&'static str],
    /// Markers that veto a free-text match (Simplified cues for Traditional Chinese).
    pub excluded_markers: &'static [&'static str],
}

/// Suffix appended to a plain suffix to mark a forced subtitle.
pub const FORCED_SUFFIXES: &[&str] = &[".forced"];

/// Suffixes appended to a plain suffix to mark a hearing-impaired subtitle.
pub const HI_SUFFIXES: &[&str] = &[".hi", ".sdh", ".cc"];

/// Filename endings that mark a Simplified Chinese subtitle.
pub const SIMPLIFIED_CHINESE_SUFFIXES: &[&str] = &[
    "chs", "sc", "zhs", "zh-hans", "hans", "zh_hans", "zhhans", "gb", "simplified",
];

/// Filename endings that mark a Traditional Chinese subtitle.
pub const TRADITIONAL_CHINESE_SUFFIXES: &[&str] = &[
    "cht", "tc", "zht", "zh-hant", "hant", "zh_hant", "zhhant", "big5", "traditional", "zh-tw",
];

/// CJK markers for Simplified Chinese, matched anywhere in a filename.
pub const SIMPLIFIED_CHINESE_FUZZY: &[&str] = &["简", "双语"];

/// CJK markers for Traditional Chinese, matched anywhere in a filename.
pub const TRADITIONAL_CHINESE_FUZZY: &[&str] = &["繁", "雙語"];

pub const BRAZILIAN_PORTUGUESE: CustomLanguageVariant = CustomLanguageVariant {
    alpha2: "pb",
    alpha3: "pob",
    official_alpha2: "pt",
    official_alpha3: "por",
    name: "Brazilian Portuguese",
    region: "BR",
    script: None,
    extensions: &[".pt-br", ".pt_br", ".pob", ".pb"],
    markers: &["pt-br", "pob", "pb", "brazil", "brasil"],
    codes: &["pb", "pob", "pt-br", "ptbr", "por-br"],
    excluded_markers: &[],
};

pub const EUROPEAN_PORTUGUESE: CustomLanguageVariant = CustomLanguageVariant {
    alpha2: "pt",
    alpha3: "por",
    official_alpha2: "pt",
    official_alpha3: "por",
    name: "Portuguese",
    region: "PT",
    script: None,
    extensions: &[".pt-pt", ".pt_pt", ".por", ".pt"],
    markers: &["pt-pt", "por", "pt", "portugal", "portuguese"],
    codes: &["pt", "por", "pt-pt", "ptpt"],
    excluded_markers: &[],
};

pub const CHINESE_TRADITIONAL: CustomLanguageVariant = CustomLanguageVariant {
    alpha2: "zt",
    alpha3: "zht",
    official_alpha2: "zh",
    official_alpha3: "zho",
    name: "Chinese Traditional",
    region: "TW",
    script: Some("Hant"),
    extensions: &[
        ".zh-tw", ".zh_tw", ".zh-hant", ".zh_hant", ".zhhant", ".hant", ".cht", ".zht", ".tc",
        ".big5", ".traditional",
    ],
    markers: &[
        "zh-tw", "zh-hant", "zh-hk", "zht", "cht", "tc", "big5", "traditional", "taiwan",
        "繁", "雙語",
    ],
    codes: &["zt", "zht", "zh-tw", "zh-hant", "zh-hk", "cht"],
    excluded_markers: &[
        "zh-cn", "zh-hans", "zhs", "chs", "gb", "simplified", "简", "双语",
    ],
};

pub const LATIN_AMERICAN_SPANISH: CustomLanguageVariant = CustomLanguageVariant {
    alpha2: "ea",
    alpha3: "spl",
    official_alpha2: "es",
    official_alpha3: "spa",
    name: "Latin American Spanish",
    region: "MX",
    script: None,
    extensions: &[
        ".es-la", ".es_la", ".es-419", ".es-mx", ".es.mx", ".es-ar", ".es.ar", ".spl", ".ea",
        ".lat",
    ],
    markers: &["es-la", "es-mx", "es-419", "lat", "latin", "mexic", "argent", "latam"],
    codes: &["ea", "spl", "es-la", "es-mx", "es-419", "es-ar", "spa-la"],
    excluded_markers: &[],
};

/// Every registered variant, in resolution order.
///
/// Brazilian Portuguese precedes European Portuguese so that free text
/// naming both (`Portuguese (Brazil)`) lands on the regional variant.
pub static VARIANTS: &[CustomLanguageVariant] = &[
    BRAZILIAN_PORTUGUESE,
    EUROPEAN_PORTUGUESE,
    CHINESE_TRADITIONAL,
    LATIN_AMERICAN_SPANISH,
];

impl CustomLanguageVariant {
    /// The canonical tag for this variant, without modifiers.
    pub fn tag(&self) -> LanguageTag {
        LanguageTag {
            alpha2: self.official_alpha2.to_string(),
            alpha3: self.official_alpha3.to_string(),
            region: Some(self.region.to_string()),
            script: self.script.map(str::to_string),
            forced: false,
            hearing_impaired: false,
        }
    }

    /// Whether this variant is what its bare ISO code means (`pt` is European
    /// Portuguese).
    pub fn is_default(&self) -> bool {
        self.alpha2 == self.official_alpha2
    }

    /// Filename suffixes for forced subtitles in this variant.
    pub fn forced_suffixes(&self) -> Vec<String> {
        combine(self.extensions, FORCED_SUFFIXES)
    }

    /// Filename suffixes for hearing-impaired subtitles in this variant.
    pub fn hi_suffixes(&self) -> Vec<String> {
        combine(self.extensions, HI_SUFFIXES)
    }

    /// Whether a provider code names this variant.
    ///
    /// `code` must already be lowercased with `_` replaced by `-`.
    pub fn matches_code(&self, code: &str) -> bool {
        self.alpha2 == code
            || self.alpha3 == code
            || self.codes.contains(&code)
            || self.markers.iter().any(|m| m.is_ascii() && *m == code)
    }

    /// Whether a free-text language name names this variant.
    pub fn matches_text(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        let words = words(&lowered);

        if self
            .excluded_markers
            .iter()
            .any(|m| marker_hit(&lowered, &words, m))
        {
            return false;
        }

        self.markers.iter().any(|m| marker_hit(&lowered, &words, m))
    }
}

fn combine(extensions: &[&str], modifiers: &[&str]) -> Vec<String> {
    extensions
        .iter()
        .flat_map(|ext| modifiers.iter().map(move |m| format!("{}{}", ext, m)))
        .collect()
}

/// Split free text into lowercase words, keeping hyphenated codes whole and
/// also offering their parts.
fn words(lowered: &str) -> Vec<&str> {
    let mut out = Vec::new();
    for word in lowered
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .filter(|w| !w.is_empty())
    {
        out.push(word);
        if word.contains('-') {
            out.extend(word.split('-').filter(|p| !p.is_empty()));
        }
    }
    out
}

// Short ASCII markers must equal a whole word ("pt" must not fire inside
// "egyptian"); longer ones may prefix one ("brazil" in "brazilian"); CJK
// markers are plain substrings.
fn marker_hit(lowered: &str, words: &[&str], marker: &str) -> bool {
    if !marker.is_ascii() {
        return lowered.contains(marker);
    }
    if marker.len() >= 4 && !marker.contains('-') {
        words.iter().any(|w| w.starts_with(marker))
    } else {
        words.iter().any(|w| *w == marker)
    }
}
