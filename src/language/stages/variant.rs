//! Registered-variant stage.
//!
//! Recognises provider codes and free-text names that explicitly name one of
//! the registered regional variants.

use crate::language::{LanguageRegistry, LanguageTag, ResolveStage, TokenSource};

/// Stage that maps explicit variant codes and free-text markers to a variant tag.
///
/// Filenames go through the suffix stage. Detector output never carries a
/// regional marker, so a detected code only resolves to a variant that is
/// the unmarked default of its language (plain `pt`).
#[derive(Debug, Default)]
pub struct VariantStage {
    _private: (),
}

impl VariantStage {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl ResolveStage for VariantStage {
    fn name(&self) -> &'static str {
        "variant"
    }

    fn resolve(
        &self,
        token: &str,
        source: &TokenSource,
        registry: &LanguageRegistry,
    ) -> Option<LanguageTag> {
        match source {
            TokenSource::Code => {
                let code = normalize_code(token);
                registry
                    .variants()
                    .iter()
                    .find(|v| v.matches_code(&code))
                    .map(|v| v.tag())
            }
            TokenSource::Name => registry
                .variants()
                .iter()
                .find(|v| v.matches_text(token))
                .map(|v| v.tag()),
            TokenSource::Detected { .. } => {
                let code = normalize_code(token);
                registry
                    .variants()
                    .iter()
                    .filter(|v| v.is_default())
                    .find(|v| v.alpha2 == code || v.alpha3 == code)
                    .map(|v| v.tag())
            }
            TokenSource::Filename => None,
        }
    }
}

/// Lowercase a provider code and unify `_` separators to `-`.
fn normalize_code(token: &str) -> String {
    token.trim().to_lowercase().replace('_', "-")
}
