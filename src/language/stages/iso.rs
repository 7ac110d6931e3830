//! Standard-code stage.

use crate::language::{LanguageRegistry, LanguageTag, ResolveStage, TokenSource};

/// Stage that maps ISO 639 codes and English names to a base tag.
///
/// Never sets a region: only the variant stages do that.
#[derive(Debug, Default)]
pub struct IsoStage {
    _private: (),
}

impl IsoStage {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl ResolveStage for IsoStage {
    fn name(&self) -> &'static str {
        "iso"
    }

    fn resolve(
        &self,
        token: &str,
        source: &TokenSource,
        registry: &LanguageRegistry,
    ) -> Option<LanguageTag> {
        let table = registry.table();
        let record = match source {
            TokenSource::Code | TokenSource::Detected { .. } => {
                let code = token.trim();
                // "en-US" and friends carry a region we do not register
                let code = code.split(['-', '_']).next().unwrap_or(code);
                table.by_code(code)
            }
            TokenSource::Name => table.by_name(token).or_else(|| {
                token
                    .split(|c: char| !c.is_alphabetic())
                    .filter(|w| w.len() > 2)
                    .find_map(|w| table.by_name(w))
            }),
            TokenSource::Filename => None,
        }?;

        Some(LanguageTag::base(record.code2, record.code3))
    }
}
