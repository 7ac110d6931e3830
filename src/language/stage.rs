//! Stage trait for the language resolution cascade.

use super::{LanguageRegistry, LanguageTag, TokenSource};

/// A single rule in the language resolution cascade.
///
/// Each stage examines the token and either:
/// - Returns `Some(tag)` if it recognises the token
/// - Returns `None` to pass to the next stage
///
/// Stages decide for themselves which [`TokenSource`]s they handle and
/// return `None` for the others.
pub trait ResolveStage: Send + Sync {
    /// The name of this stage (for logging).
    fn name(&self) -> &'static str;

    /// Try to resolve `token` against the registry.
    fn resolve(
        &self,
        token: &str,
        source: &TokenSource,
        registry: &LanguageRegistry,
    ) -> Option<LanguageTag>;
}
