//! Built-in resolution stages.
//!
//! Default order used by [`Resolver`](super::Resolver):
//!
//! - `VariantStage`: explicit variant codes and free-text names
//! - `ChineseScriptStage`: script disambiguation for detected Chinese
//! - `IsoStage`: ISO 639 codes and English names
//! - `SuffixStage`: subtitle filename conventions

mod chinese;
mod iso;
mod suffix;
mod variant;

pub use chinese::{script_from_filename, ChineseScript, ChineseScriptStage};
pub use iso::IsoStage;
pub use suffix::{strip_subtitle_extension, SuffixStage, SUBTITLE_EXTENSIONS};
pub use variant::VariantStage;
