//! Content detection collaborators.
//!
//! The scanner falls back to the file contents when a sidecar's name says
//! nothing about its language. Everything statistical sits behind
//! [`ContentDetector`] so the scanner can be driven by a stub in tests.

mod hearing_impaired;
mod text;

pub use hearing_impaired::is_hearing_impaired;
pub use text::{decode_text, dialogue_text};

use encoding_rs::Encoding;

/// Statistical encoding and language detection.
pub trait ContentDetector: Send + Sync {
    /// Guess the character encoding of bytes that are not valid UTF-8.
    fn detect_encoding(&self, bytes: &[u8]) -> Option<&'static Encoding>;

    /// Guess the language of decoded text, as an ISO 639 code.
    fn guess_language(&self, text: &str) -> Option<String>;
}

impl<T: ContentDetector + ?Sized> ContentDetector for &T {
    fn detect_encoding(&self, bytes: &[u8]) -> Option<&'static Encoding> {
        (**self).detect_encoding(bytes)
    }

    fn guess_language(&self, text: &str) -> Option<String> {
        (**self).guess_language(text)
    }
}

/// Detector backed by `chardet` for encodings and `whatlang` for languages.
#[derive(Debug, Default)]
pub struct StatisticalDetector {
    _private: (),
}

impl StatisticalDetector {
    pub fn new() -> Self {
        Self { _private: () }
    }
}

/// Minimum `chardet` confidence before an encoding guess is trusted.
const MIN_ENCODING_CONFIDENCE: f32 = 0.2;

impl ContentDetector for StatisticalDetector {
    fn detect_encoding(&self, bytes: &[u8]) -> Option<&'static Encoding> {
        let (charset, confidence, _) = chardet::detect(&bytes.to_vec());
        if charset.is_empty() || confidence < MIN_ENCODING_CONFIDENCE {
            log::debug!("no confident encoding guess ({charset:?}, {confidence:.2})");
            return None;
        }

        let label = chardet::charset2encoding(&charset);
        let encoding = Encoding::for_label(label.as_bytes());
        log::debug!(
            "chardet guessed {charset} ({confidence:.2}) -> {:?}",
            encoding.map(|e| e.name())
        );
        encoding
    }

    fn guess_language(&self, text: &str) -> Option<String> {
        let info = whatlang::detect(&dialogue_text(text))?;
        if !info.is_reliable() {
            log::debug!(
                "unreliable language guess {} ({:.2})",
                info.lang().code(),
                info.confidence()
            );
            return None;
        }

        let code = match info.lang().code() {
            // whatlang reports Mandarin and Iranian Persian specifically
            "cmn" => "zh",
            "pes" => "fa",
            other => other,
        };
        Some(code.to_string())
    }
}
