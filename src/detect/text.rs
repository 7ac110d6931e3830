//! Byte decoding and dialogue extraction.

use encoding_rs::{Encoding, UTF_8};
use once_cell::sync::Lazy;
use regex::Regex;

use super::ContentDetector;

static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>|\{[^}]*\}").unwrap());

static TIMING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+|\d{1,2}:\d{2}:\d{2}[,.]\d{1,3}\s*-->.*|WEBVTT.*)\s*$").unwrap()
});

/// Decode subtitle bytes to text.
///
/// A byte-order mark picks the encoding outright; otherwise strict UTF-8 is
/// tried first and the detector's guess second. `None` means the bytes could
/// not be decoded without replacement characters.
pub fn decode_text(bytes: &[u8], detector: &dyn ContentDetector) -> Option<String> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return decode_strict(encoding, &bytes[bom_len..]);
    }

    if let Some(text) = decode_strict(UTF_8, bytes) {
        return Some(text);
    }

    let encoding = detector.detect_encoding(bytes)?;
    let text = decode_strict(encoding, bytes);
    if text.is_none() {
        log::warn!("bytes are not valid {}", encoding.name());
    }
    text
}

fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

/// Keep only the spoken lines of a subtitle: cue numbers, timings and
/// styling markup are dropped.
///
/// ASS/SSA scripts keep just the text field of their `Dialogue:` events;
/// section headers, styles and script info are dropped.
pub fn dialogue_text(text: &str) -> String {
    let lines: Vec<String> = if is_ass(text) {
        text.lines()
            .filter_map(ass_dialogue)
            .flat_map(|field| {
                field
                    .replace("\\N", "\n")
                    .replace("\\n", "\n")
                    .lines()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect()
    } else {
        text.lines()
            .filter(|line| !TIMING.is_match(line))
            .map(str::to_string)
            .collect()
    };

    lines
        .iter()
        .map(|line| MARKUP.replace_all(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_ass(text: &str) -> bool {
    text.lines().any(|line| {
        let line = line.trim();
        line.eq_ignore_ascii_case("[script info]")
            || line.eq_ignore_ascii_case("[events]")
            || line.starts_with("Dialogue:")
    })
}

/// Text field of an ASS `Dialogue:` event, the tenth comma-separated field.
fn ass_dialogue(line: &str) -> Option<&str> {
    let fields = line.trim_start().strip_prefix("Dialogue:")?;
    fields.splitn(10, ',').nth(9)
}
