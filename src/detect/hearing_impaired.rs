//! Hearing-impaired cue patterns.

use regex::Regex;
use std::sync::OnceLock;

/// Whether subtitle dialogue carries hearing-impaired cues.
///
/// Expects spoken lines only, as returned by
/// [`dialogue_text`](super::dialogue_text): ASS section headers look like
/// sound descriptions.
pub fn is_hearing_impaired(text: &str) -> bool {
    // Sound descriptions: [DOOR SLAMS], (sighs), {laughing}
    // ASS override blocks such as {\an8} start with a backslash and are skipped.
    static BRACKETED: OnceLock<Regex> = OnceLock::new();
    let bracketed = BRACKETED.get_or_init(|| {
        Regex::new(r"\[[^\]\n]{3,}\]|\([^)\n]{3,}\)|\{[^\\}\n][^}\n]{2,}\}").unwrap()
    });

    // Music and emphasis cues: ♪ la la la ♪, *phone buzzing*
    static ENCLOSED: OnceLock<Regex> = OnceLock::new();
    let enclosed = ENCLOSED.get_or_init(|| {
        Regex::new(r"[♪♫][^♪♫\n]*[♪♫]|\*[^*\n]{3,}\*").unwrap()
    });

    // Speaker labels: JOHN: or MAN 2: at the start of a line
    static SPEAKER: OnceLock<Regex> = OnceLock::new();
    let speaker = SPEAKER.get_or_init(|| {
        Regex::new(r"(?m)^\s*-?\s*[A-Z][A-Z0-9 .'\-]{1,30}:(\s|$)").unwrap()
    });

    bracketed.is_match(text)
        || enclosed.is_match(text)
        || speaker.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sound_descriptions() {
        assert!(is_hearing_impaired("[DOOR SLAMS]\nWho's there?"));
        assert!(is_hearing_impaired("(sighs) Fine."));
        assert!(is_hearing_impaired("{laughing} Stop it"));
    }

    #[test]
    fn test_ass_override_tags_are_not_cues() {
        assert!(!is_hearing_impaired("{\\an8}Somewhere in France"));
        assert!(!is_hearing_impaired("{\\i1}Hello{\\i0}"));
    }

    #[test]
    fn test_music_and_asterisks() {
        assert!(is_hearing_impaired("♪ Never gonna give you up ♪"));
        assert!(is_hearing_impaired("*phone buzzing*"));
        assert!(!is_hearing_impaired("We're #1 and they're #2."));
        assert!(!is_hearing_impaired("## trending ##"));
    }

    #[test]
    fn test_speaker_labels() {
        assert!(is_hearing_impaired("JOHN: Get down!"));
        assert!(is_hearing_impaired("- MAN 2: Over here"));
        assert!(!is_hearing_impaired("Note: this is fine"));
    }

    #[test]
    fn test_plain_dialogue() {
        let srt = "1\n00:00:01,000 --> 00:00:02,000\nI told you it's ok.\n\n\
                   2\n00:00:03,000 --> 00:00:04,000\nWe're leaving at 10:30.\n";
        assert!(!is_hearing_impaired(srt));
    }
}
