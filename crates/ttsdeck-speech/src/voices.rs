//! Parsers for the voice listings the CLI engines print.
//!
//! Both parsers are lossy on purpose: a line that does not look like a
//! voice row is skipped, and a malformed listing degrades to an empty
//! catalog rather than an error (asynchronous catalog population is
//! expected by the session; so is an engine with no voices).

use ttsdeck_core::Voice;

/// Parse `espeak-ng --voices` (and `espeak --voices`) output.
///
/// ```text
/// Pty Language Age/Gender VoiceName          File          Other Languages
///  5  af              M  afrikaans          other/af
///  5  en-gb           M  english            en            (en 2)
/// ```
#[must_use]
pub fn parse_espeak_voices(listing: &str) -> Vec<Voice> {
    listing
        .lines()
        .skip(1) // column header
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 {
                return None;
            }
            let language = fields[1];
            let name = fields[3];
            Some(Voice::new(name, language, name == "default"))
        })
        .collect()
}

/// Parse `say -v ?` output.
///
/// ```text
/// Alex                en_US    # Most people recognize me by my voice.
/// Bad News            en_US    # The light you see at the end of the tunnel...
/// ```
#[must_use]
pub fn parse_say_voices(listing: &str) -> Vec<Voice> {
    listing
        .lines()
        .filter_map(|line| {
            let entry = line.split('#').next().unwrap_or("").trim_end();
            // Language is the last whitespace-separated token; the name
            // before it may itself contain spaces.
            let (name, language) = entry.rsplit_once(char::is_whitespace)?;
            let name = name.trim();
            if name.is_empty() || language.is_empty() {
                return None;
            }
            Some(Voice::new(name, language, false))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ESPEAK_LISTING: &str = "\
Pty Language Age/Gender VoiceName          File          Other Languages
 5  af              M  afrikaans          other/af
 5  en-gb           M  english            en            (en 2)
 5  en              M  default            default
";

    const SAY_LISTING: &str = "\
Alex                en_US    # Most people recognize me by my voice.
Bad News            en_US    # The light you see at the end of the tunnel is the headlamp of a fast approaching train.
Samantha            en_US    # Hello, my name is Samantha.
";

    #[test]
    fn espeak_listing_parses_language_and_name() {
        let voices = parse_espeak_voices(ESPEAK_LISTING);
        assert_eq!(voices.len(), 3);
        assert_eq!(voices[0].name, "afrikaans");
        assert_eq!(voices[0].language, "af");
        assert_eq!(voices[1].language, "en-gb");
        assert!(voices[2].is_default);
    }

    #[test]
    fn say_listing_keeps_multi_word_names() {
        let voices = parse_say_voices(SAY_LISTING);
        assert_eq!(voices.len(), 3);
        assert_eq!(voices[1].name, "Bad News");
        assert_eq!(voices[1].language, "en_US");
    }

    #[test]
    fn garbage_degrades_to_an_empty_catalog() {
        assert!(parse_espeak_voices("").is_empty());
        assert!(parse_espeak_voices("header only\n").is_empty());
        assert!(parse_say_voices("").is_empty());
    }
}
