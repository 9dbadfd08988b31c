//! Canned sample texts for one-click demo input.

/// Quick-start sample inputs, addressable by 0-based index.
pub const SAMPLE_TEXTS: [&str; 4] = [
    "Hello! Welcome to our text-to-speech converter. This tool can help you convert any \
     written text into natural-sounding speech.",
    "The quick brown fox jumps over the lazy dog. This sentence contains every letter of \
     the alphabet.",
    "Technology has revolutionized the way we communicate, learn, and work in the modern \
     world.",
    "Artificial intelligence and machine learning are transforming industries across the \
     globe.",
];

/// Sample text by index, if in range.
#[must_use]
pub fn sample_text(index: usize) -> Option<&'static str> {
    SAMPLE_TEXTS.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_lookup_is_bounded() {
        assert!(sample_text(0).is_some());
        assert!(sample_text(3).is_some());
        assert!(sample_text(4).is_none());
    }

    #[test]
    fn samples_are_valid_speak_input() {
        for text in SAMPLE_TEXTS {
            assert!(!text.trim().is_empty());
        }
    }
}
