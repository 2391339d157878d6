//! Word and character counts.

/// Counts derived from the current document text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    /// Length in UTF-16 code units, whitespace included.
    pub chars: usize,
    /// Maximal runs of non-whitespace characters.
    pub words: usize,
}

/// Whitespace as the browser's `trim()` and `\s` see it: Unicode
/// `White_Space` without U+0085, plus the byte order mark U+FEFF.
pub fn is_separator(c: char) -> bool {
    c == '\u{feff}' || (c != '\u{85}' && c.is_whitespace())
}

/// Whether `text` has no content once whitespace is trimmed.
pub fn is_blank(text: &str) -> bool {
    text.chars().all(is_separator)
}

/// Compute stats for `text`. O(n), recomputed on every change.
pub fn compute_stats(text: &str) -> DocumentStats {
    DocumentStats {
        chars: text.encode_utf16().count(),
        words: text.split(is_separator).filter(|w| !w.is_empty()).count(),
    }
}

/// Format a count with thousands separators (`12345` -> `12,345`).
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        assert_eq!(compute_stats(""), DocumentStats { chars: 0, words: 0 });
    }

    #[test]
    fn test_whitespace_only_has_no_words() {
        for text in [" ", "\n\n", " \t \r\n ", "\u{3000}"] {
            let stats = compute_stats(text);
            assert_eq!(stats.words, 0, "{:?}", text);
            assert_eq!(stats.chars, text.encode_utf16().count());
        }
    }

    #[test]
    fn test_words_split_on_runs_of_whitespace() {
        let stats = compute_stats("  hello   world\n\tagain ");
        assert_eq!(stats.words, 3);
        assert_eq!(stats.chars, 23);
    }

    #[test]
    fn test_punctuation_stays_in_word() {
        assert_eq!(compute_stats("it's a well-known fact.").words, 4);
    }

    #[test]
    fn test_chars_count_utf16_units() {
        // 'é' is one unit, the emoji is a surrogate pair
        assert_eq!(compute_stats("é").chars, 1);
        assert_eq!(compute_stats("🦀").chars, 2);
        assert_eq!(compute_stats("🦀").words, 1);
    }

    #[test]
    fn test_word_count_zero_iff_trimmed_empty() {
        for text in ["", "a", "  a  ", "\n", "a b", "\t\t"] {
            let zero = compute_stats(text).words == 0;
            assert_eq!(zero, is_blank(text), "{:?}", text);
        }
    }

    #[test]
    fn test_byte_order_mark_separates_words() {
        assert_eq!(compute_stats("\u{feff}").words, 0);
        assert!(is_blank("\u{feff} \n"));
        assert_eq!(compute_stats("one\u{feff}two").words, 2);
    }

    #[test]
    fn test_next_line_is_part_of_a_word() {
        assert_eq!(compute_stats("\u{85}").words, 1);
        assert!(!is_blank("\u{85}"));
        assert_eq!(compute_stats("one\u{85}two").words, 1);
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(12345), "12,345");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
