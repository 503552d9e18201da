//! Display-width aware helpers for laying out text in terminal cells.
//!
//! Widths are measured in terminal columns, so wide glyphs count double and
//! combining marks count zero.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Longest prefix of `text` that fits in `max_width` columns.
pub fn truncate_to_width(text: &str, max_width: usize) -> &str {
    let mut width = 0usize;
    for (idx, ch) in text.char_indices() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + ch_width > max_width {
            return &text[..idx];
        }
        width += ch_width;
    }
    text
}

/// Split a word that is wider than `max_width` into width-sized pieces.
fn split_long_word(word: &str, max_width: usize, lines: &mut Vec<String>) -> String {
    let mut rest = word;
    while display_width(rest) > max_width {
        let mut head = truncate_to_width(rest, max_width);
        if head.is_empty() {
            // A single glyph wider than the whole line still has to go somewhere.
            let first = rest.chars().next().map_or(rest.len(), char::len_utf8);
            head = &rest[..first];
        }
        lines.push(head.to_string());
        rest = &rest[head.len()..];
    }
    rest.to_string()
}

/// Greedy word wrap: words are kept whole unless a single word is wider than a line.
pub fn wrap_to_width(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate_width = if current.is_empty() {
            display_width(word)
        } else {
            display_width(&current) + 1 + display_width(word)
        };
        if candidate_width <= max_width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        current = if display_width(word) > max_width {
            split_long_word(word, max_width, &mut lines)
        } else {
            word.to_string()
        };
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Columns to skip so `text` sits centred in `area_width`.
pub fn centered_offset(text: &str, area_width: usize) -> usize {
    area_width.saturating_sub(display_width(text)) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_to_width("Reply hazy, try again", 11);
        assert_eq!(lines, vec!["Reply hazy,", "try again"]);
    }

    #[test]
    fn short_text_stays_on_one_line() {
        assert_eq!(wrap_to_width("Yes", 20), vec!["Yes"]);
        assert!(wrap_to_width("   ", 20).is_empty());
    }

    #[test]
    fn long_words_are_split() {
        let lines = wrap_to_width("Absolutely", 4);
        assert_eq!(lines, vec!["Abso", "lute", "ly"]);
    }

    #[test]
    fn wide_glyphs_count_double() {
        assert_eq!(display_width("日本"), 4);
        assert_eq!(truncate_to_width("日本語", 5), "日本");
        assert_eq!(wrap_to_width("日本語", 4), vec!["日本", "語"]);
    }

    #[test]
    fn truncate_respects_boundaries() {
        assert_eq!(truncate_to_width("héllo", 2), "hé");
        assert_eq!(truncate_to_width("abc", 0), "");
        assert_eq!(truncate_to_width("abc", 10), "abc");
    }

    #[test]
    fn centring_never_underflows() {
        assert_eq!(centered_offset("abcd", 10), 3);
        assert_eq!(centered_offset("abcdefghijkl", 10), 0);
    }
}
