//! # Line wrapping
//!
//! Lines are filled greedily with whole words where the text has ASCII
//! whitespace. The ideographic space U+3000 is part of a word. Words that
//! are longer than a line (which is the normal case for Japanese text) are
//! broken at character boundaries.
//!
//! The line length is an estimate: every character is assumed to occupy
//! one glyph cell of `glyph_size` pixels. Half-width characters therefore
//! wrap earlier than they would need to.

/// Share of the available width that may be covered by text (80%)
pub const USABLE_RATIO: f32 = 0.8;

/// The number of characters that fit into a line
///
/// ```
/// # use nepub_cover::wrap::chars_per_line;
/// assert_eq!(12, chars_per_line(1240.0, 82.0));
/// assert_eq!(1, chars_per_line(10.0, 82.0));
/// ```
pub fn chars_per_line(available_width: f32, glyph_size: f32) -> usize {
    let usable = available_width * USABLE_RATIO;
    let count = (usable / glyph_size).floor() as usize;
    count.max(1)
}

/// Wrap `text` into lines of at most [`chars_per_line`] characters
///
/// The lines are joined with `'\n'`.
pub fn wrap(text: &str, available_width: f32, glyph_size: f32) -> String {
    wrap_lines(text, chars_per_line(available_width, glyph_size)).join("\n")
}

/// Wrap `text` into lines of at most `width` characters
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_len = 0;

    for word in text.split_ascii_whitespace() {
        let mut word = word;
        let mut word_len = word.chars().count();

        let needed = match line_len {
            0 => word_len,
            n => n + 1 + word_len,
        };
        if needed <= width {
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line.push_str(word);
            line_len += word_len;
            continue;
        }

        if word_len > width && line_len > 0 && line_len + 1 < width {
            // Fill the rest of the current line with the head of the word
            let (head, tail) = split_at_char(word, width - line_len - 1);
            line.push(' ');
            line.push_str(head);
            word = tail;
            word_len -= width - line_len - 1;
        }

        if line_len > 0 {
            lines.push(std::mem::take(&mut line));
        }

        while word_len > width {
            let (head, tail) = split_at_char(word, width);
            lines.push(head.to_owned());
            word = tail;
            word_len -= width;
        }
        line.push_str(word);
        line_len = word_len;
    }

    if line_len > 0 {
        lines.push(line);
    }
    lines
}

fn split_at_char(text: &str, count: usize) -> (&str, &str) {
    let index = text
        .char_indices()
        .nth(count)
        .map(|(index, _)| index)
        .unwrap_or(text.len());
    text.split_at(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_cjk() {
        let title = "これは非常に長い小説のタイトルで画像幅を超えてしまう場合のテストです。";
        let lines = wrap_lines(title, 12);
        assert_eq!(
            vec![
                "これは非常に長い小説のタ",
                "イトルで画像幅を超えてし",
                "まう場合のテストです。",
            ],
            lines
        );
    }

    #[test]
    fn test_wrap_words() {
        let lines = wrap_lines("I Am a Cat by Natsume Soseki", 10);
        assert_eq!(vec!["I Am a Cat", "by Natsume", "Soseki"], lines);
        for line in &lines {
            assert!(line.chars().count() <= 10);
        }
    }

    #[test]
    fn test_wrap_long_word_fills_line() {
        let lines = wrap_lines("ab cdefghij", 5);
        assert_eq!(vec!["ab cd", "efghi", "j"], lines);
    }

    #[test]
    fn test_wrap_exact_fit() {
        let lines = wrap_lines("abc abcdefgh", 4);
        assert_eq!(vec!["abc", "abcd", "efgh"], lines);
    }

    #[test]
    fn test_wrap_keeps_ideographic_space() {
        assert_eq!(vec!["吾輩は\u{3000}猫である"], wrap_lines("吾輩は\u{3000}猫である", 12));
        assert_eq!(
            vec!["吾輩は\u{3000}", "猫である"],
            wrap_lines("吾輩は\u{3000}猫である", 4)
        );
    }

    #[test]
    fn test_wrap_empty() {
        assert_eq!("", wrap("", 1240.0, 82.0));
        assert_eq!("", wrap("   \n ", 1240.0, 82.0));
    }

    #[test]
    fn test_wrap_joins_lines() {
        let wrapped = wrap("小説のタイトル名（Ａ６）", 1240.0, 82.0);
        assert_eq!("小説のタイトル名（Ａ６）", wrapped);
        let wrapped = wrap("小説のタイトル名（Ａ６）", 600.0, 82.0);
        assert_eq!("小説のタイ\nトル名（Ａ\n６）", wrapped);
    }

    #[test]
    fn test_degenerate_glyph_size() {
        assert_eq!(1, chars_per_line(0.0, 82.0));
        assert_eq!("あ\nい", wrap("あい", 10.0, 82.0));
    }
}
