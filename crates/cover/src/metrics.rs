//! # Text width
//!
//! Widths are measured in *display units*: a character classified as
//! Fullwidth, Wide or Ambiguous in Unicode's East Asian Width property
//! counts as `1.0`, everything else as `0.5`. This roughly matches the
//! number of full-width columns a string occupies in Japanese typesetting.

use std::borrow::Cow;

use unicode_width::UnicodeWidthChar;

/// Budget for titles, in display units (72)
pub const MAX_FULL_WIDTH: f32 = 72.0;

/// Budget for author names, in display units (36)
pub const MAX_HALF_WIDTH: f32 = MAX_FULL_WIDTH / 2.0;

/// Marker appended to truncated text. It is itself counted as `1.0`.
pub const ELLIPSIS: char = '…';

/// Characters of class W or A that are not drawn as a column of their own
///
/// `unicode-width` gives these a width below two, which hides their East
/// Asian Width class.
const ZERO_WIDTH_WIDE: &[(char, char)] = &[
    ('\u{00AD}', '\u{00AD}'),
    ('\u{0300}', '\u{036F}'),
    ('\u{302A}', '\u{302D}'),
    ('\u{3099}', '\u{309A}'),
    ('\u{FE00}', '\u{FE0F}'),
    ('\u{16FE4}', '\u{16FE4}'),
    ('\u{E0100}', '\u{E01EF}'),
];

fn is_zero_width_wide(ch: char) -> bool {
    ZERO_WIDTH_WIDE
        .iter()
        .any(|&(first, last)| (first..=last).contains(&ch))
}

/// The display width of a single character
///
/// The CJK width of `unicode-width` is two columns for the F, W and A
/// classes that are drawn at all. Combining marks of those classes
/// (e.g. the voiced sound mark U+3099) are looked up separately.
pub fn char_width(ch: char) -> f32 {
    match ch.width_cjk() {
        Some(2) => 1.0,
        _ if is_zero_width_wide(ch) => 1.0,
        _ => 0.5,
    }
}

/// The display width of a string
///
/// ```
/// # use nepub_cover::metrics::display_width;
/// assert_eq!(3.0, display_width("吾輩ab"));
/// ```
pub fn display_width(text: &str) -> f32 {
    text.chars().map(char_width).sum()
}

/// Shorten `text` to at most `max_width` display units
///
/// Text that fits is returned unchanged. Otherwise as many leading
/// characters as fit into `max_width - 1.0` are kept and [`ELLIPSIS`]
/// is appended.
pub fn truncate(text: &str, max_width: f32) -> Cow<'_, str> {
    if display_width(text) <= max_width {
        return Cow::Borrowed(text);
    }

    let limit = max_width - char_width(ELLIPSIS);
    let mut width = 0.0;
    let mut end = 0;
    for (index, ch) in text.char_indices() {
        let w = char_width(ch);
        if width + w > limit {
            break;
        }
        width += w;
        end = index + ch.len_utf8();
    }

    let mut result = String::with_capacity(end + ELLIPSIS.len_utf8());
    result.push_str(&text[..end]);
    result.push(ELLIPSIS);
    Cow::Owned(result)
}

/// Truncate to the title budget ([`MAX_FULL_WIDTH`])
pub fn truncate_full(text: &str) -> Cow<'_, str> {
    truncate(text, MAX_FULL_WIDTH)
}

/// Truncate to the author budget ([`MAX_HALF_WIDTH`])
pub fn truncate_half(text: &str) -> Cow<'_, str> {
    truncate(text, MAX_HALF_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "吾輩は猫である",
        "I Am a Cat",
        "これは非常に長い小説のタイトルで画像幅を超えてしまう場合のテストです。",
        "あいうえおかきくけこさＡあいうえおかきくけこさＢあいうえおかきくけこさＣ",
        "寿限無、寿限無、五劫のすりきれ、海砂利水魚の、水行末・（略）長久命の長助",
        "Mixed 混在 text with ｈａｌｆ and ﾊﾝｶｸ",
    ];

    #[test]
    fn test_char_width() {
        assert_eq!(1.0, char_width('あ'));
        assert_eq!(1.0, char_width('Ａ'));
        assert_eq!(1.0, char_width(ELLIPSIS));
        assert_eq!(0.5, char_width('a'));
        assert_eq!(0.5, char_width('ｱ'));
        assert_eq!(0.5, char_width('\n'));
        assert_eq!(0.5, char_width('\u{200B}'));
    }

    #[test]
    fn test_combining_marks_keep_their_class() {
        assert_eq!(1.0, char_width('\u{3099}'));
        assert_eq!(1.0, char_width('\u{309A}'));
        assert_eq!(1.0, char_width('\u{0301}'));
        assert_eq!(1.0, char_width('\u{FE0F}'));
        assert_eq!(1.0, char_width('\u{00AD}'));
        // decomposed が
        assert_eq!(2.0, display_width("か\u{3099}"));
        assert_eq!(display_width("が") * 2.0, display_width("か\u{3099}"));
    }

    #[test]
    fn test_truncate_wide() {
        let long = "あ".repeat(200);
        let truncated = truncate(&long, MAX_FULL_WIDTH);
        assert_eq!(72, truncated.chars().count());
        assert!(truncated.ends_with(ELLIPSIS));
        assert!(truncated.chars().take(71).all(|c| c == 'あ'));
        assert_eq!(72.0, display_width(&truncated));
    }

    #[test]
    fn test_truncate_narrow() {
        let long = "a".repeat(100);
        let truncated = truncate(&long, MAX_HALF_WIDTH);
        // 35 units of half-width characters
        assert_eq!(format!("{}…", "a".repeat(70)), truncated);
    }

    #[test]
    fn test_truncate_fits() {
        let text = "あ".repeat(36);
        assert!(matches!(truncate_half(&text), Cow::Borrowed(_)));
        assert_eq!(text, truncate(&text, 36.0));
    }

    #[test]
    fn test_truncate_tiny_budget() {
        assert_eq!("…", truncate("あい", 1.0));
        assert_eq!("…", truncate("abc", 0.5));
        assert_eq!("", truncate("", 0.0));
    }

    #[test]
    fn test_truncate_bound_and_idempotence() {
        for sample in SAMPLES {
            for budget in [1.0, 1.5, 2.0, 5.0, 10.5, MAX_HALF_WIDTH, MAX_FULL_WIDTH] {
                let once = truncate(sample, budget);
                assert!(display_width(&once) <= budget, "{:?} @ {}", sample, budget);
                assert_eq!(once, truncate(&once, budget));
                if display_width(sample) <= budget {
                    assert_eq!(*sample, once);
                }
            }
        }
    }
}
