//! Unicode classification for the Ethiopic script.

/// Ethiopic word separator `፡`.
pub const WORDSPACE: char = '\u{1361}';
/// Ethiopic full stop `።`.
pub const FULL_STOP: char = '\u{1362}';
/// Ethiopic question mark `፧`.
pub const QUESTION_MARK: char = '\u{1367}';
/// Ethiopic paragraph separator `፨`.
pub const PARAGRAPH_SEPARATOR: char = '\u{1368}';

/// True for any code point in one of the Ethiopic blocks.
pub fn is_ethiopic(c: char) -> bool {
    matches!(
        c as u32,
        0x1200..=0x137F     // Ethiopic
            | 0x1380..=0x139F   // Ethiopic Supplement
            | 0x2D80..=0x2DDF   // Ethiopic Extended
            | 0xAB00..=0xAB2F   // Ethiopic Extended-A
            | 0x1E7E0..=0x1E7FF // Ethiopic Extended-B
    )
}

/// `፠` through `፨`.
pub fn is_ethiopic_punctuation(c: char) -> bool {
    matches!(c as u32, 0x1360..=0x1368)
}

/// Ethiopic numerals `፩` through `፼`.
pub fn is_ethiopic_digit(c: char) -> bool {
    matches!(c as u32, 0x1369..=0x137C)
}

/// Letters of the Ethiopic syllabary, excluding punctuation and numerals.
pub fn is_ethiopic_letter(c: char) -> bool {
    is_ethiopic(c) && !is_ethiopic_punctuation(c) && !is_ethiopic_digit(c)
}

pub fn is_arabic(c: char) -> bool {
    matches!(
        c as u32,
        0x0600..=0x06FF | 0x0750..=0x077F | 0x08A0..=0x08FF | 0xFB50..=0xFDFF | 0xFE70..=0xFEFF
    )
}

/// CJK ideographs plus CJK symbols and punctuation.
pub fn is_chinese(c: char) -> bool {
    matches!(
        c as u32,
        0x3000..=0x303F
            | 0x3400..=0x4DBF
            | 0x4E00..=0x9FFF
            | 0xF900..=0xFAFF
            | 0x20000..=0x2A6DF
            | 0x2A700..=0x2EBEF
    )
}

/// Emoji, pictographs, dingbats, regional indicators and the joiners and
/// selectors that glue them together.
pub fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF
            | 0x2190..=0x21FF
            | 0x2300..=0x23FF
            | 0x25A0..=0x27BF
            | 0x2900..=0x297F
            | 0x2B00..=0x2BFF
            | 0x3297
            | 0x3299
            | 0x200D
            | 0x20E3
            | 0xFE00..=0xFE0F
            | 0xE0020..=0xE007F
    )
}
