//! Orthographic normalization for Amharic.
//!
//! Amharic keeps several letter series that are pronounced identically
//! (ሀ/ሐ/ኀ, ሰ/ሠ, አ/ዐ, ጸ/ፀ) and spells labialized syllables both as a single
//! glyph and as `<u-form> + ዋ`. These functions fold each variant onto one
//! canonical spelling so that equal words compare equal.

use crate::ethiopic::FULL_STOP;

/// `(first code point of the variant series, first code point of the canonical
/// series, number of vowel orders folded)`.
const HOMOPHONE_SERIES: &[(u32, u32, u32)] = &[
    (0x1210, 0x1200, 7), // ሐ → ሀ
    (0x1280, 0x1200, 7), // ኀ → ሀ
    (0x1220, 0x1230, 8), // ሠ → ሰ
    (0x12D0, 0x12A0, 7), // ዐ → አ
    (0x1340, 0x1338, 7), // ፀ → ጸ
];

/// `<u-order syllable> + ዋ` spelled as the single labialized glyph. Runs after
/// [`normalize_char`], so the ሀ row only needs its canonical form.
const LABIALIZED: &[(char, char)] = &[
    ('ሁ', 'ኋ'),
    ('ሉ', 'ሏ'),
    ('ሙ', 'ሟ'),
    ('ሩ', 'ሯ'),
    ('ሱ', 'ሷ'),
    ('ሹ', 'ሿ'),
    ('ቁ', 'ቋ'),
    ('ቡ', 'ቧ'),
    ('ቱ', 'ቷ'),
    ('ቹ', 'ቿ'),
    ('ኑ', 'ኗ'),
    ('ኙ', 'ኟ'),
    ('ኩ', 'ኳ'),
    ('ዙ', 'ዟ'),
    ('ዡ', 'ዧ'),
    ('ዱ', 'ዷ'),
    ('ጁ', 'ጇ'),
    ('ጉ', 'ጓ'),
    ('ጡ', 'ጧ'),
    ('ጩ', 'ጯ'),
    ('ጹ', 'ጿ'),
    ('ፉ', 'ፏ'),
    ('ፑ', 'ፗ'),
];

const LABIAL_GLIDE: char = 'ዋ';

/// Longest abbreviations first so that `ጠ/ሚኒስትር` wins over `ጠ/ሚ`.
const SHORTENED_FORMS: &[(&str, &str)] = &[
    ("ኢ.ፌ.ዴ.ሪ", "ኢትዮጵያ ፌዴራላዊ ዲሞክራሲያዊ ሪፐብሊክ"),
    ("ጠ/ሚኒስትር", "ጠቅላይ ሚኒስትር"),
    ("ክ/ከተማ", "ክፍለ ከተማ"),
    ("ክ/ሀገር", "ክፍለ ሀገር"),
    ("ት/ቤት", "ትምህርት ቤት"),
    ("ት.ቤት", "ትምህርት ቤት"),
    ("ም/ቤት", "ምክር ቤት"),
    ("መ/ቤት", "መስሪያ ቤት"),
    ("ፍ/ቤት", "ፍርድ ቤት"),
    ("ቤ/ክ", "ቤተ ክርስቲያን"),
    ("ወ/ሪት", "ወይዘሪት"),
    ("ወ/ሮ", "ወይዘሮ"),
    ("ወ/ት", "ወይዘሪት"),
    ("ዶ/ር", "ዶክተር"),
    ("ፕ/ር", "ፕሮፌሰር"),
    ("ጠ/ሚ", "ጠቅላይ ሚኒስትር"),
    ("ሆ/ል", "ሆስፒታል"),
    ("ኮ/ል", "ኮሎኔል"),
    ("ጄ/ል", "ጄኔራል"),
    ("ሻ/ቃ", "ሻለቃ"),
    ("አ.አ", "አዲስ አበባ"),
];

const PUNCTUATION_FORMS: &[(&str, &str)] = &[
    ("፡፡", "።"),
    ("::", "።"),
    ("፡-", "፦"),
    (":-", "፦"),
];

/// Folds homophone letter series onto their canonical series, keeping the
/// vowel order, and folds the fourth-order ሃ/ኣ onto ሀ/አ.
pub fn normalize_char(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    let code = c as u32;
    let folded = HOMOPHONE_SERIES
        .iter()
        .find(|(from, _, orders)| (*from..*from + *orders).contains(&code))
        .map(|(from, to, _)| code - from + to)
        .unwrap_or(code);

    match folded {
        0x1203 => 'ሀ',
        0x12A3 => 'አ',
        0x12C9 => 'ው',
        other => char::from_u32(other).unwrap_or(c),
    }
}

/// Rewrites `<u-order syllable> + ዋ` as the labialized glyph, e.g. `ቱዋ` → `ቷ`.
pub fn normalize_labialized(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let labialized = LABIALIZED
            .iter()
            .find(|(u_form, _)| *u_form == c)
            .map(|(_, wa_form)| *wa_form);

        match labialized {
            Some(wa_form) if chars.peek() == Some(&LABIAL_GLIDE) => {
                chars.next();
                out.push(wa_form);
            }
            _ => out.push(c),
        }
    }

    out
}

/// Expands conventional slash and dot abbreviations.
pub fn normalize_shortened(text: &str) -> String {
    SHORTENED_FORMS
        .iter()
        .fold(text.to_string(), |acc, (short, long)| acc.replace(short, long))
}

/// Canonicalizes sentence punctuation and collapses repeated full stops.
pub fn normalize_punct(text: &str) -> String {
    let mut out = PUNCTUATION_FORMS
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to));

    let doubled: String = [FULL_STOP, FULL_STOP].iter().collect();
    while out.contains(&doubled) {
        out = out.replace(&doubled, &FULL_STOP.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_homophone_series_by_vowel_order() {
        assert_eq!(normalize_char("ሐገር"), "ሀገር");
        assert_eq!(normalize_char("ኀይል"), "ሀይል");
        assert_eq!(normalize_char("ሠላም"), "ሰላም");
        assert_eq!(normalize_char("ዐይን"), "አይን");
        assert_eq!(normalize_char("ፀሐይ"), "ጸሀይ");
        // sixth order stays sixth order
        assert_eq!(normalize_char("ሥራ"), "ስራ");
        assert_eq!(normalize_char("ዕድል"), "እድል");
    }

    #[test]
    fn folds_fourth_order_onto_first() {
        assert_eq!(normalize_char("ሃይማኖት"), "ሀይማኖት");
        assert_eq!(normalize_char("ዓለም"), "አለም");
        assert_eq!(normalize_char("ኣዲስ"), "አዲስ");
    }

    #[test]
    fn leaves_canonical_text_untouched() {
        let text = "ሰላም ለሁሉም";
        assert_eq!(normalize_char(text), text);
        assert_eq!(normalize_char(""), "");
    }

    #[test]
    fn merges_labialized_spellings() {
        assert_eq!(normalize_labialized("ቱዋ"), "ቷ");
        assert_eq!(normalize_labialized("ሙዋች"), "ሟች");
        assert_eq!(normalize_labialized("ቁዋንቁዋ"), "ቋንቋ");
        assert_eq!(normalize_labialized("ቱ ዋ"), "ቱ ዋ");
        assert_eq!(normalize_labialized("ዋጋ"), "ዋጋ");
    }

    #[test]
    fn labialized_runs_after_char_folding() {
        let folded = normalize_char("ኁዋ");
        assert_eq!(normalize_labialized(&folded), "ኋ");
    }

    #[test]
    fn expands_abbreviations() {
        assert_eq!(normalize_shortened("ት/ቤት"), "ትምህርት ቤት");
        assert_eq!(normalize_shortened("ዶ/ር አበበ"), "ዶክተር አበበ");
        assert_eq!(normalize_shortened("ጠ/ሚኒስትር"), "ጠቅላይ ሚኒስትር");
        assert_eq!(normalize_shortened("አ.አ"), "አዲስ አበባ");
        assert_eq!(normalize_shortened("ቤት"), "ቤት");
    }

    #[test]
    fn canonicalizes_punctuation() {
        assert_eq!(normalize_punct("ሰላም፡፡"), "ሰላም።");
        assert_eq!(normalize_punct("ሰላም::"), "ሰላም።");
        assert_eq!(normalize_punct("ሰላም።።።"), "ሰላም።");
        assert_eq!(normalize_punct("እንደሚከተለው:-"), "እንደሚከተለው፦");
    }
}
