//! Noise removal for raw channel text.
//!
//! Every step replaces what it removes with a space and then collapses
//! whitespace again, so removing a token never glues its neighbours together.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ethiopic;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:https?://|www\.|t\.me/)[^\s]+").expect("valid regex")
});
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(?:\.[A-Za-z0-9\-]+)+").expect("valid regex")
});
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<>]*>").expect("valid regex"));

/// Collapses every run of whitespace into one space and trims both ends.
pub fn remove_whitespaces(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

pub fn remove_links(text: &str) -> String {
    replace_pattern(&LINK, text)
}

pub fn remove_emails(text: &str) -> String {
    replace_pattern(&EMAIL, text)
}

/// Strips HTML/XML tags, keeping the text between them.
pub fn remove_tags(text: &str) -> String {
    replace_pattern(&TAG, text)
}

pub fn remove_emojis(text: &str) -> String {
    replace_chars(text, ethiopic::is_emoji)
}

/// ASCII punctuation and symbols plus the common typographic ones
/// (quotes, dashes, bullets, currency signs).
pub fn remove_special_characters(text: &str) -> String {
    replace_chars(text, is_special_character)
}

pub fn remove_digits(text: &str) -> String {
    replace_chars(text, |c| c.is_ascii_digit())
}

pub fn remove_english_chars(text: &str) -> String {
    replace_chars(text, |c| c.is_ascii_alphabetic())
}

pub fn remove_arabic_chars(text: &str) -> String {
    replace_chars(text, ethiopic::is_arabic)
}

pub fn remove_chinese_chars(text: &str) -> String {
    replace_chars(text, ethiopic::is_chinese)
}

pub fn remove_ethiopic_digits(text: &str) -> String {
    replace_chars(text, ethiopic::is_ethiopic_digit)
}

pub fn remove_ethiopic_punctuation(text: &str) -> String {
    replace_chars(text, ethiopic::is_ethiopic_punctuation)
}

/// Keeps Ethiopic code points and whitespace only.
pub fn remove_non_ethiopic(text: &str) -> String {
    replace_chars(text, |c| !ethiopic::is_ethiopic(c) && !c.is_whitespace())
}

/// Amharic punctuation, including the `፡` word separator, and anything left
/// of the ASCII set.
pub fn remove_punctuation(text: &str) -> String {
    replace_chars(text, |c| {
        ethiopic::is_ethiopic_punctuation(c)
            || c.is_ascii_punctuation()
            || matches!(c, '«' | '»' | '‹' | '›' | '“' | '”' | '‘' | '’' | '…')
    })
}

fn is_special_character(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c as u32,
            0x00A1..=0x00BF // Latin-1 punctuation and symbols
                | 0x00D7
                | 0x00F7
                | 0x2010..=0x205E // General Punctuation
                | 0x20A0..=0x20CF // Currency Symbols
                | 0x2100..=0x214F // Letterlike Symbols
        )
}

fn replace_pattern(pattern: &Regex, text: &str) -> String {
    remove_whitespaces(&pattern.replace_all(text, " "))
}

fn replace_chars(text: &str, remove: impl Fn(char) -> bool) -> String {
    let replaced: String = text
        .chars()
        .map(|c| if remove(c) { ' ' } else { c })
        .collect();
    remove_whitespaces(&replaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace() {
        assert_eq!(remove_whitespaces("  ሰላም \n\t ዓለም  "), "ሰላም ዓለም");
        assert_eq!(remove_whitespaces(""), "");
    }

    #[test]
    fn removes_links_of_every_shape() {
        assert_eq!(remove_links("ሰላም https://x.co/a?b=1 ነው"), "ሰላም ነው");
        assert_eq!(remove_links("ይጎብኙ www.example.com"), "ይጎብኙ");
        assert_eq!(remove_links("join t.me/somechannel now"), "join now");
    }

    #[test]
    fn removes_emails_and_tags() {
        assert_eq!(remove_emails("ይጻፉ info@shop.et ላይ"), "ይጻፉ ላይ");
        assert_eq!(remove_tags("<b>ዋጋ</b> ቅናሽ"), "ዋጋ ቅናሽ");
    }

    #[test]
    fn removes_emojis_and_special_characters() {
        assert_eq!(remove_emojis("ቅናሽ🔥🔥 አለ✅"), "ቅናሽ አለ");
        assert_eq!(remove_special_characters("ዋጋ: 500 (ብር) — «አዲስ»"), "ዋጋ 500 ብር አዲስ");
    }

    #[test]
    fn removes_foreign_scripts_and_digits() {
        assert_eq!(remove_digits("ዋጋ 1200 ብር"), "ዋጋ ብር");
        assert_eq!(remove_english_chars("Price ዋጋ"), "ዋጋ");
        assert_eq!(remove_arabic_chars("ሰላም سلام"), "ሰላም");
        assert_eq!(remove_chinese_chars("ሰላም 你好"), "ሰላም");
    }

    #[test]
    fn removes_ethiopic_digits_and_punctuation() {
        assert_eq!(remove_ethiopic_digits("፩ ቤት"), "ቤት");
        assert_eq!(remove_ethiopic_punctuation("ሰላም። እንዴት ነህ፧"), "ሰላም እንዴት ነህ");
        assert_eq!(remove_ethiopic_punctuation("ሰላም፡ዓለም"), "ሰላም ዓለም");
    }

    #[test]
    fn keeps_only_ethiopic() {
        assert_eq!(remove_non_ethiopic("ሰላም é ñ Ω ዓለም"), "ሰላም ዓለም");
    }

    #[test]
    fn removes_amharic_punctuation() {
        assert_eq!(remove_punctuation("አዎ፣ ነው። \"እሺ\""), "አዎ ነው እሺ");
    }

    #[test]
    fn steps_are_idempotent() {
        let once = remove_special_characters("ዋጋ: 500!");
        assert_eq!(remove_special_characters(&once), once);
    }
}
