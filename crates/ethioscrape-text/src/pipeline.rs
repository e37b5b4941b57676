use std::fmt;

use tracing::warn;

use crate::cleaning;
use crate::normalizer;
use crate::stopwords;
use crate::tokenizer::{sent_tokenize, word_tokenize};

/// Cleaned text plus its sentence and word segmentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessedText {
    pub cleaned: String,
    pub sentences: Vec<String>,
    pub words: Vec<String>,
}

impl ProcessedText {
    pub fn is_empty(&self) -> bool {
        self.cleaned.is_empty() && self.sentences.is_empty() && self.words.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Cleaning,
    Stopwords,
    Normalization,
}

impl StepKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepKind::Cleaning => "cleaning",
            StepKind::Stopwords => "stopwords",
            StepKind::Normalization => "normalization",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    RemoveWhitespaces,
    RemoveLinks,
    RemoveEmails,
    RemoveTags,
    RemoveEmojis,
    RemoveSpecialCharacters,
    RemoveDigits,
    RemoveEnglishChars,
    RemoveArabicChars,
    RemoveChineseChars,
    RemoveEthiopicDigits,
    RemoveEthiopicPunctuation,
    RemoveNonEthiopic,
    RemovePunctuation,
    RemoveStopwords,
    NormalizeChar,
    NormalizeLabialized,
    NormalizeShortened,
    NormalizePunct,
}

/// Every step runs in this order. Cleaning has to finish before stopwords are
/// matched, and both have to finish before letters are folded: normalizing
/// first would rewrite characters the removal steps are looking for.
pub const PIPELINE_STEPS: [Step; 19] = [
    Step::RemoveWhitespaces,
    Step::RemoveLinks,
    Step::RemoveEmails,
    Step::RemoveTags,
    Step::RemoveEmojis,
    Step::RemoveSpecialCharacters,
    Step::RemoveDigits,
    Step::RemoveEnglishChars,
    Step::RemoveArabicChars,
    Step::RemoveChineseChars,
    Step::RemoveEthiopicDigits,
    Step::RemoveEthiopicPunctuation,
    Step::RemoveNonEthiopic,
    Step::RemovePunctuation,
    Step::RemoveStopwords,
    Step::NormalizeChar,
    Step::NormalizeLabialized,
    Step::NormalizeShortened,
    Step::NormalizePunct,
];

/// What a step hands to the next one. Stopword removal works on tokens and
/// returns them as such; everything else is text in, text out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutput<'a> {
    Text(String),
    Tokens(Vec<&'a str>),
}

impl StepOutput<'_> {
    pub fn into_text(self) -> String {
        match self {
            StepOutput::Text(text) => text,
            StepOutput::Tokens(tokens) => tokens.join(" "),
        }
    }
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::RemoveWhitespaces => "remove_whitespaces",
            Step::RemoveLinks => "remove_links",
            Step::RemoveEmails => "remove_emails",
            Step::RemoveTags => "remove_tags",
            Step::RemoveEmojis => "remove_emojis",
            Step::RemoveSpecialCharacters => "remove_special_characters",
            Step::RemoveDigits => "remove_digits",
            Step::RemoveEnglishChars => "remove_english_chars",
            Step::RemoveArabicChars => "remove_arabic_chars",
            Step::RemoveChineseChars => "remove_chinese_chars",
            Step::RemoveEthiopicDigits => "remove_ethiopic_digits",
            Step::RemoveEthiopicPunctuation => "remove_ethiopic_punctuation",
            Step::RemoveNonEthiopic => "remove_non_ethiopic",
            Step::RemovePunctuation => "remove_punctuation",
            Step::RemoveStopwords => "remove_stopwords",
            Step::NormalizeChar => "normalize_char",
            Step::NormalizeLabialized => "normalize_labialized",
            Step::NormalizeShortened => "normalize_shortened",
            Step::NormalizePunct => "normalize_punct",
        }
    }

    pub fn kind(&self) -> StepKind {
        match self {
            Step::RemoveStopwords => StepKind::Stopwords,
            Step::NormalizeChar
            | Step::NormalizeLabialized
            | Step::NormalizeShortened
            | Step::NormalizePunct => StepKind::Normalization,
            _ => StepKind::Cleaning,
        }
    }

    pub fn apply<'a>(&self, text: &'a str) -> StepOutput<'a> {
        let text = match self {
            Step::RemoveWhitespaces => cleaning::remove_whitespaces(text),
            Step::RemoveLinks => cleaning::remove_links(text),
            Step::RemoveEmails => cleaning::remove_emails(text),
            Step::RemoveTags => cleaning::remove_tags(text),
            Step::RemoveEmojis => cleaning::remove_emojis(text),
            Step::RemoveSpecialCharacters => cleaning::remove_special_characters(text),
            Step::RemoveDigits => cleaning::remove_digits(text),
            Step::RemoveEnglishChars => cleaning::remove_english_chars(text),
            Step::RemoveArabicChars => cleaning::remove_arabic_chars(text),
            Step::RemoveChineseChars => cleaning::remove_chinese_chars(text),
            Step::RemoveEthiopicDigits => cleaning::remove_ethiopic_digits(text),
            Step::RemoveEthiopicPunctuation => cleaning::remove_ethiopic_punctuation(text),
            Step::RemoveNonEthiopic => cleaning::remove_non_ethiopic(text),
            Step::RemovePunctuation => cleaning::remove_punctuation(text),
            Step::RemoveStopwords => return StepOutput::Tokens(stopwords::remove_stopwords(text)),
            Step::NormalizeChar => normalizer::normalize_char(text),
            Step::NormalizeLabialized => normalizer::normalize_labialized(text),
            Step::NormalizeShortened => normalizer::normalize_shortened(text),
            Step::NormalizePunct => normalizer::normalize_punct(text),
        };
        StepOutput::Text(text)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs [`PIPELINE_STEPS`] over `text` and segments the result.
pub fn preprocess_text(text: &str) -> ProcessedText {
    let cleaned = PIPELINE_STEPS
        .iter()
        .fold(text.to_string(), |current, step| step.apply(&current).into_text());

    let sentences = sent_tokenize(&cleaned);
    let words = word_tokenize(&cleaned);

    ProcessedText {
        cleaned,
        sentences,
        words,
    }
}

/// Entry point for table cells, which may be missing or hold something other
/// than text. Those yield an empty result and a warning instead of an error.
pub fn preprocess_cell(cell: Option<&str>) -> ProcessedText {
    match cell {
        Some(text) => preprocess_text(text),
        None => {
            warn!("non-string input detected, substituting empty text");
            ProcessedText::default()
        }
    }
}
