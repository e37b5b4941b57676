use crate::ethiopic::{self, FULL_STOP, PARAGRAPH_SEPARATOR, QUESTION_MARK};

fn is_sentence_boundary(c: char) -> bool {
    matches!(
        c,
        '!' | '?' | '\n' | '\r' | FULL_STOP | QUESTION_MARK | PARAGRAPH_SEPARATOR
    )
}

fn is_word_boundary(c: char) -> bool {
    c.is_whitespace() || c.is_ascii_punctuation() || ethiopic::is_ethiopic_punctuation(c)
}

/// Splits text into sentences on Ethiopic and ASCII terminal punctuation and
/// line breaks. Terminators are dropped; empty sentences are skipped.
pub fn sent_tokenize(text: &str) -> Vec<String> {
    text.split(is_sentence_boundary)
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .map(str::to_string)
        .collect()
}

/// Splits text into words on whitespace and any punctuation.
pub fn word_tokenize(text: &str) -> Vec<String> {
    text.split(is_word_boundary)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_sentences_on_ethiopic_terminators() {
        let sentences = sent_tokenize("ሰላም ነው። እንዴት ነህ፧ ደህና ነኝ!");
        assert_eq!(sentences, vec!["ሰላም ነው", "እንዴት ነህ", "ደህና ነኝ"]);
    }

    #[test]
    fn text_without_terminator_is_one_sentence() {
        assert_eq!(sent_tokenize("ሰላም ዓለም"), vec!["ሰላም ዓለም"]);
    }

    #[test]
    fn empty_text_has_no_tokens() {
        assert!(sent_tokenize("").is_empty());
        assert!(sent_tokenize(" ። ").is_empty());
        assert!(word_tokenize("").is_empty());
    }

    #[test]
    fn splits_words_on_whitespace_and_wordspace() {
        assert_eq!(word_tokenize("ሰላም፡ዓለም  ነው።"), vec!["ሰላም", "ዓለም", "ነው"]);
    }
}
