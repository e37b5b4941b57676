use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Common Amharic function words, pronouns and auxiliaries, in the surface
/// forms they take before character normalization.
pub const AMHARIC_STOPWORDS: &[&str] = &[
    "እና", "ና", "ነው", "ናቸው", "ነበር", "ነበሩ", "ነች", "ነኝ", "ነህ", "ነሽ", "ነን", "ናችሁ",
    "ውስጥ", "ላይ", "ታች", "ግን", "ወይም", "ስለ", "እንደ", "ያለ", "ይህ", "ይሄ", "ያ", "ይህን",
    "ይህም", "እዚህ", "እዚያ", "እዛ", "እሱ", "እሷ", "እሳቸው", "እነሱ", "እኔ", "አንተ", "አንቺ",
    "እኛ", "እናንተ", "እርሱ", "እርሷ", "ሁሉ", "ሁሉም", "በጣም", "ብቻ", "ደግሞ", "ወደ", "እስከ",
    "ጋር", "አለ", "አሉ", "አለው", "አላቸው", "ምን", "ማን", "የት", "መቼ", "እንዴት", "ለምን",
    "እንጂ", "ስለዚህ", "ከዚያ", "ከዚህ", "በኋላ", "በፊት", "ሲሆን", "ወዘተ", "እንዲሁም", "ሆኖም",
    "ቢሆንም", "ነገር", "ነገሮች", "እያለ", "ሌላ", "ሌሎች", "ራሱ", "ራሷ", "ልክ", "አሁን", "ገና",
];

static STOPWORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| AMHARIC_STOPWORDS.iter().copied().collect());

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(word)
}

/// Drops stopwords from whitespace-separated text, yielding the surviving
/// tokens in their original order.
pub fn remove_stopwords(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .filter(|word| !is_stopword(word))
        .collect()
}
