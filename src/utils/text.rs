// Text utils

use std::collections::HashMap;

/// Sentence delimiter. Abbreviations and decimal numbers are split too.
pub const SENTENCE_DELIMITER: char = '.';

/// Separator used when joining selected sentences back together.
pub const SENTENCE_JOINER: &str = ". ";

/// Number of whitespace-delimited tokens, punctuation left attached.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Lower-cased whitespace tokens, in original order and with repetition.
pub fn lowercase_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(|w| w.to_lowercase()).collect()
}

/// Splits on every `.`, trimming each fragment and dropping fragments that are blank.
pub fn split_into_sentences(text: &str) -> Vec<&str> {
    text.split(SENTENCE_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Case-insensitive frequency table over the whitespace tokens of `text`.
pub fn word_frequencies(text: &str) -> HashMap<String, usize> {
    let mut freq: HashMap<String, usize> = HashMap::new();
    for word in text.split_whitespace() {
        *freq.entry(word.to_lowercase()).or_insert(0) += 1;
    }
    freq
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_into_sentences_naive() {
        assert_eq!(split_into_sentences("A. B. C."), vec!["A", "B", "C"]);
        // Decimals are split on purpose.
        assert_eq!(
            split_into_sentences("Pi is 3.14 roughly"),
            vec!["Pi is 3", "14 roughly"]
        );
        assert!(split_into_sentences("").is_empty());
        assert!(split_into_sentences(" . .. ").is_empty());
    }

    #[test]
    fn test_word_frequencies_case_insensitive() {
        let freq = word_frequencies("The cat and THE dog. the");
        assert_eq!(freq.get("the"), Some(&3));
        assert_eq!(freq.get("dog."), Some(&1));
        assert_eq!(freq.get("dog"), None);
    }

    #[test]
    fn test_word_helpers() {
        assert_eq!(word_count("  one two\nthree\tfour "), 4);
        assert_eq!(lowercase_words("Patient NEEDS"), vec!["patient", "needs"]);
        assert_eq!(word_count(""), 0);
    }
}
