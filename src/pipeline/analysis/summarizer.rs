use std::collections::HashMap;

use crate::data_model::{LengthCategory, TextDocument};
use crate::error::Result;
use crate::executor::ProcessingStep;
use crate::pipeline::analysis::length_classifier::classify;
use crate::utils::text::{split_into_sentences, word_frequencies, SENTENCE_JOINER};

/// Sum of the global (case-insensitive) frequencies of every word in `sentence`.
/// Repeated words contribute once per occurrence.
fn sentence_score(sentence: &str, freq: &HashMap<String, usize>) -> usize {
    sentence
        .split_whitespace()
        .map(|word| freq.get(&word.to_lowercase()).copied().unwrap_or(0))
        .sum()
}

/// Frequency-weighted extractive summary.
///
/// Keeps the `sentence_count / k` best-scoring sentences (`k` = 3, 4 or 5 for short,
/// medium and long documents) in score order, not document order. Equal scores keep
/// their original relative order.
pub fn summarize(text: &str, length_category: LengthCategory) -> String {
    let sentences = split_into_sentences(text);
    let summary_length = sentences.len() / length_category.summary_divisor();
    if summary_length == 0 {
        return String::new();
    }

    let freq = word_frequencies(text);
    let mut scored: Vec<(&str, usize)> = sentences
        .into_iter()
        .map(|s| (s, sentence_score(s, &freq)))
        .collect();
    // sort_by is stable
    scored.sort_by(|a, b| b.1.cmp(&a.1));

    scored
        .into_iter()
        .take(summary_length)
        .map(|(sentence, _)| sentence)
        .collect::<Vec<_>>()
        .join(SENTENCE_JOINER)
}

pub struct Summarizer;

impl ProcessingStep for Summarizer {
    fn name(&self) -> &'static str {
        "Summarizer"
    }

    fn process(&self, document: TextDocument) -> Result<TextDocument> {
        let mut document = document;
        let category = match document.length_category {
            Some(category) => category,
            None => {
                let category = classify(&document.content);
                document.length_category = Some(category);
                category
            }
        };
        document.summary = Some(summarize(&document.content, category));
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORY: &str =
        "the cat sat here. the dog ran off. a bird. the cat ate the fish. x. y.";

    #[test]
    fn test_three_sentences_short_gives_one() {
        let summary = summarize("A. B. C.", LengthCategory::Short);
        assert_eq!(summary, "A");
    }

    #[test]
    fn test_summary_is_in_score_order() {
        // Scores: 7, 6, 1, 11, 0, 0 -> top two by score.
        let summary = summarize(STORY, LengthCategory::Short);
        assert_eq!(summary, "the cat ate the fish. the cat sat here");
    }

    #[test]
    fn test_divisor_depends_on_category() {
        // 6 sentences: 6/4 = 1, 6/5 = 1
        assert_eq!(
            summarize(STORY, LengthCategory::Medium),
            "the cat ate the fish"
        );
        assert_eq!(summarize(STORY, LengthCategory::Long), "the cat ate the fish");
    }

    #[test]
    fn test_ties_keep_original_order() {
        assert_eq!(summarize("b. a. c.", LengthCategory::Short), "b");
    }

    #[test]
    fn test_too_few_sentences_gives_empty_summary() {
        assert_eq!(summarize("", LengthCategory::Short), "");
        assert_eq!(summarize("One. Two.", LengthCategory::Short), "");
        assert_eq!(summarize("1. 2. 3. 4.", LengthCategory::Long), "");
    }

    #[test]
    fn test_sentence_score_counts_duplicates() {
        let freq = word_frequencies("the the cat");
        assert_eq!(sentence_score("The the", &freq), 4);
        assert_eq!(sentence_score("dog", &freq), 0);
    }

    #[test]
    fn test_step_classifies_when_category_missing() {
        let doc = TextDocument {
            id: "doc1".into(),
            content: "A. B. C.".into(),
            ..Default::default()
        };
        let processed = Summarizer.process(doc).unwrap();
        assert_eq!(processed.length_category, Some(LengthCategory::Short));
        assert_eq!(processed.summary.as_deref(), Some("A"));
    }
}
