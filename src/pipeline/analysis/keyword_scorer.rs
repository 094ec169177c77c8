use std::cmp::Ordering;

use crate::data_model::TextDocument;
use crate::error::Result;
use crate::executor::ProcessingStep;
use crate::utils::text::{word_count, word_frequencies};

pub const DEFAULT_MAX_KEYWORDS: usize = 10;

/// `tf * ln(1 + 1/tf)` for every distinct lower-cased word, best first.
///
/// This is a single-document frequency damping curve, not a corpus IDF. Ties
/// (equal counts give bit-identical scores) are broken by the term, ascending.
pub fn keyword_scores(text: &str) -> Vec<(String, f64)> {
    let num_words = word_count(text);
    if num_words == 0 {
        return Vec::new();
    }

    let total = num_words as f64;
    let mut scores: Vec<(String, f64)> = word_frequencies(text)
        .into_iter()
        .map(|(word, count)| {
            let tf = count as f64 / total;
            let idf = (1.0 + 1.0 / tf).ln();
            (word, tf * idf)
        })
        .collect();

    scores.sort_by(|a, b| match b.1.total_cmp(&a.1) {
        Ordering::Equal => a.0.cmp(&b.0),
        other => other,
    });
    scores
}

/// The top `max_keywords` terms by [`keyword_scores`].
pub fn score_keywords(text: &str, max_keywords: usize) -> Vec<String> {
    keyword_scores(text)
        .into_iter()
        .take(max_keywords)
        .map(|(word, _)| word)
        .collect()
}

pub struct KeywordScorer {
    max_keywords: usize,
}

impl KeywordScorer {
    pub fn new(max_keywords: usize) -> Self {
        KeywordScorer { max_keywords }
    }
}

impl Default for KeywordScorer {
    fn default() -> Self {
        KeywordScorer::new(DEFAULT_MAX_KEYWORDS)
    }
}

impl ProcessingStep for KeywordScorer {
    fn name(&self) -> &'static str {
        "KeywordScorer"
    }

    fn process(&self, document: TextDocument) -> Result<TextDocument> {
        let mut document = document;
        document.keywords = score_keywords(&document.content, self.max_keywords);
        Ok(document)
    }
}
