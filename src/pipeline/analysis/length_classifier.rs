use crate::data_model::{LengthCategory, TextDocument};
use crate::error::Result;
use crate::executor::ProcessingStep;
use crate::utils::text::word_count;

/// Documents with fewer words than this are `Short`.
pub const SHORT_WORD_LIMIT: usize = 1000;
/// Documents with fewer words than this (and not short) are `Medium`.
pub const MEDIUM_WORD_LIMIT: usize = 5000;

pub fn classify_word_count(num_words: usize) -> LengthCategory {
    if num_words < SHORT_WORD_LIMIT {
        LengthCategory::Short
    } else if num_words < MEDIUM_WORD_LIMIT {
        LengthCategory::Medium
    } else {
        LengthCategory::Long
    }
}

/// Buckets a document by its whitespace-delimited word count.
pub fn classify(text: &str) -> LengthCategory {
    classify_word_count(word_count(text))
}

pub struct LengthClassifier;

impl ProcessingStep for LengthClassifier {
    fn name(&self) -> &'static str {
        "LengthClassifier"
    }

    fn process(&self, document: TextDocument) -> Result<TextDocument> {
        let mut document = document;
        document.length_category = Some(classify(&document.content));
        Ok(document)
    }
}
