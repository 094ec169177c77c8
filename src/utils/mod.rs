// Utils

pub mod common;
pub mod logging;
pub mod prometheus_metrics;
pub mod text;

pub use text::{lowercase_words, split_into_sentences, word_count, word_frequencies};
