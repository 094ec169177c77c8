// src/pipeline/readers/mod.rs

pub mod base_reader;
pub mod dataset_reader;

pub use base_reader::BaseReader;
pub use dataset_reader::DatasetReader;
