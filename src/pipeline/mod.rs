// src/pipeline/mod.rs

pub mod analysis;
pub mod downloader;
pub mod extractor;
pub mod processor;
pub mod readers;
pub mod report;
pub mod runner;

pub use processor::{DocumentProcessor, ProcessingStage};
pub use report::ReportGenerator;
pub use runner::{PipelineRun, PipelineRunner};
