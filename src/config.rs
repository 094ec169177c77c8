// src/config.rs

pub mod cli;
pub mod pipeline;

pub use cli::{load_effective_config, Args};
pub use pipeline::{
    load_pipeline_config, CleanupPolicy, DomainFilterParams, DownloadConfig,
    KeywordScorerParams, PipelineConfig, StepConfig,
};
