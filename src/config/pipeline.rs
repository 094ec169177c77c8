use crate::error::{PipelineError, Result};
use crate::pipeline::analysis::domain_filter::default_vocabularies;
use crate::pipeline::analysis::keyword_scorer::DEFAULT_MAX_KEYWORDS;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_SIZE_BYTES: u64 = 200 * 1024 * 1024; // 200MB
const DEFAULT_USER_AGENT: &str = "PdfDigest/0.1";
const MAX_DOWNLOAD_ATTEMPTS: usize = 10;

/// Represents the overall pipeline configuration read from YAML.
/// Every field is optional in the file.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PipelineConfig {
    /// Worker pool size. `None` uses the host's available parallelism.
    pub workers: Option<usize>,
    /// Directory for the transient `temp_<name>.pdf` downloads.
    pub temp_dir: PathBuf,
    pub cleanup: CleanupPolicy,
    pub download: DownloadConfig,
    pub analysis: Vec<StepConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            workers: None,
            temp_dir: PathBuf::from("."),
            cleanup: CleanupPolicy::default(),
            download: DownloadConfig::default(),
            analysis: default_analysis_steps(),
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.workers == Some(0) {
            return Err(PipelineError::ConfigValidationError(
                "workers must be greater than 0".to_string(),
            ));
        }
        self.download.validate()?;
        for step_config in &self.analysis {
            step_config.validate()?;
        }
        Ok(())
    }

    /// Pool size actually used by the runner.
    pub fn effective_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

/// What happens to the downloaded temp file once a document is done.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum CleanupPolicy {
    /// Remove only after a fully successful run; failures leave the file behind.
    #[default]
    OnSuccess,
    Always,
    Never,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DownloadConfig {
    pub timeout_secs: u64,
    /// Total attempts per URL, first try included.
    pub max_attempts: usize,
    pub max_size_bytes: u64,
    pub user_agent: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        DownloadConfig {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_attempts: 1,
            max_size_bytes: DEFAULT_MAX_SIZE_BYTES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl DownloadConfig {
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(PipelineError::ConfigValidationError(
                "DownloadConfig: timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.max_attempts == 0 || self.max_attempts > MAX_DOWNLOAD_ATTEMPTS {
            return Err(PipelineError::ConfigValidationError(format!(
                "DownloadConfig: max_attempts must be between 1 and {}",
                MAX_DOWNLOAD_ATTEMPTS
            )));
        }
        if self.max_size_bytes == 0 {
            return Err(PipelineError::ConfigValidationError(
                "DownloadConfig: max_size_bytes must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Represents a single analysis step.
/// Uses Serde's internally tagged enum representation.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")] // The 'type' field in YAML determines which variant
pub enum StepConfig {
    LengthClassifier,
    Summarizer,
    KeywordScorer(KeywordScorerParams),
    DomainFilter(DomainFilterParams),
}

impl StepConfig {
    /// Returns a string slice representing the name of the step type.
    pub fn name(&self) -> &'static str {
        match self {
            StepConfig::LengthClassifier => "LengthClassifier",
            StepConfig::Summarizer => "Summarizer",
            StepConfig::KeywordScorer(_) => "KeywordScorer",
            StepConfig::DomainFilter(_) => "DomainFilter",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            StepConfig::LengthClassifier | StepConfig::Summarizer => Ok(()),
            StepConfig::KeywordScorer(params) => params.validate(),
            StepConfig::DomainFilter(params) => params.validate(),
        }
    }
}

pub fn default_analysis_steps() -> Vec<StepConfig> {
    vec![
        StepConfig::LengthClassifier,
        StepConfig::Summarizer,
        StepConfig::KeywordScorer(KeywordScorerParams::default()),
        StepConfig::DomainFilter(DomainFilterParams::default()),
    ]
}

/// Parameters for the KeywordScorer.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct KeywordScorerParams {
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,
}

fn default_max_keywords() -> usize {
    DEFAULT_MAX_KEYWORDS
}

impl Default for KeywordScorerParams {
    fn default() -> Self {
        KeywordScorerParams {
            max_keywords: DEFAULT_MAX_KEYWORDS,
        }
    }
}

impl KeywordScorerParams {
    pub fn validate(&self) -> Result<()> {
        if self.max_keywords == 0 {
            return Err(PipelineError::ConfigValidationError(
                "KeywordScorerParams: max_keywords must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Parameters for the DomainFilter: domain tag -> vocabulary.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct DomainFilterParams {
    #[serde(default = "default_vocabularies")]
    pub vocabularies: BTreeMap<String, Vec<String>>,
}

impl Default for DomainFilterParams {
    fn default() -> Self {
        DomainFilterParams {
            vocabularies: default_vocabularies(),
        }
    }
}

impl DomainFilterParams {
    pub fn validate(&self) -> Result<()> {
        for (domain, terms) in &self.vocabularies {
            if domain.trim().is_empty() {
                return Err(PipelineError::ConfigValidationError(
                    "DomainFilterParams: domain names must not be empty".to_string(),
                ));
            }
            // Tokens are lower-cased and whitespace-split before lookup, so anything
            // else could never match.
            if let Some(term) = terms
                .iter()
                .find(|t| t.is_empty() || t.chars().any(char::is_whitespace) || t.to_lowercase() != **t)
            {
                return Err(PipelineError::ConfigValidationError(format!(
                    "DomainFilterParams: term '{}' in domain '{}' must be a single lower-case word",
                    term, domain
                )));
            }
        }
        Ok(())
    }
}

/// Loads, parses and validates the pipeline configuration YAML file.
pub fn load_pipeline_config<P: AsRef<Path>>(config_path: P) -> Result<PipelineConfig> {
    let path_ref = config_path.as_ref();
    let config_content = fs::read_to_string(path_ref).map_err(|e| {
        PipelineError::ConfigError(format!(
            "Failed to read pipeline config file '{}': {}",
            path_ref.display(),
            e
        ))
    })?;

    let config: PipelineConfig = serde_yaml::from_str(&config_content).map_err(|e| {
        PipelineError::ConfigError(format!(
            "Failed to parse pipeline config YAML from '{}': {}",
            path_ref.display(),
            e
        ))
    })?;

    config.validate()?;

    Ok(config)
}
