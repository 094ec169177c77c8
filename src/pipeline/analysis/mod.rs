// src/pipeline/analysis/mod.rs

pub mod domain_filter;
pub mod keyword_scorer;
pub mod length_classifier;
pub mod summarizer;

pub use domain_filter::{filter_domain_terms, DomainFilter};
pub use keyword_scorer::{score_keywords, KeywordScorer};
pub use length_classifier::{classify, LengthClassifier};
pub use summarizer::{summarize, Summarizer};

use crate::config::pipeline::StepConfig;
use crate::executor::ProcessingStep;
use tracing::{debug, info, info_span, instrument, warn};

/// Builds the analysis steps described by the `analysis` section of the configuration.
#[instrument(skip(config), fields(num_steps = config.len()))]
pub fn build_pipeline_from_config(config: &[StepConfig]) -> Vec<Box<dyn ProcessingStep>> {
    let mut steps: Vec<Box<dyn ProcessingStep>> = Vec::new();
    debug!("Building analysis pipeline from configuration...");

    for (i, step_config) in config.iter().enumerate() {
        let step_span = info_span!("pipeline_step", index = i, type = step_config.name());
        let _enter = step_span.enter();

        let step: Box<dyn ProcessingStep> = match step_config {
            StepConfig::LengthClassifier => Box::new(LengthClassifier),
            StepConfig::Summarizer => Box::new(Summarizer),
            StepConfig::KeywordScorer(params) => {
                debug!(params = ?params, "Adding KeywordScorer");
                Box::new(KeywordScorer::new(params.max_keywords))
            }
            StepConfig::DomainFilter(params) => {
                debug!(params = ?params, "Adding DomainFilter");
                Box::new(DomainFilter::new(params.vocabularies.clone()))
            }
        };
        steps.push(step);
        debug!("Added step: {}", step_config.name());
    }

    if steps.is_empty() {
        warn!("Building an empty analysis pipeline from configuration!");
    } else {
        info!("Analysis pipeline built with {} steps.", steps.len());
    }
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::pipeline::{default_analysis_steps, KeywordScorerParams};

    #[test]
    fn test_default_steps_in_order() {
        let steps = build_pipeline_from_config(&default_analysis_steps());
        let names: Vec<&str> = steps.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["LengthClassifier", "Summarizer", "KeywordScorer", "DomainFilter"]
        );
    }

    #[test]
    fn test_empty_config_builds_empty_pipeline() {
        assert!(build_pipeline_from_config(&[]).is_empty());
        let steps =
            build_pipeline_from_config(&[StepConfig::KeywordScorer(KeywordScorerParams {
                max_keywords: 3,
            })]);
        assert_eq!(steps.len(), 1);
    }
}
