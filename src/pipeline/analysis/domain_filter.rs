use std::collections::{BTreeMap, HashMap, HashSet};

use crate::data_model::TextDocument;
use crate::error::Result;
use crate::executor::ProcessingStep;
use crate::utils::text::lowercase_words;

pub const MEDICAL_DOMAIN: &str = "medical";

pub const MEDICAL_TERMS: &[&str] = &["patient", "diagnosis", "treatment", "symptoms", "medicine"];

/// Built-in domain -> vocabulary table.
pub fn default_vocabularies() -> BTreeMap<String, Vec<String>> {
    let mut vocabularies = BTreeMap::new();
    vocabularies.insert(
        MEDICAL_DOMAIN.to_string(),
        MEDICAL_TERMS.iter().map(|s| s.to_string()).collect(),
    );
    vocabularies
}

/// Restricts a document's tokens to the vocabulary registered for its domain.
/// Unknown domains match nothing.
pub struct DomainFilter {
    vocabularies: HashMap<String, HashSet<String>>,
}

impl DomainFilter {
    pub fn new(vocabularies: BTreeMap<String, Vec<String>>) -> Self {
        DomainFilter {
            vocabularies: vocabularies
                .into_iter()
                .map(|(domain, terms)| (domain, terms.into_iter().collect()))
                .collect(),
        }
    }

    /// Lower-cased tokens found in the domain's vocabulary, in order and with repetition.
    pub fn filter(&self, text: &str, domain: &str) -> Vec<String> {
        match self.vocabularies.get(domain) {
            Some(vocabulary) => lowercase_words(text)
                .into_iter()
                .filter(|word| vocabulary.contains(word))
                .collect(),
            None => Vec::new(),
        }
    }
}

impl Default for DomainFilter {
    fn default() -> Self {
        DomainFilter::new(default_vocabularies())
    }
}

/// [`DomainFilter::filter`] against the built-in table.
pub fn filter_domain_terms(text: &str, domain: &str) -> Vec<String> {
    DomainFilter::default().filter(text, domain)
}

impl ProcessingStep for DomainFilter {
    fn name(&self) -> &'static str {
        "DomainFilter"
    }

    fn process(&self, document: TextDocument) -> Result<TextDocument> {
        let mut document = document;
        document.domain_specific_keywords = self.filter(&document.content, &document.domain);
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_medical_terms_in_order() {
        assert_eq!(
            filter_domain_terms("the patient needs treatment", "medical"),
            vec!["patient", "treatment"]
        );
    }

    #[test]
    fn test_general_domain_is_empty() {
        assert!(filter_domain_terms("the patient needs treatment", "general").is_empty());
    }

    #[test]
    fn test_repetition_and_case_preserved_as_lowercase() {
        assert_eq!(
            filter_domain_terms("Patient PATIENT symptoms. symptoms", "medical"),
            vec!["patient", "patient", "symptoms"]
        );
    }

    #[test]
    fn test_custom_vocabulary() {
        let mut vocabularies = BTreeMap::new();
        vocabularies.insert("legal".to_string(), vec!["contract".to_string()]);
        let filter = DomainFilter::new(vocabularies);
        assert_eq!(filter.filter("A Contract is binding", "legal"), vec!["contract"]);
        assert!(filter.filter("the patient", "medical").is_empty());
    }

    #[test]
    fn test_step_uses_document_domain() {
        let doc = TextDocument {
            id: "doc1".into(),
            domain: "medical".into(),
            content: "diagnosis pending".into(),
            ..Default::default()
        };
        let processed = DomainFilter::default().process(doc).unwrap();
        assert_eq!(processed.domain_specific_keywords, vec!["diagnosis"]);
    }
}
