//! Fallacy catalog and keyword detection
//!
//! The catalog is a static table loaded once. Detection is deliberately
//! naive: the lowercased text is checked for every keyword of every entry
//! as a plain substring. No stemming, no negation handling, no word
//! boundaries, and duplicate findings for the same fallacy are kept.

use std::path::Path;

use agora_core::{preview, FallacyFinding};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Catalog shipped with the crate
const BUILTIN_CATALOG: &str = include_str!("../data/fallacies.json");

/// Longest user text kept in a finding
const FRAGMENT_LEN: usize = 100;

/// Errors loading a catalog or source policy resource
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed resource: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// One fallacy definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fallacy {
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(default)]
    pub keywords_detection: Vec<String>,
}

/// A raw keyword hit: which fallacy, and which keyword triggered it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordHit {
    pub code: String,
    pub keyword: String,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    taxonomy_name: String,
    #[serde(default)]
    version: String,
    #[serde(alias = "falacias_list")]
    fallacies_list: Vec<Fallacy>,
}

/// Read-only table of fallacies with detection keywords
#[derive(Debug, Clone, Default)]
pub struct FallacyCatalog {
    taxonomy_name: String,
    version: String,
    fallacies: Vec<Fallacy>,
}

impl FallacyCatalog {
    /// Build a catalog from entries
    pub fn new(fallacies: Vec<Fallacy>) -> Self {
        Self {
            taxonomy_name: String::new(),
            version: String::new(),
            fallacies,
        }
    }

    /// Empty catalog; detects nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a catalog from its JSON form
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Self {
            taxonomy_name: file.taxonomy_name,
            version: file.version,
            fallacies: file.fallacies_list,
        })
    }

    /// Read and parse a catalog file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Load a catalog file, degrading to an empty catalog on any failure
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        match Self::from_path(path.as_ref()) {
            Ok(catalog) => {
                debug!(
                    path = %path.as_ref().display(),
                    entries = catalog.len(),
                    "Loaded fallacy catalog"
                );
                catalog
            }
            Err(e) => {
                warn!(error = %e, "Fallacy catalog unavailable, detection disabled");
                Self::empty()
            }
        }
    }

    /// The catalog embedded in the crate
    pub fn builtin() -> Self {
        Self::from_json_str(BUILTIN_CATALOG).unwrap_or_else(|e| {
            warn!(error = %e, "Built-in fallacy catalog is malformed");
            Self::empty()
        })
    }

    pub fn taxonomy_name(&self) -> &str {
        &self.taxonomy_name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.fallacies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fallacies.is_empty()
    }

    /// All entries in catalog order
    pub fn entries(&self) -> &[Fallacy] {
        &self.fallacies
    }

    /// Look up an entry by code
    pub fn get(&self, code: &str) -> Option<&Fallacy> {
        self.fallacies.iter().find(|f| f.code == code)
    }

    /// Every (code, keyword) pair whose keyword occurs in `text`
    pub fn detect(&self, text: &str) -> Vec<KeywordHit> {
        let lowered = text.to_lowercase();
        let mut hits = Vec::new();
        for fallacy in &self.fallacies {
            for keyword in &fallacy.keywords_detection {
                if lowered.contains(&keyword.to_lowercase()) {
                    hits.push(KeywordHit {
                        code: fallacy.code.clone(),
                        keyword: keyword.clone(),
                    });
                }
            }
        }
        hits
    }

    /// Scan the human's turns in order and build findings
    ///
    /// Messages are numbered from 1 in the explanation.
    pub fn findings(&self, user_texts: &[&str]) -> Vec<FallacyFinding> {
        let mut findings = Vec::new();
        for (index, text) in user_texts.iter().enumerate() {
            for hit in self.detect(text) {
                let Some(fallacy) = self.get(&hit.code) else {
                    continue;
                };
                findings.push(FallacyFinding {
                    code: fallacy.code.clone(),
                    name: fallacy.name.clone(),
                    kind: fallacy.kind.clone(),
                    fragment: preview(text, FRAGMENT_LEN),
                    explanation: format!(
                        "Detected by keyword '{}' in message {}",
                        hit.keyword,
                        index + 1
                    ),
                });
            }
        }
        findings
    }

    /// Instruction block asking a model to look for the catalogued fallacies
    pub fn analysis_instructions(&self) -> String {
        let list = self
            .fallacies
            .iter()
            .map(|f| format!("- {}: {} - {}", f.code, f.name, f.description))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "LOGICAL FALLACY ANALYSIS:\n\
             Review every user message for the following fallacies:\n\n\
             {}\n\n\
             For each fallacy found, state:\n\
             1. The exact fragment of the message where it occurs\n\
             2. Why it constitutes that fallacy\n\
             3. How it could be rephrased correctly",
            list
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> FallacyCatalog {
        FallacyCatalog::new(vec![
            Fallacy {
                code: "HG".into(),
                name: "Hasty Generalization".into(),
                kind: "induction".into(),
                description: "Too broad".into(),
                keywords_detection: vec!["always".into(), "everyone".into()],
            },
            Fallacy {
                code: "AH".into(),
                name: "Ad Hominem".into(),
                kind: "relevance".into(),
                description: "Attacks the person".into(),
                keywords_detection: vec!["Ignorant".into()],
            },
        ])
    }

    #[test]
    fn test_detect_is_case_insensitive() {
        let hits = catalog().detect("You are IGNORANT");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, "AH");
        assert_eq!(hits[0].keyword, "Ignorant");
    }

    #[test]
    fn test_detect_keeps_duplicates_per_keyword() {
        let hits = catalog().detect("Everyone always says so");
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|h| h.code == "HG"));
    }

    #[test]
    fn test_detect_matches_inside_words() {
        let hits = catalog().detect("He spoke ignorantly");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].code, "AH");
    }

    #[test]
    fn test_findings_number_messages_from_one() {
        let long = format!("It always fails. {}", "x".repeat(120));
        let findings = catalog().findings(&["Fine point", &long]);
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].explanation,
            "Detected by keyword 'always' in message 2"
        );
        assert!(findings[0].fragment.ends_with("..."));
        assert_eq!(findings[0].fragment.chars().count(), 103);
    }

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = FallacyCatalog::builtin();
        assert!(!catalog.is_empty());
        assert!(catalog.get("STRAW_MAN").is_some());
    }

    #[test]
    fn test_malformed_file_degrades_to_empty() {
        let catalog = FallacyCatalog::load_or_empty("/nonexistent/fallacies.json");
        assert!(catalog.is_empty());
        assert!(catalog.detect("always").is_empty());
    }

    #[test]
    fn test_analysis_instructions_list_entries() {
        let text = catalog().analysis_instructions();
        assert!(text.contains("- HG: Hasty Generalization - Too broad"));
        assert!(text.contains("- AH: Ad Hominem - Attacks the person"));
    }
}
