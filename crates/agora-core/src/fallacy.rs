//! Fallacy findings in user turns

use serde::{Deserialize, Serialize};

/// A keyword-triggered fallacy match in one of the human's turns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallacyFinding {
    /// Catalog code
    pub code: String,
    /// Catalog name
    pub name: String,
    /// Catalog family (e.g. relevance, presumption)
    #[serde(rename = "type")]
    pub kind: String,
    /// The offending user text, truncated
    pub fragment: String,
    /// Why it was flagged
    pub explanation: String,
}
