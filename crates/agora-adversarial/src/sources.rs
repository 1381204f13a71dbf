//! Source policy: trusted repositories and blacklisted sites
//!
//! URLs found in a turn are classified against two lists of wildcard
//! patterns. `*` matches any run of characters, matching ignores case and
//! must cover the whole URL. A URL is tried as written and again without its
//! scheme (and a leading `www.`), so `wikipedia.org/*` catches
//! `https://www.wikipedia.org/wiki/X`. Blacklist wins over trusted.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::fallacies::CatalogError;

/// Policy shipped with the crate
const BUILTIN_POLICY: &str = include_str!("../data/sources.json");

/// Patterns listed per repository in the citation guide
const GUIDE_PATTERNS_PER_REPO: usize = 3;
/// Blacklist entries listed in the citation guide
const GUIDE_BLACKLIST_ENTRIES: usize = 10;

static URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(https?://[\w\-._~:/?#\[\]@!$&'()*+,;=]+)")
        .expect("URL pattern is a valid regex")
});

static SCHEME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://(www\.)?").expect("scheme pattern is a valid regex")
});

/// Search-scope metadata, carried through untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextControl {
    pub search_scope: String,
    pub search_depth_limit: u32,
    pub language_filter: String,
}

/// A named group of trusted URL patterns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustedRepository {
    pub name: String,
    pub urls: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// A blacklisted URL pattern and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlacklistEntry {
    pub url: String,
    pub reason: String,
}

/// Serialized form of the policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePolicyConfig {
    #[serde(default)]
    pub context_control: Option<ContextControl>,
    #[serde(default)]
    pub trusted_repositories: Vec<TrustedRepository>,
    #[serde(default)]
    pub blacklist_urls: Vec<BlacklistEntry>,
    /// Endpoint and tool settings, opaque to the policy
    #[serde(default)]
    pub api_endpoint_config: serde_json::Value,
}

/// Outcome of screening one text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceValidation {
    /// No blacklisted URL was found
    pub is_valid: bool,
    pub found_urls: Vec<String>,
    pub blacklisted_urls: Vec<String>,
    pub trusted_urls: Vec<String>,
    pub has_trusted_sources: bool,
    pub has_blacklisted_sources: bool,
}

impl SourceValidation {
    /// URLs neither trusted nor blacklisted
    pub fn unverified_urls(&self) -> impl Iterator<Item = &String> {
        self.found_urls
            .iter()
            .filter(|u| !self.blacklisted_urls.contains(u) && !self.trusted_urls.contains(u))
    }
}

/// Compiled source policy
#[derive(Debug, Clone)]
pub struct SourcePolicy {
    config: SourcePolicyConfig,
    trusted: Vec<Regex>,
    blacklist: Vec<(Regex, usize)>,
}

impl SourcePolicy {
    /// Compile a policy from its config
    pub fn new(config: SourcePolicyConfig) -> Result<Self, CatalogError> {
        let trusted = config
            .trusted_repositories
            .iter()
            .flat_map(|repo| repo.urls.iter())
            .map(|p| wildcard_to_regex(p))
            .collect::<Result<Vec<_>, _>>()?;

        let blacklist = config
            .blacklist_urls
            .iter()
            .enumerate()
            .map(|(i, entry)| wildcard_to_regex(&entry.url).map(|re| (re, i)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            trusted,
            blacklist,
        })
    }

    /// Parse and compile a policy from JSON
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Read, parse and compile a policy file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Load a policy file, falling back to the built-in policy on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::from_path(path.as_ref()) {
            Ok(policy) => {
                debug!(
                    path = %path.as_ref().display(),
                    trusted = policy.trusted.len(),
                    blacklisted = policy.blacklist.len(),
                    "Loaded source policy"
                );
                policy
            }
            Err(e) => {
                warn!(error = %e, "Source policy unavailable, using built-in policy");
                Self::builtin()
            }
        }
    }

    /// The policy embedded in the crate
    pub fn builtin() -> Self {
        Self::from_json_str(BUILTIN_POLICY).unwrap_or_else(|e| {
            warn!(error = %e, "Built-in source policy is malformed, using minimal policy");
            Self::fallback()
        })
    }

    fn fallback() -> Self {
        let config = SourcePolicyConfig {
            context_control: Some(ContextControl {
                search_scope: "academic_and_verified_news".into(),
                search_depth_limit: 5,
                language_filter: "en".into(),
            }),
            trusted_repositories: vec![TrustedRepository {
                name: "Academic sources".into(),
                urls: vec!["*.edu.pe/*".into(), "*.gob.pe/*".into()],
                description: "Educational and government sources".into(),
            }],
            blacklist_urls: vec![
                blacklisted("wikipedia.org/*", "Openly edited without rigorous review"),
                blacklisted("facebook.com/*", "Social network without verification"),
                blacklisted("twitter.com/*", "Social network without verification"),
                blacklisted("youtube.com/*", "Videos without editorial review"),
            ],
            api_endpoint_config: serde_json::Value::Null,
        };
        // The fixed patterns above are plain wildcards and always compile.
        Self::new(config.clone()).unwrap_or(Self {
            config,
            trusted: Vec::new(),
            blacklist: Vec::new(),
        })
    }

    /// The policy as loaded
    pub fn config(&self) -> &SourcePolicyConfig {
        &self.config
    }

    /// Search-scope metadata
    pub fn context_control(&self) -> Option<&ContextControl> {
        self.config.context_control.as_ref()
    }

    /// Endpoint metadata
    pub fn api_endpoint_config(&self) -> &serde_json::Value {
        &self.config.api_endpoint_config
    }

    /// Whether any blacklist pattern matches `url`
    pub fn is_blacklisted(&self, url: &str) -> bool {
        self.blacklist_index(url).is_some()
    }

    /// Whether any trusted pattern matches `url`
    pub fn is_trusted(&self, url: &str) -> bool {
        let candidates = candidates(url);
        self.trusted
            .iter()
            .any(|re| candidates.iter().any(|c| re.is_match(c)))
    }

    /// Reason of the first blacklist entry matching `url`
    pub fn blacklist_reason(&self, url: &str) -> Option<&str> {
        self.blacklist_index(url)
            .map(|i| self.config.blacklist_urls[i].reason.as_str())
    }

    fn blacklist_index(&self, url: &str) -> Option<usize> {
        let candidates = candidates(url);
        self.blacklist
            .iter()
            .find(|(re, _)| candidates.iter().any(|c| re.is_match(c)))
            .map(|(_, i)| *i)
    }

    /// Classify every URL in `text`
    pub fn validate(&self, text: &str) -> SourceValidation {
        let found_urls = extract_urls(text);
        let mut blacklisted_urls = Vec::new();
        let mut trusted_urls = Vec::new();

        for url in &found_urls {
            if self.is_blacklisted(url) {
                blacklisted_urls.push(url.clone());
            } else if self.is_trusted(url) {
                trusted_urls.push(url.clone());
            }
        }

        SourceValidation {
            is_valid: blacklisted_urls.is_empty(),
            has_trusted_sources: !trusted_urls.is_empty(),
            has_blacklisted_sources: !blacklisted_urls.is_empty(),
            found_urls,
            blacklisted_urls,
            trusted_urls,
        }
    }

    /// Human-readable summary of allowed and forbidden sources
    pub fn citation_guide(&self) -> String {
        let mut guide = String::from("SOURCE GUIDELINES:\n\nTRUSTED SOURCES (prefer):\n");

        for repo in &self.config.trusted_repositories {
            guide.push_str(&format!("• {}:\n", repo.name));
            for url in repo.urls.iter().take(GUIDE_PATTERNS_PER_REPO) {
                guide.push_str(&format!("  - {}\n", url));
            }
        }

        guide.push_str("\nFORBIDDEN SOURCES (do not use):\n");
        for entry in self.config.blacklist_urls.iter().take(GUIDE_BLACKLIST_ENTRIES) {
            guide.push_str(&format!("• {}: {}\n", entry.url, entry.reason));
        }

        guide.push_str("\nRULES:\n");
        guide.push_str("• ALWAYS prefer academic and government sources\n");
        guide.push_str("• NEVER use social networks as a source\n");
        guide.push_str("• NEVER use personal blogs without institutional backing\n");
        guide.push_str("• CHECK that sources are recent and relevant\n");
        guide
    }
}

impl Default for SourcePolicy {
    fn default() -> Self {
        Self::builtin()
    }
}

fn blacklisted(url: &str, reason: &str) -> BlacklistEntry {
    BlacklistEntry {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

/// All `http(s)://` URLs in `text`, in order of appearance
pub fn extract_urls(text: &str) -> Vec<String> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Compile a `*` wildcard into an anchored, case-insensitive regex
pub fn wildcard_to_regex(pattern: &str) -> Result<Regex, CatalogError> {
    let body = pattern
        .split('*')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    Regex::new(&format!("(?i)^{}$", body)).map_err(|source| CatalogError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

fn candidates(url: &str) -> [String; 2] {
    [url.to_string(), SCHEME.replace(url, "").into_owned()]
}
