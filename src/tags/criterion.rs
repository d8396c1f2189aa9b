//! Tag matching criteria
//!
//! Exactly one criterion is active per invocation; `CriterionFlags::build`
//! rejects conflicting flags before any provider call is made. Matching is
//! pure and preserves the input tag order, so dry-run output is reproducible.

use crate::error::{ConfigError, Result};
use crate::tags::types::Tag;
use crate::validation::validate_tag_key;

/// Substring used by --kubernetes-cluster-tags
pub const KUBERNETES_CLUSTER_TAG_PREFIX: &str = "kubernetes.io/cluster/";

/// The rule deciding which tags on a resource are subject to deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchCriterion {
    /// Tags whose key equals one of the given keys
    ExactKeys(Vec<String>),
    /// Tags whose key and value both match
    ExactKeyValue { key: String, value: String },
    /// Tags whose key contains the substring (case-sensitive)
    ///
    /// Intended for hierarchical key namespaces such as
    /// "kubernetes.io/cluster/name" where every tag under a namespace
    /// should match regardless of the trailing segment.
    KeyContains(String),
    /// Every tag on the resource
    AllTags,
}

impl MatchCriterion {
    fn matches_tag(&self, tag: &Tag) -> bool {
        match self {
            MatchCriterion::ExactKeys(keys) => keys.iter().any(|k| *k == tag.key),
            MatchCriterion::ExactKeyValue { key, value } => tag.key == *key && tag.value == *value,
            MatchCriterion::KeyContains(substring) => tag.key.contains(substring.as_str()),
            MatchCriterion::AllTags => true,
        }
    }

    /// Human-readable description for prompts and logs
    pub fn describe(&self) -> String {
        match self {
            MatchCriterion::ExactKeys(keys) => format!("key in [{}]", keys.join(", ")),
            MatchCriterion::ExactKeyValue { key, value } => format!("{}={}", key, value),
            MatchCriterion::KeyContains(s) => format!("key contains '{}'", s),
            MatchCriterion::AllTags => "all tags".to_string(),
        }
    }
}

/// The subset of `tags` matching the criterion, in input order
pub fn matches(tags: &[Tag], criterion: &MatchCriterion) -> Vec<Tag> {
    tags.iter()
        .filter(|t| criterion.matches_tag(t))
        .cloned()
        .collect()
}

/// Raw criterion flags as parsed from the command line
///
/// Collapsed into a single validated `MatchCriterion` once, instead of
/// branching on flag combinations throughout the run.
#[derive(Debug, Clone, Default)]
pub struct CriterionFlags {
    pub tag_keys: Option<String>,
    pub tag_value: Option<String>,
    pub contains: Option<String>,
    pub all_tags: bool,
    pub kubernetes_cluster_tags: bool,
}

impl CriterionFlags {
    /// Validate flag combinations and build the active criterion
    pub fn build(&self) -> Result<MatchCriterion> {
        let mut selected: Vec<&str> = Vec::new();
        if self.tag_keys.is_some() {
            selected.push("--tag-keys");
        }
        if self.contains.is_some() {
            selected.push("--contains");
        }
        if self.all_tags {
            selected.push("--all-tags");
        }
        if self.kubernetes_cluster_tags {
            selected.push("--kubernetes-cluster-tags");
        }

        if selected.len() > 1 {
            return Err(ConfigError::ConflictingOptions(selected.join(", ")).into());
        }
        if selected.is_empty() {
            return Err(ConfigError::MissingOption(
                "one of --tag-keys, --contains, --all-tags, --kubernetes-cluster-tags".to_string(),
            )
            .into());
        }

        if self.tag_value.is_some() && self.tag_keys.is_none() {
            return Err(ConfigError::MissingOption(
                "--tag-keys is required with --tag-value".to_string(),
            )
            .into());
        }

        if let Some(raw_keys) = &self.tag_keys {
            let keys: Vec<String> = raw_keys
                .split(',')
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect();
            if keys.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "--tag-keys".to_string(),
                    reason: "no keys supplied".to_string(),
                }
                .into());
            }
            for key in &keys {
                validate_tag_key(key)?;
            }

            if let Some(value) = &self.tag_value {
                if keys.len() != 1 {
                    return Err(ConfigError::InvalidValue {
                        field: "--tag-value".to_string(),
                        reason: "requires exactly one --tag-keys entry".to_string(),
                    }
                    .into());
                }
                return Ok(MatchCriterion::ExactKeyValue {
                    key: keys[0].clone(),
                    value: value.clone(),
                });
            }
            return Ok(MatchCriterion::ExactKeys(keys));
        }

        if let Some(substring) = &self.contains {
            if substring.is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "--contains".to_string(),
                    reason: "substring cannot be empty".to_string(),
                }
                .into());
            }
            return Ok(MatchCriterion::KeyContains(substring.clone()));
        }

        if self.kubernetes_cluster_tags {
            return Ok(MatchCriterion::KeyContains(
                KUBERNETES_CLUSTER_TAG_PREFIX.to_string(),
            ));
        }

        Ok(MatchCriterion::AllTags)
    }
}
