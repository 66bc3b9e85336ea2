//! A single entry on the wheel.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// Weight given to newly added options.
pub const DEFAULT_WEIGHT: u32 = 1;

/// One named, weighted, taggable entry on the wheel.
///
/// The weight is the number of tickets the option holds in a draw. An option
/// with weight 0 cannot be drawn until it accumulates weight again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelOption {
    /// Display name, unique within a wheel (case-sensitive).
    pub name: String,
    /// Draw weight.
    #[serde(default = "default_weight", deserialize_with = "non_negative_weight")]
    pub weight: u32,
    /// Labels used for filtered draws.
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl WheelOption {
    /// Create an option with the default weight and no tags.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weight: DEFAULT_WEIGHT,
            tags: BTreeSet::new(),
        }
    }

    /// Set the weight.
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }

    /// Add a tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Whether this option carries the given tag.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Whether this option carries every one of the given tags.
    pub fn has_all_tags<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        tags.iter().all(|t| {
            let tag: &str = t.as_ref();
            self.tags.contains(tag)
        })
    }
}

impl std::fmt::Display for WheelOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} @ {}", self.name, self.weight)?;
        if !self.tags.is_empty() {
            let tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
            write!(f, " [{}]", tags.join(", "))?;
        }
        Ok(())
    }
}

fn default_weight() -> u32 {
    DEFAULT_WEIGHT
}

/// Older documents may carry negative weights; they read as 0.
fn non_negative_weight<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(u32::try_from(raw.max(0)).unwrap_or(u32::MAX))
}
