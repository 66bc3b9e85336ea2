//! The wheel document: an ordered list of uniquely named options.
//!
//! This is the unit of persistence. Every mutating command loads a whole
//! `Wheel`, changes it in memory, and writes the whole thing back.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::draw;
use crate::error::{WheelError, WheelResult};
use crate::option::{DEFAULT_WEIGHT, WheelOption};

/// An ordered list of options with unique names.
///
/// Serializes as `{"options": [...]}`. Unknown top-level fields are ignored
/// on read; a missing `options` field is a read error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wheel {
    #[serde(deserialize_with = "unique_options")]
    options: Vec<WheelOption>,
}

/// Outcome of adding a batch of names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddReport {
    /// Names that were new and have been appended, in request order.
    pub added: Vec<String>,
    /// Requested names that were already on the wheel.
    pub existing: Vec<String>,
}

/// Outcome of tagging an option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagReport {
    /// Tags newly applied.
    pub added: Vec<String>,
    /// Requested tags the option already had.
    pub existing: Vec<String>,
}

impl Wheel {
    /// Create an empty wheel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a wheel from options. Later duplicates of a name are dropped.
    pub fn from_options(options: Vec<WheelOption>) -> Self {
        Self {
            options: dedup_by_name(options),
        }
    }

    /// Parse a wheel document.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Serialize as a 4-space indented document.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Serialize without whitespace.
    pub fn to_json_compact(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// All options, in insertion order.
    pub fn options(&self) -> &[WheelOption] {
        &self.options
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Whether the wheel has no options.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Whether an option with exactly this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Look up an option by exact name.
    pub fn get(&self, name: &str) -> Option<&WheelOption> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Options carrying the given tag.
    pub fn tagged(&self, tag: &str) -> Vec<&WheelOption> {
        self.options.iter().filter(|o| o.has_tag(tag)).collect()
    }

    /// Add a single option. Returns false if the name is already present.
    pub fn add(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.options.push(WheelOption::new(name));
        true
    }

    /// Add a batch of names.
    ///
    /// Each candidate is trimmed; blank candidates are ignored. A name that
    /// repeats within the batch is added once, at its first position.
    pub fn add_all<I, S>(&mut self, names: I) -> AddReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = AddReport::default();
        for candidate in names {
            let name = candidate.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if self.add(name) {
                report.added.push(name.to_string());
            } else if !report.added.iter().any(|a| a == name)
                && !report.existing.iter().any(|e| e == name)
            {
                report.existing.push(name.to_string());
            }
        }
        report
    }

    /// Remove an option by exact name, returning it if it was present.
    pub fn remove(&mut self, name: &str) -> Option<WheelOption> {
        let idx = self.options.iter().position(|o| o.name == name)?;
        Some(self.options.remove(idx))
    }

    /// Apply tags to an option.
    ///
    /// Tags are trimmed. Any blank tag rejects the whole request.
    pub fn tag<S: AsRef<str>>(&mut self, name: &str, tags: &[S]) -> WheelResult<TagReport> {
        let tags: Vec<&str> = tags
            .iter()
            .map(|t| {
                let tag: &str = t.as_ref();
                tag.trim()
            })
            .collect();
        if tags.is_empty() || tags.iter().any(|t| t.is_empty()) {
            return Err(WheelError::Validation("tags cannot be empty".to_string()));
        }

        let option = self
            .options
            .iter_mut()
            .find(|o| o.name == name)
            .ok_or_else(|| WheelError::NotFound(name.to_string()))?;

        let mut report = TagReport::default();
        for tag in tags {
            if option.tags.insert(tag.to_string()) {
                report.added.push(tag.to_string());
            } else if !report.existing.iter().any(|e| e == tag)
                && !report.added.iter().any(|a| a == tag)
            {
                report.existing.push(tag.to_string());
            }
        }
        Ok(report)
    }

    /// Remove every option.
    pub fn clear(&mut self) {
        self.options.clear();
    }

    /// Set every weight back to the default. Names and tags are kept.
    pub fn reset_weights(&mut self) {
        for option in &mut self.options {
            option.weight = DEFAULT_WEIGHT;
        }
    }

    /// Remove every tag from every option.
    pub fn clear_tags(&mut self) {
        for option in &mut self.options {
            option.tags.clear();
        }
    }

    /// Apply the post-draw weight update for `picked` across the whole wheel.
    pub fn rebalance(&mut self, picked: &str) {
        draw::rebalance(&mut self.options, picked);
    }
}

fn dedup_by_name(options: Vec<WheelOption>) -> Vec<WheelOption> {
    let mut seen = HashSet::new();
    options
        .into_iter()
        .filter(|o| seen.insert(o.name.clone()))
        .collect()
}

fn unique_options<'de, D>(deserializer: D) -> Result<Vec<WheelOption>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<WheelOption>::deserialize(deserializer).map(dedup_by_name)
}
