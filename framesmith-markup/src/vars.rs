// Template variable discovery and substitution

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").unwrap())
}

/// Format a variable name as it appears in markup: `${name}`.
pub fn placeholder(name: &str) -> String {
    format!("${{{}}}", name)
}

/// Names of every `${name}` placeholder in `text`, in order of appearance.
/// Duplicates are kept.
pub fn find_placeholders(text: &str) -> Vec<String> {
    placeholder_regex()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Placeholder names mapped to the values that replace them.
///
/// An empty value means "not filled in yet"; substitution leaves those
/// placeholders visible in the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableMap {
    values: BTreeMap<String, String>,
}

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map holding every placeholder found in `text`, all empty.
    pub fn discover(text: &str) -> Self {
        let mut map = Self::new();
        map.discover_from(text);
        map
    }

    /// Register any placeholders in `text` that aren't known yet. Existing
    /// values are kept.
    pub fn discover_from(&mut self, text: &str) {
        for name in find_placeholders(text) {
            self.values.entry(name).or_default();
        }
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Names that still have no value.
    pub fn unfilled(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(name, _)| name)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Replace each `${name}` whose name is in `variables` with its value.
///
/// Placeholders with an empty value, and names the map doesn't know, are
/// left untouched.
pub fn substitute(text: &str, variables: &VariableMap) -> String {
    let mut output = text.to_string();
    for (name, value) in variables.iter() {
        if value.is_empty() {
            continue;
        }
        output = output.replace(&placeholder(name), value);
    }
    output
}
