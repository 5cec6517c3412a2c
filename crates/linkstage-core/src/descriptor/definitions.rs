//! Preprocessor definitions published by descriptors.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};
use tracing::debug;

/// Value of a single preprocessor definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionValue {
    /// Defined with no value (`NAME`).
    Flag,
    /// Explicitly switched off (`NAME=0`).
    Off,
    /// Defined to a literal (`NAME=value`).
    Literal(String),
}

/// Definitions keyed by name, rendered in name order.
///
/// Merging is last-writer-wins; conflicting values from different
/// descriptors are not reported as errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreprocessorDefinitionSet {
    entries: BTreeMap<String, DefinitionValue>,
}

impl PreprocessorDefinitionSet {
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Set `name` to `value`, replacing any earlier value.
    pub fn set(&mut self, name: impl Into<String>, value: DefinitionValue) {
        let name = name.into();
        if self.entries.get(&name).is_some_and(|previous| *previous != value) {
            debug!(definition = %name, "preprocessor definition overridden");
        }
        self.entries.insert(name, value);
    }

    /// Parse a rendered entry (`NAME`, `NAME=0`, `NAME=value`) and set it.
    ///
    /// Blank entries are ignored.
    pub fn set_rendered(&mut self, entry: &str) {
        let entry = entry.trim();
        if entry.is_empty() {
            return;
        }
        match entry.split_once('=') {
            Some((name, "0")) => self.set(name.trim(), DefinitionValue::Off),
            Some((name, value)) => {
                self.set(name.trim(), DefinitionValue::Literal(value.trim().to_string()));
            }
            None => self.set(entry, DefinitionValue::Flag),
        }
    }

    /// Union `other` into `self`; entries from `other` win on a clash.
    pub fn merge(&mut self, other: &Self) {
        for (name, value) in &other.entries {
            self.set(name.clone(), value.clone());
        }
    }

    pub fn get(&self, name: &str) -> Option<&DefinitionValue> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compiler-ready `NAME` / `NAME=value` strings, in name order.
    pub fn rendered(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(name, value)| match value {
                DefinitionValue::Flag => name.clone(),
                DefinitionValue::Off => format!("{name}=0"),
                DefinitionValue::Literal(literal) => format!("{name}={literal}"),
            })
            .collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for PreprocessorDefinitionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for entry in iter {
            set.set_rendered(entry.as_ref());
        }
        set
    }
}

impl fmt::Display for PreprocessorDefinitionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered().join(" "))
    }
}

impl Serialize for PreprocessorDefinitionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rendered())
    }
}
