//! Record name allocation
//!
//! EPICS record names built from GenICam feature names must fit a fixed
//! length and stay clear of the areaDetector base records, so every feature
//! gets a prefixed, shortened and de-duplicated identifier.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Settings for record name generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierConfig {
    /// Prepended to every name to avoid clashes with ADBase.template records
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Maximum record name length, including the prefix
    #[serde(default = "default_max_len")]
    pub max_len: usize,
    /// Words are cut down to this many characters when shortening
    #[serde(default = "default_word_len")]
    pub word_len: usize,
}

impl Default for IdentifierConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            max_len: default_max_len(),
            word_len: default_word_len(),
        }
    }
}

fn default_prefix() -> String {
    "GC_".to_string()
}

fn default_max_len() -> usize {
    20
}

fn default_word_len() -> usize {
    3
}

/// Feature name to record name mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentifierTable {
    records: BTreeMap<String, String>,
}

impl IdentifierTable {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.records.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// (feature name, record name) pairs sorted by feature name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Hands out unique record names; one allocator per run
#[derive(Debug, Clone, Default)]
pub struct IdentifierAllocator {
    config: IdentifierConfig,
    table: IdentifierTable,
    used: HashSet<String>,
}

impl IdentifierAllocator {
    pub fn new(config: IdentifierConfig) -> Self {
        Self {
            config,
            table: IdentifierTable::default(),
            used: HashSet::new(),
        }
    }

    /// Record name for `name`, allocating a new one on first use
    pub fn allocate(&mut self, name: &str) -> &str {
        if !self.table.records.contains_key(name) {
            let candidate = self.shorten(name);
            let record = self.resolve_collision(candidate);
            debug!(feature = %name, record = %record, "Allocated record name");
            self.used.insert(record.clone());
            self.table.records.insert(name.to_string(), record);
        }
        &self.table.records[name]
    }

    pub fn table(&self) -> &IdentifierTable {
        &self.table
    }

    pub fn finish(self) -> IdentifierTable {
        self.table
    }

    /// Prefix the name and bring it within the length bound
    fn shorten(&self, name: &str) -> String {
        let full: String = self
            .config
            .prefix
            .chars()
            .chain(name.chars())
            .map(|c| if c.is_ascii() { c } else { '_' })
            .collect();
        if full.len() <= self.config.max_len {
            return full;
        }

        let mut words = camel_words(&full);
        let mut candidate = full;
        for i in 0..words.len() {
            if words[i].len() > self.config.word_len {
                words[i].truncate(self.config.word_len);
                candidate = words.concat();
                if candidate.len() <= self.config.max_len {
                    break;
                }
            }
        }

        candidate.truncate(self.config.max_len);
        candidate
    }

    /// Overwrite trailing characters with a counter until the name is free
    fn resolve_collision(&self, mut candidate: String) -> String {
        let mut i: usize = 0;
        while self.used.contains(&candidate) {
            let suffix = i.to_string();
            let keep = candidate.len().saturating_sub(suffix.len());
            candidate.truncate(keep);
            candidate.push_str(&suffix);
            i += 1;
        }
        candidate
    }
}

/// Split on camel-case boundaries: a word starts at the first letter or at
/// any uppercase letter. Anything before the first letter is dropped.
fn camel_words(s: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    for c in s.chars() {
        match words.last_mut() {
            Some(word) if !c.is_ascii_uppercase() => word.push(c),
            _ if c.is_ascii_alphabetic() => words.push(c.to_string()),
            _ => {}
        }
    }
    words
}
