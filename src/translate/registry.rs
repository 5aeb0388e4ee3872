//! Registry of species names protected from translation

use crate::config::CategoryConfig;
use crate::storage::read_collection;
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;

/// Names shorter than this are never protected
pub const MIN_PROTECTED_CHARS: usize = 4;

/// A protected name with its precompiled case-insensitive pattern
#[derive(Debug, Clone)]
pub struct ProtectedName {
    pub name: String,
    pub pattern: Regex,
}

impl ProtectedName {
    /// Returns `None` for names too short to protect
    pub fn new(name: &str) -> Option<Self> {
        let name = name.trim();
        if name.chars().count() < MIN_PROTECTED_CHARS {
            return None;
        }

        let pattern = Regex::new(&format!("(?i){}", regex::escape(name))).ok()?;
        Some(Self {
            name: name.to_string(),
            pattern,
        })
    }

    fn char_len(&self) -> usize {
        self.name.chars().count()
    }
}

/// Known species names, built once at startup and read-only afterwards
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    /// Longest first
    names: Vec<ProtectedName>,
}

impl NameRegistry {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let distinct: BTreeSet<String> = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        let mut names: Vec<ProtectedName> =
            distinct.iter().filter_map(|name| ProtectedName::new(name)).collect();
        names.sort_by_key(|name| std::cmp::Reverse(name.char_len()));

        Self { names }
    }

    /// Collects every record name from the persisted category collections
    ///
    /// Missing or unreadable collection files contribute nothing.
    pub fn load(data_dir: &Path, categories: &[CategoryConfig]) -> Self {
        let mut names = Vec::new();
        for category in categories {
            match read_collection(&data_dir.join(category.collection_file())) {
                Ok(records) => names.extend(records.into_iter().map(|record| record.name)),
                Err(e) => tracing::warn!("No protected names from {}: {}", category.slug, e),
            }
        }

        let registry = Self::new(names);
        tracing::info!("Loaded {} protected species names", registry.len());
        registry
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        let name = name.trim();
        self.names.iter().any(|protected| protected.name == name)
    }

    /// The protection set for one call: registry names plus `extra`
    ///
    /// Ordered longest first so that multi-word names are replaced before
    /// any shorter name they contain. On equal length, call-specific names
    /// come first.
    pub fn candidates(&self, extra: &[&str]) -> Vec<ProtectedName> {
        let mut candidates: Vec<ProtectedName> = extra
            .iter()
            .filter(|name| !self.contains(name))
            .filter_map(|name| ProtectedName::new(name))
            .collect();
        candidates.dedup_by(|a, b| a.name == b.name);
        candidates.extend(self.names.iter().cloned());

        // stable sort keeps extras ahead of registry names of equal length
        candidates.sort_by_key(|name| std::cmp::Reverse(name.char_len()));
        candidates
    }
}
