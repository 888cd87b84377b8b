use std::collections::HashSet;

use itertools::Itertools;

use super::ConfigError;

/// How a record name is compared to the requested names.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchMode {
    #[default]
    Exact,
    /// The record name only has to start with a requested name.
    Prefix,
}

/// The requested names and how to select with them.
#[derive(Clone, Debug)]
pub struct TargetSpec {
    names: Vec<String>,
    index: HashSet<String>,
    match_mode: MatchMode,
    invert: bool,
}

impl TargetSpec {
    /// Requested names must be unique and there must be at least one.
    pub fn new(names: Vec<String>, match_mode: MatchMode, invert: bool) -> Result<Self, ConfigError> {
        if names.is_empty() {
            return Err(ConfigError::NoTargets);
        }

        let duplicates: Vec<String> = names.iter().duplicates().cloned().collect();
        if !duplicates.is_empty() {
            return Err(ConfigError::DuplicateTargets(duplicates));
        }

        Ok(Self {
            index: names.iter().cloned().collect(),
            names,
            match_mode,
            invert,
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    pub fn invert(&self) -> bool {
        self.invert
    }

    /// Whether `name` is one of the requested names, under the match mode.
    pub fn matches(&self, name: &str) -> bool {
        match self.match_mode {
            MatchMode::Exact => self.index.contains(name),
            MatchMode::Prefix => self.names.iter().any(|prefix| name.starts_with(prefix.as_str())),
        }
    }

    /// Whether a record called `name` belongs in the selection.
    pub fn includes(&self, name: &str) -> bool {
        self.matches(name) != self.invert
    }

    /// Number of records after which nothing more can be selected, if there is such a bound.
    ///
    /// Only exact, non inverted selections are bounded: each requested name can be
    /// selected at most once.
    pub fn selection_bound(&self) -> Option<usize> {
        (self.match_mode == MatchMode::Exact && !self.invert).then(|| self.names.len())
    }
}
