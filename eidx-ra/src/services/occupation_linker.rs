//! Occupation Linker
//!
//! Resolves free-text task names from the signal table to O*NET occupations.
//! The datasets share no task identifier, so linking goes through normalized
//! task text with a permissive fallback chain:
//!
//! 1. Exact lookup of the normalized name
//! 2. Word-prefix lookup, from `min(words, 6)` words down to 3
//! 3. Substring scan for the first word (only when it is longer than 4 chars)
//! 4. Unresolved
//!
//! The fallbacks can link a task to the wrong occupation. That is accepted:
//! output parity with the published dashboard numbers depends on this exact
//! matching policy.
//!
//! # Index layout
//! Full task texts and their five-word prefixes share one keyspace that
//! remembers insertion order. A repeated full text keeps its first position
//! but takes the latest occupation; a prefix key is only added when the key
//! is not present yet. The substring scan walks keys in insertion order, so
//! its result is stable for a given O*NET table.

use eidx_common::OnetTaskRecord;
use std::collections::HashMap;
use std::fmt;

/// Texts longer than this many words also get a prefix key
const PREFIX_KEY_MIN_WORDS: usize = 3;
/// Words kept in a prefix key
const PREFIX_KEY_WORDS: usize = 5;
/// Longest prefix probed during resolution
const PREFIX_PROBE_MAX_WORDS: usize = 6;
/// Shortest prefix probed during resolution
const PREFIX_PROBE_MIN_WORDS: usize = 3;
/// First word must be longer than this for the substring scan
const SUBSTRING_MIN_WORD_LEN: usize = 4;

/// Occupation a task statement belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupationRef {
    pub code: String,
    pub title: String,
}

/// Which resolution stage produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchStage {
    Exact,
    Prefix,
    Substring,
    Unresolved,
}

impl fmt::Display for MatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatchStage::Exact => "exact",
            MatchStage::Prefix => "prefix",
            MatchStage::Substring => "substring",
            MatchStage::Unresolved => "unresolved",
        };
        f.write_str(name)
    }
}

/// Outcome of resolving one task name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a> {
    pub occupation: Option<&'a OccupationRef>,
    pub stage: MatchStage,
}

impl<'a> Resolution<'a> {
    fn found(occupation: &'a OccupationRef, stage: MatchStage) -> Self {
        Self {
            occupation: Some(occupation),
            stage,
        }
    }

    fn unresolved() -> Self {
        Self {
            occupation: None,
            stage: MatchStage::Unresolved,
        }
    }
}

/// Per-stage resolution counts for one pipeline pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    pub exact: usize,
    pub prefix: usize,
    pub substring: usize,
    pub unresolved: usize,
}

impl LinkStats {
    pub fn record(&mut self, stage: MatchStage) {
        match stage {
            MatchStage::Exact => self.exact += 1,
            MatchStage::Prefix => self.prefix += 1,
            MatchStage::Substring => self.substring += 1,
            MatchStage::Unresolved => self.unresolved += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.exact + self.prefix + self.substring + self.unresolved
    }
}

/// Lowercase and trim a task text
pub fn normalize_task_text(text: &str) -> String {
    text.to_lowercase().trim().to_string()
}

/// Linker over an O*NET task statement table
#[derive(Debug, Clone, Default)]
pub struct OccupationLinker {
    /// Keys and occupations in insertion order
    entries: Vec<(String, OccupationRef)>,
    /// Key → position in `entries`
    positions: HashMap<String, usize>,
    /// Occupation code → title (last writer wins)
    titles_by_code: HashMap<String, String>,
}

impl OccupationLinker {
    /// Build the index from O*NET records in table order
    pub fn new(onet_tasks: &[OnetTaskRecord]) -> Self {
        let mut linker = Self::default();

        for record in onet_tasks {
            let key = normalize_task_text(&record.task);
            let occupation = OccupationRef {
                code: record.occupation_code.clone(),
                title: record.occupation_title.clone(),
            };

            linker
                .titles_by_code
                .insert(record.occupation_code.clone(), record.occupation_title.clone());

            let words: Vec<&str> = key.split(' ').collect();
            let prefix_key = (words.len() > PREFIX_KEY_MIN_WORDS)
                .then(|| words[..words.len().min(PREFIX_KEY_WORDS)].join(" "));

            linker.upsert(key.clone(), occupation.clone());

            if let Some(prefix_key) = prefix_key {
                linker.insert_if_absent(prefix_key, occupation);
            }
        }

        tracing::debug!(
            onet_tasks = onet_tasks.len(),
            keys = linker.entries.len(),
            occupations = linker.titles_by_code.len(),
            "Built occupation index"
        );

        linker
    }

    fn upsert(&mut self, key: String, occupation: OccupationRef) {
        match self.positions.get(&key) {
            Some(&index) => self.entries[index].1 = occupation,
            None => {
                self.positions.insert(key.clone(), self.entries.len());
                self.entries.push((key, occupation));
            }
        }
    }

    fn insert_if_absent(&mut self, key: String, occupation: OccupationRef) {
        if !self.positions.contains_key(&key) {
            self.positions.insert(key.clone(), self.entries.len());
            self.entries.push((key, occupation));
        }
    }

    fn lookup(&self, key: &str) -> Option<&OccupationRef> {
        self.positions.get(key).map(|&index| &self.entries[index].1)
    }

    /// Resolve a task name through the fallback chain
    pub fn resolve(&self, task_name: &str) -> Resolution<'_> {
        let normalized = normalize_task_text(task_name);

        if let Some(occupation) = self.lookup(&normalized) {
            return Resolution::found(occupation, MatchStage::Exact);
        }

        let words: Vec<&str> = normalized.split(' ').collect();

        let longest = words.len().min(PREFIX_PROBE_MAX_WORDS);
        for count in (PREFIX_PROBE_MIN_WORDS..=longest).rev() {
            let partial_key = words[..count].join(" ");
            if let Some(occupation) = self.lookup(&partial_key) {
                return Resolution::found(occupation, MatchStage::Prefix);
            }
        }

        if let Some(first_word) = words.first() {
            if first_word.chars().count() > SUBSTRING_MIN_WORD_LEN {
                if let Some((_, occupation)) =
                    self.entries.iter().find(|(key, _)| key.contains(first_word))
                {
                    return Resolution::found(occupation, MatchStage::Substring);
                }
            }
        }

        Resolution::unresolved()
    }

    /// Title of an occupation code, if any O*NET row carries it
    pub fn title_for_code(&self, code: &str) -> Option<&str> {
        self.titles_by_code.get(code).map(String::as_str)
    }

    /// Number of keys in the index (full texts plus prefix keys)
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    pub fn occupation_count(&self) -> usize {
        self.titles_by_code.len()
    }
}
