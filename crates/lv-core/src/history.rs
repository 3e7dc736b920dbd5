//! Last recorded interaction state per behaviour

use ahash::AHashMap;

use crate::payload::Payload;
use crate::propagation::PropagationInfo;

/// What a unit last did for one behaviour
#[derive(Debug, Clone, PartialEq)]
pub struct ActionHistoryEntry {
    pub payload: Payload,
    pub propagation: PropagationInfo,
    pub is_mutable_action: bool,
}

/// Behaviour name to its latest entry
#[derive(Debug, Clone, Default)]
pub struct ActionHistory {
    entries: AHashMap<String, ActionHistoryEntry>,
}

impl ActionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry, replacing the previous one for the behaviour
    pub fn record(&mut self, behaviour: impl Into<String>, entry: ActionHistoryEntry) {
        self.entries.insert(behaviour.into(), entry);
    }

    pub fn get(&self, behaviour: &str) -> Option<&ActionHistoryEntry> {
        self.entries.get(behaviour)
    }

    pub fn is_mutable(&self, behaviour: &str) -> bool {
        self.get(behaviour).map_or(false, |entry| entry.is_mutable_action)
    }

    pub fn behaviours(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
